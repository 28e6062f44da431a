#![forbid(unsafe_code)]

//! Raw input vocabulary accepted by the classifier.
//!
//! Hosts translate platform pointer, scale-detector, and joystick callbacks
//! into these types before handing them to
//! [`GestureClassifier`](crate::gesture::GestureClassifier). Values are plain
//! data; nothing here holds platform handles.
//!
//! # Design Notes
//!
//! - One [`TouchEvent`] stream carries a single active finger session.
//!   Extra fingers only matter through [`PinchEvent`]s.
//! - [`TouchControls`] use bitflags so hosts can mask capabilities from a
//!   user setting without a bespoke struct.

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event for the video surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary pointer activity.
    Touch(TouchEvent),
    /// Two-finger scale gesture activity.
    Pinch(PinchEvent),
    /// Game controller analog sticks.
    Axis(AxisEvent),
}

/// Lifecycle phase of a touch pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Finger went down. Starts a session.
    Down,
    /// Finger moved while down.
    Move,
    /// Finger lifted. Ends the session.
    Up,
    /// Platform aborted the stream. Ends the session without effect.
    Cancel,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Which phase this sample belongs to.
    pub phase: TouchPhase,
    /// Position on the video surface.
    pub position: Point,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub const fn new(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
        }
    }

    /// Convenience constructor for [`TouchPhase::Down`].
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Down, x, y)
    }

    /// Convenience constructor for [`TouchPhase::Move`].
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Move, x, y)
    }

    /// Convenience constructor for [`TouchPhase::Up`].
    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Up, x, y)
    }

    /// Convenience constructor for [`TouchPhase::Cancel`].
    #[must_use]
    pub const fn cancel(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Cancel, x, y)
    }
}

/// Phase of a two-finger scale gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinchPhase {
    Begin,
    Update,
    End,
}

/// A scale-detector sample.
///
/// `scale_factor` is relative to the previous sample: values above 1 mean
/// the fingers moved apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchEvent {
    pub phase: PinchPhase,
    pub scale_factor: f32,
}

impl PinchEvent {
    /// Create a new pinch event.
    #[must_use]
    pub const fn new(phase: PinchPhase, scale_factor: f32) -> Self {
        Self {
            phase,
            scale_factor,
        }
    }
}

/// Centered joystick axis values in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisEvent {
    /// Left stick horizontal.
    pub x: f32,
    /// Left stick vertical (down is positive).
    pub y: f32,
    /// Right stick vertical.
    pub rz: f32,
    /// D-pad horizontal hat.
    pub hat_x: f32,
    /// D-pad vertical hat.
    pub hat_y: f32,
}

bitflags! {
    /// Gesture families the user allowed on the video surface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TouchControls: u8 {
        /// No gestures besides the overlay tap.
        const NONE       = 0b000;
        /// Vertical swipe adjusts audio volume.
        const VOLUME     = 0b001;
        /// Vertical swipe adjusts screen brightness.
        const BRIGHTNESS = 0b010;
        /// Horizontal swipe and double tap seek.
        const SEEK       = 0b100;
    }
}

impl Default for TouchControls {
    fn default() -> Self {
        Self::all()
    }
}
