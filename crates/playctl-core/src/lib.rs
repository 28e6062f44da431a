#![forbid(unsafe_code)]

//! Core: input vocabulary, seek math, and gesture classification.
//!
//! # Role in playctl
//! `playctl-core` is the input layer of a video player's control surface.
//! It turns raw touch, pinch, and joystick samples into discrete
//! [`GestureAction`](action::GestureAction)s without touching any UI state.
//!
//! # Primary responsibilities
//! - **GestureClassifier**: one-session-at-a-time touch classification
//!   into volume, brightness, seek, viewpoint, pinch, or ignore.
//! - **seek_math**: pure drag-to-effect mappings.
//! - **AxisMapper**: rate-limited game controller input.
//! - **PlaybackFacade**: the narrow interface to the playback engine.
//!
//! # How it fits in the system
//! `playctl-runtime` owns the overlay, output routing, and the controller
//! that applies the actions produced here to the engine and the screen.

pub mod action;
pub mod axis;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod playback;
pub mod seek_math;
pub mod timefmt;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
