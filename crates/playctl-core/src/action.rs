#![forbid(unsafe_code)]

//! Actions produced by the classifier.
//!
//! [`GestureAction`] values describe *what the user asked for*; applying
//! them to the playback engine, the overlay, or the window is the caller's
//! job. Each action maps to an [`ActionKind`] and a scalar magnitude so a
//! host can observe gestures through a single `(kind, magnitude)` callback.
//!
//! # Invariants
//!
//! 1. Every touch session that saw a DOWN ends with exactly one
//!    [`GestureAction::SessionEnded`], emitted last.
//! 2. `SeekPreview` never changes playback; only `SeekCommit` does.
//! 3. `SetVolume::level` is already clamped to the session ceiling.

use std::fmt;

use crate::timefmt::millis_to_string;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Classification of one touch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    /// Nothing decided yet; a plain tap if it ends this way.
    #[default]
    None,
    Volume,
    Brightness,
    Seek,
    ViewpointDrag,
    PinchZoom,
    /// Session is swallowed.
    Ignore,
}

impl ActionKind {
    /// Volume or brightness.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Volume | Self::Brightness)
    }

    /// Short lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Volume => "volume",
            Self::Brightness => "brightness",
            Self::Seek => "seek",
            Self::ViewpointDrag => "viewpoint_drag",
            Self::PinchZoom => "pinch_zoom",
            Self::Ignore => "ignore",
        }
    }
}

// ---------------------------------------------------------------------------
// Directions and targets
// ---------------------------------------------------------------------------

/// Direction of a seek relative to the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekDirection {
    Backward,
    Forward,
}

impl SeekDirection {
    /// Direction of a signed offset. Zero counts as forward.
    #[must_use]
    pub const fn of(delta: i64) -> Self {
        if delta < 0 {
            Self::Backward
        } else {
            Self::Forward
        }
    }

    /// `-1` or `1`.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Backward => -1,
            Self::Forward => 1,
        }
    }
}

/// Cardinal direction for fling gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Dominant direction of a displacement.
    #[must_use]
    pub fn of(dx: f32, dy: f32) -> Self {
        if dx.abs() >= dy.abs() {
            if dx < 0.0 { Self::Left } else { Self::Right }
        } else if dy < 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }
}

/// Secondary panels drawn on top of the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPanel {
    /// Playback options sheet.
    Options,
    /// Play queue.
    Playlist,
}

/// How the video frame is fitted into the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VideoScale {
    #[default]
    BestFit,
    FitScreen,
    Fill,
    Original,
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// Short-lived text feedback shown over the video.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A seek was requested on a stream without random access.
    StreamNotSeekable,
    /// The volume reached the normal maximum; a new swipe can boost past it.
    AudioBoost,
    /// Where a seek drag would land.
    SeekPreview {
        jump_ms: i64,
        target_ms: i64,
        divisor: u32,
    },
    /// A discrete seek step, accumulated over the streak.
    SeekStep { total_ms: i64 },
    /// Volume as a percentage of the normal maximum.
    Volume { percent: u32 },
    /// Window brightness as a percentage.
    Brightness { percent: u32 },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamNotSeekable => f.write_str("Stream not seekable"),
            Self::AudioBoost => f.write_str("Swipe again to boost audio"),
            Self::SeekPreview {
                jump_ms,
                target_ms,
                divisor,
            } => {
                let sign = if *jump_ms >= 0 { "+" } else { "" };
                write!(
                    f,
                    "{sign}{} ({})",
                    millis_to_string(*jump_ms),
                    millis_to_string(*target_ms)
                )?;
                if *divisor > 1 {
                    write!(f, " x{:.1}", 1.0 / f64::from(*divisor))?;
                }
                Ok(())
            }
            Self::SeekStep { total_ms } => {
                let sign = if *total_ms >= 0 { "+" } else { "-" };
                write!(f, "{sign}{} s", total_ms.unsigned_abs() / 1000)
            }
            Self::Volume { percent } => write!(f, "Volume {percent}%"),
            Self::Brightness { percent } => write!(f, "Brightness {percent}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// GestureAction
// ---------------------------------------------------------------------------

/// An effect requested by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureAction {
    /// Plain tap: flip overlay visibility.
    ToggleOverlay,
    /// Tap while a panel was open: close it.
    ClosePanel(OverlayPanel),
    /// Set the audio volume to an absolute level.
    SetVolume { level: u32 },
    /// Nudge window brightness.
    AdjustBrightness { delta: f32 },
    /// Update seek feedback without seeking.
    SeekPreview {
        jump_ms: i64,
        target_ms: i64,
        divisor: u32,
    },
    /// Seek to `target_ms`.
    SeekCommit { target_ms: i64, jump_ms: i64 },
    /// Drag direction flipped; drop accumulated seek feedback.
    SeekFeedbackReset,
    /// Rotate a spherical video by degrees.
    RotateViewpoint { yaw: f32, pitch: f32 },
    /// Change the spherical field of view by degrees.
    ZoomFov { delta: f32 },
    /// Change how the frame fits the surface.
    SetVideoScale(VideoScale),
    /// Double tap in a side zone.
    DoubleTapSeek { delta_ms: i64, repeat: u32 },
    /// Discrete relative seek from a controller stick.
    SeekBy { delta_ms: i64 },
    /// Double tap in the centre zone.
    TogglePlayPause,
    /// Fast swipe; hosts typically dismiss the player.
    Fling(SwipeDirection),
    /// Transient feedback text.
    Notice(Notice),
    /// Terminal classification of a touch session.
    SessionEnded(ActionKind),
}

impl GestureAction {
    /// Which gesture family produced this action.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::SetVolume { .. } => ActionKind::Volume,
            Self::AdjustBrightness { .. } => ActionKind::Brightness,
            Self::SeekPreview { .. }
            | Self::SeekCommit { .. }
            | Self::SeekFeedbackReset
            | Self::DoubleTapSeek { .. }
            | Self::SeekBy { .. } => ActionKind::Seek,
            Self::RotateViewpoint { .. } => ActionKind::ViewpointDrag,
            Self::ZoomFov { .. } | Self::SetVideoScale(_) => ActionKind::PinchZoom,
            Self::SessionEnded(kind) => *kind,
            _ => ActionKind::None,
        }
    }

    /// Scalar size of the effect, for `(kind, magnitude)` observers.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        match self {
            Self::SetVolume { level } => *level as f32,
            Self::AdjustBrightness { delta } => *delta,
            Self::SeekPreview { jump_ms, .. } | Self::SeekCommit { jump_ms, .. } => *jump_ms as f32,
            Self::DoubleTapSeek { delta_ms, .. } | Self::SeekBy { delta_ms } => *delta_ms as f32,
            Self::RotateViewpoint { yaw, pitch } => yaw.hypot(*pitch),
            Self::ZoomFov { delta } => *delta,
            _ => 0.0,
        }
    }

    /// True for the terminal marker of a session.
    #[must_use]
    pub const fn is_session_end(&self) -> bool {
        matches!(self, Self::SessionEnded(_))
    }
}
