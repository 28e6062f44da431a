#![forbid(unsafe_code)]

//! Screen orientation policy.
//!
//! The user configures a default [`OrientationLockMode`]. At runtime the
//! player can lock the current orientation (explicit toggle or screen lock)
//! and later go back to the default. [`OrientationPolicy`] tracks the
//! orientation currently requested from the window system.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "player-config")]
use serde::{Deserialize, Serialize};

use playctl_core::geometry::ScreenOrientation;

/// Configured default orientation behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(rename_all = "snake_case"))]
pub enum OrientationLockMode {
    /// Follow the user's system rotation setting.
    #[default]
    Free,
    /// Rotate to any orientation the sensor reports.
    Sensor,
    /// Either landscape, by sensor.
    Landscape,
    /// Either portrait, by sensor.
    Portrait,
    /// Lock whatever orientation the screen has when playback starts.
    LockedCurrent,
}

impl OrientationLockMode {
    /// Orientation to request under this mode.
    #[must_use]
    pub const fn requested(self, current: ScreenOrientation) -> RequestedOrientation {
        match self {
            Self::Free => RequestedOrientation::User,
            Self::Sensor => RequestedOrientation::FullSensor,
            Self::Landscape => RequestedOrientation::SensorLandscape,
            Self::Portrait => RequestedOrientation::SensorPortrait,
            Self::LockedCurrent => RequestedOrientation::Locked(current),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Sensor => "sensor",
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::LockedCurrent => "locked_current",
        }
    }
}

impl fmt::Display for OrientationLockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrientationLockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "user" => Ok(Self::Free),
            "sensor" => Ok(Self::Sensor),
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            "locked_current" | "locked" => Ok(Self::LockedCurrent),
            other => Err(format!("unknown orientation mode: {other}")),
        }
    }
}

/// What the window system is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestedOrientation {
    User,
    FullSensor,
    SensorLandscape,
    SensorPortrait,
    Locked(ScreenOrientation),
}

impl RequestedOrientation {
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

/// Requested orientation and the default it returns to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationPolicy {
    default_mode: OrientationLockMode,
    requested: RequestedOrientation,
}

impl OrientationPolicy {
    /// Start in `default_mode`, resolved against the current orientation.
    #[must_use]
    pub const fn new(default_mode: OrientationLockMode, current: ScreenOrientation) -> Self {
        Self {
            default_mode,
            requested: default_mode.requested(current),
        }
    }

    #[must_use]
    pub const fn default_mode(&self) -> OrientationLockMode {
        self.default_mode
    }

    #[must_use]
    pub const fn requested(&self) -> RequestedOrientation {
        self.requested
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.requested.is_locked()
    }

    /// Toggle between a lock on `current` and the configured default.
    ///
    /// From a lock this restores the default; a `LockedCurrent` default
    /// restores free rotation so the toggle never re-locks.
    pub fn toggle(&mut self, current: ScreenOrientation) -> RequestedOrientation {
        self.requested = if self.requested.is_locked() {
            self.unlocked_default(current)
        } else {
            RequestedOrientation::Locked(current)
        };
        tracing::debug!(requested = ?self.requested, "orientation toggled");
        self.requested
    }

    /// Lock `current` unless already locked.
    pub fn lock_current(&mut self, current: ScreenOrientation) -> RequestedOrientation {
        if !self.requested.is_locked() {
            self.requested = RequestedOrientation::Locked(current);
        }
        self.requested
    }

    /// Put back a previously saved request.
    pub fn restore(&mut self, requested: RequestedOrientation) {
        self.requested = requested;
    }

    fn unlocked_default(&self, current: ScreenOrientation) -> RequestedOrientation {
        match self.default_mode {
            OrientationLockMode::LockedCurrent => RequestedOrientation::User,
            mode => mode.requested(current),
        }
    }
}
