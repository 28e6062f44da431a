#![forbid(unsafe_code)]

//! Game controller stick mapping.
//!
//! Analog sticks repeat continuously while held, so [`AxisMapper`] rate
//! limits them to one action per [`AxisConfig::input_delay`]. The left
//! stick seeks (horizontal) or changes brightness (vertical); the right
//! stick changes volume. D-pad hats are left to the host's key handling.

use web_time::{Duration, Instant};

use crate::action::GestureAction;
use crate::event::AxisEvent;

/// Dead zone and pacing for stick input.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisConfig {
    /// Minimum time between two actions (default: 300ms).
    pub input_delay: Duration,
    /// Deflection below which a stick is considered centred (default: 0.3).
    pub dead_zone: f32,
    /// Relative seek per horizontal deflection (default: 10s).
    pub seek_step_ms: i64,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            input_delay: Duration::from_millis(300),
            dead_zone: 0.3,
            seek_step_ms: 10_000,
        }
    }
}

/// Rate-limited stick to action mapper.
#[derive(Debug, Clone, Default)]
pub struct AxisMapper {
    config: AxisConfig,
    last_action: Option<Instant>,
}

impl AxisMapper {
    #[must_use]
    pub fn new(config: AxisConfig) -> Self {
        Self {
            config,
            last_action: None,
        }
    }

    /// Map one axis sample.
    ///
    /// `volume` and `max_volume` are the engine's current and maximum
    /// volume steps; the resulting level never exceeds `max_volume`.
    pub fn map(
        &mut self,
        event: &AxisEvent,
        volume: u32,
        max_volume: u32,
        now: Instant,
    ) -> Option<GestureAction> {
        if event.hat_x.abs() == 1.0 || event.hat_y.abs() == 1.0 {
            return None;
        }
        if self
            .last_action
            .is_some_and(|t| now.saturating_duration_since(t) <= self.config.input_delay)
        {
            return None;
        }
        self.last_action = Some(now);

        let dz = self.config.dead_zone;
        if event.x.abs() > dz {
            let sign = if event.x > 0.0 { 1 } else { -1 };
            Some(GestureAction::SeekBy {
                delta_ms: sign * self.config.seek_step_ms,
            })
        } else if event.y.abs() > dz {
            Some(GestureAction::AdjustBrightness {
                delta: -event.y / 10.0,
            })
        } else if event.rz.abs() > dz {
            let delta = -(event.rz / 7.0 * max_volume as f32) as i64;
            let level = (i64::from(volume) + delta).clamp(0, i64::from(max_volume));
            Some(GestureAction::SetVolume {
                level: level as u32,
            })
        } else {
            None
        }
    }
}
