#![forbid(unsafe_code)]

//! Player configuration as data.
//!
//! [`PlayerConfig`] gathers every user-tunable setting of the control
//! surface so it can come from a settings file instead of code.
//!
//! # Loading
//!
//! ```toml
//! # playctl.toml
//! [gesture]
//! audio_boost = true
//! seek = false
//!
//! [overlay]
//! hud_delay_ms = -1
//!
//! [orientation]
//! mode = "landscape"
//! ```
//!
//! ```rust,ignore
//! let config = PlayerConfig::load_from_path("playctl.toml")?;
//! let config = PlayerConfig::from_json_str(json)?.with_env_overrides();
//! ```
//!
//! Precedence, lowest first: `Default`, file, environment
//! (`PLAYCTL_SEEK_BY_TAP`, `PLAYCTL_AUDIO_BOOST`,
//! `PLAYCTL_OVERLAY_TIMEOUT_MS`, `PLAYCTL_HUD_DELAY_MS`,
//! `PLAYCTL_CLONE_MODE`).

#[cfg(feature = "player-config")]
use std::path::Path;

#[cfg(feature = "player-config")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use playctl_core::event::TouchControls;
use playctl_core::gesture::{FlingConfig, GestureConfig};

use crate::orientation::OrientationLockMode;
use crate::output_router::RouterMode;
use crate::overlay::OverlayConfig;

/// Lowest window brightness the controller will set.
pub const MIN_BRIGHTNESS: f32 = 0.01;

// ---------------------------------------------------------------------------
// Top-level PlayerConfig
// ---------------------------------------------------------------------------

/// All tunable player settings.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct PlayerConfig {
    pub gesture: GesturePolicyConfig,
    pub overlay: OverlayPolicyConfig,
    pub orientation: OrientationPolicyConfig,
    pub output: OutputPolicyConfig,
    pub brightness: BrightnessPolicyConfig,
}

impl PlayerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "player-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, PlayerConfigError> {
        toml::from_str(s).map_err(PlayerConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "player-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PlayerConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PlayerConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "player-config")]
    pub fn from_json_str(s: &str) -> Result<Self, PlayerConfigError> {
        serde_json::from_str(s).map_err(PlayerConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "player-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PlayerConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(PlayerConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a `.toml` or `.json` file, apply environment overrides, and
    /// reject out-of-range values.
    #[cfg(feature = "player-config")]
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, PlayerConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("toml") => Self::from_toml_file(path)?,
            Some("json") => Self::from_json_file(path)?,
            _ => {
                return Err(PlayerConfigError::UnsupportedFormat(
                    path.display().to_string(),
                ));
            }
        };
        let config = config.with_env_overrides();
        let errors = config.validate();
        if errors.is_empty() {
            tracing::debug!(path = %path.display(), "player config loaded");
            Ok(config)
        } else {
            Err(PlayerConfigError::Validation(errors))
        }
    }

    /// Defaults plus environment overrides, clamped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides().validated()
    }

    /// Apply `PLAYCTL_*` environment variables on top of `self`.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup` (an environment stand-in).
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("PLAYCTL_SEEK_BY_TAP")
            && let Some(enabled) = parse_flag(&val)
        {
            self.gesture.seek_by_tap = enabled;
        }
        if let Some(val) = lookup("PLAYCTL_AUDIO_BOOST")
            && let Some(enabled) = parse_flag(&val)
        {
            self.gesture.audio_boost = enabled;
        }
        if let Some(val) = lookup("PLAYCTL_OVERLAY_TIMEOUT_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            self.overlay.timeout_ms = ms;
        }
        if let Some(val) = lookup("PLAYCTL_HUD_DELAY_MS")
            && let Ok(ms) = val.trim().parse::<i64>()
        {
            self.overlay.hud_delay_ms = ms;
        }
        if let Some(val) = lookup("PLAYCTL_CLONE_MODE")
            && let Some(enabled) = parse_flag(&val)
        {
            self.output.clone_mode = enabled;
        }
        self
    }

    /// Check every value is in range.
    ///
    /// Returns human readable problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let g = &self.gesture;

        if !(50..=2000).contains(&g.double_tap_timeout_ms) {
            errors.push(format!(
                "gesture.double_tap_timeout_ms must be in [50, 2000], got {}",
                g.double_tap_timeout_ms
            ));
        }
        if !g.touch_slop.is_finite() || g.touch_slop < 0.0 {
            errors.push(format!(
                "gesture.touch_slop must be >= 0, got {}",
                g.touch_slop
            ));
        }
        if g.double_tap_seek_ms <= 0 {
            errors.push(format!(
                "gesture.double_tap_seek_ms must be > 0, got {}",
                g.double_tap_seek_ms
            ));
        }
        if !positive(g.fling_min_distance_cm) {
            errors.push(format!(
                "gesture.fling_min_distance_cm must be > 0, got {}",
                g.fling_min_distance_cm
            ));
        }
        if !positive(g.fling_min_velocity) {
            errors.push(format!(
                "gesture.fling_min_velocity must be > 0, got {}",
                g.fling_min_velocity
            ));
        }

        if self.overlay.timeout_ms == 0 {
            errors.push("overlay.timeout_ms must be > 0".into());
        }
        if self.overlay.hud_delay_ms < -1 {
            errors.push(format!(
                "overlay.hud_delay_ms must be -1, 0 or positive, got {}",
                self.overlay.hud_delay_ms
            ));
        }

        let b = self.brightness.initial;
        if !(MIN_BRIGHTNESS..=1.0).contains(&b) {
            errors.push(format!("brightness.initial must be in [0.01, 1], got {b}"));
        }

        errors
    }

    /// Clamp out-of-range values to the nearest sane one.
    #[must_use]
    pub fn validated(mut self) -> Self {
        let problems = self.validate();
        if problems.is_empty() {
            return self;
        }
        for problem in &problems {
            tracing::warn!(problem = problem.as_str(), "player config value replaced");
        }

        let defaults = GesturePolicyConfig::default();
        let g = &mut self.gesture;
        g.double_tap_timeout_ms = g.double_tap_timeout_ms.clamp(50, 2000);
        if !g.touch_slop.is_finite() || g.touch_slop < 0.0 {
            g.touch_slop = defaults.touch_slop;
        }
        if g.double_tap_seek_ms <= 0 {
            g.double_tap_seek_ms = defaults.double_tap_seek_ms;
        }
        if !positive(g.fling_min_distance_cm) {
            g.fling_min_distance_cm = defaults.fling_min_distance_cm;
        }
        if !positive(g.fling_min_velocity) {
            g.fling_min_velocity = defaults.fling_min_velocity;
        }

        if self.overlay.timeout_ms == 0 {
            self.overlay.timeout_ms = OverlayPolicyConfig::default().timeout_ms;
        }
        self.overlay.hud_delay_ms = self.overlay.hud_delay_ms.max(-1);

        self.brightness.initial = if self.brightness.initial.is_nan() {
            BrightnessPolicyConfig::default().initial
        } else {
            self.brightness.initial.clamp(MIN_BRIGHTNESS, 1.0)
        };
        self
    }

    /// Enabled gesture families.
    #[must_use]
    pub fn touch_controls(&self) -> TouchControls {
        let mut controls = TouchControls::NONE;
        controls.set(TouchControls::VOLUME, self.gesture.volume);
        controls.set(TouchControls::BRIGHTNESS, self.gesture.brightness);
        controls.set(TouchControls::SEEK, self.gesture.seek);
        controls
    }

    /// Build a [`GestureConfig`] from this config.
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        let g = &self.gesture;
        GestureConfig {
            seek_by_tap: g.seek_by_tap,
            audio_boost: g.audio_boost,
            double_tap_timeout: Duration::from_millis(g.double_tap_timeout_ms),
            touch_slop: g.touch_slop,
            double_tap_seek_ms: g.double_tap_seek_ms,
            seek_streak_window: Duration::from_millis(g.seek_streak_window_ms),
            fling: FlingConfig {
                enabled: g.fling_enabled,
                max_duration: Duration::from_millis(g.fling_max_duration_ms),
                min_distance_cm: g.fling_min_distance_cm,
                min_velocity: g.fling_min_velocity,
            },
            ..GestureConfig::default()
        }
    }

    /// Build an [`OverlayConfig`] from this config.
    #[must_use]
    pub fn to_overlay_config(&self) -> OverlayConfig {
        OverlayConfig {
            default_timeout: Duration::from_millis(self.overlay.timeout_ms),
            hud_delay_ms: self.overlay.hud_delay_ms,
            fade_after_play: Duration::from_millis(self.overlay.fade_after_play_ms),
        }
    }

    /// Build a [`RouterMode`] from this config.
    #[must_use]
    pub fn to_router_mode(&self) -> RouterMode {
        RouterMode {
            clone_mode: self.output.clone_mode,
            audio_only: self.output.audio_only,
            benchmark: self.output.benchmark,
        }
    }
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Touch gesture settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct GesturePolicyConfig {
    /// Vertical swipes change volume. Default: true.
    pub volume: bool,
    /// Vertical swipes change brightness. Default: true.
    pub brightness: bool,
    /// Horizontal drags and double taps seek. Default: true.
    pub seek: bool,
    /// Double tap seeks or toggles playback. Default: true.
    pub seek_by_tap: bool,
    /// Volume may go to twice the device maximum. Default: false.
    pub audio_boost: bool,
    /// Default: 300.
    pub double_tap_timeout_ms: u64,
    /// Default: 24.0.
    pub touch_slop: f32,
    /// Default: 10000.
    pub double_tap_seek_ms: i64,
    /// Default: 750.
    pub seek_streak_window_ms: u64,
    /// Default: true.
    pub fling_enabled: bool,
    /// Default: 300.
    pub fling_max_duration_ms: u64,
    /// Default: 2.0.
    pub fling_min_distance_cm: f32,
    /// Pixels per second. Default: 3000.
    pub fling_min_velocity: f32,
}

impl Default for GesturePolicyConfig {
    fn default() -> Self {
        Self {
            volume: true,
            brightness: true,
            seek: true,
            seek_by_tap: true,
            audio_boost: false,
            double_tap_timeout_ms: 300,
            touch_slop: 24.0,
            double_tap_seek_ms: 10_000,
            seek_streak_window_ms: 750,
            fling_enabled: true,
            fling_max_duration_ms: 300,
            fling_min_distance_cm: 2.0,
            fling_min_velocity: 3000.0,
        }
    }
}

/// Overlay timing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct OverlayPolicyConfig {
    /// Default auto-hide. Default: 4000.
    pub timeout_ms: u64,
    /// `-1` never hides, `0` uses `timeout_ms`. Default: 0.
    pub hud_delay_ms: i64,
    /// Default: 300.
    pub fade_after_play_ms: u64,
}

impl Default for OverlayPolicyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 4000,
            hud_delay_ms: 0,
            fade_after_play_ms: 300,
        }
    }
}

/// Orientation default.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct OrientationPolicyConfig {
    pub mode: OrientationLockMode,
}

/// Output routing switches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct OutputPolicyConfig {
    /// Never use a presentation display. Default: false.
    pub clone_mode: bool,
    /// Default: false.
    pub audio_only: bool,
    /// Default: false.
    pub benchmark: bool,
}

/// Window brightness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "player-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "player-config", serde(default))]
pub struct BrightnessPolicyConfig {
    /// Level used when the window reports none. Default: 0.5.
    pub initial: f32,
}

impl Default for BrightnessPolicyConfig {
    fn default() -> Self {
        Self { initial: 0.5 }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors loading a player configuration.
#[derive(Debug)]
pub enum PlayerConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "player-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "player-config")]
    Json(serde_json::Error),
    /// File extension is neither `.toml` nor `.json`.
    UnsupportedFormat(String),
    /// Values out of range.
    Validation(Vec<String>),
}

impl std::fmt::Display for PlayerConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "player-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "player-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported config format: {path}")
            }
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for PlayerConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "player-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "player-config")]
            Self::Json(e) => Some(e),
            Self::UnsupportedFormat(_) | Self::Validation(_) => None,
        }
    }
}

/// Finite and strictly greater than zero.
fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_component_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.to_gesture_config(), GestureConfig::default());
        assert_eq!(config.to_overlay_config(), OverlayConfig::default());
        assert_eq!(config.to_router_mode(), RouterMode::default());
        assert_eq!(config.touch_controls(), TouchControls::all());
    }

    #[test]
    fn default_validates_clean() {
        let errors = PlayerConfig::default().validate();
        assert!(errors.is_empty(), "default should validate: {errors:?}");
    }

    #[test]
    fn touch_controls_from_flags() {
        let mut config = PlayerConfig::default();
        config.gesture.volume = false;
        config.gesture.seek = false;
        assert_eq!(config.touch_controls(), TouchControls::BRIGHTNESS);
    }

    #[test]
    fn env_overrides_apply() {
        let config = PlayerConfig::default().with_overrides(env(&[
            ("PLAYCTL_SEEK_BY_TAP", "0"),
            ("PLAYCTL_AUDIO_BOOST", "true"),
            ("PLAYCTL_OVERLAY_TIMEOUT_MS", "2500"),
            ("PLAYCTL_HUD_DELAY_MS", "-1"),
            ("PLAYCTL_CLONE_MODE", "yes"),
        ]));
        assert!(!config.gesture.seek_by_tap);
        assert!(config.gesture.audio_boost);
        assert_eq!(config.overlay.timeout_ms, 2500);
        assert_eq!(config.overlay.hud_delay_ms, -1);
        assert!(config.output.clone_mode);
    }

    #[test]
    fn unparseable_env_values_are_skipped() {
        let config = PlayerConfig::default().with_overrides(env(&[
            ("PLAYCTL_AUDIO_BOOST", "maybe"),
            ("PLAYCTL_OVERLAY_TIMEOUT_MS", "soon"),
        ]));
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut config = PlayerConfig::default();
        config.gesture.double_tap_timeout_ms = 5;
        config.gesture.touch_slop = -1.0;
        config.overlay.hud_delay_ms = -7;
        config.brightness.initial = 3.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("double_tap_timeout_ms")));
        assert!(errors.iter().any(|e| e.contains("brightness.initial")));
    }

    #[test]
    fn nan_thresholds_are_reported_and_replaced() {
        let mut config = PlayerConfig::default();
        config.gesture.fling_min_distance_cm = f32::NAN;
        config.gesture.fling_min_velocity = f32::NAN;
        config.brightness.initial = f32::NAN;
        let errors = config.validate();
        assert_eq!(errors.len(), 3, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("fling_min_velocity")));

        let fixed = config.validated();
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed.gesture.fling_min_distance_cm, 2.0);
        assert_eq!(fixed.gesture.fling_min_velocity, 3000.0);
        assert_eq!(fixed.brightness.initial, 0.5);
    }

    #[test]
    fn validated_clamps() {
        let mut config = PlayerConfig::default();
        config.gesture.double_tap_timeout_ms = 10_000;
        config.gesture.fling_min_velocity = 0.0;
        config.overlay.timeout_ms = 0;
        config.overlay.hud_delay_ms = -50;
        config.brightness.initial = 0.0;
        let fixed = config.validated();
        assert!(fixed.validate().is_empty());
        assert_eq!(fixed.gesture.double_tap_timeout_ms, 2000);
        assert_eq!(fixed.gesture.fling_min_velocity, 3000.0);
        assert_eq!(fixed.overlay.timeout_ms, 4000);
        assert_eq!(fixed.overlay.hud_delay_ms, -1);
        assert_eq!(fixed.brightness.initial, MIN_BRIGHTNESS);
    }

    #[test]
    fn error_display() {
        let e = PlayerConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "validation errors: a; b");
        let e = PlayerConfigError::UnsupportedFormat("x.ini".into());
        assert!(e.to_string().contains("x.ini"));
        assert!(std::error::Error::source(&e).is_none());
    }

    #[cfg(feature = "player-config")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PlayerConfig::from_toml_str(
            r#"
            [gesture]
            audio_boost = true

            [orientation]
            mode = "landscape"
            "#,
        )
        .expect("valid toml");
        assert!(config.gesture.audio_boost);
        assert!(config.gesture.seek_by_tap);
        assert_eq!(config.orientation.mode, OrientationLockMode::Landscape);
        assert_eq!(config.overlay, OverlayPolicyConfig::default());
    }

    #[cfg(feature = "player-config")]
    #[test]
    fn json_round_trip() {
        let mut config = PlayerConfig::default();
        config.output.benchmark = true;
        let json = serde_json::to_string(&config).expect("serializes");
        assert_eq!(PlayerConfig::from_json_str(&json).expect("parses"), config);
    }

    #[cfg(feature = "player-config")]
    #[test]
    fn bad_toml_is_an_error() {
        let err = PlayerConfig::from_toml_str("[gesture\n").unwrap_err();
        assert!(matches!(err, PlayerConfigError::Toml(_)));
    }
}
