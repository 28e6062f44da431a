#![forbid(unsafe_code)]

//! Pure numeric mappings from drag geometry to playback effects.
//!
//! Every function here is side-effect free and total: degenerate inputs
//! (zero ranges, zero density, NaN-free infinities) map to a neutral result
//! instead of panicking.
//!
//! # Seek curve
//!
//! ```text
//! jump(g, n) = sign(g) * (600_000 * (g / 8)^4 + 3_000) / max(1, n)
//! ```
//!
//! `g` is the horizontal drag in centimetres and `n` the seek streak
//! divisor. An 8 cm drag maps to roughly ten minutes; a short drag still
//! moves three seconds.
//!
//! # Invariants
//!
//! 1. `seek_jump_millis` is non-decreasing in `|g|` for fixed `n`.
//! 2. `seek_jump_millis` is non-increasing in `n` for fixed `g`.
//! 3. `clamp_jump(j, t, len)` keeps `t + j` inside `[0, len]` whenever
//!    `t` already was.

/// `|dy/dx|` above which a drag counts as vertical.
pub const VERTICAL_DOMINANCE: f32 = 2.0;

/// Fraction of the vertical range a drag must cover before it counts.
pub const MOTION_GUARD_RATIO: f32 = 0.05;

/// Reference drag length (cm) for the quartic seek curve.
pub const SEEK_REFERENCE_CM: f64 = 8.0;

/// Seek distance (ms) reached at the reference drag length.
pub const SEEK_CURVE_SPAN_MS: f64 = 600_000.0;

/// Seek distance (ms) added to every non-zero drag.
pub const SEEK_FLOOR_MS: f64 = 3_000.0;

/// Field of view (degrees) used to scale pinch zoom.
pub const DEFAULT_FOV: f32 = 80.0;

/// Narrowest allowed field of view in degrees.
pub const MIN_FOV: f32 = 20.0;

/// Widest allowed field of view in degrees.
pub const MAX_FOV: f32 = 150.0;

/// Ratio `|dy/dx|` of a drag.
///
/// A purely vertical drag (`dx == 0`) yields `f32::INFINITY` so it always
/// classifies as vertical-dominant.
#[must_use]
pub fn gesture_coefficient(dx: f32, dy: f32) -> f32 {
    if dx == 0.0 {
        return f32::INFINITY;
    }
    (dy / dx).abs()
}

/// Whether a drag with this coefficient is a volume/brightness candidate.
#[inline]
#[must_use]
pub fn is_vertical_dominant(coefficient: f32) -> bool {
    coefficient > VERTICAL_DOMINANCE
}

/// Whether a vertical displacement is large enough to act on.
#[must_use]
pub fn passes_motion_guard(dy: f32, vertical_range: f32) -> bool {
    if vertical_range <= 0.0 {
        return false;
    }
    (dy / vertical_range).abs() >= MOTION_GUARD_RATIO
}

/// Seek offset in milliseconds for a drag of `gesture_cm`.
///
/// `repeat_count` divides the result so consecutive same-direction seeks
/// get finer; zero is treated as one.
#[must_use]
pub fn seek_jump_millis(gesture_cm: f32, repeat_count: u32) -> i64 {
    if gesture_cm == 0.0 || !gesture_cm.is_finite() {
        return 0;
    }
    let g = f64::from(gesture_cm);
    let magnitude = SEEK_CURVE_SPAN_MS * (g / SEEK_REFERENCE_CM).powi(4) + SEEK_FLOOR_MS;
    let divisor = f64::from(repeat_count.max(1));
    (g.signum() * magnitude / divisor) as i64
}

/// Clamp `jump` so that `time + jump` stays within `[0, length]`.
#[must_use]
pub fn clamp_jump(jump: i64, time: i64, length: i64) -> i64 {
    if jump > 0 && time.saturating_add(jump) > length {
        length - time
    } else if jump < 0 && time.saturating_add(jump) < 0 {
        -time
    } else {
        jump
    }
}

/// Volume change for a vertical drag of `dy` pixels.
///
/// Dragging up (negative `dy`) raises the volume; a full-height drag spans
/// `max_volume`.
#[must_use]
pub fn volume_delta(dy: f32, screen_height: f32, max_volume: u32) -> f32 {
    if screen_height <= 0.0 {
        return 0.0;
    }
    -dy / screen_height * max_volume as f32
}

/// Multiplier applied to the volume ceiling when audio boost is enabled.
#[inline]
#[must_use]
pub const fn boost_factor(audio_boost: bool) -> u32 {
    if audio_boost { 2 } else { 1 }
}

/// Clamp a fractional volume level to `[0, max * boost]`.
#[must_use]
pub fn clamp_volume(level: f32, max_volume: u32, audio_boost: bool) -> u32 {
    let ceiling = max_volume.saturating_mul(boost_factor(audio_boost));
    if level.is_nan() || level <= 0.0 {
        return 0;
    }
    (level as u32).min(ceiling)
}

/// Brightness change in `[-1, 1]` for a vertical drag of `dy` pixels.
#[must_use]
pub fn brightness_delta(dy: f32, vertical_range: f32) -> f32 {
    if vertical_range <= 0.0 {
        return 0.0;
    }
    (-dy / vertical_range).clamp(-1.0, 1.0)
}

/// Yaw and pitch (degrees) for a viewpoint drag step.
///
/// Both axes are normalised by the horizontal range so rotation speed is
/// the same in either direction.
#[must_use]
pub fn viewpoint_delta(fov: f32, dx: f32, dy: f32, x_range: f32) -> (f32, f32) {
    if x_range <= 0.0 {
        return (0.0, 0.0);
    }
    (fov * -dx / x_range, fov * -dy / x_range)
}

/// Field-of-view change for a pinch step with relative `scale_factor`.
#[must_use]
pub fn pinch_fov_delta(scale_factor: f32) -> f32 {
    DEFAULT_FOV * (1.0 - scale_factor)
}

/// Clamp a field of view to `[MIN_FOV, MAX_FOV]`.
#[must_use]
pub fn clamp_fov(fov: f32) -> f32 {
    fov.clamp(MIN_FOV, MAX_FOV)
}
