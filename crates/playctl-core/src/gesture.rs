#![forbid(unsafe_code)]

//! Gesture classification: turns a touch stream into playback actions.
//!
//! [`GestureClassifier`] consumes one finger-down-to-up session at a time
//! and decides, from the first significant movement, whether the session is
//! a volume swipe, a brightness swipe, a seek drag, or a viewpoint drag.
//! Pinch events and double taps are tracked alongside.
//!
//! # State Machine
//!
//! ```text
//!            ┌──────── Volume ───────┐
//!            │                       │
//! DOWN → None ─── Brightness ────────┼─→ UP / CANCEL → SessionEnded(kind)
//!            │                       │
//!            ├──────── Seek ─────────┤
//!            ├──── ViewpointDrag ────┤
//!            ├────── PinchZoom ──────┤
//!            └──────── Ignore ───────┘
//! ```
//!
//! Priority short-circuits, checked at DOWN:
//!
//! 1. A pinch in progress swallows the session, also when it begins
//!    after DOWN.
//! 2. An open options/playlist panel swallows the session; a tap closes it.
//! 3. Locked screen or no touch controls swallows the session; the final
//!    UP still toggles the overlay.
//!
//! # Invariants
//!
//! 1. Classification leaves `None` at most once per session and never
//!    changes afterwards.
//! 2. Every session that saw a DOWN ends with exactly one
//!    [`GestureAction::SessionEnded`].
//! 3. A seek only happens on UP. MOVE produces previews.
//! 4. After CANCEL nothing else is emitted for that session.
//!
//! # Failure Modes
//!
//! - Missing capability (no seek flag, non-seekable stream) degrades the
//!   session to `Ignore`, optionally with a [`Notice`].
//! - MOVE/UP without a preceding DOWN are dropped.
//! - A DOWN while a session is open closes the stale session first.

use std::rc::Rc;

use web_time::{Duration, Instant};

use crate::action::{
    ActionKind, GestureAction, Notice, OverlayPanel, SeekDirection, SwipeDirection, VideoScale,
};
use crate::event::{PinchEvent, PinchPhase, TouchControls, TouchEvent, TouchPhase};
use crate::geometry::{HorizontalThird, Point, ScreenMetrics, TapZone};
use crate::playback::PlaybackFacade;
use crate::seek_math;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fling (fast swipe) thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct FlingConfig {
    /// Disable to treat every fast swipe as an ordinary drag.
    pub enabled: bool,
    /// Longest DOWN→UP duration that still counts (default: 300ms).
    pub max_duration: Duration,
    /// Shortest travel in centimetres (default: 2.0).
    pub min_distance_cm: f32,
    /// Minimum average speed in pixels per second (default: 3000).
    pub min_velocity: f32,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_duration: Duration::from_millis(300),
            min_distance_cm: 2.0,
            min_velocity: 3000.0,
        }
    }
}

/// Thresholds and feature switches for the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Double tap seeks (side zones) or toggles playback (centre).
    pub seek_by_tap: bool,
    /// Allow volume up to twice the device maximum.
    pub audio_boost: bool,
    /// Window for consecutive taps (default: 300ms).
    pub double_tap_timeout: Duration,
    /// Movement in pixels below which a touch is still a tap (default: 24).
    pub touch_slop: f32,
    /// Offset of one double-tap seek (default: 10s).
    pub double_tap_seek_ms: i64,
    /// How long a seek streak survives after the last seek (default: 750ms).
    pub seek_streak_window: Duration,
    /// Edge band reserved for system gestures, as a surface fraction.
    pub edge_exclusion_ratio: f32,
    /// Shortest horizontal drag in centimetres that seeks (default: 1.0).
    pub min_seek_cm: f32,
    pub fling: FlingConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            seek_by_tap: true,
            audio_boost: false,
            double_tap_timeout: Duration::from_millis(300),
            touch_slop: 24.0,
            double_tap_seek_ms: 10_000,
            seek_streak_window: Duration::from_millis(750),
            edge_exclusion_ratio: 0.05,
            min_seek_cm: 1.0,
            fling: FlingConfig::default(),
        }
    }
}

impl GestureConfig {
    /// Set whether double tap acts.
    #[must_use]
    pub fn with_seek_by_tap(mut self, enabled: bool) -> Self {
        self.seek_by_tap = enabled;
        self
    }

    /// Set the audio boost capability.
    #[must_use]
    pub fn with_audio_boost(mut self, enabled: bool) -> Self {
        self.audio_boost = enabled;
        self
    }

    /// Set fling thresholds.
    #[must_use]
    pub fn with_fling(mut self, fling: FlingConfig) -> Self {
        self.fling = fling;
        self
    }
}

/// UI state the classifier needs for each event.
///
/// Supplied by the caller on every call so the classifier never holds a
/// stale copy of overlay or output state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiModes {
    /// Screen lock active.
    pub locked: bool,
    /// Field of view of a spherical video, `0` for flat video.
    pub fov: f32,
    /// Options panel shown.
    pub options_showing: bool,
    /// Playlist panel shown.
    pub playlist_showing: bool,
    /// Gesture families the user enabled.
    pub touch_controls: TouchControls,
    /// Video is on the device screen (no presentation or renderer).
    pub primary_output: bool,
    /// Current frame fit, consulted by pinch.
    pub video_scale: VideoScale,
}

impl Default for UiModes {
    fn default() -> Self {
        Self {
            locked: false,
            fov: 0.0,
            options_showing: false,
            playlist_showing: false,
            touch_controls: TouchControls::all(),
            primary_output: true,
            video_scale: VideoScale::BestFit,
        }
    }
}

impl UiModes {
    /// Spherical viewing mode.
    #[must_use]
    pub fn viewpoint_active(&self) -> bool {
        self.fov > 0.0
    }

    fn open_panel(&self) -> Option<OverlayPanel> {
        if self.playlist_showing {
            Some(OverlayPanel::Playlist)
        } else if self.options_showing {
            Some(OverlayPanel::Options)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Why a session stopped producing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Swallow {
    Pinch,
    Panel(OverlayPanel),
    Locked,
}

/// Running volume level of a volume session.
#[derive(Debug, Clone)]
struct VolumeRamp {
    level: f32,
    started_at: u32,
    ceiling: u32,
    boost_noticed: bool,
}

/// One finger-down-to-up interaction.
#[derive(Debug, Clone)]
pub struct GestureSession {
    initial: Point,
    last: Point,
    started_at: Instant,
    kind: ActionKind,
    tap_repeat_count: u32,
    moved: bool,
    seek_direction: Option<SeekDirection>,
    swallow: Option<Swallow>,
    volume: Option<VolumeRamp>,
}

impl GestureSession {
    fn new(at: Point, now: Instant, tap_repeat_count: u32) -> Self {
        Self {
            initial: at,
            last: at,
            started_at: now,
            kind: ActionKind::None,
            tap_repeat_count,
            moved: false,
            seek_direction: None,
            swallow: None,
            volume: None,
        }
    }

    /// Where the finger went down.
    #[must_use]
    pub fn initial_point(&self) -> Point {
        self.initial
    }

    /// Anchor for incremental effects.
    #[must_use]
    pub fn last_point(&self) -> Point {
        self.last
    }

    /// Current classification.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Seek streak divisor in effect for this session.
    #[must_use]
    pub fn tap_repeat_count(&self) -> u32 {
        self.tap_repeat_count
    }

    /// Leave `None` exactly once.
    fn classify(&mut self, kind: ActionKind) {
        if self.kind == ActionKind::None {
            self.kind = kind;
        }
    }
}

/// Consecutive same-direction seeks across sessions.
#[derive(Debug, Clone, Default)]
struct SeekStreak {
    count: u32,
    direction: Option<SeekDirection>,
    last_seek: Option<Instant>,
}

impl SeekStreak {
    fn is_live(&self, now: Instant, window: Duration) -> bool {
        self.last_seek
            .is_some_and(|t| now.saturating_duration_since(t) <= window)
    }

    fn live_count(&self, now: Instant, window: Duration) -> u32 {
        if self.is_live(now, window) {
            self.count
        } else {
            0
        }
    }

    fn live_direction(&self, now: Instant, window: Duration) -> Option<SeekDirection> {
        if self.is_live(now, window) {
            self.direction
        } else {
            None
        }
    }

    fn record(&mut self, count: u32, direction: SeekDirection, now: Instant) {
        self.count = count;
        self.direction = Some(direction);
        self.last_seek = Some(now);
    }
}

/// Multi-tap detection state.
#[derive(Debug, Clone, Default)]
struct TapTracker {
    count: u32,
    last_tap: Option<Instant>,
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Stateful classifier for touch and pinch input on the video surface.
///
/// Call [`process`](GestureClassifier::process) for each touch event and
/// [`process_pinch`](GestureClassifier::process_pinch) for scale-detector
/// events. Both return the actions to apply, in order.
pub struct GestureClassifier {
    config: GestureConfig,
    playback: Rc<dyn PlaybackFacade>,
    screen: ScreenMetrics,
    session: Option<GestureSession>,
    streak: SeekStreak,
    taps: TapTracker,
    pinch_active: bool,
    pinch_scale: f32,
    saved_scale: Option<VideoScale>,
}

impl std::fmt::Debug for GestureClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureClassifier")
            .field("session", &self.session.as_ref().map(GestureSession::kind))
            .field("pinch_active", &self.pinch_active)
            .field("streak", &self.streak.count)
            .finish()
    }
}

impl GestureClassifier {
    /// Create a classifier reading playback state from `playback`.
    #[must_use]
    pub fn new(
        config: GestureConfig,
        playback: Rc<dyn PlaybackFacade>,
        screen: ScreenMetrics,
    ) -> Self {
        Self {
            config,
            playback,
            screen,
            session: None,
            streak: SeekStreak::default(),
            taps: TapTracker::default(),
            pinch_active: false,
            pinch_scale: 1.0,
            saved_scale: None,
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next session.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Update surface metrics after a resize or rotation.
    pub fn set_screen(&mut self, screen: ScreenMetrics) {
        self.screen = screen;
    }

    /// Current surface metrics.
    #[must_use]
    pub fn screen(&self) -> &ScreenMetrics {
        &self.screen
    }

    /// The open session, if a finger is down.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Whether a pinch is in progress.
    #[must_use]
    pub fn is_pinching(&self) -> bool {
        self.pinch_active
    }

    /// Whether the open session is a seek drag.
    #[must_use]
    pub fn is_seeking(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.kind == ActionKind::Seek)
    }

    /// Drop all state without emitting anything.
    pub fn reset(&mut self) {
        self.session = None;
        self.streak = SeekStreak::default();
        self.taps = TapTracker::default();
        self.pinch_active = false;
        self.pinch_scale = 1.0;
    }

    /// Process a touch event, returning the actions it produced.
    pub fn process(
        &mut self,
        event: &TouchEvent,
        modes: &UiModes,
        now: Instant,
    ) -> Vec<GestureAction> {
        let mut out = Vec::with_capacity(2);
        match event.phase {
            TouchPhase::Down => self.on_down(event.position, modes, now, &mut out),
            TouchPhase::Move => self.on_move(event.position, modes, now, &mut out),
            TouchPhase::Up => self.on_up(event.position, modes, now, &mut out),
            TouchPhase::Cancel => self.on_cancel(&mut out),
        }
        out
    }

    /// Process a scale-detector event.
    pub fn process_pinch(&mut self, event: &PinchEvent, modes: &UiModes) -> Vec<GestureAction> {
        let mut out = Vec::new();
        if modes.locked {
            return out;
        }
        match event.phase {
            PinchPhase::Begin => {
                if self.screen.x_range <= 0.0 && modes.viewpoint_active() {
                    return out;
                }
                self.pinch_active = true;
                self.pinch_scale = 1.0;
                if let Some(session) = self.session.as_mut() {
                    session.classify(ActionKind::PinchZoom);
                    session.swallow = Some(Swallow::Pinch);
                    session.volume = None;
                    if session.kind == ActionKind::Seek {
                        out.push(GestureAction::SeekFeedbackReset);
                    }
                }
            }
            PinchPhase::Update => {
                if !self.pinch_active {
                    return out;
                }
                self.pinch_scale *= event.scale_factor;
                if modes.viewpoint_active() {
                    let delta = seek_math::pinch_fov_delta(event.scale_factor);
                    if delta != 0.0 {
                        out.push(GestureAction::ZoomFov { delta });
                    }
                }
            }
            PinchPhase::End => {
                if !self.pinch_active {
                    return out;
                }
                self.pinch_active = false;
                self.pinch_scale *= event.scale_factor;
                if !modes.viewpoint_active()
                    && let Some(scale) = self.scale_after_pinch(modes.video_scale)
                {
                    out.push(GestureAction::SetVideoScale(scale));
                }
            }
        }
        out
    }

    fn scale_after_pinch(&mut self, current: VideoScale) -> Option<VideoScale> {
        let grow = self.pinch_scale > 1.0;
        let shrink = self.pinch_scale < 1.0;
        if grow && current != VideoScale::FitScreen {
            self.saved_scale = Some(current);
            Some(VideoScale::FitScreen)
        } else if shrink && let Some(saved) = self.saved_scale.take() {
            Some(saved)
        } else if shrink && current == VideoScale::FitScreen {
            Some(VideoScale::BestFit)
        } else {
            None
        }
    }

    // -----------------------------------------------------------------------
    // Touch phases
    // -----------------------------------------------------------------------

    fn on_down(&mut self, at: Point, modes: &UiModes, now: Instant, out: &mut Vec<GestureAction>) {
        if let Some(stale) = self.session.take() {
            out.push(GestureAction::SessionEnded(stale.kind));
        }

        let repeat = self
            .streak
            .live_count(now, self.config.seek_streak_window);
        let mut session = GestureSession::new(at, now, repeat);

        session.swallow = if self.pinch_active {
            Some(Swallow::Pinch)
        } else if let Some(panel) = modes.open_panel() {
            Some(Swallow::Panel(panel))
        } else if modes.locked || modes.touch_controls.is_empty() {
            Some(Swallow::Locked)
        } else {
            None
        };
        if session.swallow.is_some() {
            session.classify(ActionKind::Ignore);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            x = at.x,
            y = at.y,
            swallowed = session.swallow.is_some(),
            "gesture session started"
        );

        self.session = Some(session);
    }

    fn on_move(&mut self, at: Point, modes: &UiModes, now: Instant, out: &mut Vec<GestureAction>) {
        let slop = self.config.touch_slop;
        let pinching = self.pinch_active;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.moved && at.distance(session.initial) > slop {
            session.moved = true;
        }
        if pinching || session.swallow.is_some() {
            return;
        }

        let kind = session.kind;
        match kind {
            ActionKind::Ignore | ActionKind::PinchZoom => {}
            ActionKind::ViewpointDrag => self.rotate_viewpoint(at, modes, out),
            ActionKind::Volume => self.apply_volume(at, out),
            ActionKind::Brightness => self.apply_brightness(at, out),
            ActionKind::Seek => self.seek_move(at, now, out),
            ActionKind::None => self.classify_move(at, modes, now, out),
        }
    }

    fn on_up(&mut self, at: Point, modes: &UiModes, now: Instant, out: &mut Vec<GestureAction>) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        match session.swallow {
            Some(Swallow::Locked) => out.push(GestureAction::ToggleOverlay),
            Some(Swallow::Panel(panel)) => {
                if !session.moved && at.distance(session.initial) <= self.config.touch_slop {
                    out.push(GestureAction::ClosePanel(panel));
                }
            }
            Some(Swallow::Pinch) => {}
            None => match session.kind {
                ActionKind::None | ActionKind::Seek => {
                    if let Some(direction) = self.fling_direction(&session, at, now) {
                        if session.kind == ActionKind::Seek {
                            out.push(GestureAction::SeekFeedbackReset);
                        }
                        session.classify(ActionKind::Ignore);
                        out.push(GestureAction::Fling(direction));
                    } else if session.kind == ActionKind::Seek {
                        self.seek_commit(&session, at, now, out);
                    } else {
                        self.tap(&session, at, modes, now, out);
                    }
                }
                _ => {}
            },
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(kind = session.kind.as_str(), "gesture session ended");

        out.push(GestureAction::SessionEnded(session.kind));
    }

    fn on_cancel(&mut self, out: &mut Vec<GestureAction>) {
        if let Some(session) = self.session.take() {
            #[cfg(feature = "tracing")]
            tracing::debug!(kind = session.kind.as_str(), "gesture session cancelled");
            out.push(GestureAction::SessionEnded(session.kind));
        }
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    fn classify_move(
        &mut self,
        at: Point,
        modes: &UiModes,
        now: Instant,
        out: &mut Vec<GestureAction>,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if modes.viewpoint_active() {
            if session.moved {
                session.classify(ActionKind::ViewpointDrag);
                self.rotate_viewpoint(at, modes, out);
            }
            return;
        }

        let (dx, dy) = at.delta_from(session.last);
        let coefficient = seek_math::gesture_coefficient(dx, dy);
        let edge = self.config.edge_exclusion_ratio;

        if seek_math::is_vertical_dominant(coefficient)
            && !self.screen.in_vertical_edge(session.initial.y, edge)
            && modes.primary_output
        {
            if !seek_math::passes_motion_guard(dy, self.screen.y_range) {
                return;
            }
            let kind = vertical_kind(
                self.screen.third_of(session.initial.x),
                modes.touch_controls,
            );
            session.classify(kind);
            session.last = at;
            if kind == ActionKind::Volume {
                let started_at = self.playback.current_volume();
                let max = self.playback.max_volume();
                session.volume = Some(VolumeRamp {
                    level: started_at as f32,
                    started_at,
                    ceiling: max.saturating_mul(seek_math::boost_factor(self.config.audio_boost)),
                    boost_noticed: false,
                });
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(kind = kind.as_str(), coefficient, "vertical gesture classified");
            return;
        }

        if self.screen.in_right_edge(session.initial.x, edge) {
            return;
        }
        let gesture_cm = self.screen.px_to_cm(at.x - session.initial.x);
        if gesture_cm.abs() < self.config.min_seek_cm {
            return;
        }
        if !modes.touch_controls.contains(TouchControls::SEEK) {
            session.classify(ActionKind::Ignore);
            return;
        }
        if !self.playback.is_seekable() || self.playback.length() <= 0 {
            session.classify(ActionKind::Ignore);
            out.push(GestureAction::Notice(Notice::StreamNotSeekable));
            return;
        }
        session.classify(ActionKind::Seek);
        self.seek_move(at, now, out);
    }

    // -----------------------------------------------------------------------
    // Continuous effects
    // -----------------------------------------------------------------------

    fn rotate_viewpoint(&mut self, at: Point, modes: &UiModes, out: &mut Vec<GestureAction>) {
        let x_range = self.screen.x_range;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let (dx, dy) = at.delta_from(session.last);
        session.last = at;
        let (yaw, pitch) = seek_math::viewpoint_delta(modes.fov, dx, dy, x_range);
        if yaw != 0.0 || pitch != 0.0 {
            out.push(GestureAction::RotateViewpoint { yaw, pitch });
        }
    }

    fn apply_volume(&mut self, at: Point, out: &mut Vec<GestureAction>) {
        let y_range = self.screen.y_range;
        let max = self.playback.max_volume();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dy = at.y - session.last.y;
        session.last = at;
        let Some(ramp) = session.volume.as_mut() else {
            return;
        };
        let delta = seek_math::volume_delta(dy, y_range, max);
        if delta == 0.0 {
            return;
        }
        ramp.level = (ramp.level + delta).clamp(0.0, ramp.ceiling as f32);
        let mut level = seek_math::clamp_volume(ramp.level, max, self.config.audio_boost);
        if level > max && ramp.started_at < max {
            level = max;
            ramp.level = ramp.level.min(max as f32);
            if !ramp.boost_noticed {
                ramp.boost_noticed = true;
                out.push(GestureAction::Notice(Notice::AudioBoost));
            }
        }
        out.push(GestureAction::SetVolume { level });
    }

    fn apply_brightness(&mut self, at: Point, out: &mut Vec<GestureAction>) {
        let y_range = self.screen.y_range;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let dy = at.y - session.last.y;
        session.last = at;
        let delta = seek_math::brightness_delta(dy, y_range);
        if delta != 0.0 {
            out.push(GestureAction::AdjustBrightness { delta });
        }
    }

    // -----------------------------------------------------------------------
    // Seek
    // -----------------------------------------------------------------------

    fn seek_move(&mut self, at: Point, now: Instant, out: &mut Vec<GestureAction>) {
        let window = self.config.seek_streak_window;
        let min_cm = self.config.min_seek_cm;
        let streak_direction = self.streak.live_direction(now, window);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let gesture_cm = self.screen.px_to_cm(at.x - session.initial.x);
        if gesture_cm.abs() < min_cm {
            return;
        }
        let direction = if gesture_cm < 0.0 {
            SeekDirection::Backward
        } else {
            SeekDirection::Forward
        };

        let previous = session.seek_direction.or(streak_direction);
        if session.seek_direction.is_none() || previous != Some(direction) {
            if previous.is_some_and(|p| p != direction) {
                session.tap_repeat_count = 0;
                out.push(GestureAction::SeekFeedbackReset);
            }
            session.tap_repeat_count += 1;
        }
        session.seek_direction = Some(direction);

        let time = self.playback.current_time();
        let length = self.playback.length();
        let divisor = session.tap_repeat_count.max(1);
        let jump = seek_math::clamp_jump(
            seek_math::seek_jump_millis(gesture_cm, divisor),
            time,
            length,
        );
        out.push(GestureAction::SeekPreview {
            jump_ms: jump,
            target_ms: time + jump,
            divisor,
        });
    }

    fn seek_commit(
        &mut self,
        session: &GestureSession,
        at: Point,
        now: Instant,
        out: &mut Vec<GestureAction>,
    ) {
        let gesture_cm = self.screen.px_to_cm(at.x - session.initial.x);
        let Some(direction) = session.seek_direction else {
            return;
        };
        if gesture_cm.abs() < self.config.min_seek_cm
            || !self.playback.is_seekable()
            || self.playback.length() <= 0
        {
            return;
        }
        let time = self.playback.current_time();
        let length = self.playback.length();
        let divisor = session.tap_repeat_count.max(1);
        let jump = seek_math::clamp_jump(
            seek_math::seek_jump_millis(gesture_cm, divisor),
            time,
            length,
        );
        self.streak.record(divisor, direction, now);
        out.push(GestureAction::SeekCommit {
            target_ms: time + jump,
            jump_ms: jump,
        });
    }

    // -----------------------------------------------------------------------
    // Taps and flings
    // -----------------------------------------------------------------------

    fn tap(
        &mut self,
        session: &GestureSession,
        at: Point,
        modes: &UiModes,
        now: Instant,
        out: &mut Vec<GestureAction>,
    ) {
        let timeout = self.config.double_tap_timeout;
        let slop = self.config.touch_slop;
        let (dx, dy) = at.delta_from(session.initial);
        let held = now.saturating_duration_since(session.started_at);

        if held > timeout {
            self.taps = TapTracker::default();
        }
        if dx.abs() < slop && dy.abs() < slop {
            let quick = self
                .taps
                .last_tap
                .is_some_and(|t| now.saturating_duration_since(t) < timeout);
            self.taps.count = if self.taps.count > 0 && quick {
                self.taps.count + 1
            } else {
                1
            };
        } else {
            self.taps.count = 0;
        }
        self.taps.last_tap = Some(now);

        if self.taps.count > 1 && self.config.seek_by_tap && !modes.locked {
            self.double_tap(at, modes, now, out);
        } else {
            out.push(GestureAction::ToggleOverlay);
        }
    }

    fn double_tap(
        &mut self,
        at: Point,
        modes: &UiModes,
        now: Instant,
        out: &mut Vec<GestureAction>,
    ) {
        if !modes.touch_controls.contains(TouchControls::SEEK) {
            out.push(GestureAction::TogglePlayPause);
            return;
        }
        let direction = match self.screen.tap_zone(at.x) {
            TapZone::Rewind => SeekDirection::Backward,
            TapZone::Forward => SeekDirection::Forward,
            TapZone::Center => {
                out.push(GestureAction::TogglePlayPause);
                return;
            }
        };

        let window = self.config.seek_streak_window;
        let mut count = self.streak.live_count(now, window);
        if let Some(previous) = self.streak.live_direction(now, window)
            && previous != direction
        {
            count = 0;
            out.push(GestureAction::SeekFeedbackReset);
        }
        count += 1;
        self.streak.record(count, direction, now);
        out.push(GestureAction::DoubleTapSeek {
            delta_ms: direction.sign() * self.config.double_tap_seek_ms,
            repeat: count,
        });
    }

    fn fling_direction(
        &self,
        session: &GestureSession,
        at: Point,
        now: Instant,
    ) -> Option<SwipeDirection> {
        let fling = &self.config.fling;
        if !fling.enabled
            || self
                .screen
                .in_right_edge(session.initial.x, self.config.edge_exclusion_ratio)
        {
            return None;
        }
        let elapsed = now.saturating_duration_since(session.started_at);
        if elapsed > fling.max_duration {
            return None;
        }
        let distance = at.distance(session.initial);
        if self.screen.px_to_cm(distance) < fling.min_distance_cm {
            return None;
        }
        let secs = elapsed.as_secs_f32().max(0.001);
        if distance / secs < fling.min_velocity {
            return None;
        }
        let (dx, dy) = at.delta_from(session.initial);
        Some(SwipeDirection::of(dx, dy))
    }
}

/// Pick volume or brightness for a vertical swipe.
///
/// The right third prefers volume, the rest prefers brightness. A missing
/// capability falls back to the other one; with neither the session is
/// ignored.
fn vertical_kind(third: HorizontalThird, controls: TouchControls) -> ActionKind {
    let (preferred, fallback) = if third == HorizontalThird::Right {
        (
            (TouchControls::VOLUME, ActionKind::Volume),
            (TouchControls::BRIGHTNESS, ActionKind::Brightness),
        )
    } else {
        (
            (TouchControls::BRIGHTNESS, ActionKind::Brightness),
            (TouchControls::VOLUME, ActionKind::Volume),
        )
    };
    if controls.contains(preferred.0) {
        preferred.1
    } else if controls.contains(fallback.0) {
        fallback.1
    } else {
        ActionKind::Ignore
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
