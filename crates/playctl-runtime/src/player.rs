#![forbid(unsafe_code)]

//! Composition root of the control surface.
//!
//! [`PlayerController`] owns the classifier, the stick mapper, the overlay,
//! and the output router, and applies every [`GestureAction`] they produce:
//! effects go to the injected [`PlaybackFacade`], visibility changes to the
//! [`OverlayController`], and everything the host screen must do itself
//! (window brightness, dismissing the player, video scale) is published as
//! a [`HostRequest`].
//!
//! # Host outputs
//!
//! | Channel | Carries |
//! |---------|---------|
//! | [`gesture_events`](PlayerController::gesture_events) | `(kind, magnitude)` of each applied action |
//! | [`notices`](PlayerController::notices) | transient feedback text |
//! | [`host_requests`](PlayerController::host_requests) | work only the host can do |
//! | [`overlay_visibility`](PlayerController::overlay_visibility) | overlay shown / hidden |
//! | [`requires_rebuild`](PlayerController::requires_rebuild) | new output kind |

use std::rc::Rc;

use web_time::Instant;

use playctl_core::action::{
    ActionKind, GestureAction, Notice, OverlayPanel, SwipeDirection, VideoScale,
};
use playctl_core::axis::{AxisConfig, AxisMapper};
use playctl_core::event::{AxisEvent, PinchEvent, TouchControls, TouchEvent};
use playctl_core::geometry::ScreenMetrics;
use playctl_core::gesture::{GestureClassifier, UiModes};
use playctl_core::playback::{PlaybackFacade, TrackId};
use playctl_core::seek_math;

use crate::deferred::Ticket;
use crate::orientation::{OrientationPolicy, RequestedOrientation};
use crate::output_router::{
    DisplayId, OutputKind, OutputRouter, PresentationHost, RendererHandle,
};
use crate::overlay::{OverlayController, OverlayTimeout, OverlayView};
use crate::player_config::{MIN_BRIGHTNESS, PlayerConfig};
use crate::reactive::{Observable, Signal};

/// `onGestureAction(kind, magnitude)` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: ActionKind,
    pub magnitude: f32,
}

impl GestureEvent {
    fn of(action: &GestureAction) -> Self {
        Self {
            kind: action.kind(),
            magnitude: action.magnitude(),
        }
    }
}

/// Work the controller cannot do without the host window.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Set the window brightness, in `[0.01, 1]`.
    SetBrightness(f32),
    /// A fling asked to leave the player.
    Dismiss(SwipeDirection),
    /// Change how the frame fits the surface.
    SetVideoScale(VideoScale),
    /// Close an options or playlist panel.
    ClosePanel(OverlayPanel),
}

/// Routes input to effects for one player screen.
pub struct PlayerController {
    playback: Rc<dyn PlaybackFacade>,
    classifier: GestureClassifier,
    axis: AxisMapper,
    overlay: OverlayController,
    router: OutputRouter,
    controls: TouchControls,
    brightness: f32,
    fov: f32,
    video_scale: VideoScale,
    options_showing: bool,
    playlist_showing: bool,
    gestures: Signal<GestureEvent>,
    notices: Signal<Notice>,
    requests: Signal<HostRequest>,
}

impl std::fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerController")
            .field("overlay", &self.overlay)
            .field("router", &self.router)
            .field("brightness", &self.brightness)
            .field("fov", &self.fov)
            .finish()
    }
}

impl PlayerController {
    /// Build the control surface for one player screen.
    ///
    /// Out-of-range config values are replaced as by
    /// [`PlayerConfig::validated`].
    pub fn new(
        config: &PlayerConfig,
        playback: Rc<dyn PlaybackFacade>,
        screen: ScreenMetrics,
        presentation: Box<dyn PresentationHost>,
    ) -> Self {
        let config = config.clone().validated();
        let orientation = OrientationPolicy::new(config.orientation.mode, screen.orientation);
        let mut overlay =
            OverlayController::new(config.to_overlay_config(), orientation, screen.orientation);
        overlay.set_playing(playback.is_playing());
        overlay.set_seekable(playback.is_seekable());
        Self {
            classifier: GestureClassifier::new(
                config.to_gesture_config(),
                playback.clone(),
                screen,
            ),
            axis: AxisMapper::new(AxisConfig::default()),
            overlay,
            router: OutputRouter::new(config.to_router_mode(), presentation),
            controls: config.touch_controls(),
            brightness: config.brightness.initial,
            fov: 0.0,
            video_scale: VideoScale::default(),
            options_showing: false,
            playlist_showing: false,
            gestures: Signal::new(),
            notices: Signal::new(),
            requests: Signal::new(),
            playback,
        }
    }

    // -----------------------------------------------------------------------
    // Host bindings
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn gesture_events(&self) -> Signal<GestureEvent> {
        self.gestures.clone()
    }

    #[must_use]
    pub fn notices(&self) -> Signal<Notice> {
        self.notices.clone()
    }

    #[must_use]
    pub fn host_requests(&self) -> Signal<HostRequest> {
        self.requests.clone()
    }

    #[must_use]
    pub fn overlay_visibility(&self) -> Observable<bool> {
        self.overlay.visibility()
    }

    #[must_use]
    pub fn requires_rebuild(&self) -> Signal<OutputKind> {
        self.router.requires_rebuild()
    }

    #[must_use]
    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    #[must_use]
    pub fn router(&self) -> &OutputRouter {
        &self.router
    }

    #[must_use]
    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Current window brightness.
    #[must_use]
    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Field of view of a spherical video, `0` for flat video.
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[must_use]
    pub fn video_scale(&self) -> VideoScale {
        self.video_scale
    }

    /// Snapshot of the UI state the classifier needs.
    #[must_use]
    pub fn modes(&self) -> UiModes {
        UiModes {
            locked: self.overlay.is_locked(),
            fov: self.fov,
            options_showing: self.options_showing,
            playlist_showing: self.playlist_showing,
            touch_controls: self.controls,
            primary_output: self.router.kind() == OutputKind::Primary,
            video_scale: self.video_scale,
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed one touch sample and apply what it produced.
    pub fn on_touch(&mut self, event: &TouchEvent, now: Instant) -> Vec<GestureAction> {
        let modes = self.modes();
        let actions = self.classifier.process(event, &modes, now);
        self.apply_all(&actions, now);
        actions
    }

    /// Feed one scale-detector sample.
    pub fn on_pinch(&mut self, event: &PinchEvent, now: Instant) -> Vec<GestureAction> {
        let modes = self.modes();
        let actions = self.classifier.process_pinch(event, &modes);
        self.apply_all(&actions, now);
        actions
    }

    /// Feed one game controller sample. Ignored while locked.
    pub fn on_axis(&mut self, event: &AxisEvent, now: Instant) -> Option<GestureAction> {
        if self.overlay.is_locked() {
            return None;
        }
        let action = self.axis.map(
            event,
            self.playback.current_volume(),
            self.playback.max_volume(),
            now,
        )?;
        self.apply(&action, now);
        Some(action)
    }

    fn apply_all(&mut self, actions: &[GestureAction], now: Instant) {
        for action in actions {
            self.apply(action, now);
        }
    }

    fn apply(&mut self, action: &GestureAction, now: Instant) {
        if action.kind().is_vertical() && !action.is_session_end() {
            self.overlay.hide(true);
        }
        match action {
            GestureAction::ToggleOverlay => self.overlay.toggle(now),
            GestureAction::ClosePanel(panel) => {
                self.set_panel_showing(*panel, false);
                self.requests.emit(&HostRequest::ClosePanel(*panel));
            }
            GestureAction::SetVolume { level } => {
                self.playback.set_volume(*level);
                let max = self.playback.max_volume().max(1);
                self.notices.emit(&Notice::Volume {
                    percent: level * 100 / max,
                });
            }
            GestureAction::AdjustBrightness { delta } => self.adjust_brightness(*delta),
            GestureAction::SeekPreview {
                jump_ms,
                target_ms,
                divisor,
            } => self.notices.emit(&Notice::SeekPreview {
                jump_ms: *jump_ms,
                target_ms: *target_ms,
                divisor: *divisor,
            }),
            GestureAction::SeekCommit { target_ms, .. } => self.playback.seek_to(*target_ms),
            GestureAction::RotateViewpoint { yaw, pitch } => {
                self.playback.update_viewpoint(*yaw, *pitch, 0.0);
            }
            GestureAction::ZoomFov { delta } => {
                if self.fov > 0.0 && self.playback.update_viewpoint(0.0, 0.0, *delta) {
                    self.fov = seek_math::clamp_fov(self.fov + delta);
                }
            }
            GestureAction::SetVideoScale(scale) => {
                self.video_scale = *scale;
                self.requests.emit(&HostRequest::SetVideoScale(*scale));
            }
            GestureAction::DoubleTapSeek { delta_ms, repeat } => {
                self.seek_delta(*delta_ms, *repeat);
            }
            GestureAction::SeekBy { delta_ms } => self.seek_delta(*delta_ms, 1),
            GestureAction::TogglePlayPause => self.playback.toggle_play_pause(),
            GestureAction::Fling(direction) => {
                tracing::debug!(?direction, "fling, dismiss requested");
                self.requests.emit(&HostRequest::Dismiss(*direction));
            }
            GestureAction::Notice(notice) => {
                self.notices.emit(notice);
                return;
            }
            GestureAction::SeekFeedbackReset | GestureAction::SessionEnded(_) => {}
        }
        self.gestures.emit(&GestureEvent::of(action));
    }

    /// Relative seek with `±N s` feedback, `N` covering the whole streak.
    ///
    /// Unseekable streams only get a notice. The target never goes below 0.
    pub fn seek_delta(&mut self, delta_ms: i64, repeat: u32) {
        let length = self.playback.length();
        if !self.playback.is_seekable() || length <= 0 {
            self.notices.emit(&Notice::StreamNotSeekable);
            return;
        }
        let target = (self.playback.current_time() + delta_ms).clamp(0, length);
        self.playback.seek_to(target);
        self.notices.emit(&Notice::SeekStep {
            total_ms: delta_ms * i64::from(repeat.max(1)),
        });
    }

    fn adjust_brightness(&mut self, delta: f32) {
        let level = (self.brightness + delta).clamp(MIN_BRIGHTNESS, 1.0);
        if level == self.brightness {
            return;
        }
        self.brightness = level;
        self.requests.emit(&HostRequest::SetBrightness(level));
        self.notices.emit(&Notice::Brightness {
            percent: (level * 100.0).round() as u32,
        });
    }

    // -----------------------------------------------------------------------
    // Playback and tracks
    // -----------------------------------------------------------------------

    pub fn select_audio_track(&mut self, id: TrackId, now: Instant) {
        self.playback.select_audio_track(id);
        self.overlay.show(OverlayTimeout::Default, now);
    }

    pub fn select_subtitle_track(&mut self, id: TrackId, now: Instant) {
        self.playback.select_subtitle_track(id);
        self.overlay.show(OverlayTimeout::Default, now);
    }

    /// The engine paused.
    pub fn on_playback_paused(&mut self, now: Instant) {
        self.overlay.on_playback_paused(now);
    }

    /// The engine started or resumed playing.
    pub fn on_playback_playing(&mut self, now: Instant) {
        self.overlay.set_seekable(self.playback.is_seekable());
        self.overlay.on_playback_playing(now);
    }

    /// Whether the media is spherical. Resets the field of view.
    pub fn set_spherical(&mut self, spherical: bool) {
        self.fov = if spherical { seek_math::DEFAULT_FOV } else { 0.0 };
    }

    /// Host opened or closed a panel.
    pub fn set_panel_showing(&mut self, panel: OverlayPanel, showing: bool) {
        match panel {
            OverlayPanel::Options => self.options_showing = showing,
            OverlayPanel::Playlist => self.playlist_showing = showing,
        }
    }

    /// Surface size or rotation changed.
    pub fn set_screen(&mut self, screen: ScreenMetrics) {
        self.overlay.set_screen_orientation(screen.orientation);
        self.classifier.set_screen(screen);
    }

    // -----------------------------------------------------------------------
    // Overlay
    // -----------------------------------------------------------------------

    /// Drive the overlay auto-hide. Returns whether it ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.overlay.tick(now)
    }

    /// Host-timer variant of [`tick`](Self::tick).
    pub fn on_hide_timer(&mut self, ticket: Ticket) -> bool {
        self.overlay.on_hide_timer(ticket)
    }

    pub fn show_overlay(&mut self, hint: OverlayTimeout, now: Instant) -> Option<Ticket> {
        self.overlay.show(hint, now)
    }

    pub fn hide_overlay(&mut self, from_user: bool) {
        self.overlay.hide(from_user);
    }

    pub fn lock(&mut self) {
        self.overlay.lock();
    }

    pub fn unlock(&mut self, now: Instant) {
        self.overlay.unlock(now);
    }

    pub fn toggle_orientation_lock(&mut self) -> RequestedOrientation {
        self.overlay.toggle_orientation_lock()
    }

    /// Attach the overlay render target. Ignored off the primary output.
    pub fn attach_overlay_view(&mut self, view: Box<dyn OverlayView>, now: Instant) -> bool {
        if self.router.kind() != OutputKind::Primary {
            tracing::debug!(
                kind = self.router.kind().as_str(),
                "overlay view refused off primary"
            );
            return false;
        }
        self.overlay.attach_view(view, now);
        true
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn on_route_changed(&mut self, display: Option<DisplayId>) -> OutputKind {
        let kind = self.router.on_route_changed(display);
        self.sync_output(kind);
        kind
    }

    pub fn select_renderer(&mut self, renderer: Option<RendererHandle>) -> OutputKind {
        let kind = self.router.select_renderer(renderer);
        self.sync_output(kind);
        kind
    }

    /// Screen teardown.
    pub fn release(&mut self) {
        self.classifier.reset();
        self.overlay.detach_view();
        self.router.release();
    }

    fn sync_output(&mut self, kind: OutputKind) {
        if kind != OutputKind::Primary && self.overlay.detach_view().is_some() {
            tracing::debug!(kind = kind.as_str(), "overlay view invalidated by output change");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use playctl_core::event::PinchPhase;
    use playctl_core::testing::{FakePlayback, PlaybackCall};
    use web_time::Duration;

    use crate::output_router::NoPresentation;
    use crate::overlay::OverlayProjection;
    use crate::reactive::Subscription;

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_150: Duration = Duration::from_millis(150);
    const MS_200: Duration = Duration::from_millis(200);
    const MS_400: Duration = Duration::from_millis(400);

    // 1000x500 at 254 dpi: 100px == 1cm.
    fn controller(playback: FakePlayback) -> (PlayerController, Rc<FakePlayback>) {
        let playback = Rc::new(playback);
        let c = PlayerController::new(
            &PlayerConfig::default(),
            playback.clone(),
            ScreenMetrics::new(1000.0, 500.0, 254.0),
            Box::new(NoPresentation),
        );
        (c, playback)
    }

    fn record<T: Clone + 'static>(signal: &Signal<T>) -> (Rc<RefCell<Vec<T>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = signal.subscribe(move |v: &T| sink.borrow_mut().push(v.clone()));
        (seen, sub)
    }

    #[derive(Clone, Default)]
    struct Frames(Rc<RefCell<Vec<OverlayProjection>>>);

    impl OverlayView for Frames {
        fn render(&mut self, projection: &OverlayProjection) {
            self.0.borrow_mut().push(*projection);
        }
    }

    #[test]
    fn tap_toggles_overlay() {
        let (mut c, _) = controller(FakePlayback::new());
        let t = Instant::now();
        c.on_touch(&TouchEvent::down(500.0, 250.0), t);
        c.on_touch(&TouchEvent::up(500.0, 250.0), t + MS_50);
        assert!(c.overlay_visibility().get());
    }

    #[test]
    fn seek_drag_seeks_on_up_only() {
        let (mut c, playback) = controller(FakePlayback::new().with_time(60_000));
        let (notices, _sub) = record(&c.notices());
        let t = Instant::now();
        c.on_touch(&TouchEvent::down(200.0, 250.0), t);
        c.on_touch(&TouchEvent::moved(400.0, 250.0), t + MS_100);
        assert!(playback.seeks().is_empty());
        assert!(matches!(
            notices.borrow()[0],
            Notice::SeekPreview { divisor: 1, .. }
        ));
        c.on_touch(&TouchEvent::up(400.0, 250.0), t + MS_400);
        let jump = seek_math::seek_jump_millis(2.0, 1);
        assert_eq!(playback.seeks(), vec![60_000 + jump]);
    }

    #[test]
    fn volume_swipe_sets_volume_and_hides_overlay() {
        let (mut c, playback) = controller(FakePlayback::new().with_volume(7, 15));
        let (events, _sub) = record(&c.gesture_events());
        let t = Instant::now();
        c.show_overlay(OverlayTimeout::Infinite, t);
        c.on_touch(&TouchEvent::down(800.0, 300.0), t);
        c.on_touch(&TouchEvent::moved(800.0, 250.0), t + MS_50);
        c.on_touch(&TouchEvent::moved(800.0, 150.0), t + MS_100);
        assert_eq!(playback.volumes(), vec![10]);
        assert!(!c.overlay().is_visible());
        assert_eq!(
            events.borrow()[0],
            GestureEvent {
                kind: ActionKind::Volume,
                magnitude: 10.0
            }
        );
    }

    #[test]
    fn brightness_swipe_requests_window_brightness() {
        let (mut c, _) = controller(FakePlayback::new());
        let (requests, _sub) = record(&c.host_requests());
        let t = Instant::now();
        c.on_touch(&TouchEvent::down(100.0, 300.0), t);
        c.on_touch(&TouchEvent::moved(100.0, 250.0), t + MS_50);
        c.on_touch(&TouchEvent::moved(100.0, 200.0), t + MS_100);
        assert!((c.brightness() - 0.6).abs() < 1e-5);
        assert_eq!(requests.borrow().len(), 1);
        assert!(matches!(
            requests.borrow()[0],
            HostRequest::SetBrightness(b) if (b - 0.6).abs() < 1e-5
        ));
    }

    #[test]
    fn brightness_is_clamped() {
        let (mut c, _) = controller(FakePlayback::new());
        c.adjust_brightness(-5.0);
        assert_eq!(c.brightness(), MIN_BRIGHTNESS);
        c.adjust_brightness(5.0);
        assert_eq!(c.brightness(), 1.0);
    }

    #[test]
    fn nan_config_values_are_replaced_at_construction() {
        let mut config = PlayerConfig::default();
        config.brightness.initial = f32::NAN;
        config.gesture.fling_min_velocity = f32::NAN;
        let mut c = PlayerController::new(
            &config,
            Rc::new(FakePlayback::new()),
            ScreenMetrics::new(1000.0, 500.0, 254.0),
            Box::new(NoPresentation),
        );
        assert_eq!(c.brightness(), 0.5);

        let (requests, _sub) = record(&c.host_requests());
        c.adjust_brightness(0.1);
        assert!(matches!(
            &requests.borrow()[..],
            [HostRequest::SetBrightness(b)] if (*b - 0.6).abs() < 1e-5
        ));
    }

    #[test]
    fn double_tap_seeks_forward_with_step_feedback() {
        let (mut c, playback) = controller(FakePlayback::new().with_time(60_000));
        let (notices, _sub) = record(&c.notices());
        let t = Instant::now();
        c.on_touch(&TouchEvent::down(900.0, 250.0), t);
        c.on_touch(&TouchEvent::up(900.0, 250.0), t + MS_50);
        c.on_touch(&TouchEvent::down(900.0, 250.0), t + MS_150);
        c.on_touch(&TouchEvent::up(900.0, 250.0), t + MS_200);
        assert_eq!(playback.seeks(), vec![70_000]);
        assert_eq!(notices.borrow().last(), Some(&Notice::SeekStep { total_ms: 10_000 }));
    }

    #[test]
    fn seek_delta_clamps_at_zero() {
        let (mut c, playback) = controller(FakePlayback::new().with_time(4_000));
        c.seek_delta(-10_000, 1);
        assert_eq!(playback.seeks(), vec![0]);
    }

    #[test]
    fn seek_delta_on_live_stream_only_notices() {
        let (mut c, playback) = controller(FakePlayback::new().with_seekable(false));
        let (notices, _sub) = record(&c.notices());
        c.seek_delta(10_000, 2);
        assert!(playback.seeks().is_empty());
        assert_eq!(*notices.borrow(), vec![Notice::StreamNotSeekable]);
    }

    #[test]
    fn track_selection_shows_overlay() {
        let (mut c, playback) = controller(FakePlayback::new());
        let t = Instant::now();
        c.select_audio_track(2, t);
        c.select_subtitle_track(-1, t);
        assert_eq!(
            playback.calls(),
            vec![
                PlaybackCall::SelectAudioTrack(2),
                PlaybackCall::SelectSubtitleTrack(-1)
            ]
        );
        assert!(c.overlay().is_visible());
    }

    #[test]
    fn locked_screen_ignores_sticks() {
        let (mut c, _) = controller(FakePlayback::new());
        c.lock();
        let stick = AxisEvent {
            x: 0.9,
            ..AxisEvent::default()
        };
        assert!(c.on_axis(&stick, Instant::now()).is_none());
    }

    #[test]
    fn stick_seeks_relative() {
        let (mut c, playback) = controller(FakePlayback::new().with_time(60_000));
        let stick = AxisEvent {
            x: -0.9,
            ..AxisEvent::default()
        };
        c.on_axis(&stick, Instant::now());
        assert_eq!(playback.seeks(), vec![50_000]);
    }

    #[test]
    fn pinch_zoom_updates_fov_only_when_spherical() {
        let (mut c, playback) = controller(FakePlayback::new().with_spherical(true));
        c.set_spherical(true);
        let t = Instant::now();
        c.on_pinch(&PinchEvent::new(PinchPhase::Begin, 1.0), t);
        c.on_pinch(&PinchEvent::new(PinchPhase::Update, 0.5), t);
        assert_eq!(c.fov(), 120.0);
        assert!(matches!(
            playback.calls().last(),
            Some(PlaybackCall::UpdateViewpoint { fov_delta, .. }) if *fov_delta == 40.0
        ));
    }

    #[test]
    fn output_change_detaches_overlay_view() {
        let (mut c, _) = controller(FakePlayback::new());
        let (rebuilds, _sub) = record(&c.requires_rebuild());
        assert!(c.attach_overlay_view(Box::new(Frames::default()), Instant::now()));
        c.select_renderer(Some(RendererHandle::new("tv", "Living room")));
        assert!(!c.overlay().has_view());
        assert!(!c.attach_overlay_view(Box::new(Frames::default()), Instant::now()));
        assert_eq!(*rebuilds.borrow(), vec![OutputKind::Renderer]);
        assert!(!c.modes().primary_output);
    }

    #[test]
    fn fling_requests_dismiss() {
        let (mut c, _) = controller(FakePlayback::new());
        let (requests, _sub) = record(&c.host_requests());
        let t = Instant::now();
        c.on_touch(&TouchEvent::down(100.0, 250.0), t);
        c.on_touch(&TouchEvent::moved(400.0, 250.0), t + MS_50);
        c.on_touch(&TouchEvent::up(600.0, 250.0), t + MS_100);
        assert_eq!(
            *requests.borrow(),
            vec![HostRequest::Dismiss(SwipeDirection::Right)]
        );
    }

    #[test]
    fn release_silently_returns_to_primary() {
        let (mut c, _) = controller(FakePlayback::new());
        let (rebuilds, _sub) = record(&c.requires_rebuild());
        c.select_renderer(Some(RendererHandle::new("tv", "TV")));
        c.release();
        assert_eq!(c.router().kind(), OutputKind::Primary);
        assert_eq!(rebuilds.borrow().len(), 1);
    }
}
