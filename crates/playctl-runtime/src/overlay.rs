#![forbid(unsafe_code)]

//! On-screen control overlay: visibility, auto-hide, screen lock.
//!
//! [`OverlayController`] owns overlay state and renders it as an
//! [`OverlayProjection`] pushed to an attachable [`OverlayView`]. The view
//! may come and go (it is torn down on every output rebuild); state
//! changes made without a view are kept and the latest projection is
//! replayed when one attaches.
//!
//! # State Machine
//!
//! ```text
//!            show()                 lock()
//! HIDDEN ─────────────→ SHOWING ─────────→ HIDDEN (locked)
//!   ↑  ←───────────────   │                    │ tap → show()
//!   │   hide() / timer    │                    ↓
//!   │                     │            SHOWING_LOCKED
//!   │                     │   unlock() → SHOWING
//! ```
//!
//! # Invariants
//!
//! 1. At most one auto-hide timer is pending; every `show`, `hide`, and
//!    `lock` cancels the previous one.
//! 2. While locked nothing schedules an auto-hide.
//! 3. A hide timer from before the latest `show` never hides the overlay.
//!
//! # Failure Modes
//!
//! - Timer fired after the view was detached: ignored. Attaching a view
//!   to a visible overlay re-arms the default auto-hide.
//! - Stale timer ticket: ignored, logged at `warn`.

use web_time::{Duration, Instant};

use playctl_core::geometry::ScreenOrientation;

use crate::deferred::{Deferred, Rejected, Ticket};
use crate::orientation::{OrientationPolicy, RequestedOrientation};
use crate::reactive::Observable;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Auto-hide delays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Delay used when nothing else applies (default: 4s).
    pub default_timeout: Duration,
    /// User override in milliseconds: `-1` never hides, `0` uses the
    /// default, positive values replace it.
    pub hud_delay_ms: i64,
    /// Delay before hiding after playback resumes (default: 300ms).
    pub fade_after_play: Duration,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(4000),
            hud_delay_ms: 0,
            fade_after_play: Duration::from_millis(300),
        }
    }
}

/// Caller preference for how long a `show` lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayTimeout {
    #[default]
    Default,
    After(Duration),
    Infinite,
}

impl OverlayConfig {
    /// Resolve the auto-hide delay; `None` means the overlay stays up.
    #[must_use]
    pub fn effective_timeout(&self, hint: OverlayTimeout, playing: bool) -> Option<Duration> {
        if !playing {
            return None;
        }
        match hint {
            OverlayTimeout::Infinite => return None,
            OverlayTimeout::After(d) if !d.is_zero() => return Some(d),
            _ => {}
        }
        match self.hud_delay_ms {
            -1 => None,
            ms if ms > 0 => Some(Duration::from_millis(ms as u64)),
            _ => Some(self.default_timeout),
        }
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Coarse overlay phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    Hidden,
    Showing,
    ShowingLocked,
}

/// Everything a view needs to draw the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayProjection {
    /// Transport controls drawn.
    pub controls_visible: bool,
    /// Play/pause and next/previous accept input.
    pub transport_enabled: bool,
    /// Seek bar accepts input.
    pub seekbar_enabled: bool,
    /// Lock button shown on its own.
    pub unlock_affordance: bool,
    /// Status and navigation bars shown; `false` requests immersive mode.
    pub system_bars: bool,
    /// Keep the screen on.
    pub keep_awake: bool,
    pub requested_orientation: RequestedOrientation,
}

/// Render target for overlay state.
pub trait OverlayView {
    fn render(&mut self, projection: &OverlayProjection);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HideReason {
    Timeout,
    PlaybackResumed,
}

// ---------------------------------------------------------------------------
// OverlayController
// ---------------------------------------------------------------------------

/// Overlay visibility, lock, and orientation state.
pub struct OverlayController {
    config: OverlayConfig,
    visible: Observable<bool>,
    locked: bool,
    playing: bool,
    seekable: bool,
    keep_awake: bool,
    screen: ScreenOrientation,
    orientation: OrientationPolicy,
    before_lock: Option<RequestedOrientation>,
    timer: Deferred<HideReason>,
    view: Option<Box<dyn OverlayView>>,
    last: OverlayProjection,
}

impl std::fmt::Debug for OverlayController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayController")
            .field("phase", &self.phase())
            .field("playing", &self.playing)
            .field("timer", &self.timer.ticket())
            .field("attached", &self.view.is_some())
            .finish()
    }
}

impl OverlayController {
    /// Hidden, unlocked, paused overlay.
    #[must_use]
    pub fn new(
        config: OverlayConfig,
        orientation: OrientationPolicy,
        screen: ScreenOrientation,
    ) -> Self {
        let mut this = Self {
            config,
            visible: Observable::new(false),
            locked: false,
            playing: false,
            seekable: true,
            keep_awake: false,
            screen,
            orientation,
            before_lock: None,
            timer: Deferred::new(),
            view: None,
            last: OverlayProjection {
                controls_visible: false,
                transport_enabled: true,
                seekbar_enabled: true,
                unlock_affordance: false,
                system_bars: false,
                keep_awake: false,
                requested_orientation: orientation.requested(),
            },
        };
        this.last = this.project();
        this
    }

    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: OverlayConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn phase(&self) -> OverlayPhase {
        match (self.visible.get(), self.locked) {
            (false, _) => OverlayPhase::Hidden,
            (true, false) => OverlayPhase::Showing,
            (true, true) => OverlayPhase::ShowingLocked,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Shared visibility state for host bindings.
    #[must_use]
    pub fn visibility(&self) -> Observable<bool> {
        self.visible.clone()
    }

    /// Latest projection, whether or not a view is attached.
    #[must_use]
    pub fn projection(&self) -> OverlayProjection {
        self.last
    }

    #[must_use]
    pub fn orientation(&self) -> &OrientationPolicy {
        &self.orientation
    }

    /// Ticket of the pending auto-hide, for hosts that run their own timers.
    #[must_use]
    pub fn pending_hide(&self) -> Option<Ticket> {
        self.timer.ticket()
    }

    /// When the pending auto-hide is due.
    #[must_use]
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.timer.due()
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Show the overlay, or refresh its deadline if already shown.
    ///
    /// Returns the ticket of the scheduled auto-hide, if any.
    pub fn show(&mut self, hint: OverlayTimeout, now: Instant) -> Option<Ticket> {
        self.timer.cancel();
        let ticket = if self.locked {
            None
        } else {
            self.config
                .effective_timeout(hint, self.playing)
                .map(|delay| self.timer.schedule(HideReason::Timeout, delay, now))
        };
        self.keep_awake = true;
        self.visible.set(true);
        tracing::debug!(
            locked = self.locked,
            auto_hide = ticket.is_some(),
            "overlay shown"
        );
        self.render();
        ticket
    }

    /// Hide the overlay.
    ///
    /// An automatic hide while already hidden re-asserts immersive mode.
    pub fn hide(&mut self, from_user: bool) {
        self.timer.cancel();
        if !self.visible.get() {
            if !from_user {
                self.render_forced();
            }
            return;
        }
        if !self.locked {
            self.keep_awake = false;
        }
        self.visible.set(false);
        tracing::debug!(from_user, "overlay hidden");
        self.render();
    }

    /// Tap handler: show if hidden, hide if shown.
    pub fn toggle(&mut self, now: Instant) {
        if self.visible.get() {
            self.hide(true);
        } else {
            self.show(OverlayTimeout::Default, now);
        }
    }

    // -----------------------------------------------------------------------
    // Lock and orientation
    // -----------------------------------------------------------------------

    /// Lock input: transport disabled, orientation pinned, controls hidden.
    pub fn lock(&mut self) {
        self.timer.cancel();
        if self.locked {
            return;
        }
        self.before_lock = Some(self.orientation.requested());
        self.orientation.lock_current(self.screen);
        self.locked = true;
        self.visible.set(false);
        tracing::debug!(orientation = ?self.orientation.requested(), "overlay locked");
        self.render();
    }

    /// Unlock input and show the controls again.
    pub fn unlock(&mut self, now: Instant) {
        if !self.locked {
            return;
        }
        self.locked = false;
        if let Some(previous) = self.before_lock.take() {
            self.orientation.restore(previous);
        }
        tracing::debug!("overlay unlocked");
        self.show(OverlayTimeout::Default, now);
    }

    /// Toggle between a lock on the current orientation and the default.
    pub fn toggle_orientation_lock(&mut self) -> RequestedOrientation {
        let requested = self.orientation.toggle(self.screen);
        self.render();
        requested
    }

    /// Physical orientation changed.
    pub fn set_screen_orientation(&mut self, screen: ScreenOrientation) {
        self.screen = screen;
    }

    // -----------------------------------------------------------------------
    // Playback events
    // -----------------------------------------------------------------------

    /// Paused: keep the overlay up until the user dismisses it.
    pub fn on_playback_paused(&mut self, now: Instant) {
        self.playing = false;
        self.show(OverlayTimeout::Infinite, now);
    }

    /// Playing: fade out a visible, unlocked overlay shortly.
    pub fn on_playback_playing(&mut self, now: Instant) {
        self.playing = true;
        if self.visible.get() && !self.locked {
            let delay = self.config.fade_after_play;
            self.timer.schedule(HideReason::PlaybackResumed, delay, now);
            tracing::debug!(delay_ms = delay.as_millis() as u64, "overlay fade scheduled");
        }
    }

    /// Record the playing flag without touching visibility.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Seek bar availability follows the stream.
    pub fn set_seekable(&mut self, seekable: bool) {
        if self.seekable != seekable {
            self.seekable = seekable;
            self.render();
        }
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Run the auto-hide if it is due. Returns whether it ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.timer.poll(now) {
            Some(reason) => {
                tracing::debug!(?reason, "overlay auto-hide fired");
                self.hide(false);
                true
            }
            None => false,
        }
    }

    /// Host timer for `ticket` fired. Returns whether the overlay hid.
    pub fn on_hide_timer(&mut self, ticket: Ticket) -> bool {
        match self.timer.fire(ticket) {
            Ok(reason) => {
                tracing::debug!(?reason, "overlay auto-hide fired");
                self.hide(false);
                true
            }
            Err(Rejected::Stale) => {
                tracing::warn!(
                    generation = ticket.generation(),
                    "stale overlay hide callback ignored"
                );
                false
            }
            Err(Rejected::Idle) => false,
        }
    }

    // -----------------------------------------------------------------------
    // View
    // -----------------------------------------------------------------------

    /// Attach a render target and replay the latest projection.
    ///
    /// A visible, unlocked overlay left without a pending hide by
    /// [`detach_view`](Self::detach_view) gets its default auto-hide back.
    pub fn attach_view(&mut self, mut view: Box<dyn OverlayView>, now: Instant) {
        view.render(&self.last);
        self.view = Some(view);
        let rearmed = self.visible.get() && !self.locked && !self.timer.is_pending();
        if rearmed
            && let Some(delay) = self
                .config
                .effective_timeout(OverlayTimeout::Default, self.playing)
        {
            self.timer.schedule(HideReason::Timeout, delay, now);
        }
        tracing::debug!(auto_hide = self.timer.is_pending(), "overlay view attached");
    }

    /// Drop the render target and any pending auto-hide.
    pub fn detach_view(&mut self) -> Option<Box<dyn OverlayView>> {
        self.timer.cancel();
        let view = self.view.take();
        if view.is_some() {
            tracing::debug!("overlay view detached");
        }
        view
    }

    #[must_use]
    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    fn project(&self) -> OverlayProjection {
        let visible = self.visible.get();
        OverlayProjection {
            controls_visible: visible && !self.locked,
            transport_enabled: !self.locked,
            seekbar_enabled: !self.locked && self.seekable,
            unlock_affordance: visible && self.locked,
            system_bars: visible && !self.locked,
            keep_awake: self.keep_awake,
            requested_orientation: self.orientation.requested(),
        }
    }

    fn render(&mut self) {
        let next = self.project();
        if next == self.last {
            return;
        }
        self.last = next;
        if let Some(view) = self.view.as_mut() {
            view.render(&next);
        }
    }

    fn render_forced(&mut self) {
        self.last = self.project();
        if let Some(view) = self.view.as_mut() {
            view.render(&self.last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::OrientationLockMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    const MS_100: Duration = Duration::from_millis(100);
    const MS_300: Duration = Duration::from_millis(300);
    const S_4: Duration = Duration::from_secs(4);

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<OverlayProjection>>>);

    impl OverlayView for Recorder {
        fn render(&mut self, projection: &OverlayProjection) {
            self.0.borrow_mut().push(*projection);
        }
    }

    fn overlay() -> OverlayController {
        let policy =
            OrientationPolicy::new(OrientationLockMode::Free, ScreenOrientation::Landscape);
        let mut o = OverlayController::new(
            OverlayConfig::default(),
            policy,
            ScreenOrientation::Landscape,
        );
        o.set_playing(true);
        o
    }

    #[test]
    fn effective_timeout_order() {
        let mut c = OverlayConfig::default();
        assert_eq!(c.effective_timeout(OverlayTimeout::Default, false), None);
        assert_eq!(c.effective_timeout(OverlayTimeout::Infinite, true), None);
        assert_eq!(
            c.effective_timeout(OverlayTimeout::After(MS_100), true),
            Some(MS_100)
        );
        assert_eq!(c.effective_timeout(OverlayTimeout::Default, true), Some(S_4));
        assert_eq!(
            c.effective_timeout(OverlayTimeout::After(Duration::ZERO), true),
            Some(S_4)
        );
        c.hud_delay_ms = 1500;
        assert_eq!(
            c.effective_timeout(OverlayTimeout::Default, true),
            Some(Duration::from_millis(1500))
        );
        c.hud_delay_ms = -1;
        assert_eq!(c.effective_timeout(OverlayTimeout::Default, true), None);
    }

    #[test]
    fn show_schedules_single_hide() {
        let mut o = overlay();
        let t = Instant::now();
        let first = o.show(OverlayTimeout::Default, t);
        let second = o.show(OverlayTimeout::Default, t + MS_100);
        assert_ne!(first, second);
        assert!(!o.tick(t + S_4), "deadline was pushed back");
        assert!(o.tick(t + MS_100 + S_4));
        assert!(!o.is_visible());
        assert!(!o.tick(t + S_4 * 3));
    }

    #[test]
    fn stale_host_timer_is_ignored() {
        let mut o = overlay();
        let t = Instant::now();
        let old = o.show(OverlayTimeout::Default, t).expect("scheduled");
        let new = o.show(OverlayTimeout::Default, t).expect("scheduled");
        assert!(!o.on_hide_timer(old));
        assert!(o.is_visible());
        assert!(o.on_hide_timer(new));
        assert!(!o.is_visible());
    }

    #[test]
    fn paused_shows_without_timeout() {
        let mut o = overlay();
        let t = Instant::now();
        o.on_playback_paused(t);
        assert!(o.is_visible());
        assert_eq!(o.pending_hide(), None);
        assert!(!o.tick(t + S_4 * 10));
    }

    #[test]
    fn resume_fades_visible_overlay() {
        let mut o = overlay();
        let t = Instant::now();
        o.on_playback_paused(t);
        o.on_playback_playing(t + MS_100);
        assert_eq!(o.hide_deadline(), Some(t + MS_100 + MS_300));
        assert!(o.tick(t + MS_100 + MS_300));
        assert_eq!(o.phase(), OverlayPhase::Hidden);
    }

    #[test]
    fn lock_hides_and_disables_transport() {
        let mut o = overlay();
        let t = Instant::now();
        o.show(OverlayTimeout::Default, t);
        o.lock();
        assert!(o.is_locked());
        assert_eq!(o.pending_hide(), None);
        let p = o.projection();
        assert!(!p.controls_visible);
        assert!(!p.transport_enabled);
        assert!(!p.seekbar_enabled);
        assert_eq!(
            p.requested_orientation,
            RequestedOrientation::Locked(ScreenOrientation::Landscape)
        );
    }

    #[test]
    fn locked_show_has_no_auto_hide() {
        let mut o = overlay();
        let t = Instant::now();
        o.lock();
        assert_eq!(o.show(OverlayTimeout::Default, t), None);
        assert_eq!(o.phase(), OverlayPhase::ShowingLocked);
        assert!(o.projection().unlock_affordance);
        assert!(!o.tick(t + S_4 * 2));
    }

    #[test]
    fn unlock_restores_orientation_and_shows() {
        let mut o = overlay();
        let t = Instant::now();
        o.lock();
        o.unlock(t);
        assert!(!o.is_locked());
        assert_eq!(o.phase(), OverlayPhase::Showing);
        assert_eq!(o.projection().requested_orientation, RequestedOrientation::User);
        assert!(o.pending_hide().is_some());
    }

    #[test]
    fn unlock_seekbar_follows_seekable() {
        let mut o = overlay();
        o.set_seekable(false);
        o.lock();
        o.unlock(Instant::now());
        let p = o.projection();
        assert!(p.transport_enabled);
        assert!(!p.seekbar_enabled);
    }

    #[test]
    fn keep_awake_survives_hide_while_locked() {
        let mut o = overlay();
        let t = Instant::now();
        o.show(OverlayTimeout::Default, t);
        assert!(o.projection().keep_awake);
        o.lock();
        assert!(o.projection().keep_awake);
        o.show(OverlayTimeout::Default, t);
        o.hide(true);
        assert!(o.projection().keep_awake);
        o.unlock(t);
        o.hide(true);
        assert!(!o.projection().keep_awake);
    }

    #[test]
    fn projection_buffered_until_attach() {
        let mut o = overlay();
        let t = Instant::now();
        o.show(OverlayTimeout::Default, t);
        let rec = Recorder::default();
        o.attach_view(Box::new(rec.clone()), t);
        let frames = rec.0.borrow();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].controls_visible);
    }

    #[test]
    fn auto_hide_when_hidden_reasserts_immersive() {
        let mut o = overlay();
        let rec = Recorder::default();
        o.attach_view(Box::new(rec.clone()), Instant::now());
        o.hide(false);
        o.hide(false);
        o.hide(true);
        assert_eq!(rec.0.borrow().len(), 3, "attach plus two re-asserts");
        assert!(rec.0.borrow().iter().all(|p| !p.system_bars));
    }

    #[test]
    fn detach_cancels_timer() {
        let mut o = overlay();
        let t = Instant::now();
        o.attach_view(Box::new(Recorder::default()), t);
        let ticket = o.show(OverlayTimeout::Default, t).expect("scheduled");
        assert!(o.detach_view().is_some());
        assert!(!o.has_view());
        assert!(!o.on_hide_timer(ticket));
        assert!(!o.tick(t + S_4));
        assert!(o.is_visible());
    }

    #[test]
    fn reattach_rearms_default_hide() {
        let mut o = overlay();
        let t = Instant::now();
        o.attach_view(Box::new(Recorder::default()), t);
        o.show(OverlayTimeout::Infinite, t);
        o.detach_view();
        assert!(o.pending_hide().is_none());

        o.attach_view(Box::new(Recorder::default()), t + S_4);
        assert_eq!(o.hide_deadline(), Some(t + S_4 + S_4));
        assert!(o.tick(t + S_4 + S_4));
        assert!(!o.is_visible());
    }

    #[test]
    fn reattach_while_locked_or_paused_stays_pinned() {
        let mut o = overlay();
        let t = Instant::now();
        o.lock();
        o.show(OverlayTimeout::Default, t);
        assert!(o.is_visible());
        o.detach_view();
        o.attach_view(Box::new(Recorder::default()), t);
        assert!(o.pending_hide().is_none());

        o.unlock(t);
        o.on_playback_paused(t);
        o.detach_view();
        o.attach_view(Box::new(Recorder::default()), t);
        assert!(o.pending_hide().is_none());
        assert!(o.is_visible());
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut o = overlay();
        let t = Instant::now();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = o
            .visibility()
            .subscribe(move |v| seen_clone.borrow_mut().push(*v));
        o.toggle(t);
        o.toggle(t);
        assert_eq!(*seen.borrow(), vec![true, false]);
    }

    #[test]
    fn orientation_toggle_round_trip() {
        let mut o = overlay();
        assert!(o.toggle_orientation_lock().is_locked());
        assert_eq!(o.toggle_orientation_lock(), RequestedOrientation::User);
        o.set_screen_orientation(ScreenOrientation::Portrait);
        assert_eq!(
            o.toggle_orientation_lock(),
            RequestedOrientation::Locked(ScreenOrientation::Portrait)
        );
    }
}
