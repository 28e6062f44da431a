#![forbid(unsafe_code)]

//! Video output routing between the device screen, a presentation
//! display, and a remote renderer.
//!
//! [`OutputRouter`] folds two asynchronous inputs (presentation route
//! changes and renderer selection) into one [`OutputTarget`] and fires
//! [`requires_rebuild`](OutputRouter::requires_rebuild) each time the
//! resulting [`OutputKind`] differs from the last one observed. The host
//! screen subscribes and rebuilds itself; the router knows nothing about UI
//! lifecycles.
//!
//! # Precedence
//!
//! 1. Audio-only and benchmark screens pin the router to `Primary`.
//! 2. A selected renderer wins over any presentation display.
//! 3. A presentation display is used unless clone mode is on.
//! 4. Otherwise `Primary`.
//!
//! # Failure Modes
//!
//! - Presentation attach fails: logged at `warn`, the display is treated as
//!   absent and the target falls back to `Primary`.

use std::fmt;

use crate::reactive::Signal;

/// Identifier of a physical or virtual display.
pub type DisplayId = i32;

/// Physical output the video is rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputKind {
    /// The device screen.
    #[default]
    Primary,
    /// An external display showing the video while the device shows controls.
    Presentation,
    /// A remote playback device.
    Renderer,
}

impl OutputKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Presentation => "presentation",
            Self::Renderer => "renderer",
        }
    }
}

/// A remote playback device picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RendererHandle {
    pub id: String,
    pub name: String,
}

impl RendererHandle {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Where video currently goes.
///
/// At most one of `presentation_display` and `renderer` is set, and `kind`
/// agrees with whichever it is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputTarget {
    pub kind: OutputKind,
    pub presentation_display: Option<DisplayId>,
    pub renderer: Option<RendererHandle>,
}

impl OutputTarget {
    fn primary() -> Self {
        Self::default()
    }

    fn presentation(display: DisplayId) -> Self {
        Self {
            kind: OutputKind::Presentation,
            presentation_display: Some(display),
            renderer: None,
        }
    }

    fn renderer(handle: RendererHandle) -> Self {
        Self {
            kind: OutputKind::Renderer,
            presentation_display: None,
            renderer: Some(handle),
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation host
// ---------------------------------------------------------------------------

/// Why a presentation display could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The display went away while attaching.
    DisplayRemoved,
    /// The window system rejected the display.
    InvalidDisplay(DisplayId),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayRemoved => write!(f, "presentation display removed during attach"),
            Self::InvalidDisplay(id) => write!(f, "invalid presentation display {id}"),
        }
    }
}

impl std::error::Error for AttachError {}

/// Window-system side of presentation displays.
pub trait PresentationHost {
    /// Start presenting on `display`.
    fn attach(&mut self, display: DisplayId) -> Result<(), AttachError>;

    /// Stop presenting on `display`.
    fn detach(&mut self, display: DisplayId);
}

/// Host without external displays; every attach fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPresentation;

impl PresentationHost for NoPresentation {
    fn attach(&mut self, display: DisplayId) -> Result<(), AttachError> {
        Err(AttachError::InvalidDisplay(display))
    }

    fn detach(&mut self, _display: DisplayId) {}
}

// ---------------------------------------------------------------------------
// OutputRouter
// ---------------------------------------------------------------------------

/// Screen-level switches that constrain routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouterMode {
    /// Mirror instead of presenting: presentation displays are ignored.
    pub clone_mode: bool,
    /// Audio-only screen.
    pub audio_only: bool,
    /// Benchmark run.
    pub benchmark: bool,
}

impl RouterMode {
    /// Whether routing is pinned to the primary output.
    #[must_use]
    pub const fn pinned(self) -> bool {
        self.audio_only || self.benchmark
    }
}

/// Output state machine.
pub struct OutputRouter {
    mode: RouterMode,
    host: Box<dyn PresentationHost>,
    reported_display: Option<DisplayId>,
    attached_display: Option<DisplayId>,
    renderer: Option<RendererHandle>,
    target: OutputTarget,
    rebuild: Signal<OutputKind>,
}

impl fmt::Debug for OutputRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputRouter")
            .field("mode", &self.mode)
            .field("target", &self.target)
            .field("reported_display", &self.reported_display)
            .finish()
    }
}

impl OutputRouter {
    /// Router on the primary output.
    #[must_use]
    pub fn new(mode: RouterMode, host: Box<dyn PresentationHost>) -> Self {
        Self {
            mode,
            host,
            reported_display: None,
            attached_display: None,
            renderer: None,
            target: OutputTarget::primary(),
            rebuild: Signal::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> RouterMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    #[must_use]
    pub fn kind(&self) -> OutputKind {
        self.target.kind
    }

    /// Fires with the new kind once per kind change.
    #[must_use]
    pub fn requires_rebuild(&self) -> Signal<OutputKind> {
        self.rebuild.clone()
    }

    /// The presentation route changed. `None` means no external display.
    pub fn on_route_changed(&mut self, reported: Option<DisplayId>) -> OutputKind {
        if reported == self.reported_display {
            tracing::debug!(display = ?reported, "route change with same display ignored");
            return self.target.kind;
        }
        self.reported_display = reported;
        self.recompute()
    }

    /// The user picked (or cleared) a remote renderer.
    pub fn select_renderer(&mut self, renderer: Option<RendererHandle>) -> OutputKind {
        if renderer == self.renderer {
            return self.target.kind;
        }
        self.renderer = renderer;
        self.recompute()
    }

    /// Change clone/audio-only/benchmark switches.
    pub fn set_mode(&mut self, mode: RouterMode) -> OutputKind {
        self.mode = mode;
        self.recompute()
    }

    /// Screen teardown: drop every output and return to primary silently.
    pub fn release(&mut self) {
        self.detach_presentation();
        self.renderer = None;
        self.reported_display = None;
        self.target = OutputTarget::primary();
        tracing::debug!("output router released");
    }

    fn recompute(&mut self) -> OutputKind {
        let next = self.resolve();
        let previous = self.target.kind;
        self.target = next;
        if self.target.kind != previous {
            let kind = self.target.kind;
            tracing::info!(
                from = previous.as_str(),
                to = kind.as_str(),
                "output kind changed, rebuild required"
            );
            self.rebuild.emit(&kind);
        }
        self.target.kind
    }

    fn resolve(&mut self) -> OutputTarget {
        if self.mode.pinned() {
            self.detach_presentation();
            return OutputTarget::primary();
        }
        if let Some(renderer) = self.renderer.clone() {
            self.detach_presentation();
            return OutputTarget::renderer(renderer);
        }
        match self.reported_display {
            Some(display) if !self.mode.clone_mode => self.attach_presentation(display),
            _ => {
                self.detach_presentation();
                OutputTarget::primary()
            }
        }
    }

    fn attach_presentation(&mut self, id: DisplayId) -> OutputTarget {
        if self.attached_display == Some(id) {
            return OutputTarget::presentation(id);
        }
        self.detach_presentation();
        match self.host.attach(id) {
            Ok(()) => {
                self.attached_display = Some(id);
                OutputTarget::presentation(id)
            }
            Err(err) => {
                tracing::warn!(
                    display = id,
                    error = %err,
                    "presentation attach failed, using primary"
                );
                self.reported_display = None;
                OutputTarget::primary()
            }
        }
    }

    fn detach_presentation(&mut self) {
        if let Some(display) = self.attached_display.take() {
            self.host.detach(display);
        }
    }
}
