#![forbid(unsafe_code)]

//! playctl public facade crate.
//!
//! Re-exports the types a host screen needs from `playctl-core` and
//! `playctl-runtime`, plus a prelude.
//!
//! ```rust,ignore
//! use playctl::prelude::*;
//!
//! let mut player = PlayerController::new(
//!     &PlayerConfig::from_env(),
//!     engine,
//!     ScreenMetrics::new(1920.0, 1080.0, 440.0),
//!     Box::new(NoPresentation),
//! );
//! let _sub = player.requires_rebuild().subscribe(|kind| rebuild_screen(*kind));
//! player.on_touch(&TouchEvent::down(960.0, 540.0), Instant::now());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use playctl_core::action::{
    ActionKind, GestureAction, Notice, OverlayPanel, SeekDirection, SwipeDirection, VideoScale,
};
pub use playctl_core::axis::{AxisConfig, AxisMapper};
pub use playctl_core::event::{
    AxisEvent, InputEvent, PinchEvent, PinchPhase, TouchControls, TouchEvent, TouchPhase,
};
pub use playctl_core::geometry::{Point, ScreenMetrics, ScreenOrientation};
pub use playctl_core::gesture::{
    FlingConfig, GestureClassifier, GestureConfig, GestureSession, UiModes,
};
pub use playctl_core::playback::{PlaybackFacade, TrackId};

// --- Runtime re-exports ----------------------------------------------------

pub use playctl_runtime::{
    AttachError, DisplayId, GestureEvent, HostRequest, NoPresentation, Observable,
    OrientationLockMode, OutputKind, OutputRouter, OutputTarget, OverlayConfig, OverlayController,
    OverlayPhase, OverlayProjection, OverlayTimeout, OverlayView, PlayerConfig, PlayerConfigError,
    PlayerController, PresentationHost, RendererHandle, RequestedOrientation, RouterMode, Signal,
    Subscription, Ticket,
};

pub use web_time::{Duration, Instant};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionKind, GestureAction, GestureEvent, HostRequest, Instant, NoPresentation, Notice,
        OutputKind, OverlayTimeout, OverlayView, PlaybackFacade, PlayerConfig, PlayerController,
        PresentationHost, ScreenMetrics, TouchEvent,
    };

    pub use crate::{core, runtime};
}

pub use playctl_core as core;
pub use playctl_runtime as runtime;
