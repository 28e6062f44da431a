#![forbid(unsafe_code)]

//! Runtime: overlay state, output routing, and the player controller.
//!
//! # Key Components
//!
//! - [`PlayerController`] - Applies classifier actions to the engine, the
//!   overlay, and the host
//! - [`OverlayController`] - Overlay visibility, auto-hide, and screen lock
//! - [`OutputRouter`] - Primary / presentation / renderer output selection
//! - [`PlayerConfig`] - Every tunable, loadable from TOML or JSON
//! - [`Observable`] and [`Signal`] - Single-threaded state and event bindings
//!
//! # Role in playctl
//! `playctl-core` decides what a gesture means; this crate owns the state
//! that outlives a gesture and performs the effects. Everything runs on the
//! UI thread: types here are `!Send` and share state through `Rc`.
//!
//! # Timers
//! The overlay auto-hide is the only timeout. Hosts either call
//! [`PlayerController::tick`] from their frame loop or schedule their own
//! callback for [`OverlayController::hide_deadline`] and hand the ticket
//! back through [`PlayerController::on_hide_timer`].

pub mod deferred;
pub mod orientation;
pub mod output_router;
pub mod overlay;
pub mod player;
pub mod player_config;
pub mod reactive;

pub use deferred::{Deferred, Rejected, Ticket};
pub use orientation::{OrientationLockMode, OrientationPolicy, RequestedOrientation};
pub use output_router::{
    AttachError, DisplayId, NoPresentation, OutputKind, OutputRouter, OutputTarget,
    PresentationHost, RendererHandle, RouterMode,
};
pub use overlay::{
    OverlayConfig, OverlayController, OverlayPhase, OverlayProjection, OverlayTimeout, OverlayView,
};
pub use player::{GestureEvent, HostRequest, PlayerController};
pub use player_config::{PlayerConfig, PlayerConfigError};
pub use reactive::{Observable, Signal, Subscription};
