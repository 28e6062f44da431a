#![forbid(unsafe_code)]

//! Narrow interface to the playback engine.
//!
//! The engine (decoding, rendering, audio output) lives outside this
//! workspace. Everything the control surface needs from it goes through
//! [`PlaybackFacade`], injected at construction as an
//! `Rc<dyn PlaybackFacade>`. Methods take `&self`: the engine is shared
//! between the classifier (reads) and the controller (effects) on a single
//! UI thread, so implementors use interior mutability.

/// Identifier of an audio or subtitle track. `-1` disables the track type.
pub type TrackId = i32;

/// Playback engine operations consumed by the control surface.
///
/// Times are milliseconds. Volume levels are device steps in
/// `0..=max_volume()` (or up to twice that with audio boost).
pub trait PlaybackFacade {
    /// Jump to an absolute position.
    fn seek_to(&self, millis: i64);

    /// Current position.
    fn current_time(&self) -> i64;

    /// Media duration, `<= 0` when unknown (live streams).
    fn length(&self) -> i64;

    /// Whether random access is possible.
    fn is_seekable(&self) -> bool;

    /// Set the output volume.
    fn set_volume(&self, level: u32);

    /// Current output volume.
    fn current_volume(&self) -> u32;

    /// Highest volume step without boost.
    fn max_volume(&self) -> u32;

    fn is_playing(&self) -> bool;

    fn toggle_play_pause(&self);

    fn select_audio_track(&self, id: TrackId);

    fn select_subtitle_track(&self, id: TrackId);

    /// Rotate or zoom a spherical video. Returns `false` when the current
    /// media is not spherical and nothing changed.
    fn update_viewpoint(&self, yaw: f32, pitch: f32, fov_delta: f32) -> bool;
}
