#![forbid(unsafe_code)]

//! In-memory [`PlaybackFacade`] for tests.
//!
//! Enabled for this crate's own tests and, through the `test-helpers`
//! feature, for dependants.

use std::cell::{Cell, RefCell};

use crate::playback::{PlaybackFacade, TrackId};

/// One recorded facade call with an observable effect.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCall {
    SeekTo(i64),
    SetVolume(u32),
    TogglePlayPause,
    SelectAudioTrack(TrackId),
    SelectSubtitleTrack(TrackId),
    UpdateViewpoint { yaw: f32, pitch: f32, fov_delta: f32 },
}

/// Scriptable playback engine that records every effect.
#[derive(Debug)]
pub struct FakePlayback {
    time: Cell<i64>,
    length: Cell<i64>,
    seekable: Cell<bool>,
    volume: Cell<u32>,
    max_volume: Cell<u32>,
    playing: Cell<bool>,
    spherical: Cell<bool>,
    calls: RefCell<Vec<PlaybackCall>>,
}

impl Default for FakePlayback {
    fn default() -> Self {
        Self {
            time: Cell::new(60_000),
            length: Cell::new(3_600_000),
            seekable: Cell::new(true),
            volume: Cell::new(7),
            max_volume: Cell::new(15),
            playing: Cell::new(true),
            spherical: Cell::new(false),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakePlayback {
    /// A playing, seekable, one hour media at 1:00 with volume 7/15.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time(self, millis: i64) -> Self {
        self.time.set(millis);
        self
    }

    #[must_use]
    pub fn with_length(self, millis: i64) -> Self {
        self.length.set(millis);
        self
    }

    #[must_use]
    pub fn with_seekable(self, seekable: bool) -> Self {
        self.seekable.set(seekable);
        self
    }

    #[must_use]
    pub fn with_volume(self, current: u32, max: u32) -> Self {
        self.volume.set(current);
        self.max_volume.set(max);
        self
    }

    #[must_use]
    pub fn with_playing(self, playing: bool) -> Self {
        self.playing.set(playing);
        self
    }

    #[must_use]
    pub fn with_spherical(self, spherical: bool) -> Self {
        self.spherical.set(spherical);
        self
    }

    /// Change the playing flag without recording a call.
    pub fn set_playing(&self, playing: bool) {
        self.playing.set(playing);
    }

    /// Change the seekable flag without recording a call.
    pub fn set_seekable(&self, seekable: bool) {
        self.seekable.set(seekable);
    }

    /// Snapshot of recorded calls.
    #[must_use]
    pub fn calls(&self) -> Vec<PlaybackCall> {
        self.calls.borrow().clone()
    }

    /// Recorded seeks, in order.
    #[must_use]
    pub fn seeks(&self) -> Vec<i64> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PlaybackCall::SeekTo(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Recorded volume levels, in order.
    #[must_use]
    pub fn volumes(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                PlaybackCall::SetVolume(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: PlaybackCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl PlaybackFacade for FakePlayback {
    fn seek_to(&self, millis: i64) {
        self.time.set(millis);
        self.record(PlaybackCall::SeekTo(millis));
    }

    fn current_time(&self) -> i64 {
        self.time.get()
    }

    fn length(&self) -> i64 {
        self.length.get()
    }

    fn is_seekable(&self) -> bool {
        self.seekable.get()
    }

    fn set_volume(&self, level: u32) {
        self.volume.set(level);
        self.record(PlaybackCall::SetVolume(level));
    }

    fn current_volume(&self) -> u32 {
        self.volume.get()
    }

    fn max_volume(&self) -> u32 {
        self.max_volume.get()
    }

    fn is_playing(&self) -> bool {
        self.playing.get()
    }

    fn toggle_play_pause(&self) {
        self.playing.set(!self.playing.get());
        self.record(PlaybackCall::TogglePlayPause);
    }

    fn select_audio_track(&self, id: TrackId) {
        self.record(PlaybackCall::SelectAudioTrack(id));
    }

    fn select_subtitle_track(&self, id: TrackId) {
        self.record(PlaybackCall::SelectSubtitleTrack(id));
    }

    fn update_viewpoint(&self, yaw: f32, pitch: f32, fov_delta: f32) -> bool {
        if !self.spherical.get() {
            return false;
        }
        self.record(PlaybackCall::UpdateViewpoint {
            yaw,
            pitch,
            fov_delta,
        });
        true
    }
}
