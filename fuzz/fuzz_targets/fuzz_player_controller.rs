#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

use playctl_core::event::{AxisEvent, TouchEvent, TouchPhase};
use playctl_core::geometry::ScreenMetrics;
use playctl_core::playback::{PlaybackFacade, TrackId};
use playctl_core::seek_math::{MAX_FOV, MIN_FOV};
use playctl_runtime::{
    NoPresentation, OverlayTimeout, PlayerConfig, PlayerController, RendererHandle,
};

struct Engine;

impl PlaybackFacade for Engine {
    fn seek_to(&self, _millis: i64) {}
    fn current_time(&self) -> i64 {
        30_000
    }
    fn length(&self) -> i64 {
        600_000
    }
    fn is_seekable(&self) -> bool {
        true
    }
    fn set_volume(&self, _level: u32) {}
    fn current_volume(&self) -> u32 {
        5
    }
    fn max_volume(&self) -> u32 {
        15
    }
    fn is_playing(&self) -> bool {
        true
    }
    fn toggle_play_pause(&self) {}
    fn select_audio_track(&self, _id: TrackId) {}
    fn select_subtitle_track(&self, _id: TrackId) {}
    fn update_viewpoint(&self, _yaw: f32, _pitch: f32, _fov_delta: f32) -> bool {
        true
    }
}

#[derive(Debug, Arbitrary)]
enum Step {
    Touch { phase: u8, x: u16, y: u16 },
    Axis { x: i8, y: i8, rz: i8 },
    Show { ms: u16 },
    Lock,
    Unlock,
    Paused,
    Playing,
    Route(Option<i8>),
    Renderer(bool),
    Spherical(bool),
    Tick,
    Release,
}

fuzz_target!(|steps: Vec<Step>| {
    let mut player = PlayerController::new(
        &PlayerConfig::default(),
        Rc::new(Engine),
        ScreenMetrics::new(1280.0, 720.0, 320.0),
        Box::new(NoPresentation),
    );
    let mut now = Instant::now();

    for step in steps.iter().take(512) {
        now += Duration::from_millis(16);
        match *step {
            Step::Touch { phase, x, y } => {
                let phase = match phase % 4 {
                    0 => TouchPhase::Down,
                    1 => TouchPhase::Move,
                    2 => TouchPhase::Up,
                    _ => TouchPhase::Cancel,
                };
                let event = TouchEvent::new(phase, f32::from(x % 1280), f32::from(y % 720));
                player.on_touch(&event, now);
            }
            Step::Axis { x, y, rz } => {
                let axis = AxisEvent {
                    x: f32::from(x) / 128.0,
                    y: f32::from(y) / 128.0,
                    rz: f32::from(rz) / 128.0,
                    ..AxisEvent::default()
                };
                player.on_axis(&axis, now);
            }
            Step::Show { ms } => {
                let hint = OverlayTimeout::After(Duration::from_millis(u64::from(ms)));
                player.show_overlay(hint, now);
            }
            Step::Lock => player.lock(),
            Step::Unlock => player.unlock(now),
            Step::Paused => player.on_playback_paused(now),
            Step::Playing => player.on_playback_playing(now),
            Step::Route(display) => {
                player.on_route_changed(display.map(i32::from));
            }
            Step::Renderer(on) => {
                let handle = on.then(|| RendererHandle::new("r", "Renderer"));
                player.select_renderer(handle);
            }
            Step::Spherical(on) => player.set_spherical(on),
            Step::Tick => {
                now += Duration::from_secs(1);
                player.tick(now);
            }
            Step::Release => player.release(),
        }

        let brightness = player.brightness();
        assert!((0.01..=1.0).contains(&brightness));
        let fov = player.fov();
        assert!(fov == 0.0 || (MIN_FOV..=MAX_FOV).contains(&fov));
        if player.overlay().is_locked() {
            assert!(player.overlay().pending_hide().is_none());
        }
    }
});
