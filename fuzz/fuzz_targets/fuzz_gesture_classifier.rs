#![no_main]

use std::cell::Cell;
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

use playctl_core::action::GestureAction;
use playctl_core::event::{PinchEvent, PinchPhase, TouchControls, TouchEvent, TouchPhase};
use playctl_core::geometry::ScreenMetrics;
use playctl_core::gesture::{GestureClassifier, GestureConfig, UiModes};
use playctl_core::playback::{PlaybackFacade, TrackId};

struct Engine {
    time: Cell<i64>,
    length: i64,
    seekable: bool,
    volume: Cell<u32>,
    max_volume: u32,
}

impl PlaybackFacade for Engine {
    fn seek_to(&self, millis: i64) {
        self.time.set(millis);
    }
    fn current_time(&self) -> i64 {
        self.time.get()
    }
    fn length(&self) -> i64 {
        self.length
    }
    fn is_seekable(&self) -> bool {
        self.seekable
    }
    fn set_volume(&self, level: u32) {
        self.volume.set(level);
    }
    fn current_volume(&self) -> u32 {
        self.volume.get()
    }
    fn max_volume(&self) -> u32 {
        self.max_volume
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
    Touch { phase: u8, x: f32, y: f32, dt_ms: u16 },
    Pinch { phase: u8, scale: f32 },
    Modes { locked: bool, fov: u8, panel: u8, controls: u8, primary: bool },
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    height: u16,
    dpi: u16,
    length: i32,
    seekable: bool,
    volume: u8,
    max_volume: u8,
    boost: bool,
    steps: Vec<Step>,
}

fuzz_target!(|input: Input| {
    let engine = Rc::new(Engine {
        time: Cell::new(0),
        length: i64::from(input.length),
        seekable: input.seekable,
        volume: Cell::new(u32::from(input.volume)),
        max_volume: u32::from(input.max_volume),
    });
    let screen = ScreenMetrics::new(
        f32::from(input.width),
        f32::from(input.height),
        f32::from(input.dpi),
    );
    let config = GestureConfig::default().with_audio_boost(input.boost);
    let mut classifier = GestureClassifier::new(config, engine.clone(), screen);
    let mut modes = UiModes::default();
    let mut now = Instant::now();
    let mut open = false;

    for step in input.steps.iter().take(512) {
        match *step {
            Step::Touch { phase, x, y, dt_ms } => {
                now += Duration::from_millis(u64::from(dt_ms));
                let phase = match phase % 4 {
                    0 => TouchPhase::Down,
                    1 => TouchPhase::Move,
                    2 => TouchPhase::Up,
                    _ => TouchPhase::Cancel,
                };
                let out = classifier.process(&TouchEvent::new(phase, x, y), &modes, now);
                let ends = out.iter().filter(|a| a.is_session_end()).count();
                match phase {
                    TouchPhase::Down => {
                        // Only a stale session can end here, and it ends first.
                        assert_eq!(ends, usize::from(open));
                        open = true;
                    }
                    TouchPhase::Up | TouchPhase::Cancel => {
                        assert_eq!(ends, usize::from(open));
                        if open {
                            assert!(out.last().is_some_and(GestureAction::is_session_end));
                        }
                        open = false;
                    }
                    TouchPhase::Move => assert_eq!(ends, 0),
                }
                for action in &out {
                    if let GestureAction::SetVolume { level } = action {
                        engine.set_volume(*level);
                    }
                }
            }
            Step::Pinch { phase, scale } => {
                let phase = match phase % 3 {
                    0 => PinchPhase::Begin,
                    1 => PinchPhase::Update,
                    _ => PinchPhase::End,
                };
                let _ = classifier.process_pinch(&PinchEvent::new(phase, scale), &modes);
            }
            Step::Modes { locked, fov, panel, controls, primary } => {
                modes.locked = locked;
                modes.fov = if fov % 2 == 0 { 0.0 } else { f32::from(fov) };
                modes.options_showing = panel % 3 == 1;
                modes.playlist_showing = panel % 3 == 2;
                modes.touch_controls = TouchControls::from_bits_truncate(controls);
                modes.primary_output = primary;
            }
        }
        assert_eq!(classifier.session().is_some(), open);
    }
});
