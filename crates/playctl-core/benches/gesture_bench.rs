//! Benchmark: per-event gesture classification latency.
//!
//! Run with: `cargo bench -p playctl-core --bench gesture_bench`
//!
//! Touch events arrive at display refresh rate, so a full session (DOWN,
//! a stream of MOVEs, UP) must classify well inside one frame.

use std::cell::Cell;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use playctl_core::event::TouchEvent;
use playctl_core::geometry::ScreenMetrics;
use playctl_core::gesture::{GestureClassifier, GestureConfig, UiModes};
use playctl_core::playback::{PlaybackFacade, TrackId};
use playctl_core::seek_math;
use web_time::{Duration, Instant};

struct NullPlayback {
    volume: Cell<u32>,
}

impl PlaybackFacade for NullPlayback {
    fn seek_to(&self, _millis: i64) {}
    fn current_time(&self) -> i64 {
        600_000
    }
    fn length(&self) -> i64 {
        3_600_000
    }
    fn is_seekable(&self) -> bool {
        true
    }
    fn set_volume(&self, level: u32) {
        self.volume.set(level);
    }
    fn current_volume(&self) -> u32 {
        self.volume.get()
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
        false
    }
}

fn classifier() -> GestureClassifier {
    GestureClassifier::new(
        GestureConfig::default(),
        Rc::new(NullPlayback {
            volume: Cell::new(7),
        }),
        ScreenMetrics::default(),
    )
}

/// DOWN, `moves` MOVEs along `(step_x, step_y)`, then UP.
fn session(
    gc: &mut GestureClassifier,
    modes: &UiModes,
    start: (f32, f32),
    step: (f32, f32),
    moves: usize,
    t0: Instant,
) -> usize {
    let frame = Duration::from_millis(16);
    let (mut x, mut y) = start;
    let mut now = t0;
    let mut emitted = gc.process(&TouchEvent::down(x, y), modes, now).len();
    for _ in 0..moves {
        x += step.0;
        y += step.1;
        now += frame;
        emitted += gc.process(&TouchEvent::moved(x, y), modes, now).len();
    }
    now += frame;
    emitted += gc.process(&TouchEvent::up(x, y), modes, now).len();
    emitted
}

// ===========================================================================
// Full sessions
// ===========================================================================

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_session");
    let modes = UiModes::default();

    group.bench_function("seek_drag_60_moves", |b| {
        let mut gc = classifier();
        let mut t0 = Instant::now();
        b.iter(|| {
            // Space sessions out so the seek streak never builds up.
            t0 += Duration::from_secs(5);
            black_box(session(&mut gc, &modes, (400.0, 540.0), (8.0, 0.0), 60, t0))
        });
    });

    group.bench_function("volume_swipe_60_moves", |b| {
        let mut gc = classifier();
        let mut t0 = Instant::now();
        b.iter(|| {
            t0 += Duration::from_secs(5);
            black_box(session(&mut gc, &modes, (1700.0, 900.0), (0.0, -10.0), 60, t0))
        });
    });

    group.bench_function("tap", |b| {
        let mut gc = classifier();
        let mut t0 = Instant::now();
        b.iter(|| {
            t0 += Duration::from_secs(1);
            black_box(session(&mut gc, &modes, (960.0, 540.0), (0.0, 0.0), 0, t0))
        });
    });

    group.finish();
}

// ===========================================================================
// Seek curve
// ===========================================================================

fn bench_seek_math(c: &mut Criterion) {
    c.bench_function("seek_jump_millis", |b| {
        b.iter(|| {
            let mut acc = 0i64;
            for i in 1..=64 {
                let cm = i as f32 * 0.25;
                acc = acc.wrapping_add(seek_math::seek_jump_millis(black_box(cm), 1));
            }
            acc
        });
    });
}

criterion_group!(benches, bench_sessions, bench_seek_math);
criterion_main!(benches);
