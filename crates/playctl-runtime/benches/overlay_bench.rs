//! Benchmarks for the per-event runtime path.
//!
//! Every touch sample goes through `PlayerController::on_touch` on the UI
//! thread, so a whole drag must stay well inside one frame (16ms).
//!
//! Run with: cargo bench -p playctl-runtime --bench overlay_bench

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;

use web_time::{Duration, Instant};

use playctl_core::event::TouchEvent;
use playctl_core::geometry::{ScreenMetrics, ScreenOrientation};
use playctl_core::testing::FakePlayback;
use playctl_runtime::{
    NoPresentation, OrientationLockMode, OrientationPolicy, OverlayConfig, OverlayController,
    OverlayTimeout, PlayerConfig, PlayerController,
};

const MS_16: Duration = Duration::from_millis(16);

fn player() -> PlayerController {
    PlayerController::new(
        &PlayerConfig::default(),
        Rc::new(FakePlayback::new()),
        ScreenMetrics::new(1920.0, 1080.0, 440.0),
        Box::new(NoPresentation),
    )
}

/// DOWN, `moves` MOVEs along `(dx, dy)` steps, UP.
fn drag(p: &mut PlayerController, start: (f32, f32), step: (f32, f32), moves: usize, t0: Instant) {
    let mut now = t0;
    let (mut x, mut y) = start;
    p.on_touch(&TouchEvent::down(x, y), now);
    for _ in 0..moves {
        now += MS_16;
        x += step.0;
        y += step.1;
        black_box(p.on_touch(&TouchEvent::moved(x, y), now));
    }
    now += MS_16;
    p.on_touch(&TouchEvent::up(x, y), now);
}

// =============================================================================
// Controller
// =============================================================================

fn bench_controller(c: &mut Criterion) {
    let mut group = c.benchmark_group("player_controller");

    group.bench_function("seek_drag_60_moves", |b| {
        let mut p = player();
        b.iter(|| drag(&mut p, (300.0, 540.0), (10.0, 0.0), 60, Instant::now()));
    });

    group.bench_function("brightness_swipe_60_moves", |b| {
        let mut p = player();
        b.iter(|| drag(&mut p, (200.0, 900.0), (0.0, -10.0), 60, Instant::now()));
    });

    group.finish();
}

// =============================================================================
// Overlay
// =============================================================================

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");

    group.bench_function("show_hide_cycle", |b| {
        let policy =
            OrientationPolicy::new(OrientationLockMode::Free, ScreenOrientation::Landscape);
        let mut o =
            OverlayController::new(OverlayConfig::default(), policy, ScreenOrientation::Landscape);
        o.set_playing(true);
        let t = Instant::now();
        b.iter(|| {
            black_box(o.show(OverlayTimeout::Default, t));
            o.hide(true);
        });
    });

    group.bench_function("tick_idle", |b| {
        let mut p = player();
        let t = Instant::now();
        b.iter(|| black_box(p.tick(t)));
    });

    group.finish();
}

criterion_group!(benches, bench_controller, bench_overlay);
criterion_main!(benches);
