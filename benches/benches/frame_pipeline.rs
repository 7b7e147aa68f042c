// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use strata_frame::ManualFrameHost;
use strata_render::{
    FrameInputs, IndexConfig, InteractionState, ObjectId, Optimizations, RecordingSurface,
    RenderConfig, RenderEngine, SceneIndex, SceneObject, SurfaceSize, Viewport, select_visible,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Mixed rectangles and ellipses scattered over a 20k x 20k world.
fn gen_scene(count: usize) -> Vec<SceneObject> {
    let mut rng = Rng::new(0x5EED_0F_CA1A_5EED);
    (0..count as u64)
        .map(|id| {
            let w = 8.0 + rng.next_f64() * 160.0;
            let h = 8.0 + rng.next_f64() * 160.0;
            let x = rng.next_f64() * 20_000.0;
            let y = rng.next_f64() * 20_000.0;
            let bounds = Rect::new(x, y, x + w, y + h);
            if id % 3 == 0 {
                SceneObject::ellipse(id, bounds)
            } else {
                SceneObject::rectangle(id, bounds).with_layer((id % 4) as i32)
            }
        })
        .collect()
}

fn surfaces() -> [RecordingSurface; 3] {
    [
        RecordingSurface::new(),
        RecordingSurface::new(),
        RecordingSurface::new(),
    ]
}

const VIEW: SurfaceSize = SurfaceSize::new(1_280.0, 800.0);

fn camera() -> Viewport {
    Viewport::new(Vec2::new(-9_000.0, -9_000.0), 1.0)
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_visible");
    let config = RenderConfig::default();
    for &count in &[1_000usize, 10_000] {
        let objects = gen_scene(count);
        let mut index = SceneIndex::new(&IndexConfig::default());
        index.rebuild(&objects, None);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("linear_n{count}"), |b| {
            b.iter(|| {
                let sel = select_visible(
                    &objects,
                    &camera(),
                    VIEW,
                    InteractionState::Idle,
                    None,
                    &config,
                );
                black_box(sel.items.len())
            });
        });
        group.bench_function(format!("quadtree_n{count}"), |b| {
            b.iter(|| {
                let sel = select_visible(
                    &objects,
                    &camera(),
                    VIEW,
                    InteractionState::Panning,
                    Some(&index),
                    &config,
                );
                black_box(sel.items.len())
            });
        });
    }
    group.finish();
}

fn bench_geometry_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry_cache");
    let objects = gen_scene(5_000);
    let on = RenderConfig::default();
    let off = RenderConfig::default().without(Optimizations::GEOMETRY_CACHE);
    for (name, config) in [("cached", on), ("uncached", off)] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let mut engine =
                        RenderEngine::new(config.clone(), surfaces(), ManualFrameHost::new());
                    let zoomed_out = Viewport::new(Vec2::ZERO, 0.05);
                    engine.paint(&FrameInputs::new(&objects, zoomed_out), VIEW);
                    engine
                },
                |mut engine| {
                    let zoomed_out = Viewport::new(Vec2::new(1.0, 0.0), 0.05);
                    let report = engine.paint(&FrameInputs::new(&objects, zoomed_out), VIEW);
                    black_box(report.objects_drawn)
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_drag_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_frames");
    let mut objects = gen_scene(10_000);
    let dragged = [ObjectId(1)];
    objects[1].bounds = Rect::new(9_100.0, 9_100.0, 9_200.0, 9_200.0);
    for (name, config) in [
        ("layered", RenderConfig::default()),
        ("single_layer", RenderConfig::default().without(Optimizations::LAYERING)),
    ] {
        group.bench_function(name, |b| {
            let mut engine =
                RenderEngine::new(config.clone(), surfaces(), ManualFrameHost::new());
            engine.resize(VIEW);
            let mut now = Duration::ZERO;
            b.iter(|| {
                engine.request_frame();
                now += Duration::from_millis(8);
                let Some(id) = engine.host_mut().fire() else {
                    return;
                };
                let mut inputs = FrameInputs::new(&objects, camera());
                inputs.selection = &dragged;
                inputs.active = &dragged;
                inputs.interaction = InteractionState::Dragging;
                black_box(engine.on_frame(id, now, &inputs));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_select, bench_geometry_cache, bench_drag_frames);
criterion_main!(benches);
