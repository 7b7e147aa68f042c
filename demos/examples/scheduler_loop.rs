// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive the frame scheduler with a simulated 120 Hz display while the user
//! drags a shape, then goes idle.
//!
//! Run:
//! - `cargo run -p strata_demos --example scheduler_loop`

use core::time::Duration;

use kurbo::{Rect, Vec2};
use strata_frame::ManualFrameHost;
use strata_render::{
    FrameInputs, InteractionState, ObjectId, RecordingSurface, RenderConfig, RenderEngine,
    SceneObject, SurfaceSize, Viewport,
};

const REFRESH: Duration = Duration::from_micros(8_333);

fn main() {
    let mut objects: Vec<SceneObject> = (0..400_u64)
        .map(|i| {
            let x = (i % 20) as f64 * 60.0;
            let y = (i / 20) as f64 * 60.0;
            SceneObject::rectangle(i, Rect::new(x, y, x + 40.0, y + 40.0))
        })
        .collect();

    let mut engine = RenderEngine::new(
        RenderConfig::default(),
        [
            RecordingSurface::new(),
            RecordingSurface::new(),
            RecordingSurface::new(),
        ],
        ManualFrameHost::new(),
    );
    engine.resize(SurfaceSize::new(1_280.0, 800.0));

    let dragged = [ObjectId(42)];
    let mut now = Duration::ZERO;
    let mut painted = 0;
    for tick in 0..120_u32 {
        now += REFRESH;
        let dragging = tick < 90;
        if dragging {
            // Pointer moves every tick; each move asks for a frame.
            objects[42].bounds = objects[42].bounds + Vec2::new(2.0, 1.0);
            objects[42].revision += 1;
            engine.request_frame();
        }

        let Some(id) = engine.host_mut().fire() else {
            continue;
        };
        let mut inputs = FrameInputs::new(&objects, Viewport::default());
        if dragging {
            inputs.selection = &dragged;
            inputs.active = &dragged;
            inputs.interaction = InteractionState::Dragging;
        }
        if engine.on_frame(id, now, &inputs) {
            painted += 1;
        }
    }

    println!("painted {painted} frames over {} ticks", 120);
    let stats = engine.stats();
    println!("scheduler: {:?}", stats.scheduler);
    println!(
        "layers repainted {}, culled {}, index rebuilds {}",
        stats.layers_repainted, stats.culled, stats.index_rebuilds
    );

    engine.request_frame();
    engine.dispose();
    println!(
        "after dispose: pending callbacks fired = {:?}",
        engine.host_mut().fire()
    );
}
