// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan and zoom across a large scene and print what the selector keeps.
//!
//! Run:
//! - `cargo run -p strata_demos --example visible_list`

use kurbo::{Rect, Vec2};
use strata_index::{Aabb2D, Backend};
use strata_render::{
    IndexConfig, InteractionState, RenderConfig, SceneIndex, SceneObject, SurfaceSize, Viewport,
    select_visible,
};

fn main() {
    let objects: Vec<SceneObject> = (0..10_000_u64)
        .map(|i| {
            let x = (i % 100) as f64 * 120.0;
            let y = (i / 100) as f64 * 120.0;
            SceneObject::rectangle(i, Rect::new(x, y, x + 80.0, y + 80.0))
        })
        .collect();

    let config = RenderConfig::default();
    let mut index = SceneIndex::new(&IndexConfig::default());
    index.rebuild(&objects, None);
    println!(
        "quadtree: {} entries, {} nodes, depth {}",
        index.len(),
        index.tree().node_count(),
        index.tree().depth()
    );

    let size = SurfaceSize::new(1_280.0, 800.0);
    for (pan, zoom) in [
        (Vec2::ZERO, 1.0),
        (Vec2::new(-3_000.0, -2_000.0), 1.0),
        (Vec2::ZERO, 0.1),
        (Vec2::ZERO, 0.01),
        (Vec2::new(-24_000.0, -24_000.0), 4.0),
    ] {
        let viewport = Viewport::new(pan, zoom);
        let selection = select_visible(
            &objects,
            &viewport,
            size,
            InteractionState::Panning,
            Some(&index),
            &config,
        );
        let mut levels = [0_usize; 3];
        for item in &selection.items {
            levels[item.detail as usize] += 1;
        }
        println!(
            "pan={pan:?} zoom={zoom}: {} drawn (micro {}, simplified {}, full {}), {} culled",
            selection.items.len(),
            levels[0],
            levels[1],
            levels[2],
            selection.culled,
        );
    }

    let probe = Aabb2D::<f64>::from_xywh(0.0, 0.0, 500.0, 500.0);
    let direct = index.tree().query_rect(probe).count();
    let wrapped = index.query_rect(Rect::new(0.0, 0.0, 500.0, 500.0)).count();
    println!("500x500 world units: {direct} quadtree candidates, {wrapped} via SceneIndex");
}
