// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint a small mixed scene once and dump what each layer recorded.
//!
//! Run:
//! - `cargo run -p strata_demos --example basic_paint`

use kurbo::{Point, Rect, Vec2};
use strata_frame::ManualFrameHost;
use strata_render::{
    DrawOp, FrameInputs, Layer, ObjectId, RecordingSurface, RenderConfig, RenderEngine, Rgba8,
    SceneObject, Style, SurfaceSize, TextStyle, Viewport,
};

fn main() {
    let objects = vec![
        SceneObject::rectangle(1, Rect::new(20.0, 20.0, 220.0, 140.0)).with_style(Style {
            fill: Some(Rgba8::rgb(0xf4, 0xd3, 0x5e)),
            ..Style::default()
        }),
        SceneObject::ellipse(2, Rect::new(260.0, 40.0, 380.0, 120.0)),
        SceneObject::text(
            3,
            Rect::new(20.0, 180.0, 300.0, 210.0),
            TextStyle::new("infinite canvas", 18.0),
        ),
        SceneObject::polyline(
            4,
            &[
                Point::new(400.0, 200.0),
                Point::new(460.0, 140.0),
                Point::new(520.0, 220.0),
            ],
        ),
        // Far off screen; culled.
        SceneObject::rectangle(5, Rect::new(50_000.0, 0.0, 50_100.0, 100.0)),
    ];

    let mut engine = RenderEngine::new(
        RenderConfig::default(),
        [
            RecordingSurface::new(),
            RecordingSurface::new(),
            RecordingSurface::new(),
        ],
        ManualFrameHost::new(),
    );

    let selection = [ObjectId(2)];
    let mut inputs = FrameInputs::new(&objects, Viewport::new(Vec2::new(10.0, 10.0), 1.5));
    inputs.selection = &selection;

    let report = engine.paint(&inputs, SurfaceSize::new(800.0, 600.0).with_scale_factor(2.0));
    println!("{report:?}");

    for layer in Layer::ALL {
        let surface = engine.compositor().surface(layer);
        println!(
            "{layer:?}: {:?} physical, {} ops",
            surface.physical_size(),
            surface.ops().len()
        );
        for op in surface.ops() {
            match op {
                DrawOp::Transform(_) | DrawOp::Opacity(_) => {}
                other => println!("  {}", summarize(other)),
            }
        }
    }

    let hit = engine.hit_test(&objects, Point::new(300.0, 80.0));
    println!("hit at (300, 80): {hit:?}");
    println!("{:#?}", engine.stats());
}

fn summarize(op: &DrawOp) -> String {
    match op {
        DrawOp::FillPath { path, color } => {
            format!("fill path ({} elements) {color:?}", path.elements().len())
        }
        DrawOp::StrokePath { path, style, .. } => format!(
            "stroke path ({} elements) width {} dash {:?}",
            path.elements().len(),
            style.width,
            style.dash
        ),
        DrawOp::FillRect { rect, .. } => format!("fill rect {rect:?}"),
        DrawOp::Text {
            content, font_size, ..
        } => format!("text {content:?} @ {font_size}px"),
        DrawOp::Transform(_) | DrawOp::Opacity(_) => String::new(),
    }
}
