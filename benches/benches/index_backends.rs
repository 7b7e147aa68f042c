// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use strata_index::{Aabb2D, Index};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

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

/// Canvas-like spread: many small shapes over a large world.
fn gen_random_rects(count: usize, world: f64, max_side: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    (0..count)
        .map(|_| {
            let w = 4.0 + rng.next_f64() * max_side;
            let h = 4.0 + rng.next_f64() * max_side;
            let x0 = rng.next_f64() * (world - w);
            let y0 = rng.next_f64() * (world - h);
            Aabb2D::<f64>::from_xywh(x0, y0, w, h)
        })
        .collect()
}

/// Tight groups, as when a user duplicates a component many times.
fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let centers: Vec<_> = (0..n_clusters)
        .map(|_| (rng.next_f64() * 20_000.0, rng.next_f64() * 20_000.0))
        .collect();
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn entries(rects: &[Aabb2D<f64>]) -> impl Iterator<Item = (Aabb2D<f64>, u32)> + '_ {
    rects.iter().copied().zip(0_u32..)
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("rebuild");
    for &count in &[1_000usize, 5_000, 20_000] {
        let rects = gen_random_rects(count, 20_000.0, 120.0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("flatvec_n{count}"), |b| {
            b.iter_batched(
                Index::<f64, u32>::new,
                |mut idx| {
                    idx.rebuild(entries(&rects));
                    black_box(idx.len());
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("quadtree_n{count}"), |b| {
            b.iter_batched(
                || Index::<f64, u32>::with_quadtree(8, 12),
                |mut idx| {
                    idx.rebuild(entries(&rects));
                    black_box(idx.backend().node_count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_viewport_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport_query");
    // A 1280x800 view somewhere inside a 20k x 20k world.
    let view = Aabb2D::<f64>::from_xywh(9_000.0, 9_000.0, 1_280.0, 800.0);
    for &count in &[1_000usize, 5_000, 20_000] {
        let rects = gen_random_rects(count, 20_000.0, 120.0);
        let mut flat = Index::<f64, u32>::new();
        flat.rebuild(entries(&rects));
        let mut tree = Index::<f64, u32>::with_quadtree(8, 12);
        tree.rebuild(entries(&rects));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("flatvec_n{count}"), |b| {
            b.iter(|| black_box(flat.query_rect(view).count()));
        });
        group.bench_function(format!("quadtree_n{count}"), |b| {
            b.iter(|| black_box(tree.query_rect(view).count()));
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_query");
    let grid = gen_grid_rects(128, 10.0);
    let clustered = gen_clustered_rects(64, 256, 400.0);
    for (name, rects) in [("grid", &grid), ("clustered", &clustered)] {
        let mut flat = Index::<f64, u32>::new();
        flat.rebuild(entries(rects));
        let mut tree = Index::<f64, u32>::with_quadtree(8, 12);
        tree.rebuild(entries(rects));
        let probes: Vec<_> = {
            let mut rng = Rng::new(0xBADC_F00D_1234_5678);
            (0..256)
                .map(|_| (rng.next_f64() * 1_280.0, rng.next_f64() * 1_280.0))
                .collect()
        };
        group.bench_function(format!("flatvec_{name}"), |b| {
            b.iter(|| {
                let hits: usize = probes
                    .iter()
                    .map(|&(x, y)| flat.query_point(x, y).count())
                    .sum();
                black_box(hits)
            });
        });
        group.bench_function(format!("quadtree_{name}"), |b| {
            b.iter(|| {
                let hits: usize = probes
                    .iter()
                    .map(|&(x, y)| tree.query_point(x, y).count())
                    .sum();
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rebuild, bench_viewport_query, bench_hit_test);
criterion_main!(benches);
