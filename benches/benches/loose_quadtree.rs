// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use loosetree::{BoundingBox, BoundsExtractor, LooseQuadtree};

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

fn gen_random_boxes(count: usize, world: f64, max_size: f64) -> Vec<BoundingBox<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let w = 1.0 + rng.next_f64() * (max_size - 1.0);
        let h = 1.0 + rng.next_f64() * (max_size - 1.0);
        let x = rng.next_f64() * (world - w);
        let y = rng.next_f64() * (world - h);
        out.push(BoundingBox::new(x, y, w, h));
    }
    out
}

fn gen_clustered_boxes(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<BoundingBox<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 20_000.0, rng.next_f64() * 20_000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(BoundingBox::new(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

type SharedBoxes = Rc<RefCell<Vec<BoundingBox<f64>>>>;

// `use<>` keeps the opaque extractor from capturing the slice's lifetime,
// so callers may pass temporaries.
fn tree_over(
    boxes: &[BoundingBox<f64>],
) -> (
    SharedBoxes,
    LooseQuadtree<f64, usize, impl BoundsExtractor<f64, usize> + use<>>,
) {
    let shared: SharedBoxes = Rc::new(RefCell::new(boxes.to_vec()));
    let reader = Rc::clone(&shared);
    let tree = LooseQuadtree::new(move |id: &usize| reader.borrow()[*id]);
    (shared, tree)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &n in &[1_000usize, 4_000, 16_000] {
        let boxes = gen_random_boxes(n, 100_000.0, 500.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("insert_query_n{}", n), |b| {
            b.iter_batched(
                || tree_over(&boxes),
                |(_shared, mut tree)| {
                    for id in 0..boxes.len() {
                        tree.insert(id);
                    }
                    let hits: usize = tree
                        .query_intersects(BoundingBox::new(10_000.0, 10_000.0, 40_000.0, 40_000.0))
                        .count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy");
    let boxes = gen_random_boxes(16_000, 100_000.0, 500.0);
    let (_shared, mut tree) = tree_over(&boxes);
    for id in 0..boxes.len() {
        tree.insert(id);
    }
    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
    group.bench_function("intersects_random_regions", |b| {
        b.iter(|| {
            let x = rng.next_f64() * 90_000.0;
            let y = rng.next_f64() * 90_000.0;
            let probe = BoundingBox::new(x, y, 5_000.0, 5_000.0);
            let hits: usize = tree.query_intersects(probe).count();
            black_box(hits);
        })
    });
    group.bench_function("inside_random_regions", |b| {
        b.iter(|| {
            let x = rng.next_f64() * 80_000.0;
            let y = rng.next_f64() * 80_000.0;
            let probe = BoundingBox::new(x, y, 20_000.0, 20_000.0);
            let hits: usize = tree.query_inside(probe).count();
            black_box(hits);
        })
    });
    group.bench_function("contains_random_points", |b| {
        b.iter(|| {
            let x = rng.next_f64() * 99_000.0;
            let y = rng.next_f64() * 99_000.0;
            let probe = BoundingBox::new(x, y, 2.0, 2.0);
            let hits: usize = tree.query_contains(probe).count();
            black_box(hits);
        })
    });
    group.finish();
}

fn bench_update_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy");
    let boxes = gen_random_boxes(16_000, 100_000.0, 500.0);
    let (shared, mut tree) = tree_over(&boxes);
    for id in 0..boxes.len() {
        tree.insert(id);
    }
    let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
    let mut next = 0usize;
    group.throughput(Throughput::Elements(64));
    group.bench_function("jitter_and_update", |b| {
        b.iter(|| {
            for _ in 0..64 {
                let id = next % boxes.len();
                next = next.wrapping_add(1);
                {
                    let mut all = shared.borrow_mut();
                    let bx = all[id];
                    let dx = (rng.next_f64() - 0.5) * 200.0;
                    let dy = (rng.next_f64() - 0.5) * 200.0;
                    all[id] = BoundingBox::new(bx.left + dx, bx.top + dy, bx.width, bx.height);
                }
                tree.update(id);
            }
            black_box(tree.len());
        })
    });
    group.finish();
}

fn bench_cleanup_clustered(c: &mut Criterion) {
    let mut group = c.benchmark_group("cleanup");
    let boxes = gen_clustered_boxes(64, 128, 300.0);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("churn_and_force_cleanup", |b| {
        b.iter_batched(
            || {
                let (shared, mut tree) = tree_over(&boxes);
                for id in 0..boxes.len() {
                    tree.insert(id);
                }
                (shared, tree)
            },
            |(_shared, mut tree)| {
                for id in (0..boxes.len()).step_by(2) {
                    tree.remove(&id);
                }
                tree.force_cleanup();
                let hits: usize = tree
                    .query_intersects(BoundingBox::new(0.0, 0.0, 20_000.0, 20_000.0))
                    .count();
                black_box(hits);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_query_heavy,
    bench_update_heavy,
    bench_cleanup_clustered,
);
criterion_main!(benches);
