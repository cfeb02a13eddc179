// Copyright 2025 the NIR-tree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nir_tree::{NirTree, Point, Polygon, Rectangle, polygon_fragmentation, refine, reference_tree};

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

/// Points spread over `[0, w] x [0, h]`.
fn gen_random_points(count: usize, w: f64, h: f64, seed: u64) -> Vec<Point<2>> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| Point([rng.next_f64() * w, rng.next_f64() * h]))
        .collect()
}

/// A grid of `n * n` unit cells.
fn gen_grid_polygon(n: usize) -> Polygon<2> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let (x0, y0) = (x as f64, y as f64);
            if let Ok(r) = Rectangle::new(Point([x0, y0]), Point([x0 + 1.0, y0 + 1.0])) {
                out.push(r);
            }
        }
    }
    Polygon::new(out)
}

fn bench_choose_leaf(c: &mut Criterion) {
    let mut group = c.benchmark_group("choose_leaf");
    for &n in &[64usize, 256, 1024] {
        let points = gen_random_points(n, 18.0, 11.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("reference_tree_insert_n{}", n), |b| {
            b.iter_batched(
                || NirTree::from_template(&reference_tree()),
                |mut tree| {
                    for p in points.iter().copied() {
                        black_box(tree.insert(p).ok());
                    }
                    black_box(tree.node_count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let covered = gen_random_points(256, 8.0, 2.0, 0xBADC_F00D_1234_5678)
        .into_iter()
        .map(|p| Point([p[0] + 1.0, p[1] + 1.0]))
        .collect::<Vec<_>>();
    group.bench_function("reference_tree_covered_points", |b| {
        let mut tree = NirTree::from_template(&reference_tree());
        b.iter(|| {
            for p in &covered {
                black_box(tree.choose_leaf(p).ok());
            }
        })
    });
    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_node");
    for &n in &[256usize, 4096] {
        let points = gen_random_points(n, 100.0, 100.0, 0xC1A5_7E55_9999_ABCD);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("root_leaf_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut tree = NirTree::<2>::new();
                    let root = tree.root();
                    for p in points.iter().copied() {
                        tree.push_point(root, p).expect("root is a leaf");
                    }
                    tree
                },
                |mut tree| {
                    let root = tree.root();
                    black_box(tree.split_and_replace(root, 50.0, 0).ok());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let points = gen_random_points(512, 18.0, 11.0, 0x5EED_5EED_5EED_5EED);
    group.bench_function("populated_reference_tree_root", |b| {
        b.iter_batched(
            || {
                let mut tree = NirTree::from_template(&reference_tree());
                for p in points.iter().copied() {
                    tree.insert(p).expect("insert into reference tree");
                }
                tree
            },
            |mut tree| {
                let root = tree.root();
                black_box(tree.split_and_replace(root, 5.0, 1).ok());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    for &n in &[4usize, 8, 16] {
        let grid = gen_grid_polygon(n);
        let mid = n as f64 / 2.0;
        let cut = Polygon::new(
            Rectangle::new(Point([mid - 1.5, -1.0]), Point([mid + 1.5, n as f64 + 1.0]))
                .into_iter()
                .collect(),
        );
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("fragment_then_refine_n{}", n), |b| {
            b.iter(|| black_box(refine(&polygon_fragmentation(&grid, &cut))))
        });
        group.bench_function(format!("refine_grid_n{}", n), |b| {
            b.iter(|| black_box(refine(&grid)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_choose_leaf, bench_split, bench_geometry);
criterion_main!(benches);
