use std::hint::black_box;
use std::time::Instant;

use blockworld_common::Camera;
use blockworld_kernel::{VoxelStore, WorldGenConfig, generate};
use blockworld_render::{Painter, Projector, Viewport};
use glam::Vec3;

fn make_store(world_size: i32) -> VoxelStore {
    let config = WorldGenConfig {
        world_size,
        ..WorldGenConfig::default()
    };
    VoxelStore::from_blocks(generate(&config, Some(42)))
}

fn bench_project(world_size: i32, iterations: usize) {
    let store = make_store(world_size);
    let projector = Projector::default();
    let viewport = Viewport::default();
    let mut camera = Camera::new(Vec3::new(0.0, 8.0, -10.0), 0.0);

    let start = Instant::now();
    let mut drawn = 0usize;
    for _ in 0..iterations {
        camera.rotate(0.01);
        let list = projector.project(black_box(&store), &camera, viewport);
        drawn += list.items.len();
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  project ({} blocks, {iterations} iters): {per_iter:?}/iter, avg drawn {}",
        store.len(),
        drawn / iterations
    );
}

fn bench_paint(iterations: usize) {
    let store = make_store(15);
    let viewport = Viewport::default();
    let camera = Camera::new(Vec3::new(0.0, 8.0, -10.0), 0.0);
    let list = Projector::default().project(&store, &camera, viewport);
    let painter = Painter::default();

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(painter.paint(&list, viewport));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  paint ({} items, {iterations} iters): {per_iter:?}/iter",
        list.items.len()
    );
}

fn main() {
    println!("=== Projection Benchmarks ===");
    bench_project(15, 1000);
    bench_project(60, 200);
    bench_project(200, 20);
    println!("=== Rasterisation Benchmarks ===");
    bench_paint(20);
}
