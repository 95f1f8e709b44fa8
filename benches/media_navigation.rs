// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for media navigation operations.
//!
//! Measures the performance of:
//! - Directory listing (finding and sorting all media files)
//! - Refresh (diffing a listing into change notifications)
//! - Decoding the file a navigation lands on

use criterion::{criterion_group, criterion_main, Criterion};
use image_rs::{Rgba, RgbaImage};
use lens_browse::application::port::{Directory, ImageDecoder};
use lens_browse::directory_scanner::DirectoryManager;
use lens_browse::media::FsDecoder;
use std::hint::black_box;
use std::path::Path;
use tempfile::TempDir;

const FILES: usize = 200;

/// A directory with `FILES` small PNGs and a few files to skip.
fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for index in 0..FILES {
        write_png(&dir.path().join(format!("img_{index:04}.png")), 16, 16);
    }
    std::fs::write(dir.path().join("readme.txt"), "skip me").unwrap();
    std::fs::write(dir.path().join("data.bin"), [0u8; 64]).unwrap();
    dir
}

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
        .save(path)
        .unwrap();
}

/// Benchmark listing a directory.
fn bench_list_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("media_navigation");
    let dir = fixture_dir();

    group.bench_function("list_directory", |b| {
        b.iter(|| {
            let manager = DirectoryManager::open(dir.path()).unwrap();
            black_box(manager.file_count());
        });
    });

    group.bench_function("index_of_last", |b| {
        let manager = DirectoryManager::open(dir.path()).unwrap();
        let name = format!("img_{:04}.png", FILES - 1);
        b.iter(|| black_box(manager.index_of(&name)));
    });

    group.finish();
}

/// Benchmark a refresh that finds nothing changed.
fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("media_navigation");
    let dir = fixture_dir();
    let mut manager = DirectoryManager::open(dir.path()).unwrap();

    group.bench_function("refresh_unchanged", |b| {
        b.iter(|| black_box(manager.refresh().unwrap()));
    });

    group.finish();
}

/// Benchmark decoding the file a navigation lands on.
fn bench_navigate_and_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("media_navigation");
    let dir = tempfile::tempdir().unwrap();
    let small = dir.path().join("small.png");
    let large = dir.path().join("large.png");
    write_png(&small, 64, 64);
    write_png(&large, 1024, 768);

    group.bench_function("decode_small_png", |b| {
        b.iter(|| black_box(FsDecoder.decode(&small).unwrap()));
    });

    group.sample_size(20);
    group.bench_function("decode_large_png", |b| {
        b.iter(|| black_box(FsDecoder.decode(&large).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_list_directory,
    bench_refresh,
    bench_navigate_and_decode
);
criterion_main!(benches);
