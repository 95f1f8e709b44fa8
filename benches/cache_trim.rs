// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the image cache under navigation-like access.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use lens_browse::cache::ImageCache;
use lens_browse::media::{Image, ImageContent, ImageData, StaticImage};
use std::collections::HashSet;
use std::hint::black_box;
use std::path::PathBuf;

fn image(name: &str) -> Image {
    Image::new(
        PathBuf::from("/bench").join(name),
        1024,
        ImageContent::Static(StaticImage::new(ImageData::from_rgba(
            8,
            8,
            vec![0u8; 8 * 8 * 4],
        ))),
    )
}

fn names(count: usize) -> Vec<String> {
    (0..count).map(|index| format!("img_{index:04}.png")).collect()
}

/// Insert a whole directory, then trim to a three-file window.
fn bench_trim(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let names = names(100);
    let keep: HashSet<String> = names[49..52].iter().cloned().collect();

    group.bench_function("trim_100_to_window", |b| {
        b.iter_batched(
            || {
                let cache = ImageCache::new();
                {
                    let mut guard = cache.lock();
                    for name in &names {
                        let _ = guard.insert(name.clone(), image(name));
                    }
                }
                cache
            },
            |cache| {
                cache.lock().trim_to(&keep);
                black_box(cache)
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// One navigation step: trim, look up the target, insert the neighbor.
fn bench_navigation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");
    let names = names(100);

    group.bench_function("navigation_step", |b| {
        let cache = ImageCache::new();
        let mut index = 1;
        b.iter(|| {
            let mut guard = cache.lock();
            let keep: HashSet<String> = names[index - 1..=index + 1].iter().cloned().collect();
            guard.trim_to(&keep);
            black_box(guard.get(&names[index]));
            let _ = guard.insert(names[index + 1].clone(), image(&names[index + 1]));
            index = if index + 2 < names.len() { index + 1 } else { 1 };
        });
    });

    group.bench_function("reserved_edit", |b| {
        let cache = ImageCache::new();
        let _ = cache.lock().insert("a.png", image("a.png"));
        b.iter(|| {
            black_box(
                cache
                    .lock()
                    .with_reserved("a.png", |image| image.dimensions()),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_trim, bench_navigation_step);
criterion_main!(benches);
