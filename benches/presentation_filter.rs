// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for presentation filters on a 512x512 slice.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use study_lens::domain::viewing::FilterPercent;
use study_lens::media::PresentationFilter;

const SIDE: usize = 512;

fn gradient() -> Vec<u8> {
    (0..SIDE * SIDE)
        .flat_map(|i| {
            let v = (i % 256) as u8;
            [v, v, v, 255]
        })
        .collect()
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("presentation_filter");
    let pixels = gradient();

    let identity = PresentationFilter::default();
    group.bench_function("identity", |b| {
        b.iter(|| black_box(identity.apply(black_box(&pixels))));
    });

    let adjusted = PresentationFilter {
        contrast: FilterPercent::new(150.0),
        brightness: FilterPercent::new(80.0),
        invert: true,
    };
    group.bench_function("contrast_brightness_invert", |b| {
        b.iter(|| black_box(adjusted.apply(black_box(&pixels))));
    });

    group.bench_function("lookup_table", |b| {
        b.iter(|| black_box(adjusted.lookup_table()));
    });

    group.finish();
}

criterion_group!(benches, bench_apply);
criterion_main!(benches);
