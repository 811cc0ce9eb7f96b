// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the passform-document fitters. Both run on a
// synthetic noise image, which defeats compression and forces the quality
// search to run its full course.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use passform_core::{PaperSize, RasterFormat, SizeBudget};
use passform_document::{ExactSizeEncoder, ExactSizePdfBuilder, RasterImage};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 256x256 pseudo-random RGB image.
fn noise_image() -> RasterImage {
    let mut state: u32 = 0x9E37_79B9;
    let img = RgbImage::from_fn(256, 256, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        Rgb([state as u8, (state >> 8) as u8, (state >> 16) as u8])
    });
    RasterImage::from_dynamic(DynamicImage::ImageRgb8(img))
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// JPEG fit to a budget that rejects the quality-90 encode.
fn bench_jpeg_fit(c: &mut Criterion) {
    let image = noise_image();
    let budget = SizeBudget::from_kb(20).expect("valid budget");
    let encoder = ExactSizeEncoder::new(RasterFormat::Jpeg);

    c.bench_function("jpeg_fit (256x256, 20 KB)", |b| {
        b.iter(|| {
            let outcome = encoder.fit(black_box(&image), budget).expect("fit");
            black_box(outcome.blob.len());
        });
    });
}

/// A4 image PDF fit with a budget that needs a few scale steps.
fn bench_pdf_fit(c: &mut Criterion) {
    let image = noise_image();
    let budget = SizeBudget::from_kb(10).expect("valid budget");
    let builder = ExactSizePdfBuilder::new(PaperSize::A4);

    c.bench_function("pdf_fit (256x256, 10 KB)", |b| {
        b.iter(|| {
            let outcome = builder.fit(black_box(&image), budget).expect("fit");
            black_box(outcome.blob.len());
        });
    });
}

criterion_group!(benches, bench_jpeg_fit, bench_pdf_fit);
criterion_main!(benches);
