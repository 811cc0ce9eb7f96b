// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic images for unit tests.

use image::{DynamicImage, Rgb, RgbImage};

use crate::raster::RasterImage;

/// Deterministic RGB noise. Compresses poorly, so encoded sizes are large and
/// track pixel count closely.
pub fn noise_image(width: u32, height: u32, seed: u32) -> RasterImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    let mut next = move || {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let img = RgbImage::from_fn(width, height, |_, _| {
        let v = next();
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    });
    RasterImage::from_dynamic(DynamicImage::ImageRgb8(img))
}

/// A single flat colour. Compresses to almost nothing.
pub fn flat_image(width: u32, height: u32) -> RasterImage {
    RasterImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb([70, 130, 180]),
    )))
}
