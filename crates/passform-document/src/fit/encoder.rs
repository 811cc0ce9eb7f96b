// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exact-size raster encoder.
//
// Stages, first success wins:
//   1. encode at quality 90;
//   2. binary-search quality in [10, 95] (JPEG and WebP only);
//   3. shrink both sides by 10% per step at quality 90, never below 50 px;
//   4. give back the stage-1 encode, oversize.

use std::borrow::Cow;

use passform_core::error::Result;
use passform_core::{BlobKind, EncodedBlob, RasterFormat, SizeBudget};
use tracing::{info, instrument, warn};

use super::search::{RASTER_QUALITY, highest_fitting_quality};
use super::{FitOutcome, FitReport, FitStrategy};
use crate::raster::RasterImage;

/// Quality of the first encode and of every downscale step.
pub const INITIAL_QUALITY: u8 = 90;

/// Downscaling never shrinks a side below this many pixels.
pub const MIN_SIDE_PX: u32 = 50;

/// Fits one raster format to a byte budget.
#[derive(Debug, Clone, Copy)]
pub struct ExactSizeEncoder {
    format: RasterFormat,
}

impl ExactSizeEncoder {
    pub fn new(format: RasterFormat) -> Self {
        Self { format }
    }

    /// Encode `image` so that the result is at most `budget` bytes, preferring
    /// the largest such encode. When nothing fits, the quality-90 encode of
    /// the full-size image is returned and `report.within_budget` is false.
    #[instrument(
        skip(self, image),
        fields(format = ?self.format, width = image.width(), height = image.height(), budget = budget.bytes())
    )]
    pub fn fit(&self, image: &RasterImage, budget: SizeBudget) -> Result<FitOutcome> {
        // Flatten once so every JPEG probe reuses the same RGB buffer.
        let source: Cow<'_, RasterImage> = match self.format {
            RasterFormat::Jpeg => Cow::Owned(image.flattened()),
            _ => Cow::Borrowed(image),
        };
        let (width, height) = (source.width(), source.height());

        let first = source.encode(self.format, INITIAL_QUALITY)?;
        if budget.admits(first.len()) {
            info!(len = first.len(), "High-quality encode fits");
            return Ok(self.outcome(
                first,
                FitStrategy::HighQuality,
                INITIAL_QUALITY,
                (width, height),
                budget,
            ));
        }

        if self.format.supports_quality() {
            let found = highest_fitting_quality(RASTER_QUALITY, budget, |quality| {
                source.encode(self.format, quality)
            })?;
            if let Some((quality, bytes)) = found {
                info!(quality, len = bytes.len(), "Quality search fit");
                return Ok(self.outcome(
                    bytes,
                    FitStrategy::QualitySearch,
                    quality,
                    (width, height),
                    budget,
                ));
            }
        }

        let (mut w, mut h) = (width, height);
        while w > MIN_SIDE_PX && h > MIN_SIDE_PX {
            w = shrink(w);
            h = shrink(h);
            let candidate = source.resize_exact(w, h).encode(self.format, INITIAL_QUALITY)?;
            if budget.admits(candidate.len()) {
                info!(w, h, len = candidate.len(), "Downscaled encode fits");
                return Ok(self.outcome(
                    candidate,
                    FitStrategy::Downscale,
                    INITIAL_QUALITY,
                    (w, h),
                    budget,
                ));
            }
        }

        warn!(
            len = first.len(),
            budget = budget.bytes(),
            "No encode fits the budget; returning the quality-90 encode"
        );
        Ok(self.outcome(
            first,
            FitStrategy::Fallback,
            INITIAL_QUALITY,
            (width, height),
            budget,
        ))
    }

    fn outcome(
        &self,
        bytes: Vec<u8>,
        strategy: FitStrategy,
        quality: u8,
        (width, height): (u32, u32),
        budget: SizeBudget,
    ) -> FitOutcome {
        let report = FitReport {
            strategy,
            quality: self.format.supports_quality().then_some(quality),
            width,
            height,
            encoded_len: bytes.len(),
            within_budget: budget.admits(bytes.len()),
        };
        FitOutcome {
            blob: EncodedBlob::new(bytes, BlobKind::Raster(self.format)),
            report,
        }
    }
}

/// One 10% downscale step: floor, clamped to [`MIN_SIDE_PX`].
fn shrink(side: u32) -> u32 {
    ((side as u64 * 9 / 10) as u32).max(MIN_SIDE_PX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat_image, noise_image};

    fn budget(bytes: usize) -> SizeBudget {
        SizeBudget::from_bytes(bytes).unwrap()
    }

    #[test]
    fn shrink_floors_and_clamps() {
        assert_eq!(shrink(500), 450);
        assert_eq!(shrink(99), 89);
        assert_eq!(shrink(55), MIN_SIDE_PX);
        assert_eq!(shrink(51), MIN_SIDE_PX);
    }

    #[test]
    fn generous_budget_short_circuits_at_quality_90() {
        let image = flat_image(64, 64);
        let outcome = ExactSizeEncoder::new(RasterFormat::Jpeg)
            .fit(&image, budget(1_000_000))
            .unwrap();
        assert_eq!(outcome.report.strategy, FitStrategy::HighQuality);
        assert_eq!(outcome.report.quality, Some(90));
        assert!(outcome.report.within_budget);
        assert_eq!(outcome.blob.kind, BlobKind::Raster(RasterFormat::Jpeg));
    }

    #[test]
    fn jpeg_quality_search_fits_below_initial_quality() {
        let image = noise_image(160, 160, 7);
        let at_90 = image.flattened().encode(RasterFormat::Jpeg, 90).unwrap().len();
        let at_10 = image.flattened().encode(RasterFormat::Jpeg, 10).unwrap().len();
        let target = budget((at_10 + at_90) / 2);

        let outcome = ExactSizeEncoder::new(RasterFormat::Jpeg).fit(&image, target).unwrap();
        assert_eq!(outcome.report.strategy, FitStrategy::QualitySearch);
        assert!(outcome.report.within_budget);
        assert!(outcome.blob.len() <= target.bytes());
        assert_eq!((outcome.report.width, outcome.report.height), (160, 160));
    }

    #[test]
    fn png_downscales_when_lossless_is_too_big() {
        let image = noise_image(200, 200, 3);
        let full = image.encode(RasterFormat::Png, 90).unwrap().len();
        let target = budget(full / 2);

        let outcome = ExactSizeEncoder::new(RasterFormat::Png).fit(&image, target).unwrap();
        assert_eq!(outcome.report.strategy, FitStrategy::Downscale);
        assert_eq!(outcome.report.quality, None);
        assert!(outcome.report.width < 200);
        assert!(outcome.report.width >= MIN_SIDE_PX);
        assert!(outcome.blob.len() <= target.bytes());
    }

    #[test]
    fn unreachable_budget_returns_first_encode() {
        let image = noise_image(120, 120, 11);
        let first = image.encode(RasterFormat::Bmp, 90).unwrap();

        let outcome = ExactSizeEncoder::new(RasterFormat::Bmp)
            .fit(&image, budget(1_000))
            .unwrap();
        assert_eq!(outcome.report.strategy, FitStrategy::Fallback);
        assert!(!outcome.report.within_budget);
        assert_eq!(outcome.blob.bytes, first);
    }
}
