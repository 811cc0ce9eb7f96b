// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exact-size PDF builder.
//
// The page is fixed; only the embedded JPEG varies. For each scale, largest
// first, the source is resampled and JPEG quality is binary-searched against
// the size of the whole PDF. The first scale with a fitting quality wins.

use passform_core::error::Result;
use passform_core::{BlobKind, EncodedBlob, PaperSize, RasterFormat, SizeBudget};
use tracing::{debug, info, instrument, warn};

use super::search::{PDF_IMAGE_QUALITY, highest_fitting_quality};
use super::{FitOutcome, FitReport, FitStrategy};
use crate::pdf::PdfWriter;
use crate::raster::RasterImage;

/// Resample factors tried in order.
pub const SCALES: [f64; 10] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.45, 0.4, 0.35, 0.3];

/// Linear shrink divisor for the last-resort page.
pub const FALLBACK_DIVISOR: u32 = 3;

/// JPEG quality of the last-resort page.
pub const FALLBACK_QUALITY: u8 = 60;

/// Fits a single-page image PDF to a byte budget.
#[derive(Debug, Clone)]
pub struct ExactSizePdfBuilder {
    writer: PdfWriter,
}

impl ExactSizePdfBuilder {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            writer: PdfWriter::new(paper_size),
        }
    }

    /// Build the largest, highest-quality page that fits `budget`. When no
    /// scale/quality pair fits, returns the one-third-size quality-60 page
    /// even if it is oversize.
    #[instrument(
        skip(self, image),
        fields(width = image.width(), height = image.height(), budget = budget.bytes())
    )]
    pub fn fit(&self, image: &RasterImage, budget: SizeBudget) -> Result<FitOutcome> {
        let source = image.flattened();
        let (orig_w, orig_h) = (source.width(), source.height());

        for scale in SCALES {
            let (w, h) = scaled_dimensions(orig_w, orig_h, scale);
            let scaled = source.resize_exact(w, h);

            let found = highest_fitting_quality(PDF_IMAGE_QUALITY, budget, |quality| {
                self.build_page(&scaled, quality)
            })?;

            match found {
                Some((quality, pdf)) => {
                    info!(scale, quality, w, h, len = pdf.len(), "PDF fits");
                    return Ok(outcome(pdf, FitStrategy::QualitySearch, quality, (w, h), budget));
                }
                None => debug!(scale, w, h, "No quality fits at this scale"),
            }
        }

        let (w, h) = (
            (orig_w / FALLBACK_DIVISOR).max(1),
            (orig_h / FALLBACK_DIVISOR).max(1),
        );
        let pdf = self.build_page(&source.resize_exact(w, h), FALLBACK_QUALITY)?;
        if budget.admits(pdf.len()) {
            info!(w, h, len = pdf.len(), "Fallback PDF fits");
        } else {
            warn!(
                w,
                h,
                len = pdf.len(),
                budget = budget.bytes(),
                "No PDF fits the budget; returning oversize fallback"
            );
        }
        Ok(outcome(pdf, FitStrategy::Fallback, FALLBACK_QUALITY, (w, h), budget))
    }

    fn build_page(&self, image: &RasterImage, quality: u8) -> Result<Vec<u8>> {
        let jpeg = image.encode(RasterFormat::Jpeg, quality)?;
        self.writer.place_jpeg(&jpeg, image.width(), image.height())
    }
}

impl Default for ExactSizePdfBuilder {
    fn default() -> Self {
        Self::new(PaperSize::A4)
    }
}

/// Floor of each side times `scale`, at least 1 px.
fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = ((width as f64 * scale).floor() as u32).max(1);
    let h = ((height as f64 * scale).floor() as u32).max(1);
    (w, h)
}

fn outcome(
    pdf: Vec<u8>,
    strategy: FitStrategy,
    quality: u8,
    (width, height): (u32, u32),
    budget: SizeBudget,
) -> FitOutcome {
    let report = FitReport {
        strategy,
        quality: Some(quality),
        width,
        height,
        encoded_len: pdf.len(),
        within_budget: budget.admits(pdf.len()),
    };
    FitOutcome {
        blob: EncodedBlob::new(pdf, BlobKind::Pdf),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{flat_image, noise_image};

    fn budget(bytes: usize) -> SizeBudget {
        SizeBudget::from_bytes(bytes).unwrap()
    }

    #[test]
    fn scaled_dimensions_floor_and_clamp() {
        assert_eq!(scaled_dimensions(1000, 500, 0.45), (450, 225));
        assert_eq!(scaled_dimensions(3, 2, 0.3), (1, 1));
        assert_eq!(scaled_dimensions(640, 480, 1.0), (640, 480));
    }

    #[test]
    fn small_image_fits_at_full_scale_and_top_quality() {
        let outcome = ExactSizePdfBuilder::default()
            .fit(&flat_image(100, 60), budget(500_000))
            .unwrap();
        assert_eq!(outcome.blob.kind, BlobKind::Pdf);
        assert_eq!(outcome.report.strategy, FitStrategy::QualitySearch);
        assert_eq!(outcome.report.quality, Some(95));
        assert_eq!((outcome.report.width, outcome.report.height), (100, 60));
        assert!(outcome.report.within_budget);
    }

    #[test]
    fn tight_budget_shrinks_the_image() {
        let image = noise_image(200, 200, 5);
        let builder = ExactSizePdfBuilder::default();
        let full_at_min_quality = builder.build_page(&image, 30).unwrap().len();
        let target = budget(full_at_min_quality * 2 / 3);

        let outcome = builder.fit(&image, target).unwrap();
        assert!(outcome.report.within_budget);
        assert!(outcome.report.width < 200);
        assert_eq!(outcome.report.width, outcome.report.height);
        assert!(outcome.blob.len() <= target.bytes());
    }

    #[test]
    fn unreachable_budget_returns_untruncated_fallback() {
        let image = noise_image(90, 60, 9);
        let outcome = ExactSizePdfBuilder::default()
            .fit(&image, budget(1_024))
            .unwrap();

        assert_eq!(outcome.report.strategy, FitStrategy::Fallback);
        assert_eq!(outcome.report.quality, Some(FALLBACK_QUALITY));
        assert_eq!((outcome.report.width, outcome.report.height), (30, 20));
        assert!(!outcome.report.within_budget);
        assert!(outcome.blob.len() > 1_024);
        assert!(outcome.blob.bytes.starts_with(b"%PDF-"));
        assert!(lopdf::Document::load_mem(&outcome.blob.bytes).is_ok());
    }
}
