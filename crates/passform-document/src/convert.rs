// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion routing — pick the fitter for an (input, output) pair and bring
// the result to its exact size.
//
//   image → image : decode → ExactSizeEncoder     → normalise
//   image → pdf   : decode → ExactSizePdfBuilder  → normalise
//   pdf   → pdf   : normalise the raw bytes (pad only)
//   pdf   → image : rasterise page one → image → image
//
// Each call owns its buffers; the router itself is read-only and can be
// shared between threads that each run their own conversions.

use passform_core::error::{PassformError, Result};
use passform_core::{
    BlobKind, ConverterConfig, EncodedBlob, InputKind, OutputTarget, RasterFormat, SizeBudget,
};
use tracing::{info, instrument};

use crate::fit::{ExactSizeEncoder, ExactSizePdfBuilder, FitReport};
use crate::normalize::SizeNormalizer;
use crate::pdf::PdfRasterizer;
use crate::raster::RasterImage;

/// A finished conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Output bytes, normalised to the budget.
    pub blob: EncodedBlob,
    /// What the fitter chose. `None` for the pad-only PDF path.
    pub report: Option<FitReport>,
}

impl Conversion {
    pub fn into_bytes(self) -> Vec<u8> {
        self.blob.into_bytes()
    }
}

/// Routes conversions to the right fitter.
///
/// Optional capabilities are injected at construction: without a
/// rasterizer, PDF → image requests fail with `RasterizerUnavailable`.
pub struct ConversionRouter {
    config: ConverterConfig,
    normalizer: SizeNormalizer,
    pdf_builder: ExactSizePdfBuilder,
    rasterizer: Option<Box<dyn PdfRasterizer>>,
}

impl ConversionRouter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            normalizer: SizeNormalizer::new(config.fill_byte),
            pdf_builder: ExactSizePdfBuilder::new(config.paper_size),
            config,
            rasterizer: None,
        }
    }

    /// Enable PDF → image conversion.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn PdfRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn can_rasterize(&self) -> bool {
        self.rasterizer.is_some()
    }

    /// Convert `input` to `output`, sized to exactly `budget` bytes except
    /// when a PDF cannot be made small enough.
    #[instrument(skip(self, input), fields(input_len = input.len(), budget = budget.bytes()))]
    pub fn convert(
        &self,
        input: &[u8],
        input_kind: InputKind,
        output: OutputTarget,
        budget: SizeBudget,
    ) -> Result<Conversion> {
        match (input_kind, output) {
            (InputKind::Image, OutputTarget::Image(format)) => {
                info!(?format, "Converting image → image");
                let image = RasterImage::from_bytes(input)?;
                self.image_to_image(&image, format, budget)
            }

            (InputKind::Image, OutputTarget::Pdf) => {
                info!("Converting image → PDF (shrinking to target)");
                let image = RasterImage::from_bytes(input)?;
                let fit = self.pdf_builder.fit(&image, budget)?;
                Ok(self.finish(fit.blob, Some(fit.report), budget))
            }

            (InputKind::Pdf, OutputTarget::Pdf) => {
                info!("Converting PDF → PDF (pad only; no truncation)");
                let blob = EncodedBlob::new(input.to_vec(), BlobKind::Pdf);
                Ok(self.finish(blob, None, budget))
            }

            (InputKind::Pdf, OutputTarget::Image(format)) => {
                info!(?format, dpi = self.config.raster_dpi, "Converting PDF → image");
                let rasterizer = self.rasterizer.as_deref().ok_or_else(|| {
                    PassformError::RasterizerUnavailable(
                        "no PDF rasterizer configured (build with the \"pdfium\" feature)".into(),
                    )
                })?;
                let page = rasterizer.rasterize_first_page(input, self.config.raster_dpi)?;
                self.image_to_image(&page, format, budget)
            }
        }
    }

    /// Parse the caller's tags and kilobyte target, then convert.
    pub fn convert_tagged(
        &self,
        input: &[u8],
        mime_type: Option<&str>,
        file_name: Option<&str>,
        output_tag: &str,
        target_kb: u32,
    ) -> Result<Conversion> {
        let input_kind = InputKind::classify(mime_type, file_name)?;
        let output: OutputTarget = output_tag.parse()?;
        let budget = SizeBudget::from_kb(target_kb)?;
        self.convert(input, input_kind, output, budget)
    }

    fn image_to_image(
        &self,
        image: &RasterImage,
        format: RasterFormat,
        budget: SizeBudget,
    ) -> Result<Conversion> {
        let fit = ExactSizeEncoder::new(format).fit(image, budget)?;
        Ok(self.finish(fit.blob, Some(fit.report), budget))
    }

    fn finish(&self, blob: EncodedBlob, report: Option<FitReport>, budget: SizeBudget) -> Conversion {
        let blob = self.normalizer.normalize(blob, budget);
        info!(len = blob.len(), target = budget.bytes(), "Conversion done");
        Conversion { blob, report }
    }
}

impl Default for ConversionRouter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}
