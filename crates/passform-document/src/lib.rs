// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// passform-document — the exact-size conversion engine.
//
// Fits images to a byte budget by searching encoder quality and scale, builds
// single-page image PDFs to a budget, and pads or truncates the result to the
// exact size requested.

pub mod convert;
pub mod fit;
pub mod normalize;
pub mod pdf;
pub mod raster;

#[cfg(test)]
mod test_support;

// Re-export the primary structs so callers can use `passform_document::ConversionRouter` etc.
pub use convert::{Conversion, ConversionRouter};
pub use fit::{ExactSizeEncoder, ExactSizePdfBuilder, FitOutcome, FitReport, FitStrategy};
pub use normalize::SizeNormalizer;
pub use pdf::{PdfRasterizer, PdfWriter};
pub use raster::RasterImage;

#[cfg(feature = "pdfium")]
pub use pdf::PdfiumRasterizer;
