// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size fitting — search quality and scale until an encode fits a byte budget.

pub mod encoder;
pub mod pdf;
pub mod search;

pub use encoder::ExactSizeEncoder;
pub use pdf::ExactSizePdfBuilder;

use passform_core::EncodedBlob;

/// Which stage of a fit produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStrategy {
    /// The fixed high-quality first encode already fit.
    HighQuality,
    /// Binary search over quality (raster) or over quality per scale (PDF).
    QualitySearch,
    /// Progressive downscaling at fixed quality.
    Downscale,
    /// Nothing fit; the documented best-effort artifact, possibly oversize.
    Fallback,
}

/// What a fit chose, for logging and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitReport {
    pub strategy: FitStrategy,
    /// Quality used for the winning encode. `None` for lossless formats.
    pub quality: Option<u8>,
    /// Pixel dimensions of the encoded image.
    pub width: u32,
    pub height: u32,
    /// Encoded length before size normalisation.
    pub encoded_len: usize,
    /// Whether `encoded_len` is within the budget.
    pub within_budget: bool,
}

/// Result of a fit: the encoded artifact plus the report describing it.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub blob: EncodedBlob,
    pub report: FitReport,
}
