// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — building image pages and rasterising first pages.

pub mod rasterize;
pub mod writer;

pub use rasterize::PdfRasterizer;
#[cfg(feature = "pdfium")]
pub use rasterize::PdfiumRasterizer;
pub use writer::PdfWriter;
