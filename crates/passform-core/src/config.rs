// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Converter configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Settings injected into the conversion router at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Page size used when building PDFs from images.
    pub paper_size: crate::PaperSize,
    /// Resolution used when rasterising the first page of a PDF.
    pub raster_dpi: u16,
    /// Byte appended when an output falls short of its budget.
    pub fill_byte: u8,
    /// Directory holding the pdfium shared library. `None` binds to the
    /// system library.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            paper_size: crate::PaperSize::A4,
            raster_dpi: 200,
            fill_byte: b' ',
            pdfium_library_path: None,
        }
    }
}

impl ConverterConfig {
    /// Load a configuration from a JSON file. Absent fields keep their
    /// defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        debug!(path = %path.as_ref().display(), ?config, "Loaded converter config");
        Ok(config)
    }
}
