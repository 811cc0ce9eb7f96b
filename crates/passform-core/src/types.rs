// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Passform converter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PassformError, Result};

/// Bytes per kilobyte. Budgets arrive in KB and are compared in bytes.
pub const KB: usize = 1024;

/// Smallest target a caller may request, in kilobytes.
pub const MIN_TARGET_KB: u32 = 10;

/// Largest target a caller may request, in kilobytes.
pub const MAX_TARGET_KB: u32 = 5000;

/// Raster encodings the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RasterFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
}

impl RasterFormat {
    /// Whether the encoder honours a quality parameter.
    pub fn supports_quality(&self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// MIME type string for download headers.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }

    /// Canonical file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }
}

/// What the caller asked to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputTarget {
    Image(RasterFormat),
    Pdf,
}

impl OutputTarget {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Image(format) => format.mime_type(),
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image(format) => format.extension(),
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for OutputTarget {
    type Err = PassformError;

    /// Parse an output tag (`jpg`, `jpeg`, `png`, `webp`, `bmp`, `tiff`, `pdf`),
    /// case-insensitively.
    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Image(RasterFormat::Jpeg)),
            "png" => Ok(Self::Image(RasterFormat::Png)),
            "webp" => Ok(Self::Image(RasterFormat::WebP)),
            "bmp" => Ok(Self::Image(RasterFormat::Bmp)),
            "tiff" => Ok(Self::Image(RasterFormat::Tiff)),
            "pdf" => Ok(Self::Pdf),
            _ => Err(PassformError::UnsupportedFormat(tag.to_string())),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Broad class of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    Image,
    Pdf,
}

impl InputKind {
    /// Classify an upload by its declared MIME type, falling back to the
    /// file extension.
    pub fn classify(mime_type: Option<&str>, file_name: Option<&str>) -> Result<Self> {
        let mime = mime_type.unwrap_or("").trim().to_ascii_lowercase();
        let ext = file_name
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if mime.starts_with("image") || Self::is_image_extension(&ext) {
            return Ok(Self::Image);
        }
        if mime == "application/pdf" || ext == "pdf" {
            return Ok(Self::Pdf);
        }

        Err(PassformError::UnsupportedInput(format!(
            "mime type {:?}, file {:?}",
            mime_type.unwrap_or(""),
            file_name.unwrap_or("")
        )))
    }

    fn is_image_extension(ext: &str) -> bool {
        matches!(ext, "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tiff" | "tif")
    }
}

/// Logical kind of an encoded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobKind {
    Raster(RasterFormat),
    Pdf,
}

impl BlobKind {
    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf)
    }
}

/// Encoded bytes tagged with their container kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    pub bytes: Vec<u8>,
    pub kind: BlobKind,
}

impl EncodedBlob {
    pub fn new(bytes: Vec<u8>, kind: BlobKind) -> Self {
        Self { bytes, kind }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Target output size in bytes. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SizeBudget(usize);

impl SizeBudget {
    /// Budget from a caller-supplied kilobyte value in
    /// [`MIN_TARGET_KB`]..=[`MAX_TARGET_KB`].
    pub fn from_kb(kb: u32) -> Result<Self> {
        if !(MIN_TARGET_KB..=MAX_TARGET_KB).contains(&kb) {
            return Err(PassformError::InvalidBudget(format!(
                "{kb} KB is outside {MIN_TARGET_KB}..={MAX_TARGET_KB} KB"
            )));
        }
        Ok(Self(kb as usize * KB))
    }

    /// Budget from an exact byte count.
    pub fn from_bytes(bytes: usize) -> Result<Self> {
        if bytes == 0 {
            return Err(PassformError::InvalidBudget("budget must be > 0 bytes".into()));
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> usize {
        self.0
    }

    /// Whether `len` bytes fit within the budget.
    pub fn admits(&self, len: usize) -> bool {
        len <= self.0
    }
}

impl fmt::Display for SizeBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (1/72 inch), portrait.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        (mm_to_pt(w_mm as f32), mm_to_pt(h_mm as f32))
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_tags_parse_case_insensitively() {
        assert_eq!(
            "JPG".parse::<OutputTarget>().unwrap(),
            OutputTarget::Image(RasterFormat::Jpeg)
        );
        assert_eq!(
            "jpeg".parse::<OutputTarget>().unwrap(),
            OutputTarget::Image(RasterFormat::Jpeg)
        );
        assert_eq!(
            "Tiff".parse::<OutputTarget>().unwrap(),
            OutputTarget::Image(RasterFormat::Tiff)
        );
        assert_eq!("PDF".parse::<OutputTarget>().unwrap(), OutputTarget::Pdf);
    }

    #[test]
    fn unknown_output_tag_is_unsupported_format() {
        let err = "gif".parse::<OutputTarget>().unwrap_err();
        assert!(matches!(err, PassformError::UnsupportedFormat(tag) if tag == "gif"));
    }

    #[test]
    fn classify_prefers_mime_then_extension() {
        assert_eq!(
            InputKind::classify(Some("image/png"), Some("upload.bin")).unwrap(),
            InputKind::Image
        );
        assert_eq!(
            InputKind::classify(None, Some("scan.TIF")).unwrap(),
            InputKind::Image
        );
        assert_eq!(
            InputKind::classify(Some("application/pdf"), None).unwrap(),
            InputKind::Pdf
        );
        assert_eq!(
            InputKind::classify(Some(""), Some("report.pdf")).unwrap(),
            InputKind::Pdf
        );
    }

    #[test]
    fn classify_rejects_unknown_input() {
        let err = InputKind::classify(Some("text/plain"), Some("notes.txt")).unwrap_err();
        assert!(matches!(err, PassformError::UnsupportedInput(_)));
    }

    #[test]
    fn output_targets_carry_mime_types() {
        assert_eq!(OutputTarget::Pdf.mime_type(), "application/pdf");
        assert_eq!(OutputTarget::Image(RasterFormat::WebP).mime_type(), "image/webp");
        assert_eq!(RasterFormat::Tiff.mime_type(), "image/tiff");
        assert_eq!(RasterFormat::Bmp.mime_type(), "image/bmp");
    }

    #[test]
    fn empty_blob_reports_empty() {
        let blob = EncodedBlob::new(Vec::new(), BlobKind::Pdf);
        assert!(blob.is_empty());
        assert_eq!(blob.len(), 0);
        assert!(!EncodedBlob::new(vec![0xFF], BlobKind::Raster(RasterFormat::Jpeg)).is_empty());
    }

    #[test]
    fn budget_is_kilobytes_times_1024() {
        assert_eq!(SizeBudget::from_kb(50).unwrap().bytes(), 51_200);
        assert!(SizeBudget::from_kb(9).is_err());
        assert!(SizeBudget::from_kb(5001).is_err());
        assert!(SizeBudget::from_bytes(0).is_err());
    }

    #[test]
    fn a4_in_points() {
        let (w, h) = PaperSize::A4.dimensions_pt();
        assert!((w - 595.28).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
    }
}
