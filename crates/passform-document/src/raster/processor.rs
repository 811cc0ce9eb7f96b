// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image — decode, resize, flatten onto white, and encode to each
// supported output format. Operates on in-memory images using the `image`
// crate, with lossy WebP delegated to `webp` (libwebp).

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba};
use passform_core::RasterFormat;
use passform_core::error::{PassformError, Result};
use tracing::{debug, instrument, trace};

/// A decoded, immutable pixel buffer.
///
/// Transformations borrow `self` and return a new `RasterImage`, so one
/// decoded source can feed every step of a size search.
#[derive(Debug, Clone)]
pub struct RasterImage {
    /// The decoded pixels.
    image: DynamicImage,
}

impl RasterImage {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, WebP, BMP, TIFF).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data).map_err(|err| {
            PassformError::DecodeFailure(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the wrapper and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    /// Whether the pixels carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    // -- Transformations ------------------------------------------------------

    /// Resample to exactly `width` x `height` with Lanczos3. Returns a plain
    /// copy when the size is unchanged.
    pub fn resize_exact(&self, width: u32, height: u32) -> Self {
        if width == self.width() && height == self.height() {
            return self.clone();
        }
        trace!(
            from_w = self.width(),
            from_h = self.height(),
            width,
            height,
            "Resizing image"
        );
        Self {
            image: self.image.resize_exact(width, height, FilterType::Lanczos3),
        }
    }

    /// Composite onto an opaque white background and drop to 3-channel RGB.
    ///
    /// Images without alpha are only converted to RGB.
    pub fn flattened(&self) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(self.to_opaque_rgb().into_owned()),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode to `format`. `quality` (1-100) is honoured by JPEG and WebP and
    /// ignored by the lossless formats.
    pub fn encode(&self, format: RasterFormat, quality: u8) -> Result<Vec<u8>> {
        let bytes = match format {
            RasterFormat::Jpeg => self.encode_jpeg(quality)?,
            RasterFormat::WebP => self.encode_webp(quality)?,
            RasterFormat::Png => self.encode_png()?,
            RasterFormat::Bmp => encode_to_format(&self.eight_bit(), ImageFormat::Bmp)?,
            RasterFormat::Tiff => encode_to_format(&self.eight_bit(), ImageFormat::Tiff)?,
        };
        trace!(?format, quality, len = bytes.len(), "Encoded");
        Ok(bytes)
    }

    /// JPEG has no transparency: flatten first, then encode RGB.
    fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.to_opaque_rgb();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder).map_err(|err| {
            PassformError::EncodeFailure(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    fn encode_webp(&self, quality: u8) -> Result<Vec<u8>> {
        let (w, h) = (self.width(), self.height());
        if self.has_alpha() {
            let rgba = self.image.to_rgba8();
            encode_webp_lossy(webp::Encoder::from_rgba(&rgba, w, h), quality)
        } else {
            let rgb = self.image.to_rgb8();
            encode_webp_lossy(webp::Encoder::from_rgb(&rgb, w, h), quality)
        }
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
        self.eight_bit()
            .write_with_encoder(encoder)
            .map_err(|err| PassformError::EncodeFailure(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// RGB view of the image, alpha composited onto white.
    fn to_opaque_rgb(&self) -> Cow<'_, RgbImage> {
        match &self.image {
            DynamicImage::ImageRgb8(rgb) => Cow::Borrowed(rgb),
            img if img.color().has_alpha() => {
                let rgba = img.to_rgba8();
                let flat = image::ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
                    let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
                    let blend = |channel: u8| -> u8 {
                        let alpha = a as u32;
                        ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
                    };
                    Rgb([blend(r), blend(g), blend(b)])
                });
                Cow::Owned(flat)
            }
            img => Cow::Owned(img.to_rgb8()),
        }
    }

    /// 8-bit buffer every lossless codec accepts. Grey with alpha is widened
    /// to RGBA since the TIFF encoder rejects `La8`.
    fn eight_bit(&self) -> Cow<'_, DynamicImage> {
        match &self.image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageRgb8(_)
            | DynamicImage::ImageRgba8(_) => Cow::Borrowed(&self.image),
            img if img.color().has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(img.to_rgba8())),
            img => Cow::Owned(DynamicImage::ImageRgb8(img.to_rgb8())),
        }
    }
}

fn encode_webp_lossy(encoder: webp::Encoder<'_>, quality: u8) -> Result<Vec<u8>> {
    let mut config = webp::WebPConfig::new()
        .map_err(|_| PassformError::EncodeFailure("failed to create WebPConfig".into()))?;
    config.quality = quality as f32;

    let memory = encoder
        .encode_advanced(&config)
        .map_err(|err| PassformError::EncodeFailure(format!("WebP encoding failed: {err:?}")))?;
    Ok(memory.to_vec())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        PassformError::EncodeFailure(format!("{:?} encoding failed: {}", format, err))
    })?;
    Ok(buffer)
}
