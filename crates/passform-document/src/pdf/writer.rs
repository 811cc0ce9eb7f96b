// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — single-page documents holding one JPEG image, built with
// `lopdf`.
//
// The JPEG is stored verbatim as a `DCTDecode` image XObject, so the encoded
// blob passes through untouched and dominates the file size.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use passform_core::PaperSize;
use passform_core::error::{PassformError, Result};
use tracing::{debug, instrument};

/// Resource name of the embedded image on the page.
const IMAGE_NAME: &str = "Im0";

/// Places pre-encoded JPEG images on fixed-size pages.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self { paper_size }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Build a one-page PDF with `jpeg` drawn 1:1 (one pixel per point) at
    /// the centre of the page.
    ///
    /// `width` and `height` are the pixel dimensions of the JPEG. An image
    /// larger than the page overhangs it symmetrically.
    #[instrument(skip(self, jpeg), fields(jpeg_len = jpeg.len()))]
    pub fn place_jpeg(&self, jpeg: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.paper_size.dimensions_pt();
        let (draw_w, draw_h) = (width as f32, height as f32);
        let (x, y) = centred_origin((page_w, page_h), (draw_w, draw_h));

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg.to_vec(),
        );
        let image_id = doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        draw_w.into(),
                        0_i64.into(),
                        0_i64.into(),
                        draw_h.into(),
                        x.into(),
                        y.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|err| PassformError::RenderFailure(format!("content stream: {}", err)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0_i64.into(), 0_i64.into(), page_w.into(), page_h.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1_i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|err| PassformError::RenderFailure(format!("failed to serialise PDF: {}", err)))?;
        if output.is_empty() {
            return Err(PassformError::RenderFailure("PDF writer produced no output".into()));
        }

        debug!(x, y, pdf_len = output.len(), "Image placed on page");
        Ok(output)
    }
}

/// Lower-left corner that centres a `draw` box on a `page` box.
fn centred_origin((page_w, page_h): (f32, f32), (draw_w, draw_h): (f32, f32)) -> (f32, f32) {
    ((page_w - draw_w) / 2.0, (page_h - draw_h) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::flat_image;
    use passform_core::RasterFormat;

    #[test]
    fn centring_math() {
        let (x, y) = centred_origin((600.0, 800.0), (200.0, 100.0));
        assert_eq!((x, y), (200.0, 350.0));
        // Oversized images overhang evenly.
        let (x, _) = centred_origin((600.0, 800.0), (1000.0, 100.0));
        assert_eq!(x, -200.0);
    }

    #[test]
    fn embeds_jpeg_verbatim_on_a4() {
        let jpeg = flat_image(120, 80).encode(RasterFormat::Jpeg, 80).unwrap();
        let pdf = PdfWriter::a4().place_jpeg(&jpeg, 120, 80).unwrap();

        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.windows(jpeg.len()).any(|w| w == jpeg.as_slice()));

        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn pdf_size_tracks_image_size() {
        let small = flat_image(40, 40).encode(RasterFormat::Jpeg, 80).unwrap();
        let writer = PdfWriter::a4();
        let pdf = writer.place_jpeg(&small, 40, 40).unwrap();
        // Container overhead stays small next to the image payload.
        assert!(pdf.len() > small.len());
        assert!(pdf.len() < small.len() + 2_048);
    }
}
