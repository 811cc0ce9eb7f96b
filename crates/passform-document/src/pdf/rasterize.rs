// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasterisation — render the first page of a PDF to pixels.
//
// The capability is a trait so the router can run with or without it. The
// pdfium-backed implementation lives behind the "pdfium" feature gate and
// binds the shared library at construction time.

use passform_core::error::Result;

use crate::raster::RasterImage;

/// Renders the first page of a PDF document.
pub trait PdfRasterizer {
    /// Rasterise page one of `pdf` at `dpi` dots per inch.
    fn rasterize_first_page(&self, pdf: &[u8], dpi: u16) -> Result<RasterImage>;
}

/// Pixel size of a page given in points at `dpi`, at least 1 px per side.
pub fn page_pixels(width_pt: f32, height_pt: f32, dpi: u16) -> (u32, u32) {
    let scale = dpi as f32 / 72.0;
    let w = (width_pt * scale).round().max(1.0) as u32;
    let h = (height_pt * scale).round().max(1.0) as u32;
    (w, h)
}

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium {
    use std::path::Path;

    use passform_core::error::{PassformError, Result};
    use pdfium_render::prelude::*;
    use tracing::{debug, info, instrument};

    use super::{PdfRasterizer, page_pixels};
    use crate::raster::RasterImage;

    /// Rasteriser backed by the pdfium library via `pdfium-render`.
    pub struct PdfiumRasterizer {
        pdfium: Pdfium,
    }

    impl PdfiumRasterizer {
        /// Bind to pdfium in `library_dir`, or to the system library when
        /// `None`.
        pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
            let bindings = match library_dir {
                Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
                None => Pdfium::bind_to_system_library(),
            }
            .map_err(|err| {
                PassformError::RasterizerUnavailable(format!("failed to bind pdfium: {:?}", err))
            })?;
            info!(?library_dir, "pdfium bound");
            Ok(Self {
                pdfium: Pdfium::new(bindings),
            })
        }
    }

    impl PdfRasterizer for PdfiumRasterizer {
        #[instrument(skip(self, pdf), fields(pdf_len = pdf.len()))]
        fn rasterize_first_page(&self, pdf: &[u8], dpi: u16) -> Result<RasterImage> {
            let document = self
                .pdfium
                .load_pdf_from_byte_slice(pdf, None)
                .map_err(|err| PassformError::DecodeFailure(format!("failed to load PDF: {:?}", err)))?;

            let pages = document.pages();
            if pages.len() == 0 {
                return Err(PassformError::RenderFailure("PDF has no pages".into()));
            }
            let page = pages
                .get(0)
                .map_err(|err| PassformError::RenderFailure(format!("page 1: {:?}", err)))?;

            let (w_px, h_px) = page_pixels(page.width().value, page.height().value, dpi);
            let render_config = PdfRenderConfig::new()
                .set_target_width(w_px as i32)
                .set_maximum_height(h_px as i32);

            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|err| PassformError::RenderFailure(format!("page 1: {:?}", err)))?;
            let image = bitmap.as_image();
            if image.width() == 0 || image.height() == 0 {
                return Err(PassformError::RenderFailure("page 1 rendered empty".into()));
            }

            debug!(width = image.width(), height = image.height(), dpi, "Rendered page 1");
            Ok(RasterImage::from_dynamic(image))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_at_200_dpi() {
        let (w, h) = page_pixels(595.28, 841.89, 200);
        assert_eq!((w, h), (1654, 2339));
    }

    #[test]
    fn degenerate_page_is_at_least_one_pixel() {
        assert_eq!(page_pixels(0.0, 0.1, 72), (1, 1));
    }
}
