// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Binary search over encoder quality, shared by the raster and PDF fitters.

use passform_core::SizeBudget;
use tracing::debug;

/// Inclusive quality bounds for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRange {
    pub min: u8,
    pub max: u8,
}

/// Lossy raster encodes.
pub const RASTER_QUALITY: QualityRange = QualityRange { min: 10, max: 95 };

/// JPEG embedded in a PDF page; kept above 30 for legibility.
pub const PDF_IMAGE_QUALITY: QualityRange = QualityRange { min: 30, max: 95 };

/// Find the highest quality in `range` whose probe output fits `budget`.
///
/// `probe` encodes at the given quality and returns the artifact whose length
/// is measured. Encoded size is assumed non-decreasing in quality, so each
/// fitting probe moves the lower bound up and each miss moves the upper bound
/// down. Returns the winning quality together with its artifact, or `None`
/// when even `range.min` is over budget.
pub fn highest_fitting_quality<T, E, F>(
    range: QualityRange,
    budget: SizeBudget,
    mut probe: F,
) -> Result<Option<(u8, T)>, E>
where
    T: AsRef<[u8]>,
    F: FnMut(u8) -> Result<T, E>,
{
    let mut low = range.min as i32;
    let mut high = range.max as i32;
    let mut best: Option<(u8, T)> = None;

    while low <= high {
        let mid = (low + high) / 2;
        let quality = mid as u8;
        let candidate = probe(quality)?;
        let size = candidate.as_ref().len();
        let fits = budget.admits(size);
        debug!(quality, size, budget = budget.bytes(), fits, "Quality probe");

        if fits {
            best = Some((quality, candidate));
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    Ok(best)
}
