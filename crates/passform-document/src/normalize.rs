// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size normaliser — pad or truncate an encoded blob to exactly its budget.
//
// Short outputs are padded with a fill byte. Long raster outputs are cut to
// the budget even though that drops the codec trailer; exact size is the
// product contract. Long PDFs are returned whole: a truncated PDF loses its
// xref table and trailer, so this is the one place that rule is enforced.

use passform_core::{EncodedBlob, SizeBudget};
use tracing::{debug, warn};

/// Default fill byte (ASCII space).
pub const DEFAULT_FILL_BYTE: u8 = b' ';

/// Brings blobs to an exact byte length.
#[derive(Debug, Clone, Copy)]
pub struct SizeNormalizer {
    fill_byte: u8,
}

impl SizeNormalizer {
    pub fn new(fill_byte: u8) -> Self {
        Self { fill_byte }
    }

    /// Pad `blob` up to `budget` bytes, or truncate a raster blob down to it.
    /// PDFs at or above the budget come back unchanged.
    pub fn normalize(&self, mut blob: EncodedBlob, budget: SizeBudget) -> EncodedBlob {
        let target = budget.bytes();
        let len = blob.len();

        if len >= target {
            if blob.kind.is_pdf() {
                if len > target {
                    warn!(len, target, "PDF exceeds budget; returned untruncated");
                }
                return blob;
            }
            if len > target {
                warn!(len, target, kind = ?blob.kind, "Truncating raster output to budget");
                blob.bytes.truncate(target);
            }
            return blob;
        }

        debug!(len, target, pad = target - len, "Padding output to budget");
        blob.bytes.resize(target, self.fill_byte);
        blob
    }
}

impl Default for SizeNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_FILL_BYTE)
    }
}
