// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Passform.

use thiserror::Error;

/// Top-level error type for all Passform operations.
///
/// Every variant is terminal for the conversion that raised it. Budgets that
/// cannot be met are not errors; they resolve through the fitters' fallbacks.
#[derive(Debug, Error)]
pub enum PassformError {
    // -- Request errors --
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("invalid size budget: {0}")]
    InvalidBudget(String),

    // -- Engine errors --
    #[error("PDF rasterizer unavailable: {0}")]
    RasterizerUnavailable(String),

    #[error("failed to decode input: {0}")]
    DecodeFailure(String),

    #[error("page rendering failed: {0}")]
    RenderFailure(String),

    #[error("image encoding failed: {0}")]
    EncodeFailure(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PassformError>;
