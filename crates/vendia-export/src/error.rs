//! # Export Error Types
//!
//! Failures while rendering CSV/PDF artifacts. Rendering is pure, so every
//! variant is a programming or environment problem (missing fonts), never a
//! data problem - malformed data is rejected upstream by vendia-core.

use thiserror::Error;

/// Report rendering errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV writer failed (row serialization).
    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),

    /// CSV buffer could not be finalized.
    #[error("Failed to finalize CSV: {0}")]
    Finalize(String),

    /// PDF fonts could not be loaded from the configured directory.
    ///
    /// The LiberationSans family must be present; the exporter never falls
    /// back to a different font silently (output bytes must be stable).
    #[error("Fonts not available: {0}")]
    Fonts(String),

    /// PDF document assembly or rendering failed.
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
