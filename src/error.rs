//! Unified error types for bililinks.
//!
//! This module provides a single [`BililinksError`] enum that covers all
//! error cases in the library, with a crate-wide [`Result`] alias.
//!
//! # Error Handling Philosophy
//!
//! The pipeline distinguishes two kinds of failure:
//!
//! - **Fatal setup errors** (missing manifest, no chunk files) abort the run
//!   and surface here as typed variants.
//! - **Recoverable errors** (a missing chunk, a malformed line, a failed
//!   metadata fetch) never reach this type — the pipeline logs and continues,
//!   or degrades to empty values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for bililinks operations.
pub type Result<T> = std::result::Result<T, BililinksError>;

/// The error type for all bililinks operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BililinksError {
    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The export directory has no `manifest.json`.
    ///
    /// Without the manifest the chunk set and chat name cannot be resolved,
    /// so the whole run is aborted.
    #[error("manifest.json not found (expected at {})", path.display())]
    ManifestMissing {
        /// Where the manifest was expected
        path: PathBuf,
    },

    /// The chunk set resolved to nothing.
    ///
    /// Neither the manifest's chunk list nor a scan of the chunks directory
    /// produced any `.jsonl` files.
    #[error("no chunk jsonl files found (looked in {})", chunks_dir.display())]
    NoChunks {
        /// The chunks directory that was searched
        chunks_dir: PathBuf,
    },

    /// A re-read table is missing columns the aggregator needs.
    #[error("table {} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns {
        /// The table that was read back
        path: PathBuf,
        /// The column names that were not found in the header
        missing: Vec<String>,
    },

    /// An output path requires a feature that was not compiled in.
    #[error("{output} output requires the '{feature}' feature to be enabled")]
    FeatureDisabled {
        /// What was being written (e.g. "spreadsheet")
        output: &'static str,
        /// The cargo feature that would enable it
        feature: &'static str,
    },

    /// JSON parsing/serialization error.
    ///
    /// Only manifest parsing surfaces this; malformed message lines are
    /// skipped silently.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading/writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet writing error.
    #[cfg(feature = "xlsx")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
