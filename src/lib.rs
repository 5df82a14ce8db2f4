//! # Bililinks
//!
//! A Rust library for mining bilibili links out of chunked-jsonl chat
//! exports (the directory layout produced by QQ Chat Exporter and
//! compatible tools).
//!
//! ## Overview
//!
//! An export directory holds a `manifest.json` plus one or more chunk files
//! of newline-delimited JSON messages. Message schemas vary wildly between
//! exporter versions, so bililinks does not deserialize messages into a
//! fixed shape. Instead it:
//!
//! - flattens every message to its string leaves ([`scan::flatten`]),
//! - scans the joined text for `bilibili.com` / `b23.tv` links with a
//!   context window ([`scan::links`]),
//! - guesses sender and timestamp from an ordered list of candidate fields
//!   ([`scan::fields`]),
//! - extracts `BV…`/`av…` video ids ([`scan::video_id`]),
//! - optionally scrapes page title and uploader per link ([`fetch`],
//!   feature `fetch`),
//! - and writes one CSV row per link found ([`process`]), with optional
//!   Excel conversion and title-based aggregation ([`output`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bililinks::process::{ProcessOptions, process_export_dir};
//!
//! fn main() -> bililinks::Result<()> {
//!     let opts = ProcessOptions::new("exports/group_12345", "bilibili_links.csv");
//!     let report = process_export_dir(&opts)?;
//!     println!("{} links written", report.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`export`] — manifest reading and the lazy per-chunk message iterator
//! - [`scan`] — the per-message extraction passes
//!   - [`scan::flatten`] — [`StringLeaves`](scan::flatten::StringLeaves), [`message_text`](scan::flatten::message_text)
//!   - [`scan::links`] — [`LinkScanner`](scan::links::LinkScanner), [`LinkType`](scan::links::LinkType)
//!   - [`scan::fields`] — [`guess_sender`](scan::fields::guess_sender), [`guess_time`](scan::fields::guess_time)
//!   - [`scan::video_id`] — [`extract_video_id`](scan::video_id::extract_video_id)
//! - [`fetch`] — best-effort page metadata scrape (feature `fetch`)
//! - [`process`] — the orchestrator: export dir in, CSV table out
//! - [`output`] — table schema, aggregation, spreadsheet conversion
//! - [`cli`] — CLI argument types (feature `cli`)
//! - [`error`] — unified error types ([`BililinksError`], [`Result`])

#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod export;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod output;
pub mod process;
pub mod scan;

// Re-export the main types at the crate root for convenience
pub use error::{BililinksError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use bililinks::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{BililinksError, Result};

    pub use crate::export::Export;

    pub use crate::scan::fields::{guess_sender, guess_time};
    pub use crate::scan::flatten::{StringLeaves, message_text};
    pub use crate::scan::links::{LinkOccurrence, LinkScanner, LinkType};
    pub use crate::scan::video_id::extract_video_id;

    pub use crate::process::{ProcessOptions, ProcessReport, process_export_dir};

    pub use crate::output::aggregate::aggregate_table;
    pub use crate::output::table::{AGG_COLUMNS, COLUMNS, OutputRow};

    #[cfg(feature = "fetch")]
    pub use crate::fetch::{Metadata, fetch_metadata};
}
