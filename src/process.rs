//! The pipeline orchestrator: export directory in, CSV table out.
//!
//! Processing is single-threaded and strictly ordered: chunk files in
//! resolved order, messages in file order, link occurrences in match
//! order. The output table is rebuilt from scratch on every run.
//!
//! Failure posture follows the error taxonomy: a missing manifest or empty
//! chunk set aborts; a missing or broken chunk file is logged and skipped;
//! a malformed line is skipped silently; a failed metadata fetch degrades
//! to empty fields.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::export::{Export, read_messages};
#[cfg(feature = "fetch")]
use crate::fetch::MetadataFetcher;
use crate::output::table::OutputRow;
use crate::scan::fields::{guess_sender, guess_time};
use crate::scan::flatten::message_text;
use crate::scan::links::LinkScanner;
use crate::scan::video_id::extract_video_id;

/// Characters of raw message JSON kept per row.
const RAW_MESSAGE_LIMIT: usize = 2000;

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Export root directory (manifest + chunks).
    pub input: PathBuf,
    /// Output CSV path; parent directories are created as needed.
    pub output: PathBuf,
    /// Fetch page metadata per link. Off by default: it performs one
    /// blocking GET per link occurrence, serially, with no caching.
    pub fetch: bool,
}

impl ProcessOptions {
    /// Creates options with metadata fetch disabled.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            fetch: false,
        }
    }

    /// Enables the per-link metadata fetch.
    pub fn with_fetch(mut self) -> Self {
        self.fetch = true;
        self
    }
}

/// What a pipeline run did.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessReport {
    /// Rows written to the table (one per link occurrence).
    pub rows_written: usize,
    /// Chunk files fully scanned.
    pub chunks_processed: usize,
    /// Chunk files skipped (missing) or abandoned (read error).
    pub chunks_skipped: usize,
}

/// Per-run scan state shared across chunks.
struct ScanContext<'a> {
    scanner: LinkScanner,
    chat_name: &'a str,
    #[cfg(feature = "fetch")]
    fetcher: Option<MetadataFetcher>,
}

impl<'a> ScanContext<'a> {
    #[cfg(feature = "fetch")]
    fn new(opts: &ProcessOptions, chat_name: &'a str) -> Self {
        Self {
            scanner: LinkScanner::new(),
            chat_name,
            fetcher: opts.fetch.then(MetadataFetcher::new),
        }
    }

    #[cfg(not(feature = "fetch"))]
    fn new(_opts: &ProcessOptions, chat_name: &'a str) -> Self {
        Self {
            scanner: LinkScanner::new(),
            chat_name,
        }
    }
}

/// Runs the whole pipeline for one export directory.
///
/// # Errors
///
/// Only fatal setup errors: missing/unparseable manifest, empty chunk set,
/// or an unwritable output table. Everything downstream is recoverable and
/// reported via diagnostics instead.
pub fn process_export_dir(opts: &ProcessOptions) -> Result<ProcessReport> {
    let export = Export::open(&opts.input)?;

    if let Some(parent) = opts.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(&opts.output)?;

    let ctx = ScanContext::new(opts, &export.chat_name);
    let mut report = ProcessReport::default();

    for chunk_path in &export.chunk_files {
        if !chunk_path.exists() {
            println!("Skipping missing chunk: {}", chunk_path.display());
            report.chunks_skipped += 1;
            continue;
        }

        println!("Processing {} ...", chunk_path.display());
        match scan_chunk(&ctx, &mut writer, chunk_path) {
            Ok(rows) => {
                report.rows_written += rows;
                report.chunks_processed += 1;
            }
            Err(e) => {
                // Partial failure: keep going with the remaining chunks
                eprintln!("Error while processing {}: {e}", chunk_path.display());
                report.chunks_skipped += 1;
            }
        }
    }

    writer.flush()?;
    println!(
        "Done: {} bilibili links written to {}",
        report.rows_written,
        opts.output.display()
    );
    Ok(report)
}

/// Scans one chunk file, writing a row per link occurrence. Returns the
/// number of rows written.
fn scan_chunk(
    ctx: &ScanContext<'_>,
    writer: &mut csv::Writer<File>,
    chunk_path: &Path,
) -> Result<usize> {
    let chunk_name = chunk_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut rows = 0;

    for msg in read_messages(chunk_path)? {
        let text = message_text(&msg);
        let occurrences = ctx.scanner.find_links(&text);
        if occurrences.is_empty() {
            continue;
        }

        let time = guess_time(&msg);
        let sender = guess_sender(&msg);
        let raw_message = truncate_chars(serde_json::to_string(&msg)?, RAW_MESSAGE_LIMIT);

        for occurrence in occurrences {
            let mut video_id = extract_video_id(&occurrence.link);
            let mut bili_title = String::new();
            let mut bili_uploader = String::new();

            #[cfg(feature = "fetch")]
            if let Some(fetcher) = &ctx.fetcher {
                let meta = fetcher.fetch(&occurrence.link);
                bili_title = meta.title;
                bili_uploader = meta.uploader;
                // Short links usually reveal the id only after redirect
                if video_id.is_empty() {
                    video_id = extract_video_id(&meta.resolved_url);
                }
            }

            writer.serialize(OutputRow {
                chat_name: ctx.chat_name.to_string(),
                chunk: chunk_name.clone(),
                time: time.clone(),
                sender: sender.clone(),
                link: occurrence.link,
                link_type: occurrence.kind.as_str().to_string(),
                video_id,
                bili_title,
                bili_uploader,
                context: occurrence.context,
                raw_message: raw_message.clone(),
            })?;
            rows += 1;
        }
    }

    Ok(rows)
}

/// Truncates to the first `limit` characters (code points, never mid
/// UTF-8 sequence).
fn truncate_chars(s: String, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s,
    }
}
