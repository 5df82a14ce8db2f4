//! Title-based aggregation of the emitted table.
//!
//! Aggregation re-reads the persisted CSV rather than reusing in-memory
//! rows, so it reflects exactly what was written, including any lossy text
//! round trip. Rows sharing a non-empty `bili_title` merge into one row;
//! empty-title rows pass through unmerged, one output row per original.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::{BililinksError, Result};
use crate::output::table::{AGG_COLUMNS, AggregatedRow};

/// One group of rows sharing a title (or a single empty-title row).
struct Group {
    title: String,
    rows: Vec<AggregatedRow>,
}

/// Aggregates `csv_path` by title and writes the result to `out_path`.
///
/// Output format follows the extension: `.xlsx` uses the spreadsheet
/// writer (feature `xlsx`), anything else is written as CSV. Returns the
/// number of aggregated rows written.
///
/// # Errors
///
/// - [`BililinksError::MissingColumns`] when the re-read table lacks any of
///   [`AGG_COLUMNS`]
/// - [`BililinksError::FeatureDisabled`] when an `.xlsx` path is requested
///   without the `xlsx` feature
///
/// Callers treat failure as non-fatal: log and continue, the main table is
/// unaffected.
pub fn aggregate_table(csv_path: &Path, out_path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;

    let headers = reader.headers()?.clone();
    let column_at = resolve_columns(csv_path, &headers)?;

    let mut groups: Vec<Group> = Vec::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        let row = row_from_record(&record, &column_at);
        let title = row.bili_title.clone();

        if title.is_empty() {
            // Never merged; survives as its own group in place
            groups.push(Group {
                title,
                rows: vec![row],
            });
        } else if let Some(&idx) = by_title.get(&title) {
            groups[idx].rows.push(row);
        } else {
            by_title.insert(title.clone(), groups.len());
            groups.push(Group {
                title,
                rows: vec![row],
            });
        }
    }

    let aggregated: Vec<AggregatedRow> = groups.iter().map(merge_group).collect();

    write_aggregated(&aggregated, out_path)?;
    Ok(aggregated.len())
}

/// Maps each required column name to its index in the header, failing with
/// the full list of absentees.
fn resolve_columns(path: &Path, headers: &StringRecord) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(AGG_COLUMNS.len());
    let mut missing = Vec::new();

    for name in AGG_COLUMNS {
        match headers.iter().position(|h| h == name) {
            Some(idx) => indices.push(idx),
            None => missing.push(name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(BililinksError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        })
    }
}

fn row_from_record(record: &StringRecord, column_at: &[usize]) -> AggregatedRow {
    let field = |i: usize| record.get(column_at[i]).unwrap_or_default().to_string();
    AggregatedRow {
        time: field(0),
        sender: field(1),
        link: field(2),
        link_type: field(3),
        video_id: field(4),
        bili_title: field(5),
        bili_uploader: field(6),
        context: field(7),
    }
}

/// Merges one group into a single aggregated row.
///
/// The timestamp is the lexicographically smallest non-empty value, which
/// is only a correct "earliest" when every timestamp in the group shares
/// one sortable format; mixed exporter formats can pick the wrong one.
fn merge_group(group: &Group) -> AggregatedRow {
    if group.rows.len() == 1 && group.title.is_empty() {
        return group.rows[0].clone();
    }

    let rows = &group.rows;
    AggregatedRow {
        time: rows
            .iter()
            .map(|r| r.time.as_str())
            .filter(|t| !t.is_empty())
            .min()
            .unwrap_or_default()
            .to_string(),
        sender: join_distinct(rows.iter().map(|r| r.sender.as_str()), "; "),
        link: join_distinct(rows.iter().map(|r| r.link.as_str()), "; "),
        link_type: join_distinct(rows.iter().map(|r| r.link_type.as_str()), "; "),
        video_id: join_distinct(rows.iter().map(|r| r.video_id.as_str()), "; "),
        bili_title: group.title.clone(),
        bili_uploader: join_distinct(rows.iter().map(|r| r.bili_uploader.as_str()), "; "),
        context: join_distinct(rows.iter().map(|r| r.context.as_str()), " || "),
    }
}

/// Joins trimmed, non-empty, de-duplicated values in first-appearance order.
fn join_distinct<'a>(values: impl Iterator<Item = &'a str>, sep: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        let value = value.trim();
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.join(sep)
}

fn write_aggregated(rows: &[AggregatedRow], out_path: &Path) -> Result<()> {
    let is_xlsx = out_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx"));

    if is_xlsx {
        #[cfg(feature = "xlsx")]
        {
            return crate::output::xlsx::write_rows(rows, out_path);
        }
        #[cfg(not(feature = "xlsx"))]
        {
            return Err(BililinksError::FeatureDisabled {
                output: "spreadsheet",
                feature: "xlsx",
            });
        }
    }

    let mut writer = csv::Writer::from_path(out_path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
