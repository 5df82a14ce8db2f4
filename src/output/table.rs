//! Output table schema.

use serde::{Deserialize, Serialize};

/// Columns of the main table, in order. The csv writer derives its header
/// from [`OutputRow`]'s field order; this list exists for column checks and
/// documentation.
pub const COLUMNS: [&str; 11] = [
    "chat_name",
    "chunk",
    "time",
    "sender",
    "link",
    "link_type",
    "video_id",
    "bili_title",
    "bili_uploader",
    "context",
    "raw_message",
];

/// Columns of the aggregated table, in order.
pub const AGG_COLUMNS: [&str; 8] = [
    "time",
    "sender",
    "link",
    "link_type",
    "video_id",
    "bili_title",
    "bili_uploader",
    "context",
];

/// One row of the main table: one (message, link occurrence) pair.
///
/// Field order is the column order; the csv crate writes the header from
/// it. `bili_title` and `bili_uploader` stay empty unless metadata fetch
/// is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub chat_name: String,
    /// Source chunk file name (not its full path).
    pub chunk: String,
    /// Raw exporter-defined timestamp, unparsed.
    pub time: String,
    pub sender: String,
    pub link: String,
    pub link_type: String,
    pub video_id: String,
    pub bili_title: String,
    pub bili_uploader: String,
    pub context: String,
    /// Full message JSON, truncated to its first 2000 characters.
    pub raw_message: String,
}

/// One row of the aggregated table: either a merged title group or an
/// unmerged empty-title original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub time: String,
    pub sender: String,
    pub link: String,
    pub link_type: String,
    pub video_id: String,
    pub bili_title: String,
    pub bili_uploader: String,
    pub context: String,
}
