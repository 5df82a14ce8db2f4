//! Per-message extraction passes.
//!
//! Messages arrive as schema-less [`serde_json::Value`]s; everything in this
//! module works on that shape:
//!
//! - [`flatten`] — collect every string leaf of a message, in declaration
//!   order, and join them into one search text
//! - [`links`] — find bilibili/b23.tv links in the search text, with context
//!   windows and a coarse type classification
//! - [`fields`] — guess a display sender and timestamp from candidate fields
//! - [`video_id`] — pull a `BV…`/`av…` id out of a link

pub mod fields;
pub mod flatten;
pub mod links;
pub mod video_id;

pub use fields::{guess_sender, guess_time};
pub use flatten::{StringLeaves, message_text};
pub use links::{LinkOccurrence, LinkScanner, LinkType};
pub use video_id::extract_video_id;
