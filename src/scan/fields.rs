//! Sender and timestamp heuristics over schema-less messages.
//!
//! Exporter versions disagree about field names, so both guesses are an
//! ordered candidate list evaluated first-match-wins. The order is the
//! contract; keep it auditable, not buried in nested branching.

use chrono::DateTime;
use serde_json::Value;

/// Nested container fields checked for sender info, in order.
const SENDER_CONTAINERS: [&str; 3] = ["sender", "author", "sender_profile"];

/// Keys probed inside a sender container object, in order.
const SENDER_NESTED_KEYS: [&str; 4] = ["name", "nickname", "sender_name", "uin"];

/// Top-level sender fields checked after the nested candidates, in order.
const SENDER_TOP_KEYS: [&str; 4] = ["senderName", "nickname", "sender_uin", "sender_qq"];

/// Top-level timestamp fields, in order. Values are returned verbatim.
const TIME_KEYS: [&str; 5] = ["time", "timestamp", "date", "created_at", "msg_time"];

/// Guesses a display sender name for a message.
///
/// Candidate order: the first truthy of `sender`/`author`/`sender_profile`
/// contributes its `name`, `nickname`, `sender_name`, `uin` (or, if it is
/// not an object, its own value); then top-level `senderName`, `nickname`,
/// `sender_uin`, `sender_qq`. The first candidate that is a string with
/// non-whitespace content wins and is returned untrimmed. Non-string
/// candidates (numeric `uin`s and the like) are passed over.
///
/// # Example
///
/// ```rust
/// use bililinks::scan::fields::guess_sender;
/// use serde_json::json;
///
/// assert_eq!(guess_sender(&json!({"sender": {"name": "Alice"}})), "Alice");
/// assert_eq!(guess_sender(&json!({"senderName": "Bob"})), "Bob");
/// assert_eq!(guess_sender(&json!({})), "");
/// ```
pub fn guess_sender(msg: &Value) -> String {
    let Some(obj) = msg.as_object() else {
        return String::new();
    };

    let mut candidates: Vec<&Value> = Vec::new();

    let container = SENDER_CONTAINERS
        .iter()
        .filter_map(|key| obj.get(*key))
        .find(|v| is_truthy(v));

    match container {
        Some(Value::Object(nested)) => {
            candidates.extend(SENDER_NESTED_KEYS.iter().filter_map(|key| nested.get(*key)));
        }
        Some(other) => candidates.push(other),
        None => {}
    }

    candidates.extend(SENDER_TOP_KEYS.iter().filter_map(|key| obj.get(*key)));

    candidates
        .into_iter()
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Guesses a display timestamp for a message.
///
/// The first truthy of `time`, `timestamp`, `date`, `created_at`,
/// `msg_time` is returned verbatim — strings as-is, numbers in their
/// textual form, no reparsing, so whatever format the exporter used leaks
/// through. Failing those, an integer `timeMs` is interpreted as epoch
/// milliseconds (UTC) and formatted as ISO-8601 without a timezone suffix.
/// Empty string when nothing resolves.
///
/// # Example
///
/// ```rust
/// use bililinks::scan::fields::guess_time;
/// use serde_json::json;
///
/// assert_eq!(guess_time(&json!({"time": "2026-01-03T00:00:00"})), "2026-01-03T00:00:00");
/// assert_eq!(guess_time(&json!({"timeMs": 1600000000000i64})), "2020-09-13T12:26:40");
/// ```
pub fn guess_time(msg: &Value) -> String {
    let Some(obj) = msg.as_object() else {
        return String::new();
    };

    for key in TIME_KEYS {
        if let Some(v) = obj.get(key) {
            if is_truthy(v) {
                return value_text(v);
            }
        }
    }

    if let Some(ms) = obj.get("timeMs").and_then(Value::as_i64) {
        if let Some(dt) = DateTime::from_timestamp_millis(ms) {
            return if ms.rem_euclid(1000) == 0 {
                dt.format("%Y-%m-%dT%H:%M:%S").to_string()
            } else {
                dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
            };
        }
    }

    String::new()
}

/// Python-style truthiness: null, false, zero, empty string, empty
/// array/object are all falsy.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Textual form of a scalar, without JSON string quoting.
fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
