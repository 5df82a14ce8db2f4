//! String flattening for schema-less messages.
//!
//! Exporters disagree about where message text lives (`text`, `content`,
//! `elements[].textElement.content`, ...), so instead of probing known paths
//! the link scan flattens a whole message to its string leaves and searches
//! the joined text.
//!
//! Traversal order is deterministic: object values in declaration order
//! (keys are discarded), array elements in index order. This is what makes
//! the context offsets in [`crate::scan::links`] stable across runs.

use serde_json::Value;

/// Lazy iterator over every string leaf of a JSON value.
///
/// - strings are yielded as-is
/// - numbers and booleans are yielded in their textual form
/// - `null` yields nothing
/// - objects are traversed value-first in declared order, arrays in index
///   order
///
/// The iterator is finite and non-restartable. JSON cannot represent
/// reference cycles, so no cycle guard is needed.
///
/// # Example
///
/// ```rust
/// use bililinks::scan::flatten::StringLeaves;
/// use serde_json::json;
///
/// let msg = json!({"a": ["hello", {"b": "world", "c": 123}], "d": null});
/// let leaves: Vec<String> = StringLeaves::new(&msg).collect();
/// assert_eq!(leaves, vec!["hello", "world", "123"]);
/// ```
pub struct StringLeaves<'a> {
    // Depth-first work stack; children pushed in reverse so that pops come
    // out in document order.
    stack: Vec<&'a Value>,
}

impl<'a> StringLeaves<'a> {
    /// Creates an iterator over the string leaves of `value`.
    pub fn new(value: &'a Value) -> Self {
        Self { stack: vec![value] }
    }
}

impl Iterator for StringLeaves<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(value) = self.stack.pop() {
            match value {
                Value::Null => {}
                Value::String(s) => return Some(s.clone()),
                Value::Number(n) => return Some(n.to_string()),
                Value::Bool(b) => return Some(b.to_string()),
                Value::Array(items) => {
                    self.stack.extend(items.iter().rev());
                }
                Value::Object(map) => {
                    // Requires serde_json's preserve_order feature; without
                    // it keys would come back alphabetized.
                    self.stack.extend(map.values().rev());
                }
            }
        }
        None
    }
}

/// Joins all string leaves of a message with newlines into one search text.
///
/// The joined text establishes the offsets used for context slicing when
/// scanning for links.
pub fn message_text(msg: &Value) -> String {
    StringLeaves::new(msg).collect::<Vec<_>>().join("\n")
}
