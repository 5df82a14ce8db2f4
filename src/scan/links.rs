//! Bilibili link scanning and classification.
//!
//! The scan runs over the newline-joined search text produced by
//! [`crate::scan::flatten::message_text`]. Matches are non-overlapping and
//! found left to right; each comes with a context window of up to 120
//! characters on either side.

use regex::Regex;

/// Link pattern: `http(s)://` + optional subdomains + `bilibili.com`, or the
/// `b23.tv` short domain, then everything up to whitespace, a comma or
/// semicolon (Latin or full-width), or a quote/angle bracket.
const BILI_PATTERN: &str = r#"(?i)https?://(?:[\w.-]+\.)?(?:bilibili\.com|b23\.tv)[^\s,，;；"'<>]*"#;

/// Characters of context kept on each side of a match.
const CONTEXT_CHARS: usize = 120;

/// Coarse link-type classification.
///
/// Evaluated in a fixed priority order, first satisfied wins:
/// [`Short`](LinkType::Short) > [`Video`](LinkType::Video) >
/// [`Mobile`](LinkType::Mobile) > [`Other`](LinkType::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// `b23.tv` short link
    Short,
    /// Video page (`/video/`, `/BV…`, `/av…`)
    Video,
    /// Mobile or social subdomain (`m.`, `t.`)
    Mobile,
    /// Any other bilibili link
    Other,
}

impl LinkType {
    /// Classifies a raw matched link (not its context).
    pub fn classify(link: &str) -> Self {
        let l = link.to_lowercase();
        if l.contains("b23.tv") {
            return LinkType::Short;
        }
        if l.contains("/video/") || l.contains("/bv") || l.contains("/av") {
            return LinkType::Video;
        }
        if l.starts_with("https://m.") || l.starts_with("https://t.") || l.contains(".m.bilibili.")
        {
            return LinkType::Mobile;
        }
        LinkType::Other
    }

    /// Returns the tag written to the output table.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Short => "short",
            LinkType::Video => "video",
            LinkType::Mobile => "mobile",
            LinkType::Other => "other",
        }
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One matched link with its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    /// The full matched substring.
    pub link: String,
    /// Up to 120 characters before and after the match, newlines flattened
    /// to spaces.
    pub context: String,
    /// Coarse classification of the link.
    pub kind: LinkType,
}

/// Scanner holding the compiled link pattern.
///
/// Construct once and reuse across messages; compilation is not free.
///
/// # Example
///
/// ```rust
/// use bililinks::scan::links::{LinkScanner, LinkType};
///
/// let scanner = LinkScanner::new();
/// let found = scanner.find_links("see https://b23.tv/abc123 !");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].kind, LinkType::Short);
/// ```
pub struct LinkScanner {
    regex: Regex,
}

impl LinkScanner {
    /// Creates a scanner with the bilibili link pattern compiled.
    pub fn new() -> Self {
        Self {
            // The pattern is a tested constant; compilation cannot fail.
            regex: Regex::new(BILI_PATTERN).unwrap(),
        }
    }

    /// Finds every link occurrence in `text`, in scan order.
    ///
    /// Context windows are sliced in characters, not bytes, and clamped to
    /// the text bounds.
    pub fn find_links(&self, text: &str) -> Vec<LinkOccurrence> {
        self.regex
            .find_iter(text)
            .map(|m| {
                let link = m.as_str().to_string();
                let context = slice_context(text, m.start(), m.end());
                let kind = LinkType::classify(&link);
                LinkOccurrence {
                    link,
                    context,
                    kind,
                }
            })
            .collect()
    }
}

impl Default for LinkScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Takes up to [`CONTEXT_CHARS`] characters either side of the byte range
/// `start..end`, replacing newlines with spaces.
fn slice_context(text: &str, start: usize, end: usize) -> String {
    let ctx_start = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let ctx_end = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(i, _)| end + i);

    text[ctx_start..ctx_end].replace('\n', " ")
}
