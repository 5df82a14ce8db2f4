//! Best-effort page metadata fetch (feature `fetch`).
//!
//! One blocking GET per link, short timeout, redirects followed. Links are
//! fetched serially and never cached, so repeated links cost repeated
//! requests; the caller opts in explicitly.
//!
//! This module never errors. Any failure — network, timeout, non-2xx,
//! unparseable HTML — degrades to empty title/uploader and the original
//! link as the resolved URL, and the pipeline moves on.
//!
//! With the `html-meta` feature the page is parsed with `scraper`; without
//! it the same meta tags and `<title>` element are pulled out with regular
//! expressions.

use std::time::Duration;

/// Fetch timeout. Short on purpose; one slow page must not stall the run.
const TIMEOUT: Duration = Duration::from_secs(6);

const USER_AGENT: &str = "Mozilla/5.0 (compatible; bililinks/0.3)";

/// Scraped page metadata for one link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Page title (`og:title` meta, `name="title"` meta, or `<title>`).
    pub title: String,
    /// Uploader display name (`name="author"` meta or a known uploader
    /// widget class).
    pub uploader: String,
    /// URL after redirects. For short links this often carries the video id
    /// the original link lacked; the orchestrator re-runs id extraction on
    /// it.
    pub resolved_url: String,
}

/// Fetcher holding one reusable HTTP client.
pub struct MetadataFetcher {
    // None when the client could not be constructed; every fetch then
    // degrades to empty metadata.
    client: Option<reqwest::blocking::Client>,
}

impl MetadataFetcher {
    /// Creates a fetcher with a 6-second timeout and redirect following.
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .ok();
        Self { client }
    }

    /// Fetches title/uploader for `link`, degrading to empty fields on any
    /// failure.
    pub fn fetch(&self, link: &str) -> Metadata {
        self.try_fetch(link).unwrap_or_else(|| Metadata {
            title: String::new(),
            uploader: String::new(),
            resolved_url: link.to_string(),
        })
    }

    fn try_fetch(&self, link: &str) -> Option<Metadata> {
        let client = self.client.as_ref()?;
        let response = client.get(link).send().ok()?.error_for_status().ok()?;
        let resolved_url = response.url().to_string();
        let html = response.text().ok()?;
        let (title, uploader) = parse_metadata(&html);
        Some(Metadata {
            title,
            uploader,
            resolved_url,
        })
    }
}

impl Default for MetadataFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: one-shot fetch with a fresh client.
pub fn fetch_metadata(link: &str) -> Metadata {
    MetadataFetcher::new().fetch(link)
}

/// Extracts (title, uploader) from page HTML.
#[cfg(feature = "html-meta")]
fn parse_metadata(html: &str) -> (String, String) {
    use scraper::{Html, Selector};

    // All selectors are constants; parse cannot fail.
    let og_title = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let meta_title = Selector::parse(r#"meta[name="title"]"#).unwrap();
    let title_el = Selector::parse("title").unwrap();
    let meta_author = Selector::parse(r#"meta[name="author"]"#).unwrap();
    // Uploader display widgets seen across bilibili page variants
    let uploader_classes = Selector::parse(".up-name, .username, .up-info .name").unwrap();

    let doc = Html::parse_document(html);

    let meta_content = |sel: &Selector| {
        doc.select(sel)
            .find_map(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let title = meta_content(&og_title)
        .or_else(|| meta_content(&meta_title))
        .or_else(|| {
            doc.select(&title_el)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default();

    let uploader = meta_content(&meta_author)
        .or_else(|| {
            doc.select(&uploader_classes)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_default();

    (title, uploader)
}

/// Regex fallback when the HTML-parsing collaborator is not compiled in.
///
/// Covers the same meta tags and the `<title>` element; the class-selector
/// uploader widgets need a real HTML parser and are skipped here.
#[cfg(not(feature = "html-meta"))]
fn parse_metadata(html: &str) -> (String, String) {
    use std::sync::LazyLock;

    use regex::Regex;

    static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?is)<meta[^>]*property=["']og:title["'][^>]*content=["']([^"']*)["']"#)
            .unwrap()
    });
    static META_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?is)<meta[^>]*name=["']title["'][^>]*content=["']([^"']*)["']"#).unwrap()
    });
    static TITLE_EL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());
    static META_AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"(?is)<meta[^>]*name=["']author["'][^>]*content=["']([^"']*)["']"#).unwrap()
    });

    let capture = |re: &Regex| {
        re.captures(html)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let title = capture(&OG_TITLE_RE)
        .or_else(|| capture(&META_TITLE_RE))
        .or_else(|| capture(&TITLE_EL_RE))
        .unwrap_or_default();

    let uploader = capture(&META_AUTHOR_RE).unwrap_or_default();

    (title, uploader)
}
