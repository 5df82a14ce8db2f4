//! Video-id extraction from link text.

use std::sync::LazyLock;

use regex::Regex;

// BV ids are case-sensitive by definition; av ids are not.
static BV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"BV[0-9A-Za-z]+").unwrap());
static AV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)av([0-9]+)").unwrap());
static VIDEO_BV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"video/(BV[0-9A-Za-z]+)").unwrap());

/// Extracts a canonical video id (`BV…` or `av<digits>`) from a link.
///
/// Search order: a case-sensitive `BV` token first; failing that, a
/// case-insensitive `av` + digits, normalized to lowercase `av`; failing
/// both, a `video/BV…` form. The third pattern is subsumed by the first and
/// kept only as a fallback for inputs transformed upstream. Returns the
/// empty string when nothing matches.
///
/// # Example
///
/// ```rust
/// use bililinks::scan::video_id::extract_video_id;
///
/// assert_eq!(extract_video_id("https://www.bilibili.com/video/BV1xK4y1x7x7"), "BV1xK4y1x7x7");
/// assert_eq!(extract_video_id("https://www.bilibili.com/video/av12345"), "av12345");
/// assert_eq!(extract_video_id("https://b23.tv/abc"), "");
/// ```
pub fn extract_video_id(link: &str) -> String {
    if let Some(m) = BV_RE.find(link) {
        return m.as_str().to_string();
    }
    if let Some(caps) = AV_RE.captures(link) {
        return format!("av{}", &caps[1]);
    }
    if let Some(caps) = VIDEO_BV_RE.captures(link) {
        return caps[1].to_string();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bv_from_video_path() {
        assert_eq!(
            extract_video_id("https://www.bilibili.com/video/BV1xK4y1x7x7"),
            "BV1xK4y1x7x7"
        );
    }

    #[test]
    fn test_av_from_video_path() {
        assert_eq!(
            extract_video_id("https://www.bilibili.com/video/av12345"),
            "av12345"
        );
    }

    #[test]
    fn test_av_case_normalized() {
        assert_eq!(
            extract_video_id("https://www.bilibili.com/video/AV999"),
            "av999"
        );
    }

    #[test]
    fn test_bv_outside_video_path() {
        assert_eq!(
            extract_video_id("https://m.bilibili.com/video/BV2abc"),
            "BV2abc"
        );
        assert_eq!(
            extract_video_id("https://www.bilibili.com/watch?v=BV3def"),
            "BV3def"
        );
    }

    #[test]
    fn test_bv_wins_over_av() {
        // "av" also appears but BV is checked first
        assert_eq!(
            extract_video_id("https://x.bilibili.com/av111/BV1A2b3C"),
            "BV1A2b3C"
        );
    }

    #[test]
    fn test_no_id() {
        assert_eq!(extract_video_id("https://b23.tv/abc"), "");
        assert_eq!(extract_video_id("https://www.bilibili.com/read/cv1"), "");
    }
}
