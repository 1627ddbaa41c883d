//! Plain-text rendering of page markup.
//!
//! The classifier and the heuristic pass work on a text rendering of each
//! section rather than raw markup. Rendering is intentionally lossy: scripts
//! and styles are dropped, block elements become line breaks, everything
//! else is stripped.

use regex::Regex;

/// Convert HTML markup to a plain-text rendering.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    // Remove scripts and styles
    let script_pattern = Regex::new(r"(?s)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = Regex::new(r"(?s)<style[^>]*>.*?</style>").unwrap();
    text = script_pattern.replace_all(&text, "").to_string();
    text = style_pattern.replace_all(&text, "").to_string();

    // Block-level elements become line breaks so labeled values stay
    // on their own lines ("Color: Grey" must not merge with a neighbor)
    let block_pattern =
        Regex::new(r"(?i)</(?:p|div|li|tr|h[1-6]|dt|dd|td|th|section|article)>").unwrap();
    text = block_pattern.replace_all(&text, "\n").to_string();
    let br_pattern = Regex::new(r"(?i)<br\s*/?>").unwrap();
    text = br_pattern.replace_all(&text, "\n").to_string();

    // Remove remaining tags
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
    text = tag_pattern.replace_all(&text, " ").to_string();

    // Clean up whitespace
    let multi_space = Regex::new(r"[ \t]{2,}").unwrap();
    text = multi_space.replace_all(&text, " ").to_string();
    let multi_newline = Regex::new(r"\n{3,}").unwrap();
    text = multi_newline.replace_all(&text, "\n\n").to_string();

    decode_entities(text.trim())
}

/// Decode the handful of HTML entities that show up in catalog markup.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Extract the `<title>` text from markup, if present.
pub fn extract_title(html: &str) -> Option<String> {
    let title_pattern = Regex::new(r"(?s)<title[^>]*>(.*?)</title>").ok()?;
    title_pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
}
