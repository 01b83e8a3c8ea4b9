use blog_mirror_core::html::{collapsed_text, parse_document, select_all};
use kuchikiki::NodeRef;

const ELLIPSIS: &str = "…";

/// Elements whose boundaries separate words
const BLOCK_ELEMENTS: &str = "p, div, br, li, h1, h2, h3, h4, h5, h6, blockquote, figure, figcaption, tr";

/// Text content of an HTML fragment, with block boundaries turned into spaces
pub fn plain_text(html: &str) -> String {
    let document = parse_document(html);
    for block in select_all(&document, BLOCK_ELEMENTS) {
        block.insert_after(NodeRef::new_text(" "));
    }
    collapsed_text(&document)
}

/// Plain-text teaser for a post body: markup stripped, `marketing_text`
/// removed, cut at a word boundary within `max_chars`.
pub fn excerpt(html: &str, marketing_text: &str, max_chars: usize) -> String {
    let mut text = plain_text(html);
    if !marketing_text.is_empty() {
        text = text
            .replace(marketing_text, " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
    }
    truncate_at_word(&text, max_chars)
}

/// Truncate to at most `max_chars` characters plus an ellipsis.
///
/// The cut falls on the last whitespace within the limit, unless there is
/// none, in which case the text is cut mid-word at the limit.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    // One extra character so a word ending exactly at the limit is kept
    let window: String = text.chars().take(max_chars + 1).collect();
    let cut = match window.rfind(char::is_whitespace) {
        Some(index) if index > 0 => window[..index].to_string(),
        _ => window.chars().take(max_chars).collect(),
    };

    format!("{}{}", cut.trim_end(), ELLIPSIS)
}
