//! Thin helpers over the `kuchikiki` DOM used by extraction and cleaning.

use kuchikiki::NodeRef;
use kuchikiki::traits::*;

/// Parse a document or fragment; fragments end up under `<body>`
pub fn parse_document(html: &str) -> NodeRef {
    kuchikiki::parse_html().one(html)
}

/// Every element matching `selector` under `node` (inclusive).
///
/// Results are collected up front so callers can detach nodes while
/// walking them.
pub fn select_all(node: &NodeRef, selector: &str) -> Vec<NodeRef> {
    match node.select(selector) {
        Ok(matches) => matches.map(|m| m.as_node().clone()).collect(),
        Err(()) => {
            log::warn!("Invalid selector: {}", selector);
            Vec::new()
        }
    }
}

/// First element matching `selector` under `node` (inclusive)
pub fn select_first(node: &NodeRef, selector: &str) -> Option<NodeRef> {
    node.select_first(selector).ok().map(|m| m.as_node().clone())
}

/// Attribute value, if `node` is an element carrying it
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    node.as_element()
        .and_then(|e| e.attributes.borrow().get(name).map(str::to_string))
}

pub fn is_element(node: &NodeRef, name: &str) -> bool {
    node.as_element().is_some_and(|e| &*e.name.local == name)
}

/// Closest ancestor element with the given tag name
pub fn closest(node: &NodeRef, name: &str) -> Option<NodeRef> {
    node.ancestors().find(|n| is_element(n, name))
}

/// Serialized markup of the node itself
pub fn outer_html(node: &NodeRef) -> String {
    node.to_string()
}

/// Serialized markup of the node's children
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| child.to_string()).collect()
}

/// Text content with runs of whitespace collapsed to single spaces
pub fn collapsed_text(node: &NodeRef) -> String {
    node.text_contents()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for interpolation into element content or a quoted attribute
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_attr() {
        let doc = parse_document(r#"<div class="a"><img src="x.jpg"><img src="y.jpg"></div>"#);
        let imgs = select_all(&doc, "img");
        assert_eq!(imgs.len(), 2);
        assert_eq!(attr(&imgs[1], "src").as_deref(), Some("y.jpg"));
        assert_eq!(attr(&imgs[1], "alt"), None);
        assert!(is_element(&imgs[0], "img"));
        assert!(select_first(&doc, "figure").is_none());
    }

    #[test]
    fn test_closest() {
        let doc = parse_document("<figure><a href=\"#\"><img src=\"x.jpg\"></a></figure>");
        let img = select_first(&doc, "img").unwrap();
        assert!(closest(&img, "a").is_some());
        assert!(closest(&img, "figure").is_some());
        assert!(closest(&img, "article").is_none());
    }

    #[test]
    fn test_inner_and_outer_html() {
        let doc = parse_document("<div id=\"w\"><p>Un &amp; deux</p></div>");
        let div = select_first(&doc, "#w").unwrap();
        assert_eq!(inner_html(&div), "<p>Un &amp; deux</p>");
        assert_eq!(outer_html(&div), "<div id=\"w\"><p>Un &amp; deux</p></div>");
    }

    #[test]
    fn test_collapsed_text() {
        let doc = parse_document("<p>  Un\n  <b>deux</b>   trois </p>");
        let p = select_first(&doc, "p").unwrap();
        assert_eq!(collapsed_text(&p), "Un deux trois");
    }

    #[test]
    fn test_html_escape_post_title_and_comment() {
        assert_eq!(
            html_escape(r#"Tom & Jerry <3 "le retour""#),
            "Tom &amp; Jerry &lt;3 &quot;le retour&quot;"
        );
        assert_eq!(
            html_escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("Sans titre"), "Sans titre");
    }

    #[test]
    fn test_html_escape_unicode() {
        assert_eq!(html_escape("l'été à Noël"), "l&#x27;été à Noël");
    }
}
