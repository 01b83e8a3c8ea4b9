use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<loc>\s*(.*?)\s*</loc>").unwrap());

/// Marker WordPress puts in media-attachment URLs
const ATTACHMENT_MARKER: &str = "attachment";

/// Pull every `<loc>` value out of a sitemap document.
///
/// The sitemap is flat and machine-generated, so pattern matching is enough.
pub fn extract_locs(xml: &str) -> Vec<String> {
    LOC.captures_iter(xml)
        .map(|c| c[1].replace("&amp;", "&"))
        .collect()
}

/// Keep the URLs that look like blog posts: a single path segment, not in
/// the deny-list and not an attachment page. Order is preserved and
/// duplicates are dropped.
pub fn filter_post_urls(locs: &[String], excluded_slugs: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    locs.iter()
        .filter(|loc| is_post_url(loc, excluded_slugs))
        .filter(|loc| seen.insert(loc.as_str()))
        .cloned()
        .collect()
}

fn is_post_url(loc: &str, excluded_slugs: &[String]) -> bool {
    if loc.contains(ATTACHMENT_MARKER) {
        return false;
    }
    let Ok(url) = Url::parse(loc) else {
        return false;
    };
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [slug] => !excluded_slugs.iter().any(|s| s == slug),
        _ => false,
    }
}
