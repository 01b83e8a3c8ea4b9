//! URL and filename helpers shared by the crawler and the generator.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").unwrap());

static SIZE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d+x\d+(\.[A-Za-z0-9]+)$").unwrap());

static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpe?g|png|gif|webp|bmp|svg|avif)([?#].*)?$").unwrap()
});

/// Derive a post slug from its URL: the last non-empty path segment,
/// percent-decoded.
///
/// ```text
/// https://blog.example.fr/mon-article/  -> "mon-article"
/// https://blog.example.fr/caf%C3%A9/    -> "café"
/// https://blog.example.fr/              -> ""
/// ```
pub fn slug_from_url(url: &str) -> String {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => strip_query(url).to_string(),
    };
    let segment = path
        .split('/')
        .rev()
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Force the secure scheme on absolute and protocol-relative URLs
pub fn normalize_protocol(url: &str) -> String {
    let url = url.trim();
    if let Some(rest) = url.strip_prefix("http://") {
        format!("https://{}", rest)
    } else if let Some(rest) = url.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        url.to_string()
    }
}

/// Drop any query string or fragment
pub fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Last path component of a URL, ignoring query string and fragment
pub fn url_basename(url: &str) -> &str {
    strip_query(url).rsplit('/').next().unwrap_or_default()
}

/// Filesystem-safe filename for an image URL, from its basename
pub fn sanitize_filename(url: &str) -> String {
    let base = url_basename(url);
    if base.is_empty() {
        return "image".to_string();
    }
    UNSAFE_FILENAME_CHARS.replace_all(base, "_").into_owned()
}

/// Remove a WordPress thumbnail suffix (`photo-300x200.jpg` -> `photo.jpg`).
///
/// Returns `None` when the URL carries no such suffix.
pub fn strip_size_suffix(url: &str) -> Option<String> {
    let bare = strip_query(url);
    if SIZE_SUFFIX.is_match(bare) {
        Some(SIZE_SUFFIX.replace(bare, "$1").into_owned())
    } else {
        None
    }
}

/// Whether a URL points directly at an image file
pub fn is_image_url(url: &str) -> bool {
    IMAGE_EXTENSION.is_match(url.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_url() {
        assert_eq!(slug_from_url("https://blog.example.fr/mon-article/"), "mon-article");
        assert_eq!(slug_from_url("https://blog.example.fr/mon-article"), "mon-article");
        assert_eq!(slug_from_url("https://blog.example.fr/a/?p=3"), "a");
        assert_eq!(slug_from_url("https://blog.example.fr/"), "");
        assert_eq!(slug_from_url("/relative/slug/"), "slug");
    }

    #[test]
    fn test_slug_from_url_decodes_accents() {
        assert_eq!(slug_from_url("https://blog.example.fr/caf%C3%A9/"), "café");
        assert_eq!(slug_from_url("https://blog.example.fr/été-à-nice/"), "été-à-nice");
        assert_eq!(slug_from_url("/relative/caf%C3%A9/"), "café");
    }

    #[test]
    fn test_normalize_protocol() {
        assert_eq!(normalize_protocol("http://x.fr/a.jpg"), "https://x.fr/a.jpg");
        assert_eq!(normalize_protocol("//x.fr/a.jpg"), "https://x.fr/a.jpg");
        assert_eq!(normalize_protocol("https://x.fr/a.jpg"), "https://x.fr/a.jpg");
        assert_eq!(normalize_protocol("/images/a.jpg"), "/images/a.jpg");
    }

    #[test]
    fn test_url_basename() {
        assert_eq!(url_basename("https://x.fr/2020/05/photo.jpg?w=640"), "photo.jpg");
        assert_eq!(url_basename("https://x.fr/photo.jpg#top"), "photo.jpg");
        assert_eq!(url_basename("photo.jpg"), "photo.jpg");
        assert_eq!(url_basename("https://x.fr/dir/"), "");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("https://x.fr/a/photo.jpg"), "photo.jpg");
        assert_eq!(
            sanitize_filename("https://x.fr/a/ma%20photo+été.jpg?w=300"),
            "ma_20photo__t_.jpg"
        );
        assert_eq!(sanitize_filename("https://x.fr/dir/"), "image");
    }

    #[test]
    fn test_strip_size_suffix() {
        assert_eq!(
            strip_size_suffix("https://x.fr/photo-300x200.jpg").as_deref(),
            Some("https://x.fr/photo.jpg")
        );
        assert_eq!(
            strip_size_suffix("https://x.fr/photo-1024x768.png?w=1024").as_deref(),
            Some("https://x.fr/photo.png")
        );
        assert_eq!(strip_size_suffix("https://x.fr/photo.jpg"), None);
        assert_eq!(strip_size_suffix("https://x.fr/photo-2020.jpg"), None);
    }

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("https://x.fr/photo.JPG"));
        assert!(is_image_url("https://x.fr/photo.jpeg?w=1200"));
        assert!(is_image_url("https://x.fr/anim.gif"));
        assert!(!is_image_url("https://x.fr/mon-article/"));
        assert!(!is_image_url("https://x.fr/photo.jpg.html"));
    }
}
