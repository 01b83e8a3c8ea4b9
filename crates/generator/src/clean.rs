//! Content cleaning: turn a captured WordPress post body into markup that
//! can be embedded in a page as-is.
//!
//! Order matters: share widgets and "read more" links go first so the
//! empty-block pruning sees what they leave behind, and image resolution
//! runs on the pruned tree.

use blog_mirror_core::html::{
    attr, closest, collapsed_text, inner_html, is_element, parse_document, select_all,
    select_first,
};
use blog_mirror_core::naming::{
    is_image_url, normalize_protocol, sanitize_filename, strip_size_suffix, url_basename,
};
use blog_mirror_core::{ImageMap, Result, SiteConfig};
use kuchikiki::NodeRef;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Default site-relative directory images are served from
pub const IMAGES_URL_PREFIX: &str = "/images/";

/// Class tokens of the theme's content wrapper
const WRAPPER_CLASSES: &[&str] = &["entry-content", "post-content"];

/// Class substrings identifying share/related-post widgets
const SHARE_WIDGET_MARKERS: &[&str] = &[
    "sharedaddy",
    "sd-sharing",
    "sd-social",
    "sd-like",
    "share-",
    "jp-relatedposts",
    "wpcnt",
];

/// Attributes only meaningful to WordPress' responsive image handling
const STRIPPED_IMAGE_ATTRIBUTES: &[&str] = &["srcset", "sizes", "class", "width", "height"];

static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p(\s[^>]*)?>(\s|&nbsp;)*</p>").unwrap());
static EMPTY_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div(\s[^>]*)?>(\s|&nbsp;)*</div>").unwrap());
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*){2,}").unwrap());

/// Maps an `<img src>` to the local file that holds it.
///
/// The set of files already present in the images directory is captured
/// once at construction; resolution itself never touches the filesystem.
#[derive(Debug, Clone)]
pub struct ImageResolver<'a> {
    image_map: &'a ImageMap,
    local_files: BTreeSet<String>,
    url_prefix: String,
}

impl<'a> ImageResolver<'a> {
    pub fn new<I>(image_map: &'a ImageMap, local_files: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            image_map,
            local_files: local_files.into_iter().collect(),
            url_prefix: IMAGES_URL_PREFIX.to_string(),
        }
    }

    /// Serve rewritten images under `prefix` instead of `/images/`
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Resolver for a site: scans the configured images directory and
    /// links images under its place in the output directory.
    pub fn for_site(image_map: &'a ImageMap, config: &SiteConfig) -> Result<Self> {
        Ok(Self::scan(image_map, &config.paths.images_dir())?
            .with_url_prefix(config.paths.images_url_prefix()))
    }

    /// Site-relative `src` for a local image file
    pub fn local_src(&self, filename: &str) -> String {
        format!("{}{}", self.url_prefix, filename)
    }

    /// Build a resolver from the files currently in `images_dir`.
    /// A missing directory counts as empty.
    pub fn scan(image_map: &'a ImageMap, images_dir: &Path) -> Result<Self> {
        if !images_dir.exists() {
            return Ok(Self::new(image_map, Vec::new()));
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(images_dir)? {
            let entry = entry?;
            if entry.path().is_file()
                && let Some(name) = entry.file_name().to_str()
            {
                files.push(name.to_string());
            }
        }
        Ok(Self::new(image_map, files))
    }

    /// Local filename for an image source, trying in turn: exact URL (after
    /// forcing https), URL without a `-WxH` size suffix, same basename as
    /// any known URL, and finally a file already in the images directory.
    pub fn resolve(&self, src: &str) -> Option<String> {
        let src = src.trim();
        if src.is_empty() {
            return None;
        }

        // Already rewritten by an earlier pass
        if let Some(name) = src.strip_prefix(self.url_prefix.as_str())
            && (self.local_files.contains(name) || self.is_mapped_file(name))
        {
            return Some(name.to_string());
        }

        let url = normalize_protocol(src);
        if let Some(found) = self.lookup(&url).or_else(|| self.lookup(src)) {
            return Some(found);
        }

        if let Some(found) = strip_size_suffix(&url).and_then(|bare| self.lookup(&bare)) {
            return Some(found);
        }

        let basename = url_basename(&url);
        if !basename.is_empty()
            && let Some(found) = self
                .image_map
                .iter()
                .filter(|(key, _)| url_basename(key) == basename)
                .find_map(|(_, file)| file.clone())
        {
            return Some(found);
        }

        let sanitized = sanitize_filename(&url);
        self.local_files.contains(&sanitized).then_some(sanitized)
    }

    fn lookup(&self, url: &str) -> Option<String> {
        self.image_map.get(url).cloned().flatten()
    }

    fn is_mapped_file(&self, name: &str) -> bool {
        self.image_map.values().any(|file| file.as_deref() == Some(name))
    }
}

/// Result of cleaning one post body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedContent {
    pub html: String,
    /// Images dropped because no local file could be found
    pub removed_images: usize,
}

/// Clean a post body.
///
/// Deterministic for a given input and resolver, and idempotent: cleaning
/// the output again changes nothing.
pub fn clean_content(html: &str, resolver: &ImageResolver) -> CleanedContent {
    let document = parse_document(html);
    let Some(body) = select_first(&document, "body") else {
        return CleanedContent {
            html: String::new(),
            removed_images: 0,
        };
    };
    let root = content_root(&body);

    remove_share_widgets(&root);
    remove_more_links(&root);
    prune_empty_blocks(&root);
    let removed_images = rewrite_images(&root, resolver);
    remove_empty_captions(&root);
    prune_empty_blocks(&root);

    CleanedContent {
        html: tidy_markup(&inner_html(&content_root(&root))),
        removed_images,
    }
}

/// The innermost wrapper div when wrappers are the node's only content,
/// else the node itself
fn content_root(node: &NodeRef) -> NodeRef {
    let mut root = node.clone();
    while let Some(wrapper) = sole_wrapper(&root) {
        root = wrapper;
    }
    root
}

fn sole_wrapper(node: &NodeRef) -> Option<NodeRef> {
    let mut elements = Vec::new();
    for child in node.children() {
        if child.as_element().is_some() {
            elements.push(child);
        } else if let Some(text) = child.as_text()
            && !text.borrow().trim().is_empty()
        {
            return None;
        }
    }

    match elements.as_slice() {
        [only] if is_element(only, "div") && has_class_token(only, WRAPPER_CLASSES) => {
            Some(only.clone())
        }
        _ => None,
    }
}

fn has_class_token(node: &NodeRef, tokens: &[&str]) -> bool {
    attr(node, "class")
        .is_some_and(|class| class.split_whitespace().any(|c| tokens.contains(&c)))
}

/// Matching elements strictly below `root`
fn descendants(root: &NodeRef, selector: &str) -> Vec<NodeRef> {
    select_all(root, selector)
        .into_iter()
        .filter(|node| node != root)
        .collect()
}

fn is_attached_under(node: &NodeRef, root: &NodeRef) -> bool {
    node.ancestors().any(|ancestor| &ancestor == root)
}

fn remove_share_widgets(root: &NodeRef) {
    for node in descendants(root, "div[class], span[class]") {
        let is_widget = attr(&node, "class")
            .is_some_and(|class| SHARE_WIDGET_MARKERS.iter().any(|m| class.contains(m)));
        if is_widget {
            node.detach();
        }
    }
}

fn remove_more_links(root: &NodeRef) {
    for link in descendants(root, "a.more-link") {
        link.detach();
    }
}

/// Drop paragraphs and divs with no visible text and no image
fn prune_empty_blocks(root: &NodeRef) {
    for block in descendants(root, "p, div") {
        if !is_attached_under(&block, root) {
            continue;
        }
        if block.text_contents().trim().is_empty() && select_first(&block, "img").is_none() {
            block.detach();
        }
    }
}

/// Point every image at its local copy, or remove it. Returns the number
/// of images removed.
fn rewrite_images(root: &NodeRef, resolver: &ImageResolver) -> usize {
    let mut removed = 0;

    for img in descendants(root, "img") {
        if !is_attached_under(&img, root) {
            continue;
        }
        let src = attr(&img, "src").unwrap_or_default();

        let Some(filename) = resolver.resolve(&src) else {
            log::debug!("Removing unresolved image {}", src);
            let target = closest(&img, "figure")
                .or_else(|| closest(&img, "a"))
                .unwrap_or_else(|| img.clone());
            target.detach();
            removed += 1;
            continue;
        };

        if let Some(element) = img.as_element() {
            let mut attributes = element.attributes.borrow_mut();
            attributes.insert("src", resolver.local_src(&filename));
            for name in STRIPPED_IMAGE_ATTRIBUTES {
                attributes.remove(*name);
            }
        }

        if let Some(link) = img.parent().filter(|p| is_element(p, "a"))
            && attr(&link, "href").is_some_and(|href| is_image_url(&href))
        {
            link.insert_before(img.clone());
            link.detach();
        }
    }

    removed
}

fn remove_empty_captions(root: &NodeRef) {
    for caption in descendants(root, "figcaption") {
        if collapsed_text(&caption).is_empty() {
            caption.detach();
        }
    }
}

/// String-level cleanup of the serialized markup
fn tidy_markup(html: &str) -> String {
    let mut html = html.to_string();
    loop {
        let next = EMPTY_PARAGRAPH.replace_all(&html, "");
        let next = EMPTY_DIV.replace_all(&next, "").into_owned();
        if next == html {
            break;
        }
        html = next;
    }
    BLANK_LINES.replace_all(&html, "\n\n").trim().to_string()
}
