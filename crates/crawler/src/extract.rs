//! Pull a [`Post`] out of a rendered WordPress post page.

use blog_mirror_core::html::{
    attr, collapsed_text, is_element, outer_html, parse_document, select_all, select_first,
};
use blog_mirror_core::naming::{is_image_url, slug_from_url};
use blog_mirror_core::{Comment, Error, Post, Result};
use kuchikiki::NodeRef;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// WordPress post containers carry a `post-<id>` class
static POST_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|\s)post-\d+(\s|$)").unwrap());

const TITLE_SELECTORS: &[&str] = &[".entry-title", "h1", "h2"];
const DATE_SELECTORS: &[&str] = &[".entry-date", "time", ".posted-on", ".post-date"];

/// Removed from the content before it is captured
const CLUTTER_SELECTORS: &[&str] = &[
    "a.more-link",
    ".sharedaddy",
    ".sd-sharing-enabled",
    ".jp-relatedposts",
    ".wpcnt",
];

const COMMENT_LIST_ITEMS: &str = "ol.commentlist > li, ol.comment-list > li";
const COMMENT_FALLBACK_ITEMS: &str = "#comments .comment, .comments-area .comment";
const COMMENT_AUTHOR_SELECTORS: &[&str] = &[".comment-author .fn", ".fn", "cite"];
const COMMENT_TEXT_SELECTORS: &[&str] = &[".comment-content", ".comment-text", ".comment-body"];

/// Extract a post from its page HTML.
///
/// Fails with [`Error::MissingContent`] when neither a `post-<id>` div nor
/// an `<article>` is present; every other missing piece degrades to an
/// empty value.
pub fn extract_post(url: &str, html: &str, base_url: &str) -> Result<Post> {
    let document = parse_document(html);
    let container =
        find_container(&document).ok_or_else(|| Error::MissingContent(url.to_string()))?;

    let title = first_text(&container, TITLE_SELECTORS);
    let date = first_text(&container, DATE_SELECTORS);

    let content = select_first(&container, ".entry-content").unwrap_or_else(|| container.clone());
    for selector in CLUTTER_SELECTORS {
        for node in select_all(&content, selector) {
            node.detach();
        }
    }

    let images = collect_images(&content, base_url);
    let content_html = outer_html(&content);
    let comments = collect_comments(&document);

    Ok(Post {
        title,
        date,
        slug: slug_from_url(url),
        url: url.to_string(),
        content_html,
        images,
        comments,
        ..Default::default()
    })
}

fn find_container(document: &NodeRef) -> Option<NodeRef> {
    select_all(document, "div[class]")
        .into_iter()
        .find(|div| attr(div, "class").is_some_and(|class| POST_CLASS.is_match(&class)))
        .or_else(|| select_first(document, "article"))
}

fn first_text(node: &NodeRef, selectors: &[&str]) -> String {
    selectors
        .iter()
        .filter_map(|selector| select_first(node, selector))
        .map(|found| collapsed_text(&found))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// Image URLs in document order, best resolution first:
/// enclosing link to an image file, then first `srcset` candidate, then `src`.
fn collect_images(content: &NodeRef, base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let mut images: Vec<String> = Vec::new();

    for img in select_all(content, "img") {
        let linked = img
            .parent()
            .filter(|parent| is_element(parent, "a"))
            .and_then(|a| attr(&a, "href"))
            .filter(|href| is_image_url(href));

        let candidate = linked
            .or_else(|| attr(&img, "srcset").and_then(|srcset| first_srcset_candidate(&srcset)))
            .or_else(|| attr(&img, "src"))
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let Some(candidate) = candidate else {
            continue;
        };
        let resolved = resolve_url(base.as_ref(), &candidate);
        if !images.contains(&resolved) {
            images.push(resolved);
        }
    }

    images
}

fn first_srcset_candidate(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
        .map(str::to_string)
}

fn resolve_url(base: Option<&Url>, candidate: &str) -> String {
    if candidate.starts_with("//") || Url::parse(candidate).is_ok() {
        return candidate.to_string();
    }
    base.and_then(|b| b.join(candidate).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| candidate.to_string())
}

/// Top-level comments from the comment list, else from a wider scan of the
/// comments area. Comments without text are dropped.
fn collect_comments(document: &NodeRef) -> Vec<Comment> {
    let primary = comments_from(select_all(document, COMMENT_LIST_ITEMS));
    if !primary.is_empty() {
        return primary;
    }
    comments_from(select_all(document, COMMENT_FALLBACK_ITEMS))
}

fn comments_from(items: Vec<NodeRef>) -> Vec<Comment> {
    items
        .iter()
        .filter_map(|item| {
            let author = first_text(item, COMMENT_AUTHOR_SELECTORS);
            let text = COMMENT_TEXT_SELECTORS
                .iter()
                .filter_map(|selector| select_first(item, selector))
                .map(|node| block_text(&node))
                .find(|text| !text.is_empty())
                .unwrap_or_default();
            Comment::new(Some(author.as_str()), &text)
        })
        .collect()
}

/// Paragraph texts joined by blank lines, or the collapsed text when the
/// node holds no paragraphs
fn block_text(node: &NodeRef) -> String {
    let paragraphs: Vec<String> = select_all(node, "p")
        .iter()
        .map(collapsed_text)
        .filter(|t| !t.is_empty())
        .collect();
    if paragraphs.is_empty() {
        collapsed_text(node)
    } else {
        paragraphs.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://blog.example.fr";

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div id="post-42" class="post-42 post type-post status-publish">
  <h1 class="entry-title">Un été en  Bretagne</h1>
  <div class="entry-meta"><span class="entry-date">5 mars 2020</span></div>
  <div class="entry-content">
    <p>Premier paragraphe.</p>
    <p><a href="https://blog.example.fr/wp-content/uploads/2020/03/plage.jpg"><img src="https://blog.example.fr/wp-content/uploads/2020/03/plage-300x200.jpg" class="size-medium"></a></p>
    <p><img srcset="/wp-content/uploads/2020/03/phare-1024x768.jpg 1024w, /wp-content/uploads/2020/03/phare-300x225.jpg 300w" src="/wp-content/uploads/2020/03/phare-300x225.jpg"></p>
    <p><img src="port.jpg"></p>
    <p><img src="https://blog.example.fr/wp-content/uploads/2020/03/plage-300x200.jpg"></p>
    <p><a href="https://blog.example.fr/un-ete/#more-42" class="more-link">Continuer la lecture</a></p>
    <div class="sharedaddy sd-sharing-enabled"><h3>Partager :</h3></div>
  </div>
</div>
<div id="comments">
  <ol class="commentlist">
    <li class="comment">
      <div class="comment-author"><cite class="fn">Marie</cite></div>
      <div class="comment-content"><p>Magnifique !</p><p>Merci.</p></div>
      <ul class="children">
        <li class="comment">
          <div class="comment-author"><cite class="fn">Auteur</cite></div>
          <div class="comment-content"><p>Réponse</p></div>
        </li>
      </ul>
    </li>
    <li class="comment">
      <div class="comment-content"><p>Sans nom</p></div>
    </li>
    <li class="comment">
      <div class="comment-author"><cite class="fn">Vide</cite></div>
      <div class="comment-content"><p>  </p></div>
    </li>
  </ol>
</div>
</body></html>"#;

    #[test]
    fn test_extract_fields() {
        let post = extract_post("https://blog.example.fr/un-ete/", PAGE, BASE).unwrap();
        assert_eq!(post.title, "Un été en Bretagne");
        assert_eq!(post.date, "5 mars 2020");
        assert_eq!(post.slug, "un-ete");
        assert_eq!(post.url, "https://blog.example.fr/un-ete/");
        assert!(post.content_html.starts_with("<div class=\"entry-content\">"));
        assert!(post.content_html.contains("Premier paragraphe."));
    }

    #[test]
    fn test_extract_removes_clutter() {
        let post = extract_post("https://blog.example.fr/un-ete/", PAGE, BASE).unwrap();
        assert!(!post.content_html.contains("more-link"));
        assert!(!post.content_html.contains("Continuer la lecture"));
        assert!(!post.content_html.contains("sharedaddy"));
    }

    #[test]
    fn test_extract_image_priority() {
        let post = extract_post("https://blog.example.fr/un-ete/", PAGE, BASE).unwrap();
        assert_eq!(
            post.images,
            vec![
                // Full-size link target wins over the thumbnail
                "https://blog.example.fr/wp-content/uploads/2020/03/plage.jpg".to_string(),
                // First srcset candidate, resolved against the base URL
                "https://blog.example.fr/wp-content/uploads/2020/03/phare-1024x768.jpg".to_string(),
                "https://blog.example.fr/port.jpg".to_string(),
                "https://blog.example.fr/wp-content/uploads/2020/03/plage-300x200.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_top_level_comments_only() {
        let post = extract_post("https://blog.example.fr/un-ete/", PAGE, BASE).unwrap();
        assert_eq!(post.comments.len(), 2);
        assert_eq!(post.comments[0].author, "Marie");
        assert_eq!(post.comments[0].text, "Magnifique !\n\nMerci.");
        assert_eq!(post.comments[1].author, "Anonyme");
        assert_eq!(post.comments[1].text, "Sans nom");
    }

    #[test]
    fn test_extract_comment_fallback() {
        let html = r#"<article><h2>Titre</h2><div class="entry-content"><p>x</p></div></article>
<div class="comments-area">
  <div class="comment"><span class="fn">Paul</span><div class="comment-text">Bien vu</div></div>
</div>"#;
        let post = extract_post("https://blog.example.fr/titre/", html, BASE).unwrap();
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].author, "Paul");
        assert_eq!(post.comments[0].text, "Bien vu");
    }

    #[test]
    fn test_extract_article_fallback_and_missing_fields() {
        let html = "<html><body><article><p>Texte seul</p></article></body></html>";
        let post = extract_post("https://blog.example.fr/seul/", html, BASE).unwrap();
        assert_eq!(post.title, "");
        assert_eq!(post.date, "");
        assert!(post.content_html.starts_with("<article>"));
        assert!(post.comments.is_empty());
        assert!(post.images.is_empty());
    }

    #[test]
    fn test_extract_missing_container_is_error() {
        let html = "<html><body><div class=\"page\">Accueil</div></body></html>";
        let result = extract_post("https://blog.example.fr/accueil/", html, BASE);
        assert!(matches!(result, Err(Error::MissingContent(_))));
    }

    #[test]
    fn test_post_class_pattern() {
        assert!(POST_CLASS.is_match("post-42 post type-post"));
        assert!(POST_CLASS.is_match("hentry post-7"));
        assert!(!POST_CLASS.is_match("post-thumbnail"));
        assert!(!POST_CLASS.is_match("my-post-12"));
    }
}
