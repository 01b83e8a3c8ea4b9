//! Static site generation from a crawled [`Dataset`].

pub mod clean;
pub mod excerpt;
pub mod render;
pub mod style;

use blog_mirror_core::{
    AttachmentSlugs, Dataset, Post, Result, SiteConfig, format_french_date, parse_french_date,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub use clean::{CleanedContent, IMAGES_URL_PREFIX, ImageResolver, clean_content};
pub use excerpt::{excerpt, plain_text, truncate_at_word};

/// What a generation run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub rendered: usize,
    /// Attachment pages, empty or duplicate slugs
    pub excluded: usize,
    /// Images dropped from post bodies for lack of a local file
    pub removed_images: usize,
}

pub struct GeneratedSite {
    /// (path, content) pairs, always written
    pub pages: Vec<(String, String)>,
    /// (path, content) pairs written only when the file does not exist yet
    pub preserved: Vec<(String, String)>,
    pub summary: GenerateSummary,
}

impl GeneratedSite {
    /// Write every file under `output_dir`, returning how many were written
    pub fn write_to(&self, output_dir: &Path) -> Result<usize> {
        let mut written = 0;
        for (path, content) in &self.pages {
            write_file(&output_dir.join(path), content)?;
            written += 1;
        }
        for (path, content) in &self.preserved {
            let target = output_dir.join(path);
            if target.exists() {
                log::info!("Keeping existing {}", target.display());
                continue;
            }
            write_file(&target, content)?;
            written += 1;
        }
        Ok(written)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Sort key for posts whose date could not be parsed
fn oldest_date() -> NaiveDate {
    DateTime::<Utc>::UNIX_EPOCH.date_naive()
}

/// Drop attachment pages, annotate dates and sort newest first.
///
/// Returns the kept posts and the number excluded. Unparseable dates keep
/// their raw text for display and sort as the oldest posts.
pub fn prepare_posts(posts: &[Post], attachments: &AttachmentSlugs) -> (Vec<Post>, usize) {
    let mut seen = HashSet::new();
    let mut prepared: Vec<Post> = Vec::with_capacity(posts.len());

    for post in posts {
        if post.slug.is_empty() || attachments.contains(&post.slug) {
            continue;
        }
        if !seen.insert(post.slug.clone()) {
            log::warn!("Duplicate slug {}, keeping the first post", post.slug);
            continue;
        }

        let mut post = post.clone();
        post.parsed_date = parse_french_date(&post.date);
        post.display_date = match post.parsed_date {
            Some(date) => Some(format_french_date(Some(date))),
            None => {
                log::warn!("Unparseable date {:?} for {}", post.date, post.slug);
                Some(post.date.clone())
            }
        };
        prepared.push(post);
    }

    prepared.sort_by(|a, b| {
        let a = a.parsed_date.unwrap_or_else(oldest_date);
        let b = b.parsed_date.unwrap_or_else(oldest_date);
        b.cmp(&a)
    });

    let excluded = posts.len() - prepared.len();
    (prepared, excluded)
}

/// Render the whole site in memory
pub fn generate_site(
    dataset: &Dataset,
    attachments: &AttachmentSlugs,
    resolver: &ImageResolver,
    config: &SiteConfig,
) -> GeneratedSite {
    let (mut posts, excluded) = prepare_posts(&dataset.posts, attachments);

    let mut removed_images = 0;
    for post in &mut posts {
        let cleaned = clean_content(&post.content_html, resolver);
        if cleaned.removed_images > 0 {
            log::warn!(
                "{}: removed {} unresolved image(s)",
                post.slug,
                cleaned.removed_images
            );
        }
        removed_images += cleaned.removed_images;
        post.content_html = cleaned.html;
    }

    let mut pages = Vec::with_capacity(posts.len() + 6);
    for (i, post) in posts.iter().enumerate() {
        let previous = posts.get(i + 1);
        let next = i.checked_sub(1).and_then(|j| posts.get(j));
        pages.push((
            format!("{}/index.html", post.slug),
            render::render_post(post, previous, next, config),
        ));
    }

    pages.push(("index.html".to_string(), render::render_index(&posts, config)));
    pages.push(("404.html".to_string(), render::render_not_found(config)));
    pages.push(("sitemap.xml".to_string(), render::render_sitemap(&posts, config)));
    pages.push(("style.css".to_string(), style::STYLESHEET.to_string()));
    pages.push((".nojekyll".to_string(), String::new()));

    let cname = config.cname();
    if !cname.is_empty() {
        pages.push(("CNAME".to_string(), format!("{}\n", cname)));
    }

    GeneratedSite {
        pages,
        preserved: vec![("robots.txt".to_string(), render::render_robots(config))],
        summary: GenerateSummary {
            rendered: posts.len(),
            excluded,
            removed_images,
        },
    }
}
