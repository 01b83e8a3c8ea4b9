//! Crawl a WordPress site into a [`Dataset`]: sitemap, post pages, images.

pub mod extract;
pub mod fetch;
pub mod images;
pub mod sitemap;

#[cfg(test)]
mod testing;

use blog_mirror_core::naming::normalize_protocol;
use blog_mirror_core::{Dataset, Post, Result, SiteConfig};
use std::collections::HashSet;
use std::time::Duration;

pub use extract::extract_post;
pub use fetch::{Fetcher, HttpFetcher};
pub use images::{DownloadReport, download_images};
pub use sitemap::{extract_locs, filter_post_urls};

/// What a crawl run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Post URLs kept from the sitemap
    pub candidates: usize,
    pub extracted: usize,
    /// Fetch or extraction failures
    pub skipped: usize,
    pub images: DownloadReport,
}

/// Run a full crawl.
///
/// Only a sitemap failure aborts the run; a post that cannot be fetched or
/// parsed is logged and left out, an image that cannot be downloaded is
/// recorded as missing.
pub async fn crawl(config: &SiteConfig, fetcher: &dyn Fetcher) -> Result<(Dataset, CrawlSummary)> {
    let source_url = config.site.source_url.trim_end_matches('/');
    let delay = Duration::from_millis(config.crawl.delay_ms);
    let mut summary = CrawlSummary::default();

    let sitemap_url = format!("{}/sitemap.xml", source_url);
    let sitemap = fetcher.get_text(&sitemap_url).await?;
    let urls = filter_post_urls(&extract_locs(&sitemap), &config.crawl.excluded_slugs);
    summary.candidates = urls.len();
    log::info!("{} candidate posts in {}", urls.len(), sitemap_url);

    let mut posts: Vec<Post> = Vec::with_capacity(urls.len());
    for (i, url) in urls.iter().enumerate() {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        log::info!("[{}/{}] {}", i + 1, urls.len(), url);

        let html = match fetcher.get_text(url).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("Skipping {}: {}", url, e);
                summary.skipped += 1;
                continue;
            }
        };

        match extract_post(url, &html, source_url) {
            Ok(post) => posts.push(post),
            Err(e) => {
                log::warn!("Skipping {}: {}", url, e);
                summary.skipped += 1;
            }
        }
    }
    summary.extracted = posts.len();

    let image_urls = distinct_image_urls(&posts, config.crawl.avatar_url.as_deref());
    let (image_map, report) =
        download_images(fetcher, &image_urls, &config.paths.images_dir(), delay).await?;
    summary.images = report;

    for post in &mut posts {
        post.local_images = post
            .images
            .iter()
            .filter_map(|url| image_map.get(&normalize_protocol(url)).cloned().flatten())
            .collect();
    }

    Ok((Dataset { posts, image_map }, summary))
}

/// Every image referenced by a post, first occurrence order, then the avatar
fn distinct_image_urls(posts: &[Post], avatar_url: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .flat_map(|post| post.images.iter().map(String::as_str))
        .chain(avatar_url)
        .map(normalize_protocol)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
