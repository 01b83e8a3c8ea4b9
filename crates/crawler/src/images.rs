use crate::fetch::Fetcher;
use blog_mirror_core::naming::{normalize_protocol, sanitize_filename};
use blog_mirror_core::{ImageMap, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Outcome counts of an image download pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub downloaded: usize,
    /// Already present locally, not fetched again
    pub cached: usize,
    pub failed: usize,
}

/// Download each image into `images_dir`, one at a time, waiting `delay`
/// before every request.
///
/// Keys of the returned map are the https-normalized URLs, query string
/// included. A file that
/// already exists under the derived name is reused without a request; a
/// failed download is logged and recorded as `None`.
pub async fn download_images(
    fetcher: &dyn Fetcher,
    urls: &[String],
    images_dir: &Path,
    delay: Duration,
) -> Result<(ImageMap, DownloadReport)> {
    fs::create_dir_all(images_dir)?;

    let mut map = ImageMap::new();
    let mut report = DownloadReport::default();

    for url in urls {
        let url = normalize_protocol(url);
        if map.contains_key(&url) {
            continue;
        }

        let filename = sanitize_filename(&url);
        let path = images_dir.join(&filename);
        if path.exists() {
            log::debug!("Image already present: {}", filename);
            report.cached += 1;
            map.insert(url, Some(filename));
            continue;
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let saved: Result<()> = match fetcher.get_bytes(&url).await {
            Ok(bytes) => fs::write(&path, bytes).map_err(Into::into),
            Err(e) => Err(e),
        };

        match saved {
            Ok(()) => {
                log::info!("Downloaded {}", filename);
                report.downloaded += 1;
                map.insert(url, Some(filename));
            }
            Err(e) => {
                log::warn!("Image download failed: {}", e);
                report.failed += 1;
                map.insert(url, None);
            }
        }
    }

    Ok((map, report))
}
