use anyhow::{Context, Result};
use blog_mirror_core::load_config;
use blog_mirror_crawler::{HttpFetcher, crawl};
use std::path::PathBuf;
use std::time::Duration;

/// Crawl the source blog and write the dataset
pub async fn run(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;

    println!("🕷  Crawling {}", config.site.source_url);
    println!("   Dataset: {}", config.paths.data_file.display());
    println!("   Images:  {}", config.paths.images_dir().display());
    println!();

    let fetcher = HttpFetcher::new(
        &config.crawl.user_agent,
        Duration::from_secs(config.crawl.timeout_secs),
    )
    .context("Failed to create HTTP client")?;

    let (dataset, summary) = crawl(&config, &fetcher).await.context("Crawl failed")?;

    dataset
        .save(&config.paths.data_file)
        .with_context(|| format!("Failed to write {}", config.paths.data_file.display()))?;

    println!();
    println!("✅ Crawl complete!");
    println!("   Candidate URLs:    {}", summary.candidates);
    println!("   Posts extracted:   {}", summary.extracted);
    println!("   Posts skipped:     {}", summary.skipped);
    println!("   Images downloaded: {}", summary.images.downloaded);
    println!("   Images cached:     {}", summary.images.cached);
    println!("   Images failed:     {}", summary.images.failed);
    println!();

    Ok(())
}
