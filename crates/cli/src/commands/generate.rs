use anyhow::{Context, Result};
use blog_mirror_core::{AttachmentSlugs, Dataset, load_config};
use blog_mirror_generator::{ImageResolver, generate_site};
use std::fs;
use std::path::PathBuf;

/// Build the static site from the crawled dataset
pub async fn run(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let output = &config.paths.output_dir;

    println!("🔨 Building static site...");
    println!("   Source: {}", config.paths.data_file.display());
    println!("   Output: {}", output.display());
    println!();

    let dataset = Dataset::load(&config.paths.data_file)
        .with_context(|| format!("Failed to read {}", config.paths.data_file.display()))?;
    let attachments = AttachmentSlugs::load(&config.paths.attachments_file).with_context(|| {
        format!(
            "Failed to read {}",
            config.paths.attachments_file.display()
        )
    })?;

    println!("✓ Loaded {} posts", dataset.posts.len());
    println!("  Images known: {}", dataset.image_map.len());
    println!("  Attachment slugs: {}", attachments.len());
    println!();

    fs::create_dir_all(output).context("Failed to create output directory")?;
    let resolver = ImageResolver::for_site(&dataset.image_map, &config)
        .context("Failed to list images directory")?;

    println!("📄 Rendering pages...");
    let site = generate_site(&dataset, &attachments, &resolver, &config);
    let written = site.write_to(output).context("Failed to write site")?;
    println!("   ✓ Wrote {} files", written);

    println!();
    println!("✅ Build complete!");
    println!("   Posts rendered: {}", site.summary.rendered);
    println!("   Posts excluded: {}", site.summary.excluded);
    println!("   Images removed: {}", site.summary.removed_images);
    println!();
    println!("To preview locally:");
    println!("   blog-mirror serve");
    println!();

    Ok(())
}
