use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Default config filename, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "blog.toml";

/// Complete site configuration
///
/// Every section and key is optional in `blog.toml`; omitted values take
/// the defaults below.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub crawl: CrawlConfig,
    pub paths: PathsConfig,
    pub render: RenderConfig,
    pub serve: ServeConfig,
}

/// Source and published site identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// WordPress site that gets crawled
    pub source_url: String,
    /// Where the generated site is published
    pub site_url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// Content of the CNAME file (defaults to the host of `site_url`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            source_url: "https://blog.example.fr".to_string(),
            site_url: "https://www.example.fr".to_string(),
            title: "Le blog".to_string(),
            description: "Archives du blog".to_string(),
            author: String::new(),
            language: "fr".to_string(),
            cname: None,
        }
    }
}

/// Crawler behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    pub user_agent: String,
    /// Politeness delay between two requests
    pub delay_ms: u64,
    pub timeout_secs: u64,
    /// Author avatar, always downloaded alongside post images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Top-level slugs that are pages, not posts
    pub excluded_slugs: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("blog-mirror/", env!("CARGO_PKG_VERSION")).to_string(),
            delay_ms: 1000,
            timeout_secs: 30,
            avatar_url: None,
            excluded_slugs: [
                "a-propos",
                "about",
                "contact",
                "mentions-legales",
                "politique-de-confidentialite",
                "sample-page",
                "page-d-exemple",
                "category",
                "tag",
                "author",
                "feed",
                "wp-admin",
                "wp-content",
                "wp-login.php",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub data_file: PathBuf,
    pub attachments_file: PathBuf,
    pub output_dir: PathBuf,
    /// Defaults to `<output_dir>/images`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/posts.json"),
            attachments_file: PathBuf::from("data/attachments.json"),
            output_dir: PathBuf::from("docs"),
            images_dir: None,
        }
    }
}

impl PathsConfig {
    pub fn images_dir(&self) -> PathBuf {
        self.images_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("images"))
    }

    /// Site-relative URL the images directory is served under, with
    /// leading and trailing slashes (`/images/` by default)
    pub fn images_url_prefix(&self) -> String {
        let images_dir = self.images_dir();
        let segments: Vec<String> = match images_dir.strip_prefix(&self.output_dir) {
            Ok(relative) => relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect(),
            Err(_) => vec!["images".to_string()],
        };
        if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", segments.join("/"))
        }
    }
}

/// Page rendering knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Maximum excerpt length in characters, ellipsis excluded
    pub excerpt_length: usize,
    /// Boilerplate removed from excerpts
    pub marketing_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            excerpt_length: 200,
            marketing_text: "Abonnez-vous pour recevoir les nouveaux articles par e-mail."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl SiteConfig {
    /// CNAME file content
    pub fn cname(&self) -> String {
        if let Some(cname) = &self.site.cname {
            return cname.clone();
        }
        Url::parse(&self.site.site_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default()
    }
}

/// Load configuration from a TOML file.
///
/// A missing file is not an error: the defaults are returned.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("{} not found, using default configuration", path.display());
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration from a string (useful for testing)
pub fn parse_config_str(content: &str) -> Result<SiteConfig> {
    let mut config: SiteConfig = toml::from_str(content)?;

    config.site.source_url = validate_url(&config.site.source_url, "site.source_url")?;
    config.site.site_url = validate_url(&config.site.site_url, "site.site_url")?;

    validate_path(&config.paths.data_file, "paths.data_file")?;
    validate_path(&config.paths.attachments_file, "paths.attachments_file")?;
    validate_path(&config.paths.output_dir, "paths.output_dir")?;
    if let Some(images_dir) = &config.paths.images_dir {
        validate_path(images_dir, "paths.images_dir")?;
        validate_inside(images_dir, &config.paths.output_dir, "paths.images_dir")?;
    }

    if config.render.excerpt_length == 0 {
        return Err(Error::ConfigParse(
            "render.excerpt_length must be greater than 0".to_string(),
        ));
    }

    Ok(config)
}

/// Check that a URL is absolute http(s) and return it without trailing slash
fn validate_url(value: &str, field_name: &str) -> Result<String> {
    let parsed = Url::parse(value).map_err(|e| {
        Error::ConfigParse(format!("Invalid URL in '{}': '{}' ({})", field_name, value, e))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::ConfigParse(format!(
            "'{}' must be an http(s) URL, got '{}'",
            field_name, value
        )));
    }

    Ok(value.trim_end_matches('/').to_string())
}

fn validate_path(path: &Path, field_name: &str) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }
    Ok(())
}

/// Images are linked by site-relative URL, so they must live under the
/// generated site
fn validate_inside(path: &Path, root: &Path, field_name: &str) -> Result<()> {
    let inside = path
        .strip_prefix(root)
        .is_ok_and(|relative| !relative.components().any(|c| c == Component::ParentDir));
    if !inside {
        return Err(Error::ConfigParse(format!(
            "'{}' ({}) must be inside paths.output_dir ({})",
            field_name,
            path.display(),
            root.display()
        )));
    }
    Ok(())
}
