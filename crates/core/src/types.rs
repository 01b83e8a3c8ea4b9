use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Author name used when a comment's author cannot be resolved
pub const ANONYMOUS_AUTHOR: &str = "Anonyme";

/// Remote image URL -> local filename.
///
/// A `None` value records an image whose download failed; lookups treat it
/// the same as a missing key.
pub type ImageMap = BTreeMap<String, Option<String>>;

/// A reader comment attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub text: String,
}

impl Comment {
    /// Build a comment from extracted author/text.
    ///
    /// Returns `None` when the text is empty after trimming; an empty or
    /// missing author falls back to [`ANONYMOUS_AUTHOR`].
    pub fn new(author: Option<&str>, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let author = author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR);
        Some(Self {
            author: author.to_string(),
            text: text.to_string(),
        })
    }
}

/// A blog post as extracted from the source site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Free-text date as displayed by the source site (e.g. "5 mars 2020")
    pub date: String,
    pub slug: String,
    pub url: String,
    pub content_html: String,
    /// Remote image URLs in discovery order
    #[serde(default)]
    pub images: Vec<String>,
    /// Local filenames of the images that were downloaded
    #[serde(default)]
    pub local_images: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Filled in during generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_date: Option<NaiveDate>,
    /// Filled in during generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
}

impl Post {
    /// Date string to show to readers: the formatted parsed date when
    /// available, else the raw source date.
    pub fn display_date(&self) -> &str {
        self.display_date.as_deref().unwrap_or(&self.date)
    }
}

/// The crawl output and generator input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub posts: Vec<Post>,
    #[serde(default)]
    pub image_map: ImageMap,
}

impl Dataset {
    /// Read a dataset from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the dataset as pretty-printed JSON, replacing any previous file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_comment_defaults_author() {
        let comment = Comment::new(None, "Merci !").unwrap();
        assert_eq!(comment.author, "Anonyme");

        let comment = Comment::new(Some("   "), "Merci !").unwrap();
        assert_eq!(comment.author, "Anonyme");

        let comment = Comment::new(Some(" Marie "), " Bravo ").unwrap();
        assert_eq!(comment.author, "Marie");
        assert_eq!(comment.text, "Bravo");
    }

    #[test]
    fn test_comment_rejects_empty_text() {
        assert!(Comment::new(Some("Marie"), "").is_none());
        assert!(Comment::new(Some("Marie"), " \n\t ").is_none());
    }

    #[test]
    fn test_display_date_falls_back_to_raw() {
        let mut post = Post {
            date: "un jour".to_string(),
            ..Default::default()
        };
        assert_eq!(post.display_date(), "un jour");

        post.display_date = Some("5 mars 2020".to_string());
        assert_eq!(post.display_date(), "5 mars 2020");
    }

    #[test]
    fn test_dataset_parses_null_image_entries() {
        let json = r#"{
            "posts": [{
                "title": "Bonjour",
                "date": "5 mars 2020",
                "slug": "bonjour",
                "url": "https://blog.example.fr/bonjour/",
                "content_html": "<p>Salut</p>",
                "images": ["https://blog.example.fr/a.jpg"],
                "comments": [{"author": "Paul", "text": "Super"}]
            }],
            "image_map": {
                "https://blog.example.fr/a.jpg": "a.jpg",
                "https://blog.example.fr/b.jpg": null
            }
        }"#;

        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.posts.len(), 1);
        assert!(dataset.posts[0].local_images.is_empty());
        assert_eq!(dataset.posts[0].comments[0].author, "Paul");
        assert_eq!(
            dataset.image_map["https://blog.example.fr/a.jpg"].as_deref(),
            Some("a.jpg")
        );
        assert_eq!(dataset.image_map["https://blog.example.fr/b.jpg"], None);
    }

    #[test]
    fn test_dataset_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("posts.json");

        let mut dataset = Dataset::default();
        dataset.posts.push(Post {
            title: "Bonjour".to_string(),
            slug: "bonjour".to_string(),
            ..Default::default()
        });
        dataset
            .image_map
            .insert("https://x/a.jpg".to_string(), Some("a.jpg".to_string()));

        dataset.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("parsed_date"));

        let loaded = Dataset::load(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_dataset_load_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(Dataset::load(dir.path().join("absent.json")).is_err());
    }
}
