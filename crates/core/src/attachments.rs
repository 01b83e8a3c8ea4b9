use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Slugs of WordPress media-attachment pages, excluded from generation.
///
/// Loaded once from a JSON array of strings and passed to the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentSlugs(HashSet<String>);

impl AttachmentSlugs {
    /// Read the slug list. A missing file yields an empty set.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "Attachment list {} not found, no posts will be excluded",
                path.display()
            );
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let slugs: Vec<String> = serde_json::from_str(&content)?;
        Ok(slugs.into_iter().collect())
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.0.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AttachmentSlugs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
