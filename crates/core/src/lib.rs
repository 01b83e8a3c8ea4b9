pub mod attachments;
pub mod config;
pub mod dates;
pub mod error;
pub mod html;
pub mod naming;
pub mod types;

pub use attachments::AttachmentSlugs;
pub use config::{SiteConfig, load_config, parse_config_str};
pub use dates::{format_french_date, parse_french_date};
pub use error::{Error, Result};
pub use types::*;
