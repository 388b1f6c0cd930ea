//! Persistence boundary
//!
//! The backend that stores tags is an external service. This module defines
//! the wire types it speaks, the [`AnchorStore`] trait the rest of the crate
//! consumes, and two stores: [`MemoryStore`] for in-process use and
//! [`JsonFileStore`] (feature `file-store`) backed by a JSON file.

pub mod memory;
#[cfg(feature = "file-store")]
pub mod file;

pub use memory::MemoryStore;
#[cfg(feature = "file-store")]
pub use file::JsonFileStore;

use crate::anchor::Anchor;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Locators and offsets of a tagged span, as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorMetadata {
    pub start_tag_xpath: String,
    pub end_tag_xpath: String,
    pub start_tag_offset: usize,
    pub end_tag_offset: usize,
}

/// Anchor sent on save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnchor {
    pub site: String,
    #[serde(flatten)]
    pub metadata: AnchorMetadata,
}

/// Save request: anchor, recipients and optional message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub anchor: NewAnchor,
    pub usernames: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A persisted tag as returned on load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedAnchor {
    pub owner: String,
    pub metadata: AnchorMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveRequest {
    /// Build a save request for `url`
    pub fn new(url: &str, anchor: &Anchor, usernames: Vec<String>, message: Option<String>) -> Self {
        Self {
            anchor: NewAnchor {
                site: site_key(url),
                metadata: anchor.to_metadata(),
            },
            usernames,
            message,
        }
    }
}

/// Backend that saves and loads tags
#[async_trait(?Send)]
pub trait AnchorStore {
    /// Persist one tag. A sign-in failure is reported as `Error::AuthRequired`.
    async fn save(&self, request: SaveRequest) -> Result<()>;

    /// All tags visible on `site`
    async fn load(&self, site: &str) -> Result<Vec<TaggedAnchor>>;
}

/// Normalize a page URL into the key tags are stored under.
///
/// Adds a missing scheme and drops the fragment, which never changes the page.
pub fn site_key(url: &str) -> String {
    let trimmed = url.trim();
    let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);

    if without_fragment.contains("://")
        || without_fragment.starts_with("data:")
        || without_fragment.starts_with("about:")
    {
        return without_fragment.to_string();
    }

    // localhost special case - use http by default
    if without_fragment.starts_with("localhost") || without_fragment.starts_with("127.0.0.1") {
        return format!("http://{}", without_fragment);
    }

    format!("https://{}", without_fragment)
}
