use crate::error::Result;
use crate::store::{AnchorStore, SaveRequest, TaggedAnchor, site_key};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    sites: IndexMap<String, Vec<TaggedAnchor>>,
}

/// Store backed by a pretty-printed JSON file.
///
/// A missing file is treated as an empty store and created on first save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    owner: String,
}

impl JsonFileStore {
    /// Create a store at `path` whose saves are owned by `owner`
    pub fn new(path: impl Into<PathBuf>, owner: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            owner: owner.into(),
        }
    }

    async fn read(&self) -> Result<StoreFile> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait(?Send)]
impl AnchorStore for JsonFileStore {
    async fn save(&self, request: SaveRequest) -> Result<()> {
        let mut file = self.read().await?;
        file.sites
            .entry(site_key(&request.anchor.site))
            .or_default()
            .push(TaggedAnchor {
                owner: self.owner.clone(),
                metadata: request.anchor.metadata,
                message: request.message,
            });
        let json = serde_json::to_string_pretty(&file)?;
        tokio::fs::write(&self.path, json).await?;
        log::debug!("Saved tag to {}", self.path.display());
        Ok(())
    }

    async fn load(&self, site: &str) -> Result<Vec<TaggedAnchor>> {
        let mut file = self.read().await?;
        Ok(file.sites.shift_remove(&site_key(site)).unwrap_or_default())
    }
}
