use crate::error::{Error, Result};
use crate::store::{AnchorStore, SaveRequest, TaggedAnchor, site_key};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};

/// In-process store keyed by site.
///
/// Saved tags are attributed to `owner`. `fail_with_status` makes the next
/// requests fail the way a remote backend would.
#[derive(Debug)]
pub struct MemoryStore {
    owner: String,
    tags: RefCell<IndexMap<String, Vec<TaggedAnchor>>>,
    failure: Cell<Option<u16>>,
}

impl MemoryStore {
    /// Create an empty store whose saves are owned by `owner`
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            tags: RefCell::new(IndexMap::new()),
            failure: Cell::new(None),
        }
    }

    /// Builder method: seed a tag for `site`
    pub fn with_tag(self, site: &str, tag: TaggedAnchor) -> Self {
        self.tags.borrow_mut().entry(site_key(site)).or_default().push(tag);
        self
    }

    /// Fail every request with this status until cleared with `None`
    pub fn fail_with_status(&self, status: Option<u16>) {
        self.failure.set(status);
    }

    /// Number of tags stored for `site`
    pub fn count(&self, site: &str) -> usize {
        self.tags.borrow().get(&site_key(site)).map_or(0, Vec::len)
    }

    fn check(&self) -> Result<()> {
        match self.failure.get() {
            Some(status) => Err(Error::from_status(status, "injected failure")),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl AnchorStore for MemoryStore {
    async fn save(&self, request: SaveRequest) -> Result<()> {
        self.check()?;
        let tag = TaggedAnchor {
            owner: self.owner.clone(),
            metadata: request.anchor.metadata,
            message: request.message,
        };
        self.tags
            .borrow_mut()
            .entry(site_key(&request.anchor.site))
            .or_default()
            .push(tag);
        Ok(())
    }

    async fn load(&self, site: &str) -> Result<Vec<TaggedAnchor>> {
        self.check()?;
        Ok(self.tags.borrow().get(&site_key(site)).cloned().unwrap_or_default())
    }
}
