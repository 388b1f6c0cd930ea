//! In-memory page model
//!
//! This module provides the DOM surface the anchoring code works against:
//! - ElementNode: Serializable snapshot of a page (elements and text nodes)
//! - Document: Mutable arena tree addressed by NodeId, with DOM-style
//!   operations such as `split_text` and inline style mutation

pub mod document;
pub mod element;

pub use document::{Descendants, Document, NodeId, NodeKind};
pub use element::{BoundingBox, ElementNode, SnapshotNode};

use crate::error::Result;
use std::path::Path;

/// Load a page snapshot from a JSON file
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Document> {
    let json = std::fs::read_to_string(path)?;
    let mut root: ElementNode = serde_json::from_str(&json)?;
    root.simplify();
    Ok(Document::from_snapshot(&root))
}
