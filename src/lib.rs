//! # page-tags
//!
//! Anchor social tags to arbitrary spans of third-party web pages and
//! highlight them again on later visits.
//!
//! ## Features
//!
//! - **Locator Codec**: Encode a node as an absolute path (`/html/body/DIV[2]/text()[1]`)
//!   and resolve it back, without ever failing loudly
//! - **Decoration Engine**: Highlight text spans, images and elements; hover tooltips;
//!   classifier suggestions that can be cleared again
//! - **Selection Controller**: Turn a user selection into a saved tag
//! - **Overlay Manager**: Re-render every stored tag once per page load
//! - **Page Capture**: Snapshot live pages via Chrome DevTools Protocol (CDP)
//!
//! ## Library Usage
//!
//! ### Rendering stored tags
//!
//! ```rust,no_run
//! use page_tags::{DecorationEngine, MemoryStore, NotificationCenter, OverlayManager, PageContext, Settings};
//! use page_tags::dom::load_snapshot;
//! use std::rc::Rc;
//!
//! # async fn run() -> page_tags::Result<()> {
//! let mut doc = load_snapshot("page.json")?;
//! let ctx = PageContext::new("https://example.com", Settings::default(), Rc::new(NotificationCenter::new()));
//! let store = MemoryStore::new("me");
//!
//! let mut engine = DecorationEngine::new();
//! let mut overlay = OverlayManager::new(ctx);
//! if let Some(report) = overlay.load(&mut doc, &mut engine, &store).await? {
//!     println!("Rendered {}/{} tags", report.rendered, report.total);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Encoding and resolving locators
//!
//! ```rust
//! use page_tags::{Document, ElementNode, locator};
//!
//! let doc = Document::from_snapshot(&ElementNode::new("body").with_child(ElementNode::new("p").with_text("hi")));
//! let p = doc.children(doc.body().unwrap())[0];
//! let text = doc.children(p)[0];
//!
//! let path = locator::locate(&doc, text).unwrap().to_string();
//! assert_eq!(path, "/html/body/P[1]/text()[1]");
//! assert_eq!(locator::resolve(&doc, &path), Some(text));
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: In-memory page model and snapshots
//! - [`locator`]: Locator encoding and resolution
//! - [`anchor`]: Anchors (two locators plus offsets)
//! - [`decoration`]: Highlights, tooltips and suggestions
//! - [`selection`]: Selection state machine and affordances
//! - [`overlay`]: Loading and rendering stored tags
//! - [`store`]: Persistence boundary
//! - [`context`]: Per-page context and notifications
//! - [`config`]: Settings and the site block-list
//! - [`browser`]: Page capture from Chrome
//! - [`error`]: Error types and result aliases

pub mod anchor;
pub mod browser;
pub mod config;
pub mod context;
pub mod decoration;
pub mod dom;
pub mod error;
pub mod locator;
pub mod overlay;
pub mod selection;
pub mod store;

pub use anchor::{Anchor, ResolvedAnchor};
pub use browser::{ConnectionOptions, LaunchOptions, PageCapture};
pub use config::Settings;
pub use context::{AnchorCache, Notification, NotificationCenter, NotificationLevel, Notifier, PageContext};
pub use decoration::{DecorationEngine, HighlightOutcome, HighlightRequest, TagMeta};
pub use dom::{BoundingBox, Document, ElementNode, NodeId};
pub use error::{Error, Result};
pub use locator::Locator;
pub use overlay::{OverlayManager, OverlayReport};
pub use selection::{Key, ScrollPosition, SelectionController, SelectionRange, SelectionState, SubmitRequest};
pub use store::{AnchorStore, MemoryStore, SaveRequest, TaggedAnchor};

#[cfg(feature = "file-store")]
pub use store::JsonFileStore;
