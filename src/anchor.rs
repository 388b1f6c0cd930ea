use crate::decoration::DecorationRegistry;
use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::locator::{self, LiveTree, Locator, TreeView};
use crate::store::AnchorMetadata;
use serde::{Deserialize, Serialize};

/// A tagged span: two boundary locators and their offsets.
///
/// When both locators are equal the anchor is the single span
/// `[start_offset, end_offset)` of one node. Otherwise it stands for two
/// boundary spans, `[start_offset, end)` of the start node and
/// `[0, end_offset)` of the end node; nodes between the two are not part
/// of the rendered highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub start: Locator,
    pub end: Locator,
    pub start_offset: usize,
    pub end_offset: usize,
}

/// Resolved boundaries of an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedAnchor {
    /// Both boundaries are in the same node
    Single {
        node: NodeId,
        start: usize,
        end: usize,
    },
    /// Start and end are in different nodes
    Boundaries {
        start_node: NodeId,
        start_offset: usize,
        end_node: NodeId,
        end_offset: usize,
    },
}

impl Anchor {
    /// Build an anchor from live boundary nodes
    pub fn from_range(
        doc: &Document,
        start_container: NodeId,
        start_offset: usize,
        end_container: NodeId,
        end_offset: usize,
    ) -> Result<Self> {
        Ok(Self {
            start: locator::locate(doc, start_container)?,
            end: locator::locate(doc, end_container)?,
            start_offset,
            end_offset,
        })
    }

    /// Build an anchor in the coordinates of the undecorated page.
    ///
    /// Boundaries inside text that `registry` has split are moved back to the
    /// original text node, with their offsets counted from its start.
    pub fn from_decorated_range(
        doc: &Document,
        registry: &DecorationRegistry,
        start_container: NodeId,
        start_offset: usize,
        end_container: NodeId,
        end_offset: usize,
    ) -> Result<Self> {
        let (start_node, start_offset) = registry.source_position(start_container, start_offset);
        let (end_node, end_offset) = registry.source_position(end_container, end_offset);
        Ok(Self {
            start: locator::locate_in(doc, start_node, registry)?,
            end: locator::locate_in(doc, end_node, registry)?,
            start_offset,
            end_offset,
        })
    }

    /// Whether both boundaries address the same node
    pub fn is_single_node(&self) -> bool {
        self.start == self.end
    }

    /// Resolve both boundaries; `None` if either no longer matches
    pub fn resolve(&self, doc: &Document) -> Option<ResolvedAnchor> {
        self.resolve_in(doc, &LiveTree)
    }

    /// Resolve both boundaries against the tree as seen through `view`
    pub fn resolve_in<V: TreeView + ?Sized>(&self, doc: &Document, view: &V) -> Option<ResolvedAnchor> {
        let start_node = self.start.resolve_in(doc, view)?;
        if self.is_single_node() {
            return Some(ResolvedAnchor::Single {
                node: start_node,
                start: self.start_offset,
                end: self.end_offset,
            });
        }
        let end_node = self.end.resolve_in(doc, view)?;
        Some(ResolvedAnchor::Boundaries {
            start_node,
            start_offset: self.start_offset,
            end_node,
            end_offset: self.end_offset,
        })
    }

    /// Wire shape used by the persistence boundary
    pub fn to_metadata(&self) -> AnchorMetadata {
        AnchorMetadata {
            start_tag_xpath: self.start.to_string(),
            end_tag_xpath: self.end.to_string(),
            start_tag_offset: self.start_offset,
            end_tag_offset: self.end_offset,
        }
    }

    /// Parse the wire shape; fails on malformed locators
    pub fn from_metadata(metadata: &AnchorMetadata) -> Result<Self> {
        Ok(Self {
            start: Locator::parse(&metadata.start_tag_xpath)?,
            end: Locator::parse(&metadata.end_tag_xpath)?,
            start_offset: metadata.start_tag_offset,
            end_offset: metadata.end_tag_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::error::Error;

    fn sample() -> Document {
        Document::from_snapshot(
            &ElementNode::new("body")
                .with_child(ElementNode::new("p").with_text("first paragraph"))
                .with_child(ElementNode::new("p").with_text("second paragraph")),
        )
    }

    fn text_of_p(doc: &Document, i: usize) -> NodeId {
        let p = doc.children(doc.body().unwrap())[i];
        doc.children(p)[0]
    }

    #[test]
    fn test_single_node_anchor() {
        let doc = sample();
        let text = text_of_p(&doc, 0);
        let anchor = Anchor::from_range(&doc, text, 0, text, 5).unwrap();

        assert!(anchor.is_single_node());
        assert_eq!(
            anchor.resolve(&doc),
            Some(ResolvedAnchor::Single {
                node: text,
                start: 0,
                end: 5
            })
        );
    }

    #[test]
    fn test_cross_node_anchor() {
        let doc = sample();
        let (a, b) = (text_of_p(&doc, 0), text_of_p(&doc, 1));
        let anchor = Anchor::from_range(&doc, a, 6, b, 6).unwrap();

        assert!(!anchor.is_single_node());
        assert_eq!(
            anchor.resolve(&doc),
            Some(ResolvedAnchor::Boundaries {
                start_node: a,
                start_offset: 6,
                end_node: b,
                end_offset: 6
            })
        );
    }

    #[test]
    fn test_decorated_range_uses_original_coordinates() {
        let mut doc = sample();
        let mut engine = crate::decoration::DecorationEngine::new();
        let first = text_of_p(&doc, 0);
        let second = text_of_p(&doc, 1);
        let request = crate::decoration::HighlightRequest::new(6, Some(9));
        engine.highlight_node(&mut doc, first, &request).unwrap();
        engine.highlight_node(&mut doc, second, &request).unwrap();

        // "first " | "par" | "agraph"
        let p = doc.children(doc.body().unwrap())[0];
        let tail = doc.children(p)[2];
        assert_eq!(doc.text(tail), Some("agraph"));
        let live = Anchor::from_range(&doc, tail, 1, tail, 4).unwrap();
        assert_eq!(live.start.to_string(), "/html/body/P[1]/text()[2]");

        let anchor = Anchor::from_decorated_range(&doc, engine.registry(), tail, 1, tail, 4).unwrap();
        assert_eq!(anchor.start.to_string(), "/html/body/P[1]/text()[1]");
        assert!(anchor.is_single_node());
        assert_eq!((anchor.start_offset, anchor.end_offset), (10, 13));

        // The undecorated page reads the same text at those offsets
        let fresh = sample();
        let node = anchor.start.resolve(&fresh).unwrap();
        let text: Vec<u16> = fresh.text(node).unwrap().encode_utf16().collect();
        assert_eq!(String::from_utf16(&text[10..13]).unwrap(), "gra");

        // On the decorated page the anchor still finds the original node
        assert_eq!(
            anchor.resolve_in(&doc, engine.registry()),
            Some(ResolvedAnchor::Single {
                node: first,
                start: 10,
                end: 13
            })
        );
    }

    #[test]
    fn test_metadata_roundtrip() {
        let doc = sample();
        let (a, b) = (text_of_p(&doc, 0), text_of_p(&doc, 1));
        let anchor = Anchor::from_range(&doc, a, 1, b, 2).unwrap();

        let metadata = anchor.to_metadata();
        assert_eq!(metadata.start_tag_xpath, "/html/body/P[1]/text()[1]");
        assert_eq!(metadata.end_tag_xpath, "/html/body/P[2]/text()[1]");
        assert_eq!(Anchor::from_metadata(&metadata).unwrap(), anchor);
    }

    #[test]
    fn test_malformed_metadata() {
        let metadata = AnchorMetadata {
            start_tag_xpath: "body/p".to_string(),
            end_tag_xpath: "/html/body".to_string(),
            start_tag_offset: 0,
            end_tag_offset: 0,
        };
        assert!(matches!(Anchor::from_metadata(&metadata), Err(Error::InvalidLocator { .. })));
    }
}
