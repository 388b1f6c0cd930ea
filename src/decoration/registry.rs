use crate::dom::NodeId;
use crate::locator::TreeView;
use indexmap::IndexMap;
use std::collections::HashMap;

/// How a decoration was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    /// Inline wrapper around a text span
    TextSpan,
    /// Border on an image
    ImageBorder,
    /// Outline on any other element
    ElementOutline,
}

/// A rendered decoration and the metadata its tooltip shows
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub kind: DecorationKind,
    /// Wrapper element for text spans, the decorated element otherwise
    pub element: NodeId,
    /// Node the locator resolved to
    pub source: NodeId,
    /// Decorated span in source coordinates (text spans only)
    pub span: Option<(usize, usize)>,
    /// Inline style of `element` before decoration
    pub saved_style: Option<String>,
    pub tagged_by: Option<String>,
    pub message: Option<String>,
}

/// Piece of a split text node, in the coordinates of the original node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: usize,
    pub end: usize,
    /// Text node currently holding this piece
    pub node: NodeId,
    /// Wrapper element if the piece is decorated
    pub wrapper: Option<NodeId>,
}

/// Out-of-band record of everything decorated on a page.
///
/// Nothing is written to the page's own nodes to remember what was decorated;
/// lookups go through node identity instead.
#[derive(Debug, Default)]
pub struct DecorationRegistry {
    decorations: IndexMap<NodeId, Decoration>,
    fragments: HashMap<NodeId, Vec<Fragment>>,
    owners: HashMap<NodeId, NodeId>,
}

impl DecorationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, decoration: Decoration) {
        self.decorations.insert(decoration.element, decoration);
    }

    /// Decoration whose element is `element`
    pub fn get(&self, element: NodeId) -> Option<&Decoration> {
        self.decorations.get(&element)
    }

    pub fn contains(&self, element: NodeId) -> bool {
        self.decorations.contains_key(&element)
    }

    /// All decorations in the order they were applied
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.values()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Original text node a fragment node was split from, or the node itself
    pub fn source_of(&self, node: NodeId) -> NodeId {
        self.owners.get(&node).copied().unwrap_or(node)
    }

    /// Fragments of a split source, `None` if it was never split
    pub fn fragments(&self, source: NodeId) -> Option<&[Fragment]> {
        self.fragments.get(&source).map(Vec::as_slice)
    }

    /// Replace the fragment list of `source` and index each fragment node
    pub fn set_fragments(&mut self, source: NodeId, fragments: Vec<Fragment>) {
        for fragment in &fragments {
            self.owners.insert(fragment.node, source);
        }
        self.fragments.insert(source, fragments);
    }

    /// Translate an offset inside `node` into source coordinates
    pub fn source_position(&self, node: NodeId, offset: usize) -> (NodeId, usize) {
        let source = self.source_of(node);
        let base = self
            .fragments(source)
            .and_then(|frags| frags.iter().find(|f| f.node == node))
            .map_or(0, |f| f.start);
        (source, base + offset)
    }
}

/// Seen through the registry the page keeps its undecorated shape: text
/// wrappers are looked through and pieces split off an original text node
/// are left out, so the original node stands for its whole text again.
impl TreeView for DecorationRegistry {
    fn is_hidden(&self, node: NodeId) -> bool {
        self.source_of(node) != node
    }

    fn is_transparent(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|d| d.kind == DecorationKind::TextSpan)
    }
}
