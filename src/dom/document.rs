use crate::dom::element::{ElementNode, SnapshotNode};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Handle to a node in a [`Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        /// Lower-case tag name
        tag_name: String,
        attributes: IndexMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Mutable in-memory page, rooted at an `<html>` element.
///
/// Nodes are never freed: removing a node only detaches it, so a `NodeId`
/// stays valid for the lifetime of the document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create an empty `<html><head></head><body></body></html>` document
    pub fn new() -> Self {
        Self::from_snapshot(&ElementNode::new("html"))
    }

    /// Build a document from a snapshot tree.
    ///
    /// An `<html>` root is used as is (a missing `<body>` is added, preceded by a
    /// `<head>` if that is missing too); a `<body>` root
    /// is wrapped in `<html>`; any other root is wrapped in `<html><body>`.
    pub fn from_snapshot(root: &ElementNode) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };

        if root.is_tag("html") {
            doc.root = doc.build(root);
            if doc.body().is_none() {
                let has_head = doc.children(doc.root).iter().any(|&c| doc.is_tag(c, "head"));
                if !has_head {
                    let head = doc.create_element("head");
                    doc.link(doc.root, head);
                }
                let body = doc.create_element("body");
                doc.link(doc.root, body);
            }
        } else {
            let html = doc.create_element("html");
            doc.root = html;
            let head = doc.create_element("head");
            doc.link(html, head);
            if root.is_tag("body") {
                let body = doc.build(root);
                doc.link(html, body);
            } else {
                let body = doc.create_element("body");
                doc.link(html, body);
                let child = doc.build(root);
                doc.link(body, child);
            }
        }

        doc
    }

    fn build(&mut self, element: &ElementNode) -> NodeId {
        let id = self.push(NodeKind::Element {
            tag_name: element.tag_name.to_ascii_lowercase(),
            attributes: element.attributes.clone(),
        });
        for child in &element.children {
            let child_id = match child {
                SnapshotNode::Text { text } => self.create_text(text.clone()),
                SnapshotNode::Element(child) => self.build(child),
            };
            self.link(id, child_id);
        }
        id
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    /// Convert the document back into a snapshot tree
    pub fn to_snapshot(&self) -> ElementNode {
        match self.snapshot_node(self.root) {
            Some(SnapshotNode::Element(element)) => element,
            _ => ElementNode::new("html"),
        }
    }

    fn snapshot_node(&self, id: NodeId) -> Option<SnapshotNode> {
        let data = self.data(id)?;
        Some(match &data.kind {
            NodeKind::Text(text) => SnapshotNode::text(text.clone()),
            NodeKind::Element { tag_name, attributes } => {
                let children = data.children.iter().filter_map(|&c| self.snapshot_node(c)).collect();
                SnapshotNode::Element(
                    ElementNode::new(tag_name.clone())
                        .with_attributes(attributes.clone())
                        .with_children(children),
                )
            }
        })
    }

    /// The `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.root
    }

    /// The `<body>` element, if present
    pub fn body(&self) -> Option<NodeId> {
        self.children(self.root).iter().copied().find(|&c| self.is_tag(c, "body"))
    }

    /// Node payload
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.data(id).map(|d| &d.kind)
    }

    /// Parent node, `None` for the root and detached nodes
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).and_then(|d| d.parent)
    }

    /// Child nodes in order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map(|d| d.children.as_slice()).unwrap_or(&[])
    }

    /// Whether the node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { .. }))
    }

    /// Whether the node is a text node
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    /// Lower-case tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element { tag_name, .. }) => Some(tag_name.as_str()),
            _ => None,
        }
    }

    /// Check if the node is an element with the given tag
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// DOM `nodeName`: upper-case tag for elements, `#text` for text nodes
    pub fn node_name(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Element { tag_name, .. }) => tag_name.to_ascii_uppercase(),
            Some(NodeKind::Text(_)) => "#text".to_string(),
            None => String::new(),
        }
    }

    /// Data of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Length of a text node in UTF-16 code units (DOM offset space)
    pub fn text_len(&self, id: NodeId) -> Option<usize> {
        self.text(id).map(|t| t.encode_utf16().count())
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id).filter_map(|d| self.text(d)).collect()
    }

    /// Attribute value of an element
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element { attributes, .. }) => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Set an attribute on an element; ignored for text nodes
    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(NodeData {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            attributes.insert(name.into(), value.into());
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        match self.nodes.get_mut(id.0) {
            Some(NodeData {
                kind: NodeKind::Element { attributes, .. },
                ..
            }) => attributes.shift_remove(name),
            _ => None,
        }
    }

    /// Inline `style` attribute
    pub fn style(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "style")
    }

    /// Replace the whole inline style; `None` removes the attribute
    pub fn set_style(&mut self, id: NodeId, style: Option<&str>) {
        match style {
            Some(style) if !style.trim().is_empty() => self.set_attribute(id, "style", style),
            _ => {
                self.remove_attribute(id, "style");
            }
        }
    }

    /// Value of one inline style property
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        parse_style(self.style(id).unwrap_or_default()).get(name).cloned()
    }

    /// Set one inline style property, keeping the others
    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        let mut props = parse_style(self.style(id).unwrap_or_default());
        props.insert(name.to_string(), value.to_string());
        self.set_style(id, Some(&render_style(&props)));
    }

    /// Remove one inline style property
    pub fn remove_style_property(&mut self, id: NodeId, name: &str) {
        let mut props = parse_style(self.style(id).unwrap_or_default());
        if props.shift_remove(name).is_some() {
            let rendered = render_style(&props);
            self.set_style(id, Some(&rendered));
        }
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attributes: IndexMap::new(),
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.data(parent).is_none() || self.data(child).is_none() {
            return Err(Error::InvalidHierarchy("unknown node".to_string()));
        }
        if !self.is_element(parent) {
            return Err(Error::InvalidHierarchy("parent is not an element".to_string()));
        }
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(Error::InvalidHierarchy("node would become its own descendant".to_string()));
        }
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        self.remove(child);
        self.link(parent, child);
        Ok(())
    }

    /// Insert `child` before `reference` under `parent`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(Error::InvalidHierarchy("reference is not a child of parent".to_string()));
        }
        self.remove(child);
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(self.children(parent).len());
        self.nodes[parent.0].children.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Insert `child` directly after `reference`
    pub fn insert_after(&mut self, reference: NodeId, child: NodeId) -> Result<()> {
        let parent = self.parent(reference).ok_or(Error::DetachedNode)?;
        self.check_insert(parent, child)?;
        self.remove(child);
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .map(|p| p + 1)
            .unwrap_or(self.children(parent).len());
        self.nodes[parent.0].children.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Detach a node from its parent; no-op for detached nodes
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            self.nodes[parent.0].children.retain(|&c| c != id);
            self.nodes[id.0].parent = None;
        }
    }

    /// Put `replacement` where `old` is and detach `old`
    pub fn replace(&mut self, old: NodeId, replacement: NodeId) -> Result<()> {
        self.insert_after(old, replacement)?;
        self.remove(old);
        Ok(())
    }

    /// DOM `Text.splitText`: keep `[0, offset)` in `id` and move the rest into a
    /// new text node inserted right after it. Offsets are UTF-16 code units.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId> {
        let text = self.text(id).ok_or(Error::NotTextNode)?;
        let len = text.encode_utf16().count();
        let byte = utf16_to_byte(text, offset).ok_or(Error::InvalidOffsets {
            start: offset,
            end: None,
            len,
        })?;

        let tail = text[byte..].to_string();
        if let NodeKind::Text(text) = &mut self.nodes[id.0].kind {
            text.truncate(byte);
        }

        let new_node = self.create_text(tail);
        if self.parent(id).is_some() {
            self.insert_after(id, new_node)?;
        }
        Ok(new_node)
    }

    /// Whether the node is connected to the document element
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.data(id).is_some() && self.is_inclusive_ancestor(self.root, id)
    }

    /// Pre-order traversal starting at (and including) `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.data(id).is_some() { vec![id] } else { Vec::new() };
        Descendants { doc: self, stack }
    }

    /// Serialize the whole document as HTML
    pub fn to_html(&self) -> String {
        self.node_html(self.root)
    }

    /// Serialize one node (outer HTML)
    pub fn node_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => out.push_str(&escape_text(text)),
            Some(NodeKind::Element { tag_name, attributes }) => {
                out.push('<');
                out.push_str(tag_name);
                for (name, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag_name.as_str()) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str(&format!("</{}>", tag_name));
            }
            None => {}
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.doc.children(id).iter().rev());
        Some(id)
    }
}

/// Byte index of a UTF-16 offset, `None` if out of range or inside a surrogate pair
pub(crate) fn utf16_to_byte(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        if units == offset {
            return Some(byte);
        }
        units += ch.len_utf16();
        if units > offset {
            return None;
        }
    }
    (units == offset).then_some(text.len())
}

fn parse_style(style: &str) -> IndexMap<String, String> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_ascii_lowercase(), value.trim().to_string()))
        })
        .collect()
}

fn render_style(props: &IndexMap<String, String>) -> String {
    props
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
