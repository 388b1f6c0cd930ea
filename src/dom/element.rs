use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in a serialized page snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SnapshotNode {
    /// Text node
    Text { text: String },
    /// Element node
    Element(ElementNode),
}

/// Represents a DOM element in a page snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "p", "img")
    pub tag_name: String,

    /// Element attributes in document order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,

    /// Child nodes, text and elements interleaved as in the page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

/// Viewport rectangle (x, y, width, height) in CSS pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SnapshotNode {
    /// Create a text snapshot node
    pub fn text(text: impl Into<String>) -> Self {
        SnapshotNode::Text { text: text.into() }
    }
}

impl From<ElementNode> for SnapshotNode {
    fn from(element: ElementNode) -> Self {
        SnapshotNode::Element(element)
    }
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: add one attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.add_text(text);
        self
    }

    /// Builder method: append a child
    pub fn with_child(mut self, child: impl Into<SnapshotNode>) -> Self {
        self.add_child(child);
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<SnapshotNode>) -> Self {
        self.children = children;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child node
    pub fn add_child(&mut self, child: impl Into<SnapshotNode>) {
        self.children.push(child.into());
    }

    /// Add a text child
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.children.push(SnapshotNode::text(text));
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        if let Some(classes) = self.attributes.get("class") {
            classes.split_whitespace().any(|c| c == class_name)
        } else {
            false
        }
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SnapshotNode::Text { text } => out.push_str(text),
                SnapshotNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Remove script, style and noscript subtrees
    pub fn simplify(&mut self) {
        self.children.retain(|child| match child {
            SnapshotNode::Element(element) => {
                !matches!(element.tag_name.to_ascii_lowercase().as_str(), "script" | "style" | "noscript")
            }
            SnapshotNode::Text { .. } => true,
        });

        for child in &mut self.children {
            if let SnapshotNode::Element(element) = child {
                element.simplify();
            }
        }
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_creation() {
        let element = ElementNode::new("p")
            .with_attribute("id", "intro")
            .with_attribute("class", "lead note")
            .with_text("Hello ")
            .with_child(ElementNode::new("b").with_text("world"));

        assert_eq!(element.tag_name, "p");
        assert_eq!(element.id(), Some(&"intro".to_string()));
        assert!(element.has_class("lead"));
        assert!(element.has_class("note"));
        assert!(!element.has_class("hidden"));
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.text_content(), "Hello world");
    }

    #[test]
    fn test_simplify() {
        let mut parent = ElementNode::new("div")
            .with_child(ElementNode::new("p").with_text("Content"))
            .with_child(ElementNode::new("script").with_text("alert('test')"))
            .with_text("loose text")
            .with_child(ElementNode::new("STYLE").with_text(".test { color: red; }"))
            .with_child(ElementNode::new("span").with_text("More content"));

        parent.simplify();

        assert_eq!(parent.children.len(), 3);
        assert_eq!(parent.text_content(), "Contentloose textMore content");
    }

    #[test]
    fn test_serialization() {
        let element = ElementNode::new("div")
            .with_attribute("id", "x")
            .with_text("a")
            .with_child(ElementNode::new("img").with_attribute("src", "cat.png"));

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_untagged_text_node_json() {
        let json = r#"{"tag_name":"p","children":[{"text":"hi"},{"tag_name":"br"}]}"#;
        let element: ElementNode = serde_json::from_str(json).unwrap();

        assert_eq!(element.children[0], SnapshotNode::text("hi"));
        assert!(matches!(&element.children[1], SnapshotNode::Element(e) if e.is_tag("br")));
    }

    #[test]
    fn test_bounding_box() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);

        assert!(bbox.is_visible());
        assert_eq!(bbox.bottom(), 70.0);
        assert_eq!(bbox.right(), 110.0);

        let invisible_bbox = BoundingBox::new(0.0, 0.0, 0.0, 0.0);
        assert!(!invisible_bbox.is_visible());
    }
}
