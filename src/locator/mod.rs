//! Locator codec
//!
//! Turns a node of a [`Document`] into an absolute path such as
//! `/html/body/DIV[2]/P[1]/text()[1]` and resolves such paths back to nodes.
//!
//! A [`Locator`] is kept as a structured list of steps and only rendered to a
//! path string at the persistence boundary. Sibling indices are 1-based and
//! counted over preceding siblings with the same `nodeName`, so element steps
//! are numbered per tag and text steps are numbered over text nodes only.
//!
//! An element with a non-empty `id` short-circuits the walk and becomes the
//! root of the locator (`//DIV[@id="main"]`). Ids are assumed unique; a page
//! that reuses an id resolves to the first match in document order.
//!
//! Encoding and resolution read the tree through a [`TreeView`]. The plain
//! functions use [`LiveTree`]; a view that hides the nodes its owner inserted
//! keeps paths stable while the page is being decorated.

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a locator starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocatorRoot {
    /// The document element (`/html`)
    Html,
    /// The body element (`/html/body`)
    Body,
    /// The first element with this tag and id (`//TAG[@id="..."]`)
    Id { tag: String, id: String },
}

/// One child step of a locator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// The `index`-th child element named `name` (upper-case nodeName)
    Element { name: String, index: usize },
    /// The `index`-th child text node
    Text { index: usize },
}

/// Absolute, serializable address of one node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator {
    pub root: LocatorRoot,
    pub steps: Vec<Step>,
}

impl Locator {
    /// Locator of the document element
    pub fn html() -> Self {
        Self {
            root: LocatorRoot::Html,
            steps: Vec::new(),
        }
    }

    /// Locator of the body element
    pub fn body() -> Self {
        Self {
            root: LocatorRoot::Body,
            steps: Vec::new(),
        }
    }

    /// Builder method: append a step
    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Whether the final step addresses a text node
    pub fn targets_text(&self) -> bool {
        matches!(self.steps.last(), Some(Step::Text { .. }))
    }

    /// Parse a path string
    pub fn parse(path: &str) -> Result<Self> {
        Parser::new(path).parse()
    }

    /// Resolve against a document; `None` when nothing matches
    pub fn resolve(&self, doc: &Document) -> Option<NodeId> {
        self.resolve_in(doc, &LiveTree)
    }

    /// Resolve against a document as seen through `view`
    pub fn resolve_in<V: TreeView + ?Sized>(&self, doc: &Document, view: &V) -> Option<NodeId> {
        let mut current = match &self.root {
            LocatorRoot::Html => doc.document_element(),
            LocatorRoot::Body => doc.body()?,
            LocatorRoot::Id { tag, id } => doc.descendants(doc.document_element()).find(|&n| {
                doc.attribute(n, "id") == Some(id.as_str()) && (tag == "*" || doc.is_tag(n, tag))
            })?,
        };

        for step in &self.steps {
            current = child_at(doc, view, current, step)?;
        }

        Some(current)
    }
}

/// How the codec sees the tree.
///
/// Hidden nodes are left out entirely. A transparent element is skipped over:
/// its children count as children of its parent.
pub trait TreeView {
    fn is_hidden(&self, _node: NodeId) -> bool {
        false
    }

    fn is_transparent(&self, _node: NodeId) -> bool {
        false
    }
}

/// The tree exactly as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveTree;

impl TreeView for LiveTree {}

fn visible_children<V: TreeView + ?Sized>(doc: &Document, view: &V, parent: NodeId, out: &mut Vec<NodeId>) {
    for &child in doc.children(parent) {
        if view.is_hidden(child) {
            continue;
        }
        if view.is_transparent(child) {
            visible_children(doc, view, child, out);
        } else {
            out.push(child);
        }
    }
}

fn visible_parent<V: TreeView + ?Sized>(doc: &Document, view: &V, node: NodeId) -> Option<NodeId> {
    let mut parent = doc.parent(node)?;
    while view.is_transparent(parent) {
        parent = doc.parent(parent)?;
    }
    Some(parent)
}

fn child_at<V: TreeView + ?Sized>(doc: &Document, view: &V, parent: NodeId, step: &Step) -> Option<NodeId> {
    let mut visible = Vec::new();
    visible_children(doc, view, parent, &mut visible);
    let children = visible.into_iter();
    match step {
        Step::Element { name, index } => children
            .filter(|&n| if name == "*" { doc.is_element(n) } else { doc.is_tag(n, name) })
            .nth(index.checked_sub(1)?),
        Step::Text { index } => children.filter(|&n| doc.is_text(n)).nth(index.checked_sub(1)?),
    }
}

/// Encode a node as a locator.
///
/// Fails only for nodes that are not attached to the document element.
pub fn locate(doc: &Document, node: NodeId) -> Result<Locator> {
    locate_in(doc, node, &LiveTree)
}

/// Encode a node as seen through `view`; hidden or transparent nodes have no locator
pub fn locate_in<V: TreeView + ?Sized>(doc: &Document, node: NodeId, view: &V) -> Result<Locator> {
    if !doc.is_attached(node) || view.is_hidden(node) || view.is_transparent(node) {
        return Err(Error::DetachedNode);
    }

    let mut steps = Vec::new();
    let mut current = node;
    let root = loop {
        if doc.body() == Some(current) {
            break LocatorRoot::Body;
        }
        if current == doc.document_element() {
            break LocatorRoot::Html;
        }
        if let Some(id) = doc.attribute(current, "id") {
            if !id.is_empty() && quote_for(id).is_some() {
                break LocatorRoot::Id {
                    tag: doc.node_name(current),
                    id: id.to_string(),
                };
            }
        }

        let parent = visible_parent(doc, view, current).ok_or(Error::DetachedNode)?;
        let mut siblings = Vec::new();
        visible_children(doc, view, parent, &mut siblings);

        let name = doc.node_name(current);
        let index = 1 + siblings
            .iter()
            .take_while(|&&s| s != current)
            .filter(|&&s| doc.node_name(s) == name)
            .count();
        steps.push(if doc.is_text(current) {
            Step::Text { index }
        } else {
            Step::Element { name, index }
        });

        current = parent;
    };

    steps.reverse();
    Ok(Locator { root, steps })
}

/// Resolve a path string. Never fails: parse errors and misses yield `None`.
pub fn resolve(doc: &Document, path: &str) -> Option<NodeId> {
    match Locator::parse(path) {
        Ok(locator) => {
            let found = locator.resolve(doc);
            if found.is_none() {
                log::debug!("Locator '{}' matched no node", path);
            }
            found
        }
        Err(e) => {
            log::debug!("{}", e);
            None
        }
    }
}

/// Quote character usable for an id literal; `None` if the id holds both kinds
fn quote_for(id: &str) -> Option<char> {
    match (id.contains('"'), id.contains('\'')) {
        (false, _) => Some('"'),
        (true, false) => Some('\''),
        (true, true) => None,
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            LocatorRoot::Html => f.write_str("/html")?,
            LocatorRoot::Body => f.write_str("/html/body")?,
            LocatorRoot::Id { tag, id } => {
                let quote = quote_for(id).unwrap_or('"');
                write!(f, "//{}[@id={}{}{}]", tag, quote, id, quote)?;
            }
        }
        for step in &self.steps {
            match step {
                Step::Element { name, index } => write!(f, "/{}[{}]", name, index)?,
                Step::Text { index } => write!(f, "/text()[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Locator::parse(s)
    }
}

impl TryFrom<String> for Locator {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Locator::parse(&value)
    }
}

impl From<Locator> for String {
    fn from(locator: Locator) -> Self {
        locator.to_string()
    }
}

/// Recursive-descent parser for the path subset produced by [`locate`].
///
/// Step separators may be `/` or the legacy `//`; both select children.
struct Parser<'a> {
    path: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(path: &'a str) -> Self {
        Self {
            path,
            rest: path.trim(),
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::InvalidLocator {
            path: self.path.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(mut self) -> Result<Locator> {
        let root = if let Some(rest) = self.rest.strip_prefix("//") {
            self.rest = rest;
            self.parse_id_root()?
        } else if self.eat_keyword("/html") {
            if self.eat_keyword("/body") {
                LocatorRoot::Body
            } else {
                LocatorRoot::Html
            }
        } else {
            return Err(self.error("path must start with /html or //TAG[@id=...]"));
        };

        let mut steps = Vec::new();
        while !self.rest.is_empty() {
            self.rest = self
                .rest
                .strip_prefix("//")
                .or_else(|| self.rest.strip_prefix('/'))
                .ok_or_else(|| self.error(format!("expected '/' before '{}'", self.rest)))?;
            steps.push(self.parse_step()?);
        }

        Ok(Locator { root, steps })
    }

    /// Consume `keyword` if it is followed by a separator or the end of input
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.len();
        if self.rest.len() >= len && self.rest[..len].eq_ignore_ascii_case(keyword) {
            let after = &self.rest[len..];
            if after.is_empty() || after.starts_with('/') {
                self.rest = after;
                return true;
            }
        }
        false
    }

    fn parse_name(&mut self) -> Result<&'a str> {
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':' || c == '*'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(self.error("expected a node name"));
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name)
    }

    fn parse_id_root(&mut self) -> Result<LocatorRoot> {
        let tag = self.parse_name()?.to_ascii_uppercase();
        self.rest = self
            .rest
            .strip_prefix("[@id=")
            .ok_or_else(|| self.error("expected [@id=...] after id root"))?;

        let quote = self
            .rest
            .chars()
            .next()
            .filter(|&c| c == '"' || c == '\'')
            .ok_or_else(|| self.error("expected quoted id"))?;
        let body = &self.rest[1..];
        let close = body.find(quote).ok_or_else(|| self.error("unterminated id literal"))?;
        let id = body[..close].to_string();
        self.rest = body[close + 1..]
            .strip_prefix(']')
            .ok_or_else(|| self.error("expected ']' after id literal"))?;

        if id.is_empty() {
            return Err(self.error("empty id"));
        }
        Ok(LocatorRoot::Id { tag, id })
    }

    fn parse_step(&mut self) -> Result<Step> {
        let is_text = self.rest.starts_with("text()");
        if is_text {
            self.rest = &self.rest["text()".len()..];
        }
        let name = if is_text { None } else { Some(self.parse_name()?) };

        let index = if let Some(rest) = self.rest.strip_prefix('[') {
            let close = rest.find(']').ok_or_else(|| self.error("unterminated index"))?;
            let index: usize = rest[..close]
                .trim()
                .parse()
                .map_err(|_| self.error(format!("invalid index '{}'", &rest[..close])))?;
            if index == 0 {
                return Err(self.error("indices are 1-based"));
            }
            self.rest = &rest[close + 1..];
            index
        } else {
            1
        };

        Ok(match name {
            None => Step::Text { index },
            Some(name) => Step::Element {
                name: name.to_ascii_uppercase(),
                index,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;

    fn sample() -> Document {
        Document::from_snapshot(
            &ElementNode::new("body")
                .with_text("lead ")
                .with_child(ElementNode::new("div").with_text("first div"))
                .with_child(ElementNode::new("p").with_text("para"))
                .with_text(" middle ")
                .with_child(
                    ElementNode::new("div")
                        .with_child(ElementNode::new("span").with_text("a"))
                        .with_child(ElementNode::new("span").with_text("b")),
                )
                .with_child(
                    ElementNode::new("section")
                        .with_attribute("id", "main")
                        .with_child(ElementNode::new("p").with_text("inside")),
                ),
        )
    }

    fn body_child(doc: &Document, i: usize) -> NodeId {
        doc.children(doc.body().unwrap())[i]
    }

    #[test]
    fn test_base_cases() {
        let doc = sample();
        assert_eq!(locate(&doc, doc.body().unwrap()).unwrap().to_string(), "/html/body");
        assert_eq!(locate(&doc, doc.document_element()).unwrap().to_string(), "/html");
    }

    #[test]
    fn test_sibling_index_is_per_node_name() {
        let doc = sample();
        // body: #text, DIV, P, #text, DIV, SECTION
        assert_eq!(locate(&doc, body_child(&doc, 0)).unwrap().to_string(), "/html/body/text()[1]");
        assert_eq!(locate(&doc, body_child(&doc, 2)).unwrap().to_string(), "/html/body/P[1]");
        assert_eq!(locate(&doc, body_child(&doc, 3)).unwrap().to_string(), "/html/body/text()[2]");
        assert_eq!(locate(&doc, body_child(&doc, 4)).unwrap().to_string(), "/html/body/DIV[2]");

        let second_span = doc.children(body_child(&doc, 4))[1];
        let text = doc.children(second_span)[0];
        assert_eq!(
            locate(&doc, text).unwrap().to_string(),
            "/html/body/DIV[2]/SPAN[2]/text()[1]"
        );
    }

    #[test]
    fn test_id_short_circuit() {
        let doc = sample();
        let section = body_child(&doc, 5);
        assert_eq!(locate(&doc, section).unwrap().to_string(), "//SECTION[@id=\"main\"]");

        let inner = doc.children(doc.children(section)[0])[0];
        assert_eq!(
            locate(&doc, inner).unwrap().to_string(),
            "//SECTION[@id=\"main\"]/P[1]/text()[1]"
        );
    }

    #[test]
    fn test_head_elements_use_html_root() {
        let doc = sample();
        let head = doc.children(doc.document_element())[0];
        assert_eq!(locate(&doc, head).unwrap().to_string(), "/html/HEAD[1]");
    }

    #[test]
    fn test_roundtrip_every_node() {
        let doc = sample();
        for node in doc.descendants(doc.document_element()) {
            let path = locate(&doc, node).unwrap().to_string();
            assert_eq!(resolve(&doc, &path), Some(node), "path {}", path);
        }
    }

    #[test]
    fn test_id_with_double_quote_is_written_with_single_quotes() {
        let mut doc = sample();
        let div = body_child(&doc, 1);
        doc.set_attribute(div, "id", "say \"hi\"");

        let path = locate(&doc, div).unwrap().to_string();
        assert_eq!(path, "//DIV[@id='say \"hi\"']");
        assert_eq!(resolve(&doc, &path), Some(div));
    }

    #[test]
    fn test_id_with_both_quotes_falls_back_to_positional_path() {
        let mut doc = sample();
        let div = body_child(&doc, 1);
        doc.set_attribute(div, "id", "it's \"odd\"");

        let path = locate(&doc, div).unwrap().to_string();
        assert_eq!(path, "/html/body/DIV[1]");
        assert_eq!(resolve(&doc, &path), Some(div));
    }

    #[test]
    fn test_empty_id_is_ignored() {
        let mut doc = sample();
        let p = body_child(&doc, 2);
        doc.set_attribute(p, "id", "");
        assert_eq!(locate(&doc, p).unwrap().to_string(), "/html/body/P[1]");
    }

    #[test]
    fn test_detached_node() {
        let mut doc = sample();
        let p = body_child(&doc, 2);
        doc.remove(p);
        assert!(matches!(locate(&doc, p), Err(Error::DetachedNode)));
    }

    #[test]
    fn test_resolve_removed_target_returns_none() {
        let mut doc = sample();
        let p = body_child(&doc, 2);
        let path = locate(&doc, p).unwrap().to_string();
        doc.remove(p);
        assert_eq!(resolve(&doc, &path), None);
    }

    #[test]
    fn test_resolve_malformed_paths() {
        let doc = sample();
        for path in [
            "",
            "html/body",
            "/html/body/DIV[0]",
            "/html/body/DIV[x]",
            "/html/body/DIV[1",
            "//DIV[@id=unquoted]",
            "//DIV[@id=\"open]",
            "/html/body/P[1]extra",
            "/html/body/DIV[99]",
            "//DIV[@id=\"missing\"]",
        ] {
            assert_eq!(resolve(&doc, path), None, "path {:?}", path);
        }
    }

    #[test]
    fn test_resolve_legacy_forms() {
        let doc = sample();
        let second_div = body_child(&doc, 4);
        assert_eq!(resolve(&doc, "/html/body//DIV[2]"), Some(second_div));
        assert_eq!(resolve(&doc, "/HTML/BODY/div[2]"), Some(second_div));
        assert_eq!(resolve(&doc, "//*[@id=\"main\"]"), Some(body_child(&doc, 5)));
        assert_eq!(resolve(&doc, "/html/body/p"), Some(body_child(&doc, 2)));
    }

    /// Hides one text node and looks through one wrapper element
    struct Overlaid {
        hidden: NodeId,
        wrapper: NodeId,
    }

    impl TreeView for Overlaid {
        fn is_hidden(&self, node: NodeId) -> bool {
            node == self.hidden
        }

        fn is_transparent(&self, node: NodeId) -> bool {
            node == self.wrapper
        }
    }

    #[test]
    fn test_view_skips_inserted_nodes() {
        let mut doc = sample();
        let body = doc.body().unwrap();
        let lead = body_child(&doc, 0);
        let middle = body_child(&doc, 3);
        let p = body_child(&doc, 2);
        let before = locate(&doc, middle).unwrap();

        // Wrap the lead text in a span and put a stray text node after the middle one
        let wrapper = doc.create_element("span");
        doc.replace(lead, wrapper).unwrap();
        doc.append_child(wrapper, lead).unwrap();
        let stray = doc.create_text("x");
        doc.insert_after(middle, stray).unwrap();
        let view = Overlaid { hidden: stray, wrapper };

        assert_eq!(locate(&doc, middle).unwrap().to_string(), "/html/body/text()[1]");
        assert_eq!(locate_in(&doc, middle, &view).unwrap(), before);
        assert_eq!(locate_in(&doc, lead, &view).unwrap().to_string(), "/html/body/text()[1]");
        assert_eq!(locate_in(&doc, p, &view).unwrap().to_string(), "/html/body/P[1]");
        assert_eq!(before.resolve_in(&doc, &view), Some(middle));
        assert_eq!(before.resolve(&doc), Some(stray));
        assert!(matches!(locate_in(&doc, stray, &view), Err(Error::DetachedNode)));
        assert_eq!(doc.parent(wrapper), Some(body));
    }

    #[test]
    fn test_locator_serde_as_string() {
        let locator = Locator::body()
            .with_step(Step::Element {
                name: "P".to_string(),
                index: 1,
            })
            .with_step(Step::Text { index: 1 });
        assert!(locator.targets_text());

        let json = serde_json::to_string(&locator).unwrap();
        assert_eq!(json, "\"/html/body/P[1]/text()[1]\"");
        let back: Locator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, locator);

        assert!(serde_json::from_str::<Locator>("\"nope\"").is_err());
    }
}
