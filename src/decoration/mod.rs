//! Decoration engine
//!
//! Renders highlights at resolved locations without touching anything outside
//! the matched span:
//! - text nodes are split and the matched piece is wrapped in a `<span>`
//! - images get a border, other elements an outline (no reflow)
//! - decorations with a tagger show a hover tooltip
//! - classifier suggestions get a dashed outline and a confidence badge and
//!   can be cleared again
//!
//! What has been decorated is tracked in a [`DecorationRegistry`] keyed by
//! node identity. Offsets passed for an original text node stay in its
//! unsplit coordinates even after it has been split, so re-applying a
//! highlight to an already decorated span is detected and refused, and a
//! disjoint span of the same node is placed into the right fragment. Offsets
//! passed for a piece split off by an earlier decoration are relative to that
//! piece.

pub mod registry;
pub mod suggestion;
pub mod tooltip;

pub use registry::{Decoration, DecorationKind, DecorationRegistry, Fragment};
pub use suggestion::{BADGE_CLASS, Candidate, SUGGESTION_COLOR, Suggestion};
pub use tooltip::{FADE_IN, FADE_OUT_DELAY, TOOLTIP_CLASS, Tooltip, TooltipPhase};

use crate::anchor::ResolvedAnchor;
use crate::config::DEFAULT_TAG_COLOR;
use crate::dom::document::utf16_to_byte;
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::locator::Locator;
use indexmap::IndexMap;
use std::time::Instant;

/// Class of the inline wrapper around highlighted text
pub const HIGHLIGHT_CLASS: &str = "page-tags-highlight";

/// Color and tooltip metadata of a highlight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMeta {
    pub color: Option<String>,
    pub tagged_by: Option<String>,
    pub message: Option<String>,
}

impl TagMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn tagged_by(mut self, tagged_by: impl Into<String>) -> Self {
        self.tagged_by = Some(tagged_by.into());
        self
    }

    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR)
    }
}

/// Span and metadata of one highlight
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightRequest {
    pub start: usize,
    /// End of the span; `None` means the end of the node
    pub end: Option<usize>,
    pub meta: TagMeta,
}

impl HighlightRequest {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self {
            start,
            end,
            meta: TagMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: TagMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Result of a highlight that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightOutcome {
    /// New decoration; wrapper element for text, the element itself otherwise
    Applied(NodeId),
    /// The locator matched nothing; nothing was changed
    Unresolved,
    /// The target is already decorated by this element; nothing was changed
    Duplicate(NodeId),
    /// The span is empty; nothing was changed
    Empty,
}

impl HighlightOutcome {
    /// Decorated element for `Applied`
    pub fn applied(&self) -> Option<NodeId> {
        match self {
            HighlightOutcome::Applied(node) => Some(*node),
            _ => None,
        }
    }
}

/// Renders and tracks decorations for one page
#[derive(Debug, Default)]
pub struct DecorationEngine {
    registry: DecorationRegistry,
    tooltips: IndexMap<NodeId, Tooltip>,
    suggestions: IndexMap<NodeId, Suggestion>,
}

impl DecorationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &DecorationRegistry {
        &self.registry
    }

    /// Resolve `locator` and highlight `[start, end)` of it.
    ///
    /// The locator is read against the undecorated shape of the page first,
    /// so paths recorded before any decoration keep addressing the same text.
    /// A path that only exists in the decorated page addresses the live node.
    /// An unresolved locator is not an error and leaves the page untouched.
    pub fn apply_highlight(
        &mut self,
        doc: &mut Document,
        locator: &str,
        start: usize,
        end: Option<usize>,
        meta: TagMeta,
    ) -> Result<HighlightOutcome> {
        let parsed = match Locator::parse(locator) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("{}", e);
                return Ok(HighlightOutcome::Unresolved);
            }
        };
        let found = parsed.resolve_in(doc, &self.registry).or_else(|| parsed.resolve(doc));
        match found {
            Some(node) => self.highlight_node(doc, node, &HighlightRequest::new(start, end).with_meta(meta)),
            None => {
                log::debug!("Locator '{}' matched no node", locator);
                Ok(HighlightOutcome::Unresolved)
            }
        }
    }

    /// Highlight an already resolved node
    pub fn highlight_node(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        request: &HighlightRequest,
    ) -> Result<HighlightOutcome> {
        if !doc.is_attached(node) {
            return Ok(HighlightOutcome::Unresolved);
        }
        if doc.is_text(node) {
            self.highlight_text(doc, node, request)
        } else {
            Ok(self.highlight_element(doc, node, &request.meta))
        }
    }

    /// Render an anchor: one span for a single-node anchor, otherwise one
    /// boundary span at each end. Nodes between the boundaries are left alone.
    pub fn render_anchor(
        &mut self,
        doc: &mut Document,
        anchor: ResolvedAnchor,
        meta: &TagMeta,
    ) -> Vec<Result<HighlightOutcome>> {
        match anchor {
            ResolvedAnchor::Single { node, start, end } => {
                let request = HighlightRequest::new(start, Some(end)).with_meta(meta.clone());
                vec![self.highlight_node(doc, node, &request)]
            }
            ResolvedAnchor::Boundaries {
                start_node,
                start_offset,
                end_node,
                end_offset,
            } => {
                let head = HighlightRequest::new(start_offset, None).with_meta(meta.clone());
                let tail = HighlightRequest::new(0, Some(end_offset)).with_meta(meta.clone());
                vec![
                    self.highlight_node(doc, start_node, &head),
                    self.highlight_node(doc, end_node, &tail),
                ]
            }
        }
    }

    fn highlight_element(&mut self, doc: &mut Document, element: NodeId, meta: &TagMeta) -> HighlightOutcome {
        if self.registry.contains(element) {
            return HighlightOutcome::Duplicate(element);
        }

        let saved_style = doc.style(element).map(str::to_string);
        let (kind, property) = if doc.is_tag(element, "img") {
            (DecorationKind::ImageBorder, "border")
        } else {
            (DecorationKind::ElementOutline, "outline")
        };
        doc.set_style_property(element, property, &format!("3px solid {}", meta.color_or_default()));

        self.registry.insert(Decoration {
            kind,
            element,
            source: element,
            span: None,
            saved_style,
            tagged_by: meta.tagged_by.clone(),
            message: meta.message.clone(),
        });
        HighlightOutcome::Applied(element)
    }

    fn highlight_text(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        request: &HighlightRequest,
    ) -> Result<HighlightOutcome> {
        let source = self.registry.source_of(node);
        let mut fragments = match self.registry.fragments(source) {
            Some(fragments) => fragments.to_vec(),
            None => vec![Fragment {
                start: 0,
                end: doc.text_len(source).ok_or(Error::NotTextNode)?,
                node: source,
                wrapper: None,
            }],
        };

        let total = fragments.last().map_or(0, |f| f.end);

        // A piece split off an earlier decoration takes offsets relative to itself
        let (base, node_end) = match fragments.iter().find(|f| f.node == node) {
            Some(piece) if node != source => (piece.start, piece.end),
            _ => (0, total),
        };
        let start = base + request.start;
        let end = request.end.map_or(node_end, |end| base + end);
        let invalid = || Error::InvalidOffsets {
            start: request.start,
            end: request.end,
            len: node_end - base,
        };
        if start > end || end > node_end {
            return Err(invalid());
        }
        if start == end {
            return Ok(HighlightOutcome::Empty);
        }

        let overlapping = fragments
            .iter()
            .filter(|f| f.start < end && start < f.end)
            .find_map(|f| f.wrapper);
        if let Some(wrapper) = overlapping {
            return Ok(HighlightOutcome::Duplicate(wrapper));
        }

        let index = fragments
            .iter()
            .position(|f| f.wrapper.is_none() && f.start <= start && end <= f.end)
            .ok_or_else(invalid)?;
        let fragment = fragments[index];

        // The page may have edited the node since it was split
        let node_len = doc.text_len(fragment.node).ok_or(Error::NotTextNode)?;
        if node_len != fragment.end - fragment.start {
            return Err(invalid());
        }

        let local_start = start - fragment.start;
        let local_len = end - start;
        let text = doc.text(fragment.node).ok_or(Error::NotTextNode)?;
        if utf16_to_byte(text, local_start).is_none() || utf16_to_byte(text, local_start + local_len).is_none() {
            return Err(invalid());
        }
        let mid = if local_start > 0 {
            doc.split_text(fragment.node, local_start)?
        } else {
            fragment.node
        };
        let tail = if local_start + local_len < node_len {
            Some(doc.split_text(mid, local_len)?)
        } else {
            None
        };

        let wrapper = doc.create_element("span");
        doc.set_attribute(wrapper, "class", HIGHLIGHT_CLASS);
        doc.set_style(
            wrapper,
            Some(&format!("background-color: {};", request.meta.color_or_default())),
        );
        doc.replace(mid, wrapper)?;
        doc.append_child(wrapper, mid)?;

        let mut pieces = Vec::with_capacity(3);
        if local_start > 0 {
            pieces.push(Fragment {
                start: fragment.start,
                end: start,
                node: fragment.node,
                wrapper: None,
            });
        }
        pieces.push(Fragment {
            start,
            end,
            node: mid,
            wrapper: Some(wrapper),
        });
        if let Some(tail) = tail {
            pieces.push(Fragment {
                start: end,
                end: fragment.end,
                node: tail,
                wrapper: None,
            });
        }
        fragments.splice(index..=index, pieces);
        self.registry.set_fragments(source, fragments);

        self.registry.insert(Decoration {
            kind: DecorationKind::TextSpan,
            element: wrapper,
            source,
            span: Some((start, end)),
            saved_style: None,
            tagged_by: request.meta.tagged_by.clone(),
            message: request.meta.message.clone(),
        });
        Ok(HighlightOutcome::Applied(wrapper))
    }

    /// Nearest decorated ancestor-or-self of `target` that has a tagger
    fn tagged_ancestor(&self, doc: &Document, target: NodeId) -> Option<NodeId> {
        let mut current = Some(target);
        while let Some(node) = current {
            if self.registry.get(node).is_some_and(|d| d.tagged_by.is_some()) {
                return Some(node);
            }
            current = doc.parent(node);
        }
        None
    }

    /// Pointer entered `target`: show (or keep) the tooltip of its decoration.
    ///
    /// Returns the tooltip element, or `None` if `target` is not inside a
    /// tagged decoration.
    pub fn pointer_enter(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        x: f64,
        y: f64,
        now: Instant,
    ) -> Result<Option<NodeId>> {
        let Some(element) = self.tagged_ancestor(doc, target) else {
            return Ok(None);
        };

        if let Some(tooltip) = self.tooltips.get_mut(&element) {
            tooltip.reenter(doc);
            return Ok(Some(tooltip.node));
        }

        let (tagged_by, message) = match self.registry.get(element) {
            Some(Decoration {
                tagged_by: Some(tagged_by),
                message,
                ..
            }) => (tagged_by.clone(), message.clone()),
            _ => return Ok(None),
        };
        let tooltip = Tooltip::show(doc, &tagged_by, message.as_deref(), x, y, now)?;
        self.tooltips.insert(element, tooltip);
        Ok(Some(tooltip.node))
    }

    /// Pointer left `target`: fade the tooltip out and remove it after a delay
    pub fn pointer_leave(&mut self, doc: &mut Document, target: NodeId, now: Instant) {
        if let Some(element) = self.tagged_ancestor(doc, target) {
            if let Some(tooltip) = self.tooltips.get_mut(&element) {
                tooltip.leave(doc, now);
            }
        }
    }

    /// Advance tooltip animations and remove expired tooltips
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        self.tooltips.retain(|_, tooltip| tooltip.tick(doc, now));
    }

    /// Tooltip currently shown for a decorated element
    pub fn tooltip(&self, element: NodeId) -> Option<&Tooltip> {
        self.tooltips.get(&element)
    }

    /// Render classifier candidates with at least `min_confidence`, best first.
    ///
    /// Elements that already carry a suggestion are skipped. Returns the number
    /// of suggestions rendered.
    pub fn highlight_suggestions(&mut self, doc: &mut Document, candidates: &[Candidate], min_confidence: f64) -> usize {
        let mut ranked: Vec<&Candidate> = candidates.iter().filter(|c| c.confidence >= min_confidence).collect();
        ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut rendered = 0;
        for candidate in ranked {
            let Some(element) = candidate.target(doc) else {
                log::debug!("Suggestion '{}' did not resolve", candidate.xpath);
                continue;
            };
            if self.suggestions.contains_key(&element) || !doc.is_element(element) {
                continue;
            }
            let suggestion = Suggestion::render(doc, element, candidate);
            self.suggestions.insert(element, suggestion);
            rendered += 1;
        }
        rendered
    }

    /// Suggestions currently rendered, best first
    pub fn suggestions(&self) -> impl Iterator<Item = &Suggestion> {
        self.suggestions.values()
    }

    /// Remove every suggestion and restore the original styles
    pub fn clear_suggestions(&mut self, doc: &mut Document) -> usize {
        let count = self.suggestions.len();
        for (_, suggestion) in self.suggestions.drain(..).rev() {
            suggestion.clear(doc);
        }
        count
    }
}
