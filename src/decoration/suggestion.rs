use crate::dom::{Document, NodeId};
use crate::locator;
use serde::{Deserialize, Serialize};

/// Class of the confidence badge
pub const BADGE_CLASS: &str = "page-tags-badge";

/// Outline color of classifier suggestions
pub const SUGGESTION_COLOR: &str = "#7c4dff";

/// Element proposed by the content classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Live element, when the classifier ran in this page
    #[serde(skip)]
    pub element: Option<NodeId>,
    pub text: String,
    /// Locator of the element, used when `element` is absent or stale
    pub xpath: String,
    /// Score in `[0, 1]`
    pub confidence: f64,
    pub label: String,
}

/// A rendered suggestion and what is needed to undo it
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub element: NodeId,
    pub saved_style: Option<String>,
    pub badge: Option<NodeId>,
    pub label: String,
    pub confidence: f64,
}

impl Candidate {
    /// Element to decorate: the live element if still attached, otherwise the
    /// resolved locator. Text nodes are promoted to their parent element.
    pub(crate) fn target(&self, doc: &Document) -> Option<NodeId> {
        let node = self
            .element
            .filter(|&e| doc.is_attached(e))
            .or_else(|| locator::resolve(doc, &self.xpath))?;
        if doc.is_text(node) { doc.parent(node) } else { Some(node) }
    }

    /// Badge caption, e.g. `quote 87%`
    pub fn caption(&self) -> String {
        format!("{} {}%", self.label, (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u32)
    }
}

impl Suggestion {
    /// Outline `element` and place a badge next to it
    pub(crate) fn render(doc: &mut Document, element: NodeId, candidate: &Candidate) -> Self {
        let saved_style = doc.style(element).map(str::to_string);
        doc.set_style_property(element, "outline", &format!("2px dashed {}", SUGGESTION_COLOR));
        doc.set_style_property(element, "outline-offset", "2px");

        let badge = doc.create_element("span");
        doc.set_attribute(badge, "class", BADGE_CLASS);
        doc.set_style(
            badge,
            Some(&format!(
                "margin-left: 4px; padding: 0 4px; border-radius: 3px; font-size: 11px; color: #fff; background-color: {};",
                SUGGESTION_COLOR
            )),
        );
        let caption = doc.create_text(candidate.caption());
        let placed = match doc.append_child(badge, caption) {
            Ok(()) => doc
                .insert_after(element, badge)
                .or_else(|_| doc.append_child(element, badge))
                .is_ok(),
            Err(_) => false,
        };

        Self {
            element,
            saved_style,
            badge: placed.then_some(badge),
            label: candidate.label.clone(),
            confidence: candidate.confidence,
        }
    }

    /// Restore the original inline style and drop the badge
    pub(crate) fn clear(&self, doc: &mut Document) {
        doc.set_style(self.element, self.saved_style.as_deref());
        if let Some(badge) = self.badge {
            doc.remove(badge);
        }
    }
}
