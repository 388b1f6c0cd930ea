use crate::dom::{Document, NodeId};
use crate::error::Result;
use std::time::{Duration, Instant};

/// Class of the tooltip element
pub const TOOLTIP_CLASS: &str = "page-tags-tooltip";

/// Duration of the fade-in transition
pub const FADE_IN: Duration = Duration::from_millis(150);

/// Delay between pointer-leave and removal of the tooltip
pub const FADE_OUT_DELAY: Duration = Duration::from_millis(300);

/// Distance between pointer and tooltip corner, in CSS pixels
const POINTER_GAP: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipPhase {
    FadingIn { visible_at: Instant },
    Visible,
    FadingOut { remove_at: Instant },
}

/// A tooltip element attached to `<body>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tooltip {
    pub node: NodeId,
    pub phase: TooltipPhase,
}

impl Tooltip {
    /// Build the tooltip element and append it to `<body>`
    pub(crate) fn show(
        doc: &mut Document,
        tagged_by: &str,
        message: Option<&str>,
        x: f64,
        y: f64,
        now: Instant,
    ) -> Result<Self> {
        let node = doc.create_element("div");
        doc.set_attribute(node, "class", TOOLTIP_CLASS);
        doc.set_style(
            node,
            Some(&format!(
                "position: fixed; left: {}px; top: {}px; z-index: 2147483647; pointer-events: none; opacity: 0; transition: opacity {}ms;",
                x + POINTER_GAP,
                y + POINTER_GAP,
                FADE_IN.as_millis()
            )),
        );

        let who = doc.create_element("strong");
        let who_text = doc.create_text(tagged_by);
        doc.append_child(who, who_text)?;
        doc.append_child(node, who)?;

        if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
            let line = doc.create_element("div");
            let text = doc.create_text(message);
            doc.append_child(line, text)?;
            doc.append_child(node, line)?;
        }

        let parent = doc.body().unwrap_or(doc.document_element());
        doc.append_child(parent, node)?;

        Ok(Self {
            node,
            phase: TooltipPhase::FadingIn {
                visible_at: now + FADE_IN,
            },
        })
    }

    /// Pointer came back before removal: show again without rebuilding
    pub(crate) fn reenter(&mut self, doc: &mut Document) {
        if let TooltipPhase::FadingOut { .. } = self.phase {
            doc.set_style_property(self.node, "opacity", "1");
            self.phase = TooltipPhase::Visible;
        }
    }

    /// Start the delayed fade-out
    pub(crate) fn leave(&mut self, doc: &mut Document, now: Instant) {
        doc.set_style_property(self.node, "opacity", "0");
        self.phase = TooltipPhase::FadingOut {
            remove_at: now + FADE_OUT_DELAY,
        };
    }

    /// Advance the animation; returns `false` once the tooltip was removed
    pub(crate) fn tick(&mut self, doc: &mut Document, now: Instant) -> bool {
        match self.phase {
            TooltipPhase::FadingIn { visible_at } if visible_at <= now => {
                doc.set_style_property(self.node, "opacity", "1");
                self.phase = TooltipPhase::Visible;
                true
            }
            TooltipPhase::FadingOut { remove_at } if remove_at <= now => {
                doc.remove(self.node);
                false
            }
            _ => true,
        }
    }
}
