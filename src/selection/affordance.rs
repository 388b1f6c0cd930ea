use crate::dom::{BoundingBox, Document, NodeId};
use crate::error::Result;

/// Class of the pick icon shown next to a selection
pub const ICON_CLASS: &str = "page-tags-icon";

/// Class of the tag input box
pub const INPUT_CLASS: &str = "page-tags-input";

pub const INPUT_PLACEHOLDER: &str = "@friend message";

/// Gap between the selection rectangle and the affordance
const OFFSET: f64 = 4.0;

fn fixed_at(rect: BoundingBox) -> String {
    format!(
        "position: fixed; left: {}px; top: {}px; z-index: 2147483647;",
        rect.right() + OFFSET,
        rect.bottom() + OFFSET
    )
}

fn attach(doc: &mut Document, node: NodeId) -> Result<()> {
    let parent = doc.body().unwrap_or(doc.document_element());
    doc.append_child(parent, node)
}

/// Pick icon below the right edge of the selection
pub(crate) fn show_icon(doc: &mut Document, rect: BoundingBox) -> Result<NodeId> {
    let icon = doc.create_element("div");
    doc.set_attribute(icon, "class", ICON_CLASS);
    doc.set_attribute(icon, "role", "button");
    doc.set_attribute(icon, "title", "Tag this");
    doc.set_style(
        icon,
        Some(&format!("{} width: 24px; height: 24px; cursor: pointer;", fixed_at(rect))),
    );
    attach(doc, icon)?;
    Ok(icon)
}

/// Text input at the same place the icon was
pub(crate) fn show_input(doc: &mut Document, rect: BoundingBox) -> Result<NodeId> {
    let input = doc.create_element("input");
    doc.set_attribute(input, "class", INPUT_CLASS);
    doc.set_attribute(input, "type", "text");
    doc.set_attribute(input, "placeholder", INPUT_PLACEHOLDER);
    doc.set_style(input, Some(&format!("{} min-width: 220px;", fixed_at(rect))));
    attach(doc, input)?;
    Ok(input)
}

/// Whether `node` is `affordance` or inside it
pub(crate) fn contains(doc: &Document, affordance: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == affordance {
            return true;
        }
        current = doc.parent(id);
    }
    false
}
