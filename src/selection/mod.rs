//! Selection controller
//!
//! Turns a user selection into a saved tag:
//!
//! ```text
//! Idle --pointer_up--> PendingConfirm --affordance_click--> AwaitingInput --Enter--> submit
//!   ^                        |                                   |
//!   +------ Escape / scroll past 150px / success -----------------+
//! ```
//!
//! The controller owns the floating affordances it injects (pick icon, input
//! box). Both are positioned in viewport coordinates, so they are dropped as
//! soon as the page scrolls too far from where the selection was captured.

pub mod affordance;

pub use affordance::{ICON_CLASS, INPUT_CLASS, INPUT_PLACEHOLDER};

use crate::anchor::Anchor;
use crate::context::{NotificationLevel, PageContext};
use crate::decoration::{DecorationEngine, HighlightOutcome, TagMeta};
use crate::dom::{BoundingBox, Document, NodeId};
use crate::error::Result;
use crate::store::{AnchorStore, SaveRequest};

/// Scroll distance on either axis that invalidates a pending selection
pub const SCROLL_THRESHOLD: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Pick icon shown next to the selection
    PendingConfirm,
    /// Input box shown
    AwaitingInput,
}

/// Keys the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// Page scroll offsets in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether `other` is more than `threshold` away on either axis
    pub fn moved_beyond(&self, other: ScrollPosition, threshold: f64) -> bool {
        (self.x - other.x).abs() > threshold || (self.y - other.y).abs() > threshold
    }
}

/// A live selection range (DOM `Range` shape) and its viewport rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRange {
    pub start_container: NodeId,
    pub start_offset: usize,
    pub end_container: NodeId,
    pub end_offset: usize,
    pub rect: BoundingBox,
}

impl SelectionRange {
    pub fn new(start_container: NodeId, start_offset: usize, end_container: NodeId, end_offset: usize) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
            rect: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// A collapsed range (plain click)
    pub fn caret(node: NodeId, offset: usize) -> Self {
        Self::new(node, offset, node, offset)
    }

    pub fn with_rect(mut self, rect: BoundingBox) -> Self {
        self.rect = rect;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }
}

/// Selection captured at pointer-up
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub anchor: Anchor,
    pub range: SelectionRange,
    pub scroll: ScrollPosition,
}

/// A confirmed tag waiting to be saved
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub save: SaveRequest,
    pub selection: PendingSelection,
}

/// Split tag input into `@recipients` and the free-text message
pub fn parse_tag_input(input: &str) -> (Vec<String>, Option<String>) {
    let mut recipients: Vec<String> = Vec::new();
    let mut words = Vec::new();

    for word in input.split_whitespace() {
        let name = word
            .strip_prefix('@')
            .map(|name| name.trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '.')));
        match name {
            Some(name) if !name.is_empty() => {
                if !recipients.iter().any(|r| r == name) {
                    recipients.push(name.to_string());
                }
            }
            _ => words.push(word),
        }
    }

    let message = words.join(" ");
    (recipients, (!message.is_empty()).then_some(message))
}

/// Drives the tagging gesture on one page
#[derive(Debug)]
pub struct SelectionController {
    ctx: PageContext,
    state: SelectionState,
    pending: Option<PendingSelection>,
    affordance: Option<NodeId>,
    text: String,
    submitting: bool,
}

impl SelectionController {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            state: SelectionState::Idle,
            pending: None,
            affordance: None,
            text: String::new(),
            submitting: false,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    /// Icon or input box currently injected
    pub fn affordance(&self) -> Option<NodeId> {
        self.affordance
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the controller should react at all on this page
    fn enabled(&self) -> bool {
        self.ctx.is_attached() && !self.ctx.is_blocked()
    }

    /// Pointer released with `range` selected.
    ///
    /// Returns `true` if a new selection was captured and the pick icon shown.
    ///
    /// Boundaries inside text that `engine` has already decorated are recorded
    /// against the undecorated page, so the saved tag resolves on a fresh load.
    pub fn pointer_up(
        &mut self,
        doc: &mut Document,
        engine: &DecorationEngine,
        range: SelectionRange,
        scroll: ScrollPosition,
    ) -> Result<bool> {
        if !self.enabled() {
            log::debug!("Selection ignored on blocked or detached page {}", self.ctx.url());
            self.dismiss(doc);
            return Ok(false);
        }

        if let Some(own) = self.affordance {
            if affordance::contains(doc, own, range.start_container) || affordance::contains(doc, own, range.end_container) {
                return Ok(false);
            }
        }
        if self.submitting {
            return Ok(false);
        }
        if range.is_collapsed() {
            if self.state == SelectionState::PendingConfirm {
                self.dismiss(doc);
            }
            return Ok(false);
        }

        let anchor = Anchor::from_decorated_range(
            doc,
            engine.registry(),
            range.start_container,
            range.start_offset,
            range.end_container,
            range.end_offset,
        )?;
        self.dismiss(doc);

        let icon = affordance::show_icon(doc, range.rect)?;
        log::debug!("Captured selection {} .. {}", anchor.start, anchor.end);
        self.pending = Some(PendingSelection { anchor, range, scroll });
        self.affordance = Some(icon);
        self.state = SelectionState::PendingConfirm;
        Ok(true)
    }

    /// The pick icon was clicked: swap it for the input box
    pub fn affordance_click(&mut self, doc: &mut Document) -> Result<bool> {
        if self.state != SelectionState::PendingConfirm {
            return Ok(false);
        }
        let Some(rect) = self.pending.as_ref().map(|p| p.range.rect) else {
            return Ok(false);
        };

        if let Some(icon) = self.affordance.take() {
            doc.remove(icon);
        }
        let input = affordance::show_input(doc, rect)?;
        self.affordance = Some(input);
        self.text.clear();
        self.state = SelectionState::AwaitingInput;
        Ok(true)
    }

    /// Input box content changed
    pub fn input(&mut self, doc: &mut Document, text: &str) {
        if self.state != SelectionState::AwaitingInput || self.submitting {
            return;
        }
        self.text = text.to_string();
        if let Some(input) = self.affordance {
            doc.set_attribute(input, "value", text);
        }
    }

    /// Key pressed while the controller is active.
    ///
    /// Enter on a valid input returns the request to persist; the input is
    /// disabled until [`finish_submit`](Self::finish_submit) is called.
    pub fn key_down(&mut self, doc: &mut Document, key: Key) -> Option<SubmitRequest> {
        match key {
            Key::Escape => {
                self.dismiss(doc);
                None
            }
            Key::Enter => self.confirm(doc),
            Key::Other => None,
        }
    }

    fn confirm(&mut self, doc: &mut Document) -> Option<SubmitRequest> {
        if self.state != SelectionState::AwaitingInput || self.submitting || self.text.trim().is_empty() {
            return None;
        }
        if !self.enabled() {
            self.ctx
                .notify(NotificationLevel::Warning, "Tagging is disabled on this site");
            self.dismiss(doc);
            return None;
        }

        let (recipients, message) = parse_tag_input(&self.text);
        if recipients.is_empty() {
            self.ctx
                .notify(NotificationLevel::Warning, "Mention at least one @friend to tag");
            return None;
        }

        let selection = self.pending.clone()?;
        self.submitting = true;
        if let Some(input) = self.affordance {
            doc.set_attribute(input, "disabled", "disabled");
        }

        let save = SaveRequest::new(self.ctx.url(), &selection.anchor, recipients, message);
        Some(SubmitRequest { save, selection })
    }

    /// Page scrolled to `position`; dismisses the affordance past the threshold.
    ///
    /// Returns `true` if the pending selection was dropped.
    pub fn scroll(&mut self, doc: &mut Document, position: ScrollPosition) -> bool {
        let moved = self
            .pending
            .as_ref()
            .is_some_and(|p| p.scroll.moved_beyond(position, SCROLL_THRESHOLD));
        if moved {
            log::debug!("Selection dismissed after scrolling to ({}, {})", position.x, position.y);
            self.dismiss(doc);
        }
        moved
    }

    /// Remove any affordance and go back to idle
    pub fn dismiss(&mut self, doc: &mut Document) {
        if let Some(node) = self.affordance.take() {
            doc.remove(node);
        }
        self.pending = None;
        self.text.clear();
        self.submitting = false;
        self.state = SelectionState::Idle;
    }

    /// Complete a submit with the store's answer.
    ///
    /// On success the tag is decorated right away; on failure the user is
    /// notified (sign-in prompt for auth failures) and the input is re-enabled
    /// so the tag can be retried.
    pub fn finish_submit(
        &mut self,
        doc: &mut Document,
        engine: &mut DecorationEngine,
        request: SubmitRequest,
        result: Result<()>,
    ) -> Result<Vec<HighlightOutcome>> {
        if let Err(err) = result {
            if self.submitting {
                self.submitting = false;
                if let Some(input) = self.affordance {
                    doc.remove_attribute(input, "disabled");
                }
            }
            if err.is_auth() {
                self.ctx.notify(NotificationLevel::Danger, "Sign in to tag this page");
            } else {
                self.ctx
                    .notify(NotificationLevel::Danger, &format!("Could not save tag: {}", err));
            }
            return Err(err);
        }

        if self.submitting {
            self.dismiss(doc);
        }
        if !self.ctx.is_attached() {
            log::debug!("Page detached before save completed; skipping local decoration");
            return Ok(Vec::new());
        }
        self.ctx.notify(NotificationLevel::Success, "Tag saved");

        let meta = TagMeta::new()
            .color(self.ctx.tag_color())
            .message(request.save.message.clone());
        let Some(live) = request.selection.anchor.resolve_in(doc, engine.registry()) else {
            log::warn!("Saved selection no longer resolves; skipping local decoration");
            return Ok(Vec::new());
        };
        let outcomes = engine
            .render_anchor(doc, live, &meta)
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(outcome) => Some(outcome),
                Err(err) => {
                    log::warn!("Local decoration failed: {}", err);
                    None
                }
            })
            .collect();
        Ok(outcomes)
    }

    /// Confirm the current input and save it through `store`.
    ///
    /// Returns no outcomes when there was nothing to submit.
    pub async fn submit<S>(
        &mut self,
        doc: &mut Document,
        engine: &mut DecorationEngine,
        store: &S,
    ) -> Result<Vec<HighlightOutcome>>
    where
        S: AnchorStore + ?Sized,
    {
        let Some(request) = self.key_down(doc, Key::Enter) else {
            return Ok(Vec::new());
        };
        let result = store.save(request.save.clone()).await;
        self.finish_submit(doc, engine, request, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::context::NotificationCenter;
    use crate::decoration::HighlightRequest;
    use crate::dom::ElementNode;
    use crate::error::Error;
    use crate::store::MemoryStore;
    use std::rc::Rc;

    const URL: &str = "https://news.example.com/story";

    struct Page {
        doc: Document,
        engine: DecorationEngine,
        center: Rc<NotificationCenter>,
        controller: SelectionController,
        text: NodeId,
    }

    fn page_with(settings: Settings) -> Page {
        let doc = Document::from_snapshot(
            &ElementNode::new("body")
                .with_child(ElementNode::new("p").with_text("The quick brown fox"))
                .with_child(ElementNode::new("p").with_text("jumps over")),
        );
        let p = doc.children(doc.body().unwrap())[0];
        let text = doc.children(p)[0];
        let center = Rc::new(NotificationCenter::new());
        let ctx = PageContext::new(URL, settings, center.clone());
        Page {
            doc,
            engine: DecorationEngine::new(),
            center,
            controller: SelectionController::new(ctx),
            text,
        }
    }

    fn page() -> Page {
        page_with(Settings::default())
    }

    fn select_quick(page: &mut Page) -> bool {
        let range = SelectionRange::new(page.text, 4, page.text, 9).with_rect(BoundingBox::new(0.0, 0.0, 50.0, 10.0));
        page.controller
            .pointer_up(&mut page.doc, &page.engine, range, ScrollPosition::new(0.0, 300.0))
            .unwrap()
    }

    fn open_input(page: &mut Page, text: &str) {
        assert!(select_quick(page));
        assert!(page.controller.affordance_click(&mut page.doc).unwrap());
        page.controller.input(&mut page.doc, text);
    }

    #[test]
    fn test_parse_tag_input() {
        assert_eq!(
            parse_tag_input("@bob, look at this @carol @bob"),
            (
                vec!["bob".to_string(), "carol".to_string()],
                Some("look at this".to_string())
            )
        );
        assert_eq!(parse_tag_input("@ alone"), (Vec::new(), Some("@ alone".to_string())));
        assert_eq!(parse_tag_input("@dave"), (vec!["dave".to_string()], None));
    }

    #[test]
    fn test_pointer_up_captures_selection() {
        let mut page = page();
        assert!(select_quick(&mut page));

        assert_eq!(page.controller.state(), SelectionState::PendingConfirm);
        let pending = page.controller.pending().unwrap();
        assert_eq!(pending.anchor.start.to_string(), "/html/body/P[1]/text()[1]");
        assert!(pending.anchor.is_single_node());
        assert_eq!((pending.anchor.start_offset, pending.anchor.end_offset), (4, 9));
        assert_eq!(pending.scroll, ScrollPosition::new(0.0, 300.0));

        let icon = page.controller.affordance().unwrap();
        assert_eq!(page.doc.parent(icon), page.doc.body());
        assert_eq!(page.doc.attribute(icon, "class"), Some(ICON_CLASS));
    }

    #[test]
    fn test_collapsed_selection_is_rejected() {
        let mut page = page();
        let caret = SelectionRange::caret(page.text, 3);
        assert!(!page.controller.pointer_up(&mut page.doc, &page.engine, caret, ScrollPosition::default()).unwrap());
        assert_eq!(page.controller.state(), SelectionState::Idle);

        // A click elsewhere drops a pending icon
        select_quick(&mut page);
        page.controller
            .pointer_up(&mut page.doc, &page.engine, caret, ScrollPosition::default())
            .unwrap();
        assert_eq!(page.controller.state(), SelectionState::Idle);
        assert!(page.controller.affordance().is_none());
    }

    #[test]
    fn test_selection_inside_affordance_is_rejected() {
        let mut page = page();
        open_input(&mut page, "@bob");
        let input = page.controller.affordance().unwrap();
        let inner = page.doc.create_text("typed");
        page.doc.append_child(input, inner).unwrap();

        let range = SelectionRange::new(inner, 0, inner, 3);
        assert!(!page.controller.pointer_up(&mut page.doc, &page.engine, range, ScrollPosition::default()).unwrap());
        assert_eq!(page.controller.state(), SelectionState::AwaitingInput);
    }

    #[test]
    fn test_blocked_site_is_a_no_op() {
        let mut page = page_with(Settings::new().block("example.com"));
        let before = page.doc.to_html();
        assert!(!select_quick(&mut page));
        assert_eq!(page.controller.state(), SelectionState::Idle);
        assert_eq!(page.doc.to_html(), before);
    }

    #[test]
    fn test_affordance_click_swaps_icon_for_input() {
        let mut page = page();
        select_quick(&mut page);
        let icon = page.controller.affordance().unwrap();

        assert!(page.controller.affordance_click(&mut page.doc).unwrap());
        assert_eq!(page.controller.state(), SelectionState::AwaitingInput);
        assert!(!page.doc.is_attached(icon));
        let input = page.controller.affordance().unwrap();
        assert_eq!(page.doc.attribute(input, "class"), Some(INPUT_CLASS));

        // Clicking again does nothing
        assert!(!page.controller.affordance_click(&mut page.doc).unwrap());
    }

    #[test]
    fn test_enter_without_recipient_warns_and_stays_open() {
        let mut page = page();
        open_input(&mut page, "just a note");

        assert!(page.controller.key_down(&mut page.doc, Key::Enter).is_none());
        assert_eq!(page.controller.state(), SelectionState::AwaitingInput);
        assert_eq!(page.center.last().unwrap().level, NotificationLevel::Warning);
    }

    #[test]
    fn test_enter_builds_request_and_blocks_second_submit() {
        let mut page = page();
        open_input(&mut page, "@bob nice find");

        let request = page.controller.key_down(&mut page.doc, Key::Enter).unwrap();
        assert_eq!(request.save.usernames, vec!["bob".to_string()]);
        assert_eq!(request.save.message.as_deref(), Some("nice find"));
        assert_eq!(request.save.anchor.site, URL);
        assert_eq!(request.save.anchor.metadata.start_tag_offset, 4);

        let input = page.controller.affordance().unwrap();
        assert_eq!(page.doc.attribute(input, "disabled"), Some("disabled"));
        assert!(page.controller.is_submitting());
        assert!(page.controller.key_down(&mut page.doc, Key::Enter).is_none());
    }

    #[test]
    fn test_escape_dismisses_from_any_state() {
        let mut page = page();
        select_quick(&mut page);
        let icon = page.controller.affordance().unwrap();
        page.controller.key_down(&mut page.doc, Key::Escape);
        assert_eq!(page.controller.state(), SelectionState::Idle);
        assert!(!page.doc.is_attached(icon));

        open_input(&mut page, "@bob");
        page.controller.key_down(&mut page.doc, Key::Other);
        assert_eq!(page.controller.state(), SelectionState::AwaitingInput);
        page.controller.key_down(&mut page.doc, Key::Escape);
        assert_eq!(page.controller.state(), SelectionState::Idle);
    }

    #[test]
    fn test_scroll_threshold_on_either_axis() {
        let mut page = page();
        select_quick(&mut page);

        assert!(!page.controller.scroll(&mut page.doc, ScrollPosition::new(150.0, 300.0)));
        assert!(!page.controller.scroll(&mut page.doc, ScrollPosition::new(0.0, 160.0)));
        assert_eq!(page.controller.state(), SelectionState::PendingConfirm);

        assert!(page.controller.scroll(&mut page.doc, ScrollPosition::new(0.0, 451.0)));
        assert_eq!(page.controller.state(), SelectionState::Idle);

        open_input(&mut page, "@bob");
        assert!(page.controller.scroll(&mut page.doc, ScrollPosition::new(-151.0, 300.0)));
        assert_eq!(page.controller.state(), SelectionState::Idle);
    }

    #[test]
    fn test_finish_submit_success_decorates_locally() {
        let mut page = page();
        open_input(&mut page, "@bob");
        let request = page.controller.key_down(&mut page.doc, Key::Enter).unwrap();

        let outcomes = page
            .controller
            .finish_submit(&mut page.doc, &mut page.engine, request, Ok(()))
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        let wrapper = outcomes[0].applied().unwrap();
        assert_eq!(page.doc.text_content(wrapper), "quick");
        assert_eq!(page.controller.state(), SelectionState::Idle);
        assert!(page.controller.affordance().is_none());
        assert_eq!(page.center.last().unwrap().level, NotificationLevel::Success);
    }

    #[test]
    fn test_finish_submit_auth_failure_prompts_sign_in() {
        let mut page = page();
        open_input(&mut page, "@bob");
        let request = page.controller.key_down(&mut page.doc, Key::Enter).unwrap();
        let before = page.doc.text_content(page.doc.body().unwrap());

        let err = page
            .controller
            .finish_submit(&mut page.doc, &mut page.engine, request, Err(Error::AuthRequired))
            .unwrap_err();

        assert!(err.is_auth());
        let last = page.center.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Danger);
        assert!(last.message.contains("Sign in"));
        assert!(page.engine.registry().is_empty());
        assert_eq!(page.doc.text_content(page.doc.body().unwrap()), before);

        // Input stays open and can be retried
        assert_eq!(page.controller.state(), SelectionState::AwaitingInput);
        assert!(!page.controller.is_submitting());
        let input = page.controller.affordance().unwrap();
        assert_eq!(page.doc.attribute(input, "disabled"), None);
    }

    #[tokio::test]
    async fn test_submit_saves_through_store() {
        let mut page = page();
        let store = MemoryStore::new("alice");
        open_input(&mut page, "@bob @carol check this");

        let outcomes = page
            .controller
            .submit(&mut page.doc, &mut page.engine, &store)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(store.count(URL), 1);
        let saved = store.load(URL).await.unwrap();
        assert_eq!(saved[0].message.as_deref(), Some("check this"));
        assert_eq!(saved[0].metadata.start_tag_xpath, "/html/body/P[1]/text()[1]");
    }

    #[tokio::test]
    async fn test_submit_transport_failure_is_reported() {
        let mut page = page();
        let store = MemoryStore::new("alice");
        store.fail_with_status(Some(503));
        open_input(&mut page, "@bob");

        let err = page
            .controller
            .submit(&mut page.doc, &mut page.engine, &store)
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(page.center.last().unwrap().message.starts_with("Could not save tag"));
        assert_eq!(store.count(URL), 0);
    }

    #[test]
    fn test_selection_in_decorated_text_is_saved_in_original_coordinates() {
        let mut page = page();
        let first = page
            .engine
            .highlight_node(&mut page.doc, page.text, &HighlightRequest::new(4, Some(9)))
            .unwrap()
            .applied()
            .unwrap();
        let p = page.doc.parent(first).unwrap();
        let tail = page.doc.children(p)[2];
        assert_eq!(page.doc.text(tail), Some(" brown fox"));

        let range = SelectionRange::new(tail, 1, tail, 6);
        page.controller
            .pointer_up(&mut page.doc, &page.engine, range, ScrollPosition::default())
            .unwrap();
        page.controller.affordance_click(&mut page.doc).unwrap();
        page.controller.input(&mut page.doc, "@bob");
        let request = page.controller.key_down(&mut page.doc, Key::Enter).unwrap();

        let metadata = &request.save.anchor.metadata;
        assert_eq!(metadata.start_tag_xpath, "/html/body/P[1]/text()[1]");
        assert_eq!((metadata.start_tag_offset, metadata.end_tag_offset), (10, 15));

        let outcomes = page
            .controller
            .finish_submit(&mut page.doc, &mut page.engine, request, Ok(()))
            .unwrap();
        assert_eq!(page.doc.text_content(outcomes[0].applied().unwrap()), "brown");
        assert_eq!(page.doc.text_content(p), "The quick brown fox");
    }

    #[test]
    fn test_cross_node_selection_renders_two_boundaries() {
        let mut page = page();
        let second_p = page.doc.children(page.doc.body().unwrap())[1];
        let second = page.doc.children(second_p)[0];

        let range = SelectionRange::new(page.text, 10, second, 5);
        page.controller
            .pointer_up(&mut page.doc, &page.engine, range, ScrollPosition::default())
            .unwrap();
        page.controller.affordance_click(&mut page.doc).unwrap();
        page.controller.input(&mut page.doc, "@bob");
        let request = page.controller.key_down(&mut page.doc, Key::Enter).unwrap();
        assert!(!request.selection.anchor.is_single_node());

        let outcomes = page
            .controller
            .finish_submit(&mut page.doc, &mut page.engine, request, Ok(()))
            .unwrap();
        let texts: Vec<_> = outcomes
            .iter()
            .map(|o| page.doc.text_content(o.applied().unwrap()))
            .collect();
        assert_eq!(texts, vec!["brown fox", "jumps"]);
    }
}
