//! Overlay manager
//!
//! Renders the tags saved for a page once per page load. Loading goes through
//! the [`AnchorStore`]; rendering is two-phase so decorations applied for one
//! anchor cannot shift the sibling indices later anchors resolve against:
//! every anchor is resolved first, then all of them are decorated. Locators
//! are read against the undecorated shape of the page, so highlights that are
//! already on it do not shift them either.
//!
//! A bad anchor (malformed locator, no longer matching, invalid offsets) is
//! logged and skipped, never surfaced to the user.

use crate::anchor::{Anchor, ResolvedAnchor};
use crate::context::{NotificationLevel, PageContext};
use crate::decoration::{DecorationEngine, HighlightOutcome, TagMeta};
use crate::dom::Document;
use crate::error::Result;
use crate::store::{AnchorStore, TaggedAnchor};
use std::fmt;

/// Why a stored anchor was not rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The stored locators could not be parsed
    Malformed(String),
    /// A locator no longer matches a node
    Unresolved,
    /// Every boundary was already decorated or empty
    NothingToRender,
    /// Decorating failed, e.g. offsets out of range
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Malformed(reason) => write!(f, "malformed metadata: {}", reason),
            SkipReason::Unresolved => write!(f, "locator did not resolve"),
            SkipReason::NothingToRender => write!(f, "nothing to render"),
            SkipReason::Failed(reason) => write!(f, "decoration failed: {}", reason),
        }
    }
}

/// A stored anchor that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAnchor {
    /// Position in the loaded list
    pub index: usize,
    pub owner: String,
    pub reason: SkipReason,
}

/// Summary of one overlay pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Anchors loaded from the store (or the cache)
    pub total: usize,
    /// Anchors with at least one new decoration
    pub rendered: usize,
    /// Decorations applied across all anchors
    pub decorations: usize,
    pub skipped: Vec<SkippedAnchor>,
    /// The store failed and the session cache was used
    pub stale: bool,
}

impl OverlayReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Loads and renders saved tags for one page
#[derive(Debug)]
pub struct OverlayManager {
    ctx: PageContext,
    started: bool,
}

impl OverlayManager {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx, started: false }
    }

    /// Whether `load` already ran for this page
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Fetch the page's tags and render them.
    ///
    /// Runs at most once per manager. Returns `Ok(None)` when nothing was
    /// done: already loaded, blocked site, or the page went away while the
    /// request was in flight. Store failures fall back to the session cache;
    /// without a cached copy the user is notified and the error returned.
    pub async fn load<S>(
        &mut self,
        doc: &mut Document,
        engine: &mut DecorationEngine,
        store: &S,
    ) -> Result<Option<OverlayReport>>
    where
        S: AnchorStore + ?Sized,
    {
        if self.started {
            log::debug!("Overlay already loaded for {}", self.ctx.url());
            return Ok(None);
        }
        self.started = true;

        if self.ctx.is_blocked() {
            log::info!("Skipping overlay on blocked site {}", self.ctx.url());
            return Ok(None);
        }

        let site = self.ctx.site();
        let result = store.load(&site).await;

        if !self.ctx.is_attached() {
            log::debug!("Page detached while loading tags for {}; discarding", site);
            return Ok(None);
        }

        let (tags, stale) = match result {
            Ok(tags) => {
                self.ctx.cache().put(&site, tags.clone());
                (tags, false)
            }
            Err(err) if err.is_auth() => {
                self.ctx
                    .notify(NotificationLevel::Warning, "Sign in to see tags on this page");
                return Err(err);
            }
            Err(err) => match self.ctx.cache().get(&site) {
                Some(tags) => {
                    log::warn!("Loading tags for {} failed, using cached copy: {}", site, err);
                    self.ctx
                        .notify(NotificationLevel::Warning, "Showing saved tags from earlier; the server is unreachable");
                    (tags, true)
                }
                None => {
                    self.ctx
                        .notify(NotificationLevel::Warning, "Could not load tags for this page");
                    return Err(err);
                }
            },
        };

        let mut report = self.render(doc, engine, &tags);
        report.stale = stale;
        log::info!(
            "Rendered {}/{} tags on {} ({} skipped{})",
            report.rendered,
            report.total,
            site,
            report.skipped_count(),
            if stale { ", stale" } else { "" }
        );
        Ok(Some(report))
    }

    /// Resolve every tag, then decorate the ones that resolved
    pub fn render(&self, doc: &mut Document, engine: &mut DecorationEngine, tags: &[TaggedAnchor]) -> OverlayReport {
        let mut report = OverlayReport {
            total: tags.len(),
            ..OverlayReport::default()
        };

        let mut resolved: Vec<(usize, ResolvedAnchor)> = Vec::with_capacity(tags.len());
        for (index, tag) in tags.iter().enumerate() {
            let reason = match Anchor::from_metadata(&tag.metadata) {
                Ok(anchor) => match anchor.resolve_in(doc, engine.registry()) {
                    Some(live) => {
                        resolved.push((index, live));
                        continue;
                    }
                    None => SkipReason::Unresolved,
                },
                Err(err) => SkipReason::Malformed(err.to_string()),
            };
            skip(&mut report, index, tag, reason);
        }

        let color = self.ctx.tag_color();
        for (index, live) in resolved {
            let tag = &tags[index];
            let meta = TagMeta::new()
                .color(color.clone())
                .tagged_by(tag.owner.clone())
                .message(tag.message.clone());

            let mut applied = 0;
            let mut failure = None;
            for outcome in engine.render_anchor(doc, live, &meta) {
                match outcome {
                    Ok(HighlightOutcome::Applied(_)) => applied += 1,
                    Ok(_) => {}
                    Err(err) => {
                        log::warn!("Decorating tag #{} by {} failed: {}", index, tag.owner, err);
                        failure.get_or_insert_with(|| err.to_string());
                    }
                }
            }

            if applied > 0 {
                report.rendered += 1;
                report.decorations += applied;
            } else {
                let reason = failure.map_or(SkipReason::NothingToRender, SkipReason::Failed);
                skip(&mut report, index, tag, reason);
            }
        }
        report
    }
}

fn skip(report: &mut OverlayReport, index: usize, tag: &TaggedAnchor, reason: SkipReason) {
    log::warn!("Skipping tag #{} by {}: {}", index, tag.owner, reason);
    report.skipped.push(SkippedAnchor {
        index,
        owner: tag.owner.clone(),
        reason,
    });
}
