//! Per-page context shared by the selection controller and overlay manager
//!
//! Everything that used to be module-level state (settings, the notifier,
//! the session cache of loaded tags) lives here and is handed to components
//! at construction. The context is bound to one page: `teardown()` marks it
//! detached so late async results can be dropped.

use crate::config::Settings;
use crate::store::{TaggedAnchor, site_key};
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How long a notification stays on screen
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(4);

/// Notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Danger,
}

/// A transient, auto-dismissing message
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Sink for user-facing notifications
pub trait Notifier {
    fn notify(&self, level: NotificationLevel, message: &str);
}

/// Notifier that keeps notifications until they expire
#[derive(Debug)]
pub struct NotificationCenter {
    entries: RefCell<Vec<Notification>>,
    lifetime: Duration,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_lifetime(NOTIFICATION_LIFETIME)
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            lifetime,
        }
    }

    /// Notifications currently on screen
    pub fn active(&self) -> Vec<Notification> {
        self.entries.borrow().clone()
    }

    /// Most recent notification, if any
    pub fn last(&self) -> Option<Notification> {
        self.entries.borrow().last().cloned()
    }

    /// Dismiss everything that expired at `now`
    pub fn tick(&self, now: Instant) {
        self.entries.borrow_mut().retain(|n| n.expires_at > now);
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, level: NotificationLevel, message: &str) {
        log::debug!("Notification ({:?}): {}", level, message);
        self.entries.borrow_mut().push(Notification {
            level,
            message: message.to_string(),
            expires_at: Instant::now() + self.lifetime,
        });
    }
}

/// Session cache of the last successful load per site
#[derive(Debug, Default)]
pub struct AnchorCache {
    entries: RefCell<HashMap<String, Vec<TaggedAnchor>>>,
}

impl AnchorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, site: &str) -> Option<Vec<TaggedAnchor>> {
        self.entries.borrow().get(&site_key(site)).cloned()
    }

    pub fn put(&self, site: &str, tags: Vec<TaggedAnchor>) {
        self.entries.borrow_mut().insert(site_key(site), tags);
    }
}

struct PageState {
    url: String,
    settings: RefCell<Settings>,
    notifier: Rc<dyn Notifier>,
    cache: Rc<AnchorCache>,
    attached: Cell<bool>,
}

/// Handle to the state of one injected page; clones share the same page
#[derive(Clone)]
pub struct PageContext {
    inner: Rc<PageState>,
}

impl PageContext {
    /// Create a context for `url` with a fresh session cache
    pub fn new(url: impl Into<String>, settings: Settings, notifier: Rc<dyn Notifier>) -> Self {
        Self::with_cache(url, settings, notifier, Rc::new(AnchorCache::new()))
    }

    /// Create a context sharing an existing session cache
    pub fn with_cache(
        url: impl Into<String>,
        settings: Settings,
        notifier: Rc<dyn Notifier>,
        cache: Rc<AnchorCache>,
    ) -> Self {
        Self {
            inner: Rc::new(PageState {
                url: url.into(),
                settings: RefCell::new(settings),
                notifier,
                cache,
                attached: Cell::new(true),
            }),
        }
    }

    /// Page URL as given
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Storage key of the page
    pub fn site(&self) -> String {
        site_key(&self.inner.url)
    }

    /// Current settings
    pub fn settings(&self) -> Ref<'_, Settings> {
        self.inner.settings.borrow()
    }

    /// Replace settings, e.g. after the user edited the block-list
    pub fn update_settings(&self, settings: Settings) {
        *self.inner.settings.borrow_mut() = settings;
    }

    /// Whether the page matches the block-list right now
    pub fn is_blocked(&self) -> bool {
        self.settings().is_blocked(&self.inner.url)
    }

    /// Highlight color from settings
    pub fn tag_color(&self) -> String {
        self.settings().tag_color.clone()
    }

    pub fn notify(&self, level: NotificationLevel, message: &str) {
        self.inner.notifier.notify(level, message);
    }

    pub fn cache(&self) -> &AnchorCache {
        &self.inner.cache
    }

    /// Whether the page is still alive
    pub fn is_attached(&self) -> bool {
        self.inner.attached.get()
    }

    /// Mark the page as gone (navigation, script teardown)
    pub fn teardown(&self) {
        self.inner.attached.set(false);
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("url", &self.inner.url)
            .field("attached", &self.inner.attached.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_center_expiry() {
        let center = NotificationCenter::with_lifetime(Duration::from_millis(100));
        center.notify(NotificationLevel::Warning, "careful");
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.last().unwrap().level, NotificationLevel::Warning);

        center.tick(Instant::now());
        assert_eq!(center.active().len(), 1);

        center.tick(Instant::now() + Duration::from_millis(200));
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_context_block_list_is_live() {
        let ctx = PageContext::new(
            "https://news.example.com/story",
            Settings::default(),
            Rc::new(NotificationCenter::new()),
        );
        assert!(!ctx.is_blocked());

        ctx.update_settings(Settings::new().block("example.com"));
        assert!(ctx.is_blocked());
    }

    #[test]
    fn test_context_teardown_is_shared_by_clones() {
        let ctx = PageContext::new("https://example.com", Settings::default(), Rc::new(NotificationCenter::new()));
        let other = ctx.clone();
        other.teardown();
        assert!(!ctx.is_attached());
    }

    #[test]
    fn test_cache_is_keyed_by_site() {
        let cache = AnchorCache::new();
        cache.put("https://example.com/a#x", Vec::new());
        assert!(cache.get("https://example.com/a").is_some());
        assert!(cache.get("https://example.com/b").is_none());
    }
}
