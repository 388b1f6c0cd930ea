use crate::browser::config::{ConnectionOptions, LaunchOptions};
use crate::dom::{Document, ElementNode};
use crate::error::{Error, Result};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Takes page model snapshots from a live Chrome tab
pub struct PageCapture {
    browser: Browser,
    tab: Arc<Tab>,
    settle: Duration,
}

impl PageCapture {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Pages that detect automation sometimes serve a different DOM
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;
        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }
        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        let browser = Browser::new(launch_opts).map_err(|e| Error::CaptureFailed(format!("Failed to launch browser: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::CaptureFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            settle: Duration::from_millis(options.settle_ms),
        })
    }

    /// Attach to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect(options.ws_url)
            .map_err(|e| Error::CaptureFailed(format!("Failed to connect: {}", e)))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::CaptureFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            settle: Duration::from_millis(options.settle_ms),
        })
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// URL of the capture tab
    pub fn url(&self) -> String {
        self.tab.get_url()
    }

    /// Navigate to `url`, wait for it to settle and snapshot it
    pub fn capture(&self, url: &str) -> Result<Document> {
        log::debug!("Capturing {}", url);
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::CaptureFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::CaptureFailed(format!("Navigation timeout: {}", e)))?;

        // Give client-side rendering a moment before the snapshot
        std::thread::sleep(self.settle);

        let mut root = self.snapshot()?;
        root.simplify();
        Ok(Document::from_snapshot(&root))
    }

    /// Snapshot the current page of the capture tab
    pub fn snapshot(&self) -> Result<ElementNode> {
        let js_code = include_str!("snapshot_dom.js");

        let result = self
            .tab
            .evaluate(js_code, false)
            .map_err(|e| Error::CaptureFailed(format!("Failed to execute snapshot script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| Error::CaptureFailed("No value returned from snapshot script".to_string()))?;

        // The script returns a JSON string, not an object
        let json_str: String = serde_json::from_value(json_value)?;
        Ok(serde_json::from_str(&json_str)?)
    }
}
