//! User settings consumed by the anchoring code

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`Settings::tag_color`]
pub const COLOR_ENV: &str = "PAGE_TAGS_COLOR";

/// Default highlight color
pub const DEFAULT_TAG_COLOR: &str = "#ffeb3b";

/// Highlight color and site block-list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Highlight color as `#rgb` or `#rrggbb`
    #[serde(default = "default_tag_color")]
    pub tag_color: String,

    /// Domain substrings or URL prefixes where tagging is disabled
    #[serde(default)]
    pub blocked_sites: Vec<String>,
}

fn default_tag_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tag_color: default_tag_color(),
            blocked_sites: Vec::new(),
        }
    }
}

impl Settings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set highlight color
    pub fn tag_color(mut self, color: impl Into<String>) -> Self {
        self.tag_color = color.into();
        self
    }

    /// Builder method: block a domain substring or URL prefix
    pub fn block(mut self, entry: impl Into<String>) -> Self {
        self.blocked_sites.push(entry.into());
        self
    }

    /// Parse and validate settings from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut settings = Self::from_json_str(&json)?;
        settings.apply_env()?;
        Ok(settings)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(color) = std::env::var(COLOR_ENV) {
            self.tag_color = color;
            self.validate()?;
        }
        Ok(())
    }

    /// Check that the color is a hex color
    pub fn validate(&self) -> Result<()> {
        if is_hex_color(&self.tag_color) {
            Ok(())
        } else {
            Err(Error::InvalidSettings(format!("tag_color '{}' is not a hex color", self.tag_color)))
        }
    }

    /// Whether `url` matches the block-list.
    ///
    /// Entries containing `://` are URL prefixes; other entries are matched as
    /// substrings of the URL host.
    pub fn is_blocked(&self, url: &str) -> bool {
        let url = url.trim();
        let host = host_of(url).to_ascii_lowercase();
        self.blocked_sites.iter().map(|e| e.trim()).filter(|e| !e.is_empty()).any(|entry| {
            if entry.contains("://") {
                url.starts_with(entry)
            } else {
                host.contains(&entry.to_ascii_lowercase())
            }
        })
    }
}

fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Host part of a URL (without scheme, credentials, port, path)
pub fn host_of(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host_port = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    if let Some(bracketed) = host_port.strip_prefix('[') {
        return bracketed.split(']').next().unwrap_or(bracketed);
    }
    host_port.split(':').next().unwrap_or(host_port)
}
