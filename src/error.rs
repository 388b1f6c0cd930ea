use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while anchoring, decorating and persisting tags
#[derive(Debug, Error)]
pub enum Error {
    /// A locator no longer matches any node in the page
    #[error("Locator did not resolve: {0}")]
    ResolutionFailed(String),

    /// A locator string could not be parsed
    #[error("Invalid locator '{path}': {reason}")]
    InvalidLocator { path: String, reason: String },

    /// Offsets do not describe a span inside the target node
    #[error("Invalid offsets {start}..{end:?} for node of length {len}")]
    InvalidOffsets {
        start: usize,
        end: Option<usize>,
        len: usize,
    },

    /// The node is not connected to the document element
    #[error("Node is not attached to the document")]
    DetachedNode,

    /// A tree mutation would produce an invalid hierarchy
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// A text operation was attempted on a non-text node
    #[error("Node is not a text node")]
    NotTextNode,

    /// Persistence request failed
    #[error("Transport failed{}: {reason}", status_suffix(.status))]
    Transport { status: Option<u16>, reason: String },

    /// Persistence rejected the request because the user is not signed in
    #[error("Authentication required")]
    AuthRequired,

    /// The page matches the configured block-list
    #[error("Site is blocked: {0}")]
    Blocked(String),

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Live page capture failed
    #[error("Page capture failed: {0}")]
    CaptureFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl Error {
    /// Build a transport error from an HTTP-like status code.
    ///
    /// A 401 maps to [`Error::AuthRequired`] so callers can prompt sign-in.
    pub fn from_status(status: u16, reason: impl Into<String>) -> Self {
        if status == 401 {
            Error::AuthRequired
        } else {
            Error::Transport {
                status: Some(status),
                reason: reason.into(),
            }
        }
    }

    /// Whether the error asks the user to sign in
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::AuthRequired)
    }

    /// Whether the error came from the persistence transport (auth included)
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::AuthRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_401_is_auth() {
        let err = Error::from_status(401, "unauthorized");
        assert!(err.is_auth());
        assert!(err.is_transport());
    }

    #[test]
    fn test_from_status_other() {
        let err = Error::from_status(503, "unavailable");
        assert!(!err.is_auth());
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Transport failed (503): unavailable");
    }

    #[test]
    fn test_transport_without_status_display() {
        let err = Error::Transport {
            status: None,
            reason: "offline".to_string(),
        };
        assert_eq!(err.to_string(), "Transport failed: offline");
    }
}
