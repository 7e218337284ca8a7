//! Result and error types for Navegar.

use thiserror::Error;

/// Result type for Navegar operations
pub type NavegarResult<T> = Result<T, NavegarError>;

/// Error classes a wait policy may choose to ignore while polling.
///
/// A fluent wait keeps polling through these until its timeout elapses;
/// every other error aborts the wait immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientError {
    /// Element is not (yet) attached to the page
    ElementNotFound,
    /// Element is attached but not (yet) visible
    ElementNotVisible,
}

/// Errors that can occur in Navegar
#[derive(Debug, Error)]
pub enum NavegarError {
    /// Wait ceiling elapsed without the condition being met
    #[error("timed out after {ms}ms waiting for {waiting_for}")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
        /// Description of what was waited for
        waiting_for: String,
    },

    /// No element matched the locator
    #[error("element not found: {selector}")]
    ElementNotFound {
        /// The selector that matched nothing
        selector: String,
    },

    /// Element matched but is not visible
    #[error("element not visible: {selector}")]
    ElementNotVisible {
        /// The selector of the hidden element
        selector: String,
    },

    /// Caller passed a value outside the supported set
    /// (HTTP method, dropdown mode, browser name, ...)
    #[error("unsupported {kind}: {value:?}")]
    UnsupportedOption {
        /// What kind of option was rejected
        kind: &'static str,
        /// The offending value
        value: String,
    },

    /// Assertion failed with expected/actual embedded in the message
    #[error("assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Grid cell text differed from the expected data (1-based indices)
    #[error(
        "grid validation failed at row {row}, column {column}: expected {expected:?}, actual {actual:?}"
    )]
    GridMismatch {
        /// Row of the first differing cell
        row: usize,
        /// Column of the first differing cell
        column: usize,
        /// Expected cell text
        expected: String,
        /// Actual cell text
        actual: String,
    },

    /// Browser driver reported an error
    #[error("driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Fixture setup or teardown failed
    #[error("fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Operation called in the wrong state
    #[error("invalid state: {message}")]
    InvalidState {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded or serialized
    #[error("config error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl NavegarError {
    /// The transient class of this error, if a wait policy may ignore it
    #[must_use]
    pub const fn transient_kind(&self) -> Option<TransientError> {
        match self {
            Self::ElementNotFound { .. } => Some(TransientError::ElementNotFound),
            Self::ElementNotVisible { .. } => Some(TransientError::ElementNotVisible),
            _ => None,
        }
    }

    /// Check whether this error is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<reqwest::Error> for NavegarError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = NavegarError::Timeout {
            ms: 500,
            waiting_for: "presence of css=#grid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "timed out after 500ms waiting for presence of css=#grid"
        );
        assert!(err.is_timeout());
    }

    #[test]
    fn test_unsupported_option_message() {
        let err = NavegarError::UnsupportedOption {
            kind: "select mode",
            value: "bogus".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported select mode: \"bogus\"");
    }

    #[test]
    fn test_grid_mismatch_names_row_and_column() {
        let err = NavegarError::GridMismatch {
            row: 2,
            column: 3,
            expected: "42".to_string(),
            actual: "43".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 2"));
        assert!(msg.contains("column 3"));
        assert!(msg.contains("42"));
        assert!(msg.contains("43"));
    }

    #[test]
    fn test_transient_kind() {
        let not_found = NavegarError::ElementNotFound {
            selector: "#x".to_string(),
        };
        assert_eq!(
            not_found.transient_kind(),
            Some(TransientError::ElementNotFound)
        );

        let hidden = NavegarError::ElementNotVisible {
            selector: "#x".to_string(),
        };
        assert_eq!(
            hidden.transient_kind(),
            Some(TransientError::ElementNotVisible)
        );

        let fatal = NavegarError::AssertionFailed {
            message: "boom".to_string(),
        };
        assert_eq!(fatal.transient_kind(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = NavegarError::from(io);
        assert!(matches!(err, NavegarError::Io(_)));
    }
}
