//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // HTTP/API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("API request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("API transport error: {message}")]
    Transport { message: String },

    #[error("Unexpected API response: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No project slug found in URL: {url}")]
    NoProject { url: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn no_project(url: impl Into<String>) -> Self {
        Self::NoProject { url: url.into() }
    }

    /// Check if this is a recoverable error
    ///
    /// Fetch failures are recoverable: the previously rendered data stays
    /// in place and the user is notified.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Http { .. }
                | Error::Transport { .. }
                | Error::Protocol { .. }
                | Error::Json(_)
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::NoProject { .. } | Error::ConfigInvalid { .. } | Error::Url(_)
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::http(500, "Internal Server Error");
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: Internal Server Error"
        );

        let err = Error::no_project("https://bencher.dev/");
        assert!(err.to_string().contains("No project slug"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_url_parse() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_fetch_errors_are_recoverable() {
        assert!(Error::http(404, "Not Found").is_recoverable());
        assert!(Error::transport("connection reset").is_recoverable());
        assert!(Error::protocol("missing field").is_recoverable());
        assert!(!Error::http(502, "Bad Gateway").is_fatal());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::no_project("https://bencher.dev").is_fatal());
        assert!(Error::config_invalid("bad host").is_fatal());
        assert!(!Error::config_invalid("bad host").is_recoverable());
    }

    #[test]
    fn test_result_ext_preserves_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.context("reading settings").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
