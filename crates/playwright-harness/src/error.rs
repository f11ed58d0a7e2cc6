// Error types for playwright-harness

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the harness
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid harness configuration (e.g. an unsupported browser name on
    /// the legacy single-browser selection path). Surfaced immediately and
    /// fails test collection/setup rather than being downgraded to a skip.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to launch the browser engine process
    #[error("Failed to launch browser engine: {0}")]
    LaunchFailed(String),

    /// Failed to connect to a remote browser engine endpoint
    #[error("Failed to connect to browser engine: {0}")]
    ConnectionFailed(String),

    /// Engine-level error (navigation, capture, close, ...)
    ///
    /// Raised by the engine for operations on contexts and pages. Artifact
    /// capture paths treat these as best-effort and swallow them; anything
    /// else propagates.
    #[error("Engine error: {0}")]
    Engine(String),

    /// Target was closed (browser, context, or page)
    ///
    /// Occurs when attempting to perform an operation on a closed target.
    #[error("Target closed: Cannot perform operation on closed {target_type}. {context}")]
    TargetClosed {
        target_type: String,
        context: String,
    },

    /// Timeout waiting for operation
    #[error("Timeout: {0}")]
    Timeout(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }
}
