//! Error types for the deck export pipeline

use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a deck
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to start the rendering engine
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load the source document
    #[error("Failed to load document: {0}")]
    LoadError(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The rendering session stopped responding
    #[error("Engine session failed: {0}")]
    EngineError(String),

    /// A page script failed or returned something unexpected
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// The engine could not export the current page
    #[error("Page export failed: {0}")]
    ExportError(String),

    /// Merging page buffers into the output container failed
    #[error("Document assembly failed: {0}")]
    AssemblyError(String),

    /// The visible slide did not match the requested one (fail-closed policy)
    #[error("Capture mismatch: expected slide {requested}, found {}", found.map(|i| i.to_string()).unwrap_or_else(|| "none".into()))]
    CaptureMismatch {
        requested: usize,
        found: Option<usize>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// PDF parsing or serialization error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Malformed JSON from a page script or config file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_mismatch_message_names_both_slides() {
        let e = Error::CaptureMismatch { requested: 3, found: Some(4) };
        assert_eq!(e.to_string(), "Capture mismatch: expected slide 3, found 4");

        let e = Error::CaptureMismatch { requested: 0, found: None };
        assert!(e.to_string().ends_with("found none"));
    }
}
