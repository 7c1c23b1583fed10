// ── Core error types ──
//
// Failures outside the dispatch path: registry loading, store lookups,
// audit-log persistence. Dispatch itself never returns these; it folds
// every expected failure into an `OperationResult`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Registry ─────────────────────────────────────────────────────
    #[error("Invalid capability table: {message}")]
    Registry { message: String },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Element not found: {identifier}")]
    ElementNotFound { identifier: String },

    #[error("ONT not found: {identifier}")]
    OntNotFound { identifier: String },

    // ── Audit log ────────────────────────────────────────────────────
    #[error("Audit log I/O on {path}: {source}")]
    AuditIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Audit entry serialization failed: {0}")]
    AuditEncoding(#[from] serde_json::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Registry {
            message: err.to_string(),
        }
    }
}
