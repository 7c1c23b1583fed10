//! CLI error types with miette diagnostics.
//!
//! Maps config, core and dispatch failures into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use ponctl_config::ConfigError;
use ponctl_core::{CoreError, ErrorClass};
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const PROTOCOL: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Operation outcomes ───────────────────────────────────────────

    #[error("Operation failed ({class}): {detail}")]
    #[diagnostic(
        code(ponctl::operation_failed),
        help("Run: ponctl audit --element {element} -l 5 to see recent attempts")
    )]
    OperationFailed {
        element: String,
        class: ErrorClass,
        detail: String,
    },

    // ── Inventory ────────────────────────────────────────────────────

    #[error("Element '{identifier}' not found")]
    #[diagnostic(
        code(ponctl::element_not_found),
        help("Elements are declared under [elements.<id>] in {config}")
    )]
    ElementNotFound { identifier: String, config: String },

    #[error("No credentials for element '{element}' ({what})")]
    #[diagnostic(
        code(ponctl::no_credentials),
        help(
            "Set the *_env variable named in the config, store the secret with\n\
             `keyring set ponctl {element}/<secret>`, or put it in the config file."
        )
    )]
    NoCredentials { element: String, what: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ponctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(ponctl::config))]
    Config(Box<figment::Error>),

    #[error("Cannot load MIB snapshot {path}: {reason}")]
    #[diagnostic(
        code(ponctl::mib_snapshot),
        help("A snapshot is a JSON file with an `objects` map keyed by dotted OID.")
    )]
    MibSnapshot { path: String, reason: String },

    // ── Core ─────────────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(ponctl::core))]
    Core(CoreError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(ponctl::json), help("Check the JSON body and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::OperationFailed { class, .. } => match class {
                ErrorClass::AuthenticationFailed => exit_code::AUTH,
                ErrorClass::Unsupported => exit_code::UNSUPPORTED,
                ErrorClass::Timeout => exit_code::TIMEOUT,
                ErrorClass::Unreachable => exit_code::CONNECTION,
                ErrorClass::ProtocolError => exit_code::PROTOCOL,
                ErrorClass::Unknown => exit_code::GENERAL,
            },
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ElementNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::Config(_) | Self::MibSnapshot { .. } => {
                exit_code::USAGE
            }
            Self::Core(_) | Self::Io(_) | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ElementNotFound { identifier } => CliError::ElementNotFound {
                identifier,
                config: ponctl_config::config_path().display().to_string(),
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            other => CliError::Core(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { element, what } => {
                CliError::NoCredentials { element, what }
            }
            ConfigError::Figment(inner) => CliError::Config(inner),
            ConfigError::Core(core) => core.into(),
        }
    }
}
