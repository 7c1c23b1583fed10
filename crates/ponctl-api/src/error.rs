use thiserror::Error;

use crate::snmp::SnmpErrorStatus;

/// Top-level error type for the `ponctl-api` crate.
///
/// Covers every failure mode of the protocol clients: vendor HTTP gateway,
/// SNMP sessions and the subtree walker. `ponctl-core` classifies these into
/// the dispatcher's error taxonomy; nothing above the backends sees them raw.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected (HTTP 401/403, SNMP community or USM failure).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The element could not be reached at the network layer.
    #[error("Element unreachable at {target}: {reason}")]
    Unreachable { target: String, reason: String },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Vendor HTTP gateway ─────────────────────────────────────────
    /// Non-success HTTP status from the vendor API.
    #[error("Vendor API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// The vendor envelope reported a failure (`meta.rc != "ok"`).
    #[error("Vendor API rejected request: {message}")]
    Rejected { message: String },

    // ── SNMP ────────────────────────────────────────────────────────
    /// The agent answered with a non-zero error-status.
    #[error("SNMP error-status {status} at varbind {index}")]
    Snmp { status: SnmpErrorStatus, index: u32 },

    /// The requested object does not exist on the agent.
    #[error("No such object: {oid}")]
    NoSuchObject { oid: String },

    /// GETNEXT returned an OID that does not advance past the request.
    #[error("Agent returned non-increasing OID {returned} after {requested}")]
    NonIncreasingOid { requested: String, returned: String },

    /// A walk hit its binding limit before leaving the subtree.
    #[error("Walk truncated after {limit} bindings")]
    WalkTruncated { limit: usize },

    /// Malformed object identifier.
    #[error("Invalid object identifier: {0}")]
    InvalidOid(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Reading a local fixture (MIB snapshot) failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Capability ──────────────────────────────────────────────────
    /// Operation not supported by this protocol client.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}
