// ── Domain model ──
//
// Canonical representations of managed elements, operations, results,
// audit records and projected ONT state. Every backend normalizes into
// these types; nothing above the transport layer sees protocol values.

pub mod audit;
pub mod element;
pub mod ont;
pub mod operation;
pub mod value;

// ── Re-exports ──────────────────────────────────────────────────────

pub use audit::AuditLogEntry;
pub use element::{ElementConfig, ElementId, HttpParams, SnmpParams, TransportKind};
pub use ont::{OntField, OntKey, OntState, OntStatus, Reading};
pub use operation::{
    ErrorClass, HttpMethod, Operation, OperationKind, OperationRequest, OperationResult,
    OperationStatus, Outcome,
};
pub use value::{Binding, Value, ValueKind};
