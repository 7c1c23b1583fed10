// ponctl-core: protocol-agnostic operations against multi-vendor OLTs.
//
// Capability registry and transport resolution, the SNMP / HTTP backends
// behind one operation surface, the dispatcher with retry, failover and
// per-element ordering, the audit log, and the ONT state projection.

pub mod audit;
pub mod config;
pub mod convert;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod monitor;
pub mod projector;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use audit::{AuditLog, AuditQuery, JsonlAuditLog, MemoryAuditLog};
pub use config::{DispatchPolicy, RetryPolicy};
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::CoreError;
pub use monitor::MonitoredAttributes;
pub use projector::StateProjector;
pub use registry::{CapabilityEntry, CapabilityRegistry};
pub use resolver::{TransportDescriptor, TransportPlan, build_transport_plan};
pub use store::{ElementDirectory, ElementStore, OntStore};
pub use transport::{BackendError, Backends, Enumeration, HttpBackend, SnmpBackend, TransportBackend};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AuditLogEntry, Binding, ElementConfig, ElementId, ErrorClass, HttpMethod, HttpParams,
    OntField, OntKey, OntState, OntStatus, Operation, OperationKind, OperationRequest,
    OperationResult, OperationStatus, Outcome, Reading, SnmpParams, TransportKind, Value,
    ValueKind,
};
