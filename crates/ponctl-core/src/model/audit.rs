// ── Audit log record ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::element::{ElementId, TransportKind};
use super::operation::{ErrorClass, OperationKind, OperationRequest, OperationResult, OperationStatus};

/// One durable record per dispatched operation, whatever its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub element_id: ElementId,
    pub operation: OperationKind,
    pub target: String,
    pub transport: Option<TransportKind>,
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_class: Option<ErrorClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub latency_ms: u64,
    pub attempts: u32,
    pub value_count: usize,
}

impl AuditLogEntry {
    pub fn from_dispatch(request: &OperationRequest, result: &OperationResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            element_id: request.element_id.clone(),
            operation: request.kind(),
            target: request.operation.target().to_owned(),
            transport: result.transport,
            status: result.status(),
            error_class: result.error_class(),
            detail: result.detail().map(str::to_owned),
            latency_ms: result.latency_ms,
            attempts: result.attempts,
            value_count: result.bindings().len(),
        }
    }
}
