// ── Operation request / result types ──

use serde::{Deserialize, Serialize};

use super::element::{ElementId, TransportKind};
use super::value::{Binding, Value};

// ── Request side ────────────────────────────────────────────────────

/// The four operation kinds every backend is addressed through.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OperationKind {
    ReadOne,
    EnumerateSubtree,
    WriteOne,
    InvokeEndpoint,
}

impl OperationKind {
    /// Writes are never replayed against a second transport.
    pub fn allows_failover(self) -> bool {
        !matches!(self, Self::WriteOne)
    }

    /// Results of this kind feed the ONT state projection.
    pub fn is_read(self) -> bool {
        matches!(self, Self::ReadOne | Self::EnumerateSubtree)
    }

    /// Whether a transport of `kind` can serve this operation at all.
    pub fn eligible_on(self, kind: TransportKind) -> bool {
        match self {
            Self::InvokeEndpoint => kind == TransportKind::Http,
            Self::ReadOne | Self::EnumerateSubtree | Self::WriteOne => true,
        }
    }
}

/// HTTP verb for free-form endpoint invocations.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// What to do, with the arguments each kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    ReadOne {
        target: String,
    },
    EnumerateSubtree {
        root: String,
    },
    WriteOne {
        target: String,
        value: Value,
    },
    InvokeEndpoint {
        path: String,
        #[serde(default)]
        method: HttpMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::ReadOne { .. } => OperationKind::ReadOne,
            Self::EnumerateSubtree { .. } => OperationKind::EnumerateSubtree,
            Self::WriteOne { .. } => OperationKind::WriteOne,
            Self::InvokeEndpoint { .. } => OperationKind::InvokeEndpoint,
        }
    }

    /// The object identifier, subtree root or endpoint path.
    pub fn target(&self) -> &str {
        match self {
            Self::ReadOne { target } | Self::WriteOne { target, .. } => target,
            Self::EnumerateSubtree { root } => root,
            Self::InvokeEndpoint { path, .. } => path,
        }
    }
}

/// One call against one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub element_id: ElementId,
    pub operation: Operation,
    /// Per-request transport preference. Overrides the element's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportKind>,
}

impl OperationRequest {
    pub fn new(element_id: impl Into<ElementId>, operation: Operation) -> Self {
        Self {
            element_id: element_id.into(),
            operation,
            transport: None,
        }
    }

    pub fn read(element_id: impl Into<ElementId>, target: impl Into<String>) -> Self {
        Self::new(element_id, Operation::ReadOne { target: target.into() })
    }

    pub fn enumerate(element_id: impl Into<ElementId>, root: impl Into<String>) -> Self {
        Self::new(element_id, Operation::EnumerateSubtree { root: root.into() })
    }

    pub fn write(element_id: impl Into<ElementId>, target: impl Into<String>, value: Value) -> Self {
        Self::new(
            element_id,
            Operation::WriteOne {
                target: target.into(),
                value,
            },
        )
    }

    pub fn invoke(
        element_id: impl Into<ElementId>,
        method: HttpMethod,
        path: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) -> Self {
        Self::new(
            element_id,
            Operation::InvokeEndpoint {
                path: path.into(),
                method,
                payload,
            },
        )
    }

    #[must_use]
    pub fn via(mut self, transport: TransportKind) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }
}

// ── Result side ─────────────────────────────────────────────────────

/// Failure taxonomy shared by every backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    Timeout,
    Unreachable,
    AuthenticationFailed,
    Unsupported,
    ProtocolError,
    Unknown,
}

impl ErrorClass {
    /// Transient classes worth another attempt on the same transport.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::Unreachable)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationStatus {
    Success,
    Failure,
}

/// Terminal outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        bindings: Vec<Binding>,
        /// Set when an enumeration stopped early but returned data.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        incomplete: Option<String>,
    },
    Failure {
        class: ErrorClass,
        detail: String,
    },
}

/// What `dispatch` hands back. Exactly one audit entry mirrors it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Transport that produced the outcome; `None` if nothing was attempted.
    pub transport: Option<TransportKind>,
    pub latency_ms: u64,
    /// Backend calls made, across retries and failover.
    pub attempts: u32,
}

impl OperationResult {
    pub fn success(bindings: Vec<Binding>, transport: TransportKind) -> Self {
        Self {
            outcome: Outcome::Success {
                bindings,
                incomplete: None,
            },
            transport: Some(transport),
            latency_ms: 0,
            attempts: 1,
        }
    }

    pub fn failure(class: ErrorClass, detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure {
                class,
                detail: detail.into(),
            },
            transport: None,
            latency_ms: 0,
            attempts: 0,
        }
    }

    pub fn status(&self) -> OperationStatus {
        match self.outcome {
            Outcome::Success { .. } => OperationStatus::Success,
            Outcome::Failure { .. } => OperationStatus::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success { .. })
    }

    pub fn bindings(&self) -> &[Binding] {
        match &self.outcome {
            Outcome::Success { bindings, .. } => bindings,
            Outcome::Failure { .. } => &[],
        }
    }

    pub fn error_class(&self) -> Option<ErrorClass> {
        match self.outcome {
            Outcome::Failure { class, .. } => Some(class),
            Outcome::Success { .. } => None,
        }
    }

    /// Failure detail, or the early-stop reason of a partial enumeration.
    pub fn detail(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure { detail, .. } => Some(detail),
            Outcome::Success { incomplete, .. } => incomplete.as_deref(),
        }
    }
}
