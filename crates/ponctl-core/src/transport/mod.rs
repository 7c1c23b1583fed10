// ── Transport backends ──
//
// One backend per protocol family, all addressed through the same four
// operations. Backends are stateless with respect to elements: every call
// carries the descriptor of the endpoint it targets.

mod http;
mod snmp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::convert;
use crate::model::{Binding, ErrorClass, HttpMethod, TransportKind, Value};
use crate::resolver::TransportDescriptor;

pub use http::HttpBackend;
pub use snmp::SnmpBackend;

/// A classified failure from a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub class: ErrorClass,
    pub detail: String,
}

impl BackendError {
    pub fn new(class: ErrorClass, detail: impl Into<String>) -> Self {
        Self {
            class,
            detail: detail.into(),
        }
    }

    pub fn unsupported(detail: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, detail)
    }

    pub(crate) fn descriptor_mismatch(expected: TransportKind, got: &TransportDescriptor) -> Self {
        Self::unsupported(format!(
            "{expected} backend cannot use a {} endpoint",
            got.kind()
        ))
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.class, self.detail)
    }
}

impl From<ponctl_api::Error> for BackendError {
    fn from(err: ponctl_api::Error) -> Self {
        Self {
            class: convert::classify(&err),
            detail: err.to_string(),
        }
    }
}

/// Bindings gathered by an enumeration, and the failure that cut it short
/// if any. Both may be present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enumeration {
    pub bindings: Vec<Binding>,
    pub error: Option<BackendError>,
}

impl Enumeration {
    pub fn failed(error: BackendError) -> Self {
        Self {
            bindings: Vec::new(),
            error: Some(error),
        }
    }
}

/// The uniform operation surface every protocol backend implements.
///
/// `timeout` bounds each request the backend puts on the wire. Protocol
/// errors come back classified; nothing here panics on device input.
#[async_trait]
pub trait TransportBackend: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn read_one(
        &self,
        endpoint: &TransportDescriptor,
        target: &str,
        timeout: Duration,
    ) -> Result<Binding, BackendError>;

    async fn enumerate_subtree(
        &self,
        endpoint: &TransportDescriptor,
        root: &str,
        timeout: Duration,
    ) -> Enumeration;

    async fn write_one(
        &self,
        endpoint: &TransportDescriptor,
        target: &str,
        value: &Value,
        timeout: Duration,
    ) -> Result<(), BackendError>;

    async fn invoke_endpoint(
        &self,
        _endpoint: &TransportDescriptor,
        _method: HttpMethod,
        path: &str,
        _payload: Option<&serde_json::Value>,
        _timeout: Duration,
    ) -> Result<serde_json::Value, BackendError> {
        Err(BackendError::unsupported(format!(
            "{} cannot invoke endpoint {path}",
            self.kind()
        )))
    }
}

/// The installed backend per transport kind.
#[derive(Clone, Default)]
pub struct Backends {
    snmp: Option<Arc<dyn TransportBackend>>,
    http: Option<Arc<dyn TransportBackend>>,
}

impl Backends {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `backend` under the kind it reports.
    #[must_use]
    pub fn with(mut self, backend: Arc<dyn TransportBackend>) -> Self {
        match backend.kind() {
            TransportKind::Snmp => self.snmp = Some(backend),
            TransportKind::Http => self.http = Some(backend),
        }
        self
    }

    pub fn get(&self, kind: TransportKind) -> Option<&Arc<dyn TransportBackend>> {
        match kind {
            TransportKind::Snmp => self.snmp.as_ref(),
            TransportKind::Http => self.http.as_ref(),
        }
    }
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("snmp", &self.snmp.is_some())
            .field("http", &self.http.is_some())
            .finish()
    }
}
