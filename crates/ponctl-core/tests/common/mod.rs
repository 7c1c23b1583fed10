// Shared fakes for dispatcher integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ponctl_core::audit::AuditLog;
use ponctl_core::transport::Enumeration;
use ponctl_core::{
    AuditLogEntry, AuditQuery, BackendError, Binding, CapabilityRegistry, CoreError,
    DispatchPolicy, Dispatcher, ElementConfig, ElementStore, ErrorClass, HttpMethod,
    MemoryAuditLog, OntStore, RetryPolicy, TransportBackend, TransportDescriptor, TransportKind,
    Value,
};

// ── Scripted backend ────────────────────────────────────────────────

/// What the next backend call does.
#[derive(Debug, Clone)]
pub enum Step {
    Ok(Value),
    Fail(ErrorClass),
    /// Bindings followed by a mid-walk failure.
    Partial(Vec<Binding>, ErrorClass),
    /// Never answers.
    Hang,
    /// Answers after a delay.
    Slow(Duration, Value),
}

/// Backend that replays a script and records every call.
pub struct ScriptedBackend {
    kind: TransportKind,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: Mutex<Vec<String>>,
    events: Option<EventLog>,
}

impl ScriptedBackend {
    pub fn new(kind: TransportKind) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            fallback: Step::Ok(Value::Integer(0)),
            calls: Mutex::new(Vec::new()),
            events: None,
        }
    }

    pub fn then(self, step: Step) -> Self {
        self.script.lock().unwrap().push_back(step);
        self
    }

    pub fn always(mut self, step: Step) -> Self {
        self.fallback = step;
        self
    }

    pub fn with_events(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next(&self, call: String) -> Step {
        self.calls.lock().unwrap().push(call);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    async fn play(&self, step: Step) -> Result<Value, BackendError> {
        match step {
            Step::Ok(v) => Ok(v),
            Step::Fail(class) => Err(BackendError::new(class, format!("scripted {class}"))),
            Step::Partial(..) => Err(BackendError::new(ErrorClass::ProtocolError, "partial")),
            Step::Hang => std::future::pending().await,
            Step::Slow(delay, v) => {
                tokio::time::sleep(delay).await;
                Ok(v)
            }
        }
    }
}

#[async_trait]
impl TransportBackend for ScriptedBackend {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn read_one(
        &self,
        _endpoint: &TransportDescriptor,
        target: &str,
        _timeout: Duration,
    ) -> Result<Binding, BackendError> {
        let step = self.next(format!("read {target}"));
        let value = self.play(step).await?;
        Ok(Binding::new(target, value))
    }

    async fn enumerate_subtree(
        &self,
        _endpoint: &TransportDescriptor,
        root: &str,
        _timeout: Duration,
    ) -> Enumeration {
        match self.next(format!("walk {root}")) {
            Step::Partial(bindings, class) => Enumeration {
                bindings,
                error: Some(BackendError::new(class, "walk interrupted")),
            },
            step => match self.play(step).await {
                Ok(value) => Enumeration {
                    bindings: vec![Binding::new(format!("{root}.1"), value)],
                    error: None,
                },
                Err(e) => Enumeration::failed(e),
            },
        }
    }

    async fn write_one(
        &self,
        _endpoint: &TransportDescriptor,
        target: &str,
        value: &Value,
        _timeout: Duration,
    ) -> Result<(), BackendError> {
        let step = self.next(format!("write {target}={value}"));
        self.play(step).await?;
        if let Some(events) = &self.events {
            events.push(format!("write {value}"));
        }
        Ok(())
    }

    async fn invoke_endpoint(
        &self,
        _endpoint: &TransportDescriptor,
        method: HttpMethod,
        path: &str,
        _payload: Option<&serde_json::Value>,
        _timeout: Duration,
    ) -> Result<serde_json::Value, BackendError> {
        if self.kind != TransportKind::Http {
            return Err(BackendError::unsupported("invoke"));
        }
        let step = self.next(format!("{method} {path}"));
        let value = self.play(step).await?;
        Ok(serde_json::json!({ "result": value.to_string() }))
    }
}

// ── Event log shared between fakes ──────────────────────────────────

#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Audit log that also records into an [`EventLog`].
pub struct RecordingAudit {
    pub inner: MemoryAuditLog,
    pub events: EventLog,
}

#[async_trait]
impl AuditLog for RecordingAudit {
    async fn record(&self, entry: AuditLogEntry) -> Result<(), CoreError> {
        self.events.push(format!("audit {}", entry.status));
        self.inner.record(entry).await
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditLogEntry>, CoreError> {
        self.inner.query(query).await
    }
}

/// Audit log whose storage is broken.
pub struct BrokenAudit;

#[async_trait]
impl AuditLog for BrokenAudit {
    async fn record(&self, _entry: AuditLogEntry) -> Result<(), CoreError> {
        Err(CoreError::AuditIo {
            path: "/dev/full".into(),
            source: std::io::Error::other("no space left on device"),
        })
    }

    async fn query(&self, _query: &AuditQuery) -> Result<Vec<AuditLogEntry>, CoreError> {
        Ok(Vec::new())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub const RX_POWER: &str = "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4";
pub const ZTE_RX_POWER: &str = "1.3.6.1.4.1.3902.1012.3.50.12.1.1.10";

pub fn hybrid_olt() -> ElementConfig {
    ElementConfig::new("olt-x7", "huawei", "MA5800-X7", "10.20.0.2")
}

pub fn snmp_only_olt() -> ElementConfig {
    ElementConfig::new("olt-c220", "zte", "C220", "10.20.0.3")
}

pub fn policy() -> DispatchPolicy {
    DispatchPolicy {
        attempt_timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            retries: 1,
            backoff: Duration::from_millis(250),
        },
        max_in_flight: 8,
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub audit: Arc<MemoryAuditLog>,
    pub elements: Arc<ElementStore>,
    pub onts: Arc<OntStore>,
}

pub fn harness(
    elements: Vec<ElementConfig>,
    backends: Vec<Arc<dyn TransportBackend>>,
) -> Harness {
    let audit = Arc::new(MemoryAuditLog::new());
    let elements = Arc::new(ElementStore::from_elements(elements));
    let onts = OntStore::shared();
    let mut builder = Dispatcher::builder(
        Arc::new(CapabilityRegistry::builtin().unwrap()),
        elements.clone(),
    )
    .audit_log(audit.clone())
    .ont_store(onts.clone())
    .policy(policy());
    for backend in backends {
        builder = builder.backend(backend);
    }
    Harness {
        dispatcher: builder.build(),
        audit,
        elements,
        onts,
    }
}
