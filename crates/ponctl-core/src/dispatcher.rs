// ── Operation dispatcher ──
//
// Single entry point for every operation against an element: resolve the
// transport plan, run attempts with retry and failover, record exactly one
// audit entry, and feed read results to the ONT projection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::audit::{AuditLog, AuditQuery, MemoryAuditLog};
use crate::config::DispatchPolicy;
use crate::error::CoreError;
use crate::model::{
    AuditLogEntry, Binding, ElementConfig, ElementId, ErrorClass, OntState, Operation,
    OperationRequest, OperationResult, Outcome, TransportKind, Value,
};
use crate::monitor::MonitoredAttributes;
use crate::projector::StateProjector;
use crate::registry::CapabilityRegistry;
use crate::resolver::{TransportDescriptor, TransportPlan, build_transport_plan};
use crate::store::{ElementDirectory, OntStore};
use crate::transport::{BackendError, Backends, TransportBackend};

// ── Builder ─────────────────────────────────────────────────────────

/// Assembles a [`Dispatcher`]. Only the registry and element directory are
/// required; everything else has an in-process default.
pub struct DispatcherBuilder {
    registry: Arc<CapabilityRegistry>,
    elements: Arc<dyn ElementDirectory>,
    backends: Backends,
    audit: Option<Arc<dyn AuditLog>>,
    onts: Option<Arc<OntStore>>,
    attributes: MonitoredAttributes,
    policy: DispatchPolicy,
}

impl DispatcherBuilder {
    #[must_use]
    pub fn backend(mut self, backend: Arc<dyn TransportBackend>) -> Self {
        self.backends = self.backends.with(backend);
        self
    }

    #[must_use]
    pub fn audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    #[must_use]
    pub fn ont_store(mut self, onts: Arc<OntStore>) -> Self {
        self.onts = Some(onts);
        self
    }

    #[must_use]
    pub fn monitored_attributes(mut self, attributes: MonitoredAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Dispatcher {
        let audit = self
            .audit
            .unwrap_or_else(|| Arc::new(MemoryAuditLog::new()));
        let onts = self.onts.unwrap_or_else(OntStore::shared);
        let permits = self.policy.max_in_flight.max(1);

        Dispatcher {
            inner: Arc::new(DispatcherInner {
                registry: self.registry,
                elements: self.elements,
                backends: self.backends,
                audit,
                projector: StateProjector::new(self.attributes, onts),
                lanes: DashMap::new(),
                in_flight: Semaphore::new(permits),
                policy: self.policy,
            }),
        }
    }
}

// ── Dispatcher ──────────────────────────────────────────────────────

/// Routes operations to backends.
///
/// Cheaply cloneable. Operations against the same element run one at a
/// time in arrival order; different elements run concurrently up to
/// `max_in_flight`.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    policy: DispatchPolicy,
    registry: Arc<CapabilityRegistry>,
    elements: Arc<dyn ElementDirectory>,
    backends: Backends,
    audit: Arc<dyn AuditLog>,
    projector: StateProjector,
    /// Per-element FIFO lanes, created on first use.
    lanes: DashMap<ElementId, Arc<Mutex<()>>>,
    in_flight: Semaphore,
}

/// A successful backend call, before it becomes a result.
struct Attempted {
    bindings: Vec<Binding>,
    incomplete: Option<String>,
}

impl Attempted {
    fn single(binding: Binding) -> Self {
        Self {
            bindings: vec![binding],
            incomplete: None,
        }
    }
}

impl Dispatcher {
    pub fn builder(
        registry: Arc<CapabilityRegistry>,
        elements: Arc<dyn ElementDirectory>,
    ) -> DispatcherBuilder {
        DispatcherBuilder {
            registry,
            elements,
            backends: Backends::new(),
            audit: None,
            onts: None,
            attributes: MonitoredAttributes::builtin(),
            policy: DispatchPolicy::default(),
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.inner.registry
    }

    pub fn policy(&self) -> &DispatchPolicy {
        &self.inner.policy
    }

    pub fn onts(&self) -> &Arc<OntStore> {
        self.inner.projector.onts()
    }

    /// The transport plan a dispatch to `element_id` would use.
    pub fn plan(
        &self,
        element_id: &ElementId,
        preference: Option<TransportKind>,
    ) -> Result<TransportPlan, CoreError> {
        let element =
            self.inner
                .elements
                .element(element_id)
                .ok_or_else(|| CoreError::ElementNotFound {
                    identifier: element_id.to_string(),
                })?;
        Ok(build_transport_plan(
            &self.inner.registry,
            &element,
            preference,
        ))
    }

    /// Most recent audit entries matching `query`, newest first.
    pub async fn query_audit_log(
        &self,
        query: &AuditQuery,
    ) -> Result<Vec<AuditLogEntry>, CoreError> {
        self.inner.audit.query(query).await
    }

    /// Projected state of every registered ONT behind `element_id`.
    pub fn ont_state(&self, element_id: &ElementId) -> Vec<OntState> {
        self.onts().for_element(element_id)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Execute `request` and return its outcome. Never panics on device
    /// behaviour; every outcome is audited.
    pub async fn dispatch(&self, request: OperationRequest) -> OperationResult {
        self.dispatch_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// [`dispatch`](Self::dispatch) with caller-driven cancellation.
    ///
    /// A cancelled dispatch still produces its audit entry, classified
    /// `Unknown`, noting whether anything reached the wire.
    pub async fn dispatch_with_cancel(
        &self,
        request: OperationRequest,
        cancel: &CancellationToken,
    ) -> OperationResult {
        if self.inner.elements.element(&request.element_id).is_none() {
            let result = OperationResult::failure(
                ErrorClass::Unsupported,
                format!("unknown element {}", request.element_id),
            );
            return self.finish(&request, result, Some(Instant::now())).await;
        }
        let lane = self.lane(&request.element_id);

        // Held through the audit write so log order follows arrival order.
        let Some(_turn) = Self::until_cancelled(cancel, lane.lock_owned()).await else {
            return self.finish(&request, cancelled(None, 0), None).await;
        };
        let started = Instant::now();
        let _permit = match Self::until_cancelled(cancel, self.inner.in_flight.acquire()).await {
            Some(Ok(permit)) => permit,
            Some(Err(_)) => {
                let result = OperationResult::failure(ErrorClass::Unknown, "dispatcher closed");
                return self.finish(&request, result, Some(started)).await;
            }
            None => return self.finish(&request, cancelled(None, 0), Some(started)).await,
        };

        let result = self.execute(&request, cancel).await;
        self.finish(&request, result, Some(started)).await
    }

    /// Elements that have had a dispatch queued.
    pub fn lane_count(&self) -> usize {
        self.inner.lanes.len()
    }

    fn lane(&self, element_id: &ElementId) -> Arc<Mutex<()>> {
        self.inner
            .lanes
            .entry(element_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    async fn until_cancelled<T>(
        cancel: &CancellationToken,
        fut: impl Future<Output = T>,
    ) -> Option<T> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            value = fut => Some(value),
        }
    }

    async fn execute(
        &self,
        request: &OperationRequest,
        cancel: &CancellationToken,
    ) -> OperationResult {
        let element = match self.inner.elements.element(&request.element_id) {
            Some(element) if element.active => element,
            Some(_) => {
                return OperationResult::failure(
                    ErrorClass::Unsupported,
                    format!("element {} is deactivated", request.element_id),
                );
            }
            None => {
                return OperationResult::failure(
                    ErrorClass::Unsupported,
                    format!("unknown element {}", request.element_id),
                );
            }
        };

        let kind = request.kind();
        let plan = build_transport_plan(&self.inner.registry, &element, request.transport);
        let candidates = self.candidates(&element, &plan, request);
        if candidates.is_empty() {
            return OperationResult::failure(
                ErrorClass::Unsupported,
                format!(
                    "no eligible transport for {kind} on {} {} (plan: {:?})",
                    element.vendor,
                    element.model,
                    plan.kinds()
                ),
            );
        }

        let retry = self.inner.policy.retry;
        let mut attempts = 0u32;
        let mut last: Option<(TransportKind, BackendError)> = None;

        for (index, (descriptor, backend)) in candidates.iter().enumerate() {
            let transport = descriptor.kind();
            if index > 0 {
                warn!(
                    element = %element.id,
                    %kind,
                    %transport,
                    "failing over"
                );
            }

            for attempt in 1..=retry.max_attempts() {
                attempts += 1;
                let call = self.attempt(backend.as_ref(), descriptor, &request.operation);
                let Some(outcome) = Self::until_cancelled(cancel, call).await else {
                    return cancelled(Some(transport), attempts);
                };

                match outcome {
                    Ok(done) => {
                        return OperationResult {
                            outcome: Outcome::Success {
                                bindings: done.bindings,
                                incomplete: done.incomplete,
                            },
                            transport: Some(transport),
                            latency_ms: 0,
                            attempts,
                        };
                    }
                    Err(err) => {
                        let again = err.class.is_retryable() && attempt < retry.max_attempts();
                        warn!(
                            element = %element.id,
                            %kind,
                            %transport,
                            attempt,
                            class = %err.class,
                            detail = %err.detail,
                            retrying = again,
                            "attempt failed"
                        );
                        last = Some((transport, err));
                        if !again {
                            break;
                        }
                        let pause = tokio::time::sleep(retry.backoff);
                        if Self::until_cancelled(cancel, pause).await.is_none() {
                            return cancelled(Some(transport), attempts);
                        }
                    }
                }
            }

            if !kind.allows_failover() {
                break;
            }
        }

        match last {
            Some((transport, err)) => OperationResult {
                outcome: Outcome::Failure {
                    class: err.class,
                    detail: err.detail,
                },
                transport: Some(transport),
                latency_ms: 0,
                attempts,
            },
            None => OperationResult::failure(ErrorClass::Unknown, "no attempt was made"),
        }
    }

    /// Plan entries that can serve `request` and have a backend installed.
    fn candidates<'p>(
        &self,
        element: &ElementConfig,
        plan: &'p TransportPlan,
        request: &OperationRequest,
    ) -> Vec<(&'p TransportDescriptor, Arc<dyn TransportBackend>)> {
        plan.entries
            .iter()
            .filter(|d| request.kind().eligible_on(d.kind()))
            .filter_map(|d| match self.inner.backends.get(d.kind()) {
                Some(backend) => Some((d, Arc::clone(backend))),
                None => {
                    debug!(element = %element.id, transport = %d.kind(), "no backend installed");
                    None
                }
            })
            .collect()
    }

    async fn attempt(
        &self,
        backend: &dyn TransportBackend,
        descriptor: &TransportDescriptor,
        operation: &Operation,
    ) -> Result<Attempted, BackendError> {
        let timeout = self.inner.policy.attempt_timeout;

        // Walks are bounded per request inside the backend, so a stall keeps
        // the bindings gathered before it.
        if let Operation::EnumerateSubtree { root } = operation {
            return enumerate(backend, descriptor, root, timeout).await;
        }

        match tokio::time::timeout(timeout, call(backend, descriptor, operation, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::new(
                ErrorClass::Timeout,
                format!("no response within {}ms", timeout.as_millis()),
            )),
        }
    }

    /// Stamp latency, audit, project. Runs exactly once per dispatch.
    async fn finish(
        &self,
        request: &OperationRequest,
        mut result: OperationResult,
        started: Option<Instant>,
    ) -> OperationResult {
        if let Some(started) = started {
            result.latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        }

        let entry = AuditLogEntry::from_dispatch(request, &result);
        let observed_at = entry.timestamp;
        if let Err(e) = self.inner.audit.record(entry).await {
            warn!(
                element = %request.element_id,
                error = %e,
                "failed to write audit entry"
            );
        }

        if result.is_success() && request.kind().is_read() {
            self.inner
                .projector
                .project(&request.element_id, result.bindings(), observed_at);
        }

        info!(
            element = %request.element_id,
            operation = %request.kind(),
            target = request.operation.target(),
            transport = ?result.transport,
            status = %result.status(),
            class = ?result.error_class(),
            attempts = result.attempts,
            latency_ms = result.latency_ms,
            "dispatch complete"
        );
        result
    }
}

async fn call(
    backend: &dyn TransportBackend,
    descriptor: &TransportDescriptor,
    operation: &Operation,
    timeout: Duration,
) -> Result<Attempted, BackendError> {
    match operation {
        Operation::ReadOne { target } => {
            let binding = backend.read_one(descriptor, target, timeout).await?;
            Ok(Attempted::single(binding))
        }
        Operation::EnumerateSubtree { root } => enumerate(backend, descriptor, root, timeout).await,
        Operation::WriteOne { target, value } => {
            backend.write_one(descriptor, target, value, timeout).await?;
            Ok(Attempted::single(Binding::new(target.clone(), value.clone())))
        }
        Operation::InvokeEndpoint {
            path,
            method,
            payload,
        } => {
            let body = backend
                .invoke_endpoint(descriptor, *method, path, payload.as_ref(), timeout)
                .await?;
            Ok(Attempted::single(Binding::new(path.clone(), Value::Json(body))))
        }
    }
}

/// A non-empty partial walk counts as success; an empty one as failure.
async fn enumerate(
    backend: &dyn TransportBackend,
    descriptor: &TransportDescriptor,
    root: &str,
    timeout: Duration,
) -> Result<Attempted, BackendError> {
    let walk = backend.enumerate_subtree(descriptor, root, timeout).await;
    match walk.error {
        None => Ok(Attempted {
            bindings: walk.bindings,
            incomplete: None,
        }),
        Some(err) if walk.bindings.is_empty() => Err(err),
        Some(err) => {
            warn!(
                %root,
                collected = walk.bindings.len(),
                class = %err.class,
                "enumeration stopped early; keeping partial result"
            );
            Ok(Attempted {
                bindings: walk.bindings,
                incomplete: Some(err.to_string()),
            })
        }
    }
}

fn cancelled(transport: Option<TransportKind>, attempts: u32) -> OperationResult {
    let detail = if attempts == 0 {
        "cancelled before any attempt".to_owned()
    } else {
        format!("cancelled after {attempts} attempt(s); the operation may have reached the element")
    };
    OperationResult {
        outcome: Outcome::Failure {
            class: ErrorClass::Unknown,
            detail,
        },
        transport,
        latency_ms: 0,
        attempts,
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("policy", &self.inner.policy)
            .field("backends", &self.inner.backends)
            .field("lanes", &self.inner.lanes.len())
            .finish_non_exhaustive()
    }
}
