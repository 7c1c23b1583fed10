// ── SNMP backend ──

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ponctl_api::snmp::{self as api_snmp, DEFAULT_WALK_LIMIT};
use ponctl_api::{Oid, SnmpSession, SnmpTarget};
use tracing::debug;

use super::{BackendError, Enumeration, TransportBackend};
use crate::convert;
use crate::model::{Binding, TransportKind, Value};
use crate::resolver::{SnmpEndpoint, TransportDescriptor};

/// Drives any [`SnmpSession`] codec through the uniform backend surface.
pub struct SnmpBackend {
    session: Arc<dyn SnmpSession>,
    walk_limit: usize,
}

impl SnmpBackend {
    pub fn new(session: Arc<dyn SnmpSession>) -> Self {
        Self {
            session,
            walk_limit: DEFAULT_WALK_LIMIT,
        }
    }

    #[must_use]
    pub fn with_walk_limit(mut self, limit: usize) -> Self {
        self.walk_limit = limit;
        self
    }

    fn target(endpoint: &TransportDescriptor, timeout: Duration) -> Result<SnmpTarget, BackendError> {
        let TransportDescriptor::Snmp(SnmpEndpoint {
            host,
            port,
            credentials,
        }) = endpoint
        else {
            return Err(BackendError::descriptor_mismatch(TransportKind::Snmp, endpoint));
        };
        Ok(SnmpTarget {
            host: host.clone(),
            port: *port,
            credentials: credentials.clone(),
            timeout,
        })
    }
}

fn parse_oid(raw: &str) -> Result<Oid, BackendError> {
    raw.parse::<Oid>().map_err(BackendError::from)
}

/// Bound one PDU exchange by `timeout`, whatever the codec does.
async fn bounded<T>(
    timeout: Duration,
    request: impl Future<Output = Result<T, ponctl_api::Error>>,
) -> Result<T, BackendError> {
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result.map_err(BackendError::from),
        Err(_) => Err(ponctl_api::Error::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
        .into()),
    }
}

#[async_trait]
impl TransportBackend for SnmpBackend {
    fn kind(&self) -> TransportKind {
        TransportKind::Snmp
    }

    async fn read_one(
        &self,
        endpoint: &TransportDescriptor,
        target: &str,
        timeout: Duration,
    ) -> Result<Binding, BackendError> {
        let agent = Self::target(endpoint, timeout)?;
        let oid = parse_oid(target)?;
        debug!(agent = %agent.endpoint(), %oid, "snmp get");

        let value = bounded(timeout, self.session.get(&agent, &oid)).await?;
        if value.is_exception() {
            return Err(ponctl_api::Error::NoSuchObject {
                oid: oid.to_string(),
            }
            .into());
        }
        Ok(Binding::new(oid.to_string(), convert::value_from_snmp(value)))
    }

    async fn enumerate_subtree(
        &self,
        endpoint: &TransportDescriptor,
        root: &str,
        timeout: Duration,
    ) -> Enumeration {
        let agent = match Self::target(endpoint, timeout) {
            Ok(agent) => agent,
            Err(e) => return Enumeration::failed(e),
        };
        let root = match parse_oid(root) {
            Ok(oid) => oid,
            Err(e) => return Enumeration::failed(e),
        };
        debug!(agent = %agent.endpoint(), %root, "snmp walk");

        let walk = api_snmp::walk(self.session.as_ref(), &agent, &root, self.walk_limit).await;
        Enumeration {
            bindings: walk.items.into_iter().map(convert::binding_from_varbind).collect(),
            error: walk.error.map(BackendError::from),
        }
    }

    async fn write_one(
        &self,
        endpoint: &TransportDescriptor,
        target: &str,
        value: &Value,
        timeout: Duration,
    ) -> Result<(), BackendError> {
        let agent = Self::target(endpoint, timeout)?;
        let oid = parse_oid(target)?;
        let encoded = convert::value_to_snmp(value).ok_or_else(|| {
            BackendError::unsupported(format!("{} value cannot be encoded for SNMP", value.kind()))
        })?;
        debug!(agent = %agent.endpoint(), %oid, "snmp set");

        bounded(timeout, self.session.set(&agent, &oid, encoded)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ErrorClass, ValueKind};
    use ponctl_api::{MibTable, SnmpCredentials, SnmpValue, SnmpVersion};

    const RX: &str = "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4";

    fn endpoint(community: &str) -> TransportDescriptor {
        TransportDescriptor::Snmp(SnmpEndpoint {
            host: "10.0.0.1".into(),
            port: 161,
            credentials: SnmpCredentials::Community {
                version: SnmpVersion::V2c,
                community: community.to_owned().into(),
            },
        })
    }

    fn backend() -> SnmpBackend {
        let table = MibTable::new().with_community("noc");
        table.insert(format!("{RX}.4194312192.1").parse().unwrap(), SnmpValue::Integer(-1720));
        table.insert(format!("{RX}.4194312192.2").parse().unwrap(), SnmpValue::Integer(-2101));
        SnmpBackend::new(Arc::new(table))
    }

    const T: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn reads_one_object() {
        let b = backend()
            .read_one(&endpoint("noc"), &format!("{RX}.4194312192.2"), T)
            .await
            .unwrap();
        assert_eq!(b.value, Value::Integer(-2101));
        assert_eq!(b.kind, ValueKind::Integer);
    }

    #[tokio::test]
    async fn missing_object_is_unsupported() {
        let err = backend()
            .read_one(&endpoint("noc"), &format!("{RX}.4194312192.9"), T)
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Unsupported);
    }

    #[tokio::test]
    async fn non_numeric_target_is_unsupported() {
        let err = backend()
            .read_one(&endpoint("noc"), "ifDescr.1", T)
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Unsupported);
    }

    #[tokio::test]
    async fn wrong_community_is_auth_failure() {
        let err = backend()
            .read_one(&endpoint("public"), &format!("{RX}.4194312192.1"), T)
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::AuthenticationFailed);
    }

    #[tokio::test]
    async fn enumerates_subtree_in_order() {
        let walk = backend().enumerate_subtree(&endpoint("noc"), RX, T).await;
        assert!(walk.error.is_none());
        let ids: Vec<_> = walk.bindings.iter().map(|b| b.identifier.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.1",
                "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.2",
            ]
        );
    }

    #[tokio::test]
    async fn json_values_cannot_be_set() {
        let err = backend()
            .write_one(
                &endpoint("noc"),
                &format!("{RX}.4194312192.1"),
                &Value::Json(serde_json::json!({})),
                T,
            )
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Unsupported);
    }

    #[tokio::test]
    async fn invoke_is_not_available() {
        let err = backend()
            .invoke_endpoint(&endpoint("noc"), crate::model::HttpMethod::Get, "/x", None, T)
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Unsupported);
    }
}
