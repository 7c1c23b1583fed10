// ── Vendor HTTP gateway backend ──

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use ponctl_api::http::Method;
use ponctl_api::{Oid, TlsMode, TransportConfig, VendorClient};
use tracing::debug;

use super::{BackendError, Enumeration, TransportBackend};
use crate::convert;
use crate::model::{Binding, HttpMethod, TransportKind, Value};
use crate::resolver::{HttpEndpoint, TransportDescriptor};

/// Talks to vendor REST gateways. Connection pools are shared per TLS
/// mode, so elements with the same trust settings reuse sockets.
pub struct HttpBackend {
    pools: DashMap<TlsMode, reqwest::Client>,
    transport: TransportConfig,
}

impl HttpBackend {
    pub fn new(transport: TransportConfig) -> Self {
        Self {
            pools: DashMap::new(),
            transport,
        }
    }

    fn pool(&self, tls: &TlsMode) -> Result<reqwest::Client, BackendError> {
        if let Some(client) = self.pools.get(tls) {
            return Ok(client.clone());
        }
        let config = TransportConfig {
            tls: tls.clone(),
            ..self.transport.clone()
        };
        let client = config.build_client()?;
        Ok(self.pools.entry(tls.clone()).or_insert(client).clone())
    }

    fn client(&self, endpoint: &TransportDescriptor) -> Result<VendorClient, BackendError> {
        let TransportDescriptor::Http(HttpEndpoint {
            base_url,
            prefix,
            auth,
            tls,
        }) = endpoint
        else {
            return Err(BackendError::descriptor_mismatch(TransportKind::Http, endpoint));
        };
        Ok(VendorClient::with_client(
            self.pool(tls)?,
            base_url.as_str(),
            prefix,
            auth.clone(),
        )?)
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

fn parse_oid(raw: &str) -> Result<Oid, BackendError> {
    raw.parse::<Oid>().map_err(BackendError::from)
}

fn method(m: HttpMethod) -> Method {
    match m {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl TransportBackend for HttpBackend {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn read_one(
        &self,
        endpoint: &TransportDescriptor,
        target: &str,
        timeout: Duration,
    ) -> Result<Binding, BackendError> {
        let client = self.client(endpoint)?;
        let oid = parse_oid(target)?;
        let object = client.read_object(&oid, timeout).await?;
        Ok(convert::binding_from_object(object))
    }

    async fn enumerate_subtree(
        &self,
        endpoint: &TransportDescriptor,
        root: &str,
        timeout: Duration,
    ) -> Enumeration {
        let (client, root) = match self.client(endpoint).and_then(|c| Ok((c, parse_oid(root)?))) {
            Ok(pair) => pair,
            Err(e) => return Enumeration::failed(e),
        };

        let walk = client.walk_objects(&root, timeout).await;
        let mut bindings: Vec<Binding> = walk
            .items
            .into_iter()
            .map(convert::binding_from_object)
            .collect();
        // Gateways are not required to return objects in OID order.
        bindings.sort_by_cached_key(|b| b.identifier.parse::<Oid>().ok());
        debug!(%root, count = bindings.len(), complete = walk.error.is_none(), "gateway walk");

        Enumeration {
            bindings,
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
        let client = self.client(endpoint)?;
        let oid = parse_oid(target)?;
        client
            .write_object(&oid, &convert::value_to_json(value), timeout)
            .await?;
        Ok(())
    }

    async fn invoke_endpoint(
        &self,
        endpoint: &TransportDescriptor,
        verb: HttpMethod,
        path: &str,
        payload: Option<&serde_json::Value>,
        timeout: Duration,
    ) -> Result<serde_json::Value, BackendError> {
        let client = self.client(endpoint)?;
        Ok(client.invoke(method(verb), path, payload, timeout).await?)
    }
}
