// Vendor HTTP gateway client
//
// Wraps `reqwest::Client` with per-element base URL + API prefix handling,
// optional basic auth, and the `{ data: [], meta: { rc, msg } }` envelope the
// OLT management gateways wrap MIB objects in. Free-form endpoints are
// returned as raw JSON.

use std::time::Duration;

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::snmp::{Oid, PartialWalk};
use crate::transport::TransportConfig;

// ── Wire shapes ──────────────────────────────────────────────────────

/// A management object as the gateway reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MibObject {
    pub oid: String,
    pub value: serde_json::Value,
    /// Optional ASN.1 type hint (`"integer"`, `"gauge32"`, `"octet_string"`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    meta: Meta,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    rc: String,
    #[serde(default)]
    msg: Option<String>,
}

/// Gateways sometimes answer errors as `{"error": {"code": N, "message": "..."}}`.
#[derive(Deserialize)]
struct GatewayError {
    error: Option<GatewayErrorInner>,
}

#[derive(Deserialize)]
struct GatewayErrorInner {
    code: u16,
    message: Option<String>,
}

/// Username/password for HTTP basic auth.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

impl PartialEq for BasicAuth {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one element's vendor REST gateway.
///
/// All URLs are `{base_url}{prefix}/{path}`. MIB objects live under
/// `{prefix}/mib/{oid}`.
pub struct VendorClient {
    http: reqwest::Client,
    base_url: Url,
    prefix: String,
    auth: Option<BasicAuth>,
}

impl VendorClient {
    /// Build a client with its own connection pool from a `TransportConfig`.
    pub fn new(
        base_url: &str,
        prefix: &str,
        auth: Option<BasicAuth>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, prefix, auth)
    }

    /// Wrap an existing `reqwest::Client` (shared pool across elements).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        prefix: &str,
        auth: Option<BasicAuth>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        let prefix = format!("/{}", prefix.trim_matches('/'));
        let prefix = if prefix == "/" { String::new() } else { prefix };
        Ok(Self {
            http,
            base_url,
            prefix,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}{prefix}/{path}`. Query strings in `path` are preserved.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}{}/{path}", self.prefix))?)
    }

    fn mib_path(oid: &Oid) -> String {
        format!("mib/{oid}")
    }

    // ── MIB object operations ────────────────────────────────────────

    /// `GET {prefix}/mib/{oid}` — exactly one object expected.
    pub async fn read_object(&self, oid: &Oid, timeout: Duration) -> Result<MibObject, Error> {
        let url = self.url(&Self::mib_path(oid))?;
        debug!("GET {url}");
        let resp = self.request(Method::GET, url, timeout).send().await?;
        let (objects, failure) = self.parse_envelope::<MibObject>(resp).await?;
        if let Some(err) = failure {
            return Err(err);
        }
        objects
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoSuchObject { oid: oid.to_string() })
    }

    /// `GET {prefix}/mib/{oid}?walk=true` — every object under `oid`.
    ///
    /// A gateway that fails mid-walk still returns what it collected, with
    /// `meta.rc = "error"`; that comes back as a partial walk.
    pub async fn walk_objects(&self, oid: &Oid, timeout: Duration) -> PartialWalk<MibObject> {
        let url = match self.url(&format!("{}?walk=true", Self::mib_path(oid))) {
            Ok(url) => url,
            Err(e) => return PartialWalk::failed(e),
        };
        debug!("GET {url}");
        let resp = match self.request(Method::GET, url, timeout).send().await {
            Ok(resp) => resp,
            Err(e) => return PartialWalk::failed(Error::Transport(e)),
        };
        match self.parse_envelope::<MibObject>(resp).await {
            Ok((items, error)) => PartialWalk { items, error },
            Err(e) => PartialWalk::failed(e),
        }
    }

    /// `PUT {prefix}/mib/{oid}` with `{"value": ...}`.
    pub async fn write_object(
        &self,
        oid: &Oid,
        value: &serde_json::Value,
        timeout: Duration,
    ) -> Result<(), Error> {
        let url = self.url(&Self::mib_path(oid))?;
        debug!("PUT {url}");
        let body = serde_json::json!({ "value": value });
        let resp = self
            .request(Method::PUT, url, timeout)
            .json(&body)
            .send()
            .await?;
        let (_, failure) = self.parse_envelope::<serde_json::Value>(resp).await?;
        failure.map_or(Ok(()), Err)
    }

    // ── Free-form endpoints ──────────────────────────────────────────

    /// `{method} {prefix}/{path}` with an optional JSON payload. Returns the
    /// decoded body (`Null` for empty responses).
    pub async fn invoke(
        &self,
        method: Method,
        path: &str,
        payload: Option<&serde_json::Value>,
        timeout: Duration,
    ) -> Result<serde_json::Value, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");
        let mut builder = self.request(method, url, timeout);
        if let Some(body) = payload {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        self.handle_response(resp).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn request(&self, method: Method, url: Url, timeout: Duration) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url).timeout(timeout);
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, Some(auth.password.expose_secret())),
            None => builder,
        }
    }

    /// Map status codes shared by every response shape.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("gateway rejected credentials (HTTP {})", status.as_u16()),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(resp)
    }

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        let body = if body.trim().is_empty() { "null".to_owned() } else { body };

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Parse the `{ meta, data }` envelope. `meta.rc != "ok"` keeps whatever
    /// `data` was delivered and reports the failure alongside it.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<(Vec<T>, Option<Error>), Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;

        if let Ok(wrapper) = serde_json::from_str::<GatewayError>(&body) {
            if let Some(err) = wrapper.error {
                let message = err.message.unwrap_or_default();
                return Err(match err.code {
                    401 | 403 => Error::Authentication { message },
                    code => Error::Http {
                        status: code,
                        message,
                    },
                });
            }
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok((envelope.data, None)),
            rc => {
                let message = envelope.meta.msg.unwrap_or_else(|| format!("rc={rc}"));
                Ok((envelope.data, Some(Error::Rejected { message })))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_prefix_and_path() {
        let client =
            VendorClient::with_client(reqwest::Client::new(), "https://10.0.0.2:8443/", "/api/v1/", None)
                .unwrap();
        assert_eq!(client.prefix(), "/api/v1");
        assert_eq!(
            client.url("/ont/list?frame=0").unwrap().as_str(),
            "https://10.0.0.2:8443/api/v1/ont/list?frame=0"
        );
    }

    #[test]
    fn empty_prefix_is_allowed() {
        let client =
            VendorClient::with_client(reqwest::Client::new(), "http://olt", "", None).unwrap();
        assert_eq!(client.url("mib/1.3.6.1").unwrap().as_str(), "http://olt/mib/1.3.6.1");
    }
}
