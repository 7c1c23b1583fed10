// ── Managed element types ──

use std::fmt;

use ponctl_api::{BasicAuth, SnmpCredentials, TlsMode};
use serde::{Deserialize, Serialize};
use url::Url;

// ── ElementId ───────────────────────────────────────────────────────

/// Operator-assigned identifier of an OLT (`olt-cwb-01`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── TransportKind ───────────────────────────────────────────────────

/// Management protocol family.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransportKind {
    Snmp,
    Http,
}

// ── Connection parameters ───────────────────────────────────────────

/// SNMP agent parameters for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct SnmpParams {
    pub port: u16,
    pub credentials: SnmpCredentials,
}

impl SnmpParams {
    pub const DEFAULT_PORT: u16 = 161;
}

/// Vendor HTTP gateway parameters for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpParams {
    /// Gateway root. Defaults to `https://{address}` when absent.
    pub base_url: Option<Url>,
    pub auth: Option<BasicAuth>,
    pub tls: TlsMode,
}

impl Default for HttpParams {
    fn default() -> Self {
        Self {
            base_url: None,
            auth: None,
            tls: TlsMode::System,
        }
    }
}

// ── ElementConfig ───────────────────────────────────────────────────

/// One managed OLT as the inventory describes it.
///
/// Handed out as `Arc<ElementConfig>` snapshots; edits replace the whole
/// record, so a dispatch in flight keeps the configuration it started with.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementConfig {
    pub id: ElementId,
    pub name: String,
    pub vendor: String,
    pub model: String,
    /// Management address (host name or IP).
    pub address: String,
    pub snmp: Option<SnmpParams>,
    pub http: Option<HttpParams>,
    /// Preferred protocol, applied only if the model supports it.
    pub preferred_transport: Option<TransportKind>,
    /// Deactivated elements stay in the inventory but refuse dispatch.
    pub active: bool,
}

impl ElementConfig {
    /// A minimal active element with no protocol parameters.
    pub fn new(
        id: impl Into<ElementId>,
        vendor: impl Into<String>,
        model: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            vendor: vendor.into(),
            model: model.into(),
            address: address.into(),
            snmp: None,
            http: None,
            preferred_transport: None,
            active: true,
        }
    }

    #[must_use]
    pub fn with_snmp(mut self, params: SnmpParams) -> Self {
        self.snmp = Some(params);
        self
    }

    #[must_use]
    pub fn with_http(mut self, params: HttpParams) -> Self {
        self.http = Some(params);
        self
    }

    #[must_use]
    pub fn prefer(mut self, kind: TransportKind) -> Self {
        self.preferred_transport = Some(kind);
        self
    }
}
