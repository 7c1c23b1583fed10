// ── Transport resolution ──
//
// Turns an element plus the capability table into the ordered list of
// transports a dispatch may try. Pure: the same inputs always yield the
// same plan.

use ponctl_api::{BasicAuth, SnmpCredentials, SnmpVersion, TlsMode};
use tracing::warn;
use url::Url;

use crate::model::{ElementConfig, ElementId, SnmpParams, TransportKind};
use crate::registry::CapabilityRegistry;

/// Community used when an element lists no SNMP parameters.
const DEFAULT_COMMUNITY: &str = "public";

// ── Descriptors ─────────────────────────────────────────────────────

/// Connection parameters for an SNMP agent.
#[derive(Debug, Clone, PartialEq)]
pub struct SnmpEndpoint {
    pub host: String,
    pub port: u16,
    pub credentials: SnmpCredentials,
}

/// Connection parameters for a vendor HTTP gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpEndpoint {
    pub base_url: Url,
    /// API root chosen from the model's prefix list.
    pub prefix: String,
    pub auth: Option<BasicAuth>,
    pub tls: TlsMode,
}

/// One concrete way to reach an element.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportDescriptor {
    Snmp(SnmpEndpoint),
    Http(HttpEndpoint),
}

impl TransportDescriptor {
    pub fn kind(&self) -> TransportKind {
        match self {
            Self::Snmp(_) => TransportKind::Snmp,
            Self::Http(_) => TransportKind::Http,
        }
    }

    /// `host:port` or gateway URL, for logs and plan listings.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Snmp(ep) => format!("udp://{}:{}", ep.host, ep.port),
            Self::Http(ep) => {
                let base = ep.base_url.as_str().trim_end_matches('/');
                format!("{base}{}", ep.prefix)
            }
        }
    }
}

/// Transports to try for one element, in order. Never empty for an
/// element the resolver accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportPlan {
    pub element_id: ElementId,
    pub entries: Vec<TransportDescriptor>,
}

impl TransportPlan {
    pub fn kinds(&self) -> Vec<TransportKind> {
        self.entries.iter().map(TransportDescriptor::kind).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the entry of `kind` to the front. No-op if the plan lacks it.
    pub fn prefer(&mut self, kind: TransportKind) -> bool {
        match self.entries.iter().position(|d| d.kind() == kind) {
            Some(idx) => {
                let entry = self.entries.remove(idx);
                self.entries.insert(0, entry);
                true
            }
            None => false,
        }
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// Build the ordered transport plan for `element`.
///
/// Default order is HTTP before SNMP. The element's own preference is
/// applied next, then `request_preference`, which wins when both are set.
/// Preferences naming an unsupported transport are ignored.
pub fn build_transport_plan(
    registry: &CapabilityRegistry,
    element: &ElementConfig,
    request_preference: Option<TransportKind>,
) -> TransportPlan {
    let caps = registry.lookup(&element.vendor, &element.model);
    let mut entries = Vec::with_capacity(2);

    for kind in caps.transports() {
        match kind {
            TransportKind::Http => match http_endpoint(element, caps.primary_http_prefix()) {
                Some(ep) => entries.push(TransportDescriptor::Http(ep)),
                None => warn!(
                    element = %element.id,
                    address = %element.address,
                    "no usable gateway URL; skipping HTTP"
                ),
            },
            TransportKind::Snmp => entries.push(TransportDescriptor::Snmp(snmp_endpoint(element))),
        }
    }

    let mut plan = TransportPlan {
        element_id: element.id.clone(),
        entries,
    };
    for preference in [element.preferred_transport, request_preference]
        .into_iter()
        .flatten()
    {
        plan.prefer(preference);
    }
    plan
}

fn snmp_endpoint(element: &ElementConfig) -> SnmpEndpoint {
    let params = element.snmp.clone().unwrap_or_else(|| SnmpParams {
        port: SnmpParams::DEFAULT_PORT,
        credentials: SnmpCredentials::Community {
            version: SnmpVersion::V2c,
            community: DEFAULT_COMMUNITY.to_owned().into(),
        },
    });
    SnmpEndpoint {
        host: element.address.clone(),
        port: params.port,
        credentials: params.credentials,
    }
}

fn http_endpoint(element: &ElementConfig, prefix: &str) -> Option<HttpEndpoint> {
    let params = element.http.clone().unwrap_or_default();
    let base_url = match params.base_url {
        Some(url) => url,
        None => Url::parse(&format!("https://{}", element.address)).ok()?,
    };
    Some(HttpEndpoint {
        base_url,
        prefix: prefix.to_owned(),
        auth: params.auth,
        tls: params.tls,
    })
}
