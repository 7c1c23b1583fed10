// ── SNMP session abstraction ──
//
// Object identifiers, typed varbind values and the narrow GET / GETNEXT / SET
// surface a PDU codec has to provide. Subtree walks are built on GETNEXT here
// so every codec shares the same termination rules.

mod table;

use std::cmp::Ordering;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Error;

pub use table::MibTable;

/// Default cap on bindings collected by a single walk.
pub const DEFAULT_WALK_LIMIT: usize = 10_000;

// ── Oid ─────────────────────────────────────────────────────────────

/// A dotted-numeric object identifier (`1.3.6.1.2.1.1.1.0`).
///
/// Ordering is lexicographic over the arcs, which is the order agents
/// return objects in during a GETNEXT walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(Vec<u32>);

impl Oid {
    /// Build from numeric arcs, for identifiers known at compile time.
    pub fn from_arcs(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }

    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if `self` equals `root` or lies underneath it.
    pub fn starts_with(&self, root: &Oid) -> bool {
        self.0.starts_with(&root.0)
    }

    /// Arcs following `root`, or `None` if `self` is outside that subtree.
    pub fn suffix_after(&self, root: &Oid) -> Option<&[u32]> {
        self.0.strip_prefix(root.0.as_slice())
    }

    /// A new OID with `arc` appended.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Oid(arcs)
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        if trimmed.is_empty() {
            return Err(Error::InvalidOid(s.to_owned()));
        }
        let arcs = trimmed
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidOid(s.to_owned()))?;
        if arcs.len() < 2 {
            return Err(Error::InvalidOid(s.to_owned()));
        }
        Ok(Self(arcs))
    }
}

impl TryFrom<String> for Oid {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.to_string()
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// A varbind value as carried in SNMPv2 PDUs, plus the exception values
/// agents return in place of data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SnmpValue {
    Integer(i64),
    #[serde(with = "octets")]
    OctetString(Vec<u8>),
    ObjectIdentifier(Oid),
    IpAddress(Ipv4Addr),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
    /// Opaque-wrapped IEEE float (net-snmp `Opaque: Float`).
    Float(f64),
    Null,
    NoSuchObject,
    NoSuchInstance,
    EndOfMibView,
}

impl SnmpValue {
    pub fn text(s: &str) -> Self {
        Self::OctetString(s.as_bytes().to_vec())
    }

    /// `true` for the v2 exception values that stand in for missing data.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Self::NoSuchObject | Self::NoSuchInstance | Self::EndOfMibView
        )
    }

    pub fn is_end_of_mib(&self) -> bool {
        matches!(self, Self::EndOfMibView)
    }

    /// Same ASN.1 type, ignoring the payload.
    pub fn same_type(&self, other: &SnmpValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Octet strings serialize as UTF-8 text when possible, `0x`-hex otherwise.
mod octets {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) if !text.starts_with("0x") => s.serialize_str(text),
            _ => {
                let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
                s.serialize_str(&format!("0x{hex}"))
            }
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(d)?;
        let Some(hex) = raw.strip_prefix("0x") else {
            return Ok(raw.into_bytes());
        };
        if hex.len() % 2 != 0 {
            return Err(serde::de::Error::custom("odd-length hex octet string"));
        }
        (0..hex.len())
            .step_by(2)
            .map(|i| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|e| serde::de::Error::custom(format!("invalid hex octet: {e}")))
            })
            .collect()
    }
}

/// One (OID, value) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarBind {
    pub oid: Oid,
    pub value: SnmpValue,
}

// ── Error status ────────────────────────────────────────────────────

/// Non-zero PDU error-status values (RFC 3416).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnmpErrorStatus {
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
}

impl SnmpErrorStatus {
    /// Decode a wire error-status. `0` (noError) and unknown codes yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            _ => return None,
        })
    }

    pub fn is_auth(self) -> bool {
        matches!(self, Self::AuthorizationError | Self::NoAccess)
    }

    /// Statuses meaning "this object cannot be used this way here".
    pub fn is_unsupported(self) -> bool {
        matches!(
            self,
            Self::NoSuchName | Self::ReadOnly | Self::NotWritable | Self::NoCreation
        )
    }
}

impl fmt::Display for SnmpErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TooBig => "tooBig",
            Self::NoSuchName => "noSuchName",
            Self::BadValue => "badValue",
            Self::ReadOnly => "readOnly",
            Self::GenErr => "genErr",
            Self::NoAccess => "noAccess",
            Self::WrongType => "wrongType",
            Self::WrongLength => "wrongLength",
            Self::WrongEncoding => "wrongEncoding",
            Self::WrongValue => "wrongValue",
            Self::NoCreation => "noCreation",
            Self::InconsistentValue => "inconsistentValue",
            Self::ResourceUnavailable => "resourceUnavailable",
            Self::CommitFailed => "commitFailed",
            Self::UndoFailed => "undoFailed",
            Self::AuthorizationError => "authorizationError",
            Self::NotWritable => "notWritable",
            Self::InconsistentName => "inconsistentName",
        };
        f.write_str(name)
    }
}

// ── Session target ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

/// Security parameters for one agent.
#[derive(Debug, Clone)]
pub enum SnmpCredentials {
    /// v1 / v2c community string.
    Community {
        version: SnmpVersion,
        community: SecretString,
    },
    /// v3 user-based security model.
    Usm {
        username: String,
        auth_passphrase: Option<SecretString>,
        privacy_passphrase: Option<SecretString>,
    },
}

impl PartialEq for SnmpCredentials {
    fn eq(&self, other: &Self) -> bool {
        fn same(a: Option<&SecretString>, b: Option<&SecretString>) -> bool {
            a.map(|s| s.expose_secret()) == b.map(|s| s.expose_secret())
        }
        match (self, other) {
            (
                Self::Community { version: va, community: ca },
                Self::Community { version: vb, community: cb },
            ) => va == vb && ca.expose_secret() == cb.expose_secret(),
            (
                Self::Usm { username: ua, auth_passphrase: aa, privacy_passphrase: pa },
                Self::Usm { username: ub, auth_passphrase: ab, privacy_passphrase: pb },
            ) => ua == ub && same(aa.as_ref(), ab.as_ref()) && same(pa.as_ref(), pb.as_ref()),
            _ => false,
        }
    }
}

impl SnmpCredentials {
    pub fn version(&self) -> SnmpVersion {
        match self {
            Self::Community { version, .. } => *version,
            Self::Usm { .. } => SnmpVersion::V3,
        }
    }
}

/// Where and how to talk to one agent for a single request.
#[derive(Debug, Clone)]
pub struct SnmpTarget {
    pub host: String,
    pub port: u16,
    pub credentials: SnmpCredentials,
    /// Per-request timeout the codec should honour on its socket.
    pub timeout: Duration,
}

impl SnmpTarget {
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Session trait ───────────────────────────────────────────────────

/// The PDU-level operations a codec exposes. Implementations own the wire
/// encoding and the socket; callers only see typed varbinds and [`Error`].
#[async_trait]
pub trait SnmpSession: Send + Sync {
    /// GET a single object. Missing objects come back as exception values.
    async fn get(&self, target: &SnmpTarget, oid: &Oid) -> Result<SnmpValue, Error>;

    /// GETNEXT: the first object lexicographically after `oid`.
    async fn get_next(&self, target: &SnmpTarget, oid: &Oid) -> Result<VarBind, Error>;

    /// SET a single object.
    async fn set(&self, target: &SnmpTarget, oid: &Oid, value: SnmpValue) -> Result<(), Error>;
}

// ── Walk ────────────────────────────────────────────────────────────

/// Items collected before a multi-step read stopped, and why it stopped
/// early (if it did).
#[derive(Debug)]
pub struct PartialWalk<T> {
    pub items: Vec<T>,
    pub error: Option<Error>,
}

impl<T> PartialWalk<T> {
    pub fn complete(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            items: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Walk the subtree rooted at `root` with repeated GETNEXT.
///
/// Stops at the first binding outside `root` or at `endOfMibView`. An agent
/// that answers with a non-increasing OID ends the walk with
/// [`Error::NonIncreasingOid`] instead of looping. A scalar root with no
/// children falls back to a plain GET of the root itself. Each GETNEXT is
/// bounded by `target.timeout`; a stalled step keeps what was collected.
pub async fn walk<S>(session: &S, target: &SnmpTarget, root: &Oid, limit: usize) -> PartialWalk<VarBind>
where
    S: SnmpSession + ?Sized,
{
    let mut items: Vec<VarBind> = Vec::new();
    let mut cursor = root.clone();

    loop {
        if items.len() >= limit {
            return PartialWalk {
                items,
                error: Some(Error::WalkTruncated { limit }),
            };
        }

        let step = tokio::time::timeout(target.timeout, session.get_next(target, &cursor)).await;
        let next = match step {
            Ok(Ok(vb)) => vb,
            Ok(Err(e)) => return PartialWalk { items, error: Some(e) },
            Err(_) => {
                return PartialWalk {
                    items,
                    error: Some(step_timeout(target)),
                };
            }
        };
        trace!(oid = %next.oid, "walk step");

        if next.value.is_end_of_mib() {
            break;
        }
        if next.oid <= cursor {
            return PartialWalk {
                items,
                error: Some(Error::NonIncreasingOid {
                    requested: cursor.to_string(),
                    returned: next.oid.to_string(),
                }),
            };
        }
        if !next.oid.starts_with(root) {
            break;
        }

        cursor = next.oid.clone();
        items.push(next);
    }

    if items.is_empty() {
        match tokio::time::timeout(target.timeout, session.get(target, root)).await {
            Ok(Ok(value)) if !value.is_exception() => items.push(VarBind {
                oid: root.clone(),
                value,
            }),
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return PartialWalk { items, error: Some(e) },
            Err(_) => {
                return PartialWalk {
                    items,
                    error: Some(step_timeout(target)),
                };
            }
        }
    }

    PartialWalk::complete(items)
}

fn step_timeout(target: &SnmpTarget) -> Error {
    Error::Timeout {
        timeout_ms: u64::try_from(target.timeout.as_millis()).unwrap_or(u64::MAX),
    }
}
