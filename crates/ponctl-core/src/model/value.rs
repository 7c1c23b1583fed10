// ── Normalized values ──
//
// SNMP varbinds and HTTP JSON fields both land here, so callers see one
// value type regardless of which transport served the request.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// A typed value read from or written to an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Integer(i64),
    Counter(u64),
    Gauge(u64),
    TimeTicks(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    ObjectId(String),
    IpAddress(Ipv4Addr),
    Json(serde_json::Value),
    Null,
}

/// Type tag of a [`Value`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValueKind {
    Integer,
    Counter,
    Gauge,
    TimeTicks,
    Float,
    Text,
    Bytes,
    ObjectId,
    IpAddress,
    Json,
    Null,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Counter(_) => ValueKind::Counter,
            Self::Gauge(_) => ValueKind::Gauge,
            Self::TimeTicks(_) => ValueKind::TimeTicks,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::ObjectId(_) => ValueKind::ObjectId,
            Self::IpAddress(_) => ValueKind::IpAddress,
            Self::Json(_) => ValueKind::Json,
            Self::Null => ValueKind::Null,
        }
    }

    /// `true` for integral kinds reported in device units.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::Integer(_) | Self::Counter(_) | Self::Gauge(_) | Self::TimeTicks(_)
        )
    }

    /// Numeric view of the value. Text is parsed leniently (`"-18.5"`).
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Counter(n) | Self::Gauge(n) | Self::TimeTicks(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Json(v) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Counter(n) | Self::Gauge(n) | Self::TimeTicks(n) => i64::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Json(v) => v.as_i64(),
            _ => None,
        }
    }

    /// Parse operator input (`--type gauge 42`) into a typed value.
    pub fn parse_as(kind: ValueKind, raw: &str) -> Result<Self, String> {
        let bad = |e: &dyn fmt::Display| format!("invalid {kind} value {raw:?}: {e}");
        Ok(match kind {
            ValueKind::Integer => Self::Integer(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::Counter => Self::Counter(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::Gauge => Self::Gauge(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::TimeTicks => Self::TimeTicks(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::Float => Self::Float(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::Text => Self::Text(raw.to_owned()),
            ValueKind::Bytes => Self::Bytes(decode_hex(raw).ok_or_else(|| bad(&"expected hex"))?),
            ValueKind::ObjectId => Self::ObjectId(raw.trim_start_matches('.').to_owned()),
            ValueKind::IpAddress => Self::IpAddress(raw.parse().map_err(|e| bad(&e))?),
            ValueKind::Json => Self::Json(serde_json::from_str(raw).map_err(|e| bad(&e))?),
            ValueKind::Null => Self::Null,
        })
    }
}

fn decode_hex(raw: &str) -> Option<Vec<u8>> {
    let digits: String = raw
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !matches!(c, ':' | ' '))
        .collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok())
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Counter(n) | Self::Gauge(n) | Self::TimeTicks(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => {
                f.write_str("0x")?;
                b.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
            }
            Self::ObjectId(oid) => f.write_str(oid),
            Self::IpAddress(ip) => write!(f, "{ip}"),
            Self::Json(v) => write!(f, "{v}"),
            Self::Null => f.write_str("null"),
        }
    }
}

// ── Binding ─────────────────────────────────────────────────────────

/// One `(identifier, value, kind)` tuple in an operation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub identifier: String,
    pub value: Value,
    pub kind: ValueKind,
}

impl Binding {
    pub fn new(identifier: impl Into<String>, value: Value) -> Self {
        Self {
            identifier: identifier.into(),
            kind: value.kind(),
            value,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn binding_kind_follows_value() {
        let b = Binding::new("1.3.6.1.2.1.1.3.0", Value::TimeTicks(4242));
        assert_eq!(b.kind, ValueKind::TimeTicks);
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Float(-18.5).as_f64(), Some(-18.5));
        assert_eq!(Value::Text(" -21.04 ".into()).as_f64(), Some(-21.04));
        assert_eq!(Value::Gauge(7).as_i64(), Some(7));
        assert_eq!(Value::Bytes(vec![1]).as_f64(), None);
    }

    #[test]
    fn parse_operator_input() {
        assert_eq!(Value::parse_as(ValueKind::Integer, "2").unwrap(), Value::Integer(2));
        assert_eq!(
            Value::parse_as(ValueKind::Bytes, "0x48:54").unwrap(),
            Value::Bytes(vec![0x48, 0x54])
        );
        assert!(Value::parse_as(ValueKind::Gauge, "-1").is_err());
        assert!(Value::parse_as(ValueKind::Bytes, "abc").is_err());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Value::Integer(-1850)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "integer", "value": -1850 }));
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_string(), "0xdead");
    }
}
