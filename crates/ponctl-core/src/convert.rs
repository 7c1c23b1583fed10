// ── Protocol → domain conversion ──
//
// Classifies raw client errors into the dispatcher's taxonomy and maps
// SNMP varbinds / gateway JSON objects onto `Value`.

use ponctl_api::{Error as ApiError, MibObject, SnmpValue, VarBind};

use crate::model::{Binding, ErrorClass, Value, ValueKind};

// ── Error classification ────────────────────────────────────────────

/// Map a raw protocol error onto the shared failure classes.
pub fn classify(err: &ApiError) -> ErrorClass {
    match err {
        ApiError::Authentication { .. } => ErrorClass::AuthenticationFailed,
        ApiError::Transport(e) => {
            if e.is_timeout() {
                ErrorClass::Timeout
            } else if e.is_connect() {
                ErrorClass::Unreachable
            } else if let Some(status) = e.status() {
                classify_status(status.as_u16())
            } else if e.is_body() || e.is_decode() {
                ErrorClass::ProtocolError
            } else {
                ErrorClass::Unreachable
            }
        }
        ApiError::Timeout { .. } => ErrorClass::Timeout,
        ApiError::Unreachable { .. } | ApiError::Tls(_) => ErrorClass::Unreachable,
        ApiError::Http { status, .. } => classify_status(*status),
        ApiError::Snmp { status, .. } => {
            if status.is_auth() {
                ErrorClass::AuthenticationFailed
            } else if status.is_unsupported() {
                ErrorClass::Unsupported
            } else {
                ErrorClass::ProtocolError
            }
        }
        ApiError::NoSuchObject { .. }
        | ApiError::InvalidOid(_)
        | ApiError::UnsupportedOperation(_) => ErrorClass::Unsupported,
        ApiError::Rejected { .. }
        | ApiError::NonIncreasingOid { .. }
        | ApiError::WalkTruncated { .. }
        | ApiError::Deserialization { .. } => ErrorClass::ProtocolError,
        ApiError::InvalidUrl(_) | ApiError::Io(_) => ErrorClass::Unknown,
    }
}

fn classify_status(status: u16) -> ErrorClass {
    match status {
        401 | 403 => ErrorClass::AuthenticationFailed,
        404 | 405 | 501 => ErrorClass::Unsupported,
        408 | 504 => ErrorClass::Timeout,
        502 | 503 => ErrorClass::Unreachable,
        _ => ErrorClass::ProtocolError,
    }
}

// ── SNMP values ─────────────────────────────────────────────────────

pub fn value_from_snmp(value: SnmpValue) -> Value {
    match value {
        SnmpValue::Integer(n) => Value::Integer(n),
        SnmpValue::OctetString(bytes) => match String::from_utf8(bytes) {
            Ok(text) if text.chars().all(|c| !c.is_control() || c.is_whitespace()) => {
                Value::Text(text)
            }
            Ok(text) => Value::Bytes(text.into_bytes()),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        SnmpValue::ObjectIdentifier(oid) => Value::ObjectId(oid.to_string()),
        SnmpValue::IpAddress(ip) => Value::IpAddress(ip),
        SnmpValue::Counter32(n) => Value::Counter(u64::from(n)),
        SnmpValue::Counter64(n) => Value::Counter(n),
        SnmpValue::Gauge32(n) => Value::Gauge(u64::from(n)),
        SnmpValue::TimeTicks(n) => Value::TimeTicks(u64::from(n)),
        SnmpValue::Float(f) => Value::Float(f),
        SnmpValue::Null
        | SnmpValue::NoSuchObject
        | SnmpValue::NoSuchInstance
        | SnmpValue::EndOfMibView => Value::Null,
    }
}

pub fn binding_from_varbind(vb: VarBind) -> Binding {
    Binding::new(vb.oid.to_string(), value_from_snmp(vb.value))
}

/// Encode a value for SET. `None` when SNMP cannot carry it.
pub fn value_to_snmp(value: &Value) -> Option<SnmpValue> {
    Some(match value {
        Value::Integer(n) => SnmpValue::Integer(*n),
        Value::Counter(n) => match u32::try_from(*n) {
            Ok(small) => SnmpValue::Counter32(small),
            Err(_) => SnmpValue::Counter64(*n),
        },
        Value::Gauge(n) => SnmpValue::Gauge32(u32::try_from(*n).ok()?),
        Value::TimeTicks(n) => SnmpValue::TimeTicks(u32::try_from(*n).ok()?),
        Value::Float(f) => SnmpValue::Float(*f),
        Value::Text(s) => SnmpValue::text(s),
        Value::Bytes(b) => SnmpValue::OctetString(b.clone()),
        Value::ObjectId(oid) => SnmpValue::ObjectIdentifier(oid.parse().ok()?),
        Value::IpAddress(ip) => SnmpValue::IpAddress(*ip),
        Value::Null => SnmpValue::Null,
        Value::Json(_) => return None,
    })
}

// ── Gateway JSON ────────────────────────────────────────────────────

/// Interpret a gateway object, honouring its ASN.1 type hint when given.
pub fn value_from_json(value: serde_json::Value, hint: Option<&str>) -> Value {
    use serde_json::Value as Json;

    let hinted = hint.and_then(|h| {
        h.replace(['-', ' '], "_")
            .parse::<ValueKind>()
            .ok()
            .or_else(|| asn1_hint(h))
    });
    if let Some(kind) = hinted {
        if let Some(v) = coerce_json(&value, kind) {
            return v;
        }
    }

    match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Json(Json::Bool(b)),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Json(Json::Number(n)), Value::Float),
        },
        Json::String(s) => Value::Text(s),
        other => Value::Json(other),
    }
}

fn asn1_hint(hint: &str) -> Option<ValueKind> {
    Some(match hint.to_ascii_lowercase().as_str() {
        "counter32" | "counter64" => ValueKind::Counter,
        "gauge32" | "unsigned32" => ValueKind::Gauge,
        "octet_string" | "octetstring" | "string" => ValueKind::Text,
        "hex_string" | "opaque" => ValueKind::Bytes,
        "object_identifier" | "oid" => ValueKind::ObjectId,
        "ipaddress" | "ip_address" => ValueKind::IpAddress,
        "integer32" | "int" => ValueKind::Integer,
        _ => return None,
    })
}

fn coerce_json(value: &serde_json::Value, kind: ValueKind) -> Option<Value> {
    use serde_json::Value as Json;

    match (kind, value) {
        (ValueKind::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (ValueKind::Counter, Json::Number(n)) => n.as_u64().map(Value::Counter),
        (ValueKind::Gauge, Json::Number(n)) => n.as_u64().map(Value::Gauge),
        (ValueKind::TimeTicks, Json::Number(n)) => n.as_u64().map(Value::TimeTicks),
        (ValueKind::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (ValueKind::Text, Json::String(s)) => Some(Value::Text(s.clone())),
        (ValueKind::ObjectId, Json::String(s)) => {
            Some(Value::ObjectId(s.trim_start_matches('.').to_owned()))
        }
        (ValueKind::IpAddress, Json::String(s)) => s.parse().ok().map(Value::IpAddress),
        (ValueKind::Bytes, Json::String(s)) => Value::parse_as(ValueKind::Bytes, s).ok(),
        (kind, Json::String(s)) if kind != ValueKind::Text => Value::parse_as(kind, s).ok(),
        _ => None,
    }
}

pub fn binding_from_object(obj: MibObject) -> Binding {
    let value = value_from_json(obj.value, obj.kind.as_deref());
    Binding::new(obj.oid.trim_start_matches('.'), value)
}

/// Encode a value for a gateway write body.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Integer(n) => Json::from(*n),
        Value::Counter(n) | Value::Gauge(n) | Value::TimeTicks(n) => Json::from(*n),
        Value::Float(f) => Json::from(*f),
        Value::Text(s) | Value::ObjectId(s) => Json::String(s.clone()),
        Value::Bytes(_) | Value::IpAddress(_) => Json::String(value.to_string()),
        Value::Json(v) => v.clone(),
        Value::Null => Json::Null,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ponctl_api::{Oid, SnmpErrorStatus};
    use serde_json::json;

    #[test]
    fn classifies_snmp_error_status() {
        let auth = ApiError::Snmp { status: SnmpErrorStatus::AuthorizationError, index: 0 };
        let ro = ApiError::Snmp { status: SnmpErrorStatus::NotWritable, index: 1 };
        let generic = ApiError::Snmp { status: SnmpErrorStatus::GenErr, index: 1 };
        assert_eq!(classify(&auth), ErrorClass::AuthenticationFailed);
        assert_eq!(classify(&ro), ErrorClass::Unsupported);
        assert_eq!(classify(&generic), ErrorClass::ProtocolError);
    }

    #[test]
    fn classifies_gateway_status_codes() {
        let http = |status| ApiError::Http { status, message: String::new() };
        assert_eq!(classify(&http(403)), ErrorClass::AuthenticationFailed);
        assert_eq!(classify(&http(404)), ErrorClass::Unsupported);
        assert_eq!(classify(&http(503)), ErrorClass::Unreachable);
        assert_eq!(classify(&http(504)), ErrorClass::Timeout);
        assert_eq!(classify(&http(500)), ErrorClass::ProtocolError);
    }

    #[test]
    fn classifies_walk_failures() {
        assert_eq!(classify(&ApiError::Timeout { timeout_ms: 5 }), ErrorClass::Timeout);
        assert_eq!(
            classify(&ApiError::WalkTruncated { limit: 10 }),
            ErrorClass::ProtocolError
        );
        assert_eq!(
            classify(&ApiError::NoSuchObject { oid: "1.3".into() }),
            ErrorClass::Unsupported
        );
    }

    #[test]
    fn snmp_octet_strings_become_text_or_bytes() {
        assert_eq!(
            value_from_snmp(SnmpValue::text("HWTC1F2A3B4C")),
            Value::Text("HWTC1F2A3B4C".into())
        );
        assert_eq!(
            value_from_snmp(SnmpValue::OctetString(vec![0x48, 0x57, 0x00, 0xff])),
            Value::Bytes(vec![0x48, 0x57, 0x00, 0xff])
        );
    }

    #[test]
    fn snmp_set_encoding() {
        assert_eq!(value_to_snmp(&Value::Integer(2)), Some(SnmpValue::Integer(2)));
        assert_eq!(value_to_snmp(&Value::Gauge(u64::MAX)), None);
        assert_eq!(
            value_to_snmp(&Value::ObjectId("1.3.6.1".into())),
            Some(SnmpValue::ObjectIdentifier("1.3.6.1".parse::<Oid>().unwrap()))
        );
        assert_eq!(value_to_snmp(&Value::Json(json!({}))), None);
    }

    #[test]
    fn gateway_json_follows_type_hint() {
        assert_eq!(value_from_json(json!(-18.5), None), Value::Float(-18.5));
        assert_eq!(value_from_json(json!(-1850), None), Value::Integer(-1850));
        assert_eq!(value_from_json(json!(12), Some("gauge32")), Value::Gauge(12));
        assert_eq!(value_from_json(json!("42"), Some("integer")), Value::Integer(42));
        assert_eq!(
            value_from_json(json!("HWTC"), Some("octet_string")),
            Value::Text("HWTC".into())
        );
        assert_eq!(value_from_json(json!({"a": 1}), None), Value::Json(json!({"a": 1})));
    }
}
