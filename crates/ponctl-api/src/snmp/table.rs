// ── In-memory MIB agent ──
//
// A `SnmpSession` answered from an ordered table instead of a socket. Used
// for lab replays of a recorded device MIB and as the agent in tests.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::debug;

use super::{Oid, SnmpCredentials, SnmpErrorStatus, SnmpSession, SnmpTarget, SnmpValue, VarBind};
use crate::error::Error;

/// JSON snapshot shape: `{"community": "...", "objects": {"1.3.6...": {"type": ..., "value": ...}}}`.
#[derive(Deserialize)]
struct Snapshot {
    #[serde(default)]
    community: Option<String>,
    objects: BTreeMap<Oid, SnmpValue>,
}

/// An agent whose MIB is a sorted map. SETs are only accepted for objects
/// that already exist and must keep their ASN.1 type.
pub struct MibTable {
    objects: RwLock<BTreeMap<Oid, SnmpValue>>,
    /// When set, v1/v2c requests must present this community.
    community: Option<String>,
}

impl MibTable {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            community: None,
        }
    }

    /// Require a community string on every request.
    pub fn with_community(mut self, community: impl Into<String>) -> Self {
        self.community = Some(community.into());
        self
    }

    /// Parse a JSON snapshot.
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        let snapshot: Snapshot = serde_json::from_str(raw).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: raw.chars().take(200).collect(),
        })?;
        debug!(objects = snapshot.objects.len(), "loaded MIB snapshot");
        Ok(Self {
            objects: RwLock::new(snapshot.objects),
            community: snapshot.community,
        })
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn insert(&self, oid: Oid, value: SnmpValue) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(oid, value);
    }

    pub fn value(&self, oid: &Oid) -> Option<SnmpValue> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(oid)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn authorize(&self, target: &SnmpTarget) -> Result<(), Error> {
        let Some(expected) = self.community.as_deref() else {
            return Ok(());
        };
        match &target.credentials {
            SnmpCredentials::Community { community, .. }
                if community.expose_secret() == expected =>
            {
                Ok(())
            }
            _ => Err(Error::Authentication {
                message: format!("community rejected by {}", target.endpoint()),
            }),
        }
    }
}

impl Default for MibTable {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnmpSession for MibTable {
    async fn get(&self, target: &SnmpTarget, oid: &Oid) -> Result<SnmpValue, Error> {
        self.authorize(target)?;
        Ok(self.value(oid).unwrap_or(SnmpValue::NoSuchInstance))
    }

    async fn get_next(&self, target: &SnmpTarget, oid: &Oid) -> Result<VarBind, Error> {
        self.authorize(target)?;
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let next = objects
            .range((Bound::Excluded(oid), Bound::Unbounded))
            .next()
            .map(|(oid, value)| VarBind {
                oid: oid.clone(),
                value: value.clone(),
            });
        Ok(next.unwrap_or_else(|| VarBind {
            oid: oid.clone(),
            value: SnmpValue::EndOfMibView,
        }))
    }

    async fn set(&self, target: &SnmpTarget, oid: &Oid, value: SnmpValue) -> Result<(), Error> {
        self.authorize(target)?;
        let mut objects = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        let Some(current) = objects.get_mut(oid) else {
            return Err(Error::Snmp {
                status: SnmpErrorStatus::NoCreation,
                index: 1,
            });
        };
        if !current.same_type(&value) {
            return Err(Error::Snmp {
                status: SnmpErrorStatus::WrongType,
                index: 1,
            });
        }
        *current = value;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::snmp::{DEFAULT_WALK_LIMIT, SnmpVersion, walk};

    fn target(community: &str) -> SnmpTarget {
        SnmpTarget {
            host: "10.0.0.1".into(),
            port: 161,
            credentials: SnmpCredentials::Community {
                version: SnmpVersion::V2c,
                community: SecretString::from(community.to_owned()),
            },
            timeout: Duration::from_secs(1),
        }
    }

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    fn sample() -> MibTable {
        let table = MibTable::new();
        table.insert(oid("1.3.6.1.2.1.1.1.0"), SnmpValue::text("MA5800-X7"));
        table.insert(oid("1.3.6.1.2.1.1.3.0"), SnmpValue::TimeTicks(1234));
        table.insert(oid("1.3.6.1.2.1.2.2.1.2.1"), SnmpValue::text("gpon 0/1/0"));
        table.insert(oid("1.3.6.1.2.1.2.2.1.2.2"), SnmpValue::text("gpon 0/1/1"));
        table.insert(oid("1.3.6.1.2.1.31.1.1.1.1.1"), SnmpValue::text("eth0"));
        table
    }

    #[tokio::test]
    async fn walk_stays_inside_subtree() {
        let table = sample();
        let result = walk(&table, &target("public"), &oid("1.3.6.1.2.1.2.2.1.2"), DEFAULT_WALK_LIMIT).await;
        assert!(result.is_complete());
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[1].oid, oid("1.3.6.1.2.1.2.2.1.2.2"));
    }

    #[tokio::test]
    async fn walk_of_scalar_falls_back_to_get() {
        let table = sample();
        let result = walk(&table, &target("public"), &oid("1.3.6.1.2.1.1.3.0"), DEFAULT_WALK_LIMIT).await;
        assert!(result.is_complete());
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].value, SnmpValue::TimeTicks(1234));
    }

    #[tokio::test]
    async fn walk_limit_reports_truncation_with_partial_items() {
        let table = sample();
        let result = walk(&table, &target("public"), &oid("1.3.6.1.2.1"), 2).await;
        assert_eq!(result.items.len(), 2);
        assert!(matches!(result.error, Some(Error::WalkTruncated { limit: 2 })));
    }

    #[tokio::test]
    async fn community_is_enforced() {
        let table = sample().with_community("s3cret");
        let err = table.get(&target("public"), &oid("1.3.6.1.2.1.1.1.0")).await;
        assert!(matches!(err, Err(Error::Authentication { .. })));
        let ok = table.get(&target("s3cret"), &oid("1.3.6.1.2.1.1.1.0")).await.unwrap();
        assert_eq!(ok, SnmpValue::text("MA5800-X7"));
    }

    #[tokio::test]
    async fn set_keeps_type_and_refuses_creation() {
        let table = sample();
        let t = target("public");
        table.set(&t, &oid("1.3.6.1.2.1.1.3.0"), SnmpValue::TimeTicks(99)).await.unwrap();
        assert_eq!(table.value(&oid("1.3.6.1.2.1.1.3.0")), Some(SnmpValue::TimeTicks(99)));

        let wrong = table.set(&t, &oid("1.3.6.1.2.1.1.3.0"), SnmpValue::Integer(1)).await;
        assert!(matches!(wrong, Err(Error::Snmp { status: SnmpErrorStatus::WrongType, .. })));

        let missing = table.set(&t, &oid("1.3.6.1.9.9"), SnmpValue::Integer(1)).await;
        assert!(matches!(missing, Err(Error::Snmp { status: SnmpErrorStatus::NoCreation, .. })));
    }

    #[test]
    fn snapshot_parses() {
        let raw = r#"{
            "community": "public",
            "objects": {
                "1.3.6.1.2.1.1.5.0": {"type": "octet_string", "value": "olt-poa-01"},
                "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.3": {"type": "integer", "value": -1850}
            }
        }"#;
        let table = MibTable::from_json_str(raw).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.value(&oid("1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.3")),
            Some(SnmpValue::Integer(-1850))
        );
    }

    #[tokio::test]
    async fn snapshot_loads_from_disk_and_enforces_community() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("olt.json");
        std::fs::write(
            &path,
            r#"{"community": "lab", "objects": {"1.3.6.1.2.1.1.5.0": {"type": "octet_string", "value": "olt-lab"}}}"#,
        )
        .unwrap();

        let table = MibTable::load(&path).unwrap();
        let denied = table.get(&target("public"), &oid("1.3.6.1.2.1.1.5.0")).await;
        assert!(matches!(denied, Err(Error::Authentication { .. })));
        let value = table.get(&target("lab"), &oid("1.3.6.1.2.1.1.5.0")).await.unwrap();
        assert_eq!(value, SnmpValue::text("olt-lab"));
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MibTable::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
