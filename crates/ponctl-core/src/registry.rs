// ── Capability registry ──
//
// Which management protocols each (vendor, model) supports. Built once from
// the embedded table, optionally merged with an operator override file, and
// read-only afterwards.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::TransportKind;

const BUILTIN_TABLE: &str = include_str!("capabilities.toml");

/// Protocols supported by one OLT model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityEntry {
    pub vendor: String,
    pub model: String,
    pub supports_snmp: bool,
    pub supports_http: bool,
    /// Gateway API roots in preference order.
    pub http_api_prefixes: Vec<String>,
}

impl CapabilityEntry {
    /// Conservative entry for models the table does not know.
    pub fn snmp_only(vendor: &str, model: &str) -> Self {
        Self {
            vendor: normalize(vendor),
            model: normalize(model),
            supports_snmp: true,
            supports_http: false,
            http_api_prefixes: Vec::new(),
        }
    }

    pub fn supports(&self, kind: TransportKind) -> bool {
        match kind {
            TransportKind::Snmp => self.supports_snmp,
            TransportKind::Http => self.supports_http,
        }
    }

    /// Supported transports, HTTP first.
    pub fn transports(&self) -> Vec<TransportKind> {
        [TransportKind::Http, TransportKind::Snmp]
            .into_iter()
            .filter(|k| self.supports(*k))
            .collect()
    }

    pub fn primary_http_prefix(&self) -> &str {
        self.http_api_prefixes.first().map_or("", String::as_str)
    }
}

// ── Table file shape ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableFile {
    #[serde(default, rename = "model")]
    models: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableRow {
    vendor: String,
    model: String,
    #[serde(default)]
    snmp: bool,
    #[serde(default)]
    http: bool,
    #[serde(default)]
    http_prefixes: Vec<String>,
}

// ── Registry ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CapabilityKey {
    vendor: String,
    model: String,
}

impl CapabilityKey {
    fn new(vendor: &str, model: &str) -> Self {
        Self {
            vendor: normalize(vendor),
            model: normalize(model),
        }
    }
}

/// Immutable `(vendor, model) -> CapabilityEntry` lookup.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: HashMap<CapabilityKey, Arc<CapabilityEntry>>,
}

impl CapabilityRegistry {
    /// The table compiled into the binary.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_toml_str(BUILTIN_TABLE)
    }

    /// Builtin table with rows from `path` replacing or adding models.
    pub fn with_overrides(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| CoreError::Config {
            message: format!("cannot read capability overrides {}: {e}", path.display()),
        })?;
        let mut registry = Self::builtin()?;
        let overrides = Self::from_toml_str(&raw)?;
        debug!(
            path = %path.display(),
            count = overrides.len(),
            "merging capability overrides"
        );
        registry.entries.extend(overrides.entries);
        Ok(registry)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CoreError> {
        let file: TableFile = toml::from_str(raw)?;
        let mut entries = HashMap::with_capacity(file.models.len());

        for row in file.models {
            if !row.snmp && !row.http {
                return Err(CoreError::Registry {
                    message: format!("{} {} supports no transport", row.vendor, row.model),
                });
            }
            if row.http && row.http_prefixes.is_empty() {
                return Err(CoreError::Registry {
                    message: format!(
                        "{} {} supports HTTP but lists no API prefix",
                        row.vendor, row.model
                    ),
                });
            }
            let key = CapabilityKey::new(&row.vendor, &row.model);
            let entry = CapabilityEntry {
                vendor: key.vendor.clone(),
                model: key.model.clone(),
                supports_snmp: row.snmp,
                supports_http: row.http,
                http_api_prefixes: row.http_prefixes,
            };
            if entries.insert(key, Arc::new(entry)).is_some() {
                return Err(CoreError::Registry {
                    message: format!("duplicate row for {} {}", row.vendor, row.model),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Capabilities for `(vendor, model)`. Unknown pairs get the SNMP-only
    /// default; this never fails.
    pub fn lookup(&self, vendor: &str, model: &str) -> Arc<CapabilityEntry> {
        self.entries
            .get(&CapabilityKey::new(vendor, model))
            .cloned()
            .unwrap_or_else(|| Arc::new(CapabilityEntry::snmp_only(vendor, model)))
    }

    pub fn is_known(&self, vendor: &str, model: &str) -> bool {
        self.entries.contains_key(&CapabilityKey::new(vendor, model))
    }

    /// All entries sorted by vendor then model.
    pub fn entries(&self) -> Vec<Arc<CapabilityEntry>> {
        let mut all: Vec<_> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| (&a.vendor, &a.model).cmp(&(&b.vendor, &b.model)));
        all
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
