// ── Monitored attribute table ──
//
// Which object identifiers carry ONT health data, and how to turn their
// values into projected fields. Index arcs after each column are
// `(pon interface ifIndex, ont id)`.

use ponctl_api::Oid;

use crate::model::{OntField, OntStatus, Value};

/// Conversion from a device value to a field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Value is already in field units.
    Identity,
    /// Integral values are in `1/divisor` units; fractional ones pass through.
    Divide(f64),
    /// Vendor status enumeration.
    Status(StatusMap),
}

/// Vendor status codes for online/offline. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusMap {
    pub online: &'static [i64],
    pub offline: &'static [i64],
}

impl StatusMap {
    fn status(&self, code: i64) -> OntStatus {
        if self.online.contains(&code) {
            OntStatus::Online
        } else if self.offline.contains(&code) {
            OntStatus::Offline
        } else {
            OntStatus::Unknown
        }
    }
}

/// One table column that feeds one ONT field.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredAttribute {
    /// Lower-case vendor whose agents expose the column.
    pub vendor: &'static str,
    pub name: &'static str,
    pub column: Oid,
    pub field: OntField,
    pub scale: Scale,
}

/// Converted value for a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Status(OntStatus),
    Measurement(f64),
}

/// A binding the table recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMatch {
    pub name: &'static str,
    pub interface: u32,
    pub ont_id: u32,
    pub field: OntField,
    pub value: FieldValue,
}

/// Lookup table from object identifier to ONT field.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoredAttributes {
    attributes: Vec<MonitoredAttribute>,
}

// hwGponOntOpticalDdmEntry
const HUAWEI_DDM: &[u32] = &[1, 3, 6, 1, 4, 1, 2011, 6, 128, 1, 1, 2, 51, 1];
const HUAWEI_RUN_STATUS: &[u32] = &[1, 3, 6, 1, 4, 1, 2011, 6, 128, 1, 1, 2, 46, 1, 15];
const ZTE_OPTICAL: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 50, 12, 1, 1];
const ZTE_PHASE_STATE: &[u32] = &[1, 3, 6, 1, 4, 1, 3902, 1012, 3, 28, 2, 1, 4];

const HUAWEI_STATUS: StatusMap = StatusMap {
    online: &[1],
    offline: &[2],
};

// logging(1) los(2) syncMib(3) working(4) dyinggasp(5) authFailed(6) offline(7)
const ZTE_STATUS: StatusMap = StatusMap {
    online: &[4],
    offline: &[2, 5, 6, 7],
};

impl MonitoredAttributes {
    pub fn new(attributes: Vec<MonitoredAttribute>) -> Self {
        Self { attributes }
    }

    /// Columns for the vendors with well-known ONT MIBs.
    pub fn builtin() -> Self {
        let col = |entry: &[u32], arc: u32| Oid::from_arcs(entry).child(arc);

        Self::new(vec![
            MonitoredAttribute {
                vendor: "huawei",
                name: "hwGponOntOpticalDdmTemperature",
                column: col(HUAWEI_DDM, 1),
                field: OntField::Temperature,
                scale: Scale::Identity,
            },
            MonitoredAttribute {
                vendor: "huawei",
                name: "hwGponOntOpticalDdmTxPower",
                column: col(HUAWEI_DDM, 3),
                field: OntField::TxPower,
                scale: Scale::Divide(100.0),
            },
            MonitoredAttribute {
                vendor: "huawei",
                name: "hwGponOntOpticalDdmRxPower",
                column: col(HUAWEI_DDM, 4),
                field: OntField::RxPower,
                scale: Scale::Divide(100.0),
            },
            MonitoredAttribute {
                vendor: "huawei",
                name: "hwGponOntOpticalDdmVoltage",
                column: col(HUAWEI_DDM, 5),
                field: OntField::Voltage,
                scale: Scale::Divide(1000.0),
            },
            MonitoredAttribute {
                vendor: "huawei",
                name: "hwGponDeviceOntControlRunStatus",
                column: Oid::from_arcs(HUAWEI_RUN_STATUS),
                field: OntField::Status,
                scale: Scale::Status(HUAWEI_STATUS),
            },
            MonitoredAttribute {
                vendor: "zte",
                name: "zxAnPonOnuRxOpticalPower",
                column: col(ZTE_OPTICAL, 10),
                field: OntField::RxPower,
                scale: Scale::Divide(1000.0),
            },
            MonitoredAttribute {
                vendor: "zte",
                name: "zxAnPonOnuTxOpticalPower",
                column: col(ZTE_OPTICAL, 14),
                field: OntField::TxPower,
                scale: Scale::Divide(1000.0),
            },
            MonitoredAttribute {
                vendor: "zte",
                name: "zxAnPonOnuTemperature",
                column: col(ZTE_OPTICAL, 19),
                field: OntField::Temperature,
                scale: Scale::Divide(1000.0),
            },
            MonitoredAttribute {
                vendor: "zte",
                name: "zxAnPonOnuVoltage",
                column: col(ZTE_OPTICAL, 17),
                field: OntField::Voltage,
                scale: Scale::Divide(1000.0),
            },
            MonitoredAttribute {
                vendor: "zte",
                name: "zxAnGponOnuPhaseState",
                column: Oid::from_arcs(ZTE_PHASE_STATE),
                field: OntField::Status,
                scale: Scale::Status(ZTE_STATUS),
            },
        ])
    }

    pub fn attributes(&self) -> &[MonitoredAttribute] {
        &self.attributes
    }

    /// Columns worth walking on an element of `vendor`.
    pub fn for_vendor<'a>(&'a self, vendor: &'a str) -> impl Iterator<Item = &'a MonitoredAttribute> {
        let vendor = vendor.trim();
        self.attributes
            .iter()
            .filter(move |attr| attr.vendor.eq_ignore_ascii_case(vendor))
    }

    /// Match `identifier` against the table and convert `value`.
    ///
    /// `None` when the identifier is not a monitored column instance or the
    /// value cannot be read as a number.
    pub fn resolve(&self, identifier: &str, value: &Value) -> Option<AttributeMatch> {
        let oid: Oid = identifier.parse().ok()?;
        self.attributes.iter().find_map(|attr| {
            let &[interface, ont_id] = oid.suffix_after(&attr.column)? else {
                return None;
            };
            Some(AttributeMatch {
                name: attr.name,
                interface,
                ont_id,
                field: attr.field,
                value: field_value(attr.scale, value)?,
            })
        })
    }
}

impl Default for MonitoredAttributes {
    fn default() -> Self {
        Self::builtin()
    }
}

fn field_value(scale: Scale, value: &Value) -> Option<FieldValue> {
    match scale {
        Scale::Identity => value.as_f64().map(FieldValue::Measurement),
        Scale::Divide(divisor) => {
            let raw = value.as_f64()?;
            // Gateways may send integral readings as text or JSON numbers.
            let integral = value.is_integral() || value.as_i64().is_some();
            let scaled = if integral { raw / divisor } else { raw };
            Some(FieldValue::Measurement(scaled))
        }
        Scale::Status(map) => value.as_i64().map(|code| FieldValue::Status(map.status(code))),
    }
}
