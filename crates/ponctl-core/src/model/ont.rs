// ── Projected ONT state ──

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::element::ElementId;

/// Position of an ONT behind its OLT: element, PON interface index, ONT id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OntKey {
    pub element_id: ElementId,
    pub interface: u32,
    pub ont_id: u32,
}

impl OntKey {
    pub fn new(element_id: impl Into<ElementId>, interface: u32, ont_id: u32) -> Self {
        Self {
            element_id: element_id.into(),
            interface,
            ont_id,
        }
    }
}

impl fmt::Display for OntKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.element_id, self.interface, self.ont_id)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OntStatus {
    Online,
    Offline,
    #[default]
    Unknown,
    /// Held by an operator. Polled status does not replace it.
    Maintenance,
}

/// Attributes the projector maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum OntField {
    Status,
    RxPower,
    TxPower,
    Temperature,
    Voltage,
}

/// A measured value and when it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

/// Last known condition of one ONT. Registration creates the record;
/// projection only ever updates fields of records that already exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntState {
    pub key: OntKey,
    pub serial: String,
    pub status: OntStatus,
    pub status_observed_at: Option<DateTime<Utc>>,
    /// dBm
    pub rx_power: Option<Reading>,
    /// dBm
    pub tx_power: Option<Reading>,
    /// °C
    pub temperature: Option<Reading>,
    /// V
    pub voltage: Option<Reading>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl OntState {
    pub fn registered(key: OntKey, serial: impl Into<String>) -> Self {
        Self {
            key,
            serial: serial.into(),
            status: OntStatus::Unknown,
            status_observed_at: None,
            rx_power: None,
            tx_power: None,
            temperature: None,
            voltage: None,
            last_seen: None,
        }
    }

    pub fn reading(&self, field: OntField) -> Option<&Reading> {
        match field {
            OntField::RxPower => self.rx_power.as_ref(),
            OntField::TxPower => self.tx_power.as_ref(),
            OntField::Temperature => self.temperature.as_ref(),
            OntField::Voltage => self.voltage.as_ref(),
            OntField::Status => None,
        }
    }

    pub(crate) fn reading_slot(&mut self, field: OntField) -> Option<&mut Option<Reading>> {
        match field {
            OntField::RxPower => Some(&mut self.rx_power),
            OntField::TxPower => Some(&mut self.tx_power),
            OntField::Temperature => Some(&mut self.temperature),
            OntField::Voltage => Some(&mut self.voltage),
            OntField::Status => None,
        }
    }
}
