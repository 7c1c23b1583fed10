// ── Projected ONT state store ──

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::watch;
use tracing::trace;

use crate::error::CoreError;
use crate::model::{ElementId, OntField, OntKey, OntState, OntStatus, Reading};
use crate::monitor::FieldValue;

/// Last-known state of every registered ONT.
///
/// Records are created by registration only. Projection updates fields
/// in place and only ever moves them forward in observation time.
pub struct OntStore {
    onts: DashMap<OntKey, OntState>,
    last_update: watch::Sender<Option<DateTime<Utc>>>,
}

impl OntStore {
    pub fn new() -> Self {
        let (last_update, _) = watch::channel(None);
        Self {
            onts: DashMap::new(),
            last_update,
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register an ONT so projections start tracking it. Re-registering
    /// keeps the existing measurements.
    pub fn register(&self, key: OntKey, serial: impl Into<String>) {
        let serial = serial.into();
        self.onts
            .entry(key.clone())
            .and_modify(|state| state.serial.clone_from(&serial))
            .or_insert_with(|| OntState::registered(key, serial));
    }

    /// Put an ONT into, or take it out of, operator maintenance. While held,
    /// polled status values are dropped; measurements still update.
    /// Releasing returns the status to `Unknown` until the next poll.
    pub fn set_maintenance(&self, key: &OntKey, held: bool) -> Result<(), CoreError> {
        let mut state = self.onts.get_mut(key).ok_or_else(|| CoreError::OntNotFound {
            identifier: key.to_string(),
        })?;
        let in_maintenance = state.status == OntStatus::Maintenance;
        if held != in_maintenance {
            state.status = if held {
                OntStatus::Maintenance
            } else {
                OntStatus::Unknown
            };
            state.status_observed_at = None;
        }
        Ok(())
    }

    pub fn get(&self, key: &OntKey) -> Option<OntState> {
        self.onts.get(key).map(|r| r.value().clone())
    }

    /// Every ONT behind `element`, ordered by interface then ONT id.
    pub fn for_element(&self, element: &ElementId) -> Vec<OntState> {
        let mut states: Vec<_> = self
            .onts
            .iter()
            .filter(|r| r.key().element_id == *element)
            .map(|r| r.value().clone())
            .collect();
        states.sort_by(|a, b| a.key.cmp(&b.key));
        states
    }

    pub fn len(&self) -> usize {
        self.onts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onts.is_empty()
    }

    /// Subscribe to the time of the most recent projected change.
    pub fn subscribe(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_update.subscribe()
    }

    /// Apply one observed field value. Returns `false` when the ONT is not
    /// registered or the stored value is newer.
    pub fn apply(
        &self,
        key: &OntKey,
        field: OntField,
        value: FieldValue,
        observed_at: DateTime<Utc>,
    ) -> bool {
        let Some(mut state) = self.onts.get_mut(key) else {
            trace!(ont = %key, "ignoring value for unregistered ONT");
            return false;
        };

        let applied = match value {
            FieldValue::Status(_) if state.status == OntStatus::Maintenance => {
                trace!(ont = %key, "status held for maintenance");
                false
            }
            FieldValue::Status(status) => {
                if state.status_observed_at.is_some_and(|seen| seen > observed_at) {
                    false
                } else {
                    state.status = status;
                    state.status_observed_at = Some(observed_at);
                    true
                }
            }
            FieldValue::Measurement(value) => match state.reading_slot(field) {
                Some(slot) if slot.is_none_or(|r| r.observed_at <= observed_at) => {
                    *slot = Some(Reading { value, observed_at });
                    true
                }
                _ => false,
            },
        };

        if applied {
            if state.last_seen.is_none_or(|seen| seen < observed_at) {
                state.last_seen = Some(observed_at);
            }
            drop(state);
            self.last_update.send_replace(Some(observed_at));
        }
        applied
    }
}

impl Default for OntStore {
    fn default() -> Self {
        Self::new()
    }
}
