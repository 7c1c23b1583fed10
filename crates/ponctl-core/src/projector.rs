// ── ONT state projection ──
//
// Folds successful read results into the ONT store. Bindings that match no
// monitored column, or that name an ONT nobody registered, change nothing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{Binding, ElementId, OntKey};
use crate::monitor::MonitoredAttributes;
use crate::store::OntStore;

pub struct StateProjector {
    attributes: MonitoredAttributes,
    onts: Arc<OntStore>,
}

impl StateProjector {
    pub fn new(attributes: MonitoredAttributes, onts: Arc<OntStore>) -> Self {
        Self { attributes, onts }
    }

    pub fn onts(&self) -> &Arc<OntStore> {
        &self.onts
    }

    /// Apply `bindings` observed at `observed_at` on `element`. Returns the
    /// number of fields updated.
    pub fn project(
        &self,
        element: &ElementId,
        bindings: &[Binding],
        observed_at: DateTime<Utc>,
    ) -> usize {
        let mut updated = 0;
        for binding in bindings {
            let Some(hit) = self.attributes.resolve(&binding.identifier, &binding.value) else {
                continue;
            };
            let key = OntKey::new(element.clone(), hit.interface, hit.ont_id);
            if self.onts.apply(&key, hit.field, hit.value, observed_at) {
                updated += 1;
            }
        }
        if updated > 0 {
            debug!(%element, updated, "projected ONT fields");
        }
        updated
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{OntStatus, Value};

    const RX: &str = "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4";
    const STATUS: &str = "1.3.6.1.4.1.2011.6.128.1.1.2.46.1.15";

    fn projector() -> StateProjector {
        let onts = OntStore::shared();
        onts.register(OntKey::new("olt-1", 4_194_312_192, 3), "HWTC1F2A3B4C");
        StateProjector::new(MonitoredAttributes::builtin(), onts)
    }

    #[test]
    fn walk_results_update_registered_onts_only() {
        let p = projector();
        let bindings = vec![
            Binding::new(format!("{RX}.4194312192.3"), Value::Integer(-1850)),
            Binding::new(format!("{RX}.4194312192.4"), Value::Integer(-2000)),
            Binding::new(format!("{STATUS}.4194312192.3"), Value::Integer(1)),
        ];
        let updated = p.project(&"olt-1".into(), &bindings, Utc::now());
        assert_eq!(updated, 2);
        assert_eq!(p.onts().len(), 1);

        let state = p.onts().get(&OntKey::new("olt-1", 4_194_312_192, 3)).unwrap();
        assert_eq!(state.rx_power.unwrap().value, -18.5);
        assert_eq!(state.status, OntStatus::Online);
    }

    #[test]
    fn unrecognized_bindings_change_nothing() {
        let p = projector();
        let before = p.onts().get(&OntKey::new("olt-1", 4_194_312_192, 3)).unwrap();
        let bindings = vec![Binding::new("1.3.6.1.2.1.1.3.0", Value::TimeTicks(99))];
        assert_eq!(p.project(&"olt-1".into(), &bindings, Utc::now()), 0);
        assert_eq!(
            p.onts().get(&OntKey::new("olt-1", 4_194_312_192, 3)).unwrap(),
            before
        );
    }

    #[test]
    fn same_index_on_another_element_is_separate() {
        let p = projector();
        let bindings = vec![Binding::new(format!("{RX}.4194312192.3"), Value::Integer(-1850))];
        assert_eq!(p.project(&"olt-2".into(), &bindings, Utc::now()), 0);
    }
}
