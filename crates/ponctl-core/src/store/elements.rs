// ── Element inventory ──

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{ElementConfig, ElementId};

/// Read side of the inventory, as the dispatcher sees it.
pub trait ElementDirectory: Send + Sync {
    fn element(&self, id: &ElementId) -> Option<Arc<ElementConfig>>;
}

/// Copy-on-write element inventory.
///
/// Every mutation publishes a new map; lookups load the current one
/// without locking and hand out `Arc` snapshots of individual records.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: ArcSwap<BTreeMap<ElementId, Arc<ElementConfig>>>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: impl IntoIterator<Item = ElementConfig>) -> Self {
        let map = elements
            .into_iter()
            .map(|e| (e.id.clone(), Arc::new(e)))
            .collect();
        Self {
            elements: ArcSwap::from_pointee(map),
        }
    }

    /// Insert or replace an element. Dispatches already holding the old
    /// snapshot are unaffected.
    pub fn upsert(&self, element: ElementConfig) {
        debug!(element = %element.id, "upserting element");
        let element = Arc::new(element);
        self.elements.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.insert(element.id.clone(), Arc::clone(&element));
            next
        });
    }

    /// Mark an element inactive. Its history and ONTs stay in place.
    pub fn deactivate(&self, id: &ElementId) -> Result<(), CoreError> {
        let current = self.get(id).ok_or_else(|| CoreError::ElementNotFound {
            identifier: id.to_string(),
        })?;
        let mut updated = ElementConfig::clone(&current);
        updated.active = false;
        self.upsert(updated);
        Ok(())
    }

    pub fn get(&self, id: &ElementId) -> Option<Arc<ElementConfig>> {
        self.elements.load().get(id).cloned()
    }

    /// All elements, ordered by id.
    pub fn snapshot(&self) -> Vec<Arc<ElementConfig>> {
        self.elements.load().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.load().is_empty()
    }
}

impl ElementDirectory for ElementStore {
    fn element(&self, id: &ElementId) -> Option<Arc<ElementConfig>> {
        self.get(id)
    }
}
