// ── In-memory stores ──
//
// Element inventory and projected ONT state. Readers get owned snapshots;
// writers never block dispatches that are already running.

mod elements;
mod onts;

pub use elements::{ElementDirectory, ElementStore};
pub use onts::OntStore;
