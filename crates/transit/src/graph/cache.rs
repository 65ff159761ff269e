use std::sync::Arc;

use arc_swap::ArcSwap;

use super::snapshot::GraphSnapshot;

/// Process-wide holder for the single current graph snapshot. Swaps are
/// atomic: a new snapshot is built in full off to the side, then the
/// pointer is replaced in one step, so readers never observe a partially
/// built graph. `Arc` clones returned by `load` are cheap, letting a
/// `find_routes` call pin one snapshot for its whole duration.
#[derive(Clone)]
pub struct GraphCache {
    inner: Arc<ArcSwap<GraphSnapshot>>,
}

impl Default for GraphCache {
    fn default() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(GraphSnapshot::default())),
        }
    }
}

impl GraphCache {
    pub fn load(&self) -> Arc<GraphSnapshot> {
        self.inner.load_full()
    }

    pub fn swap(&self, snapshot: GraphSnapshot) {
        self.inner.store(Arc::new(snapshot));
    }
}
