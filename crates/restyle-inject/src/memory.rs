//! In-memory [`StyleHost`] used by tests and headless runs.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::host::{DomError, NodeId, StyleHost, StyleNode};
use crate::MARKER_ATTRIBUTE;

#[derive(Debug)]
struct DocumentState {
    root_available: bool,
    nodes: BTreeMap<NodeId, StyleNode>,
    next_id: NodeId,
    mutations: usize,
}

/// A shared, cloneable fake document holding only style nodes.
///
/// Every insertion or removal (by the injector or simulated by the page)
/// bumps a mutation counter, so tests can assert that an operation touched
/// nothing.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    inner: Arc<Mutex<DocumentState>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A document whose style root is already available.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(DocumentState {
                root_available: true,
                nodes: BTreeMap::new(),
                next_id: 1,
                mutations: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, DocumentState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_root_available(&self, available: bool) {
        self.state().root_available = available;
    }

    pub fn mutation_count(&self) -> usize {
        self.state().mutations
    }

    pub fn node_count(&self) -> usize {
        self.state().nodes.len()
    }

    /// Number of nodes carrying the injector's marker attribute.
    pub fn marked_count(&self) -> usize {
        self.find_marked(MARKER_ATTRIBUTE).len()
    }

    /// Text of every marked node, in document order.
    pub fn marked_css(&self) -> Vec<String> {
        self.state()
            .nodes
            .values()
            .filter(|node| node.marker == MARKER_ATTRIBUTE)
            .map(|node| node.css.clone())
            .collect()
    }

    /// Insert a node as if some other script (or an earlier injector) had.
    pub fn insert_foreign(&self, node: StyleNode) -> NodeId {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.nodes.insert(id, node);
        state.mutations += 1;
        id
    }

    /// Simulate the page removing every marked node on its own.
    pub fn remove_all_marked_externally(&self) -> usize {
        let mut state = self.state();
        let before = state.nodes.len();
        state.nodes.retain(|_, node| node.marker != MARKER_ATTRIBUTE);
        let removed = before - state.nodes.len();
        state.mutations += removed;
        removed
    }
}

impl StyleHost for MemoryDocument {
    fn has_style_root(&self) -> bool {
        self.state().root_available
    }

    fn insert_style(&self, node: StyleNode) -> Result<NodeId, DomError> {
        if !self.has_style_root() {
            return Err(DomError::NoStyleRoot);
        }
        Ok(self.insert_foreign(node))
    }

    fn remove_node(&self, id: NodeId) -> bool {
        let mut state = self.state();
        let removed = state.nodes.remove(&id).is_some();
        if removed {
            state.mutations += 1;
        }
        removed
    }

    fn find_marked(&self, attribute: &str) -> Vec<NodeId> {
        self.state()
            .nodes
            .iter()
            .filter(|(_, node)| node.marker == attribute)
            .map(|(id, _)| *id)
            .collect()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.state().nodes.contains_key(&id)
    }
}
