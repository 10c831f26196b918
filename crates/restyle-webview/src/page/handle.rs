//! Rust-side mirror of what the webview's document currently holds.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use restyle_inject::NodeId;
use restyle_sync::SyncEvent;
use tracing::debug;

use crate::ipc::PageSignal;

#[derive(Debug)]
pub(super) struct PageMirror {
    pub(super) url: String,
    pub(super) ready: bool,
    /// Style nodes we inserted that the page still holds.
    pub(super) nodes: BTreeSet<NodeId>,
    pub(super) next_id: NodeId,
    /// A navigation replaced the document since the last ready signal.
    navigated: bool,
    /// That navigation took our style nodes with it.
    lost_nodes: bool,
}

/// Shared view of one webview page.
///
/// The UI thread feeds it bridge signals and page-load events; the
/// controller's [`ScriptPage`](super::ScriptPage) reads and updates it when
/// touching the DOM.
#[derive(Debug, Clone)]
pub struct PageHandle {
    inner: Arc<Mutex<PageMirror>>,
}

impl PageHandle {
    /// A page that has started loading `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PageMirror {
                url: url.into(),
                ready: false,
                nodes: BTreeSet::new(),
                // 0 is what the bridge reports for nodes we did not create.
                next_id: 1,
                navigated: false,
                lost_nodes: false,
            })),
        }
    }

    pub(super) fn state(&self) -> MutexGuard<'_, PageMirror> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn url(&self) -> String {
        self.state().url.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state().ready
    }

    /// Number of our style nodes the page holds.
    pub fn node_count(&self) -> usize {
        self.state().nodes.len()
    }

    /// A new document started loading; the old one and its nodes are gone.
    pub fn begin_navigation(&self, url: impl Into<String>) {
        let mut state = self.state();
        state.url = url.into();
        if state.ready {
            state.navigated = true;
        }
        state.ready = false;
        if !state.nodes.is_empty() {
            state.lost_nodes = true;
            state.nodes.clear();
        }
        debug!(url = %state.url, "page navigation started");
    }

    /// Apply a bridge signal and translate it into controller events.
    pub fn observe(&self, signal: PageSignal) -> Vec<SyncEvent> {
        let mut state = self.state();
        match signal {
            PageSignal::DocumentReady { href } => {
                if !href.is_empty() {
                    state.url = href;
                }
                state.ready = true;

                let mut events = vec![SyncEvent::DocumentReady];
                if std::mem::take(&mut state.navigated) {
                    events.push(SyncEvent::UrlChanged(state.url.clone()));
                }
                if std::mem::take(&mut state.lost_nodes) {
                    events.push(SyncEvent::StyleNodeRemoved);
                }
                events
            }
            PageSignal::Visibility(visibility) => vec![SyncEvent::Visibility(visibility)],
            PageSignal::StyleRemoved { node } => {
                if let Some(id) = node {
                    state.nodes.remove(&id);
                }
                vec![SyncEvent::StyleNodeRemoved]
            }
            PageSignal::Location { href } => {
                state.url = href.clone();
                vec![SyncEvent::UrlChanged(href)]
            }
        }
    }
}
