//! A [`Page`] backed by a webview.
//!
//! The controller runs on a tokio task while the webview lives on the UI
//! thread, so [`ScriptPage`] never touches the webview directly. DOM
//! operations become JavaScript handed to a [`ScriptSink`]; their effect is
//! recorded in a [`PageHandle`] right away so the injector sees a consistent
//! document without waiting for the script to run.

mod handle;


pub use handle::PageHandle;

use restyle_inject::{DomError, NodeId, StyleHost, StyleNode};
use restyle_sync::Page;
use tracing::warn;

use crate::script;

/// Where page scripts go to be evaluated.
pub trait ScriptSink: Send + Sync {
    /// Queue `script`. Returns `false` if the page is gone.
    fn run(&self, script: String) -> bool;
}

impl ScriptSink for std::sync::mpsc::Sender<String> {
    fn run(&self, script: String) -> bool {
        self.send(script).is_ok()
    }
}

/// Controller-side handle on a webview page.
pub struct ScriptPage<S: ScriptSink> {
    handle: PageHandle,
    sink: S,
}

impl<S: ScriptSink> ScriptPage<S> {
    pub fn new(handle: PageHandle, sink: S) -> Self {
        Self { handle, sink }
    }

    pub fn handle(&self) -> &PageHandle {
        &self.handle
    }

    fn emit(&self, script: String) -> bool {
        let sent = self.sink.run(script);
        if !sent {
            warn!("page script queue closed");
        }
        sent
    }
}

impl<S: ScriptSink> StyleHost for ScriptPage<S> {
    fn has_style_root(&self) -> bool {
        self.handle.is_ready()
    }

    fn insert_style(&self, node: StyleNode) -> Result<NodeId, DomError> {
        let mut state = self.handle.state();
        if !state.ready {
            return Err(DomError::NoStyleRoot);
        }

        let id = state.next_id;
        state.next_id += 1;
        if !self.emit(script::insert_style(id, &node)) {
            return Err(DomError::PageGone);
        }
        state.nodes.insert(id);
        Ok(id)
    }

    fn remove_node(&self, id: NodeId) -> bool {
        let mut state = self.handle.state();
        if !state.nodes.remove(&id) {
            return false;
        }
        self.emit(script::remove_node(id));
        true
    }

    fn find_marked(&self, _attribute: &str) -> Vec<NodeId> {
        self.handle.state().nodes.iter().copied().collect()
    }

    fn contains(&self, id: NodeId) -> bool {
        self.handle.state().nodes.contains(&id)
    }

    /// Also sweeps marked nodes we have no record of, such as ones left by
    /// an earlier controller on the same document.
    fn remove_marked(&self, attribute: &str, keep: Option<NodeId>) -> usize {
        let mut state = self.handle.state();
        let before = state.nodes.len();
        state.nodes.retain(|id| Some(*id) == keep);
        let removed = before - state.nodes.len();

        if state.ready {
            self.emit(script::remove_marked(attribute, keep));
        }
        removed
    }
}

impl<S: ScriptSink> Page for ScriptPage<S> {
    fn url(&self) -> String {
        self.handle.url()
    }

    fn is_document_ready(&self) -> bool {
        self.handle.is_ready()
    }
}
