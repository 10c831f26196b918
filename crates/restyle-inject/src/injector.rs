//! The style injector: apply, remove and re-assert the theme stylesheet.

use restyle_css::sanitize_css;
use tracing::{debug, warn};

use crate::host::{NodeId, StyleHost, StyleNode};
use crate::MARKER_ATTRIBUTE;

/// What an `apply` (or retry) did to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new marked node was inserted.
    Inserted,
    /// The CSS was already applied (or already pending); nothing changed.
    Unchanged,
    /// The style root is missing; the owner should call
    /// [`StyleInjector::retry_pending`] once after a short delay.
    Deferred,
    /// The theme was removed from the page.
    Removed,
}

#[derive(Debug)]
struct Held {
    node: NodeId,
    css: String,
}

/// Owns at most one marked `<style>` node in a [`StyleHost`].
pub struct StyleInjector<H> {
    host: H,
    held: Option<Held>,
    pending: Option<String>,
}

impl<H: StyleHost> StyleInjector<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            held: None,
            pending: None,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Whether a node is currently held (it may have been removed by the page).
    pub fn is_active(&self) -> bool {
        self.held.is_some()
    }

    /// Whether the held node is still present in the page.
    pub fn is_attached(&self) -> bool {
        self.held
            .as_ref()
            .is_some_and(|held| self.host.contains(held.node))
    }

    /// The CSS the held node was created from, before sanitization.
    pub fn current_css(&self) -> Option<&str> {
        self.held.as_ref().map(|held| held.css.as_str())
    }

    /// CSS waiting for the style root to appear.
    pub fn pending_css(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Make `css` the page's theme stylesheet.
    ///
    /// Blank CSS is a removal. CSS identical to what is held (or pending) is a
    /// no-op and touches nothing in the page.
    pub fn apply(&mut self, css: &str) -> ApplyOutcome {
        if css.trim().is_empty() {
            self.remove();
            return ApplyOutcome::Removed;
        }
        if self.current_css() == Some(css) {
            return ApplyOutcome::Unchanged;
        }
        if self.pending_css() == Some(css) {
            return ApplyOutcome::Unchanged;
        }

        self.remove();
        self.insert(css.to_string())
    }

    /// Re-apply `css` even if it is already held, unless the held node is
    /// still attached with exactly that CSS.
    pub fn reassert(&mut self, css: &str) -> ApplyOutcome {
        if self.is_attached() && self.current_css() == Some(css) {
            return ApplyOutcome::Unchanged;
        }
        self.remove();
        self.apply(css)
    }

    /// Second and last insertion attempt after a [`ApplyOutcome::Deferred`].
    ///
    /// If the style root is still missing the pending CSS is dropped.
    pub fn retry_pending(&mut self) -> ApplyOutcome {
        let Some(css) = self.pending.take() else {
            return ApplyOutcome::Unchanged;
        };

        if !self.host.has_style_root() {
            warn!("style root still unavailable after retry, dropping theme");
            return ApplyOutcome::Removed;
        }

        match self.try_insert(&css) {
            Some(node) => {
                self.held = Some(Held { node, css });
                ApplyOutcome::Inserted
            }
            None => {
                warn!("style insertion failed on retry, dropping theme");
                ApplyOutcome::Removed
            }
        }
    }

    /// Remove the held node and any stray marked node left by an earlier
    /// injector in the same page.
    pub fn remove(&mut self) {
        self.pending = None;

        if let Some(held) = self.held.take() {
            self.host.remove_node(held.node);
        }

        let strays = self.host.remove_marked(MARKER_ATTRIBUTE, None);
        if strays > 0 {
            debug!(count = strays, "removed stray marked style nodes");
        }
    }

    fn insert(&mut self, css: String) -> ApplyOutcome {
        if !self.host.has_style_root() {
            debug!("style root unavailable, deferring insertion");
            self.pending = Some(css);
            return ApplyOutcome::Deferred;
        }

        match self.try_insert(&css) {
            Some(node) => {
                self.held = Some(Held { node, css });
                ApplyOutcome::Inserted
            }
            None => {
                self.pending = Some(css);
                ApplyOutcome::Deferred
            }
        }
    }

    fn try_insert(&self, css: &str) -> Option<NodeId> {
        let node = StyleNode::marked(sanitize_css(css));
        match self.host.insert_style(node) {
            Ok(id) => {
                debug!(node = id, bytes = css.len(), "inserted theme style node");
                Some(id)
            }
            Err(e) => {
                debug!(error = %e, "style insertion failed");
                None
            }
        }
    }
}
