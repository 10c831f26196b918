//! The page-side surface the injector needs.

use thiserror::Error;

use crate::{MARKER_ATTRIBUTE, MARKER_ID};

/// Host-assigned handle for an inserted node.
pub type NodeId = u64;

/// A `<style>` element to insert into the page's style root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleNode {
    /// Value of the element's `id` attribute.
    pub element_id: String,
    /// Marker attribute name set on the element.
    pub marker: String,
    /// Text content.
    pub css: String,
}

impl StyleNode {
    /// A node carrying the injector's id and marker attribute.
    pub fn marked(css: impl Into<String>) -> Self {
        Self {
            element_id: MARKER_ID.to_string(),
            marker: MARKER_ATTRIBUTE.to_string(),
            css: css.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("style root is not available yet")]
    NoStyleRoot,

    #[error("page is gone")]
    PageGone,
}

/// DOM operations on a page's style root.
///
/// Methods take `&self`; implementations use interior mutability so a host
/// handle can be shared with whatever feeds page events back to the owner.
pub trait StyleHost {
    /// Whether the style root (`<head>` or document element) exists yet.
    fn has_style_root(&self) -> bool;

    /// Append `node` to the style root.
    fn insert_style(&self, node: StyleNode) -> Result<NodeId, DomError>;

    /// Remove a node. Returns `false` if it was not present.
    fn remove_node(&self, id: NodeId) -> bool;

    /// Every node carrying `attribute`, in document order.
    fn find_marked(&self, attribute: &str) -> Vec<NodeId>;

    /// Whether `id` is still attached.
    fn contains(&self, id: NodeId) -> bool;

    /// Remove every node carrying `attribute` except `keep`. Returns the count removed.
    fn remove_marked(&self, attribute: &str, keep: Option<NodeId>) -> usize {
        self.find_marked(attribute)
            .into_iter()
            .filter(|id| Some(*id) != keep)
            .filter(|id| self.remove_node(*id))
            .count()
    }
}
