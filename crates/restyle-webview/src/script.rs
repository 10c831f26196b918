//! JavaScript snippets that perform DOM operations in the page.
//!
//! Nodes removed by these snippets are flagged first so the bridge's
//! `MutationObserver` does not report them as removed by the page.

use restyle_inject::{NodeId, StyleNode};

use crate::ipc::NODE_ATTRIBUTE;

/// Encode `text` as a JS string literal.
fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Append a `<style>` element for `node` to the head (or document element).
pub fn insert_style(id: NodeId, node: &StyleNode) -> String {
    format!(
        "(function() {{\
            var root = document.head || document.documentElement;\
            if (!root) {{ return; }}\
            var style = document.createElement('style');\
            style.id = {element_id};\
            style.setAttribute({marker}, 'true');\
            style.setAttribute('{NODE_ATTRIBUTE}', '{id}');\
            style.textContent = {css};\
            root.appendChild(style);\
        }})();",
        element_id = js_string(&node.element_id),
        marker = js_string(&node.marker),
        css = js_string(&node.css),
    )
}

/// Remove the node we inserted as `id`.
pub fn remove_node(id: NodeId) -> String {
    format!(
        "document.querySelectorAll('[{NODE_ATTRIBUTE}=\"{id}\"]').forEach(function(n) {{\
            n.__restyleRemoving = true; n.remove();\
        }});"
    )
}

/// Remove every element carrying `attribute`, except our node `keep`.
pub fn remove_marked(attribute: &str, keep: Option<NodeId>) -> String {
    let keep = keep.map(|id| id.to_string()).unwrap_or_default();
    format!(
        "document.querySelectorAll('[' + {attribute} + ']').forEach(function(n) {{\
            if (n.getAttribute('{NODE_ATTRIBUTE}') === {keep}) {{ return; }}\
            n.__restyleRemoving = true; n.remove();\
        }});",
        attribute = js_string(attribute),
        keep = js_string(&keep),
    )
}
