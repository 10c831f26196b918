//! IPC protocol between the page bridge script and Rust.
//!
//! Messages flow one way: the bridge script calls
//! `window.ipc.postMessage(JSON.stringify({ kind, payload }))`, which lands in
//! the `ipc_handler` registered on the WebView. Rust talks to the page only
//! through `evaluate_script` (see [`crate::script`]).

use restyle_inject::NodeId;
use restyle_sync::Visibility;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A raw IPC message from the bridge script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcMessage {
    /// The message type.
    pub kind: String,
    /// The message payload (arbitrary JSON).
    #[serde(default)]
    pub payload: Value,
}

/// What a bridge message says about the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    /// `DOMContentLoaded` fired (or had already fired) for `href`.
    DocumentReady { href: String },
    Visibility(Visibility),
    /// A marked style node left the document without us removing it.
    StyleRemoved { node: Option<NodeId> },
    /// The URL changed without a document load.
    Location { href: String },
}

impl IpcMessage {
    /// Parse an IPC message from a raw JSON string (from JS postMessage).
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Interpret the message. Unknown kinds yield `None`.
    pub fn signal(&self) -> Option<PageSignal> {
        let text = || self.payload.as_str().unwrap_or_default().to_string();

        match self.kind.as_str() {
            "document_ready" => Some(PageSignal::DocumentReady { href: text() }),
            "visibility" => Some(PageSignal::Visibility(Visibility::from_state(&text()))),
            "style_removed" => Some(PageSignal::StyleRemoved {
                node: self.payload.as_u64(),
            }),
            "location" => Some(PageSignal::Location { href: text() }),
            other => {
                debug!(kind = other, "ignoring unknown IPC message");
                None
            }
        }
    }
}

/// Attribute the bridge uses to tell our style nodes apart.
pub const NODE_ATTRIBUTE: &str = "data-restyle-node";

/// Initialization script injected into every page before its own scripts.
pub const BRIDGE_SCRIPT: &str = r#"
(function() {
    if (window.__restyle) { return; }
    window.__restyle = true;

    var MARKER = 'data-restyle-theme';
    var NODE = 'data-restyle-node';

    function send(kind, payload) {
        window.ipc.postMessage(JSON.stringify({
            kind: kind,
            payload: payload === undefined ? null : payload
        }));
    }

    var observing = false;
    function observe() {
        if (observing || !document.documentElement) { return; }
        observing = true;
        new MutationObserver(function(records) {
            records.forEach(function(record) {
                record.removedNodes.forEach(function(node) {
                    if (node.nodeType === 1 && node.hasAttribute(MARKER) && !node.__restyleRemoving) {
                        send('style_removed', Number(node.getAttribute(NODE)));
                    }
                });
            });
        }).observe(document.documentElement, { childList: true, subtree: true });
    }

    function ready() {
        observe();
        send('document_ready', location.href);
    }

    observe();
    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', ready);
    } else {
        ready();
    }

    document.addEventListener('visibilitychange', function() {
        send('visibility', document.visibilityState);
    });

    var lastHref = location.href;
    function checkLocation() {
        if (location.href !== lastHref) {
            lastHref = location.href;
            send('location', lastHref);
        }
    }
    ['pushState', 'replaceState'].forEach(function(name) {
        var original = history[name];
        history[name] = function() {
            var result = original.apply(this, arguments);
            checkLocation();
            return result;
        };
    });
    window.addEventListener('popstate', checkLocation);
    window.addEventListener('hashchange', checkLocation);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bridge_messages() {
        let msg = IpcMessage::from_json(r#"{"kind":"document_ready","payload":"https://a.test/"}"#)
            .unwrap();
        assert_eq!(
            msg.signal(),
            Some(PageSignal::DocumentReady {
                href: "https://a.test/".into()
            })
        );

        let msg = IpcMessage::new("visibility", json!("hidden"));
        assert_eq!(msg.signal(), Some(PageSignal::Visibility(Visibility::Hidden)));

        let msg = IpcMessage::new("style_removed", json!(7));
        assert_eq!(msg.signal(), Some(PageSignal::StyleRemoved { node: Some(7) }));

        let msg = IpcMessage::new("location", json!("https://a.test/#x"));
        assert_eq!(
            msg.signal(),
            Some(PageSignal::Location {
                href: "https://a.test/#x".into()
            })
        );
    }

    #[test]
    fn missing_payload_defaults_to_null() {
        let msg = IpcMessage::from_json(r#"{"kind":"style_removed"}"#).unwrap();
        assert_eq!(msg.payload, Value::Null);
        assert_eq!(msg.signal(), Some(PageSignal::StyleRemoved { node: None }));
    }

    #[test]
    fn unknown_kind_and_bad_json_are_ignored() {
        assert_eq!(IpcMessage::new("resize", Value::Null).signal(), None);
        assert!(IpcMessage::from_json("not json").is_none());
    }

    #[test]
    fn bridge_script_uses_the_injector_marker() {
        assert!(BRIDGE_SCRIPT.contains(restyle_inject::MARKER_ATTRIBUTE));
        assert!(BRIDGE_SCRIPT.contains(NODE_ATTRIBUTE));
    }
}
