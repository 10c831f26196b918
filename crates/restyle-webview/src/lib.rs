//! Webview host for previewing themes on live pages.
//!
//! Wraps the `wry` crate to provide:
//! - A [`ScriptPage`] that lets the Live Sync controller drive a webview's
//!   DOM by emitting JavaScript
//! - The bridge script that reports document readiness, visibility, style
//!   removal and in-page navigation back over IPC
//! - A builder that wires both into a `wry::WebView`

pub mod builder;
pub mod ipc;
pub mod page;
pub mod script;

pub use builder::{build_preview, PreviewConfig};
pub use ipc::{IpcMessage, PageSignal, BRIDGE_SCRIPT};
pub use page::{PageHandle, ScriptPage, ScriptSink};
