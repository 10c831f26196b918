//! Ownership of the single injected theme `<style>` node.
//!
//! The [`StyleInjector`] is the only component that mutates the marked node.
//! Page access goes through the [`StyleHost`] trait so the same injector drives
//! an in-memory document in tests and a live webview in the preview host.

pub mod host;
pub mod injector;
pub mod memory;

pub use host::{DomError, NodeId, StyleHost, StyleNode};
pub use injector::{ApplyOutcome, StyleInjector};
pub use memory::MemoryDocument;

/// Element id given to the injected style node.
pub const MARKER_ID: &str = "restyle-injected-css";

/// Attribute present on every node the injector creates.
pub const MARKER_ATTRIBUTE: &str = "data-restyle-theme";
