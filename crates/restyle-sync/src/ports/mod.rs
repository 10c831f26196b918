//! Capability ports the controller is given instead of ambient runtime handles.

mod context;
mod messages;
mod store;

pub use context::ExtensionContext;
pub use messages::{message_channel, ChannelSender, Inbound, MessageSender, Request, Response};
pub use store::{diff_entries, Entries, KeyValueStore, StorageChange};
