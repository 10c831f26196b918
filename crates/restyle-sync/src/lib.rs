//! Live synchronization of the injected theme with persisted state.
//!
//! The [`LiveSync`] controller owns a page's [`StyleInjector`] and reacts to
//! inbound messages, storage changes, page events and its own timers. The
//! controlling UI talks to it through a [`ThemeClient`].
//!
//! [`StyleInjector`]: restyle_inject::StyleInjector

pub mod client;
pub mod controller;
pub mod event;
pub mod memory;
pub mod page;
pub mod ports;
pub mod registry;
pub mod schedule;

pub use client::{Delivery, ThemeClient};
pub use controller::{resolve, ControllerState, LiveSync, PersistedState, RemoveReason, SyncTimings, Verdict};
pub use event::SyncEvent;
pub use memory::{MemoryPage, MemoryStore};
pub use page::{Page, Visibility};
pub use ports::{
    diff_entries, message_channel, ChannelSender, Entries, ExtensionContext, Inbound,
    KeyValueStore, MessageSender, Request, Response, StorageChange,
};
pub use registry::{PageClaim, PageRegistry};
pub use schedule::{TimerKind, Timers};
