//! Everything that can reach a running controller through its inbox.

use crate::page::Visibility;
use crate::ports::Inbound;

#[derive(Debug)]
pub enum SyncEvent {
    /// A request from the controlling UI.
    Message(Inbound),
    /// The page finished parsing its document.
    DocumentReady,
    /// The page was shown or hidden.
    Visibility(Visibility),
    /// The page removed a marked style node on its own.
    StyleNodeRemoved,
    /// In-page navigation changed the URL without a reload.
    UrlChanged(String),
}
