//! Building the preview webview with the bridge wired in.

use tokio::sync::mpsc;
use tracing::{debug, warn};
use wry::raw_window_handle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use restyle_sync::SyncEvent;

use crate::ipc::{IpcMessage, BRIDGE_SCRIPT};
use crate::page::PageHandle;

/// Configuration for the preview webview.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Page to load.
    pub url: String,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl PreviewConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            devtools: cfg!(debug_assertions),
            user_agent: None,
        }
    }
}

/// Create a webview filling `window`.
///
/// Bridge messages update `page` and are forwarded to the controller over
/// `events`. Page loads reset `page` so styles lost with the old document
/// are re-created.
pub fn build_preview<W: raw_window_handle::HasWindowHandle>(
    window: &W,
    config: &PreviewConfig,
    page: PageHandle,
    events: mpsc::Sender<SyncEvent>,
) -> Result<WebView, wry::Error> {
    let mut builder = WebViewBuilder::new()
        .with_devtools(config.devtools)
        .with_initialization_script(BRIDGE_SCRIPT)
        .with_url(&config.url);

    if let Some(ua) = &config.user_agent {
        builder = builder.with_user_agent(ua);
    }

    let ipc_page = page.clone();
    builder = builder.with_ipc_handler(move |request| {
        forward(&ipc_page, &events, request.body());
    });

    builder = builder.with_on_page_load_handler(move |event, url| {
        let started = matches!(event, PageLoadEvent::Started);
        debug!(started, url = %url, "page load");
        if started {
            page.begin_navigation(url);
        }
    });

    let webview = builder.build(window)?;
    debug!(url = %config.url, "preview webview created");
    Ok(webview)
}

/// Apply one raw bridge message to `page` and pass the resulting events on.
pub fn forward(page: &PageHandle, events: &mpsc::Sender<SyncEvent>, body: &str) {
    let Some(message) = IpcMessage::from_json(body) else {
        warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
        return;
    };
    let Some(signal) = message.signal() else {
        return;
    };

    for event in page.observe(signal) {
        if let Err(e) = events.try_send(event) {
            warn!("dropping page event: {e}");
        }
    }
}
