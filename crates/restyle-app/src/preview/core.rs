//! PreviewApp struct definition, constructor and shutdown.

use std::sync::mpsc;
use std::time::Duration;

use restyle_config::WindowConfig;
use restyle_sync::{ExtensionContext, SyncEvent, Visibility};
use restyle_webview::{PageHandle, PreviewConfig};
use tokio::runtime::Runtime;
use winit::window::Window;
use wry::WebView;

/// Top-level preview window state.
pub struct PreviewApp {
    pub(super) window_config: WindowConfig,
    pub(super) preview: PreviewConfig,
    pub(super) page: PageHandle,

    /// Page events for the controller's inbox.
    pub(super) events: tokio::sync::mpsc::Sender<SyncEvent>,
    /// Scripts the controller queued for the webview.
    pub(super) scripts: mpsc::Receiver<String>,
    pub(super) context: ExtensionContext,
    pub(super) runtime: Option<Runtime>,

    // Dropped before the window that hosts it.
    pub(super) webview: Option<WebView>,
    pub(super) window: Option<Window>,
}

impl PreviewApp {
    pub fn new(
        window_config: WindowConfig,
        preview: PreviewConfig,
        page: PageHandle,
        events: tokio::sync::mpsc::Sender<SyncEvent>,
        scripts: mpsc::Receiver<String>,
        context: ExtensionContext,
        runtime: Runtime,
    ) -> Self {
        Self {
            window_config,
            preview,
            page,
            events,
            scripts,
            context,
            runtime: Some(runtime),
            webview: None,
            window: None,
        }
    }

    /// Evaluate every queued page script.
    pub(super) fn flush_scripts(&mut self) {
        let Some(webview) = &self.webview else {
            return;
        };
        for script in self.scripts.try_iter() {
            if let Err(e) = webview.evaluate_script(&script) {
                tracing::warn!("Failed to evaluate page script: {e}");
            }
        }
    }

    /// Tell the controller the window was covered or uncovered.
    pub(super) fn forward_visibility(&self, visibility: Visibility) {
        if let Err(e) = self.events.try_send(SyncEvent::Visibility(visibility)) {
            tracing::debug!("Dropping visibility change: {e}");
        }
    }

    /// Stop the controller, then tear down the webview and runtime.
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Closing preview");

        self.context.invalidate();
        self.webview = None;

        if let Some(rt) = self.runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }
    }
}
