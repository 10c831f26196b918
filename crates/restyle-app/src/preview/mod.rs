//! The `browse` preview window.
//!
//! A winit window hosts one webview on the main thread. The page's Live Sync
//! controller runs on the tokio runtime and reaches the webview only through
//! a script queue, which the window drains whenever it is woken.

mod core;
mod event_handler;
mod sink;

use std::path::Path;
use std::sync::Arc;

use restyle_common::keys::STATE_KEYS;
use restyle_common::RestyleError;
use restyle_config::{seed_defaults, RestyleConfig};
use restyle_sync::{
    message_channel, ExtensionContext, KeyValueStore, LiveSync, PageRegistry, PersistedState,
    SyncTimings, ThemeClient,
};
use restyle_webview::{PageHandle, PreviewConfig, ScriptPage};
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};
use winit::event_loop::EventLoop;

use crate::commands::open_store;

use self::core::PreviewApp;
use sink::{ProxySink, UserEvent};

/// Page id of the single previewed page.
const PAGE_ID: &str = "preview";

/// Open `url` in a preview window and keep it styled until the window closes.
pub fn run(
    url: &str,
    config: &RestyleConfig,
    store_override: Option<&Path>,
    runtime: Runtime,
) -> Result<(), RestyleError> {
    let store = open_store(config, store_override)?;
    runtime.block_on(seed_defaults(&store))?;
    let watch = {
        let _guard = runtime.enter();
        store.watch(config.store.watch_debounce())
    };

    let event_loop = EventLoop::<UserEvent>::with_user_event()
        .build()
        .map_err(|e| RestyleError::WebView(format!("failed to create event loop: {e}")))?;

    let (script_tx, script_rx) = std::sync::mpsc::channel();
    let page = PageHandle::new(url);
    let context = ExtensionContext::new();
    let store: Arc<dyn KeyValueStore> = Arc::new(store);

    let sync = LiveSync::new(
        ScriptPage::new(page.clone(), ProxySink::new(script_tx, event_loop.create_proxy())),
        PAGE_ID,
        &PageRegistry::new(),
        Arc::clone(&store),
        context.clone(),
        SyncTimings::from(&config.sync),
    )?;
    let (sender, inbox) = message_channel(64);
    runtime.spawn(sync.run(inbox));

    let client = ThemeClient::new(Arc::clone(&store), Arc::new(sender.clone()));
    runtime.spawn(push_current_theme(client, store));

    let mut app = PreviewApp::new(
        config.window.clone(),
        PreviewConfig::with_url(url),
        page,
        sender.events(),
        script_rx,
        context,
        runtime,
    );

    info!(url, "opening preview");
    let result = event_loop.run_app(&mut app);
    watch.abort();
    result.map_err(|e| RestyleError::WebView(format!("event loop error: {e}")))
}

/// Push the selected theme the way a theme manager does when it opens, so
/// the controller becomes ready for theme edits made from the CLI.
async fn push_current_theme(client: ThemeClient, store: Arc<dyn KeyValueStore>) {
    let state = match store.get(STATE_KEYS).await {
        Ok(entries) => PersistedState::from_entries(&entries),
        Err(e) => {
            warn!("failed to read theme state: {e}");
            return;
        }
    };
    if !state.enabled {
        debug!("theming disabled, nothing to push");
        return;
    }
    let Some(theme) = state.current_theme() else {
        debug!("no theme selected, nothing to push");
        return;
    };

    match client.apply_now(theme).await {
        Ok(delivery) => info!(theme = %theme.id, ?delivery, "pushed current theme"),
        Err(e) => warn!(theme = %theme.id, "failed to push theme: {e}"),
    }
}
