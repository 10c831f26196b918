//! UI-side handle for applying themes to a page and editing shared state.

use std::sync::Arc;

use chrono::Utc;
use restyle_common::keys::{CURRENT_THEME_ID, IS_ENABLED, LAST_APPLIED};
use restyle_common::{MessagingError, StoreError, Theme, ThemeId};
use restyle_css::transform;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::ports::{Entries, KeyValueStore, MessageSender, Request, Response};

/// How a pushed message fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The page's controller accepted it.
    Delivered,
    /// No controller is running in the page. Not an error: the stored state
    /// still applies once one starts.
    NoReceiver,
    /// The controller answered with an error.
    Rejected(String),
}

/// What the controlling UI uses to talk to one page and to the shared store.
pub struct ThemeClient {
    store: Arc<dyn KeyValueStore>,
    sender: Arc<dyn MessageSender>,
}

impl ThemeClient {
    pub fn new(store: Arc<dyn KeyValueStore>, sender: Arc<dyn MessageSender>) -> Self {
        Self { store, sender }
    }

    /// Transform `theme` and push the result to the page, then bump
    /// `lastApplied` so a page that missed the message still catches up.
    pub async fn apply_now(&self, theme: &Theme) -> Result<Delivery, StoreError> {
        let css = transform(&theme.css);
        let delivery = self.deliver(Request::ApplyCss { css: Some(css) }).await;
        debug!(theme = %theme.id, ?delivery, "pushed theme");
        self.touch_last_applied().await?;
        Ok(delivery)
    }

    /// Remove the theme from the page.
    pub async fn remove_now(&self) -> Delivery {
        self.deliver(Request::RemoveCss).await
    }

    /// Whether a controller is running in the page.
    pub async fn is_alive(&self) -> bool {
        matches!(
            self.sender.send(Request::Ping).await,
            Ok(Response::Ok {
                success: true,
                ready: Some(true)
            })
        )
    }

    pub async fn set_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.store.set(entry(IS_ENABLED, json!(enabled))).await
    }

    pub async fn select_theme(&self, id: &ThemeId) -> Result<(), StoreError> {
        self.store
            .set(entry(CURRENT_THEME_ID, json!(id.as_str())))
            .await
    }

    async fn deliver(&self, request: Request) -> Delivery {
        match self.sender.send(request).await {
            Ok(Response::Error { error }) => Delivery::Rejected(error),
            Ok(_) => Delivery::Delivered,
            Err(e @ (MessagingError::NoReceiver | MessagingError::Dropped)) => {
                debug!(error = %e, "no controller in page");
                Delivery::NoReceiver
            }
        }
    }

    /// Write a `lastApplied` marker strictly greater than the stored one.
    async fn touch_last_applied(&self) -> Result<(), StoreError> {
        let previous = self
            .store
            .get(&[LAST_APPLIED])
            .await?
            .get(LAST_APPLIED)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let marker = Utc::now().timestamp_millis().max(previous + 1);
        if let Err(e) = self.store.set(entry(LAST_APPLIED, json!(marker))).await {
            warn!(error = %e, "failed to write lastApplied marker");
            return Err(e);
        }
        Ok(())
    }
}

fn entry(key: &str, value: Value) -> Entries {
    let mut entries = Entries::new();
    entries.insert(key.to_string(), value);
    entries
}
