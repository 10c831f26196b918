//! Event, message and storage-change handlers.

use restyle_common::keys::{CURRENT_THEME_ID, IS_ENABLED, LAST_APPLIED, THEMES};
use restyle_common::SyncError;
use tracing::{debug, info};

use super::{admit_pushed, ApplyMode, ControllerState, LiveSync};
use crate::event::SyncEvent;
use crate::page::{Page, Visibility};
use crate::ports::{Inbound, Request, Response, StorageChange};
use crate::schedule::TimerKind;

/// Keys whose changes only matter once the UI has talked to us.
const READY_KEYS: &[&str] = &[THEMES, CURRENT_THEME_ID, LAST_APPLIED];

impl<P: Page> LiveSync<P> {
    /// Handle one inbox event.
    pub async fn handle(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Message(inbound) => self.on_message(inbound).await,
            SyncEvent::DocumentReady => self.on_document_ready().await,
            SyncEvent::Visibility(visibility) => self.on_visibility(visibility).await,
            SyncEvent::StyleNodeRemoved => self.on_style_removed(),
            SyncEvent::UrlChanged(url) => self.on_url_changed(&url).await,
        }
    }

    // =========================================================================
    // MESSAGES
    // =========================================================================

    async fn on_message(&mut self, inbound: Inbound) {
        if !self.context.is_valid() {
            debug!(request = ?inbound.request, "context invalidated, dropping message");
            return;
        }

        if self.state == ControllerState::Listening {
            self.state = ControllerState::Ready;
            info!(page = self.claim.page_id(), "live sync ready");
        }

        let result = match &inbound.request {
            Request::ApplyCss { css } => self.apply_pushed(css.as_deref()).await,
            Request::RemoveCss => {
                self.remove_theme();
                Ok(Response::success())
            }
            Request::Ping => Ok(Response::pong()),
            Request::Unknown => {
                debug!("unknown message action");
                Ok(Response::unknown_action())
            }
        };

        match result {
            Ok(response) => inbound.respond(response),
            Err(SyncError::ContextInvalidated) => {
                debug!("context invalidated while handling message");
            }
            Err(e) => inbound.respond(Response::error(e.to_string())),
        }
    }

    /// Apply CSS the UI already transformed, after the enabled/URL gate.
    async fn apply_pushed(&mut self, css: Option<&str>) -> Result<Response, SyncError> {
        let Some(css) = css.filter(|css| !css.trim().is_empty()) else {
            self.remove_theme();
            return Ok(Response::success());
        };

        let state = self.read_state().await?;
        let url = self.page().url();
        match admit_pushed(&state, &url) {
            Ok(()) => {
                let outcome = self.injector.apply(css);
                debug!(%url, ?outcome, "applied pushed css");
                self.after_apply(outcome);
            }
            Err(reason) => {
                debug!(?reason, %url, "pushed css not admitted");
                self.remove_theme();
            }
        }
        Ok(Response::success())
    }

    // =========================================================================
    // STORAGE
    // =========================================================================

    /// React to a batch of persisted-state changes.
    pub async fn on_changes(&mut self, batch: &[StorageChange]) {
        if !self.context.is_valid() {
            debug!("context invalidated, ignoring storage change");
            return;
        }

        let changed = |key: &str| batch.iter().any(|change| change.key == key);

        if changed(IS_ENABLED) {
            debug!("enabled flag changed");
            self.evaluate(ApplyMode::Normal).await;
            return;
        }

        if READY_KEYS.iter().any(|key| changed(*key)) {
            if self.state == ControllerState::Ready {
                self.evaluate(ApplyMode::Normal).await;
            } else {
                debug!(state = ?self.state, "ignoring theme change before ready");
            }
        }
    }

    // =========================================================================
    // PAGE EVENTS
    // =========================================================================

    async fn on_document_ready(&mut self) {
        if self.injector.pending_css().is_some() {
            self.timers.cancel(TimerKind::InsertRetry);
            let outcome = self.injector.retry_pending();
            debug!(?outcome, "retried insertion on document ready");
        }

        if self.state != ControllerState::Uninitialized && !self.initialized {
            self.initialize().await;
        }
    }

    async fn on_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => self.hidden = true,
            Visibility::Visible => {
                let was_hidden = std::mem::replace(&mut self.hidden, false);
                if was_hidden && self.initialized {
                    debug!("page visible again, re-asserting theme");
                    self.evaluate(ApplyMode::Forced).await;
                }
            }
        }
    }

    fn on_style_removed(&mut self) {
        if self.injector.is_active() && !self.injector.is_attached() {
            debug!(delay = ?self.timings.reapply_delay, "style node removed by page, scheduling re-apply");
            self.removed_css = self.injector.current_css().map(str::to_owned);
            self.timers
                .schedule(TimerKind::Reapply, self.timings.reapply_delay);
        }
    }

    async fn on_url_changed(&mut self, url: &str) {
        debug!(%url, "page url changed");
        if self.initialized {
            self.evaluate(ApplyMode::Normal).await;
        }
    }
}
