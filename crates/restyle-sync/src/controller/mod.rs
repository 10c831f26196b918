//! The Live Sync controller.
//!
//! One [`LiveSync`] runs per page. It moves through
//! `Uninitialized → Listening → Ready`:
//!
//! - **Uninitialized**: waiting out the startup delay. Nothing is read.
//! - **Listening**: inbox and storage changes are being consumed. The first
//!   evaluation runs once the document is ready. Only enabled-flag changes
//!   are acted on.
//! - **Ready**: the first message from the UI has been handled. Theme,
//!   selection and last-applied changes now trigger re-evaluation too.
//!
//! All work happens on one task: [`LiveSync::run`] selects over the inbox,
//! the storage change feed and the next timer deadline.

mod evaluate;
mod handlers;


use std::sync::Arc;
use std::time::Duration;

use restyle_common::keys::STATE_KEYS;
use restyle_common::{SyncError, Theme};
use restyle_css::{validate, CssIssue};
use restyle_inject::{ApplyOutcome, StyleInjector};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub use evaluate::{admit_pushed, resolve, PersistedState, RemoveReason, Verdict};

use crate::event::SyncEvent;
use crate::page::Page;
use crate::ports::{ExtensionContext, KeyValueStore, StorageChange};
use crate::registry::{PageClaim, PageRegistry};
use crate::schedule::{TimerKind, Timers};

// =============================================================================
// TYPES
// =============================================================================

/// Controller delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTimings {
    /// Wait before registering listeners.
    pub startup_delay: Duration,
    /// Wait before the single style insertion retry.
    pub insert_retry: Duration,
    /// Wait before re-applying after the page removed the style node.
    pub reapply_delay: Duration,
}

impl Default for SyncTimings {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(500),
            insert_retry: Duration::from_millis(100),
            reapply_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    Listening,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ApplyMode {
    /// Skip when the same CSS is already held.
    Normal,
    /// Re-insert unless the held node is still attached with the same CSS.
    Forced,
}

/// Keeps one page's injected theme in sync with persisted state.
pub struct LiveSync<P: Page> {
    injector: StyleInjector<P>,
    store: Arc<dyn KeyValueStore>,
    context: ExtensionContext,
    timings: SyncTimings,
    timers: Timers<TimerKind>,
    state: ControllerState,
    changes: Option<broadcast::Receiver<Vec<StorageChange>>>,
    initialized: bool,
    hidden: bool,
    /// CSS to restore when the `Reapply` timer fires.
    removed_css: Option<String>,
    claim: PageClaim,
}

// =============================================================================
// LIFECYCLE
// =============================================================================

impl<P: Page> LiveSync<P> {
    /// Create the controller for `page_id` and arm the startup timer.
    ///
    /// Fails if the context is already invalid or the page already has a
    /// controller.
    pub fn new(
        page: P,
        page_id: &str,
        registry: &PageRegistry,
        store: Arc<dyn KeyValueStore>,
        context: ExtensionContext,
        timings: SyncTimings,
    ) -> Result<Self, SyncError> {
        context.check()?;
        let claim = registry.claim(page_id)?;

        let mut timers = Timers::new();
        timers.schedule(TimerKind::Startup, timings.startup_delay);
        debug!(page = page_id, delay = ?timings.startup_delay, "live sync created");

        Ok(Self {
            injector: StyleInjector::new(page),
            store,
            context,
            timings,
            timers,
            state: ControllerState::Uninitialized,
            changes: None,
            initialized: false,
            hidden: false,
            removed_css: None,
            claim,
        })
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Whether the first evaluation has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn injector(&self) -> &StyleInjector<P> {
        &self.injector
    }

    pub fn page(&self) -> &P {
        self.injector.host()
    }

    pub fn timers(&self) -> &Timers<TimerKind> {
        &self.timers
    }

    /// Drive the controller until its inbox closes or the context dies.
    pub async fn run(mut self, mut inbox: mpsc::Receiver<SyncEvent>) {
        info!(page = self.claim.page_id(), "live sync started");

        loop {
            if !self.context.is_valid() {
                info!(page = self.claim.page_id(), "context invalidated, stopping live sync");
                break;
            }

            let listening = self.state != ControllerState::Uninitialized;
            let deadline = self.timers.next_deadline();

            tokio::select! {
                _ = sleep_until(deadline) => self.tick().await,
                event = inbox.recv(), if listening => match event {
                    Some(event) => self.handle(event).await,
                    None => {
                        info!(page = self.claim.page_id(), "inbox closed, stopping live sync");
                        break;
                    }
                },
                batch = next_changes(&mut self.changes), if listening => {
                    self.on_change_feed(batch).await;
                }
            }
        }
    }

    /// Fire every timer that is due.
    pub async fn tick(&mut self) {
        for kind in self.timers.take_due(Instant::now()) {
            debug!(?kind, "timer fired");
            match kind {
                TimerKind::Startup => self.listen().await,
                TimerKind::InsertRetry => {
                    let outcome = self.injector.retry_pending();
                    debug!(?outcome, "insert retry");
                }
                TimerKind::Reapply => self.restore_removed().await,
            }
        }
    }

    /// Register listeners and, if the document is ready, run the first
    /// evaluation. Idempotent.
    pub async fn listen(&mut self) {
        if self.state != ControllerState::Uninitialized {
            return;
        }
        if !self.context.is_valid() {
            debug!("context invalidated before listening");
            return;
        }

        self.timers.cancel(TimerKind::Startup);
        self.changes = Some(self.store.subscribe());
        self.state = ControllerState::Listening;
        info!(page = self.claim.page_id(), "live sync listening");

        if self.page().is_document_ready() {
            self.initialize().await;
        } else {
            debug!("document still loading, waiting for ready");
        }
    }

    async fn initialize(&mut self) {
        self.initialized = true;
        self.evaluate(ApplyMode::Normal).await;
    }

    async fn on_change_feed(&mut self, batch: Result<Vec<StorageChange>, RecvError>) {
        match batch {
            Ok(batch) => self.on_changes(&batch).await,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "storage change feed lagged");
                if self.state == ControllerState::Ready {
                    self.evaluate(ApplyMode::Normal).await;
                }
            }
            Err(RecvError::Closed) => {
                warn!("storage change feed closed");
                self.changes = None;
            }
        }
    }
}

// =============================================================================
// EVALUATION
// =============================================================================

impl<P: Page> LiveSync<P> {
    async fn read_state(&self) -> Result<PersistedState, SyncError> {
        self.context.check()?;
        let entries = self.store.get(STATE_KEYS).await?;
        // The context may have died while the read was in flight.
        self.context.check()?;
        Ok(PersistedState::from_entries(&entries))
    }

    /// Read persisted state and make the page match it.
    async fn evaluate(&mut self, mode: ApplyMode) {
        let state = match self.read_state().await {
            Ok(state) => state,
            Err(SyncError::ContextInvalidated) => {
                debug!("context invalidated, skipping evaluation");
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted state");
                return;
            }
        };

        let url = self.page().url();
        match resolve(&state, &url) {
            Verdict::Apply { theme_id, css } => {
                let outcome = match mode {
                    ApplyMode::Normal => self.injector.apply(&css),
                    ApplyMode::Forced => self.injector.reassert(&css),
                };
                debug!(theme = %theme_id, %url, ?outcome, "evaluated theme");
                if let Some(theme) = state.current_theme() {
                    report_issues(theme, &fresh_issues(outcome, theme));
                }
                self.after_apply(outcome);
            }
            Verdict::Remove(reason) => {
                debug!(?reason, %url, "no theme for page");
                self.remove_theme();
            }
        }
    }

    /// Put back the stylesheet the page removed, if the page still admits it.
    ///
    /// The held CSS is restored as is: it may have been pushed by the UI and
    /// differ from the selected theme's source.
    async fn restore_removed(&mut self) {
        let Some(css) = self.removed_css.take() else {
            return;
        };

        let state = match self.read_state().await {
            Ok(state) => state,
            Err(SyncError::ContextInvalidated) => {
                debug!("context invalidated, skipping re-apply");
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted state for re-apply");
                return;
            }
        };

        let url = self.page().url();
        match admit_pushed(&state, &url) {
            Ok(()) => {
                let outcome = self.injector.reassert(&css);
                debug!(%url, ?outcome, "re-applied removed stylesheet");
                self.after_apply(outcome);
            }
            Err(reason) => {
                debug!(?reason, %url, "removed stylesheet no longer admitted");
                self.remove_theme();
            }
        }
    }

    fn after_apply(&mut self, outcome: ApplyOutcome) {
        match outcome {
            ApplyOutcome::Deferred => {
                self.cancel_reapply();
                self.timers
                    .schedule(TimerKind::InsertRetry, self.timings.insert_retry);
            }
            ApplyOutcome::Inserted | ApplyOutcome::Removed => {
                self.cancel_reapply();
                self.timers.cancel(TimerKind::InsertRetry);
            }
            ApplyOutcome::Unchanged => {}
        }
    }

    fn cancel_reapply(&mut self) {
        self.removed_css = None;
        self.timers.cancel(TimerKind::Reapply);
    }

    fn remove_theme(&mut self) {
        self.injector.remove();
        self.timers.cancel(TimerKind::InsertRetry);
        self.cancel_reapply();
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Problems in `theme`'s source worth logging after an apply.
///
/// Only a fresh insertion reports; re-evaluations that leave the page as it
/// was stay quiet.
fn fresh_issues(outcome: ApplyOutcome, theme: &Theme) -> Vec<CssIssue> {
    match outcome {
        ApplyOutcome::Inserted => validate(&theme.css),
        _ => Vec::new(),
    }
}

/// Log problems in a theme's source. Never blocks application.
fn report_issues(theme: &Theme, issues: &[CssIssue]) {
    for issue in issues {
        warn!(
            theme = %theme.id,
            line = issue.line,
            kind = ?issue.kind,
            "{}",
            issue.message
        );
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn next_changes(
    changes: &mut Option<broadcast::Receiver<Vec<StorageChange>>>,
) -> Result<Vec<StorageChange>, RecvError> {
    match changes {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
