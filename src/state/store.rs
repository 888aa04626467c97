//! The UI state store: single source of truth for transient UI chrome state.
//!
//! A store is activated once at application-root scope and handed to any
//! component that needs UI state. Activation registers navigation handlers,
//! restores a persisted snapshot and launches the capability probe; every
//! update publishes a fresh `Arc<UiState>` to subscribers.

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::capability::{run_probe, CapabilityProbe, ProbeError};
use crate::data::{PersistedSlot, SlotError};
use crate::navigation::{
    HandlerId, NavigationEvent, NavigationEventKind, NavigationHandler, NavigationSource,
};

use super::change::UiStateChange;
use super::model::{ContextMenu, UiState};

/// Slot key the snapshot is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "UiData";

/// How a persisted snapshot is applied on restore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreMode {
    /// The snapshot replaces the whole record; omitted fields become absent
    #[default]
    Replace,
    /// Omitted fields fall back to the default record
    MergeOverDefaults,
}

/// Result of reading the persisted slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RestoreOutcome {
    /// A snapshot was applied
    Restored,
    /// The slot held nothing
    Absent,
    /// The slot could not be read or parsed, or the store is deactivated; state unchanged
    Rejected,
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to serialize UI state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write UI state: {0}")]
    Slot(#[from] SlotError),
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Key of the persisted slot
    pub storage_key: String,
    pub restore_mode: RestoreMode,
    /// Deadline for the capability probe (None = wait indefinitely)
    pub probe_timeout: Option<Duration>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            restore_mode: RestoreMode::Replace,
            probe_timeout: Some(Duration::from_secs(2)),
        }
    }
}

struct StoreInner {
    state: watch::Sender<Arc<UiState>>,
    options: StoreOptions,
    source: Arc<dyn NavigationSource>,
    registrations: Mutex<Vec<(NavigationEventKind, HandlerId)>>,
    cancel: CancellationToken,
    probe_done: watch::Receiver<bool>,
}

/// Flags the activation probe as finished when its task ends, however it ends
struct ProbeFinished(watch::Sender<bool>);

impl Drop for ProbeFinished {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::warn!("Capability probe task panicked");
        }
        self.0.send_replace(true);
    }
}

impl StoreInner {
    /// Replace the record with `f(current)`. No-op once deactivated.
    ///
    /// `f` runs while the record is locked and must not call back into the store.
    fn update(&self, reason: &'static str, f: impl FnOnce(&UiState) -> UiState) -> bool {
        if self.cancel.is_cancelled() {
            tracing::debug!(reason, "Ignoring UI state update on deactivated store");
            return false;
        }
        self.state.send_modify(|current| {
            let next = f(current);
            *current = Arc::new(next);
        });
        tracing::trace!(reason, "UI state updated");
        true
    }

    fn apply(&self, change: UiStateChange) -> bool {
        self.update(change.name(), |prev| change.apply(prev))
    }

    fn handle_navigation(&self, event: &NavigationEvent) {
        match event {
            NavigationEvent::Complete { url, meta } => {
                tracing::debug!(url = %url, shallow = meta.shallow, "Navigation complete, closing side menu");
                self.apply(UiStateChange::SideMenuVisibility(false));
            }
            NavigationEvent::Start { url, meta } => {
                tracing::trace!(url = %url, shallow = meta.shallow, "Navigation started");
            }
            NavigationEvent::Error { error, url, meta } => {
                tracing::debug!(
                    url = %url,
                    shallow = meta.shallow,
                    cancelled = error.is_cancelled(),
                    message = ?error.message,
                    "Navigation failed"
                );
            }
        }
    }

    fn apply_probe_result(&self, probe: &str, result: Result<bool, ProbeError>) {
        match result {
            Ok(true) => {
                if self.apply(UiStateChange::CapabilityDetected) {
                    tracing::info!(probe, "Platform authenticator available");
                }
            }
            Ok(false) => {
                tracing::debug!(probe, "Platform authenticator not available");
            }
            Err(e) => {
                tracing::warn!(
                    probe,
                    error = %e,
                    "Capability probe failed, treating platform authenticator as unavailable"
                );
            }
        }
    }

    fn deactivate(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();

        let registrations = std::mem::take(&mut *self.registrations.lock());
        for (kind, id) in registrations {
            if !self.source.off(kind, id) {
                tracing::debug!(event = %kind, handler = %id, "Navigation handler was already removed");
            }
        }
        tracing::debug!("UI state store deactivated");
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Handle to an activated UI state store.
///
/// Clones share the same store. The store deactivates when
/// [`UiStateStore::deactivate`] is called or the last handle is dropped;
/// setters and modifiers handed out earlier become inert at that point.
#[derive(Clone)]
pub struct UiStateStore {
    inner: Arc<StoreInner>,
}

impl UiStateStore {
    /// Activate a store: start from the default record, subscribe to the
    /// three navigation events, restore from `slot` and launch the
    /// capability probe in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(
        source: Arc<dyn NavigationSource>,
        probe: Arc<dyn CapabilityProbe>,
        slot: &dyn PersistedSlot,
        options: StoreOptions,
    ) -> Self {
        let (state, _) = watch::channel(Arc::new(UiState::default()));
        let (probe_finished, probe_done) = watch::channel(false);
        let store = Self {
            inner: Arc::new(StoreInner {
                state,
                options,
                source,
                registrations: Mutex::new(Vec::new()),
                cancel: CancellationToken::new(),
                probe_done,
            }),
        };

        store.register_handlers();
        let outcome = store.restore(slot);
        store.spawn_probe(probe, ProbeFinished(probe_finished));

        tracing::debug!(
            key = %store.inner.options.storage_key,
            restore = ?outcome,
            "UI state store activated"
        );
        store
    }

    fn register_handlers(&self) {
        let mut registrations = self.inner.registrations.lock();
        for kind in NavigationEventKind::all() {
            let weak = Arc::downgrade(&self.inner);
            let handler: NavigationHandler = Arc::new(move |event: &NavigationEvent| {
                if let Some(inner) = weak.upgrade() {
                    inner.handle_navigation(event);
                }
            });
            let id = self.inner.source.on(*kind, handler);
            registrations.push((*kind, id));
        }
    }

    fn spawn_probe(&self, probe: Arc<dyn CapabilityProbe>, finished: ProbeFinished) {
        let weak = Arc::downgrade(&self.inner);
        let cancel = self.inner.cancel.clone();
        let timeout = self.inner.options.probe_timeout;

        tokio::spawn(async move {
            let _finished = finished;
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::debug!(probe = probe.name(), "Store deactivated, dropping capability probe");
                    return;
                }
                result = run_probe(probe.as_ref(), timeout) => result,
            };

            match weak.upgrade() {
                Some(inner) => inner.apply_probe_result(probe.name(), result),
                None => tracing::debug!(probe = probe.name(), "Store gone before capability probe finished"),
            }
        });
    }

    /// Wait until the activation probe has finished and its result, if any,
    /// has been applied. Any number of callers may wait at once; all of
    /// them return once the probe is done.
    pub async fn wait_for_probe(&self) {
        let mut done = self.inner.probe_done.clone();
        if done.wait_for(|finished| *finished).await.is_err() {
            tracing::debug!("Capability probe task dropped before finishing");
        }
    }

    /// Read the persisted slot and apply its snapshot. Runs once, during
    /// activation, before the probe is launched.
    ///
    /// Read and parse failures are logged and leave the state unchanged.
    fn restore(&self, slot: &dyn PersistedSlot) -> RestoreOutcome {
        let options = &self.inner.options;
        let key = options.storage_key.as_str();

        let raw = match slot.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                tracing::debug!(key, "No persisted UI state");
                return RestoreOutcome::Absent;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read persisted UI state");
                return RestoreOutcome::Rejected;
            }
        };

        let snapshot: UiState = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed persisted UI state");
                return RestoreOutcome::Rejected;
            }
        };

        let snapshot = match options.restore_mode {
            RestoreMode::Replace => snapshot,
            RestoreMode::MergeOverDefaults => snapshot.merged_over(&UiState::default()),
        };

        let applied = self.inner.update("restore", move |_| snapshot);

        if applied {
            tracing::debug!(key, mode = ?options.restore_mode, "Restored persisted UI state");
            RestoreOutcome::Restored
        } else {
            RestoreOutcome::Rejected
        }
    }

    /// Write the current snapshot to `slot` under the configured key
    pub fn persist(&self, slot: &dyn PersistedSlot) -> Result<(), PersistError> {
        let json = serde_json::to_string(self.state().as_ref())?;
        slot.set(&self.inner.options.storage_key, &json)?;
        tracing::debug!(key = %self.inner.options.storage_key, "Persisted UI state");
        Ok(())
    }

    /// Unregister navigation handlers and stop the in-flight probe.
    ///
    /// Later updates, including a late probe result, are ignored.
    pub fn deactivate(&self) {
        self.inner.deactivate();
    }

    pub fn is_active(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    /// Current snapshot of the record
    pub fn state(&self) -> Arc<UiState> {
        self.inner.state.borrow().clone()
    }

    /// Current snapshot plus the generic setter
    pub fn ui_state(&self) -> (Arc<UiState>, UiStateSetter) {
        (self.state(), self.setter())
    }

    pub fn setter(&self) -> UiStateSetter {
        UiStateSetter {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether the capability probe has reported platform authenticator support
    pub fn is_web_authn_supported(&self) -> bool {
        self.inner.state.borrow().web_authn_supported()
    }

    pub fn modifier(&self) -> UiStateModifier {
        UiStateModifier {
            setter: self.setter(),
        }
    }

    /// Receive every new snapshot as it is published
    pub fn subscribe(&self) -> watch::Receiver<Arc<UiState>> {
        self.inner.state.subscribe()
    }
}

impl fmt::Debug for UiStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiStateStore")
            .field("active", &self.is_active())
            .field("state", &self.state())
            .field("options", &self.inner.options)
            .finish()
    }
}

/// Generic functional setter (`previous state -> next state`)
#[derive(Clone)]
pub struct UiStateSetter {
    inner: Weak<StoreInner>,
}

impl UiStateSetter {
    /// Replace the record with `f(previous)`.
    ///
    /// `f` must not call back into the store.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&UiState) -> UiState,
    {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.update("setter", f);
            }
            None => tracing::debug!("Ignoring UI state update, store is gone"),
        }
    }

    pub fn replace(&self, next: UiState) {
        self.update(move |_| next);
    }

    fn apply(&self, change: UiStateChange) {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.apply(change);
            }
            None => tracing::debug!(change = change.name(), "Ignoring UI state change, store is gone"),
        }
    }
}

impl fmt::Debug for UiStateSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiStateSetter")
            .field("attached", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// Named convenience mutators
#[derive(Debug, Clone)]
pub struct UiStateModifier {
    setter: UiStateSetter,
}

impl UiStateModifier {
    pub fn set_full_screen_menu_open(&self, show: bool) {
        self.setter.apply(UiStateChange::FullScreenMenuOpen(show));
    }

    pub fn set_header_footer_visibility(&self, header: bool, footer: bool) {
        self.setter
            .apply(UiStateChange::HeaderFooterVisibility { header, footer });
    }

    pub fn set_side_menu_visibility(&self, visible: bool) {
        self.setter.apply(UiStateChange::SideMenuVisibility(visible));
    }

    /// Replace the whole context menu; use [`ContextMenu::new`] for the
    /// `editor` kind at the origin.
    pub fn set_context_menu(&self, menu: ContextMenu) {
        self.setter.apply(UiStateChange::ContextMenu(menu));
    }
}
