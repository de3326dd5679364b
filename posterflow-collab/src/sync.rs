//! Collaboration synchronizer.
//!
//! Bridges a local [`HistoryStore`] and a shared poster document:
//!
//! ```text
//! user edit ──► HistoryStore::set ──► Debouncer (1s quiescence)
//!                                          │
//!                                          ▼
//!                                DocumentStore::update (LWW)
//!                                          │  change notifications
//!                                          ▼
//! other session ◄── HistoryStore::apply_remote ◄── listener task
//! ```
//!
//! A session starts `Local`: edits stay in the history store only. `share`
//! writes a new shared document seeded with the present value and transitions
//! to `Shared`; `join` attaches to an existing document instead. Once shared,
//! a session stays shared for its lifetime.
//!
//! While shared, every local mutation arms the debouncer so rapid keystrokes
//! coalesce into one remote write carrying the value at the end of the
//! quiescence window. Remote changes made by other identities are applied
//! silently (no undo step); our own echoes are skipped.
//!
//! Conflicts resolve by whole-document last-write-wins. Two collaborators
//! editing different fields inside one debounce window will drop one side's
//! change; callers needing stronger guarantees must merge above this layer.
//!
//! The local history store is authoritative: a failed push is logged,
//! surfaced as an event, and implicitly retried by the next edit (or
//! explicitly via [`CollabSession::flush`]). No store failure is fatal;
//! worst case the session degrades to local-only editing with history
//! intact.
//!
//! Reference: Kleppmann, Chapter 5 — last-write-wins replication

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use posterflow_core::{HistoryStore, PosterState};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE};
use crate::document::{share_link, DocumentId, SharedPosterDocument, UserId};
use crate::store::{DocumentStore, StoreError};

/// Synchronizer failures (store failures plus session misuse).
#[derive(Debug, Clone)]
pub enum SyncError {
    Store(StoreError),
    /// Operation requires a shared document but the session is local.
    NotShared,
    /// The session is already attached to a shared document.
    AlreadyShared(DocumentId),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "store error: {e}"),
            Self::NotShared => write!(f, "session is not attached to a shared document"),
            Self::AlreadyShared(id) => write!(f, "session already shares document {id}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Whether the session is attached to a remote document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncMode {
    Local,
    Shared(DocumentId),
}

/// Events emitted by a session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The session transitioned to shared.
    Shared { doc_id: DocumentId },
    /// Remote collaborator state was applied silently.
    RemoteApplied { revision: u64, by: UserId },
    /// A debounced (or flushed) push landed.
    Pushed { doc_id: DocumentId },
    /// A push failed; local state is unaffected and will be re-sent.
    PushFailed(String),
    /// The change subscription ended (document deleted or store gone).
    SubscriptionLost,
}

/// Acquire the history lock, recovering from poisoning.
///
/// History operations never panic mid-update, so a poisoned lock still
/// holds a consistent store.
fn lock(history: &Mutex<HistoryStore<PosterState>>) -> MutexGuard<'_, HistoryStore<PosterState>> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Best-effort event delivery: a consumer that stops draining events must
/// never wedge the sync path.
fn emit(tx: &mpsc::Sender<SessionEvent>, event: SessionEvent) {
    let _ = tx.try_send(event);
}

/// One editing session: local history plus optional shared-document sync.
pub struct CollabSession {
    user: UserId,
    store: Arc<dyn DocumentStore>,
    history: Arc<Mutex<HistoryStore<PosterState>>>,
    mode: SyncMode,
    /// Highest remote revision applied so far, shared with the listener.
    remote_revision: Arc<AtomicU64>,
    debouncer: Debouncer,
    listener: Option<JoinHandle<()>>,
    event_tx: mpsc::Sender<SessionEvent>,
    event_rx: Option<mpsc::Receiver<SessionEvent>>,
}

impl CollabSession {
    /// Start a local session with the default 1s push debounce.
    pub fn new(user: UserId, store: Arc<dyn DocumentStore>, initial: PosterState) -> Self {
        Self::with_debounce(user, store, initial, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(
        user: UserId,
        store: Arc<dyn DocumentStore>,
        initial: PosterState,
        window: std::time::Duration,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(256);
        Self {
            user,
            store,
            history: Arc::new(Mutex::new(HistoryStore::new(initial))),
            mode: SyncMode::Local,
            remote_revision: Arc::new(AtomicU64::new(0)),
            debouncer: Debouncer::new(window),
            listener: None,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Take the event receiver (can only be called once).
    pub fn take_event_rx(&mut self) -> Option<mpsc::Receiver<SessionEvent>> {
        self.event_rx.take()
    }

    pub fn user(&self) -> &UserId {
        &self.user
    }

    pub fn mode(&self) -> &SyncMode {
        &self.mode
    }

    pub fn is_shared(&self) -> bool {
        matches!(self.mode, SyncMode::Shared(_))
    }

    /// Attached document id, if shared.
    pub fn doc_id(&self) -> Option<&DocumentId> {
        match &self.mode {
            SyncMode::Shared(id) => Some(id),
            SyncMode::Local => None,
        }
    }

    /// Shareable link for the attached document, if shared.
    pub fn link(&self, origin: &str) -> Option<String> {
        self.doc_id().map(|id| share_link(origin, id))
    }

    /// Snapshot of the current poster state.
    pub fn present(&self) -> PosterState {
        lock(&self.history).present().clone()
    }

    pub fn can_undo(&self) -> bool {
        lock(&self.history).can_undo()
    }

    pub fn can_redo(&self) -> bool {
        lock(&self.history).can_redo()
    }

    /// Replace the poster state, recording an undo step.
    ///
    /// Returns whether anything changed; an unchanged value records nothing
    /// and schedules no push.
    pub fn set(&mut self, new: PosterState) -> bool {
        let changed = lock(&self.history).set(new);
        if changed {
            self.schedule_push();
        }
        changed
    }

    /// Functional-updater form of [`set`](Self::set).
    pub fn set_with(&mut self, update: impl FnOnce(&PosterState) -> PosterState) -> bool {
        let changed = lock(&self.history).set_with(update);
        if changed {
            self.schedule_push();
        }
        changed
    }

    /// Undo one step. Mutates the present, so it also schedules a push.
    pub fn undo(&mut self) -> bool {
        let applied = lock(&self.history).undo();
        if applied {
            self.schedule_push();
        }
        applied
    }

    /// Redo one step. Mutates the present, so it also schedules a push.
    pub fn redo(&mut self) -> bool {
        let applied = lock(&self.history).redo();
        if applied {
            self.schedule_push();
        }
        applied
    }

    /// Create a shared document seeded with the present value and attach.
    ///
    /// On success returns the new document id (the basis of the share link)
    /// and the session is `Shared`. On failure the session stays `Local`
    /// and the error is surfaced to the caller.
    pub async fn share(&mut self) -> Result<DocumentId, SyncError> {
        if let SyncMode::Shared(id) = &self.mode {
            return Err(SyncError::AlreadyShared(id.clone()));
        }

        let doc = SharedPosterDocument::new(
            DocumentId::generate(),
            self.user.clone(),
            self.present(),
        );
        let id = self.store.create(doc).await?;
        self.start_listener(id.clone()).await?;

        self.mode = SyncMode::Shared(id.clone());
        log::info!("session {} shared document {id}", self.user);
        emit(&self.event_tx, SessionEvent::Shared { doc_id: id.clone() });
        Ok(id)
    }

    /// Attach to an existing shared document (from a share link).
    ///
    /// The remote state is applied silently, so joining never creates an
    /// undo step. A missing document surfaces `NotFound` and leaves the
    /// session `Local`.
    pub async fn join(&mut self, doc_id: DocumentId) -> Result<(), SyncError> {
        if let SyncMode::Shared(id) = &self.mode {
            return Err(SyncError::AlreadyShared(id.clone()));
        }

        // Subscribe before the snapshot read so a write landing in between
        // reaches the listener instead of being missed.
        self.start_listener(doc_id.clone()).await?;
        let doc = match self.store.get(&doc_id).await {
            Ok(doc) => doc,
            Err(e) => {
                if let Some(handle) = self.listener.take() {
                    handle.abort();
                }
                return Err(e.into());
            }
        };

        // The listener may already have applied a newer change while the
        // snapshot read was in flight; never clobber it with the older read.
        if doc.revision >= self.remote_revision.load(Ordering::SeqCst) {
            self.remote_revision.fetch_max(doc.revision, Ordering::SeqCst);
            lock(&self.history).apply_remote(doc.state);
        }

        self.mode = SyncMode::Shared(doc_id.clone());
        log::info!("session {} joined document {doc_id}", self.user);
        emit(&self.event_tx, SessionEvent::Shared { doc_id });
        Ok(())
    }

    /// Push the present value immediately, bypassing the debounce.
    ///
    /// This is the manual retry path after a `PushFailed` event.
    pub async fn flush(&mut self) -> Result<(), SyncError> {
        let SyncMode::Shared(doc_id) = &self.mode else {
            return Err(SyncError::NotShared);
        };
        let doc_id = doc_id.clone();

        self.debouncer.cancel();
        let snapshot = self.present();
        self.store.update(&doc_id, snapshot, &self.user).await?;
        emit(&self.event_tx, SessionEvent::Pushed { doc_id });
        Ok(())
    }

    /// Tear down: cancel any pending push and stop listening.
    ///
    /// Also runs on drop, so navigating away can never leave a timer or
    /// subscription callback running.
    pub fn close(&mut self) {
        self.debouncer.cancel();
        if let Some(handle) = self.listener.take() {
            handle.abort();
        }
    }

    fn schedule_push(&mut self) {
        let SyncMode::Shared(doc_id) = &self.mode else {
            return;
        };
        let doc_id = doc_id.clone();
        let store = Arc::clone(&self.store);
        let user = self.user.clone();
        let history = Arc::clone(&self.history);
        let event_tx = self.event_tx.clone();

        // Each new edit re-arms the timer; only the state at the end of the
        // quiescence window reaches the store.
        self.debouncer.arm(async move {
            let snapshot = lock(&history).present().clone();
            match store.update(&doc_id, snapshot, &user).await {
                Ok(()) => {
                    log::debug!("pushed state to {doc_id}");
                    emit(&event_tx, SessionEvent::Pushed { doc_id });
                }
                Err(e) => {
                    log::warn!("push to {doc_id} failed: {e}");
                    emit(&event_tx, SessionEvent::PushFailed(e.to_string()));
                }
            }
        });
    }

    async fn start_listener(&mut self, doc_id: DocumentId) -> Result<(), SyncError> {
        let mut rx = self.store.subscribe(&doc_id).await?;
        let user = self.user.clone();
        let history = Arc::clone(&self.history);
        let remote_revision = Arc::clone(&self.remote_revision);
        let event_tx = self.event_tx.clone();

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        // Our own pushes echo back; only foreign writes
                        // are applied.
                        if change.last_modified_by == user {
                            continue;
                        }
                        remote_revision.fetch_max(change.revision, Ordering::SeqCst);
                        let applied = lock(&history).apply_remote(change.state);
                        if applied {
                            emit(
                                &event_tx,
                                SessionEvent::RemoteApplied {
                                    revision: change.revision,
                                    by: change.last_modified_by,
                                },
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Each change carries full state; the next one
                        // makes us whole again.
                        log::debug!("change subscription lagged, skipped {missed}");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        emit(&event_tx, SessionEvent::SubscriptionLost);
                        break;
                    }
                }
            }
        });

        self.listener = Some(handle);
        Ok(())
    }
}

impl Drop for CollabSession {
    fn drop(&mut self) {
        self.close();
    }
}
