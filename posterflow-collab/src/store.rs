//! Document store boundary.
//!
//! The hosted document database is an external collaborator; the synchronizer
//! only sees the [`DocumentStore`] trait. [`MemoryStore`] is the in-process
//! implementation used by tests and the demo: a map of documents, each with
//! its own broadcast channel fanning out change notifications to subscribers.
//!
//! ```text
//! CollabSession A ── update ──► MemoryStore ── DocumentChange ──► session B rx
//!                                  │  (per-document broadcast)
//!                                  └─────────────────────────────► session C rx
//! ```
//!
//! Writes are whole-document last-write-wins: each accepted update replaces
//! the full poster state and bumps a server-assigned revision and timestamp.
//! Change notifications are per-document ordered; there is no ordering
//! guarantee across documents.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use posterflow_core::PosterState;
use tokio::sync::{broadcast, RwLock};

use crate::document::{DocumentId, SharedPosterDocument, UserId};

/// Store boundary failures.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// No document with that id.
    NotFound(DocumentId),
    /// The requester is not allowed to perform this operation.
    PermissionDenied(String),
    /// Transient backend failure (network, quota, ...).
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "document {id} not found"),
            Self::PermissionDenied(why) => write!(f, "permission denied: {why}"),
            Self::Unavailable(why) => write!(f, "store unavailable: {why}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// One change notification, emitted after every accepted write.
///
/// Carries the full post-write state: a subscriber that misses a
/// notification is made whole by the next one.
#[derive(Debug, Clone)]
pub struct DocumentChange {
    pub doc_id: DocumentId,
    pub state: PosterState,
    pub revision: u64,
    pub last_modified: u64,
    pub last_modified_by: UserId,
}

/// Async seam over the hosted document database.
///
/// Write permission is capability-by-link: anyone holding a document id may
/// update its state. Membership changes are owner-only.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document. The caller builds it (client-generated id);
    /// the store assigns `created_at`/`last_modified` and returns the id.
    async fn create(&self, doc: SharedPosterDocument) -> Result<DocumentId, StoreError>;

    /// Replace the document's poster state (last-write-wins).
    async fn update(
        &self,
        id: &DocumentId,
        state: PosterState,
        modified_by: &UserId,
    ) -> Result<(), StoreError>;

    /// Fetch the current document.
    async fn get(&self, id: &DocumentId) -> Result<SharedPosterDocument, StoreError>;

    /// Add `user` to the membership list. Owner-only.
    async fn add_collaborator(
        &self,
        id: &DocumentId,
        requester: &UserId,
        user: &UserId,
    ) -> Result<(), StoreError>;

    /// Subscribe to change notifications for one document.
    ///
    /// Dropping the receiver unsubscribes.
    async fn subscribe(
        &self,
        id: &DocumentId,
    ) -> Result<broadcast::Receiver<DocumentChange>, StoreError>;
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

struct Entry {
    doc: SharedPosterDocument,
    changes: broadcast::Sender<DocumentChange>,
}

impl Entry {
    fn notify(&self) {
        let change = DocumentChange {
            doc_id: self.doc.id.clone(),
            state: self.doc.state.clone(),
            revision: self.doc.revision,
            last_modified: self.doc.last_modified,
            last_modified_by: self.doc.last_modified_by.clone(),
        };
        // No subscribers is fine; the state is still persisted.
        let _ = self.changes.send(change);
    }
}

/// In-memory document store with per-document change fan-out.
pub struct MemoryStore {
    docs: RwLock<HashMap<DocumentId, Entry>>,
    channel_capacity: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// `channel_capacity` bounds how many notifications a slow subscriber
    /// can buffer before it starts lagging.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, mut doc: SharedPosterDocument) -> Result<DocumentId, StoreError> {
        let mut docs = self.docs.write().await;
        if docs.contains_key(&doc.id) {
            return Err(StoreError::Unavailable(format!(
                "document id {} already exists",
                doc.id
            )));
        }

        let now = now_millis();
        doc.created_at = now;
        doc.last_modified = now;
        doc.revision = 0;

        let id = doc.id.clone();
        let (changes, _) = broadcast::channel(self.channel_capacity);
        docs.insert(id.clone(), Entry { doc, changes });
        Ok(id)
    }

    async fn update(
        &self,
        id: &DocumentId,
        state: PosterState,
        modified_by: &UserId,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let entry = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        entry.doc.state = state;
        entry.doc.last_modified = now_millis();
        entry.doc.last_modified_by = modified_by.clone();
        entry.doc.revision += 1;
        entry.notify();
        Ok(())
    }

    async fn get(&self, id: &DocumentId) -> Result<SharedPosterDocument, StoreError> {
        let docs = self.docs.read().await;
        docs.get(id)
            .map(|entry| entry.doc.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn add_collaborator(
        &self,
        id: &DocumentId,
        requester: &UserId,
        user: &UserId,
    ) -> Result<(), StoreError> {
        let mut docs = self.docs.write().await;
        let entry = docs
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if !entry.doc.is_owner(requester) {
            return Err(StoreError::PermissionDenied(
                "only the owner can add collaborators".to_string(),
            ));
        }
        if !entry.doc.is_collaborator(user) {
            entry.doc.collaborators.push(user.clone());
            entry.doc.last_modified = now_millis();
            entry.notify();
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        id: &DocumentId,
    ) -> Result<broadcast::Receiver<DocumentChange>, StoreError> {
        let docs = self.docs.read().await;
        docs.get(id)
            .map(|entry| entry.changes.subscribe())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}
