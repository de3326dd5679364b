//! Shared poster document model.
//!
//! A `SharedPosterDocument` is the remotely persisted record one or more
//! collaborators synchronize against: owner, membership, the poster state
//! snapshot, and last-write bookkeeping. Serde field names match the stored
//! document shape (`details`, `lastModifiedBy`, ...).

use std::fmt;

use posterflow_core::PosterState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a user, as supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a shared poster document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Generate a fresh id, `poster_<uuid>`.
    pub fn generate() -> Self {
        Self(format!("poster_{}", Uuid::new_v4().simple()))
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The remotely persisted poster record.
///
/// Timestamps and `revision` are server-assigned on write; a freshly built
/// document carries zeros until the store accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedPosterDocument {
    pub id: DocumentId,
    pub owner: UserId,
    pub collaborators: Vec<UserId>,
    #[serde(rename = "details")]
    pub state: PosterState,
    #[serde(rename = "createdAt")]
    pub created_at: u64,
    #[serde(rename = "lastModified")]
    pub last_modified: u64,
    /// Bumped by the store on every accepted write. Whole-document
    /// last-write-wins: the highest revision fully replaces prior state.
    pub revision: u64,
    #[serde(rename = "lastModifiedBy")]
    pub last_modified_by: UserId,
}

impl SharedPosterDocument {
    /// Build a new document seeded with `state`, membership = {owner}.
    pub fn new(id: DocumentId, owner: UserId, state: PosterState) -> Self {
        Self {
            id,
            collaborators: vec![owner.clone()],
            last_modified_by: owner.clone(),
            owner,
            state,
            created_at: 0,
            last_modified: 0,
            revision: 0,
        }
    }

    pub fn is_owner(&self, user: &UserId) -> bool {
        self.owner == *user
    }

    pub fn is_collaborator(&self, user: &UserId) -> bool {
        self.collaborators.contains(user)
    }
}

/// Build the shareable link for a document: `<origin>/create?shared=<id>`.
pub fn share_link(origin: &str, id: &DocumentId) -> String {
    format!("{}/create?shared={}", origin.trim_end_matches('/'), id)
}

/// Extract the shared document id from a link, if present.
pub fn parse_share_link(url: &str) -> Option<DocumentId> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("shared="))
        .filter(|id| !id.is_empty())
        .map(DocumentId::new)
}
