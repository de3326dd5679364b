//! # posterflow-collab — Shared-document synchronization for PosterFlow
//!
//! Reconciles a local edit history with a remotely persisted poster document
//! that several collaborators can write to.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   set / undo    ┌──────────────┐
//! │ UI / editor  │ ──────────────► │ CollabSession│
//! └──────────────┘                 └──────┬───────┘
//!                                         │ debounced push (1s)
//!                                         ▼
//!                                  ┌──────────────┐
//!                                  │ DocumentStore│  (external collaborator)
//!                                  └──────┬───────┘
//!                                         │ change notifications
//!                                         ▼
//!                                  silent apply into HistoryStore
//! ```
//!
//! ## Modules
//!
//! - [`document`] — shared poster document, ids, share links
//! - [`store`] — `DocumentStore` seam + in-memory implementation
//! - [`debounce`] — cancellable quiescence timer
//! - [`sync`] — the `CollabSession` synchronizer (Local/Shared)
//!
//! Conflict policy is whole-document last-write-wins; see [`sync`] for the
//! accepted limitations.

pub mod debounce;
pub mod document;
pub mod store;
pub mod sync;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use document::{parse_share_link, share_link, DocumentId, SharedPosterDocument, UserId};
pub use store::{DocumentChange, DocumentStore, MemoryStore, StoreError};
pub use sync::{CollabSession, SessionEvent, SyncError, SyncMode};
