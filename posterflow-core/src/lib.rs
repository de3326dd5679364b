//! # posterflow-core — Poster data model and edit history
//!
//! The pure, synchronous heart of PosterFlow: the poster field record, the
//! sanitization applied at field intake, pre-export validation, and the
//! undo/redo history store the editor mutates through.
//!
//! ## Modules
//!
//! - [`poster`] — `PosterState` flat record plus `EventType`/`ThemeColor`
//! - [`sanitize`] — HTML stripping for textual fields
//! - [`validate`] — per-field validation gating export/save
//! - [`history`] — generic linear undo/redo store (`HistoryStore<T>`)
//!
//! Nothing in this crate performs I/O or suspends; every operation completes
//! within one call. Collaboration lives in `posterflow-collab`.

pub mod history;
pub mod poster;
pub mod sanitize;
pub mod validate;

pub use history::HistoryStore;
pub use poster::{EventType, Field, PosterState, ThemeColor};
pub use sanitize::strip_html;
pub use validate::{validate, FieldError, ValidationIssue};
