//! # posterflow-studio — Editor facade for PosterFlow
//!
//! Layers the form-level concerns on top of `posterflow-core` and
//! `posterflow-collab`: typed field editing, the pre-export validation gate,
//! credit-gated AI background generation, and share/join.
//!
//! ## Modules
//!
//! - [`editor`] — `PosterEditor`, the object a UI drives
//! - [`generate`] — background generation seam + prompt presets
//! - [`credits`] — credit ledger seam + quota errors

pub mod credits;
pub mod editor;
pub mod generate;

pub use credits::{CreditError, CreditLedger, InMemoryLedger};
pub use editor::{EditorError, PosterEditor};
pub use generate::{background_prompt, BackgroundGenerator, GenerateError, GENERATION_COST};
