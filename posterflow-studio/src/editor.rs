//! The editor facade the UI drives.
//!
//! `PosterEditor` owns one [`CollabSession`] and layers the form-level
//! concerns on top: typed field edits (sanitized at intake), the validation
//! gate in front of export/save, the AI background flow with credit gating,
//! and share/join plumbing.

use std::fmt;
use std::sync::Arc;

use posterflow_collab::{
    CollabSession, DocumentId, DocumentStore, SessionEvent, SyncError, UserId,
};
use posterflow_core::{validate, EventType, Field, FieldError, PosterState, ThemeColor};
use tokio::sync::mpsc;

use crate::credits::{CreditError, CreditLedger};
use crate::generate::{background_prompt, BackgroundGenerator, GenerateError, GENERATION_COST};

/// Editor-level failures, one variant per remedy.
#[derive(Debug)]
pub enum EditorError {
    /// Per-field problems; fix the form and retry.
    Validation(Vec<FieldError>),
    /// Quota problem; top up, never auto-retried.
    Credits(CreditError),
    /// Inference problem; retry or contact support.
    Generate(GenerateError),
    /// Collaboration problem; local editing continues.
    Sync(SyncError),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
            Self::Credits(e) => write!(f, "{e}"),
            Self::Generate(e) => write!(f, "{e}"),
            Self::Sync(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<CreditError> for EditorError {
    fn from(e: CreditError) -> Self {
        Self::Credits(e)
    }
}

impl From<GenerateError> for EditorError {
    fn from(e: GenerateError) -> Self {
        Self::Generate(e)
    }
}

impl From<SyncError> for EditorError {
    fn from(e: SyncError) -> Self {
        Self::Sync(e)
    }
}

/// One user's poster-editing session.
pub struct PosterEditor {
    session: CollabSession,
}

impl PosterEditor {
    /// Start from the blank default poster.
    pub fn new(user: UserId, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            session: CollabSession::new(user, store, PosterState::default()),
        }
    }

    /// Start from a per-event-type template.
    pub fn from_template(user: UserId, store: Arc<dyn DocumentStore>, event_type: EventType) -> Self {
        Self {
            session: CollabSession::new(user, store, PosterState::template(event_type)),
        }
    }

    pub fn user(&self) -> &UserId {
        self.session.user()
    }

    pub fn state(&self) -> PosterState {
        self.session.present()
    }

    /// Events from the underlying session (can only be taken once).
    pub fn take_event_rx(&mut self) -> Option<mpsc::Receiver<SessionEvent>> {
        self.session.take_event_rx()
    }

    /// Edit one textual field. Sanitization happens at intake; a value that
    /// sanitizes to the current content records nothing.
    pub fn edit_field(&mut self, field: Field, value: &str) -> bool {
        self.session.set_with(|s| {
            let mut next = s.clone();
            next.set_field(field, value);
            next
        })
    }

    pub fn set_event_type(&mut self, event_type: EventType) -> bool {
        self.session.set_with(|s| {
            let mut next = s.clone();
            next.event_type = event_type;
            next
        })
    }

    pub fn set_theme(&mut self, theme: ThemeColor) -> bool {
        self.session.set_with(|s| {
            let mut next = s.clone();
            next.theme_color = theme;
            next
        })
    }

    /// Set the background image from an upload or a generation result.
    pub fn set_image(&mut self, uri: Option<String>) -> bool {
        self.session.set_with(|s| {
            let mut next = s.clone();
            next.set_image(uri.clone());
            next
        })
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// Gate in front of export and cloud save.
    pub fn validate_for_export(&self) -> Result<(), EditorError> {
        validate(&self.session.present()).map_err(EditorError::Validation)
    }

    /// Generate an AI background for the current event type.
    ///
    /// One credit per successful generation; a failed call consumes
    /// nothing. The resulting image lands via a normal history-recording
    /// set, so it participates in undo and sync like any other edit.
    pub async fn generate_background(
        &mut self,
        generator: &dyn BackgroundGenerator,
        ledger: &dyn CreditLedger,
    ) -> Result<String, EditorError> {
        let user = self.session.user().clone();
        let have = ledger.balance(&user);
        if have < GENERATION_COST {
            return Err(CreditError::Insufficient {
                have,
                need: GENERATION_COST,
            }
            .into());
        }

        let prompt = background_prompt(self.state().event_type);
        log::info!("generating background for {user}: {prompt}");
        let image_url = generator.generate(prompt).await?;

        ledger.try_consume(&user, GENERATION_COST)?;
        self.set_image(Some(image_url.clone()));
        Ok(image_url)
    }

    /// Share the current design; returns the shareable link.
    pub async fn share(&mut self, origin: &str) -> Result<String, EditorError> {
        let id = self.session.share().await?;
        Ok(posterflow_collab::share_link(origin, &id))
    }

    /// Join a shared design from a document id.
    pub async fn join(&mut self, doc_id: DocumentId) -> Result<(), EditorError> {
        self.session.join(doc_id).await?;
        Ok(())
    }

    pub fn is_shared(&self) -> bool {
        self.session.is_shared()
    }

    pub fn doc_id(&self) -> Option<&DocumentId> {
        self.session.doc_id()
    }

    /// End the session, cancelling pending sync work.
    pub fn close(&mut self) {
        self.session.close();
    }
}
