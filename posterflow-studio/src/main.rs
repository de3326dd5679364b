//! PosterFlow Studio — headless demo of the editing + collaboration core.
//!
//! Runs two sessions against an in-memory document store: one user designs
//! and shares a poster, a second joins through the share link and edits,
//! and the debounced sync carries changes both ways.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;
use posterflow_collab::{parse_share_link, MemoryStore, UserId};
use posterflow_core::{EventType, Field};
use posterflow_studio::{
    BackgroundGenerator, CreditLedger, GenerateError, InMemoryLedger, PosterEditor,
};

/// Stand-in for the hosted inference API: returns a deterministic URL.
struct PlaceholderGenerator;

#[async_trait]
impl BackgroundGenerator for PlaceholderGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let tag = prompt.split(',').next().unwrap_or("bg").replace(' ', "-");
        Ok(format!("https://cdn.posterflow.app/demo/{tag}.jpg"))
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    info!("Starting PosterFlow Studio demo...");

    let store = Arc::new(MemoryStore::new());
    let ledger = InMemoryLedger::new();
    let generator = PlaceholderGenerator;

    // Ama designs a church poster.
    let ama = UserId::new("ama");
    ledger.deposit(&ama, 3);
    let mut ama_editor = PosterEditor::from_template(ama.clone(), store.clone(), EventType::Church);
    ama_editor.edit_field(Field::Title, "Harvest Thanksgiving Service");
    ama_editor.edit_field(Field::Date, "Sun, Nov 30");
    ama_editor.edit_field(Field::Venue, "KNUST Great Hall");

    match ama_editor
        .generate_background(&generator, &ledger)
        .await
    {
        Ok(url) => info!("generated background: {url} ({} credits left)", ledger.balance(&ama)),
        Err(e) => log::warn!("background generation failed: {e}"),
    }

    if let Err(e) = ama_editor.validate_for_export() {
        log::error!("poster not exportable: {e}");
        return;
    }

    // Share and hand the link to Kofi.
    let link = ama_editor
        .share("https://posterflow.app")
        .await
        .expect("share failed");
    info!("share link: {link}");

    let doc_id = parse_share_link(&link).expect("malformed share link");
    let mut kofi_editor = PosterEditor::new(UserId::new("kofi"), store.clone());
    kofi_editor.join(doc_id).await.expect("join failed");
    info!("kofi joined with state: {:?}", kofi_editor.state().title);

    // Kofi refines the venue; the debounced push lands after ~1s quiet.
    kofi_editor.edit_field(Field::Venue, "KNUST Great Hall, Kumasi");
    tokio::time::sleep(Duration::from_millis(1300)).await;

    info!("ama now sees venue: {:?}", ama_editor.state().venue);

    // Undo walks ama's own history only.
    ama_editor.undo();
    info!(
        "after undo, ama's title: {:?} (can_redo = {})",
        ama_editor.state().title,
        ama_editor.can_redo()
    );

    ama_editor.close();
    kofi_editor.close();
    info!("demo complete");
}
