use std::sync::Arc;

use serde_json::json;

use crate::{
    app::{BlockDialogController, DialogError, DialogOptions, DialogState},
    catalog::{BlockCatalog, CatalogError},
    domain::{BlockKind, FixedClock, MonthYear},
    form::{FormCommand, SessionStatus, SubmitOutcome},
};

fn controller() -> BlockDialogController {
    let catalog = Arc::new(BlockCatalog::builtin().unwrap());
    let options =
        DialogOptions::default().with_clock(FixedClock(MonthYear::new(10, 2026).unwrap()));
    BlockDialogController::with_options(catalog, options)
}

#[test]
fn select_requires_open_dialog() {
    let mut dialog = controller();
    let err = dialog.select_block("award").unwrap_err();
    assert!(matches!(err, DialogError::InvalidTransition { .. }));
    assert!(matches!(dialog.state(), DialogState::Closed));
}

#[test]
fn unknown_block_keeps_catalog_open() {
    let mut dialog = controller();
    dialog.open().unwrap();

    let err = dialog.select_block("Awards").unwrap_err();
    assert!(matches!(
        err,
        DialogError::UnknownBlockType(CatalogError::UnknownBlockType(ref id)) if id == "Awards"
    ));
    assert!(matches!(dialog.state(), DialogState::Catalog));
    assert!(dialog.session().is_none());
}

#[test]
fn unknown_block_keeps_live_session() {
    let mut dialog = controller();
    dialog.open().unwrap();
    dialog
        .select_block("award")
        .unwrap()
        .update_field("award", json!("Dean's List"))
        .unwrap();

    assert!(matches!(
        dialog.select_block("awards"),
        Err(DialogError::UnknownBlockType(_))
    ));
    let session = dialog.session().unwrap();
    assert_eq!(session.kind(), BlockKind::Award);
    assert_eq!(session.working_value()["award"], json!("Dean's List"));
}

#[test]
fn switching_blocks_discards_previous_session() {
    let mut dialog = controller();
    dialog.open().unwrap();
    dialog
        .select_block("education")
        .unwrap()
        .update_field("institution", json!("MIT"))
        .unwrap();
    dialog.select_block("course").unwrap();

    let session = dialog.session().unwrap();
    assert_eq!(session.kind(), BlockKind::Course);
    assert_eq!(session.status(), SessionStatus::Pristine);
    assert!(session.working_value().get("institution").is_none());
}

#[test]
fn rejected_submit_keeps_session_open() {
    let mut dialog = controller();
    dialog.open().unwrap();
    dialog.select_block("certificate").unwrap();

    let outcome = dialog.submit().unwrap();
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert_eq!(dialog.state().selected(), Some(BlockKind::Certificate));
    assert!(dialog.store().is_empty());
}

#[test]
fn committed_submit_closes_dialog() {
    let mut dialog = controller();
    dialog.open().unwrap();
    dialog.select_block("interest").unwrap();
    let key = dialog.session().unwrap().entries("entries").unwrap()[0].key;
    dialog
        .dispatch(FormCommand::UpdateEntry {
            field: "entries".into(),
            key,
            value: json!({"label": "Chess"}),
        })
        .unwrap();

    assert!(matches!(dialog.submit().unwrap(), SubmitOutcome::Committed(_)));
    assert!(matches!(dialog.state(), DialogState::Closed));
    assert_eq!(dialog.store().get(BlockKind::Interest).len(), 1);
    assert!(matches!(
        dialog.submit(),
        Err(DialogError::InvalidTransition { .. })
    ));
}

#[test]
fn close_is_safe_from_any_state() {
    let mut dialog = controller();
    dialog.close();
    dialog.open().unwrap();
    dialog.close();
    dialog.open().unwrap();
    dialog.select_block("contact").unwrap();
    dialog.close();
    assert!(!dialog.state().is_open());
    assert!(dialog.store().is_empty());
    assert!(matches!(
        dialog.cancel_selection(),
        Err(DialogError::InvalidTransition { .. })
    ));
}

#[test]
fn open_while_editing_is_rejected() {
    let mut dialog = controller();
    dialog.open().unwrap();
    dialog.open().unwrap();
    dialog.select_block("skill").unwrap();
    assert!(matches!(
        dialog.open(),
        Err(DialogError::InvalidTransition { .. })
    ));
    assert_eq!(dialog.state().selected(), Some(BlockKind::Skill));
}
