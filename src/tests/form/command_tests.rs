use std::sync::Arc;

use serde_json::json;

use crate::{
    catalog::BlockCatalog,
    domain::{BlockKind, FixedClock, MonthYear},
    form::{CommandEffect, FieldArrayError, FormCommand, FormSession, SessionError},
};

fn language_session() -> FormSession {
    let catalog = BlockCatalog::builtin().unwrap();
    let descriptor = Arc::clone(catalog.descriptor(BlockKind::Language).unwrap());
    let clock = FixedClock(MonthYear::new(10, 2026).unwrap());
    FormSession::new(descriptor, Arc::new(clock))
}

#[test]
fn dispatch_reports_new_entry_keys() {
    let mut session = language_session();
    let effect = session
        .dispatch(FormCommand::AppendEntry {
            field: "entries".into(),
        })
        .unwrap();
    let CommandEffect::EntryAdded(key) = effect else {
        panic!("append must report the new key");
    };
    assert_eq!(session.entries("entries").unwrap()[1].key, key);
}

#[test]
fn move_entry_reorders_without_rekeying() {
    let mut session = language_session();
    let first = session.entries("entries").unwrap()[0].key;
    let second = session.append_entry("entries").unwrap();

    let moved = session
        .dispatch(FormCommand::MoveEntry {
            field: "entries".into(),
            key: second,
            delta: -1,
        })
        .unwrap();
    assert_eq!(moved, CommandEffect::Moved(true));
    let keys: Vec<_> = session
        .entries("entries")
        .unwrap()
        .iter()
        .map(|entry| entry.key)
        .collect();
    assert_eq!(keys, vec![second, first]);

    let at_edge = session
        .dispatch(FormCommand::MoveEntry {
            field: "entries".into(),
            key: second,
            delta: -1,
        })
        .unwrap();
    assert_eq!(at_edge, CommandEffect::Moved(false));
}

#[test]
fn stale_keys_fail_closed() {
    let mut session = language_session();
    let extra = session.append_entry("entries").unwrap();
    session.remove_entry("entries", extra).unwrap();

    let err = session
        .dispatch(FormCommand::UpdateEntry {
            field: "entries".into(),
            key: extra,
            value: json!({"label": "French"}),
        })
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::FieldArray {
            field: "entries".into(),
            source: FieldArrayError::UnknownKey(extra),
        }
    );
    let fresh = session.append_entry("entries").unwrap();
    assert_ne!(fresh, extra);
}

#[test]
fn date_commands_need_a_date_range() {
    let mut session = language_session();
    assert_eq!(
        session.dispatch(FormCommand::SetOngoing(true)),
        Err(SessionError::NoDateRange)
    );
    assert_eq!(
        session.dispatch(FormCommand::ClearEnd),
        Err(SessionError::NoDateRange)
    );
}
