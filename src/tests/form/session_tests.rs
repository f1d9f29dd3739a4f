use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::{
    catalog::BlockCatalog,
    domain::{BlockKind, BlockPayload, Clock, FixedClock, MonthYear},
    form::{
        DATE_FORMAT_MESSAGE, DATE_ORDER_MESSAGE, DateRangeError, FieldPath, FormSession,
        SessionError, SessionStatus, SubmitOutcome, ValidationIssue, ValidationOutcome,
    },
};

fn month(text: &str) -> MonthYear {
    text.parse().unwrap()
}

fn session(kind: BlockKind) -> FormSession {
    session_with_clock(kind, Arc::new(FixedClock(month("10/2026"))))
}

fn session_with_clock(kind: BlockKind, clock: Arc<dyn Clock>) -> FormSession {
    let catalog = BlockCatalog::builtin().unwrap();
    let descriptor = Arc::clone(catalog.descriptor(kind).unwrap());
    FormSession::new(descriptor, clock)
}

/// Clock the test can move forward between edits.
#[derive(Debug)]
struct StepClock(Mutex<MonthYear>);

impl StepClock {
    fn at(text: &str) -> Arc<Self> {
        Arc::new(Self(Mutex::new(month(text))))
    }

    fn advance_to(&self, text: &str) {
        *self.0.lock().unwrap() = month(text);
    }
}

impl Clock for StepClock {
    fn current_month(&self) -> MonthYear {
        *self.0.lock().unwrap()
    }
}

fn payload_value(outcome: ValidationOutcome) -> Value {
    match outcome {
        ValidationOutcome::Valid(payload) => payload.to_value(),
        ValidationOutcome::Invalid(errors) => panic!("expected valid payload, got {errors:?}"),
    }
}

#[test]
fn new_session_starts_from_block_defaults() {
    let session = session(BlockKind::Award);
    assert_eq!(session.status(), SessionStatus::Pristine);
    assert!(!session.is_dirty());
    assert_eq!(session.working_value(), json!({"award": "", "issuedBy": ""}));
}

#[test]
fn missing_mandatory_field_is_reported_at_its_path() {
    let mut session = session(BlockKind::Education);
    session.update_field("degree", json!("BSc")).unwrap();

    let SubmitOutcome::Rejected(errors) = session.submit() else {
        panic!("submission without an institution must be rejected");
    };
    let error = errors.field("institution").unwrap();
    assert_eq!(error.issue, ValidationIssue::Required);
    assert_eq!(error.message, "Institution is required");
    assert_eq!(errors.len(), 1);
    assert_eq!(session.status(), SessionStatus::Invalid);

    session.update_field("institution", json!("MIT")).unwrap();
    assert!(session.errors().is_empty());
    let SubmitOutcome::Committed(payload) = session.submit() else {
        panic!("corrected form must commit");
    };
    assert_eq!(payload.kind(), BlockKind::Education);
    assert_eq!(session.status(), SessionStatus::Committed);
}

#[test]
fn errors_clear_per_field_as_they_are_fixed() {
    let mut session = session(BlockKind::Course);
    session.update_field("startDate", json!("1/2024")).unwrap();
    session.validate();
    assert!(session.errors().field("course").is_some());
    assert!(session.errors().field("startDate").is_some());

    session.update_field("course", json!("Rust in Practice")).unwrap();
    assert!(session.errors().field("course").is_none());
    assert_eq!(
        session.errors().field("startDate").map(|e| e.message.as_str()),
        Some(DATE_FORMAT_MESSAGE)
    );
    assert_eq!(session.status(), SessionStatus::Editing);
}

#[test]
fn edits_do_not_surface_errors_on_untouched_fields() {
    let mut session = session(BlockKind::Award);
    session.update_field("award", json!("Dean's List")).unwrap();
    session.validate();
    assert!(session.errors().is_empty());

    session.update_field("award", json!("")).unwrap();
    // no errors were showing, so nothing is re-checked until validation
    assert!(session.errors().is_empty());
    assert!(matches!(session.check(), ValidationOutcome::Invalid(_)));
}

#[test]
fn free_text_date_must_match_month_year() {
    let mut session = session(BlockKind::Award);
    session.update_field("award", json!("Dean's List")).unwrap();
    for bad in ["13/2024", "5/2024", "2024-05", "00/2024"] {
        session.update_field("date", json!(bad)).unwrap();
        let ValidationOutcome::Invalid(errors) = session.check() else {
            panic!("{bad} must be rejected");
        };
        assert_eq!(
            errors.field("date").map(|e| e.issue),
            Some(ValidationIssue::InvalidDateFormat)
        );
    }
    session.update_field("date", json!("")).unwrap();
    assert!(matches!(session.check(), ValidationOutcome::Valid(_)));
}

#[test]
fn typed_range_dates_go_through_the_controller() {
    let mut session = session(BlockKind::Education);
    session.update_field("institution", json!("MIT")).unwrap();
    session.update_field("startDate", json!("09/2020")).unwrap();
    session.update_field("endDate", json!("2023")).unwrap();

    assert_eq!(session.date_range().unwrap().start, Some(month("09/2020")));
    let ValidationOutcome::Invalid(errors) = session.check() else {
        panic!("malformed end date must be rejected");
    };
    assert_eq!(
        errors.field("endDate").map(|e| e.issue),
        Some(ValidationIssue::InvalidDateFormat)
    );

    session.update_field("endDate", json!("06/2024")).unwrap();
    assert_eq!(session.date_range().unwrap().end, Some(month("06/2024")));
    assert_eq!(
        payload_value(session.check()),
        json!({
            "institution": "MIT",
            "degree": "",
            "fieldOfStudy": "",
            "startDate": "09/2020",
            "endDate": "06/2024",
            "present": false
        })
    );
}

#[test]
fn end_before_start_fails_validation_not_entry() {
    let mut session = session(BlockKind::Course);
    session.update_field("course", json!("Compilers")).unwrap();
    session.set_start(month("05/2024")).unwrap();
    session.set_end(month("01/2024")).unwrap();

    let ValidationOutcome::Invalid(errors) = session.check() else {
        panic!("reversed range must be rejected");
    };
    let error = errors.field("endDate").unwrap();
    assert_eq!(error.issue, ValidationIssue::DateOrder);
    assert_eq!(error.message, DATE_ORDER_MESSAGE);
}

#[test]
fn ongoing_locks_end_and_captures_as_of_once() {
    let mut session = session(BlockKind::Experience);
    session.update_field("company", json!("Acme")).unwrap();
    session.update_field("title", json!("Engineer")).unwrap();
    session.update_field("city", json!("Berlin")).unwrap();
    session.set_start(month("01/2022")).unwrap();
    session.set_end(month("12/2023")).unwrap();

    session.update_field("present", json!(true)).unwrap();
    let range = session.date_range().unwrap();
    assert!(range.is_ongoing);
    assert_eq!(range.end, None);
    assert_eq!(
        session.set_end(month("01/2025")),
        Err(SessionError::DateRange(DateRangeError::EndLocked))
    );
    assert_eq!(
        session.update_field("presentAsOf", json!("01/2020")),
        Err(SessionError::ReadOnly("presentAsOf".to_string()))
    );

    let value = payload_value(session.check());
    assert_eq!(value["presentAsOf"], json!("10/2026"));
    assert_eq!(value["present"], json!(true));
    assert!(value.get("endDate").is_none());

    session.set_ongoing(false).unwrap();
    assert_eq!(session.date_range().unwrap().end, None);
}

#[test]
fn field_array_entries_validate_independently() {
    let mut session = session(BlockKind::Skill);
    let first = session.entries("entries").unwrap()[0].key;
    session
        .update_entry("entries", first, json!({"label": "Rust", "level": "level3"}))
        .unwrap();
    let second = session.append_entry("entries").unwrap();

    let ValidationOutcome::Invalid(errors) = session.check() else {
        panic!("blank entry must be rejected");
    };
    assert_eq!(errors.len(), 1);
    let error = errors
        .get(&FieldPath::member("entries", second, "label"))
        .unwrap();
    assert_eq!(error.issue, ValidationIssue::Required);
    assert_eq!(errors.for_entry(first).count(), 0);

    session
        .update_entry("entries", second, json!({"label": "SQL"}))
        .unwrap();
    assert_eq!(
        payload_value(session.check()),
        json!({"entries": [{"label": "Rust", "level": "level3"}, {"label": "SQL"}]})
    );
}

#[test]
fn required_field_array_keeps_its_last_entry() {
    let mut session = session(BlockKind::Interest);
    let only = session.entries("entries").unwrap()[0].key;
    assert!(!session.can_remove_entry("entries", only));
    assert!(matches!(
        session.remove_entry("entries", only),
        Err(SessionError::FieldArray { .. })
    ));
    assert_eq!(session.entries("entries").unwrap().len(), 1);
}

#[test]
fn optional_field_array_may_be_empty() {
    let mut session = session(BlockKind::Experience);
    assert!(session.entries("skills").unwrap().is_empty());
    let key = session.append_entry_with("skills", json!("Rust")).unwrap();
    assert!(session.can_remove_entry("skills", key));
    assert_eq!(session.remove_entry("skills", key).unwrap(), json!("Rust"));
    assert_eq!(
        session.update_field("skills", json!(["Go"])),
        Err(SessionError::ManagedByFieldArray("skills".to_string()))
    );
}

#[test]
fn entry_updates_reject_unknown_members() {
    let mut session = session(BlockKind::Contact);
    let key = session.entries("entries").unwrap()[0].key;
    assert_eq!(
        session.update_entry("entries", key, json!({"handle": "@me"})),
        Err(SessionError::UnknownField("entries.handle".to_string()))
    );
    assert_eq!(
        session.update_entry("company", key, json!({})),
        Err(SessionError::UnknownField("company".to_string()))
    );
}

#[test]
fn links_attach_only_where_supported() {
    let mut course = session(BlockKind::Course);
    assert_eq!(course.attach_link("   "), Ok(false));
    assert_eq!(course.attach_link(" https://example.com/c "), Ok(true));
    assert_eq!(course.working_value()["link"], json!("https://example.com/c"));

    let mut skill = session(BlockKind::Skill);
    assert_eq!(
        skill.attach_link("https://example.com"),
        Err(SessionError::LinksUnsupported)
    );
}

#[test]
fn payload_carries_no_fields_of_other_block_types() {
    let mut session = session(BlockKind::Award);
    assert_eq!(
        session.update_field("institution", json!("MIT")),
        Err(SessionError::UnknownField("institution".to_string()))
    );
    session.update_field("award", json!("Dean's List")).unwrap();
    let ValidationOutcome::Valid(BlockPayload::Award(award)) = session.check() else {
        panic!("award session must produce an award payload");
    };
    assert_eq!(award.award, "Dean's List");
}

#[test]
fn experience_requires_a_city() {
    let mut session = session(BlockKind::Experience);
    session.update_field("company", json!("Acme")).unwrap();
    session.update_field("title", json!("Dev")).unwrap();

    let SubmitOutcome::Rejected(errors) = session.submit() else {
        panic!("experience without a city must be rejected");
    };
    let error = errors.field("city").unwrap();
    assert_eq!(error.issue, ValidationIssue::Required);
    assert_eq!(error.message, "City is required");
    assert_eq!(errors.len(), 1);

    session.update_field("city", json!("Lisbon")).unwrap();
    assert!(matches!(session.submit(), SubmitOutcome::Committed(_)));
}

#[test]
fn course_and_certificate_keep_the_month_ongoing_was_set() {
    for (kind, mandatory, ongoing, as_of) in [
        (BlockKind::Course, "course", "present", "presentAsOf"),
        (BlockKind::Certificate, "certificate", "noExpiry", "noExpiryAsOf"),
    ] {
        let clock = StepClock::at("01/2025");
        let mut session = session_with_clock(kind, clock.clone());
        session.update_field(mandatory, json!("Rust")).unwrap();
        session.set_start(month("01/2025")).unwrap();
        session.update_field(ongoing, json!(true)).unwrap();

        clock.advance_to("07/2026");
        session.update_field(ongoing, json!(true)).unwrap();
        assert_eq!(
            session.update_field(as_of, json!("07/2026")),
            Err(SessionError::ReadOnly(as_of.to_string()))
        );

        let SubmitOutcome::Committed(payload) = session.submit() else {
            panic!("{kind} with an ongoing range must commit");
        };
        let value = payload.to_value();
        assert_eq!(value[ongoing], json!(true));
        assert_eq!(value[as_of], json!("01/2025"));
        assert!(value.get("endDate").is_none());
    }
}
