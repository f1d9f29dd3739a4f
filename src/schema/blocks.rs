use serde_json::{Value, json};

use crate::domain::{BlockKind, DATE_PATTERN};

const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// JSON Schema of a built-in block type.
pub fn builtin_schema(kind: BlockKind) -> Value {
    match kind {
        BlockKind::Experience => experience(),
        BlockKind::Education => education(),
        BlockKind::Skill => level_list("Skill"),
        BlockKind::Course => course(),
        BlockKind::Award => award(),
        BlockKind::Certificate => certificate(),
        BlockKind::Language => level_list("Language"),
        BlockKind::Interest => interest(),
        BlockKind::Contact => contact(),
    }
}

/// Display label shown in the block catalog.
pub fn builtin_label(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Experience => "Professional Experience",
        BlockKind::Education => "Education",
        BlockKind::Skill => "Skill",
        BlockKind::Course => "Course",
        BlockKind::Award => "Award",
        BlockKind::Certificate => "Certificate",
        BlockKind::Language => "Language",
        BlockKind::Interest => "Interest",
        BlockKind::Contact => "Contact",
    }
}

fn text(title: &str) -> Value {
    json!({"type": "string", "title": title})
}

fn mandatory(title: &str) -> Value {
    json!({"type": "string", "title": title, "minLength": 1})
}

fn date(title: &str) -> Value {
    json!({"type": "string", "title": title, "pattern": DATE_PATTERN, "x-date": true})
}

fn flag(title: &str) -> Value {
    json!({"type": "boolean", "title": title})
}

fn choice(title: &str, options: &[&str]) -> Value {
    json!({"type": "string", "title": title, "enum": options})
}

fn experience() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "Professional Experience",
        "type": "object",
        "additionalProperties": false,
        "required": ["company", "title", "city"],
        "x-date-range": {
            "start": "startDate",
            "end": "endDate",
            "ongoing": "present",
            "asOf": "presentAsOf"
        },
        "properties": {
            "company": mandatory("Company name"),
            "title": mandatory("Title"),
            "type": choice("Type", &["full-time", "part-time", "contract"]),
            "city": mandatory("City"),
            "country": text("Country"),
            "startDate": date("Start date"),
            "endDate": date("End date"),
            "present": flag("Currently working here"),
            "presentAsOf": date("Present as of"),
            "skills": {
                "type": "array",
                "title": "Skills",
                "x-field-array": true,
                "items": {"type": "string", "title": "Skill", "minLength": 1, "default": ""}
            }
        },
        "default": {"company": "", "title": "", "city": "", "present": false, "skills": []}
    })
}

fn education() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "Education",
        "type": "object",
        "additionalProperties": false,
        "required": ["institution"],
        "x-date-range": {"start": "startDate", "end": "endDate", "ongoing": "present"},
        "properties": {
            "institution": mandatory("Institution"),
            "degree": text("Degree"),
            "fieldOfStudy": text("Field of study"),
            "startDate": date("Start date"),
            "endDate": date("End date"),
            "present": flag("Currently studying here")
        },
        "default": {
            "institution": "",
            "degree": "",
            "fieldOfStudy": "",
            "present": false
        }
    })
}

fn course() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "Course",
        "type": "object",
        "additionalProperties": false,
        "required": ["course"],
        "x-date-range": {
            "start": "startDate",
            "end": "endDate",
            "ongoing": "present",
            "asOf": "presentAsOf"
        },
        "properties": {
            "course": mandatory("Course"),
            "school": text("Institution"),
            "city": text("City"),
            "country": text("Country"),
            "startDate": date("Start date"),
            "endDate": date("End date"),
            "present": flag("Currently attending"),
            "presentAsOf": date("Present as of"),
            "description": text("Description"),
            "link": text("Link")
        },
        "default": {"course": "", "school": "", "present": false}
    })
}

fn award() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "Award",
        "type": "object",
        "additionalProperties": false,
        "required": ["award"],
        "properties": {
            "award": mandatory("Award"),
            "issuedBy": text("Issued by"),
            "date": date("Date"),
            "description": text("Description"),
            "link": text("Link")
        },
        "default": {"award": "", "issuedBy": ""}
    })
}

fn certificate() -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": "Certificate",
        "type": "object",
        "additionalProperties": false,
        "required": ["certificate"],
        "x-date-range": {
            "start": "startDate",
            "end": "endDate",
            "ongoing": "noExpiry",
            "asOf": "noExpiryAsOf"
        },
        "properties": {
            "certificate": mandatory("Certificate"),
            "startDate": date("Start date"),
            "endDate": date("End date"),
            "noExpiry": flag("No expiry"),
            "noExpiryAsOf": date("No expiry as of"),
            "description": text("Description"),
            "link": text("Link")
        },
        "default": {"certificate": "", "noExpiry": false}
    })
}

fn entry_list(title: &str, item: Value, zero: Value) -> Value {
    json!({
        "$schema": DRAFT_07,
        "title": title,
        "type": "object",
        "additionalProperties": false,
        "required": ["entries"],
        "properties": {
            "entries": {
                "type": "array",
                "title": title,
                "minItems": 1,
                "x-field-array": true,
                "items": item
            }
        },
        "default": {"entries": [zero]}
    })
}

fn level_list(title: &str) -> Value {
    entry_list(
        title,
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["label"],
            "properties": {
                "label": mandatory(title),
                "level": choice("Level", &["level1", "level2", "level3"])
            },
            "default": {"label": ""}
        }),
        json!({"label": ""}),
    )
}

fn interest() -> Value {
    entry_list(
        "Interest",
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["label"],
            "properties": {"label": mandatory("Interest")},
            "default": {"label": ""}
        }),
        json!({"label": ""}),
    )
}

fn contact() -> Value {
    entry_list(
        "Contact",
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["platform"],
            "properties": {
                "platform": mandatory("Platform"),
                "url": text("Link")
            },
            "default": {"platform": ""}
        }),
        json!({"platform": ""}),
    )
}
