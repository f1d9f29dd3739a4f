use schemars::schema::SchemaObject;
use serde_json::Value;

pub fn extension_bool(schema: &SchemaObject, key: &str) -> bool {
    schema
        .extensions
        .get(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

pub fn extension_value<'a>(schema: &'a SchemaObject, key: &str) -> Option<&'a Value> {
    schema.extensions.get(key)
}

pub fn title_of(schema: &SchemaObject, name: &str) -> String {
    schema
        .metadata
        .as_ref()
        .and_then(|m| m.title.clone())
        .unwrap_or_else(|| prettify_label(name))
}

pub fn default_of(schema: &SchemaObject) -> Option<Value> {
    schema.metadata.as_ref().and_then(|m| m.default.clone())
}

/// Turns `fieldOfStudy` or `field_of_study` into `Field of study`.
pub fn prettify_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(raw.len() + 4);
    for (idx, ch) in raw.chars().enumerate() {
        if ch == '_' || ch == '-' {
            result.push(' ');
            continue;
        }
        if idx == 0 {
            result.push(ch.to_ascii_uppercase());
        } else if ch.is_ascii_uppercase() {
            result.push(' ');
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
