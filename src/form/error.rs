use std::fmt;

use indexmap::IndexMap;

use super::{array::FieldArrayError, dates::DateRangeError, EntryKey};

/// Location of a validation error inside a form.
///
/// Field-array entries are addressed by key so errors stay attached to the
/// entry they belong to when siblings are removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// The payload as a whole.
    Block,
    Field(String),
    Entry {
        field: String,
        key: EntryKey,
        member: Option<String>,
    },
}

impl FieldPath {
    pub fn field(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    pub fn entry(field: impl Into<String>, key: EntryKey) -> Self {
        FieldPath::Entry {
            field: field.into(),
            key,
            member: None,
        }
    }

    pub fn member(field: impl Into<String>, key: EntryKey, member: impl Into<String>) -> Self {
        FieldPath::Entry {
            field: field.into(),
            key,
            member: Some(member.into()),
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            FieldPath::Block => None,
            FieldPath::Field(name) => Some(name.as_str()),
            FieldPath::Entry { field, .. } => Some(field.as_str()),
        }
    }

    pub fn entry_key(&self) -> Option<EntryKey> {
        match self {
            FieldPath::Entry { key, .. } => Some(*key),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Block => f.write_str("<block>"),
            FieldPath::Field(name) => f.write_str(name),
            FieldPath::Entry {
                field,
                key,
                member: None,
            } => write!(f, "{field}[{key}]"),
            FieldPath::Entry {
                field,
                key,
                member: Some(member),
            } => write!(f, "{field}[{key}].{member}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A mandatory value is missing or empty.
    Required,
    InvalidDateFormat,
    /// End date before start date.
    DateOrder,
    /// A required field array has no entries.
    TooFewEntries,
    /// Any other schema constraint.
    Constraint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub issue: ValidationIssue,
    pub message: String,
}

impl FieldError {
    pub fn new(issue: ValidationIssue, message: impl Into<String>) -> Self {
        Self {
            issue,
            message: message.into(),
        }
    }
}

/// Field-level validation errors, in the order they were detected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: IndexMap<FieldPath, FieldError>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error unless the path already has one.
    pub fn insert(&mut self, path: FieldPath, error: FieldError) {
        self.entries.entry(path).or_insert(error);
    }

    pub fn get(&self, path: &FieldPath) -> Option<&FieldError> {
        self.entries.get(path)
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.entries.get(&FieldPath::field(name))
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Errors attached to one field-array entry, including its members.
    pub fn for_entry(&self, key: EntryKey) -> impl Iterator<Item = (&FieldPath, &FieldError)> {
        self.entries
            .iter()
            .filter(move |(path, _)| path.entry_key() == Some(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &FieldError)> {
        self.entries.iter()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&FieldPath) -> bool) {
        self.entries.retain(|path, _| keep(path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `{fieldPath: message}` pairs for rendering.
    pub fn to_plain(&self) -> IndexMap<String, String> {
        self.entries
            .iter()
            .map(|(path, error)| (path.to_string(), error.message.clone()))
            .collect()
    }
}

/// Rejected edit operation on a form session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("`{0}` is not a field of this block")]
    UnknownField(String),
    #[error("`{0}` is a field array; edit it through its entries")]
    ManagedByFieldArray(String),
    #[error("`{0}` is not a field array")]
    NotAFieldArray(String),
    #[error("`{0}` is set automatically")]
    ReadOnly(String),
    #[error("`{0}` expects a boolean")]
    ExpectedBool(String),
    #[error("this block has no date range")]
    NoDateRange,
    #[error("this block does not accept links")]
    LinksUnsupported,
    #[error("field array `{field}`: {source}")]
    FieldArray {
        field: String,
        #[source]
        source: FieldArrayError,
    },
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FieldArrayController;

    #[test]
    fn first_error_per_path_wins() {
        let mut errors = ErrorMap::new();
        errors.insert(
            FieldPath::field("date"),
            FieldError::new(ValidationIssue::InvalidDateFormat, "first"),
        );
        errors.insert(
            FieldPath::field("date"),
            FieldError::new(ValidationIssue::Constraint, "second"),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.field("date").unwrap().message, "first");
    }

    #[test]
    fn plain_map_uses_readable_paths() {
        let mut keys = FieldArrayController::new(String::new(), false);
        let key = keys.append("x".to_string());
        let mut errors = ErrorMap::new();
        errors.insert(
            FieldPath::member("entries", key, "label"),
            FieldError::new(ValidationIssue::Required, "Language is required"),
        );
        let plain = errors.to_plain();
        assert_eq!(plain[&format!("entries[{key}].label")], "Language is required");
        assert_eq!(errors.for_entry(key).count(), 1);
    }
}
