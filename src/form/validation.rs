use indexmap::IndexMap;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use crate::{
    catalog::BlockTypeDescriptor,
    schema::{BlockLayout, FieldShape},
};

use super::{
    array::FieldArrayController,
    dates::DateRangeValue,
    error::{ErrorMap, FieldError, FieldPath, ValidationIssue},
};

pub const DATE_FORMAT_MESSAGE: &str = "Date must be in MM/YYYY format";
pub const DATE_ORDER_MESSAGE: &str = "End date must not be before start date";
pub const TOO_FEW_ENTRIES_MESSAGE: &str = "At least one entry is required";

/// Snapshot of a session handed to the schema adapter.
pub(crate) struct ValidationInput<'a> {
    pub value: &'a Value,
    pub arrays: &'a IndexMap<String, FieldArrayController<Value>>,
    /// Present only when both range ends come from the controller.
    pub date_range: Option<DateRangeValue>,
}

/// Runs the block schema and the date-order rule against a working payload.
pub(crate) fn collect_errors(
    descriptor: &BlockTypeDescriptor,
    input: ValidationInput<'_>,
) -> ErrorMap {
    let layout = descriptor.layout();
    let mut errors = ErrorMap::new();

    for error in descriptor.validator().iter_errors(input.value) {
        let mut segments: Vec<String> = error
            .instance_path
            .to_string()
            .split('/')
            .skip(1)
            .map(unescape_segment)
            .collect();
        let issue = match &error.kind {
            ValidationErrorKind::Required { property } => {
                if let Some(name) = property.as_str() {
                    segments.push(name.to_string());
                }
                ValidationIssue::Required
            }
            ValidationErrorKind::MinLength { .. } => ValidationIssue::Required,
            ValidationErrorKind::MinItems { .. } => ValidationIssue::TooFewEntries,
            ValidationErrorKind::Pattern { .. } if is_date_field(layout, &segments) => {
                ValidationIssue::InvalidDateFormat
            }
            _ => ValidationIssue::Constraint,
        };
        let path = resolve_path(&segments, input.arrays);
        let message = match issue {
            ValidationIssue::Required => format!("{} is required", field_title(layout, &path)),
            ValidationIssue::InvalidDateFormat => DATE_FORMAT_MESSAGE.to_string(),
            ValidationIssue::TooFewEntries => TOO_FEW_ENTRIES_MESSAGE.to_string(),
            ValidationIssue::DateOrder => DATE_ORDER_MESSAGE.to_string(),
            ValidationIssue::Constraint => error.to_string(),
        };
        errors.insert(path, FieldError::new(issue, message));
    }

    if let (Some(spec), Some(range)) = (&layout.date_range, input.date_range)
        && !range.is_ordered()
    {
        errors.insert(
            FieldPath::field(spec.end.as_str()),
            FieldError::new(ValidationIssue::DateOrder, DATE_ORDER_MESSAGE),
        );
    }

    errors
}

fn resolve_path(
    segments: &[String],
    arrays: &IndexMap<String, FieldArrayController<Value>>,
) -> FieldPath {
    match segments {
        [] => FieldPath::Block,
        [field] => FieldPath::Field(field.clone()),
        [field, index, rest @ ..] => {
            let key = arrays
                .get(field)
                .zip(index.parse::<usize>().ok())
                .and_then(|(array, idx)| array.key_at(idx));
            match key {
                Some(key) => FieldPath::Entry {
                    field: field.clone(),
                    key,
                    member: rest.first().cloned(),
                },
                None => FieldPath::Field(field.clone()),
            }
        }
    }
}

fn is_date_field(layout: &BlockLayout, segments: &[String]) -> bool {
    matches!(
        segments,
        [field] if layout.field(field).is_some_and(|spec| spec.shape == FieldShape::Date)
    )
}

fn field_title(layout: &BlockLayout, path: &FieldPath) -> String {
    match path {
        FieldPath::Block => "Block".to_string(),
        FieldPath::Field(name) => layout.title_of(name),
        FieldPath::Entry { field, member, .. } => match layout.field(field).map(|f| &f.shape) {
            Some(FieldShape::FieldArray(spec)) => spec.member_title(member.as_deref()).to_string(),
            _ => layout.title_of(field),
        },
    }
}

fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
