use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::{
    catalog::BlockTypeDescriptor,
    domain::{BlockKind, BlockPayload, Clock, MonthYear},
    schema::{DateRangeSpec, FieldArraySpec, FieldShape},
};

use super::{
    array::{Entry, EntryKey, FieldArrayController},
    dates::{DateRangeController, DateRangeError, DateRangeValue},
    error::{ErrorMap, FieldError, FieldPath, SessionError, ValidationIssue},
    validation::{ValidationInput, collect_errors},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Pristine,
    Editing,
    Valid,
    /// Still editable; errors from the last validation are attached.
    Invalid,
    Committed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(BlockPayload),
    Invalid(ErrorMap),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Committed(BlockPayload),
    Rejected(ErrorMap),
}

/// One schema-driven form, from block selection to commit or discard.
#[derive(Debug, Clone)]
pub struct FormSession {
    descriptor: Arc<BlockTypeDescriptor>,
    values: Map<String, Value>,
    /// Date-range text that did not parse; validation reports it.
    raw_dates: Map<String, Value>,
    date_range: Option<DateRangeController>,
    arrays: IndexMap<String, FieldArrayController<Value>>,
    status: SessionStatus,
    errors: ErrorMap,
    auto_validate: bool,
}

impl FormSession {
    pub fn new(descriptor: Arc<BlockTypeDescriptor>, clock: Arc<dyn Clock>) -> Self {
        let layout = descriptor.layout();
        let mut values = Map::new();
        let mut raw_dates = Map::new();
        let mut date_range = layout
            .date_range
            .as_ref()
            .map(|_| DateRangeController::new(Arc::clone(&clock)));

        let mut arrays = IndexMap::new();
        for (name, spec) in layout.field_arrays() {
            let initial = match layout.defaults.get(name) {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            };
            arrays.insert(
                name.to_string(),
                FieldArrayController::with_entries(spec.zero.clone(), spec.requires_entry(), initial),
            );
        }

        for (name, value) in &layout.defaults {
            if arrays.contains_key(name) {
                continue;
            }
            match (&layout.date_range, date_range.as_mut()) {
                (Some(spec), Some(range)) if spec.owns(name) => {
                    if spec.ongoing == *name {
                        if let Some(flag) = value.as_bool() {
                            range.set_ongoing(flag);
                        }
                    } else if spec.as_of.as_deref() != Some(name.as_str()) {
                        apply_range_text(range, spec, name, value, &mut raw_dates);
                    }
                }
                _ => {
                    values.insert(name.clone(), value.clone());
                }
            }
        }

        Self {
            descriptor,
            values,
            raw_dates,
            date_range,
            arrays,
            status: SessionStatus::Pristine,
            errors: ErrorMap::new(),
            auto_validate: true,
        }
    }

    pub fn with_auto_validate(mut self, enabled: bool) -> Self {
        self.auto_validate = enabled;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.descriptor.kind()
    }

    pub fn descriptor(&self) -> &BlockTypeDescriptor {
        &self.descriptor
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn is_dirty(&self) -> bool {
        self.status != SessionStatus::Pristine
    }

    /// Sets a plain field. Date-range fields typed as text are routed through
    /// the date-range controller when they parse.
    pub fn update_field(&mut self, name: &str, value: Value) -> Result<(), SessionError> {
        let descriptor = Arc::clone(&self.descriptor);
        let layout = descriptor.layout();
        let field = layout
            .field(name)
            .ok_or_else(|| SessionError::UnknownField(name.to_string()))?;
        if matches!(field.shape, FieldShape::FieldArray(_)) {
            return Err(SessionError::ManagedByFieldArray(name.to_string()));
        }

        if let Some(spec) = layout.date_range.as_ref().filter(|spec| spec.owns(name)) {
            if spec.as_of.as_deref() == Some(name) {
                return Err(SessionError::ReadOnly(name.to_string()));
            }
            if spec.ongoing == name {
                let flag = value
                    .as_bool()
                    .ok_or_else(|| SessionError::ExpectedBool(name.to_string()))?;
                return self.set_ongoing(flag);
            }
            let range = self.date_range.as_mut().ok_or(SessionError::NoDateRange)?;
            if spec.end == name && range.end_locked() {
                debug!(field = name, "ignoring end date while ongoing");
                return Err(SessionError::DateRange(DateRangeError::EndLocked));
            }
            apply_range_text(range, spec, name, &value, &mut self.raw_dates);
        } else if value.is_null() {
            self.values.remove(name);
        } else {
            self.values.insert(name.to_string(), value);
        }

        self.touch(FieldPath::field(name));
        Ok(())
    }

    pub fn date_range(&self) -> Option<DateRangeValue> {
        self.date_range.as_ref().map(DateRangeController::value)
    }

    pub fn set_start(&mut self, date: MonthYear) -> Result<(), SessionError> {
        let field = self.range_spec()?.start;
        self.range_mut()?.set_start(date);
        self.raw_dates.remove(&field);
        self.touch(FieldPath::Field(field));
        Ok(())
    }

    pub fn set_end(&mut self, date: MonthYear) -> Result<(), SessionError> {
        let field = self.range_spec()?.end;
        self.range_mut()?.set_end(date)?;
        self.raw_dates.remove(&field);
        self.touch(FieldPath::Field(field));
        Ok(())
    }

    pub fn clear_end(&mut self) -> Result<(), SessionError> {
        let field = self.range_spec()?.end;
        self.range_mut()?.clear_end()?;
        self.raw_dates.remove(&field);
        self.touch(FieldPath::Field(field));
        Ok(())
    }

    pub fn set_ongoing(&mut self, ongoing: bool) -> Result<(), SessionError> {
        let DateRangeSpec { end, ongoing: field, .. } = self.range_spec()?;
        self.range_mut()?.set_ongoing(ongoing);
        self.touch(FieldPath::Field(field));
        if ongoing {
            self.raw_dates.remove(&end);
            self.touch(FieldPath::Field(end));
        }
        Ok(())
    }

    pub fn entries(&self, field: &str) -> Result<&[Entry<Value>], SessionError> {
        Ok(self.array(field)?.list())
    }

    pub fn can_remove_entry(&self, field: &str, key: EntryKey) -> bool {
        self.array(field)
            .map(|array| array.can_remove(key))
            .unwrap_or(false)
    }

    pub fn append_entry(&mut self, field: &str) -> Result<EntryKey, SessionError> {
        let key = self.array_mut(field)?.append_zero();
        self.touch(FieldPath::entry(field, key));
        Ok(key)
    }

    pub fn append_entry_with(&mut self, field: &str, value: Value) -> Result<EntryKey, SessionError> {
        let key = self.array_mut(field)?.append(value);
        self.touch(FieldPath::entry(field, key));
        Ok(key)
    }

    pub fn remove_entry(&mut self, field: &str, key: EntryKey) -> Result<Value, SessionError> {
        let removed = self
            .array_mut(field)?
            .remove_at(key)
            .map_err(|source| {
                debug!(field, %key, %source, "entry removal rejected");
                SessionError::FieldArray {
                    field: field.to_string(),
                    source,
                }
            })?;
        self.touch(FieldPath::entry(field, key));
        Ok(removed)
    }

    /// Merges `partial` into an object entry, or replaces a scalar entry.
    /// A `null` member removes that member.
    pub fn update_entry(
        &mut self,
        field: &str,
        key: EntryKey,
        partial: Value,
    ) -> Result<(), SessionError> {
        let spec = self.array_spec(field)?;
        if let Value::Object(members) = &partial
            && let Some(unknown) = members.keys().find(|m| !spec.members.contains_key(*m))
        {
            return Err(SessionError::UnknownField(format!("{field}.{unknown}")));
        }
        let edited: Vec<String> = match &partial {
            Value::Object(members) => members.keys().cloned().collect(),
            _ => Vec::new(),
        };
        self.array_mut(field)?
            .update_at(key, |entry| merge_entry(entry, partial))
            .map_err(|source| SessionError::FieldArray {
                field: field.to_string(),
                source,
            })?;
        if edited.is_empty() {
            self.touch(FieldPath::entry(field, key));
        } else {
            for member in edited {
                self.touch(FieldPath::member(field, key, member));
            }
        }
        Ok(())
    }

    pub fn move_entry(&mut self, field: &str, key: EntryKey, delta: i32) -> Result<bool, SessionError> {
        let moved = self
            .array_mut(field)?
            .move_entry(key, delta)
            .map_err(|source| SessionError::FieldArray {
                field: field.to_string(),
                source,
            })?;
        if moved {
            self.touch(FieldPath::entry(field, key));
        }
        Ok(moved)
    }

    /// Attaches a link entered in the link dialog. Blank input is ignored.
    pub fn attach_link(&mut self, url: &str) -> Result<bool, SessionError> {
        if !self.descriptor.layout().supports_link() {
            return Err(SessionError::LinksUnsupported);
        }
        let url = url.trim();
        if url.is_empty() {
            return Ok(false);
        }
        self.update_field("link", Value::String(url.to_string()))?;
        Ok(true)
    }

    /// The payload as it would be validated right now.
    pub fn working_value(&self) -> Value {
        let layout = self.descriptor.layout();
        let range = self.date_range();
        let mut object = Map::new();
        for (name, field) in &layout.fields {
            let value = if let Some(array) = self.arrays.get(name) {
                Some(Value::Array(array.values().cloned().collect()))
            } else if let (Some(spec), Some(range)) = (&layout.date_range, range)
                && spec.owns(name)
            {
                if let Some(raw) = self.raw_dates.get(name) {
                    Some(raw.clone())
                } else if spec.start == *name {
                    range.start.map(date_value)
                } else if spec.end == *name {
                    range.end.map(date_value)
                } else if spec.ongoing == *name {
                    Some(Value::Bool(range.is_ongoing))
                } else {
                    range.ongoing_since.map(date_value)
                }
            } else {
                match self.values.get(name) {
                    Some(Value::String(text)) if text.is_empty() && field.shape == FieldShape::Date => {
                        None
                    }
                    other => other.cloned(),
                }
            };
            if let Some(value) = value {
                object.insert(name.clone(), value);
            }
        }
        Value::Object(object)
    }

    /// Validates without touching session state.
    pub fn check(&self) -> ValidationOutcome {
        let value = self.working_value();
        let errors = self.collect(&value);
        if !errors.is_empty() {
            return ValidationOutcome::Invalid(errors);
        }
        match BlockPayload::from_value(self.kind(), value) {
            Ok(payload) => ValidationOutcome::Valid(payload),
            Err(err) => {
                error!(kind = %self.kind(), %err, "validated payload does not match its block type");
                let mut errors = ErrorMap::new();
                errors.insert(
                    FieldPath::Block,
                    FieldError::new(ValidationIssue::Constraint, err.to_string()),
                );
                ValidationOutcome::Invalid(errors)
            }
        }
    }

    pub fn validate(&mut self) -> ValidationOutcome {
        let outcome = self.check();
        match &outcome {
            ValidationOutcome::Valid(_) => {
                self.errors = ErrorMap::new();
                self.status = SessionStatus::Valid;
            }
            ValidationOutcome::Invalid(errors) => {
                self.errors = errors.clone();
                self.status = SessionStatus::Invalid;
            }
        }
        outcome
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        match self.validate() {
            ValidationOutcome::Valid(payload) => {
                self.status = SessionStatus::Committed;
                debug!(kind = %self.kind(), "form committed");
                SubmitOutcome::Committed(payload)
            }
            ValidationOutcome::Invalid(errors) => {
                debug!(kind = %self.kind(), issues = errors.len(), "form rejected");
                SubmitOutcome::Rejected(errors)
            }
        }
    }

    fn collect(&self, value: &Value) -> ErrorMap {
        let date_range = if self.raw_dates.is_empty() {
            self.date_range()
        } else {
            None
        };
        collect_errors(
            &self.descriptor,
            ValidationInput {
                value,
                arrays: &self.arrays,
                date_range,
            },
        )
    }

    /// Marks the session edited and, once errors are showing, re-checks them:
    /// fixed paths drop out, the edited path may gain an error, untouched
    /// fields never do.
    fn touch(&mut self, edited: FieldPath) {
        self.status = SessionStatus::Editing;
        if !self.auto_validate || self.errors.is_empty() {
            return;
        }
        let previous = std::mem::take(&mut self.errors);
        let mut fresh = self.collect(&self.working_value());
        fresh.retain(|path| previous.contains(path) || *path == edited);
        self.errors = fresh;
    }

    fn range_spec(&self) -> Result<DateRangeSpec, SessionError> {
        self.descriptor
            .layout()
            .date_range
            .clone()
            .ok_or(SessionError::NoDateRange)
    }

    fn range_mut(&mut self) -> Result<&mut DateRangeController, SessionError> {
        self.date_range.as_mut().ok_or(SessionError::NoDateRange)
    }

    fn array_spec(&self, field: &str) -> Result<FieldArraySpec, SessionError> {
        match self.descriptor.layout().field(field).map(|f| &f.shape) {
            Some(FieldShape::FieldArray(spec)) => Ok(spec.clone()),
            Some(_) => Err(SessionError::NotAFieldArray(field.to_string())),
            None => Err(SessionError::UnknownField(field.to_string())),
        }
    }

    fn array(&self, field: &str) -> Result<&FieldArrayController<Value>, SessionError> {
        self.arrays.get(field).ok_or_else(|| self.array_error(field))
    }

    fn array_mut(&mut self, field: &str) -> Result<&mut FieldArrayController<Value>, SessionError> {
        let missing = self.array_error(field);
        self.arrays.get_mut(field).ok_or(missing)
    }

    fn array_error(&self, field: &str) -> SessionError {
        if self.descriptor.layout().field(field).is_some() {
            SessionError::NotAFieldArray(field.to_string())
        } else {
            SessionError::UnknownField(field.to_string())
        }
    }
}

fn date_value(date: MonthYear) -> Value {
    Value::String(date.to_string())
}

/// Routes typed text for a range end through the controller, keeping text
/// that does not parse so validation can report it.
fn apply_range_text(
    range: &mut DateRangeController,
    spec: &DateRangeSpec,
    name: &str,
    value: &Value,
    raw_dates: &mut Map<String, Value>,
) {
    let parsed = match value {
        Value::Null => Some(None),
        Value::String(text) if text.is_empty() => Some(None),
        Value::String(text) => text.parse::<MonthYear>().ok().map(Some),
        _ => None,
    };
    let Some(date) = parsed else {
        raw_dates.insert(name.to_string(), value.clone());
        return;
    };
    raw_dates.remove(name);
    let is_start = spec.start == name;
    let applied = match (is_start, date) {
        (true, Some(date)) => {
            range.set_start(date);
            Ok(())
        }
        (true, None) => {
            range.clear_start();
            Ok(())
        }
        (false, Some(date)) => range.set_end(date),
        (false, None) => range.clear_end(),
    };
    if applied.is_err() {
        debug!(field = name, "end date locked while ongoing");
    }
}

fn merge_entry(entry: &mut Value, partial: Value) {
    match (entry, partial) {
        (Value::Object(current), Value::Object(members)) => {
            for (member, value) in members {
                if value.is_null() {
                    current.remove(&member);
                } else {
                    current.insert(member, value);
                }
            }
        }
        (entry, partial) => *entry = partial,
    }
}
