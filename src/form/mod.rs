mod actions;
mod array;
mod dates;
mod error;
mod reducers;
mod state;
mod validation;

pub use actions::FormCommand;
pub use array::{Entry, EntryKey, FieldArrayController, FieldArrayError};
pub use dates::{DateRangeController, DateRangeError, DateRangeValue};
pub use error::{ErrorMap, FieldError, FieldPath, SessionError, ValidationIssue};
pub use reducers::{CommandEffect, apply_command};
pub use state::{FormSession, SessionStatus, SubmitOutcome, ValidationOutcome};
pub use validation::{DATE_FORMAT_MESSAGE, DATE_ORDER_MESSAGE, TOO_FEW_ENTRIES_MESSAGE};
