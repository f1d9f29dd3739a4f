#![deny(rust_2018_idioms)]

//! Block selection and schema-driven form sessions for assembling a résumé.
//!
//! A [`BlockDialogController`] walks the user from the [`BlockCatalog`] to a
//! [`FormSession`] for one block type and commits the validated payload into
//! a [`DocumentStore`].

pub mod app;
pub mod catalog;
pub mod domain;
pub mod form;
pub mod io;
pub mod schema;
pub mod store;

pub use app::{BlockDialogController, DialogError, DialogOptions, DialogState};
pub use catalog::{BlockCatalog, BlockTypeDescriptor, CatalogError};
pub use domain::{BlockKind, BlockPayload, Clock, FixedClock, MonthYear, SystemClock};
pub use form::{
    EntryKey, ErrorMap, FieldPath, FormCommand, FormSession, SessionError, SessionStatus,
    SubmitOutcome, ValidationIssue, ValidationOutcome,
};
pub use io::DocumentFormat;
pub use store::{CommitListener, DocumentStore, Snapshot, SnapshotSink};

pub mod prelude {
    pub use super::{
        BlockCatalog, BlockDialogController, BlockKind, BlockPayload, DialogOptions, DocumentFormat,
        FormCommand, FormSession, MonthYear, SubmitOutcome, ValidationOutcome,
    };
}

#[cfg(test)]
mod tests;
