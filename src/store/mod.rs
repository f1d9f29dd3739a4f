mod document;
mod snapshot;

pub use document::{CommitListener, DocumentStore, StoreError};
pub use snapshot::{BatchResults, Snapshot, SnapshotSink};
