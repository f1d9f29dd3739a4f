use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::domain::{BlockKind, BlockPayload};

use super::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("a {actual} payload cannot be stored under {expected}")]
    KindMismatch {
        expected: BlockKind,
        actual: BlockKind,
    },
    #[error("no {kind} block at index {index} ({len} stored)")]
    OutOfRange {
        kind: BlockKind,
        index: usize,
        len: usize,
    },
}

/// Notified after every append. Listeners cannot veto or fail a commit.
pub trait CommitListener: Send + Sync {
    fn committed(&self, kind: BlockKind, index: usize, payload: &BlockPayload);
}

impl<F> CommitListener for F
where
    F: Fn(BlockKind, usize, &BlockPayload) + Send + Sync,
{
    fn committed(&self, kind: BlockKind, index: usize, payload: &BlockPayload) {
        self(kind, index, payload)
    }
}

/// Committed blocks grouped by type. Types keep the order of their first
/// commit, blocks keep insertion order.
#[derive(Default, Clone)]
pub struct DocumentStore {
    blocks: IndexMap<BlockKind, Vec<BlockPayload>>,
    listeners: Vec<Arc<dyn CommitListener>>,
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("blocks", &self.blocks)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Arc<dyn CommitListener>) {
        self.listeners.push(listener);
    }

    /// Appends a payload to the end of its type's sequence and returns its index.
    pub fn append(&mut self, kind: BlockKind, payload: BlockPayload) -> Result<usize, StoreError> {
        check_kind(kind, &payload)?;
        let entries = self.blocks.entry(kind).or_default();
        entries.push(payload);
        let index = entries.len() - 1;
        info!(%kind, index, "block committed");
        for listener in &self.listeners {
            listener.committed(kind, index, &entries[index]);
        }
        Ok(index)
    }

    /// Swaps the payload at `index` for a new one and returns the previous payload.
    pub fn replace(
        &mut self,
        kind: BlockKind,
        index: usize,
        payload: BlockPayload,
    ) -> Result<BlockPayload, StoreError> {
        check_kind(kind, &payload)?;
        let entries = self.blocks.get_mut(&kind).map(Vec::as_mut_slice).unwrap_or_default();
        let len = entries.len();
        let slot = entries
            .get_mut(index)
            .ok_or(StoreError::OutOfRange { kind, index, len })?;
        debug!(%kind, index, "block replaced");
        Ok(std::mem::replace(slot, payload))
    }

    pub fn get(&self, kind: BlockKind) -> &[BlockPayload] {
        self.blocks.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.blocks.clone())
    }
}

fn check_kind(expected: BlockKind, payload: &BlockPayload) -> Result<(), StoreError> {
    let actual = payload.kind();
    if actual == expected {
        Ok(())
    } else {
        Err(StoreError::KindMismatch { expected, actual })
    }
}
