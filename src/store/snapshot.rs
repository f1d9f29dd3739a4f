use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::{BlockKind, BlockPayload},
    io::{DocumentFormat, serialize_value},
};

/// Read-only copy of the document, keyed by block type id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    blocks: IndexMap<BlockKind, Vec<BlockPayload>>,
}

/// One result per block type handed to a [`SnapshotSink`].
pub type BatchResults = IndexMap<BlockKind, Result<()>>;

/// Persistence boundary for a finished document.
///
/// Implementations receive the whole snapshot and report success or failure
/// per block-type batch. Nothing in this crate persists on its own.
pub trait SnapshotSink {
    fn persist(&mut self, snapshot: &Snapshot) -> BatchResults;
}

impl Snapshot {
    pub(crate) fn new(blocks: IndexMap<BlockKind, Vec<BlockPayload>>) -> Self {
        Self { blocks }
    }

    pub fn get(&self, kind: BlockKind) -> &[BlockPayload] {
        self.blocks.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Looks a batch up by its string id, e.g. `"award"`.
    pub fn by_id(&self, id: &str) -> Option<&[BlockPayload]> {
        let kind = id.parse::<BlockKind>().ok()?;
        self.blocks.get(&kind).map(Vec::as_slice)
    }

    pub fn kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.blocks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockKind, &[BlockPayload])> {
        self.blocks
            .iter()
            .map(|(kind, payloads)| (*kind, payloads.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).context("failed to convert snapshot to JSON")
    }

    pub fn encode(&self, format: DocumentFormat, pretty: bool) -> Result<String> {
        serialize_value(self, format, pretty)
            .with_context(|| format!("failed to encode snapshot as {format}"))
    }
}
