use std::{fmt, sync::Arc};

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use jsonschema::{Validator, validator_for};
use serde_json::Value;

use crate::{
    domain::BlockKind,
    schema::{BlockLayout, builtin_label, builtin_schema, parse_layout},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown block type `{0}`")]
    UnknownBlockType(String),
}

/// Catalog metadata, schema and default value of one block type.
pub struct BlockTypeDescriptor {
    kind: BlockKind,
    label: String,
    schema: Value,
    validator: Validator,
    layout: BlockLayout,
}

impl BlockTypeDescriptor {
    pub fn new(kind: BlockKind, label: impl Into<String>, schema: Value) -> Result<Self> {
        let validator = validator_for(&schema)
            .with_context(|| format!("failed to compile `{kind}` block schema"))?;
        let layout =
            parse_layout(&schema).with_context(|| format!("invalid `{kind}` block layout"))?;
        Ok(Self {
            kind,
            label: label.into(),
            schema,
            validator,
            layout,
        })
    }

    pub fn id(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Zero-value payload a new form session starts from.
    pub fn default_value(&self) -> Value {
        Value::Object(self.layout.defaults.clone())
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl fmt::Debug for BlockTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockTypeDescriptor")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

/// Read-only registry of selectable block types, in display order.
#[derive(Debug)]
pub struct BlockCatalog {
    descriptors: IndexMap<BlockKind, Arc<BlockTypeDescriptor>>,
}

impl BlockCatalog {
    /// Every built-in block type in the order the "Add block" dialog shows them.
    pub fn builtin() -> Result<Self> {
        Self::from_descriptors(
            BlockKind::ALL
                .into_iter()
                .map(|kind| BlockTypeDescriptor::new(kind, builtin_label(kind), builtin_schema(kind)))
                .collect::<Result<Vec<_>>>()?,
        )
    }

    pub fn from_descriptors(descriptors: Vec<BlockTypeDescriptor>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let kind = descriptor.kind;
            if map.insert(kind, Arc::new(descriptor)).is_some() {
                bail!("block type `{kind}` registered twice");
            }
        }
        Ok(Self { descriptors: map })
    }

    pub fn list(&self) -> impl ExactSizeIterator<Item = &Arc<BlockTypeDescriptor>> {
        self.descriptors.values()
    }

    pub fn get(&self, id: &str) -> Result<&Arc<BlockTypeDescriptor>, CatalogError> {
        let kind: BlockKind = id.parse()?;
        self.descriptor(kind)
    }

    pub fn descriptor(&self, kind: BlockKind) -> Result<&Arc<BlockTypeDescriptor>, CatalogError> {
        self.descriptors
            .get(&kind)
            .ok_or_else(|| CatalogError::UnknownBlockType(kind.as_str().to_string()))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
