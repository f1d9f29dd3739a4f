use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogError;

/// Stable identifier of a block type.
///
/// Block identity is always resolved through this enum; display labels never
/// take part in lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Experience,
    Education,
    Skill,
    Course,
    Award,
    Certificate,
    Language,
    Interest,
    Contact,
}

impl BlockKind {
    pub const ALL: [BlockKind; 9] = [
        BlockKind::Experience,
        BlockKind::Education,
        BlockKind::Skill,
        BlockKind::Course,
        BlockKind::Award,
        BlockKind::Certificate,
        BlockKind::Language,
        BlockKind::Interest,
        BlockKind::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Experience => "experience",
            BlockKind::Education => "education",
            BlockKind::Skill => "skill",
            BlockKind::Course => "course",
            BlockKind::Award => "award",
            BlockKind::Certificate => "certificate",
            BlockKind::Language => "language",
            BlockKind::Interest => "interest",
            BlockKind::Contact => "contact",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = CatalogError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == id)
            .ok_or_else(|| CatalogError::UnknownBlockType(id.to_string()))
    }
}
