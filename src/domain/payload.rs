use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{BlockKind, MonthYear};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    #[serde(rename = "level1")]
    Level1,
    #[serde(rename = "level2")]
    Level2,
    #[serde(rename = "level3")]
    Level3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExperienceBlock {
    pub company: String,
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    #[serde(default)]
    pub present: bool,
    /// Month captured when `present` was switched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_as_of: Option<MonthYear>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EducationBlock {
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    #[serde(default)]
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CourseBlock {
    pub course: String,
    #[serde(default)]
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    #[serde(default)]
    pub present: bool,
    /// Month captured when `present` was switched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present_as_of: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AwardBlock {
    pub award: String,
    #[serde(default)]
    pub issued_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CertificateBlock {
    pub certificate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<MonthYear>,
    #[serde(default)]
    pub no_expiry: bool,
    /// Month captured when `no_expiry` was switched on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_expiry_as_of: Option<MonthYear>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Entry of a skill or language list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterestEntry {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactEntry {
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Block made of a single field array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListBlock<E> {
    pub entries: Vec<E>,
}

pub type SkillBlock = ListBlock<LevelEntry>;
pub type LanguageBlock = ListBlock<LevelEntry>;
pub type InterestBlock = ListBlock<InterestEntry>;
pub type ContactBlock = ListBlock<ContactEntry>;

/// A committed block, tagged by its block type.
///
/// Serializes without a tag: the owning block type is carried by the key the
/// payload is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockPayload {
    Experience(ExperienceBlock),
    Education(EducationBlock),
    Skill(SkillBlock),
    Course(CourseBlock),
    Award(AwardBlock),
    Certificate(CertificateBlock),
    Language(LanguageBlock),
    Interest(InterestBlock),
    Contact(ContactBlock),
}

impl BlockPayload {
    /// Rebuild a typed payload from a schema-validated value.
    pub fn from_value(kind: BlockKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            BlockKind::Experience => BlockPayload::Experience(serde_json::from_value(value)?),
            BlockKind::Education => BlockPayload::Education(serde_json::from_value(value)?),
            BlockKind::Skill => BlockPayload::Skill(serde_json::from_value(value)?),
            BlockKind::Course => BlockPayload::Course(serde_json::from_value(value)?),
            BlockKind::Award => BlockPayload::Award(serde_json::from_value(value)?),
            BlockKind::Certificate => BlockPayload::Certificate(serde_json::from_value(value)?),
            BlockKind::Language => BlockPayload::Language(serde_json::from_value(value)?),
            BlockKind::Interest => BlockPayload::Interest(serde_json::from_value(value)?),
            BlockKind::Contact => BlockPayload::Contact(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPayload::Experience(_) => BlockKind::Experience,
            BlockPayload::Education(_) => BlockKind::Education,
            BlockPayload::Skill(_) => BlockKind::Skill,
            BlockPayload::Course(_) => BlockKind::Course,
            BlockPayload::Award(_) => BlockKind::Award,
            BlockPayload::Certificate(_) => BlockKind::Certificate,
            BlockPayload::Language(_) => BlockKind::Language,
            BlockPayload::Interest(_) => BlockKind::Interest,
            BlockPayload::Contact(_) => BlockKind::Contact,
        }
    }

    pub fn to_value(&self) -> Value {
        // Every variant is a plain struct of strings, bools and lists.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
