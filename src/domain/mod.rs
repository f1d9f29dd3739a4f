mod date;
mod kind;
mod payload;

pub use date::{Clock, DATE_PATTERN, FixedClock, MonthYear, MonthYearParseError, SystemClock};
pub use kind::BlockKind;
pub use payload::{
    AwardBlock, BlockPayload, CertificateBlock, ContactBlock, ContactEntry, CourseBlock,
    EducationBlock, EmploymentType, ExperienceBlock, InterestBlock, InterestEntry, LanguageBlock,
    LevelEntry, ListBlock, ProficiencyLevel, SkillBlock,
};
