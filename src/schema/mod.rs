mod blocks;
mod layout;
mod metadata;

pub use blocks::{builtin_label, builtin_schema};
pub use layout::{BlockLayout, DateRangeSpec, FieldArraySpec, FieldShape, FieldSpec, parse_layout};
pub use metadata::prettify_label;
