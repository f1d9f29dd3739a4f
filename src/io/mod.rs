mod format;
mod output;

pub use format::DocumentFormat;
pub use output::serialize_value;
