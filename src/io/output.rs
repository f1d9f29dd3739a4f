use anyhow::{Context, Result};
use serde::Serialize;

use super::DocumentFormat;

/// Serialize any value in the requested format.
pub fn serialize_value<T>(value: &T, format: DocumentFormat, pretty: bool) -> Result<String>
where
    T: Serialize + ?Sized,
{
    match format {
        DocumentFormat::Json => {
            if pretty {
                serde_json::to_string_pretty(value).context("failed to serialize JSON")
            } else {
                serde_json::to_string(value).context("failed to serialize JSON")
            }
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            if pretty {
                toml::to_string_pretty(value).context("failed to serialize TOML")
            } else {
                toml::to_string(value).context("failed to serialize TOML")
            }
        }
    }
}
