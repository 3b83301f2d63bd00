//! YAML <-> JSON conversion for tool and event documents.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Pretty JSON with four-space indentation. Mapping order is preserved.
pub fn yaml_to_json(text: &str) -> Result<String, ConvertError> {
    let value: serde_json::Value = serde_yaml::from_str(text)?;
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub fn json_to_yaml(text: &str) -> Result<String, ConvertError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(serde_yaml::to_string(&value)?)
}
