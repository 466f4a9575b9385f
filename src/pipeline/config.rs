//! Project config and style file loading
//!
//! Both files are optional. A missing file is treated as "no override";
//! a file that exists but does not parse is a `ConfigParseError`.

use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::ConversionError;
use super::flags::DocumentType;

/// Fixed name of the project-level config file
pub const PROJECT_CONFIG_FILE: &str = "mdocx.config.json";

/// Contents of `mdocx.config.json`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectConfig {
    #[serde(
        rename = "documentType",
        default,
        deserialize_with = "document_type_any_case"
    )]
    pub document_type: Option<DocumentType>,
    #[serde(default)]
    pub style: Option<Map<String, Value>>,
}

/// `"report"`, `"Report"` and `"REPORT"` all name the same type
fn document_type_any_case<'de, D>(deserializer: D) -> Result<Option<DocumentType>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    DocumentType::from_str(raw.trim(), true)
        .map(Some)
        .map_err(|_| {
            D::Error::custom(format!(
                "unknown documentType \"{}\", expected \"document\" or \"report\"",
                raw
            ))
        })
}

/// Location of the project config inside `project_dir`
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_FILE)
}

/// Load the project config from `project_dir`, if present.
pub fn load_project_config(project_dir: &Path) -> Result<Option<ProjectConfig>, ConversionError> {
    let path = project_config_path(project_dir);
    let Some(text) = read_optional(&path)? else {
        return Ok(None);
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ConversionError::ConfigParseError {
            path,
            message: e.to_string(),
        })
}

/// Load an explicit style file. The file must hold a JSON object.
pub fn load_style_file(path: &Path) -> Result<Option<Map<String, Value>>, ConversionError> {
    let Some(text) = read_optional(path)? else {
        return Ok(None);
    };

    let value: Value =
        serde_json::from_str(&text).map_err(|e| ConversionError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(Some(map)),
        other => Err(ConversionError::ConfigParseError {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", json_kind(&other)),
        }),
    }
}

/// Read a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>, ConversionError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConversionError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
