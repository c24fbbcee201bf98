//! Reading and parsing configuration documents from disk.

use std::path::Path;

use serde_yaml::{Mapping, Number, Value};

use super::error::ParseFailure;
use super::ConfigError;

/// Markup formats a configuration file can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
}

impl Format {
    /// Picks the format from the file extension. Anything other than `.toml`
    /// is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Yaml,
        }
    }
}

/// Loads and parses the configuration document at `path`.
///
/// Fails with [`ConfigError::FileNotFound`] when the file does not exist and
/// with [`ConfigError::InvalidConfig`] when it holds no usable document.
pub fn load_document(path: &Path) -> Result<Mapping, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    parse_document(&contents, Format::from_path(path), path)
}

/// Parses `contents` into a document mapping. `path` is only used for errors.
pub fn parse_document(contents: &str, format: Format, path: &Path) -> Result<Mapping, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if contents.trim().is_empty() {
        return Err(invalid("unable to parse empty document"));
    }

    let parse_error = |source: ParseFailure| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    };

    let value = match format {
        Format::Yaml => serde_yaml::from_str::<Value>(contents)
            .map_err(|e| parse_error(e.into()))?,
        Format::Toml => {
            let table = toml::from_str::<toml::Table>(contents).map_err(|e| parse_error(e.into()))?;
            Value::Mapping(toml_table_to_mapping(table))
        }
    };

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null | Value::Bool(false) => Err(invalid("unable to parse empty document")),
        _ => Err(invalid("top-level value must be a mapping")),
    }
}

fn toml_table_to_mapping(table: toml::Table) -> Mapping {
    table
        .into_iter()
        .map(|(key, value)| (Value::String(key), toml_to_yaml(value)))
        .collect()
}

fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(Number::from(i)),
        toml::Value::Float(f) => Value::Number(Number::from(f)),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(t) => Value::Mapping(toml_table_to_mapping(t)),
    }
}
