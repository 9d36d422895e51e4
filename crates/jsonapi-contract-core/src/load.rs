//! # File Loading
//!
//! Configuration and catalogs can be written as YAML or JSON. The format is
//! chosen from the file extension: `.yaml`/`.yml` are YAML, everything else
//! is JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::LoadError;

/// Text format of a configuration or catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// YAML 1.2 (via `serde_yaml`).
    Yaml,
    /// JSON (via `serde_json`).
    Json,
}

impl SourceFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => SourceFormat::Yaml,
            _ => SourceFormat::Json,
        }
    }

    /// Display name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            SourceFormat::Yaml => "YAML",
            SourceFormat::Json => "JSON",
        }
    }
}

/// Read a file and return its text together with its detected format.
pub(crate) fn read_source(path: &Path) -> Result<(String, SourceFormat), LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok((content, SourceFormat::from_path(path)))
}

/// Deserialize `text` in the given format.
pub(crate) fn parse<T: DeserializeOwned>(
    text: &str,
    format: SourceFormat,
    origin: &str,
) -> Result<T, LoadError> {
    let parse_error = |reason: String| LoadError::Parse {
        origin: origin.to_string(),
        format: format.name(),
        reason,
    };
    match format {
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string())),
        SourceFormat::Json => serde_json::from_str(text).map_err(|e| parse_error(e.to_string())),
    }
}
