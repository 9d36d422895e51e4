//! # Error Catalog
//!
//! Maps an HTTP status code to the canonical `title` an error element must
//! carry for it. The server under test owns the real catalog; test suites
//! either load it from a YAML/JSON file, build it by hand, or fall back to
//! the HTTP reason phrases, which is what the resources server uses.
//!
//! Catalog files are flat mappings:
//!
//! ```yaml
//! 404: Not Found
//! "422": Unprocessable Entity
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::load::{self, SourceFormat};

/// Canonical error titles by HTTP status code.
///
/// Deserializing goes through the same status key validation as the
/// loaders, so `{"42": "Answer"}` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<u16, String>"
)]
pub struct ErrorCatalog {
    titles: BTreeMap<u16, String>,
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        Self::http()
    }
}

impl ErrorCatalog {
    /// A catalog with no entries.
    pub fn empty() -> Self {
        Self {
            titles: BTreeMap::new(),
        }
    }

    /// Every status code that has an HTTP canonical reason phrase.
    pub fn http() -> Self {
        let titles = (100u16..=999)
            .filter_map(|code| {
                let status = StatusCode::from_u16(code).ok()?;
                status.canonical_reason().map(|r| (code, r.to_string()))
            })
            .collect();
        Self { titles }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_title(mut self, status: u16, title: impl Into<String>) -> Self {
        self.insert(status, title);
        self
    }

    /// Set the title for `status`, returning the previous one.
    pub fn insert(&mut self, status: u16, title: impl Into<String>) -> Option<String> {
        self.titles.insert(status, title.into())
    }

    /// The canonical title for `status`.
    pub fn title(&self, status: u16) -> Option<&str> {
        self.titles.get(&status).map(String::as_str)
    }

    /// Whether `status` has a canonical title.
    pub fn contains(&self, status: u16) -> bool {
        self.titles.contains_key(&status)
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Entries in ascending status order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &str)> {
        self.titles.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Parse a catalog from YAML. Keys may be integers or numeric strings.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        Self::parse(text, SourceFormat::Yaml, "input")
    }

    /// Parse a catalog from a JSON object keyed by numeric strings.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Self::parse(text, SourceFormat::Json, "input")
    }

    /// Load a catalog file, YAML or JSON by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (text, format) = load::read_source(path)?;
        let catalog = Self::parse(&text, format, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), entries = catalog.len(), "loaded error catalog");
        Ok(catalog)
    }

    fn parse(text: &str, format: SourceFormat, origin: &str) -> Result<Self, LoadError> {
        let mut titles = BTreeMap::new();
        match format {
            SourceFormat::Yaml => {
                let raw: serde_yaml::Mapping = load::parse(text, format, origin)?;
                for (key, value) in raw {
                    let key = match key {
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::String(s) => s,
                        other => {
                            return Err(LoadError::InvalidStatus {
                                key: format!("{other:?}"),
                                reason: "key must be a number".into(),
                            })
                        }
                    };
                    let title = match value {
                        serde_yaml::Value::String(s) => s,
                        other => return Err(not_a_title(&key, &format!("{other:?}"))),
                    };
                    titles.insert(parse_status(&key)?, title);
                }
            }
            SourceFormat::Json => {
                let raw: serde_json::Map<String, serde_json::Value> =
                    load::parse(text, format, origin)?;
                for (key, value) in raw {
                    let title = match value {
                        serde_json::Value::String(s) => s,
                        other => return Err(not_a_title(&key, &other.to_string())),
                    };
                    titles.insert(parse_status(&key)?, title);
                }
            }
        }
        Ok(Self { titles })
    }
}

impl FromIterator<(u16, String)> for ErrorCatalog {
    fn from_iter<I: IntoIterator<Item = (u16, String)>>(iter: I) -> Self {
        Self {
            titles: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<BTreeMap<String, String>> for ErrorCatalog {
    type Error = LoadError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(key, title)| Ok((parse_status(&key)?, title)))
            .collect()
    }
}

impl From<ErrorCatalog> for BTreeMap<u16, String> {
    fn from(catalog: ErrorCatalog) -> Self {
        catalog.titles
    }
}

fn parse_status(key: &str) -> Result<u16, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidStatus {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    let code: u16 = key.trim().parse().map_err(|_| invalid("not an integer"))?;
    StatusCode::from_u16(code).map_err(|_| invalid("outside 100..=999"))?;
    Ok(code)
}

fn not_a_title(key: &str, found: &str) -> LoadError {
    LoadError::InvalidStatus {
        key: key.to_string(),
        reason: format!("title must be a string, found {found}"),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every three-digit status code is accepted as a catalog key.
        #[test]
        fn three_digit_keys_accepted(code in 100u16..=999, title in "[A-Za-z ]{1,30}") {
            let text = format!("{{\"{code}\": \"{title}\"}}");
            let catalog = ErrorCatalog::from_json_str(&text).unwrap();
            prop_assert_eq!(catalog.title(code), Some(title.as_str()));
        }

        /// Anything outside 100..=999 is rejected.
        #[test]
        fn other_keys_rejected(code in prop_oneof![0u32..100, 1000u32..100_000]) {
            let text = format!("{code}: Whatever\n");
            let rejected = matches!(
                ErrorCatalog::from_yaml_str(&text),
                Err(LoadError::InvalidStatus { .. })
            );
            prop_assert!(rejected);
        }
    }
}
