//! The localization document that carries the `languages` map.
//!
//! Only the `languages` key is ever rewritten. Every other key keeps its
//! value and position.

use super::LanguageNames;
use crate::artifact;
use crate::error::{Result, SyncError};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::info;

const LANGUAGES_KEY: &str = "languages";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguagesDocument {
    root: Map<String, Value>,
}

impl LanguagesDocument {
    /// Load the document at `path`. A missing file is an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        match artifact::read_json(path)? {
            None => Ok(Self::default()),
            Some(value) => Self::from_value(value, path),
        }
    }

    fn from_value(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(SyncError::content(
                &path.display().to_string(),
                format!("expected a JSON object, found {}", json_kind(&other)),
            )),
        }
    }

    /// The current `languages` map; absent means empty.
    pub fn languages(&self) -> Result<LanguageNames> {
        let Some(section) = self.root.get(LANGUAGES_KEY) else {
            return Ok(LanguageNames::new());
        };

        let Value::Object(entries) = section else {
            return Err(SyncError::content(
                LANGUAGES_KEY,
                format!("expected an object, found {}", json_kind(section)),
            ));
        };

        entries
            .iter()
            .map(|(code, name)| match name {
                Value::String(name) => Ok((code.clone(), name.clone())),
                other => Err(SyncError::content(
                    LANGUAGES_KEY,
                    format!("name for {} is {}, not a string", code, json_kind(other)),
                )),
            })
            .collect()
    }

    /// Replace the `languages` map, keeping the key where it already was.
    pub fn with_languages(mut self, languages: &LanguageNames) -> Self {
        let section: Map<String, Value> = languages
            .iter()
            .map(|(code, name)| (code.clone(), Value::String(name.clone())))
            .collect();
        self.root
            .insert(LANGUAGES_KEY.to_string(), Value::Object(section));
        self
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        artifact::write_json(path, &self.root, true)?;
        info!("Wrote languages document to {}", path.display());
        Ok(())
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
