use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use lazy_static::lazy_static;

use super::Localizer;

const ENGLISH: &str = include_str!("../../locales/en.json");

/// Message catalog loaded from a flat JSON object of message id to template.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn from_json(data: &str) -> Result<Self, anyhow::Error> {
        let messages: HashMap<String, String> =
            serde_json::from_str(data).context("Failed to parse message catalog")?;
        Ok(Self { messages })
    }

    pub async fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read message catalog {}", path.display()))?;
        Self::from_json(&data)
    }

    /// Built-in English messages.
    pub fn english() -> &'static Catalog {
        lazy_static! {
            static ref ENGLISH_CATALOG: Catalog =
                Catalog::from_json(ENGLISH).expect("built-in English catalog is valid JSON");
        }
        &ENGLISH_CATALOG
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

impl Localizer for Catalog {
    fn message(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        match self.messages.get(key) {
            Some(template) => substitute(template, substitutions),
            None => {
                tracing::warn!(key, "Missing message in catalog");
                key.to_string()
            }
        }
    }
}

fn substitute(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };
        let name = &after[..end];
        match substitutions.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => result.push_str(value),
            None => {
                result.push('{');
                result.push_str(name);
                result.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    result
}
