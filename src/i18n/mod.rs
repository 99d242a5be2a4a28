//! Message lookup for user-facing text.
//!
//! Resources are bundled JSON documents, one per language. Keys may be
//! dotted (`validation.url`) to reach nested objects. A key that cannot be
//! resolved is returned unchanged.

use serde_json::Value;
use tracing::warn;

use crate::app::{FeedloomError, Result};

pub const DEFAULT_LANGUAGE: &str = "ru";

const RESOURCES: &[(&str, &str)] = &[
    ("ru", include_str!("../../locales/ru.json")),
    ("en", include_str!("../../locales/en.json")),
];

#[derive(Debug, Clone)]
pub struct Localizer {
    language: String,
    messages: Value,
}

impl Localizer {
    /// Load the resources for `language`, falling back to the default
    /// language when it is not bundled.
    pub fn new(language: &str) -> Result<Self> {
        let (language, source) = match RESOURCES.iter().find(|(lang, _)| *lang == language) {
            Some(found) => *found,
            None => {
                warn!(
                    "No messages for language {:?}, using {:?}",
                    language, DEFAULT_LANGUAGE
                );
                RESOURCES
                    .iter()
                    .find(|(lang, _)| *lang == DEFAULT_LANGUAGE)
                    .copied()
                    .ok_or_else(|| FeedloomError::Config("default locale missing".into()))?
            }
        };

        let messages = serde_json::from_str(source)
            .map_err(|e| FeedloomError::Config(format!("locale {}: {}", language, e)))?;

        Ok(Self {
            language: language.to_string(),
            messages,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn t(&self, key: &str) -> String {
        self.lookup(key)
            .map(String::from)
            .unwrap_or_else(|| key.to_string())
    }

    /// Translate `key`, replacing each `{{name}}` with its value.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        let Some(template) = self.lookup(key) else {
            return key.to_string();
        };

        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{{{}}}}}", name), value)
            })
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        key.split('.')
            .try_fold(&self.messages, |node, part| node.get(part))
            .and_then(Value::as_str)
    }
}
