//! Follow-up prompt suggestions

use super::intent::Intent;
use crate::knowledge::{CatalogError, CatalogResult, Language, Localized};
use serde::Deserialize;
use std::collections::HashMap;

pub const MAX_SUGGESTIONS: usize = 3;

/// Suggestion lists keyed by language, then intent. Every language bucket
/// carries a `general` list used for intents it does not cover.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SuggestionTable(Localized<HashMap<Intent, Vec<String>>>);

impl SuggestionTable {
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] when a language has no `general` list or a list is empty or too long.
    pub fn validate(&self) -> CatalogResult<()> {
        for bucket in self.0.values() {
            match bucket.get(&Intent::General) {
                Some(general) if !general.is_empty() => {}
                _ => {
                    return Err(CatalogError::invalid(
                        "every suggestion bucket needs a non-empty general list",
                    ))
                }
            }
            if let Some((intent, list)) = bucket
                .iter()
                .find(|(_, list)| list.len() > MAX_SUGGESTIONS || list.iter().any(|s| s.trim().is_empty()))
            {
                return Err(CatalogError::invalid(format!(
                    "suggestions for {intent} must be 1 to {MAX_SUGGESTIONS} non-empty entries, got {list:?}"
                )));
            }
        }
        Ok(())
    }

    /// Suggestions for `intent` in `language`.
    ///
    /// Falls back to French when the language has no bucket, then to the
    /// bucket's `general` list when the intent has none.
    #[must_use]
    pub fn lookup(&self, intent: Intent, language: Language) -> &[String] {
        let bucket = self.0.get(language);
        bucket
            .get(&intent)
            .filter(|list| !list.is_empty())
            .or_else(|| bucket.get(&Intent::General))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
