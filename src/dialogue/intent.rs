//! Rule-based intent classification
//!
//! Trigger lists come from the rules data file; the order in which intents
//! are tested is fixed here and is part of the classifier's contract.

use crate::knowledge::{CatalogError, CatalogResult};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    DiseaseInquiry,
    TreatmentRequest,
    PreventionQuestion,
    CropInfo,
    WeatherConcern,
    Thanks,
    Goodbye,
    /// Nothing matched
    General,
}

impl Intent {
    /// Evaluation order, first match wins
    pub const PRIORITY: [Intent; 8] = [
        Intent::Greeting,
        Intent::DiseaseInquiry,
        Intent::TreatmentRequest,
        Intent::PreventionQuestion,
        Intent::CropInfo,
        Intent::WeatherConcern,
        Intent::Thanks,
        Intent::Goodbye,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::DiseaseInquiry => "disease_inquiry",
            Intent::TreatmentRequest => "treatment_request",
            Intent::PreventionQuestion => "prevention_question",
            Intent::CropInfo => "crop_info",
            Intent::WeatherConcern => "weather_concern",
            Intent::Thanks => "thanks",
            Intent::Goodbye => "goodbye",
            Intent::General => "general",
        }
    }

    /// Resolve an intent name; anything unrecognized is `General`
    #[must_use]
    pub fn from_name(name: &str) -> Intent {
        let name = name.trim();
        Intent::PRIORITY
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Intent::General)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    /// Compile one case-insensitive alternation per intent, in priority order.
    /// Every prioritized intent needs at least one non-empty trigger.
    ///
    /// # Errors
    ///
    /// Returns a catalog error for missing or empty triggers, triggers given
    /// for `general`, or a pattern that fails to compile.
    pub fn new(triggers: &HashMap<Intent, Vec<String>>) -> CatalogResult<Self> {
        if triggers.contains_key(&Intent::General) {
            return Err(CatalogError::invalid(
                "general is the fallback intent and cannot have triggers",
            ));
        }

        let mut rules = Vec::with_capacity(Intent::PRIORITY.len());
        for intent in Intent::PRIORITY {
            let words = triggers.get(&intent).map(Vec::as_slice).unwrap_or_default();
            if words.is_empty() || words.iter().any(|w| w.trim().is_empty()) {
                return Err(CatalogError::invalid(format!(
                    "intent {intent} needs non-empty triggers"
                )));
            }

            let alternation = words
                .iter()
                .map(|w| regex::escape(&w.trim().to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|source| CatalogError::Pattern {
                    intent: intent.to_string(),
                    source,
                })?;
            rules.push((intent, pattern));
        }

        Ok(Self { rules })
    }

    #[must_use]
    pub fn detect(&self, text: &str) -> Intent {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(_, pattern)| pattern.is_match(&lowered))
            .map_or(Intent::General, |(intent, _)| *intent)
    }

    /// Every intent whose triggers occur in `text`, in priority order
    #[cfg(test)]
    fn matching(&self, text: &str) -> Vec<Intent> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter(|(_, pattern)| pattern.is_match(&lowered))
            .map(|(intent, _)| *intent)
            .collect()
    }
}
