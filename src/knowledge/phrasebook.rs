//! Response templates and fixed phrases

use super::error::{CatalogError, CatalogResult};
use super::localized::{Language, Localized};
use crate::dialogue::suggestions::SuggestionTable;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder syntax inside templates: `{name}`
const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z_][A-Za-z0-9_]*)\}";

/// Templates carrying named placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateName {
    Greeting,
    DiseaseDetected,
    TreatmentRecommendation,
    PreventionAdvice,
    NeedMoreInfo,
    ThankYou,
}

impl TemplateName {
    pub const ALL: [TemplateName; 6] = [
        TemplateName::Greeting,
        TemplateName::DiseaseDetected,
        TemplateName::TreatmentRecommendation,
        TemplateName::PreventionAdvice,
        TemplateName::NeedMoreInfo,
        TemplateName::ThankYou,
    ];
}

/// Fixed strings without placeholders: canned answers and block labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseKey {
    Farewell,
    GeneralHelp,
    CropNotFound,
    SymptomsTopic,
    SymptomsLabel,
    CauseLabel,
    AffectedCropsLabel,
    OrganicTreatmentsLabel,
    CycleLabel,
    WateringLabel,
    SeasonalLabel,
}

impl PhraseKey {
    pub const ALL: [PhraseKey; 11] = [
        PhraseKey::Farewell,
        PhraseKey::GeneralHelp,
        PhraseKey::CropNotFound,
        PhraseKey::SymptomsTopic,
        PhraseKey::SymptomsLabel,
        PhraseKey::CauseLabel,
        PhraseKey::AffectedCropsLabel,
        PhraseKey::OrganicTreatmentsLabel,
        PhraseKey::CycleLabel,
        PhraseKey::WateringLabel,
        PhraseKey::SeasonalLabel,
    ];
}

/// On-disk shape of `phrasebook.json`
#[derive(Debug, Deserialize)]
pub struct PhrasebookFile {
    pub templates: HashMap<TemplateName, Localized<String>>,
    pub phrases: HashMap<PhraseKey, Localized<String>>,
    pub suggestions: SuggestionTable,
}

/// Validated templates, phrases and suggestion lists
#[derive(Debug)]
pub struct Phrasebook {
    templates: HashMap<TemplateName, Localized<String>>,
    phrases: HashMap<PhraseKey, Localized<String>>,
    suggestions: SuggestionTable,
    placeholder: Regex,
}

impl Phrasebook {
    /// Check that every template and phrase the responder uses exists (at
    /// least in French) and that the suggestion table is complete.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] naming the first missing entry.
    pub fn from_file(file: PhrasebookFile) -> CatalogResult<Self> {
        if let Some(missing) = TemplateName::ALL
            .iter()
            .find(|name| !file.templates.contains_key(name))
        {
            return Err(CatalogError::invalid(format!("missing template {missing:?}")));
        }
        if let Some(missing) = PhraseKey::ALL
            .iter()
            .find(|key| !file.phrases.contains_key(key))
        {
            return Err(CatalogError::invalid(format!("missing phrase {missing:?}")));
        }
        file.suggestions.validate()?;

        let placeholder = Regex::new(PLACEHOLDER_PATTERN).map_err(|source| CatalogError::Pattern {
            intent: "template placeholder".to_string(),
            source,
        })?;

        Ok(Self {
            templates: file.templates,
            phrases: file.phrases,
            suggestions: file.suggestions,
            placeholder,
        })
    }

    /// Raw template text, French when `language` has no translation
    #[must_use]
    pub fn template(&self, name: TemplateName, language: Language) -> &str {
        self.templates
            .get(&name)
            .map_or("", |template| template.get(language).as_str())
    }

    /// Template text with placeholders substituted. Placeholders without a
    /// value in `vars` render as the empty string.
    #[must_use]
    pub fn render(&self, name: TemplateName, language: Language, vars: &[(&str, &str)]) -> String {
        self.fill(self.template(name, language), vars)
    }

    #[must_use]
    pub fn phrase(&self, key: PhraseKey, language: Language) -> &str {
        self.phrases
            .get(&key)
            .map_or("", |phrase| phrase.get(language).as_str())
    }

    #[must_use]
    pub fn suggestions(&self) -> &SuggestionTable {
        &self.suggestions
    }

    fn fill(&self, template: &str, vars: &[(&str, &str)]) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures| {
                vars.iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map_or("", |(_, value)| *value)
                    .to_string()
            })
            .into_owned()
    }
}
