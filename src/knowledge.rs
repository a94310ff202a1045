//! Static conversation catalog
//!
//! Agronomic records, phrasebook and detection rules, loaded once at startup
//! from JSON data files (compiled into the binary, or read from a directory
//! override) and validated before any conversation starts. The catalog is
//! immutable afterwards and shared read-only between sessions.

mod error;
mod localized;
mod phrasebook;
mod records;

pub use error::{CatalogError, CatalogResult};
pub use localized::{Language, Localized, UnknownLanguage};
pub use phrasebook::{PhraseKey, Phrasebook, PhrasebookFile, TemplateName};
pub use records::*;

use crate::dialogue::{IntentClassifier, LanguageDetector, RulesFile};
use rust_embed::Embed;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

pub const KNOWLEDGE_FILE: &str = "knowledge.json";
pub const PHRASEBOOK_FILE: &str = "phrasebook.json";
pub const RULES_FILE: &str = "rules.json";

#[derive(Embed)]
#[folder = "data/"]
struct BundledData;

/// Everything a conversation consults, validated as a whole
#[derive(Debug)]
pub struct Catalog {
    knowledge: KnowledgeBase,
    phrasebook: Phrasebook,
    languages: LanguageDetector,
    intents: IntentClassifier,
}

impl Catalog {
    /// Load the data files compiled into the binary
    ///
    /// # Errors
    ///
    /// Fails if a bundled file is missing, malformed, or fails validation.
    pub fn bundled() -> CatalogResult<Self> {
        Self::load(|file| {
            BundledData::get(file)
                .map(|content| content.data.into_owned())
                .ok_or_else(|| CatalogError::MissingFile(file.to_string()))
        })
    }

    /// Load the data files from `dir` instead of the bundled copies
    ///
    /// # Errors
    ///
    /// Fails if a file is missing or unreadable, malformed, or fails
    /// validation.
    pub fn from_dir(dir: &Path) -> CatalogResult<Self> {
        Self::load(|file| {
            let path = dir.join(file);
            if !path.exists() {
                return Err(CatalogError::MissingFile(path.display().to_string()));
            }
            std::fs::read(&path).map_err(|source| CatalogError::Io {
                file: path.display().to_string(),
                source,
            })
        })
    }

    fn load(read: impl Fn(&str) -> CatalogResult<Vec<u8>>) -> CatalogResult<Self> {
        let knowledge: KnowledgeBase = parse(KNOWLEDGE_FILE, &read(KNOWLEDGE_FILE)?)?;
        let phrasebook: PhrasebookFile = parse(PHRASEBOOK_FILE, &read(PHRASEBOOK_FILE)?)?;
        let rules: RulesFile = parse(RULES_FILE, &read(RULES_FILE)?)?;
        Self::from_parts(knowledge, phrasebook, rules)
    }

    /// Validate already-parsed tables and assemble the catalog
    ///
    /// # Errors
    ///
    /// Returns the first validation failure across the three tables.
    pub fn from_parts(
        knowledge: KnowledgeBase,
        phrasebook: PhrasebookFile,
        rules: RulesFile,
    ) -> CatalogResult<Self> {
        validate_knowledge(&knowledge)?;
        let phrasebook = Phrasebook::from_file(phrasebook)?;
        let languages = LanguageDetector::new(rules.language_markers)?;
        let intents = IntentClassifier::new(&rules.intents)?;

        tracing::info!(
            diseases = knowledge.diseases.len(),
            organic_treatments = knowledge.treatments.organic.len(),
            chemical_treatments = knowledge.treatments.chemical.len(),
            crops = knowledge.crops.len(),
            "Catalog loaded"
        );

        Ok(Self {
            knowledge,
            phrasebook,
            languages,
            intents,
        })
    }

    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    #[must_use]
    pub fn phrasebook(&self) -> &Phrasebook {
        &self.phrasebook
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageDetector {
        &self.languages
    }

    #[must_use]
    pub fn intents(&self) -> &IntentClassifier {
        &self.intents
    }
}

fn parse<T: DeserializeOwned>(file: &str, bytes: &[u8]) -> CatalogResult<T> {
    serde_json::from_slice(bytes).map_err(|source| CatalogError::Parse {
        file: file.to_string(),
        source,
    })
}

fn validate_knowledge(kb: &KnowledgeBase) -> CatalogResult<()> {
    ensure_unique("disease", kb.diseases.iter().map(|d| d.key.as_str()))?;
    ensure_unique("organic treatment", kb.treatments.organic.iter().map(|t| t.key.as_str()))?;
    ensure_unique("chemical treatment", kb.treatments.chemical.iter().map(|t| t.key.as_str()))?;
    ensure_unique("crop", kb.crops.iter().map(|c| c.key.as_str()))?;

    for disease in &kb.diseases {
        if disease.info.values().any(|info| info.name.trim().is_empty()) {
            return Err(CatalogError::invalid(format!(
                "disease {} has an empty name",
                disease.key
            )));
        }
        // A blank phrase is a substring of every utterance
        let blank_phrase = disease.info.values().any(|info| {
            info.symptoms
                .iter()
                .chain(&info.affected_crops)
                .any(|phrase| phrase.trim().is_empty())
        });
        if blank_phrase {
            return Err(CatalogError::invalid(format!(
                "disease {} has an empty symptom or affected crop",
                disease.key
            )));
        }
        for key in &disease.treatments {
            if kb.treatments.find(TreatmentCategory::Organic, key).is_none() {
                return Err(CatalogError::invalid(format!(
                    "disease {} references unknown organic treatment {key}",
                    disease.key
                )));
            }
        }
    }

    if let Some(crop) = kb
        .crops
        .iter()
        .find(|c| c.info.values().any(|info| info.name.trim().is_empty()))
    {
        return Err(CatalogError::invalid(format!("crop {} has an empty name", crop.key)));
    }

    Ok(())
}

fn ensure_unique<'a>(what: &str, keys: impl Iterator<Item = &'a str>) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.trim().is_empty() {
            return Err(CatalogError::invalid(format!("{what} with an empty key")));
        }
        if !seen.insert(key) {
            return Err(CatalogError::invalid(format!("duplicate {what} key {key}")));
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_catalog() -> std::sync::Arc<Catalog> {
    std::sync::Arc::new(Catalog::bundled().expect("bundled catalog is valid"))
}
