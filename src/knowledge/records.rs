//! Agronomic records: diseases, treatments, prevention, crops, seasons

use super::localized::{Language, Localized};
use serde::{Deserialize, Serialize};

/// Localized description of a disease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseInfo {
    pub name: String,
    pub symptoms: Vec<String>,
    pub causes: String,
    pub affected_crops: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    pub key: String,
    /// Organic treatment keys, most relevant first
    #[serde(default)]
    pub treatments: Vec<String>,
    pub info: Localized<DiseaseInfo>,
}

impl DiseaseRecord {
    /// True if the lower-cased utterance names this disease or one of its
    /// symptoms in `language` (French symptoms when untranslated).
    #[must_use]
    pub fn is_mentioned_in(&self, lowered: &str, language: Language) -> bool {
        lowered.contains(&self.key.to_lowercase())
            || self
                .info
                .get(language)
                .symptoms
                .iter()
                .any(|symptom| lowered.contains(&symptom.to_lowercase()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentCategory {
    Organic,
    Chemical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentInfo {
    pub name: String,
    pub description: String,
    pub application: String,
    pub organic: bool,
    pub cost_estimate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub key: String,
    pub info: Localized<TreatmentInfo>,
}

/// Treatments grouped by method category, each group in display order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentCatalog {
    #[serde(default)]
    pub organic: Vec<TreatmentRecord>,
    #[serde(default)]
    pub chemical: Vec<TreatmentRecord>,
}

impl TreatmentCatalog {
    #[must_use]
    pub fn category(&self, category: TreatmentCategory) -> &[TreatmentRecord] {
        match category {
            TreatmentCategory::Organic => &self.organic,
            TreatmentCategory::Chemical => &self.chemical,
        }
    }

    #[must_use]
    pub fn find(&self, category: TreatmentCategory, key: &str) -> Option<&TreatmentRecord> {
        self.category(category).iter().find(|t| t.key == key)
    }

    /// Up to `limit` organic treatments, the `preferred` keys first (in their
    /// given order) and the rest of the organic table after them.
    #[must_use]
    pub fn organic_for<'a>(&'a self, preferred: &[String], limit: usize) -> Vec<&'a TreatmentRecord> {
        let mut picked: Vec<&TreatmentRecord> = Vec::with_capacity(limit.min(self.organic.len()));
        let candidates = preferred
            .iter()
            .filter_map(|key| self.find(TreatmentCategory::Organic, key))
            .chain(self.organic.iter());

        for record in candidates {
            if picked.len() == limit {
                break;
            }
            if !picked.iter().any(|p| p.key == record.key) {
                picked.push(record);
            }
        }
        picked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalTip {
    pub key: String,
    pub tip: Localized<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreventionTips {
    pub general: Localized<Vec<String>>,
    #[serde(default)]
    pub seasonal: Vec<SeasonalTip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropInfo {
    pub name: String,
    pub cycle: String,
    pub water: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropProfile {
    pub key: String,
    pub info: Localized<CropInfo>,
}

impl CropProfile {
    #[must_use]
    pub fn is_mentioned_in(&self, lowered: &str, language: Language) -> bool {
        lowered.contains(&self.info.get(language).name.to_lowercase())
    }
}

/// Calendar advice such as planting or harvest timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalAdvice {
    pub key: String,
    pub advice: Localized<String>,
}

/// The static agronomic tables. Record order is significant: lookups return
/// the first matching record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub diseases: Vec<DiseaseRecord>,
    pub treatments: TreatmentCatalog,
    pub prevention: PreventionTips,
    pub crops: Vec<CropProfile>,
    #[serde(default)]
    pub seasons: Vec<SeasonalAdvice>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn disease(&self, key: &str) -> Option<&DiseaseRecord> {
        self.diseases.iter().find(|d| d.key == key)
    }

    /// First disease, in table order, mentioned by the utterance
    #[must_use]
    pub fn find_disease(&self, lowered: &str, language: Language) -> Option<&DiseaseRecord> {
        self.diseases
            .iter()
            .find(|d| d.is_mentioned_in(lowered, language))
    }

    /// First crop, in table order, whose localized name the utterance contains
    #[must_use]
    pub fn find_crop(&self, lowered: &str, language: Language) -> Option<&CropProfile> {
        self.crops.iter().find(|c| c.is_mentioned_in(lowered, language))
    }

    /// Seasonal prevention tips followed by calendar advice
    #[must_use]
    pub fn seasonal_tips(&self, language: Language) -> impl Iterator<Item = &str> {
        self.prevention
            .seasonal
            .iter()
            .map(move |s| s.tip.get(language).as_str())
            .chain(self.seasons.iter().map(move |s| s.advice.get(language).as_str()))
    }

    /// Diseases affecting `crop` under any of its localized names
    #[must_use]
    pub fn diseases_affecting<'a>(&'a self, crop: &str) -> impl Iterator<Item = &'a DiseaseRecord> + 'a {
        let wanted = crop.trim().to_lowercase();
        self.diseases.iter().filter(move |d| {
            d.info.values().any(|info| {
                info.affected_crops
                    .iter()
                    .any(|c| c.to_lowercase() == wanted)
            })
        })
    }
}
