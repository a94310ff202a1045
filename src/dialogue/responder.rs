//! Response generation: one handler per intent
//!
//! Handlers only read the catalog. They return the answer text and the
//! context fragment for the next turn; recording the exchange is the
//! caller's job.

use super::intent::Intent;
use super::session::{ConversationContext, Topic};
use crate::knowledge::{
    Catalog, CropProfile, DiseaseRecord, Language, PhraseKey, TemplateName,
};
use std::fmt::Write;

/// Organic treatments listed per answer
const MAX_TREATMENTS: usize = 3;
/// General prevention tips listed per answer
const MAX_PREVENTION_TIPS: usize = 5;

/// Answer text plus the context to carry into the next turn
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub text: String,
    pub context: ConversationContext,
}

impl Response {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: ConversationContext::default(),
        }
    }

    fn with_context(text: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            text: text.into(),
            context,
        }
    }
}

#[must_use]
pub fn handle_intent(
    catalog: &Catalog,
    intent: Intent,
    utterance: &str,
    language: Language,
    context: &ConversationContext,
) -> Response {
    let responder = Responder { catalog, language };
    let book = catalog.phrasebook();

    match intent {
        Intent::Greeting => Response::text(book.template(TemplateName::Greeting, language)),
        Intent::DiseaseInquiry => responder.disease_inquiry(utterance),
        Intent::TreatmentRequest => responder.treatment_request(context),
        Intent::PreventionQuestion => responder.prevention_question(),
        Intent::CropInfo => responder.crop_info(utterance),
        Intent::Thanks => Response::text(book.template(TemplateName::ThankYou, language)),
        Intent::Goodbye => Response::text(book.phrase(PhraseKey::Farewell, language)),
        // Weather questions get the open-ended answer, like anything unmatched
        Intent::WeatherConcern | Intent::General => {
            Response::text(book.phrase(PhraseKey::GeneralHelp, language))
        }
    }
}

struct Responder<'a> {
    catalog: &'a Catalog,
    language: Language,
}

impl Responder<'_> {
    fn phrase(&self, key: PhraseKey) -> &str {
        self.catalog.phrasebook().phrase(key, self.language)
    }

    fn disease_inquiry(&self, utterance: &str) -> Response {
        let lowered = utterance.to_lowercase();
        match self.catalog.knowledge().find_disease(&lowered, self.language) {
            Some(disease) => Response::with_context(
                self.disease_block(disease),
                ConversationContext {
                    topic: Some(Topic::Disease),
                    disease: Some(disease.key.clone()),
                    confidence: None,
                },
            ),
            // No topic in the fragment: the caller still needs to clarify
            None => Response::text(self.catalog.phrasebook().render(
                TemplateName::NeedMoreInfo,
                self.language,
                &[("topic", self.phrase(PhraseKey::SymptomsTopic))],
            )),
        }
    }

    fn disease_block(&self, disease: &DiseaseRecord) -> String {
        let info = disease.info.get(self.language);
        format!(
            "📋 {}:\n\n🔍 {}: {}\n⚠️ {}: {}\n🌱 {}: {}",
            info.name,
            self.phrase(PhraseKey::SymptomsLabel),
            info.symptoms.join(", "),
            self.phrase(PhraseKey::CauseLabel),
            info.causes,
            self.phrase(PhraseKey::AffectedCropsLabel),
            info.affected_crops.join(", "),
        )
    }

    fn treatment_request(&self, context: &ConversationContext) -> Response {
        let knowledge = self.catalog.knowledge();
        let book = self.catalog.phrasebook();
        let disease = context.disease.as_deref().and_then(|key| knowledge.disease(key));

        let mut text = String::new();
        if let (Some(disease), Some(confidence)) = (disease, context.confidence) {
            let name = disease.info.get(self.language).name.as_str();
            let percent = confidence_percent(confidence);
            text.push_str(&book.render(
                TemplateName::DiseaseDetected,
                self.language,
                &[("disease", name), ("confidence", percent.as_str())],
            ));
            text.push_str("\n\n");
        }

        text.push_str(&book.render(
            TemplateName::TreatmentRecommendation,
            self.language,
            &[("treatment", "")],
        ));
        let _ = writeln!(text, "\n\n🌿 {}:", self.phrase(PhraseKey::OrganicTreatmentsLabel));

        let preferred = disease.map(|d| d.treatments.as_slice()).unwrap_or_default();
        for treatment in knowledge.treatments.organic_for(preferred, MAX_TREATMENTS) {
            let info = treatment.info.get(self.language);
            let _ = writeln!(text, "• {} - {}", info.name, info.description);
        }

        Response::with_context(
            text,
            ConversationContext {
                topic: Some(Topic::Treatment),
                disease: context.disease.clone(),
                confidence: context.confidence,
            },
        )
    }

    fn prevention_question(&self) -> Response {
        let book = self.catalog.phrasebook();
        let tips = self.catalog.knowledge().prevention.general.get(self.language);

        let mut text = book.template(TemplateName::PreventionAdvice, self.language).to_string();
        text.push_str("\n\n");
        for tip in tips.iter().take(MAX_PREVENTION_TIPS) {
            let _ = writeln!(text, "✓ {tip}");
        }

        Response::with_context(text, ConversationContext::with_topic(Topic::Prevention))
    }

    fn crop_info(&self, utterance: &str) -> Response {
        let lowered = utterance.to_lowercase();
        let text = match self.catalog.knowledge().find_crop(&lowered, self.language) {
            Some(crop) => self.crop_block(crop),
            None => self.phrase(PhraseKey::CropNotFound).to_string(),
        };
        Response::with_context(text, ConversationContext::with_topic(Topic::Crop))
    }

    fn crop_block(&self, crop: &CropProfile) -> String {
        let info = crop.info.get(self.language);
        format!(
            "🌱 {}:\n📅 {}: {}\n💧 {}: {}",
            info.name,
            self.phrase(PhraseKey::CycleLabel),
            info.cycle,
            self.phrase(PhraseKey::WateringLabel),
            info.water,
        )
    }
}

/// Render a classifier confidence as a whole percentage. Values above 1 are
/// taken to be percentages already.
fn confidence_percent(confidence: f32) -> String {
    let percent = if confidence <= 1.0 {
        confidence * 100.0
    } else {
        confidence
    };
    format!("{:.0}", percent.clamp(0.0, 100.0))
}
