//! Property-based tests for the dialogue engine
//!
//! These tests verify the detection and memory invariants across arbitrary
//! inputs, using the bundled catalog.

use super::*;
use crate::knowledge::test_catalog;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Wolof markers that contain no Pulaar marker (and vice versa below)
const WOLOF_SAMPLE: &[&str] = &["nanga", "def", "lan", "waaw", "dëgg", "ñaata"];
const PULAAR_SAMPLE: &[&str] = &["hol", "kam", "ɗum", "naamne", "ɓe"];

/// One trigger per intent, none of which contains another intent's trigger
const INTENT_SAMPLE: &[(Intent, &str)] = &[
    (Intent::Greeting, "bonjour"),
    (Intent::DiseaseInquiry, "maladie"),
    (Intent::TreatmentRequest, "traitement"),
    (Intent::PreventionQuestion, "prévenir"),
    (Intent::CropInfo, "tomate"),
    (Intent::WeatherConcern, "pluie"),
    (Intent::Thanks, "merci"),
    (Intent::Goodbye, "au revoir"),
];

fn priority_rank(intent: Intent) -> usize {
    Intent::PRIORITY
        .iter()
        .position(|i| *i == intent)
        .unwrap_or(Intent::PRIORITY.len())
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Text built from letters absent from every marker word
fn arb_markerless_text() -> impl Strategy<Value = String> {
    "[bcfjpqrstuvxyzBCFJPQRSTUVXYZ0-9 ,.!?']{0,60}"
}

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![
        Just(Language::French),
        Just(Language::Wolof),
        Just(Language::Pulaar),
    ]
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        Just(Intent::Greeting),
        Just(Intent::DiseaseInquiry),
        Just(Intent::TreatmentRequest),
        Just(Intent::PreventionQuestion),
        Just(Intent::CropInfo),
        Just(Intent::WeatherConcern),
        Just(Intent::Thanks),
        Just(Intent::Goodbye),
        Just(Intent::General),
    ]
}

/// (wolof markers, pulaar markers) with strictly more Wolof than Pulaar
fn arb_wolof_majority() -> impl Strategy<Value = (Vec<&'static str>, Vec<&'static str>)> {
    (1..=WOLOF_SAMPLE.len()).prop_flat_map(|wolof_count| {
        let max_pulaar = (wolof_count - 1).min(PULAAR_SAMPLE.len());
        (
            proptest::sample::subsequence(WOLOF_SAMPLE.to_vec(), wolof_count),
            proptest::sample::subsequence(PULAAR_SAMPLE.to_vec(), 0..=max_pulaar),
        )
    })
}

/// (pulaar markers, wolof markers) with strictly more Pulaar than Wolof
fn arb_pulaar_majority() -> impl Strategy<Value = (Vec<&'static str>, Vec<&'static str>)> {
    (1..=PULAAR_SAMPLE.len()).prop_flat_map(|pulaar_count| {
        let max_wolof = (pulaar_count - 1).min(WOLOF_SAMPLE.len());
        (
            proptest::sample::subsequence(PULAAR_SAMPLE.to_vec(), pulaar_count),
            proptest::sample::subsequence(WOLOF_SAMPLE.to_vec(), 0..=max_wolof),
        )
    })
}

fn arb_utterance() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ,.?!']{0,40}",
        proptest::sample::select(vec![
            "Bonjour",
            "Merci pour votre aide",
            "Comment traiter le mildiou?",
            "Nanga def? Sama tomate yi am na tàkk",
            "Hol ko mi waawi wallude e albasal am?",
            "Au revoir",
            "Quelle maladie a des taches jaunes sur les feuilles?",
        ])
        .prop_map(String::from),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_no_markers_means_french(text in arb_markerless_text()) {
        let catalog = test_catalog();
        prop_assert_eq!(catalog.languages().detect(&text), Language::French);
    }

    #[test]
    fn prop_wolof_majority_detected(
        (wolof, pulaar) in arb_wolof_majority(),
        filler in arb_markerless_text(),
    ) {
        let catalog = test_catalog();
        let text = format!("{} {filler} {}", wolof.join(" "), pulaar.join(" "));
        prop_assert_eq!(catalog.languages().detect(&text), Language::Wolof);
    }

    #[test]
    fn prop_pulaar_majority_detected(
        (pulaar, wolof) in arb_pulaar_majority(),
        filler in arb_markerless_text(),
    ) {
        let catalog = test_catalog();
        let text = format!("{} {filler} {}", wolof.join(" "), pulaar.join(" "));
        prop_assert_eq!(catalog.languages().detect(&text), Language::Pulaar);
    }

    #[test]
    fn prop_earliest_priority_intent_wins(
        picked in proptest::sample::subsequence(INTENT_SAMPLE.to_vec(), 1..=INTENT_SAMPLE.len())
            .prop_shuffle()
    ) {
        let catalog = test_catalog();
        let text = picked.iter().map(|(_, word)| *word).collect::<Vec<_>>().join(" ");
        let expected = picked
            .iter()
            .map(|(intent, _)| *intent)
            .min_by_key(|intent| priority_rank(*intent))
            .unwrap();

        prop_assert_eq!(catalog.intents().detect(&text), expected);
    }

    #[test]
    fn prop_classification_is_deterministic(text in arb_utterance()) {
        let catalog = test_catalog();
        prop_assert_eq!(catalog.intents().detect(&text), catalog.intents().detect(&text));
        prop_assert_eq!(catalog.languages().detect(&text), catalog.languages().detect(&text));
    }

    #[test]
    fn prop_suggestions_never_empty(
        intent in arb_intent(),
        language in arb_language(),
        raw_name in "[a-z_]{0,20}",
    ) {
        let catalog = test_catalog();
        let table = catalog.phrasebook().suggestions();

        let list = table.lookup(intent, language);
        prop_assert!(!list.is_empty());
        prop_assert!(list.len() <= MAX_SUGGESTIONS);

        let by_name = table.lookup(Intent::from_name(&raw_name), language);
        prop_assert!(!by_name.is_empty());
    }

    #[test]
    fn prop_every_turn_appends_two_entries(
        messages in proptest::collection::vec(arb_utterance(), 0..8)
    ) {
        let mut bot = Chatbot::new(test_catalog());
        for message in &messages {
            let reply = bot.generate_response(message, None);
            prop_assert!(!reply.response.is_empty());
            prop_assert!(!reply.suggestions.is_empty());
        }

        let turns = bot.session().turns();
        prop_assert_eq!(turns.len(), messages.len() * 2);
        for (pair, message) in turns.chunks(2).zip(&messages) {
            prop_assert_eq!(pair[0].role, Role::User);
            prop_assert_eq!(&pair[0].text, message);
            prop_assert_eq!(pair[1].role, Role::Agent);
        }
    }

    #[test]
    fn prop_reset_always_restores_initial_state(
        messages in proptest::collection::vec(arb_utterance(), 0..6)
    ) {
        let mut bot = Chatbot::new(test_catalog());
        for message in &messages {
            bot.generate_response(message, None);
        }
        bot.reset();

        prop_assert!(bot.session().turns().is_empty());
        prop_assert!(bot.session().context().is_empty());
        prop_assert_eq!(bot.session().language(), Language::French);
    }
}
