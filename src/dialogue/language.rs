//! Keyword-vote language identification

use crate::knowledge::{CatalogError, CatalogResult, Language};
use serde::Deserialize;

/// Marker words for the languages that must be recognized positively.
/// French has no list: it is what remains when neither side wins.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkerLists {
    pub wo: Vec<String>,
    pub pu: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LanguageDetector {
    wolof: Vec<String>,
    pulaar: Vec<String>,
}

impl LanguageDetector {
    /// # Errors
    ///
    /// Fails when either marker list is empty or holds a blank marker.
    pub fn new(markers: MarkerLists) -> CatalogResult<Self> {
        let wolof = normalize("wo", markers.wo)?;
        let pulaar = normalize("pu", markers.pu)?;
        Ok(Self { wolof, pulaar })
    }

    /// Number of (Wolof, Pulaar) markers found anywhere in `text`.
    /// Markers match as substrings, also inside longer words.
    #[must_use]
    pub fn scores(&self, text: &str) -> (usize, usize) {
        let lowered = text.to_lowercase();
        (count(&self.wolof, &lowered), count(&self.pulaar, &lowered))
    }

    /// Strict majority of markers decides; ties and no evidence mean French.
    #[must_use]
    pub fn detect(&self, text: &str) -> Language {
        let (wolof, pulaar) = self.scores(text);
        if wolof > pulaar && wolof > 0 {
            Language::Wolof
        } else if pulaar > wolof && pulaar > 0 {
            Language::Pulaar
        } else {
            Language::French
        }
    }
}

fn normalize(code: &str, markers: Vec<String>) -> CatalogResult<Vec<String>> {
    if markers.is_empty() {
        return Err(CatalogError::invalid(format!("no language markers for {code}")));
    }
    markers
        .into_iter()
        .map(|marker| {
            let marker = marker.trim().to_lowercase();
            if marker.is_empty() {
                Err(CatalogError::invalid(format!("empty language marker for {code}")))
            } else {
                Ok(marker)
            }
        })
        .collect()
}

fn count(markers: &[String], lowered: &str) -> usize {
    markers.iter().filter(|m| lowered.contains(m.as_str())).count()
}
