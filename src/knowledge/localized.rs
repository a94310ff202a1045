//! Language codes and per-language values with French fallback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported conversation languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "wo")]
    Wolof,
    #[serde(rename = "pu")]
    Pulaar,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::French, Language::Wolof, Language::Pulaar];

    /// Short wire code (`fr`, `wo`, `pu`)
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Wolof => "wo",
            Language::Pulaar => "pu",
        }
    }

    /// Human-readable name, in French like the rest of the service banner
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Language::French => "Français",
            Language::Wolof => "Wolof",
            Language::Pulaar => "Pulaar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language code: {}", self.0)
    }
}

impl std::error::Error for UnknownLanguage {}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "french" | "français" | "francais" => Ok(Language::French),
            "wo" | "wolof" => Ok(Language::Wolof),
            "pu" | "ff" | "pulaar" => Ok(Language::Pulaar),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// A value available in French and optionally in Wolof and Pulaar.
///
/// The French entry is mandatory, so a record without it fails to
/// deserialize. Lookups for a missing translation return the French value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Localized<T> {
    fr: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    wo: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pu: Option<T>,
}

impl<T> Localized<T> {
    #[must_use]
    pub fn new(fr: T) -> Self {
        Self {
            fr,
            wo: None,
            pu: None,
        }
    }

    #[must_use]
    pub fn with(mut self, language: Language, value: T) -> Self {
        match language {
            Language::French => self.fr = value,
            Language::Wolof => self.wo = Some(value),
            Language::Pulaar => self.pu = Some(value),
        }
        self
    }

    /// Value for `language`, or the French value when no translation exists
    #[must_use]
    pub fn get(&self, language: Language) -> &T {
        self.translation(language).unwrap_or(&self.fr)
    }

    /// Value for `language` only if it was actually translated
    #[must_use]
    pub fn translation(&self, language: Language) -> Option<&T> {
        match language {
            Language::French => Some(&self.fr),
            Language::Wolof => self.wo.as_ref(),
            Language::Pulaar => self.pu.as_ref(),
        }
    }

    /// Every value present, French first
    #[must_use]
    pub fn values(&self) -> impl Iterator<Item = &T> {
        std::iter::once(&self.fr)
            .chain(self.wo.as_ref())
            .chain(self.pu.as_ref())
    }
}
