//! Supported document languages.
//!
//! Two code schemes exist and are kept apart on purpose: the serving path
//! speaks ISO-style short codes (`"en"`, `"vi"`) and rejects anything else,
//! while training data labels rows with full names (`"english"`,
//! `"vietnamese"`) and falls back to English for unknown labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};

/// A language with its own tokenizer and stop word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Vietnamese,
}

impl Language {
    /// Parse a serving-side language code. Only `"en"` and `"vi"` are accepted.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "en" => Ok(Language::English),
            "vi" => Ok(Language::Vietnamese),
            other => Err(LecternError::unsupported_language(format!(
                "'{other}' (use 'en' for English or 'vi' for Vietnamese)"
            ))),
        }
    }

    /// Parse a training-data language label.
    ///
    /// Accepts `"english"` / `"vietnamese"` (and the short codes), case
    /// insensitively. Any other label defaults to English and is logged.
    pub fn from_training_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "english" | "en" => Language::English,
            "vietnamese" | "vi" => Language::Vietnamese,
            other => {
                log::warn!("Unknown language label '{other}', defaulting to english");
                Language::English
            }
        }
    }

    /// Short code used by the serving path.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Vietnamese => "vi",
        }
    }

    /// Full label used by training data.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Vietnamese => "vietnamese",
        }
    }
}

impl FromStr for Language {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_code(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_is_strict() {
        assert_eq!(Language::from_code("en").unwrap(), Language::English);
        assert_eq!(Language::from_code("vi").unwrap(), Language::Vietnamese);

        for code in ["english", "EN", "fr", ""] {
            match Language::from_code(code) {
                Err(LecternError::UnsupportedLanguage(_)) => {}
                other => panic!("expected UnsupportedLanguage for {code:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_training_label_is_permissive() {
        assert_eq!(Language::from_training_label("english"), Language::English);
        assert_eq!(Language::from_training_label(" Vietnamese "), Language::Vietnamese);
        assert_eq!(Language::from_training_label("vi"), Language::Vietnamese);
        assert_eq!(Language::from_training_label("french"), Language::English);
    }

    #[test]
    fn test_codes_and_labels() {
        assert_eq!(Language::Vietnamese.code(), "vi");
        assert_eq!(Language::Vietnamese.label(), "vietnamese");
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!(Language::English.to_string(), "en");
    }
}
