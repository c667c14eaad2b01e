//! Regex replacement char filter.

use regex::Regex;

use super::CharFilter;
use crate::error::{LecternError, Result};

/// Pattern matching every character that is neither a word character nor
/// whitespace. Word characters are Unicode-aware, so Vietnamese letters with
/// diacritics are kept.
pub const NON_WORD_PATTERN: &str = r"[^\w\s]";

/// A char filter that replaces characters matching a regex pattern.
#[derive(Debug, Clone)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| LecternError::analysis(format!("Invalid regex pattern: {e}")))?,
            replacement: replacement.to_string(),
        })
    }

    /// Filter that turns every punctuation or symbol character into a space.
    pub fn strip_punctuation() -> Result<Self> {
        Self::new(NON_WORD_PATTERN, " ")
    }

    /// Get the pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_punctuation() {
        let filter = PatternReplaceCharFilter::strip_punctuation().unwrap();
        assert_eq!(filter.filter("hello, world!"), "hello  world ");
        assert_eq!(filter.filter("report.pdf"), "report pdf");
    }

    #[test]
    fn test_keeps_vietnamese_letters() {
        let filter = PatternReplaceCharFilter::strip_punctuation().unwrap();
        assert_eq!(filter.filter("Bài giảng: thuật toán."), "Bài giảng  thuật toán ");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternReplaceCharFilter::new("[", " ").is_err());
    }
}
