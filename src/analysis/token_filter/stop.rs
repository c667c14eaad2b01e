//! Stop filter implementation.
//!
//! Removes high-frequency, low-information words. Ships the standard
//! English corpus list and a curated Vietnamese list.
//!
//! # Examples
//!
//! ```
//! use lectern::analysis::token_filter::Filter;
//! use lectern::analysis::token_filter::stop::StopFilter;
//! use lectern::analysis::token::Token;
//!
//! let filter = StopFilter::english();
//! let tokens = vec![
//!     Token::new("the", 0),
//!     Token::new("quick", 1),
//!     Token::new("brown", 2)
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "quick");
//! ```

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Standard English stop word corpus.
///
/// Contracted forms ("don't", "isn't", ...) are omitted: punctuation is
/// blanked before tokenization, so only their fragments ("don", "t") can
/// ever reach this filter, and those fragments are listed.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how", "all",
    "any", "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn", "didn",
    "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn", "shan",
    "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Curated Vietnamese stop words (function words and particles).
const DEFAULT_VIETNAMESE_STOP_WORDS: &[&str] = &[
    "và", "của", "có", "được", "trong", "đã", "là", "lúc", "với", "theo", "tới", "về", "làm",
    "để", "từ", "những", "hay", "khi", "sau", "như", "trên", "vào", "phải", "bị", "cho", "đến",
    "nếu", "tại", "nhưng", "mà", "thì", "hoặc", "vẫn", "bởi", "này", "các", "nhiều", "thêm",
    "vừa", "cũng", "nên", "việc", "nói", "nhất", "đều", "cùng", "đang", "chỉ", "vì", "còn",
    "giữa", "thuộc", "quá", "sẽ", "không", "một", "người",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// Default Vietnamese stop words as a HashSet.
pub static DEFAULT_VIETNAMESE_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_VIETNAMESE_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A filter that removes stop words from the token stream.
///
/// Matching is on the whole token text. For Vietnamese this means a stop
/// syllable inside a segmented compound (`"người"` in `"người dùng"`) is
/// kept while the same syllable standing alone is removed.
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words to remove
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a stop filter with the English stop word corpus.
    pub fn english() -> Self {
        Self::with_stop_words(DEFAULT_ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a stop filter with the curated Vietnamese stop words.
    pub fn vietnamese() -> Self {
        Self::with_stop_words(DEFAULT_VIETNAMESE_STOP_WORDS_SET.clone())
    }

    /// Create a new stop filter with custom stop words.
    pub fn with_stop_words(stop_words: HashSet<String>) -> Self {
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Create a new stop filter from a list of stop words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words = words.into_iter().map(|s| s.into()).collect();
        Self::with_stop_words(stop_words)
    }

    /// Check if a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered_tokens: Vec<Token> = tokens
            .filter(|token| !self.is_stop_word(&token.text))
            .collect();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_filter() {
        let filter = StopFilter::from_words(vec!["the", "and", "or"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
            Token::new("and", 3),
            Token::new("test", 4),
        ];
        let token_stream = Box::new(tokens.into_iter());

        let result: Vec<Token> = filter.filter(token_stream).unwrap().collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "hello");
        assert_eq!(result[1].text, "world");
        assert_eq!(result[2].text, "test");
    }

    #[test]
    fn test_stop_filter_keeps_positions() {
        let filter = StopFilter::from_words(vec!["the", "and"]);
        let tokens = vec![
            Token::new("hello", 0),
            Token::new("the", 1),
            Token::new("world", 2),
        ];
        let token_stream = Box::new(tokens.into_iter());

        let result: Vec<Token> = filter.filter(token_stream).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].position, 0);
        assert_eq!(result[1].text, "world");
        assert_eq!(result[1].position, 2);
    }

    #[test]
    fn test_default_lists() {
        let english = StopFilter::english();
        assert!(english.is_stop_word("the"));
        assert!(english.is_stop_word("don"));
        assert!(!english.is_stop_word("algorithms"));

        let vietnamese = StopFilter::vietnamese();
        assert!(vietnamese.is_stop_word("và"));
        assert!(vietnamese.is_stop_word("người"));
        assert!(!vietnamese.is_stop_word("người dùng"));
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(StopFilter::english().name(), "stop");
    }
}
