//! Token types produced by tokenizers and consumed by filters.

use serde::{Deserialize, Serialize};

/// A single unit of text produced by the analysis pipeline.
///
/// For Vietnamese, one token may span several syllables (a segmented
/// compound such as `"bài giảng"`), so `text` can contain inner spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text.
    pub text: String,

    /// Position of the token in the stream (0-based).
    pub position: usize,

    /// Byte offset where the token starts in the analyzed text.
    pub start_offset: usize,

    /// Byte offset where the token ends in the analyzed text.
    pub end_offset: usize,
}

impl Token {
    /// Create a new token without offset information.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
        }
    }

    /// Create a new token with explicit offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
        }
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A stream of tokens, as produced by tokenizers and transformed by filters.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
