//! Pipeline analyzer that combines char filters, a tokenizer and token filters.
//!
//! Processing order:
//! 1. Char filters normalize the raw text
//! 2. The tokenizer splits text into tokens
//! 3. Token filters run in the order they were added
//!
//! # Examples
//!
//! ```
//! use lectern::analysis::analyzer::analyzer::Analyzer;
//! use lectern::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use lectern::analysis::tokenizer::regex::RegexTokenizer;
//! use lectern::analysis::token_filter::lowercase::LowercaseFilter;
//! use lectern::analysis::token_filter::stop::StopFilter;
//! use std::sync::Arc;
//!
//! let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(tokenizer)
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer".to_string());
//!
//! let tokens: Vec<_> = analyzer.analyze("Hello THE world AND test").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "hello");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::char_filter::CharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    char_filters: Vec<Arc<dyn CharFilter>>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            char_filters: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Add a char filter to the pipeline.
    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Get the configured name of this pipeline.
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut filtered_text = text.to_string();
        for char_filter in &self.char_filters {
            filtered_text = char_filter.filter(&filtered_text);
        }

        let mut tokens = self.tokenizer.tokenize(&filtered_text)?;

        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field(
                "char_filters",
                &self.char_filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
    use crate::analysis::token_filter::lowercase::LowercaseFilter;
    use crate::analysis::tokenizer::regex::RegexTokenizer;

    #[test]
    fn test_char_filters_run_before_tokenizer() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
            .add_char_filter(Arc::new(
                PatternReplaceCharFilter::new("-", "").unwrap(),
            ))
            .add_filter(Arc::new(LowercaseFilter::new()));

        let tokens: Vec<String> = analyzer
            .analyze("Merge-Sort wins")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(tokens, vec!["mergesort", "wins"]);
    }

    #[test]
    fn test_pipeline_name() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()));
        assert_eq!(analyzer.pipeline_name(), "pipeline_regex");

        let analyzer = analyzer.with_name("custom");
        assert_eq!(analyzer.pipeline_name(), "custom");
        assert_eq!(analyzer.name(), "pipeline");
    }
}
