use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::vietnamese::VietnameseTokenizer;
use crate::error::Result;

pub struct VietnameseAnalyzer {
    inner: PipelineAnalyzer,
}

impl VietnameseAnalyzer {
    pub fn new() -> Result<Self> {
        Self::with_tokenizer(VietnameseTokenizer::new())
    }

    /// Build the analyzer around a tokenizer with a custom compound dictionary.
    pub fn with_tokenizer(tokenizer: VietnameseTokenizer) -> Result<Self> {
        let analyzer = PipelineAnalyzer::new(Arc::new(tokenizer))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::strip_punctuation()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::vietnamese()))
            .with_name("vietnamese".to_string());

        Ok(Self { inner: analyzer })
    }
}

impl Analyzer for VietnameseAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "vietnamese"
    }
}

impl Debug for VietnameseAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VietnameseAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
