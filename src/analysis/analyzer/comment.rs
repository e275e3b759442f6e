//! The analyzer used for comment classification.
//!
//! Lower-cases the text, removes every character that is neither a word
//! character nor whitespace and splits on whitespace runs. There is no
//! stemming and no stop-word removal.

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::remove_empty::RemoveEmptyFilter;
use crate::analysis::token_filter::strip::StripFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::Result;

/// Whitespace tokenizer followed by lowercase, strip and remove-empty filters.
///
/// Splitting before stripping gives the same tokens as stripping the whole
/// text first, because the strip pattern never removes whitespace.
#[derive(Clone, Debug)]
pub struct CommentAnalyzer {
    inner: PipelineAnalyzer,
}

impl CommentAnalyzer {
    /// Create a new comment analyzer.
    pub fn new() -> Result<Self> {
        let inner = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StripFilter::new()?))
            .add_filter(Arc::new(RemoveEmptyFilter::new()))
            .with_name("comment");

        Ok(Self { inner })
    }
}

impl Default for CommentAnalyzer {
    fn default() -> Self {
        Self::new().expect("Comment analyzer should be constructible")
    }
}

impl Analyzer for CommentAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "comment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(analyzer: &CommentAnalyzer, text: &str) -> Vec<String> {
        analyzer.analyze(text).unwrap().map(|t| t.text).collect()
    }

    #[test]
    fn test_comment_analyzer() {
        let analyzer = CommentAnalyzer::new().unwrap();
        assert_eq!(
            texts(&analyzer, "You're SO dumb!!! lol :)"),
            vec!["youre", "so", "dumb", "lol"]
        );
    }

    #[test]
    fn test_comment_analyzer_keeps_digits() {
        let analyzer = CommentAnalyzer::new().unwrap();
        assert_eq!(texts(&analyzer, "top10 #1"), vec!["top10", "1"]);
    }

    #[test]
    fn test_analyzer_name() {
        assert_eq!(CommentAnalyzer::new().unwrap().name(), "comment");
    }
}
