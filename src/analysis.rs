//! Text analysis module for Spatha.
//!
//! Comments pass through an analysis pipeline before any counting happens:
//! a tokenizer splits raw text into tokens and a chain of filters normalizes
//! them. Training, prediction and the contributing-words explanation all go
//! through the same [`CommentAnalyzer`](analyzer::comment::CommentAnalyzer),
//! so a word is always the same token everywhere.
//!
//! # Examples
//!
//! ```
//! use spatha::analysis::tokenize;
//!
//! let tokens = tokenize("Don't SHOUT, please!").unwrap();
//! assert_eq!(tokens, vec!["dont", "shout", "please"]);
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

use std::sync::Arc;

use lazy_static::lazy_static;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::comment::CommentAnalyzer;
use crate::error::Result;

lazy_static! {
    static ref DEFAULT_ANALYZER: Arc<dyn Analyzer> = Arc::new(CommentAnalyzer::default());
}

/// Shared instance of the default comment analyzer.
pub fn default_analyzer() -> Arc<dyn Analyzer> {
    Arc::clone(&DEFAULT_ANALYZER)
}

/// Tokenize `text` with the default comment analyzer.
pub fn tokenize(text: &str) -> Result<Vec<String>> {
    analyze_to_strings(DEFAULT_ANALYZER.as_ref(), text)
}

/// Run `analyzer` over `text` and collect the token texts.
pub fn analyze_to_strings(analyzer: &dyn Analyzer, text: &str) -> Result<Vec<String>> {
    Ok(analyzer.analyze(text)?.map(|token| token.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips() {
        let tokens = tokenize("Free MONEY now!!! Call 555-0100").unwrap();
        assert_eq!(tokens, vec!["free", "money", "now", "call", "5550100"]);
    }

    #[test]
    fn test_tokenize_drops_punctuation_only_pieces() {
        let tokens = tokenize("wait ... what ?!").unwrap();
        assert_eq!(tokens, vec!["wait", "what"]);
    }

    #[test]
    fn test_tokenize_empty_text() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t\n ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_is_idempotent_on_word_text() {
        let text = "Hello   World\tthis is_a TEST 42";
        let first = tokenize(text).unwrap();
        let second = tokenize(&first.join(" ")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tokenize_keeps_underscores_and_unicode_letters() {
        let tokens = tokenize("snake_case Čaute, ÚŽASNÉ!").unwrap();
        assert_eq!(tokens, vec!["snake_case", "čaute", "úžasné"]);
    }
}
