//! Strip filter implementation.
//!
//! Removes every character matching a pattern from inside each token. The
//! default pattern `[^\w\s]` deletes punctuation and symbols, including
//! token-internal ones such as apostrophes (`don't` becomes `dont`).

use std::sync::Arc;

use regex::Regex;

use super::Filter;
use crate::analysis::token::TokenStream;
use crate::error::{Result, SpathaError};

/// Default pattern: anything that is neither a word character nor whitespace.
pub const NON_WORD_PATTERN: &str = r"[^\w\s]";

/// A filter that deletes all pattern matches from token text.
///
/// Tokens that become empty are marked as stopped.
#[derive(Clone, Debug)]
pub struct StripFilter {
    pattern: Arc<Regex>,
}

impl StripFilter {
    /// Create a new strip filter removing non-word characters.
    pub fn new() -> Result<Self> {
        Self::with_pattern(NON_WORD_PATTERN)
    }

    /// Create a strip filter removing a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| SpathaError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(StripFilter {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for StripFilter {
    fn default() -> Self {
        Self::new().expect("Default strip pattern should be valid")
    }
}

impl Filter for StripFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let pattern = Arc::clone(&self.pattern);
        let filtered_tokens = tokens
            .map(|token| {
                if token.is_stopped() {
                    return token;
                }
                let stripped = pattern.replace_all(&token.text, "").into_owned();
                if stripped.is_empty() {
                    token.with_text(stripped).stop()
                } else {
                    token.with_text(stripped)
                }
            })
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "strip"
    }
}
