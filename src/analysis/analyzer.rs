//! Analyzers combine a tokenizer and a chain of filters.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Classifier
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - custom tokenizer + filter chains
//! - [`CommentAnalyzer`](comment::CommentAnalyzer) - the fixed pipeline used for comments

use crate::analysis::token::TokenStream;
use crate::error::Result;

pub mod comment;
pub mod pipeline;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by every
/// member of an ensemble.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and logging).
    fn name(&self) -> &'static str;
}
