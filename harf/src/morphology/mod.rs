//! Morphology engine
//!
//! The primary correction stage talks to its engine through two traits:
//!
//! - [`MorphologyAnalyzer`]: is this word a recognized Turkish form?
//! - [`SpellSuggester`]: ranked replacement candidates for a word.
//!
//! The concrete engine is chosen once at startup from `MorphologyConfig`:
//! - `local`: [`LexiconAnalyzer`] over a Zemberek dictionary archive or word list
//! - `api`: [`RemoteMorphologyClient`] against a morphology sidecar
//! - `none`: no engine; every request uses the static fallback table
//!
//! Errors of kind `MorphologyUnavailable` mean the backend cannot serve any
//! word and abort the whole correction pass. Any other error only affects the
//! word being processed.

mod api;
mod cache;
mod lexicon;
mod provider;
mod turkish;

pub use api::RemoteMorphologyClient;
pub use cache::{CachedSuggester, SuggestionCache};
pub use lexicon::{Lexicon, LexiconAnalyzer};
pub use provider::MorphologyProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One recognized reading of a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAnalysis {
    pub lemma: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[async_trait]
pub trait MorphologyAnalyzer: Send + Sync {
    /// All readings of `word`. Empty when the word is not recognized.
    async fn analyze(&self, word: &str) -> Result<Vec<WordAnalysis>>;
}

#[async_trait]
pub trait SpellSuggester: Send + Sync {
    /// Replacement candidates for `word`, best first.
    async fn suggest(&self, word: &str) -> Result<Vec<String>>;
}
