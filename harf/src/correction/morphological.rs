use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{HarfError, Result};
use crate::morphology::{MorphologyAnalyzer, SpellSuggester};

use super::token::{tokenize, Token};

/// Analyzer-backed correction stage.
///
/// Recognized words are kept as-is. Unrecognized words are replaced by the
/// top suggestion, substituted inside the original token so punctuation
/// survives. Tokens are re-joined with single spaces.
#[derive(Clone)]
pub struct MorphologicalCorrector {
    analyzer: Arc<dyn MorphologyAnalyzer>,
    suggester: Option<Arc<dyn SpellSuggester>>,
}

impl MorphologicalCorrector {
    pub fn new(
        analyzer: Arc<dyn MorphologyAnalyzer>,
        suggester: Option<Arc<dyn SpellSuggester>>,
    ) -> Self {
        Self {
            analyzer,
            suggester,
        }
    }

    /// Never fails: if the pass aborts, the input comes back untouched.
    pub async fn correct(&self, text: &str) -> String {
        match self.try_correct(text).await {
            Ok(corrected) => corrected,
            Err(e) => {
                warn!(error = %e, "Morphological correction failed, returning original text");
                text.to_string()
            }
        }
    }

    /// Like [`correct`](Self::correct), but reports a pass-aborting engine
    /// failure instead of hiding it.
    pub async fn try_correct(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let mut corrected = Vec::new();
        for token in tokenize(text) {
            match self.correct_token(&token).await {
                Ok(word) => corrected.push(word),
                Err(e @ HarfError::MorphologyUnavailable(_)) => return Err(e),
                Err(e) => {
                    warn!(word = %token.clean, error = %e, "Spell check error");
                    corrected.push(token.original.to_string());
                }
            }
        }

        Ok(corrected.join(" "))
    }

    async fn correct_token(&self, token: &Token<'_>) -> Result<String> {
        if !token.has_letters() {
            return Ok(token.original.to_string());
        }

        let analyses = self.analyzer.analyze(&token.clean).await?;
        if !analyses.is_empty() {
            return Ok(token.original.to_string());
        }

        let Some(suggester) = &self.suggester else {
            return Ok(token.original.to_string());
        };

        let suggestions = suggester.suggest(&token.clean).await?;
        match suggestions.first() {
            Some(best) => {
                debug!(word = %token.clean, suggestion = %best, "Replacing unrecognized word");
                Ok(token.replace_clean(best))
            }
            None => Ok(token.original.to_string()),
        }
    }
}
