//! Text correction pipeline
//!
//! Two stages, tried in order:
//!
//! 1. [`MorphologicalCorrector`]: per-token lookup against the morphology
//!    engine, replacing unrecognized words with the engine's top suggestion.
//! 2. [`BasicCorrector`]: a fixed substitution table for common OCR
//!    artifacts, used when the engine is missing or the first pass aborts.
//!
//! The outcome records which stage produced the text.

mod basic;
mod morphological;
mod token;

pub use basic::BasicCorrector;
pub use morphological::MorphologicalCorrector;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::morphology::MorphologyProvider;

/// Which stage produced a corrected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum CorrectionMethod {
    /// The morphology engine pass completed.
    #[serde(rename = "zemberek")]
    Zemberek,
    /// The static substitution table ran.
    #[serde(rename = "basic")]
    Basic,
}

impl CorrectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zemberek => "zemberek",
            Self::Basic => "basic",
        }
    }
}

/// Corrected and raw text, plus the stage that ran.
///
/// This is also the `POST /ocr` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CorrectionOutcome {
    pub text: String,
    pub raw_text: String,
    pub correction_method: CorrectionMethod,
}

#[derive(Clone)]
pub struct CorrectionPipeline {
    primary: Option<MorphologicalCorrector>,
    fallback: Arc<BasicCorrector>,
}

impl CorrectionPipeline {
    pub fn new(morphology: &MorphologyProvider) -> Result<Self> {
        let primary = morphology.analyzer().map(|analyzer| {
            MorphologicalCorrector::new(analyzer.clone(), morphology.suggester().cloned())
        });

        Ok(Self {
            primary,
            fallback: Arc::new(BasicCorrector::new()?),
        })
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub async fn run(&self, raw_text: String) -> CorrectionOutcome {
        if let Some(primary) = &self.primary {
            match primary.try_correct(&raw_text).await {
                Ok(text) => {
                    return CorrectionOutcome {
                        text,
                        raw_text,
                        correction_method: CorrectionMethod::Zemberek,
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Morphological correction failed, using basic correction");
                }
            }
        }

        CorrectionOutcome {
            text: self.fallback.correct(&raw_text),
            raw_text,
            correction_method: CorrectionMethod::Basic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarfError;
    use crate::morphology::{MorphologyAnalyzer, SpellSuggester, WordAnalysis};
    use async_trait::async_trait;

    struct Dictionary(&'static [&'static str]);

    #[async_trait]
    impl MorphologyAnalyzer for Dictionary {
        async fn analyze(&self, word: &str) -> Result<Vec<WordAnalysis>> {
            Ok(self
                .0
                .iter()
                .filter(|w| **w == word)
                .map(|w| WordAnalysis {
                    lemma: w.to_string(),
                    attributes: vec![],
                })
                .collect())
        }
    }

    #[async_trait]
    impl SpellSuggester for Dictionary {
        async fn suggest(&self, word: &str) -> Result<Vec<String>> {
            Ok(match word {
                "kitab" => vec!["kitap".to_string()],
                _ => vec![],
            })
        }
    }

    struct Offline;

    #[async_trait]
    impl MorphologyAnalyzer for Offline {
        async fn analyze(&self, _word: &str) -> Result<Vec<WordAnalysis>> {
            Err(HarfError::MorphologyUnavailable("engine down".into()))
        }
    }

    fn pipeline(provider: MorphologyProvider) -> CorrectionPipeline {
        CorrectionPipeline::new(&provider).unwrap()
    }

    #[test]
    fn method_serializes_to_wire_tags() {
        assert_eq!(
            serde_json::to_value(CorrectionMethod::Zemberek).unwrap(),
            "zemberek"
        );
        assert_eq!(serde_json::to_value(CorrectionMethod::Basic).unwrap(), "basic");
        assert_eq!(CorrectionMethod::Basic.as_str(), "basic");
    }

    #[tokio::test]
    async fn uses_engine_when_available() {
        let engine = Arc::new(Dictionary(&["bir"]));
        let provider = MorphologyProvider::from_parts(Some(engine.clone()), Some(engine));
        let outcome = pipeline(provider).run("bir  kitab".to_string()).await;

        assert_eq!(outcome.text, "bir kitap");
        assert_eq!(outcome.raw_text, "bir  kitab");
        assert_eq!(outcome.correction_method, CorrectionMethod::Zemberek);
    }

    #[tokio::test]
    async fn analyzer_without_suggester_still_reports_zemberek() {
        let engine = Arc::new(Dictionary(&[]));
        let provider = MorphologyProvider::from_parts(Some(engine), None);
        let outcome = pipeline(provider).run("kitab".to_string()).await;

        assert_eq!(outcome.text, "kitab");
        assert_eq!(outcome.correction_method, CorrectionMethod::Zemberek);
    }

    #[tokio::test]
    async fn missing_engine_always_reports_basic() {
        let p = pipeline(MorphologyProvider::disabled());
        assert!(!p.has_primary());

        for raw in ["", "   ", "Kalem VE defter ", "yarn bitti"] {
            let outcome = p.run(raw.to_string()).await;
            assert_eq!(outcome.correction_method, CorrectionMethod::Basic);
        }

        let outcome = p.run(" Kalem VE defter ".to_string()).await;
        assert_eq!(outcome.text, "Kalem ve defter");
        assert_eq!(outcome.raw_text, " Kalem VE defter ");
    }

    #[tokio::test]
    async fn aborted_pass_falls_back_to_basic() {
        let provider = MorphologyProvider::from_parts(Some(Arc::new(Offline)), None);
        let outcome = pipeline(provider).run("yarn VE".to_string()).await;

        assert_eq!(outcome.text, "yam ve");
        assert_eq!(outcome.correction_method, CorrectionMethod::Basic);
    }

    #[test]
    fn outcome_serializes_as_ocr_response() {
        let outcome = CorrectionOutcome {
            text: "a".into(),
            raw_text: "b".into(),
            correction_method: CorrectionMethod::Basic,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["text"], "a");
        assert_eq!(json["raw_text"], "b");
        assert_eq!(json["correction_method"], "basic");
    }
}
