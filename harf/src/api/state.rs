use std::sync::Arc;

use crate::config::Config;
use crate::correction::CorrectionPipeline;
use crate::error::Result;
use crate::morphology::MorphologyProvider;
use crate::ocr::OcrProvider;

/// Long-lived service context, built once at startup and shared read-only
/// by every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrProvider,
    pub morphology: MorphologyProvider,
    pub pipeline: CorrectionPipeline,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider, morphology: MorphologyProvider) -> Result<Self> {
        let pipeline = CorrectionPipeline::new(&morphology)?;

        Ok(Self {
            config: Arc::new(config),
            ocr,
            morphology,
            pipeline,
        })
    }

    /// Builds every provider from the configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let ocr = OcrProvider::new(&config.ocr);
        let morphology = MorphologyProvider::new(&config.morphology);
        Self::new(config, ocr, morphology)
    }
}
