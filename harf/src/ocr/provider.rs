use std::time::Duration;

use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{HarfError, Result};

use super::api::{GeminiVisionClient, OpenAiVisionClient};

#[derive(Clone)]
enum OcrApiClient {
    Gemini(GeminiVisionClient),
    OpenAi(OpenAiVisionClient),
}

impl OcrApiClient {
    async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        match self {
            OcrApiClient::Gemini(c) => c.ocr(image_bytes).await,
            OcrApiClient::OpenAi(c) => c.ocr(image_bytes).await,
        }
    }
}

#[derive(Clone)]
enum OcrBackend {
    Api { client: OcrApiClient },
    Unavailable { reason: String },
}

#[derive(Clone)]
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let (provider, model) = parse_ocr_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "gemini" => match GeminiVisionClient::new(config, model) {
                Ok(client) => {
                    info!(model = %model, "Gemini OCR backend initialized");
                    OcrBackend::Api {
                        client: OcrApiClient::Gemini(client),
                    }
                }
                Err(e) => Self::unavailable(format!("Gemini OCR backend unavailable: {e}")),
            },
            "openai" => match OpenAiVisionClient::new(config, model) {
                Ok(client) => {
                    info!(model = %model, "OpenAI Vision OCR backend initialized");
                    OcrBackend::Api {
                        client: OcrApiClient::OpenAi(client),
                    }
                }
                Err(e) => Self::unavailable(format!("OpenAI Vision OCR backend unavailable: {e}")),
            },
            other => Self::unavailable(format!("Unknown OCR provider: {other}")),
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    fn unavailable(reason: String) -> OcrBackend {
        warn!("{}", reason);
        OcrBackend::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    /// Configured `<provider>/<model>` string.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Extracts text from an encoded image. Bounded by the configured timeout
    /// across all retries.
    pub async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(timeout_duration, self.ocr_internal(image_bytes)).await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(HarfError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn ocr_internal(&self, image_bytes: &[u8]) -> Result<String> {
        match &self.backend {
            OcrBackend::Api { client } => client.ocr(image_bytes).await,
            OcrBackend::Unavailable { reason } => Err(HarfError::OcrUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(model: &str, base_url: Option<String>) -> OcrConfig {
        OcrConfig {
            model: model.to_string(),
            api_key: Some("test-key".to_string()),
            base_url,
            timeout_secs: 1,
            max_retries: 3,
        }
    }

    #[test]
    fn test_provider_selection() {
        assert!(OcrProvider::new(&config("gemini/gemini-2.0-flash-exp", None)).is_available());
        assert!(OcrProvider::new(&config("openai/gpt-4o", None)).is_available());
        assert!(OcrProvider::new(&config("gemini-1.5-pro", None)).is_available());
        assert!(!OcrProvider::new(&config("mistral/pixtral", None)).is_available());
    }

    #[test]
    fn test_missing_key_degrades_gracefully() {
        let mut cfg = config("gemini/gemini-2.0-flash-exp", None);
        cfg.api_key = None;
        let provider = OcrProvider::new(&cfg);
        assert!(!provider.is_available());
        assert_eq!(provider.model(), "gemini/gemini-2.0-flash-exp");
    }

    #[tokio::test]
    async fn test_ocr_unavailable_returns_error() {
        let provider = OcrProvider::new(&config("unknown/model", None));
        let result = provider.ocr(b"image").await;
        assert!(matches!(result, Err(HarfError::OcrUnavailable(_))));
    }

    #[tokio::test]
    async fn test_ocr_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = OcrProvider::new(&config("gemini/test", Some(server.uri())));
        let err = provider.ocr(b"image").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }
}
