use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OcrConfig;
use crate::error::{HarfError, Result};

/// Instruction sent alongside every image.
pub const OCR_PROMPT: &str = "Extract all the handwritten and printed text from this image. \
This text is likely in Turkish, so pay attention to Turkish characters like ı, ğ, ü, ş, ö, ç. \
Focus on accuracy and preserve the original layout as much as possible.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// MIME type of an encoded image, sniffed from its magic bytes.
pub fn detect_mime(image_bytes: &[u8]) -> &'static str {
    infer::get(image_bytes)
        .filter(|kind| kind.matcher_type() == infer::MatcherType::Image)
        .map(|kind| kind.mime_type())
        .unwrap_or("image/jpeg")
}

fn build_http_client(config: &OcrConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| HarfError::Ocr(format!("Failed to create HTTP client: {e}")))
}

/// Sends a request, retrying on 429, 5xx and transport errors with
/// exponential backoff. Fails once `max_retries` attempts have been used.
async fn send_with_retry<F>(build: F, max_retries: u32) -> Result<reqwest::Response>
where
    F: Fn() -> RequestBuilder,
{
    let max_retries = max_retries.max(1);
    let mut retries = 0;

    loop {
        match build().send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return Ok(resp);
                } else if status.as_u16() == 429 || status.is_server_error() {
                    retries += 1;
                    if retries >= max_retries {
                        return Err(HarfError::Ocr(format!(
                            "API request failed after {max_retries} retries: {status}"
                        )));
                    }
                    tracing::debug!(%status, retries, "OCR request throttled, retrying");
                    let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                    tokio::time::sleep(delay).await;
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    return Err(HarfError::Ocr(format!(
                        "API request failed: {status} - {body}"
                    )));
                }
            }
            Err(e) => {
                retries += 1;
                if retries >= max_retries {
                    return Err(HarfError::Ocr(format!(
                        "API request failed after {max_retries} retries: {e}"
                    )));
                }
                let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                tokio::time::sleep(delay).await;
            }
        }
    }
}

// Gemini generateContent

#[derive(Clone, Debug)]
pub struct GeminiVisionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated. Empty when the model
    /// returned nothing readable.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiVisionClient {
    pub fn new(config: &OcrConfig, model: &str) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HarfError::Ocr("API key required for Gemini OCR".to_string()))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| GEMINI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: build_http_client(config)?,
            api_key,
            base_url,
            model: model.to_string(),
            max_retries: config.max_retries,
        })
    }

    pub async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: OCR_PROMPT.to_string(),
                    },
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: detect_mime(image_bytes).to_string(),
                            data: STANDARD.encode(image_bytes),
                        },
                    },
                ],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let resp = send_with_retry(
            || {
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&request)
            },
            self.max_retries,
        )
        .await?;

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| HarfError::Ocr(format!("Failed to parse response: {e}")))?;

        Ok(body.text())
    }
}

// OpenAI-compatible chat completions

#[derive(Clone, Debug)]
pub struct OpenAiVisionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

impl OpenAiVisionClient {
    pub fn new(config: &OcrConfig, model: &str) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| HarfError::Ocr("API key required for OpenAI Vision".to_string()))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client: build_http_client(config)?,
            api_key,
            base_url,
            model: model.to_string(),
            max_retries: config.max_retries,
        })
    }

    pub async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        let data_url = format!(
            "data:{};base64,{}",
            detect_mime(image_bytes),
            STANDARD.encode(image_bytes)
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: OCR_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 4096,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let resp = send_with_retry(
            || {
                self.client
                    .post(&url)
                    .header("Authorization", format!("Bearer {}", self.api_key))
                    .json(&request)
            },
            self.max_retries,
        )
        .await?;

        let chat_response: ChatResponse = resp
            .json()
            .await
            .map_err(|e| HarfError::Ocr(format!("Failed to parse response: {e}")))?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
