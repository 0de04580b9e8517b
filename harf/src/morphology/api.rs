use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::config::MorphologyConfig;
use crate::error::{HarfError, Result};

use super::{MorphologyAnalyzer, SpellSuggester, WordAnalysis};

/// Client for a morphology sidecar speaking the v1 JSON contract:
///
/// - `POST {base}/v1/analyze` `{"word": "..."}` → `{"analyses": [{"lemma": "...", "attributes": [...]}]}`
/// - `POST {base}/v1/suggest` `{"word": "..."}` → `{"suggestions": ["...", ...]}`
#[derive(Clone, Debug)]
pub struct RemoteMorphologyClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct WordRequest<'a> {
    word: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    analyses: Vec<WordAnalysis>,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

impl RemoteMorphologyClient {
    pub fn new(config: &MorphologyConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| {
                HarfError::Config("Base URL required for the remote morphology engine".to_string())
            })?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HarfError::Morphology(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<T: DeserializeOwned>(&self, endpoint: &str, word: &str) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/v1/{endpoint}", self.base_url))
            .json(&WordRequest { word })
            .send()
            .await
            .map_err(|e| HarfError::MorphologyUnavailable(format!("{endpoint} request failed: {e}")))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(HarfError::MorphologyUnavailable(format!(
                "{endpoint} returned {status}"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HarfError::Morphology(format!(
                "{endpoint} failed for '{word}': {status} - {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| HarfError::Morphology(format!("Failed to parse {endpoint} response: {e}")))
    }
}

#[async_trait]
impl MorphologyAnalyzer for RemoteMorphologyClient {
    async fn analyze(&self, word: &str) -> Result<Vec<WordAnalysis>> {
        let response: AnalyzeResponse = self.post("analyze", word).await?;
        Ok(response.analyses)
    }
}

#[async_trait]
impl SpellSuggester for RemoteMorphologyClient {
    async fn suggest(&self, word: &str) -> Result<Vec<String>> {
        let response: SuggestResponse = self.post("suggest", word).await?;
        Ok(response.suggestions)
    }
}
