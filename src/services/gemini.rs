use crate::models::EmbeddingVector;
use crate::services::embedder::{EmbeddingProvider, ProviderError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "text-embedding-004";
pub const DEFAULT_DIMENSIONS: usize = 768;

/// Gemini embedding API client
///
/// Calls `models/{model}:embedContent` once per text. The API key is sent
/// in the `x-goog-api-key` header.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    client: Client,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        dimensions: usize,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            dimensions,
            client,
        })
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/models/{}:embedContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let body = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: [Part { text }],
            },
        };

        tracing::debug!("Requesting embedding from {} ({} chars)", self.model, text.len());

        let response = self
            .client
            .post(self.embed_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized,
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited,
                _ => {
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unable to read body".to_string());
                    ProviderError::Api {
                        status: status.as_u16(),
                        message,
                    }
                }
            });
        }

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if parsed.embedding.values.is_empty() {
            return Err(ProviderError::InvalidResponse("Empty embedding values".into()));
        }

        Ok(parsed.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }
}
