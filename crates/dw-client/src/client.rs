//! The documentation client seam and its HTTP implementation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use dw_core::{CompletionConfig, Language};

use crate::error::{ClientBuildError, GenerateError};
use crate::prompt::{CompletionRequest, CompletionResponse};

/// Turns source text into markdown documentation.
///
/// Implementations are stateless from the caller's point of view: each call
/// is independent and no retries happen inside.
#[async_trait]
pub trait DocumentationClient: Send + Sync {
    /// Generates documentation for `content`, written in `language`.
    async fn generate(&self, content: &str, language: Language) -> Result<String, GenerateError>;
}

#[async_trait]
impl<T: DocumentationClient + ?Sized> DocumentationClient for Arc<T> {
    async fn generate(&self, content: &str, language: Language) -> Result<String, GenerateError> {
        (**self).generate(content, language).await
    }
}

/// Client for a local `/completion` endpoint.
///
/// # Examples
///
/// ```no_run
/// use dw_client::{CompletionClient, DocumentationClient};
/// use dw_core::{CompletionConfig, Language};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = CompletionClient::new(&CompletionConfig::default())?;
/// let markdown = client.generate("print('hi')", Language::Python).await?;
/// println!("{markdown}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    url: String,
}

impl CompletionClient {
    /// Builds a client for the configured endpoint and timeout.
    pub fn new(config: &CompletionConfig) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            url: completion_url(&config.endpoint),
        })
    }

    /// Returns the full URL requests are posted to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn completion_url(endpoint: &str) -> String {
    format!("{}/completion", endpoint.trim_end_matches('/'))
}

#[async_trait]
impl DocumentationClient for CompletionClient {
    async fn generate(&self, content: &str, language: Language) -> Result<String, GenerateError> {
        let request = CompletionRequest::for_source(content, language);
        let started = Instant::now();

        tracing::debug!(url = %self.url, language = %language, bytes = content.len(), "Requesting completion");

        let response = self.http.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::response_format(format!(
                "service returned status {status}"
            )));
        }

        let body = response.bytes().await?;
        let parsed: CompletionResponse = serde_json::from_slice(&body)
            .map_err(|e| GenerateError::response_format(format!("body is not valid JSON: {e}")))?;

        let text = match parsed.content {
            Some(serde_json::Value::String(text)) => text,
            Some(_) => return Err(GenerateError::response_format("`content` is not a string")),
            None => return Err(GenerateError::response_format("missing `content` field")),
        };

        tracing::debug!(
            language = %language,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Completion received"
        );

        Ok(text)
    }
}
