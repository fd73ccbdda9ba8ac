use http::header::CONTENT_TYPE;

pub mod openai;
pub use openai::ApiError;
use openai::{OpenAIMessage, OpenAIRequest};

use crate::config::UpstreamConfig;

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct Client {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl Client {
    pub fn new(config: UpstreamConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::RequestFailed)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Sends one completion request and returns the first choice's content.
    pub async fn complete(&self, messages: &[OpenAIMessage]) -> Result<Box<str>, ApiError> {
        let openai_request = OpenAIRequest {
            model: &self.config.model,
            messages,
        };

        let response = self
            .http
            .post(&*self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header("HTTP-Referer", &*self.config.referer)
            .header("X-Title", &*self.config.title)
            .json(&openai_request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        tracing::info!(%status, body = %response_text, "Completion API responded");

        if !status.is_success() {
            return Err(ApiError::ErrorResponse {
                status,
                body: response_text.into(),
            });
        }

        openai::extract_reply(&response_text)
    }
}
