use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Webhook not configured")]
    NotConfigured,

    #[error("Upstream returned {0}")]
    Upstream(u16),
}

/// Forwards JSON payloads to an external suggestion webhook
pub struct WebhookClient {
    client: Client,
    suggestions_url: Option<String>,
}

impl WebhookClient {
    pub fn new(suggestions_url: Option<String>, timeout_secs: u64) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            suggestions_url: suggestions_url.filter(|u| !u.is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.suggestions_url.is_some()
    }

    /// POST `payload` to the suggestion webhook and return its JSON answer
    pub async fn forward_suggestion(&self, payload: &Value) -> Result<Value, WebhookError> {
        let url = self.suggestions_url.as_deref().ok_or(WebhookError::NotConfigured)?;

        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Suggestion webhook answered {}", status);
            return Err(WebhookError::Upstream(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}
