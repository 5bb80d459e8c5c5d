use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Opaque remote text generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: String, system: Option<String>) -> Result<String>;
}

pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAICompatibleProvider {
    /// `timeout` bounds the whole request, so a stalled backend fails like any other.
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build text-generation HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl TextGenerator for OpenAICompatibleProvider {
    async fn generate(&self, prompt: String, system: Option<String>) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({ "role": "system", "content": sys }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.4,
            "response_format": { "type": "json_object" },
        });

        let mut request = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .json(&body);

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let res = request.send().await?.error_for_status()?;
        let json: serde_json::Value = res.json().await?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .context("Failed to parse content from completion response")?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{RemediationError, RemediationRequest, RemediationService};
    use std::net::TcpListener;
    use std::sync::Arc;

    #[actix_web::test]
    async fn stalled_backend_times_out_as_suggestion_failure() {
        // accepts connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let provider = OpenAICompatibleProvider::new(
            base_url,
            None,
            "test-model".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();
        let service = RemediationService::new(Arc::new(provider));

        let request = RemediationRequest {
            issue_description: "Students check in from home".to_string(),
            historical_actions: String::new(),
        };
        let err = service.suggest(&request).await.unwrap_err();
        assert!(matches!(err, RemediationError::SuggestionFailed));
        drop(listener);
    }
}
