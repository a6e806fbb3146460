use async_trait::async_trait;
use cardscan_core::{CardImage, INDUSTRY_LABELS, VisionProvider};
use reqwest::Client;
use serde_json::json;
use tracing::{error, info};

use crate::retry::{RetryPolicy, retry_with_backoff};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_DETAIL: &str = "high";

/// Build the extraction prompt sent alongside the card photo.
fn extraction_prompt() -> String {
    format!(
        "Extract the contact details from this business card image. \
         Reply with ONLY a JSON object with these keys: name, title, company, phone, \
         email, website, address, industry, notes. Use null for anything you cannot \
         read clearly. For industry choose exactly one of: {}. Put slogans, \
         specializations and any other text into notes. If you cannot produce JSON, \
         return the raw text of the card instead.",
        INDUSTRY_LABELS.join("; ")
    )
}

/// Map well-known API failures to an operator hint.
fn classify_failure(message: &str) -> Option<&'static str> {
    if message.contains("rate_limit") {
        Some("Rate limit exceeded - try again later")
    } else if message.contains("quota") {
        Some("Quota exceeded - check your OpenAI billing")
    } else if message.contains("invalid_api_key") {
        Some("Invalid API key - check your OpenAI API key")
    } else if message.contains("model_not_found") {
        Some("Model not found - check model name")
    } else {
        None
    }
}

/// Vision client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiVisionProvider {
    client: Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
    detail: String,
    retry: RetryPolicy,
}

impl OpenAiVisionProvider {
    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAiVisionProvider");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            detail: DEFAULT_DETAIL.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = detail;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn build_request(&self, image: &CardImage, model: &str) -> serde_json::Value {
        json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": extraction_prompt() },
                    {
                        "type": "image_url",
                        "image_url": { "url": image.to_data_url(), "detail": self.detail }
                    }
                ]
            }],
            "max_tokens": self.max_tokens,
        })
    }

    /// Helper method to send a single request
    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API returned {status}: {body}");
        }

        let response = response.json::<serde_json::Value>().await?;
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing content"))?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl VisionProvider for OpenAiVisionProvider {
    async fn read_card(&self, image: &CardImage, model: &str) -> anyhow::Result<String> {
        let request = self.build_request(image, model);

        info!("Sending card image to vision API: model={model}");

        let content = retry_with_backoff(&self.retry, || self.try_send(&request))
            .await
            .map_err(|e| {
                let message = e.to_string();
                error!("Vision API error: {message}");
                if let Some(hint) = classify_failure(&message) {
                    error!("{hint}");
                }
                e.context("Failed to extract text from image")
            })?;

        info!("Received vision response: {} chars", content.len());
        Ok(content)
    }

    fn get_default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }
}
