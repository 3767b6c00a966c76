//! OpenAI-backed classifier -- chat completions over HTTPS.
//!
//! Text-only requests go to the lighter text model, image-bearing
//! requests to the vision model with the image inlined as a base64
//! data URL. The API base URL is configurable so tests can point the
//! client at a local mock server.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::error::{CoreError, VerifyError};
use crate::storage::config::VerifierConfig;

use super::{keyring_store, Classifier, ClassifyMode, ClassifyRequest};

/// Keyring entry holding the OpenAI API key.
pub const API_KEY_ENTRY: &str = "openai_api_key";

/// Environment variable fallback for the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct OpenAiClassifier {
    api_key: Option<String>,
    api_base: String,
    text_model: String,
    vision_model: String,
    http: Client,
    runtime: tokio::runtime::Runtime,
}

impl OpenAiClassifier {
    /// Build a classifier from configuration.
    ///
    /// The API key is resolved once, at construction: OS keyring first,
    /// then the `OPENAI_API_KEY` environment variable. A missing key is
    /// not an error here -- `classify` reports it as
    /// [`VerifyError::MissingCredential`] so the policy can fail closed.
    pub fn new(config: &VerifierConfig) -> Result<Self, CoreError> {
        let api_key = keyring_store::get(API_KEY_ENTRY)
            .ok()
            .flatten()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty());

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(VerifyError::from)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
            http,
            runtime,
        })
    }

    /// Override the resolved API key (tests, or explicit injection).
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Whether a credential was resolved at construction.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn user_content(request: &ClassifyRequest<'_>, mode: ClassifyMode) -> serde_json::Value {
        let prompt = format!(
            "Task title: {}\nTask description: {}\nUser text proof: {}\n\n{}",
            request.task_title,
            request.task_description.unwrap_or("N/A"),
            request.proof_text.unwrap_or("None"),
            match mode {
                ClassifyMode::Text => "Does this text prove the task was done?",
                ClassifyMode::Vision => "Does this image prove the task was done?",
            }
        );

        match (mode, request.image) {
            (ClassifyMode::Vision, Some(bytes)) => {
                let encoded = BASE64.encode(bytes);
                json!([
                    { "type": "text", "text": prompt },
                    {
                        "type": "image_url",
                        "image_url": { "url": format!("data:image/jpeg;base64,{encoded}") }
                    }
                ])
            }
            _ => json!(prompt),
        }
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(
        &self,
        system_prompt: &str,
        request: &ClassifyRequest<'_>,
        mode: ClassifyMode,
    ) -> Result<String, VerifyError> {
        let api_key = self.api_key.as_deref().ok_or(VerifyError::MissingCredential)?;

        let (model, max_tokens) = match mode {
            ClassifyMode::Text => (&self.text_model, 100),
            ClassifyMode::Vision => (&self.vision_model, 200),
        };

        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": Self::user_content(request, mode) },
            ],
            "max_tokens": max_tokens,
        });

        let url = format!("{}/v1/chat/completions", self.api_base);
        let resp = self.runtime.block_on(async {
            self.http
                .post(&url)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = self
                .runtime
                .block_on(resp.text())
                .unwrap_or_else(|_| String::new());
            return Err(VerifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: serde_json::Value = self.runtime.block_on(resp.json())?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                VerifyError::MalformedResponse("missing choices[0].message.content".into())
            })?;

        Ok(content.trim().to_string())
    }
}
