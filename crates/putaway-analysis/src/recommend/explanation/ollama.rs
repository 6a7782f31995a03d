//! Explanations from a local Ollama server.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use putaway_core::config::ExplanationConfig;
use putaway_core::errors::ExplanationError;
use putaway_core::traits::ExplanationGenerator;
use putaway_core::types::ExplanationContext;

use super::template::Emphasis;

const SYSTEM_PROMPT: &str = "You are an expert warehouse management assistant. \
Provide clear, direct recommendations for warehouse storage. Be professional and concise. \
Do not mention costs or pricing.";

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

pub struct OllamaExplainer {
    client: Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl OllamaExplainer {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExplanationError> {
        let defaults = ExplanationConfig::default();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplanationError::Transport {
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            timeout,
        })
    }

    pub fn from_config(base_url: &str, config: &ExplanationConfig) -> Result<Self, ExplanationError> {
        let mut explainer = Self::new(base_url, config.model.clone(), config.timeout())?;
        explainer.temperature = config.temperature;
        explainer.max_tokens = config.max_tokens;
        Ok(explainer)
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    pub fn build_prompt(context: &ExplanationContext) -> String {
        let emphasis = Emphasis::for_usage(context.usage_percentage, context.usage_count);
        let slot = &context.recommended_slot;
        format!(
            "Part '{part}' for client '{client}' needs warehouse storage.\n\n\
             Location '{slot}' is the {emphasis} for this part ({detail}) and is currently FREE \
             and available for immediate use.\n\n\
             Write a clear, professional recommendation in 1-2 sentences:\n\
             - State that location {slot} is recommended\n\
             - Emphasize it is FREE and ready to use now\n\
             - Mention it follows historical patterns\n\n\
             Be direct and professional. Do not mention cost, pricing, or \"no additional cost\".",
            part = context.part_code,
            client = context.client_name,
            detail = emphasis.detail(context.usage_percentage),
        )
    }

    fn request_body(&self, context: &ExplanationContext) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model,
            prompt: Self::build_prompt(context),
            system: SYSTEM_PROMPT,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }
}

impl ExplanationGenerator for OllamaExplainer {
    fn explain(&self, context: &ExplanationContext) -> Result<String, ExplanationError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(&self.request_body(context))
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ExplanationError::Timeout
                } else {
                    ExplanationError::Transport {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExplanationError::Status {
                status: status.as_u16(),
            });
        }

        let body: GenerateResponse = response.json().map_err(|e| ExplanationError::Malformed {
            message: e.to_string(),
        })?;
        let text = body.response.trim();
        if text.is_empty() {
            return Err(ExplanationError::Empty);
        }
        debug!(model = %self.model, chars = text.len(), "explanation generated");
        Ok(text.to_string())
    }
}

impl fmt::Debug for OllamaExplainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaExplainer")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
