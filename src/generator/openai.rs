// src/generator/openai.rs

//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{GeneratorError, QuizGenerator, build_prompt, parse_questions};
use crate::models::form::Question;

const SYSTEM_PROMPT: &str = "You write quiz questions. Respond ONLY with valid JSON, without explanations.";

pub struct OpenAiQuizGenerator {
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAiQuizGenerator {
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GeneratorError::Network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn generate(&self, text: &str, count: usize) -> Result<Vec<Question>, GeneratorError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(text, count),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout(self.timeout_secs)
                } else {
                    GeneratorError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Generator returned HTTP {}", status.as_u16());
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(format!("invalid response body: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        let questions = parse_questions(&content)?;
        tracing::info!("Generator produced {} candidate questions", questions.len());
        Ok(questions)
    }
}
