//! OpenAI-compatible chat completions backend.
use super::{LmBackend, LmRequest};
use crate::util::truncate_string;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Error bodies are cut to this many bytes in messages.
const ERROR_BODY_LIMIT: usize = 500;

pub struct OpenAiBackend {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            api_key,
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl LmBackend for OpenAiBackend {
    fn complete(&self, request: &LmRequest) -> Result<String> {
        let url = self.endpoint();
        let body = chat_request(request);

        let start = Instant::now();
        let mut response = self
            .agent
            .post(url.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send_json(&body)
            .with_context(|| format!("POST {url}"))?;
        let status = response.status();
        let text = response
            .body_mut()
            .read_to_string()
            .context("read LM response body")?;

        tracing::info!(
            backend = "openai",
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            prompt_bytes = request.prompt.len(),
            response_bytes = text.len(),
            "lm invoke complete"
        );

        if !status.is_success() {
            return Err(anyhow!(
                "LM API error {}: {}",
                status,
                truncate_string(text.trim(), ERROR_BODY_LIMIT)
            ));
        }
        parse_chat_response(&text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

fn chat_request(request: &LmRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: [
            ChatMessage {
                role: "system",
                content: &request.system,
            },
            ChatMessage {
                role: "user",
                content: &request.prompt,
            },
        ],
    }
}

/// Pull `choices[0].message.content` out of a chat completions body.
fn parse_chat_response(text: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(text).with_context(|| {
        format!(
            "parse LM response: {}",
            truncate_string(text, ERROR_BODY_LIMIT)
        )
    })?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("LM returned no choices"))?;
    choice
        .message
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| anyhow!("LM returned an empty message"))
}
