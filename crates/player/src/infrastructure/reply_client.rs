//! Chat-completions client (OpenAI-compatible API)
//!
//! Works against DeepSeek, OpenRouter, Ollama or anything else that speaks
//! `POST /v1/chat/completions`. Desktop builds use reqwest; browser builds
//! use gloo-net. Timeouts are not handled here - the resolver races every
//! call against its own timer and drops the future when it fires.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use explorers_domain::{CharacterRegistry, MessageRole};

use crate::ports::outbound::{ReplyError, ReplyPort, ReplyRequest};

/// Default model name.
pub const DEFAULT_REPLY_MODEL: &str = "deepseek-chat";

const DEFAULT_MAX_TOKENS: u32 = 60;
const DEFAULT_TEMPERATURE: f32 = 0.8;

const DEFAULT_PERSONA: &str = "You are a friendly Explorer buddy for children aged 4-7. \
    You are cheerful, patient and curious.";

/// Client for an OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct ChatCompletionsClient {
    #[cfg(not(target_arch = "wasm32"))]
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsClient {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            client: reqwest::Client::new(),
            endpoint: endpoint.trim().to_string(),
            api_key: None,
            model: model.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Attach a bearer token. Blank keys are ignored.
    pub fn with_api_key(mut self, api_key: Option<&str>) -> Self {
        self.api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: &ReplyRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: build_messages(request),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn send(&self, body: ChatRequest) -> Result<String, ReplyError> {
        let mut builder = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ReplyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReplyError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ReplyError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_reply(&text)
    }

    #[cfg(target_arch = "wasm32")]
    async fn send(&self, body: ChatRequest) -> Result<String, ReplyError> {
        use gloo_net::http::Request;

        let mut builder = Request::post(&self.endpoint).header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", &format!("Bearer {key}"));
        }

        let response = builder
            .json(&body)
            .map_err(|e| ReplyError::Transport(e.to_string()))?
            .send()
            .await
            .map_err(|e| ReplyError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ReplyError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ReplyError::Status { status, body: text });
        }

        parse_reply(&text)
    }
}

#[async_trait]
impl ReplyPort for ChatCompletionsClient {
    async fn reply(&self, request: ReplyRequest) -> Result<String, ReplyError> {
        let body = self.build_request(&request);

        tracing::debug!(
            endpoint = %self.endpoint,
            history = request.recent_history.len(),
            scene = %request.scene,
            "Requesting remote reply"
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.send(body).await
        }

        // The browser future is not Send; the UI runs on one thread anyway.
        #[cfg(target_arch = "wasm32")]
        {
            send_wrapper::SendWrapper::new(self.send(body)).await
        }
    }
}

fn system_prompt(request: &ReplyRequest) -> String {
    let persona = request.persona.as_deref().unwrap_or(DEFAULT_PERSONA);
    let who = request
        .character
        .as_ref()
        .and_then(|id| CharacterRegistry::builtin().get(id.as_str()))
        .map(|c| format!("You are speaking as {} ({}).", c.display_name, c.role))
        .unwrap_or_default();

    format!(
        "{persona}\n\nThe child is exploring the {} right now. {who} \
         Keep every answer to one or two short, kind sentences a 5-year-old can follow.",
        request.scene.display_name()
    )
}

fn build_messages(request: &ReplyRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(request.recent_history.len() + 2);

    messages.push(ChatMessage {
        role: "system".to_string(),
        content: Some(system_prompt(request)),
    });

    for msg in &request.recent_history {
        messages.push(ChatMessage {
            role: match msg.role() {
                MessageRole::User => "user",
                MessageRole::Assistant => "assistant",
            }
            .to_string(),
            content: Some(msg.text().to_string()),
        });
    }

    messages.push(ChatMessage {
        role: "user".to_string(),
        content: Some(request.user_text.clone()),
    });

    messages
}

/// Extract the reply text from a chat-completions response body
fn parse_reply(body: &str) -> Result<String, ReplyError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ReplyError::Malformed(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ReplyError::Malformed("no content in first choice".to_string()))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ReplyError::Malformed("empty content".to_string()));
    }

    Ok(trimmed.to_string())
}

// =============================================================================
// OpenAI API types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize, Default)]
struct ChatChoice {
    #[serde(default)]
    message: ChatMessage,
}
