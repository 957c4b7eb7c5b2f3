//! OpenAI-compatible API client for embeddings and chat completions

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use crate::types::{ChatMessage, Role};

use super::completion::CompletionProvider;
use super::embedding::EmbeddingProvider;

/// Client for any OpenAI-compatible embeddings + chat completions API
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        if config.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(Error::Configuration(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::external("openai", e))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut request = self.http.post(url);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        request
    }

    async fn send<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let response = self
            .post(path)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::external("openai", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::ExternalService {
                service: "openai",
                message: format!("HTTP {status}: {detail}"),
            });
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| Error::external("openai", e))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.embed_model,
            input: text,
        };
        let response: EmbeddingResponse = self.send("embeddings", &request).await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::external("openai", "embeddings response contained no data"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> Result<String> {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        wire.push(WireMessage {
            role: Role::System,
            content: system_prompt,
        });
        wire.extend(messages.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        let request = CompletionRequest {
            model: &self.config.chat_model,
            messages: wire,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let response: CompletionResponse = self.send("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::external("openai", "completion response contained no choices"))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
