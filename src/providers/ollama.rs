//! Ollama completion service for Tutora
//!
//! This module implements the CompletionService trait over a local or remote
//! Ollama server's `/api/chat` endpoint, so the tutor is usable without a
//! hosted API key. The instruction travels as a leading system message and
//! streaming replies arrive as newline-delimited JSON.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::OllamaConfig;
use crate::error::{Result, TutoraError};
use crate::providers::{CompletionRequest, CompletionService, TextStream};
use crate::session::Turn;

/// Ollama API completion service
pub struct OllamaService {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for /api/chat
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
}

/// Message structure for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from /api/chat (one object per NDJSON line when streaming)
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
}

impl OllamaService {
    /// Creates a new Ollama service instance
    ///
    /// # Errors
    ///
    /// Returns `Provider` if HTTP client initialization fails.
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("tutora/0.1.0")
            .build()
            .map_err(|e| TutoraError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(host = %config.host, model = %config.model, "Initialized Ollama service");

        Ok(Self { client, config })
    }

    /// The configured server host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.host.trim_end_matches('/'))
    }

    fn build_request(&self, request: &CompletionRequest, stream: bool) -> OllamaRequest {
        let mut messages = Vec::with_capacity(request.context.len() + 2);

        if !request.instruction.is_empty() {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: request.instruction.clone(),
            });
        }
        messages.extend(convert_context(&request.context));
        messages.push(OllamaMessage {
            role: "user".to_string(),
            content: request.message.clone(),
        });

        OllamaRequest {
            model: self.config.model.clone(),
            messages,
            stream,
        }
    }

    async fn send(&self, body: &OllamaRequest) -> Result<reqwest::Response> {
        let response = self.client.post(self.chat_url()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TutoraError::Provider(format!(
                "Ollama API returned {}: {}",
                status, detail
            ))
            .into());
        }
        Ok(response)
    }
}

/// Maps the window snapshot onto wire messages
///
/// The snapshot arrives as flattened (input, output) pairs, so the wire role
/// is positional: even offsets map to "user", odd offsets to "assistant".
fn convert_context(context: &[Turn]) -> Vec<OllamaMessage> {
    context
        .iter()
        .enumerate()
        .map(|(idx, turn)| {
            let role = if idx % 2 == 0 { "user" } else { "assistant" };
            OllamaMessage {
                role: role.to_string(),
                content: turn.text().to_string(),
            }
        })
        .collect()
}

#[async_trait]
impl CompletionService for OllamaService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request, false);

        tracing::debug!(context_turns = request.context.len(), "Sending Ollama completion request");

        let response = self.send(&body).await?;
        let parsed: OllamaResponse = response.json().await?;

        match parsed.message {
            Some(message) => Ok(message.content),
            None => Err(TutoraError::Provider(
                "Ollama response contained no message".to_string(),
            )
            .into()),
        }
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream> {
        let body = self.build_request(request, true);

        tracing::debug!(context_turns = request.context.len(), "Opening Ollama completion stream");

        let response = self.send(&body).await?;

        let bytes = response.bytes_stream().boxed();
        let stream = futures::stream::try_unfold(
            (bytes, String::new()),
            |(mut bytes, mut buffer)| async move {
                loop {
                    if let Some(newline) = buffer.find('\n') {
                        let line: String = buffer.drain(..=newline).collect();
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }

                        let chunk: OllamaResponse = serde_json::from_str(line).map_err(|e| {
                            anyhow::Error::from(TutoraError::Provider(format!(
                                "Invalid Ollama stream chunk: {}",
                                e
                            )))
                        })?;

                        let fragment = chunk
                            .message
                            .map(|message| message.content)
                            .unwrap_or_default();

                        if !fragment.is_empty() {
                            return Ok(Some((fragment, (bytes, buffer))));
                        }
                        if chunk.done {
                            return Ok(None);
                        }
                        continue;
                    }

                    match bytes.next().await {
                        Some(chunk) => {
                            let chunk = chunk.map_err(anyhow::Error::from)?;
                            buffer.push_str(&String::from_utf8_lossy(&chunk));
                        }
                        None => return Ok(None),
                    }
                }
            },
        );

        Ok(stream.boxed())
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}
