//! Gemini completion service for Tutora
//!
//! This module implements the CompletionService trait over the Google
//! Generative Language REST API, supporting both blocking completions and
//! SSE streaming. The instruction text travels as `systemInstruction` and
//! the window snapshot is mapped positionally onto user/model wire roles.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Result, TutoraError};
use crate::providers::{CompletionRequest, CompletionService, TextStream};
use crate::session::Turn;

/// Environment variable consulted when no API key is configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default API base when none is configured
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API completion service
///
/// Connects to the Generative Language API (or a mock server via the
/// `api_base` config override) to generate tutoring replies. The API key is
/// taken from the config when present, otherwise from `GEMINI_API_KEY`.
pub struct GeminiService {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for generateContent / streamGenerateContent
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

/// One content entry (a role-tagged list of parts)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// One text part inside a content entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Sampling configuration sent with every request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Response body (also the shape of each SSE stream chunk)
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// One candidate completion
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate's parts, if any
    fn into_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let content = candidate.content?;
        Some(
            content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join(""),
        )
    }
}

impl GeminiService {
    /// Creates a new Gemini service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration (model, sampling, optional api_base)
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when neither the config nor the
    /// `GEMINI_API_KEY` environment variable provides a key, or `Provider`
    /// if HTTP client initialization fails.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = match config.api_key.clone() {
            Some(key) if !key.is_empty() => key,
            _ => std::env::var(GEMINI_API_KEY_ENV)
                .map_err(|_| TutoraError::MissingCredentials("gemini".to_string()))?,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .user_agent("tutora/0.1.0")
            .build()
            .map_err(|e| TutoraError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(model = %config.model, "Initialized Gemini service");

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn api_base(&self) -> String {
        self.config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.api_base(),
            self.config.model,
            action
        )
    }

    fn build_request(&self, request: &CompletionRequest) -> GeminiRequest {
        let mut contents = convert_context(&request.context);
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: request.message.clone(),
            }],
        });

        let system_instruction = if request.instruction.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request.instruction.clone(),
                }],
            })
        };

        GeminiRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

/// Maps the window snapshot onto wire contents
///
/// The snapshot arrives as flattened (input, output) pairs, so the wire role
/// is positional: even offsets map to "user", odd offsets to "model". This
/// also covers event pairs, whose marker rides as user input and whose stored
/// payload rides as model output.
fn convert_context(context: &[Turn]) -> Vec<GeminiContent> {
    context
        .iter()
        .enumerate()
        .map(|(idx, turn)| {
            let role = if idx % 2 == 0 { "user" } else { "model" };
            GeminiContent {
                role: Some(role.to_string()),
                parts: vec![GeminiPart {
                    text: turn.text().to_string(),
                }],
            }
        })
        .collect()
}

#[async_trait]
impl CompletionService for GeminiService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request);
        let url = self.endpoint("generateContent");

        tracing::debug!(context_turns = request.context.len(), "Sending Gemini completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TutoraError::Provider(format!(
                "Gemini API returned {}: {}",
                status, detail
            ))
            .into());
        }

        let parsed: GeminiResponse = response.json().await?;
        match parsed.into_text() {
            Some(text) => Ok(text),
            None => Err(TutoraError::Provider(
                "Gemini response contained no candidates".to_string(),
            )
            .into()),
        }
    }

    async fn complete_stream(&self, request: &CompletionRequest) -> Result<TextStream> {
        let body = self.build_request(request);
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));

        tracing::debug!(context_turns = request.context.len(), "Opening Gemini completion stream");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TutoraError::Provider(format!(
                "Gemini API returned {}: {}",
                status, detail
            ))
            .into());
        }

        let bytes = response.bytes_stream().boxed();
        let stream = futures::stream::try_unfold(
            (bytes, String::new()),
            |(mut bytes, mut buffer)| async move {
                loop {
                    if let Some(newline) = buffer.find('\n') {
                        let line: String = buffer.drain(..=newline).collect();
                        let line = line.trim();

                        if let Some(data) = line.strip_prefix("data:") {
                            let data = data.trim();
                            if data.is_empty() || data == "[DONE]" {
                                continue;
                            }

                            let chunk: GeminiResponse =
                                serde_json::from_str(data).map_err(|e| {
                                    anyhow::Error::from(TutoraError::Provider(format!(
                                        "Invalid Gemini stream chunk: {}",
                                        e
                                    )))
                                })?;

                            if let Some(text) = chunk.into_text() {
                                if !text.is_empty() {
                                    return Ok(Some((text, (bytes, buffer))));
                                }
                            }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-key".to_string()),
            ..GeminiConfig::default()
        }
    }

    #[test]
    fn test_new_with_configured_key() {
        let service = GeminiService::new(config_with_key());
        assert!(service.is_ok());
    }

    #[test]
    fn test_new_without_key_fails() {
        std::env::remove_var(GEMINI_API_KEY_ENV);
        let err = GeminiService::new(GeminiConfig::default()).err().unwrap();
        let err = err.downcast::<TutoraError>().unwrap();
        assert!(matches!(err, TutoraError::MissingCredentials(_)));
    }

    #[test]
    fn test_supports_streaming() {
        let service = GeminiService::new(config_with_key()).unwrap();
        assert!(service.supports_streaming());
    }

    #[test]
    fn test_endpoint_uses_api_base_override() {
        let config = GeminiConfig {
            api_base: Some("http://localhost:9999/".to_string()),
            ..config_with_key()
        };
        let service = GeminiService::new(config).unwrap();
        assert_eq!(
            service.endpoint("generateContent"),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_convert_context_roles_are_positional() {
        let context = vec![
            Turn::user("q1"),
            Turn::assistant("a1"),
            Turn::event("PDF UPLOADED"),
            Turn::event("Content stored: text"),
        ];

        let contents = convert_context(&context);
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[2].role.as_deref(), Some("user"));
        assert_eq!(contents[3].role.as_deref(), Some("model"));
        assert_eq!(contents[2].parts[0].text, "PDF UPLOADED");
    }

    #[test]
    fn test_request_serialization_is_camel_case() {
        let service = GeminiService::new(config_with_key()).unwrap();
        let request = CompletionRequest::new("Be a tutor.", Vec::new(), "Hi");
        let body = service.build_request(&request);

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"maxOutputTokens\":1024"));
        assert!(json.contains("\"temperature\":0.0"));
    }

    #[test]
    fn test_empty_instruction_is_omitted() {
        let service = GeminiService::new(config_with_key()).unwrap();
        let request = CompletionRequest::new("", Vec::new(), "Hi");
        let body = service.build_request(&request);

        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("systemInstruction"));
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "there"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello there");
    }

    #[test]
    fn test_empty_response_has_no_text() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_text().is_none());
    }
}
