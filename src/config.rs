//! Configuration management for Tutora
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TutoraError};

/// Main configuration structure for Tutora
///
/// Holds everything needed to run a tutoring session: the completion-service
/// settings, the session window settings, and the tutor policy overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion-service configuration (Gemini, Ollama)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Session behavior configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Tutor policy configuration
    #[serde(default)]
    pub tutor: TutorConfig,
}

/// Completion-service configuration
///
/// Specifies which backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of service to use ("gemini" or "ollama")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

/// Gemini service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the `generateContent` and
    /// `streamGenerateContent` endpoints, which allows tests to point the
    /// service at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Optional API key; falls back to the GEMINI_API_KEY environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_gemini_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate per reply
    #[serde(default = "default_gemini_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_gemini_temperature() -> f32 {
    0.0
}

fn default_gemini_max_output_tokens() -> u32 {
    1024
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            api_key: None,
            temperature: default_gemini_temperature(),
            max_output_tokens: default_gemini_max_output_tokens(),
        }
    }
}

/// Ollama service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Session behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of exchange pairs retained in the context window
    #[serde(default = "default_window_pairs")]
    pub window_pairs: usize,

    /// Greeting shown (and recorded) when a chat session starts
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Farewell shown (and recorded) when the user says goodbye
    #[serde(default = "default_farewell_message")]
    pub farewell_message: String,
}

fn default_window_pairs() -> usize {
    5
}

fn default_welcome_message() -> String {
    "Hello! I'm Tutora, your personal tutor. Ask me anything about Physics, English, and Maths!"
        .to_string()
}

fn default_farewell_message() -> String {
    "Goodbye! Have a great day. See you next time.".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_pairs: default_window_pairs(),
            welcome_message: default_welcome_message(),
            farewell_message: default_farewell_message(),
        }
    }
}

/// Tutor policy configuration
///
/// The instruction text is policy, not logic: either field replaces the
/// built-in default wholesale. Inline text wins over a file path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Inline instruction text
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file holding the instruction text
    #[serde(default)]
    pub system_prompt_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file with environment overrides
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TutoraError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| TutoraError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("TUTORA_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(gemini_model) = std::env::var("TUTORA_GEMINI_MODEL") {
            self.provider.gemini.model = gemini_model;
        }

        if let Ok(ollama_host) = std::env::var("TUTORA_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("TUTORA_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(window_pairs) = std::env::var("TUTORA_WINDOW_PAIRS") {
            if let Ok(value) = window_pairs.parse() {
                self.session.window_pairs = value;
            } else {
                tracing::warn!("Invalid TUTORA_WINDOW_PAIRS: {}", window_pairs);
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when the window capacity is zero and
    /// `Config` for unknown provider types or empty model names.
    pub fn validate(&self) -> Result<()> {
        if self.session.window_pairs == 0 {
            return Err(TutoraError::InvalidConfiguration(
                "session.window_pairs must be at least 1".to_string(),
            )
            .into());
        }

        match self.provider.provider_type.as_str() {
            "gemini" => {
                if self.provider.gemini.model.is_empty() {
                    return Err(
                        TutoraError::Config("provider.gemini.model must not be empty".to_string())
                            .into(),
                    );
                }
            }
            "ollama" => {
                if self.provider.ollama.host.is_empty() {
                    return Err(
                        TutoraError::Config("provider.ollama.host must not be empty".to_string())
                            .into(),
                    );
                }
                if self.provider.ollama.model.is_empty() {
                    return Err(
                        TutoraError::Config("provider.ollama.model must not be empty".to_string())
                            .into(),
                    );
                }
            }
            other => {
                return Err(TutoraError::Config(format!(
                    "Unknown provider type: {} (expected \"gemini\" or \"ollama\")",
                    other
                ))
                .into());
            }
        }

        Ok(())
    }
}
