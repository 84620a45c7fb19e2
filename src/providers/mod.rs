//! Completion-service module for Tutora
//!
//! This module contains the completion-service abstraction and the Gemini
//! and Ollama implementations.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionRequest, CompletionService, TextStream};
pub use gemini::GeminiService;
pub use ollama::OllamaService;

use crate::config::ProviderConfig;
use crate::error::{Result, TutoraError};

/// Create a completion service instance based on configuration
///
/// # Arguments
///
/// * `provider_type` - Type of service ("gemini" or "ollama")
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed service instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
pub fn create_service(
    provider_type: &str,
    config: &ProviderConfig,
) -> Result<Box<dyn CompletionService>> {
    match provider_type {
        "gemini" => Ok(Box::new(GeminiService::new(config.gemini.clone())?)),
        "ollama" => Ok(Box::new(OllamaService::new(config.ollama.clone())?)),
        other => Err(TutoraError::Provider(format!(
            "Unknown provider type: {}",
            other
        ))
        .into()),
    }
}
