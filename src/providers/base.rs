//! Base completion-service trait and request types for Tutora
//!
//! This module defines the CompletionService trait that all model backends
//! implement, along with the request structure assembled from the session's
//! instruction, context window snapshot, and new user message.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::{Result, TutoraError};
use crate::session::Turn;

/// Ordered sequence of text fragments whose concatenation is the full reply
pub type TextStream = BoxStream<'static, Result<String>>;

/// One fully-assembled model request
///
/// Carries the instruction (system prompt policy text), the chronological
/// context snapshot from the session's window, and the new user message.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Instruction text governing tone, format, and refusals
    pub instruction: String,
    /// Context window snapshot in chronological order
    pub context: Vec<Turn>,
    /// The new user message to answer
    pub message: String,
}

impl CompletionRequest {
    /// Creates a new request
    ///
    /// # Examples
    ///
    /// ```
    /// use tutora::providers::CompletionRequest;
    ///
    /// let request = CompletionRequest::new("You are a tutor.", Vec::new(), "Hi!");
    /// assert_eq!(request.message, "Hi!");
    /// assert!(request.context.is_empty());
    /// ```
    pub fn new(
        instruction: impl Into<String>,
        context: Vec<Turn>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            context,
            message: message.into(),
        }
    }
}

/// Completion service trait for model backends
///
/// All backends (Gemini, Ollama, test doubles) implement this trait. A
/// backend receives the full request and returns the generated reply either
/// as one value or as an ordered fragment stream. No retry or backoff policy
/// lives here; failures propagate to the caller.
///
/// # Examples
///
/// ```no_run
/// use async_trait::async_trait;
/// use tutora::error::Result;
/// use tutora::providers::{CompletionRequest, CompletionService};
///
/// struct MyService;
///
/// #[async_trait]
/// impl CompletionService for MyService {
///     async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
///         Ok("Reply".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generates the full reply for a request as a single value
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is malformed.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Generates the reply as an ordered stream of text fragments
    ///
    /// Fragments arrive in generation order; concatenating them yields the
    /// same value `complete` would have returned. The default implementation
    /// fails with `StreamingNotSupported`.
    async fn complete_stream(&self, _request: &CompletionRequest) -> Result<TextStream> {
        Err(TutoraError::StreamingNotSupported.into())
    }

    /// Whether this backend implements `complete_stream`
    fn supports_streaming(&self) -> bool {
        false
    }
}
