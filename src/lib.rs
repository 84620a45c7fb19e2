//! Tutora - interactive AI tutoring chat library
//!
//! This library provides the core functionality for the Tutora tutoring
//! assistant: the bounded conversation context window, session orchestration,
//! completion-service abstractions, document text extraction, and
//! configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Bounded context window and per-session state
//! - `providers`: Completion-service abstraction and implementations (Gemini, Ollama)
//! - `extract`: Document text extraction boundary and PDF implementation
//! - `prompts`: Tutor instruction text (policy configuration)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use tutora::session::{ContextWindow, Session};
//!
//! let window = ContextWindow::new(5).unwrap();
//! let mut session = Session::new(window, "You are a tutor.");
//! session.record_exchange("Hello", "Welcome!");
//! assert_eq!(session.window().view().len(), 2);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TutoraError};
pub use extract::{DocumentExtractor, PdfExtractor};
pub use providers::{CompletionRequest, CompletionService};
pub use session::{ContextWindow, DocumentContext, Role, Session, Turn};
