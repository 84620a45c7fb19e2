//! Session state and exchange orchestration
//!
//! A `Session` owns one bounded context window, at most one active document
//! context, and the instruction text. It assembles requests for the
//! completion service and records completed exchanges back into the window.
//! Sessions are plain per-user values passed explicitly to every operation;
//! there is no shared or global session state.

pub mod window;

pub use window::{ContextWindow, Role, Turn};

use futures::StreamExt;

use crate::error::Result;
use crate::providers::{CompletionRequest, CompletionService};

/// Prefix used for the stored payload of an ingested document event
const DOCUMENT_STORED_PREFIX: &str = "Content stored: ";

/// The one active ingested document, kept as a single text blob
///
/// Replacing the document discards the previous one entirely; only one
/// document is active at a time.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    label: String,
    text: String,
}

impl DocumentContext {
    /// Label under which the document was ingested
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Full extracted text of the document
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One user's interactive tutoring session
///
/// The session exclusively owns its context window; callers read it through
/// snapshots only. Exchanges are recorded atomically: the (user, reply) pair
/// enters the window only after the full reply text is known, so a failed or
/// interrupted model call leaves the window untouched.
pub struct Session {
    window: ContextWindow,
    document: Option<DocumentContext>,
    instruction: String,
}

impl Session {
    /// Creates a session over an owned window and instruction text
    ///
    /// # Examples
    ///
    /// ```
    /// use tutora::session::{ContextWindow, Session};
    ///
    /// let window = ContextWindow::new(5).unwrap();
    /// let session = Session::new(window, "You are a tutor.");
    /// assert_eq!(session.window().capacity(), 5);
    /// ```
    pub fn new(window: ContextWindow, instruction: impl Into<String>) -> Self {
        Self {
            window,
            document: None,
            instruction: instruction.into(),
        }
    }

    /// Read-only view of the owned context window
    pub fn window(&self) -> &ContextWindow {
        &self.window
    }

    /// Instruction text supplied with every request
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The currently active document, if any
    pub fn document(&self) -> Option<&DocumentContext> {
        self.document.as_ref()
    }

    /// Runs one blocking exchange against the completion service
    ///
    /// Assembles the request from the instruction, the current window
    /// snapshot, and `user_text`; on success records the pair and returns
    /// the reply. A service failure records nothing.
    pub async fn exchange(
        &mut self,
        service: &dyn CompletionService,
        user_text: &str,
    ) -> Result<String> {
        let request = CompletionRequest::new(&self.instruction, self.window.view(), user_text);
        let reply = service.complete(&request).await?;

        self.window.record(user_text, reply.clone());
        Ok(reply)
    }

    /// Runs one streamed exchange against the completion service
    ///
    /// Fragments are handed to `on_fragment` in arrival order. The
    /// concatenated reply is recorded as one atomic pair only after the
    /// stream ends; a mid-stream failure records nothing.
    pub async fn exchange_streaming<F>(
        &mut self,
        service: &dyn CompletionService,
        user_text: &str,
        mut on_fragment: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let request = CompletionRequest::new(&self.instruction, self.window.view(), user_text);
        let mut stream = service.complete_stream(&request).await?;

        let mut reply = String::new();
        while let Some(fragment) = stream.next().await {
            let fragment = fragment?;
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }

        self.window.record(user_text, reply.clone());
        Ok(reply)
    }

    /// Records an exchange that did not involve the completion service
    ///
    /// Used for the scripted greeting and farewell pairs.
    pub fn record_exchange(
        &mut self,
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
    ) {
        self.window.record(user_text, assistant_text);
    }

    /// Ingests an extracted document into the session
    ///
    /// Replaces any previously active document and records the ingestion as
    /// an event pair (marker + stored text) through the window. The event
    /// rides inside the same bounded window as ordinary conversation, so
    /// later exchanges can evict it.
    pub fn ingest_document(&mut self, label: impl Into<String>, text: impl Into<String>) {
        let label = label.into();
        let text = text.into();

        if let Some(previous) = &self.document {
            tracing::info!(
                previous = %previous.label(),
                replacement = %label,
                "Replacing active document context"
            );
        }

        self.window
            .record_event(&label, format!("{}{}", DOCUMENT_STORED_PREFIX, text));
        self.document = Some(DocumentContext { label, text });
    }
}
