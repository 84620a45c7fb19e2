//! Integration tests for session exchange orchestration
//!
//! Drives a session against scripted completion services to verify atomic
//! recording, streamed-reply assembly, and document ingestion behavior.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Mutex;

use tutora::error::Result;
use tutora::providers::{CompletionRequest, CompletionService, TextStream};
use tutora::session::{ContextWindow, Role, Session};
use tutora::TutoraError;

/// Service that replies from a fixed script and records every request it sees
struct ScriptedService {
    replies: Mutex<Vec<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedService {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn seen_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for ScriptedService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| TutoraError::Provider("script exhausted".to_string()).into())
    }
}

/// Service that streams a fixed fragment sequence
struct StreamingService {
    fragments: Vec<String>,
}

#[async_trait]
impl CompletionService for StreamingService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        Ok(self.fragments.concat())
    }

    async fn complete_stream(&self, _request: &CompletionRequest) -> Result<TextStream> {
        let fragments: Vec<Result<String>> =
            self.fragments.iter().cloned().map(Ok).collect();
        Ok(futures::stream::iter(fragments).boxed())
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

/// Service whose stream fails partway through
struct InterruptedService;

#[async_trait]
impl CompletionService for InterruptedService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
        Err(TutoraError::Provider("unavailable".to_string()).into())
    }

    async fn complete_stream(&self, _request: &CompletionRequest) -> Result<TextStream> {
        let fragments: Vec<Result<String>> = vec![
            Ok("partial ".to_string()),
            Err(TutoraError::Provider("connection dropped".to_string()).into()),
        ];
        Ok(futures::stream::iter(fragments).boxed())
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

fn new_session(capacity: usize) -> Session {
    Session::new(ContextWindow::new(capacity).unwrap(), "tutor policy")
}

#[tokio::test]
async fn exchange_records_pairs_and_supplies_growing_context() {
    let service = ScriptedService::new(&["first reply", "second reply"]);
    let mut session = new_session(5);

    session.exchange(&service, "first question").await.unwrap();
    session.exchange(&service, "second question").await.unwrap();

    let requests = service.seen_requests();
    assert_eq!(requests.len(), 2);

    // First request carried no context, second carried the first pair
    assert!(requests[0].context.is_empty());
    assert_eq!(requests[1].context.len(), 2);
    assert_eq!(requests[1].context[0].text(), "first question");
    assert_eq!(requests[1].context[1].text(), "first reply");
    assert_eq!(requests[1].instruction, "tutor policy");

    assert_eq!(session.window().len(), 2);
}

#[tokio::test]
async fn failed_exchange_leaves_window_untouched() {
    let service = ScriptedService::new(&["only reply"]);
    let mut session = new_session(5);

    session.exchange(&service, "works").await.unwrap();
    let err = session.exchange(&service, "script is empty now").await;
    assert!(err.is_err());

    // Only the successful pair was recorded
    assert_eq!(session.window().len(), 1);
    assert_eq!(session.window().view()[0].text(), "works");
}

#[tokio::test]
async fn streamed_reply_is_recorded_once_and_whole() {
    let service = StreamingService {
        fragments: vec!["The ".to_string(), "answer ".to_string(), "is b.".to_string()],
    };
    let mut session = new_session(5);

    let mut observed = Vec::new();
    let reply = session
        .exchange_streaming(&service, "quiz me", |fragment| {
            observed.push(fragment.to_string());
        })
        .await
        .unwrap();

    assert_eq!(observed, vec!["The ", "answer ", "is b."]);
    assert_eq!(reply, "The answer is b.");

    // Recorded after the stream ended, as one pair
    let turns = session.window().view();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].text(), "The answer is b.");
}

#[tokio::test]
async fn interrupted_stream_records_nothing() {
    let mut session = new_session(5);

    let mut observed = Vec::new();
    let result = session
        .exchange_streaming(&InterruptedService, "quiz me", |fragment| {
            observed.push(fragment.to_string());
        })
        .await;

    assert!(result.is_err());
    // The first fragment reached the sink, but the window stayed clean
    assert_eq!(observed, vec!["partial "]);
    assert!(session.window().is_empty());
}

#[tokio::test]
async fn ingested_document_is_sent_then_evicted_by_later_exchanges() {
    let service = ScriptedService::new(&["r1", "r2"]);
    let mut session = new_session(2);

    session.ingest_document("PDF UPLOADED", "full textbook text");

    session.exchange(&service, "q1").await.unwrap();
    let requests = service.seen_requests();
    // The event pair was part of the first request's context
    assert_eq!(requests[0].context.len(), 2);
    assert_eq!(requests[0].context[0].role(), Role::Event);
    assert_eq!(
        requests[0].context[1].text(),
        "Content stored: full textbook text"
    );

    session.exchange(&service, "q2").await.unwrap();

    // Capacity 2: the document event has been evicted by the two exchanges
    let turns = session.window().view();
    assert!(turns.iter().all(|t| t.role() != Role::Event));
    // The session still tracks the active document blob
    assert_eq!(session.document().unwrap().text(), "full textbook text");
}

#[tokio::test]
async fn replacing_document_discards_previous_text() {
    let mut session = new_session(5);

    session.ingest_document("PDF UPLOADED", "old chapter");
    session.ingest_document("PDF UPLOADED", "new chapter");

    assert_eq!(session.document().unwrap().text(), "new chapter");
    // Both ingestion events went through the window
    assert_eq!(session.window().len(), 2);
}
