//! Bounded conversation context window
//!
//! This module implements the sliding window of recent exchanges that is
//! supplied as conversational memory to every model call. The window holds
//! complete (user, assistant) pairs and evicts the oldest pair first once
//! capacity is reached.

use std::collections::VecDeque;

use crate::error::{Result, TutoraError};

/// Role of a single message unit in the context window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Input typed by the user
    User,
    /// Text generated by the model
    Assistant,
    /// Synthetic context injection (e.g. an ingested document)
    Event,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Event => write!(f, "event"),
        }
    }
}

/// One role-tagged message unit
///
/// Turns are immutable once created; the window hands out clones, so a copy
/// taken by a caller can never disturb the window's internal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    /// Creates a user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use tutora::session::{Role, Turn};
    ///
    /// let turn = Turn::user("What is momentum?");
    /// assert_eq!(turn.role(), Role::User);
    /// ```
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Creates an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// Creates a synthetic event turn
    pub fn event(text: impl Into<String>) -> Self {
        Self {
            role: Role::Event,
            text: text.into(),
        }
    }

    /// Role of this turn
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text content of this turn
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Bounded FIFO window of conversation pairs
///
/// The window stores up to `capacity` pairs of turns. Recording a new pair
/// when the window is full evicts the oldest pair, preserving the relative
/// order of the remainder. Event pairs (document ingestions) ride through
/// the same window and are evicted on exactly the same terms as ordinary
/// conversation, so an ingested document silently falls out of context after
/// `capacity` further exchanges.
///
/// # Examples
///
/// ```
/// use tutora::session::ContextWindow;
///
/// let mut window = ContextWindow::new(2).unwrap();
/// window.record("A?", "A.");
/// window.record("B?", "B.");
/// window.record("C?", "C.");
///
/// let turns = window.view();
/// assert_eq!(turns.len(), 4);
/// assert_eq!(turns[0].text(), "B?");
/// ```
#[derive(Debug, Clone)]
pub struct ContextWindow {
    pairs: VecDeque<(Turn, Turn)>,
    capacity: usize,
}

impl ContextWindow {
    /// Creates a window holding at most `capacity` pairs
    ///
    /// # Errors
    ///
    /// Returns `TutoraError::InvalidConfiguration` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(TutoraError::InvalidConfiguration(
                "context window capacity must be at least one pair".to_string(),
            )
            .into());
        }

        Ok(Self {
            pairs: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Records one completed exchange as an atomic (user, assistant) pair
    ///
    /// Any text is accepted, including empty strings. Never fails; when the
    /// window is full the oldest pair is evicted first.
    pub fn record(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.push_pair(Turn::user(user_text), Turn::assistant(assistant_text));
    }

    /// Records a non-conversational context injection
    ///
    /// The pair is made of two event turns: the ingestion marker and the
    /// stored payload. Event pairs participate in eviction exactly like
    /// ordinary exchanges.
    pub fn record_event(&mut self, label: impl Into<String>, payload: impl Into<String>) {
        self.push_pair(Turn::event(label), Turn::event(payload));
    }

    fn push_pair(&mut self, first: Turn, second: Turn) {
        if self.pairs.len() == self.capacity {
            if let Some((evicted, _)) = self.pairs.pop_front() {
                tracing::debug!(
                    role = %evicted.role(),
                    "Evicting oldest pair from context window"
                );
            }
        }
        self.pairs.push_back((first, second));
    }

    /// Returns a snapshot of the window contents in chronological order
    ///
    /// The snapshot reflects the state as of the call; turns are cloned out,
    /// so the caller cannot mutate the window through it. The returned length
    /// is always even: pairs are recorded atomically and never split.
    pub fn view(&self) -> Vec<Turn> {
        self.pairs
            .iter()
            .flat_map(|(first, second)| [first.clone(), second.clone()])
            .collect()
    }

    /// Maximum number of pairs this window holds, fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of pairs currently in the window
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
