//! Conversation engine: the transcript state machine around one backend.
//!
//! A send appends the user's question and a pending assistant placeholder,
//! awaits the backend, then replaces the placeholder with exactly one
//! resolved or failed assistant message. Failures are classified into
//! user-facing notifications, and transport-level failures also flip the
//! connectivity flag. Side effects land in an event outbox the caller drains
//! with [`ConversationEngine::take_events`].

use chrono::Utc;
use tracing::{info, warn};

use askdb_client::{ChatBackend, ChatRequest, ClientError};
use askdb_core::events::{ChatEvent, Severity};
use askdb_core::types::{Connectivity, Message, MessageId};

use crate::parser::parse_reply;

/// Assistant text appended after a failed send.
const APOLOGY: &str =
    "Sorry, something went wrong while processing your request. Please check the connection to the server.";

const CONNECTION_ERROR_TITLE: &str = "Connection error";
const CONNECTION_ERROR_BODY: &str =
    "Could not connect to the server. Check that the backend is running.";
const SERVER_ERROR_TITLE: &str = "Server error";
const SERVER_ERROR_BODY: &str = "The server is temporarily unavailable. Try again later.";
const REQUEST_ERROR_TITLE: &str = "Error";
const MEMORY_CLEAR_ERROR_BODY: &str = "Could not clear the conversation memory.";

/// What a call to [`ConversationEngine::send`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a send already in flight; the transcript is unchanged.
    Ignored,
    /// The reply arrived and was appended as the given assistant message.
    Answered(MessageId),
    /// The request failed; an apology was appended as the given message.
    Failed(MessageId),
}

/// Single-conversation state machine over a [`ChatBackend`].
pub struct ConversationEngine<B: ChatBackend> {
    backend: B,
    messages: Vec<Message>,
    pending: Option<MessageId>,
    connectivity: Connectivity,
    events: Vec<ChatEvent>,
}

impl<B: ChatBackend> ConversationEngine<B> {
    /// Creates an engine with an empty transcript. Connectivity starts
    /// healthy until a probe or a send says otherwise.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            pending: None,
            connectivity: Connectivity::default(),
            events: Vec::new(),
        }
    }

    /// Sends a question to the backend and appends the outcome.
    ///
    /// Blank input and overlapping sends are ignored. On success the pending
    /// placeholder is replaced by a resolved assistant message; on failure by
    /// an apology, with exactly one notification raised for the failure.
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let question = text.trim();
        if question.is_empty() || self.pending.is_some() {
            return SendOutcome::Ignored;
        }

        self.messages.push(Message::user(question));
        let placeholder = Message::pending_assistant();
        let placeholder_id = placeholder.id;
        self.pending = Some(placeholder_id);
        self.messages.push(placeholder);

        let request = ChatRequest::new(question);
        let outcome = match self.backend.chat(&request).await {
            Ok(raw) => {
                let reply = parse_reply(&raw.0);
                info!(
                    success = reply.success,
                    tool = %reply.tool_used,
                    rows = reply.rows.len(),
                    "Reply received"
                );

                self.remove_message(placeholder_id);
                let message = Message::resolved_assistant(reply);
                let message_id = message.id;
                self.events.push(ChatEvent::ReplyReceived {
                    message_id,
                    success: message.reply.as_ref().map(|r| r.success).unwrap_or(false),
                    has_visualization: message
                        .reply
                        .as_ref()
                        .map(|r| r.visualization.is_some())
                        .unwrap_or(false),
                    timestamp: Utc::now(),
                });
                self.messages.push(message);
                self.set_connectivity(Connectivity::Healthy);
                SendOutcome::Answered(message_id)
            }
            Err(error) => {
                self.remove_message(placeholder_id);
                self.notify_failure(&error);
                let message = Message::failed_assistant(APOLOGY);
                let message_id = message.id;
                self.messages.push(message);
                SendOutcome::Failed(message_id)
            }
        };

        self.pending = None;
        outcome
    }

    /// Discards the local transcript. The backend's conversational memory is
    /// untouched; see [`ConversationEngine::clear_memory`] for that. Also
    /// drops any stale pending state left by a cancelled send.
    pub fn clear(&mut self) {
        let discarded = self.messages.len();
        self.messages.clear();
        self.pending = None;
        info!(discarded, "Transcript cleared");
        self.events.push(ChatEvent::TranscriptCleared {
            discarded,
            timestamp: Utc::now(),
        });
    }

    /// Asks the backend to forget its conversational memory. Best-effort:
    /// a request failure raises one generic notification and the outcome is
    /// reported as an event, never as an error.
    pub async fn clear_memory(&mut self) -> bool {
        let success = match self.backend.clear_memory().await {
            Ok(ack) => {
                info!(success = ack.success, message = %ack.message, "Memory clear acknowledged");
                ack.success
            }
            Err(error) => {
                warn!(%error, "Memory clear failed");
                self.events.push(ChatEvent::notification(
                    Severity::Error,
                    REQUEST_ERROR_TITLE,
                    MEMORY_CLEAR_ERROR_BODY,
                ));
                false
            }
        };
        self.events.push(ChatEvent::MemoryCleared {
            success,
            timestamp: Utc::now(),
        });
        success
    }

    /// Probes the backend health endpoint and updates connectivity both
    /// ways. Returns whether the backend answered 2xx.
    pub async fn check_connection(&mut self) -> bool {
        let healthy = self.backend.health().await.is_ok();
        self.set_connectivity(if healthy {
            Connectivity::Healthy
        } else {
            Connectivity::Unreachable
        });
        healthy
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a send is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Drains accumulated events in emission order.
    pub fn take_events(&mut self) -> Vec<ChatEvent> {
        std::mem::take(&mut self.events)
    }

    // -- Private helpers --

    fn remove_message(&mut self, id: MessageId) {
        self.messages.retain(|message| message.id != id);
    }

    /// Classifies a failed send into exactly one notification. Only
    /// transport-level failures touch connectivity.
    fn notify_failure(&mut self, error: &ClientError) {
        match error {
            ClientError::Status { status, .. } if *status >= 500 => {
                warn!(status, "Server error from backend");
                self.events.push(ChatEvent::notification(
                    Severity::Error,
                    SERVER_ERROR_TITLE,
                    SERVER_ERROR_BODY,
                ));
            }
            ClientError::Status { status, message } => {
                warn!(status, %message, "Backend rejected the request");
                self.events.push(ChatEvent::notification(
                    Severity::Error,
                    REQUEST_ERROR_TITLE,
                    message.clone(),
                ));
            }
            ClientError::Unreachable(_) | ClientError::Decode(_) => {
                warn!(%error, "Backend unreachable");
                self.set_connectivity(Connectivity::Unreachable);
                self.events.push(ChatEvent::notification(
                    Severity::Error,
                    CONNECTION_ERROR_TITLE,
                    CONNECTION_ERROR_BODY,
                ));
            }
        }
    }

    fn set_connectivity(&mut self, connectivity: Connectivity) {
        if self.connectivity != connectivity {
            info!(healthy = connectivity.is_healthy(), "Connectivity changed");
            self.connectivity = connectivity;
            self.events.push(ChatEvent::ConnectivityChanged {
                connectivity,
                timestamp: Utc::now(),
            });
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
