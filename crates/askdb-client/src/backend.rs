//! The backend contract: what a conversation engine needs from the remote
//! answering service, independent of how requests travel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Body of a `POST /chat` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's natural-language question, verbatim.
    pub message: String,
    /// Optional conversational context. Omitted from the wire when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
        }
    }
}

/// An unparsed chat answer. The service speaks more than one reply dialect,
/// so the body stays raw JSON here and is normalized by the reply parser.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawReply(pub serde_json::Value);

/// Acknowledgement body of `POST /clear-memory`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ClearMemoryReply {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Remote answering service.
///
/// Implementations classify every failure as a [`ClientError`] so callers can
/// distinguish "nobody answered" from "the service said no".
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a question and returns the raw reply body.
    async fn chat(&self, request: &ChatRequest) -> Result<RawReply, ClientError>;

    /// Probes service liveness. `Ok(())` means a 2xx answer came back.
    async fn health(&self) -> Result<(), ClientError>;

    /// Asks the service to forget its conversational memory.
    async fn clear_memory(&self) -> Result<ClearMemoryReply, ClientError>;
}

// ============================================================================
// Tests
// ============================================================================
