//! HTTP client for the remote answering service.
//!
//! Exposes the [`ChatBackend`] trait the conversation engine is written
//! against, plus the reqwest-based [`HttpBackend`] that implements it.
//! Failures are classified by [`ClientError`] so callers can tell an
//! unreachable server apart from one that rejected the request.

pub mod backend;
pub mod error;
pub mod http;

pub use backend::{ChatBackend, ChatRequest, ClearMemoryReply, RawReply};
pub use error::ClientError;
pub use http::HttpBackend;
