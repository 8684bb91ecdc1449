//! Conversation engine and reply normalization.
//!
//! [`ConversationEngine`] owns the transcript state machine: each send
//! appends the question and a pending placeholder, awaits the backend, and
//! replaces the placeholder with a resolved reply or an apology. [`parser`]
//! normalizes the service's two reply dialects into one envelope.

pub mod engine;
pub mod parser;

pub use engine::{ConversationEngine, SendOutcome};
pub use parser::parse_reply;
