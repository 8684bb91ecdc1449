pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::AskdbConfig;
pub use error::{AskdbError, Result};
pub use events::{ChatEvent, Severity};
pub use types::*;
