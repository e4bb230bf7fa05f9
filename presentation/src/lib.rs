//! Presentation layer for docqa
//!
//! This crate contains the CLI definition, the transcript formatter,
//! progress reporters, and the interactive chat interface. Everything here
//! renders [`SessionSnapshot`](docqa_domain::SessionSnapshot)s and forwards
//! user intents to the
//! [`SessionController`](docqa_application::SessionController).

pub mod chat;
pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, FileLoader, ReplCommand, cancel_on_ctrl_c};
pub use cli::commands::{Cli, OutputFormat};
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
