//! Presentation layer for wellbeing-council
//!
//! This crate contains CLI definitions, output formatters, and progress
//! reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, parse_context_pair};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::ProgressReporter;
