//! Presentation layer for luabridge
//!
//! This crate contains the CLI definition and the output formatters
//! for query answers and script failures.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
