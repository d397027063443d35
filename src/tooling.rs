//! Tooling Layer
//!
//! The shell command layer, its text rendering, and the `simfs` command-line
//! front-end built on top of them.

pub mod cli;
pub mod format;
pub mod shell;

pub use cli::{Cli, CliContext, Commands};
pub use shell::{tokenize, CommandOutput, Shell};
