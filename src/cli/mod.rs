//! CLI module
//!
//! Command-line interface over the bucket and captioner providers.
//!
//! # Commands
//!
//! - `gather` - List every resolved resource
//! - `captions` - List resources with their captions (JSON lines)
//! - `caption` - Caption one resource
//! - `attributes` - Size and modification time of one media file
//! - `fetch` - Download one media file

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
