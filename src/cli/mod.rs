//! # CLI Module
//!
//! The `routemap` command line: compile declaration files, print the table
//! in match order, resolve requests and build URLs.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the compiled table, one line per entry, in final match order:
//!
//! ```bash
//! routemap --decl routes/app.yaml --decl routes/admin.yaml routes
//! ```
//!
//! ### `match`
//!
//! Resolve a request to its handler and parameters:
//!
//! ```bash
//! routemap --decl routes/app.yaml match --method GET --path /articles/42
//! ```
//!
//! Exits with status 1 when no route matches.
//!
//! ### `url`
//!
//! Build a URL for a handler:
//!
//! ```bash
//! routemap --decl routes/app.yaml url --handler ArticlesShow --arg id=42
//! ```
//!
//! ### `check`
//!
//! Compile the declarations and report the first invalid one, without
//! touching the cache:
//!
//! ```bash
//! routemap --config routemap.toml check
//! ```
//!
//! ## Common Options
//!
//! - `--decl <FILE>` - Declaration file, repeatable; merged in the order given
//! - `--config <FILE>` - TOML configuration (see [`crate::runtime_config`])
//! - `--cache <FILE>` - Route cache location
//! - `--no-cache` - Neither read nor write the cache
//!
//! `ROUTEMAP_*` environment variables apply on top of `--config`; flags
//! apply last.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands, SourceArgs};
