//! LSP (Language Server Protocol) host layer
//!
//! Runs version checks in response to editor events and reports the result
//! back to the client.
//!
//! # Modules
//!
//! - [`backend`]: `LanguageServer` implementation: triggers, commands, status notification
//! - [`refresh`]: Periodic re-check task
//! - [`server`]: LSP server initialization and logging

pub mod backend;
pub mod refresh;
pub mod server;
