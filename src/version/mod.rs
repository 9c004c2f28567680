//! Version reconciliation across project files
//!
//! Reads every configured file, extracts its version with the configured
//! patterns, and decides whether all files agree.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│  Extractor  │     │   Checker   │────▶│   Report    │
//! │ (read files)│     │   (regex)   │     │ (classify)  │     │  (render)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!        │                                       ▲
//!        └───────────── ResolutionSet ───────────┘
//! ```
//!
//! # Modules
//!
//! - [`extractor`]: Ordered regex extraction with per-pattern fallback
//! - [`resolver`]: Reads configured files and builds the `ResolutionSet`
//! - [`checker`]: Status classification and grouping by version
//! - [`report`]: Summary, detail and per-file entries for display
//! - [`session`]: Host-owned configuration snapshot that runs whole passes
//! - [`source`]: File access trait and its filesystem implementation
//! - [`error`]: Error types for pattern and read failures
//! - [`types`]: Common types like `FileResult` and `ResolutionSet`

pub mod checker;
pub mod error;
pub mod extractor;
pub mod report;
pub mod resolver;
pub mod session;
pub mod source;
pub mod types;
