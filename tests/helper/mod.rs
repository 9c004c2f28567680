#![allow(dead_code)]

pub mod lsp;
pub mod workspace;

pub use lsp::*;
pub use workspace::*;
