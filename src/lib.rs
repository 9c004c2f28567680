pub mod config;
pub mod lsp;
pub mod version;
