//! LSP server bootstrap

use anyhow::Context;
use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{LOG_FILE_NAME, data_dir, log_path};
use crate::lsp::backend::Backend;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "VERSION_CHECKER_LOG";

/// Serve LSP over stdin/stdout until the client disconnects
pub async fn run_server() -> anyhow::Result<()> {
    let _guard = init_file_logging()?;
    info!(
        "Starting {} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("Server stopped");
    Ok(())
}

/// Log to a file so stdout stays reserved for the LSP transport
fn init_file_logging() -> anyhow::Result<WorkerGuard> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {:?}", dir))?;

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("version_checker=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("Failed to initialize logging")?;

    info!("Logging to {:?}", log_path());
    Ok(guard)
}
