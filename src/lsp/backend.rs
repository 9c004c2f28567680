use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::notification::Notification;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{debug, info, warn};

use crate::config::{CheckerConfig, SETTINGS_SECTION};
use crate::lsp::refresh::spawn_periodic;
use crate::version::report::{FileEntry, Severity};
use crate::version::session::{CheckOutcome, CheckSession};
use crate::version::source::{FileSource, FsFileSource};

/// Run a check and return the full outcome
pub const CHECK_COMMAND: &str = "versionChecker.check";
/// Run a check and return the per-file entries
pub const SHOW_DETAILS_COMMAND: &str = "versionChecker.showDetails";
/// Open the file of an entry returned by `showDetails`
pub const OPEN_FILE_COMMAND: &str = "versionChecker.openFile";

/// Sent to the client after every pass
pub enum StatusNotification {}

impl Notification for StatusNotification {
    type Params = StatusParams;
    const METHOD: &'static str = "versionChecker/status";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusParams {
    pub status: String,
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl From<&CheckOutcome> for StatusParams {
    fn from(outcome: &CheckOutcome) -> Self {
        Self {
            status: outcome.status_name().to_string(),
            severity: outcome.severity(),
            summary: outcome.summary().to_string(),
            detail: outcome.detail().to_string(),
        }
    }
}

/// State shared by request handlers and the periodic task
struct Checker<F: FileSource> {
    client: Client,
    source: Arc<F>,
    session: RwLock<CheckSession>,
    /// Serializes passes; a later pass supersedes an earlier one
    pass: Mutex<()>,
}

impl<F: FileSource> Checker<F> {
    async fn check(&self) -> CheckOutcome {
        let _pass = self.pass.lock().await;
        let session = self.session.read().await.clone();

        let outcome = session.run(self.source.as_ref());

        self.client
            .log_message(
                MessageType::LOG,
                format!("Check: {} - {}", outcome.status_name(), outcome.summary()),
            )
            .await;
        self.client
            .send_notification::<StatusNotification>(StatusParams::from(&outcome))
            .await;

        outcome
    }
}

pub struct Backend<F: FileSource + 'static> {
    checker: Arc<Checker<F>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Backend<FsFileSource> {
    pub fn new(client: Client) -> Self {
        Self::build(client, Arc::new(FsFileSource))
    }
}

impl<F: FileSource + 'static> Backend<F> {
    /// Build a Backend with a custom file source
    pub fn build(client: Client, source: Arc<F>) -> Self {
        Self {
            checker: Arc::new(Checker {
                client,
                source,
                session: RwLock::new(CheckSession::default()),
                pass: Mutex::new(()),
            }),
            ticker: Mutex::new(None),
        }
    }

    pub fn server_capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                    ..Default::default()
                },
            )),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![
                    CHECK_COMMAND.to_string(),
                    SHOW_DETAILS_COMMAND.to_string(),
                    OPEN_FILE_COMMAND.to_string(),
                ],
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..Default::default()
        }
    }

    /// Stop the periodic task and start a new one for the current interval
    async fn restart_ticker(&self) {
        let mut ticker = self.ticker.lock().await;
        // Config is read under the ticker lock: the last restart runs on the newest snapshot
        let config = self.checker.session.read().await.config().clone();

        if let Some(handle) = ticker.take() {
            handle.abort();
        }

        if !config.enabled || config.check_interval == 0 {
            debug!("Periodic check disabled");
            return;
        }

        info!("Periodic check every {} ms", config.check_interval);
        let checker = self.checker.clone();
        *ticker = Some(spawn_periodic(
            Duration::from_millis(config.check_interval),
            move || {
                let checker = checker.clone();
                async move {
                    checker.check().await;
                }
            },
        ));
    }

    /// Read our settings section from the client
    async fn fetch_settings(&self) -> Value {
        let items = vec![ConfigurationItem {
            scope_uri: None,
            section: Some(SETTINGS_SECTION.to_string()),
        }];

        self.checker
            .client
            .configuration(items)
            .await
            .inspect_err(|e| warn!("Failed to fetch settings: {}", e))
            .ok()
            .and_then(|values| values.into_iter().next())
            .unwrap_or(Value::Null)
    }

    async fn parse_settings(&self, settings: Value) -> Option<CheckerConfig> {
        match CheckerConfig::from_settings(settings) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring invalid settings: {}", e);
                self.checker
                    .client
                    .show_message(
                        MessageType::WARNING,
                        format!("Invalid {} settings: {}", SETTINGS_SECTION, e),
                    )
                    .await;
                None
            }
        }
    }

    /// Ask the client to open the entry's file. Entries without a version open nothing.
    async fn open_entry(&self, entry: FileEntry) -> Result<bool> {
        let Some(path) = entry.open_target() else {
            debug!("Nothing to open for {}", entry.name);
            return Ok(false);
        };
        self.open_path(path).await
    }

    async fn open_path(&self, path: &Path) -> Result<bool> {
        let uri = Url::from_file_path(path)
            .map_err(|_| Error::invalid_params(format!("Not an absolute path: {:?}", path)))?;

        self.checker
            .client
            .show_document(ShowDocumentParams {
                uri,
                external: Some(false),
                take_focus: Some(true),
                selection: None,
            })
            .await
    }
}

#[allow(deprecated)]
fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok())
        .or_else(|| {
            params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok())
        })
}

#[tower_lsp::async_trait]
impl<F: FileSource + 'static> LanguageServer for Backend<F> {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = workspace_root(&params);
        info!("Workspace root: {:?}", root);

        let config = match params.initialization_options {
            Some(options) => self.parse_settings(options).await.unwrap_or_default(),
            None => CheckerConfig::default(),
        };
        *self.checker.session.write().await = CheckSession::new(config, root);

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(),
            server_info: Some(ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.checker
            .client
            .log_message(MessageType::INFO, "Version checker initialized")
            .await;
        self.checker.check().await;
        self.restart_ticker().await;
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
        info!("Shutting down");
        Ok(())
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        let Ok(path) = params.text_document.uri.to_file_path() else {
            return;
        };

        let should_check = self
            .checker
            .session
            .read()
            .await
            .should_check_on_save(&path);
        if should_check {
            debug!("Configured file saved: {:?}", path);
            self.checker.check().await;
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let settings = if params.settings.is_null() {
            self.fetch_settings().await
        } else {
            params.settings
        };

        let Some(config) = self.parse_settings(settings).await else {
            return;
        };

        {
            let mut session = self.checker.session.write().await;
            *session = session.with_config(config);
        }
        info!("Configuration reloaded");

        self.restart_ticker().await;
        self.checker.check().await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        match params.command.as_str() {
            CHECK_COMMAND => Ok(Some(self.checker.check().await.to_json())),
            SHOW_DETAILS_COMMAND => {
                let outcome = self.checker.check().await;
                let entries = serde_json::to_value(outcome.entries())
                    .map_err(|e| Error::invalid_params(e.to_string()))?;
                Ok(Some(entries))
            }
            OPEN_FILE_COMMAND => {
                let argument = params.arguments.into_iter().next().ok_or_else(|| {
                    Error::invalid_params(format!("{} expects a file entry", OPEN_FILE_COMMAND))
                })?;
                let opened = match argument {
                    Value::String(path) if self.checker.source.exists(Path::new(&path)) => {
                        self.open_path(Path::new(&path)).await?
                    }
                    Value::String(_) => false,
                    other => {
                        let entry: FileEntry = serde_json::from_value(other)
                            .map_err(|e| Error::invalid_params(e.to_string()))?;
                        self.open_entry(entry).await?
                    }
                };
                Ok(Some(Value::Bool(opened)))
            }
            other => Err(Error::invalid_params(format!("Unknown command: {}", other))),
        }
    }
}
