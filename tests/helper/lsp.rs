//! LSP request/notification test utilities

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::{Request, Response};
use tower_lsp::lsp_types::*;

use version_checker::lsp::backend::StatusParams;

/// Create an LSP initialize request rooted at `root`
pub fn create_initialize_request(id: i64, root: &Path, options: Value) -> Request {
    let params: InitializeParams = serde_json::from_value(json!({
        "capabilities": {},
        "rootUri": Url::from_directory_path(root).unwrap(),
        "initializationOptions": options,
    }))
    .unwrap();

    Request::build("initialize")
        .id(id)
        .params(serde_json::to_value(params).unwrap())
        .finish()
}

/// Create an LSP initialized notification
pub fn create_initialized_notification() -> Request {
    Request::build("initialized")
        .params(serde_json::to_value(InitializedParams {}).unwrap())
        .finish()
}

/// Create an LSP didSave notification for `path`
pub fn create_did_save_notification(path: &Path) -> Request {
    Request::build("textDocument/didSave")
        .params(
            serde_json::to_value(DidSaveTextDocumentParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::from_file_path(path).unwrap(),
                },
                text: None,
            })
            .unwrap(),
        )
        .finish()
}

/// Create an LSP didChangeConfiguration notification
pub fn create_did_change_configuration_notification(settings: Value) -> Request {
    Request::build("workspace/didChangeConfiguration")
        .params(serde_json::to_value(DidChangeConfigurationParams { settings }).unwrap())
        .finish()
}

/// Create an LSP executeCommand request
pub fn create_execute_command_request(id: i64, command: &str, arguments: Vec<Value>) -> Request {
    Request::build("workspace/executeCommand")
        .id(id)
        .params(json!({ "command": command, "arguments": arguments }))
        .finish()
}

/// Unwrap the result of a successful response
pub fn response_result(response: Option<Response>) -> Value {
    let (_, result) = response.expect("expected a response").into_parts();
    result.expect("expected a successful response")
}

/// Collect notifications in background and return a receiver
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::Receiver<Request> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        while let Some(notification) = socket.next().await {
            if tx.send(notification).await.is_err() {
                break;
            }
        }
    });

    rx
}

/// Wait for a notification with the specified method name from the receiver
pub async fn wait_for_notification(
    rx: &mut mpsc::Receiver<Request>,
    method: &str,
) -> Option<Request> {
    let timeout_duration = Duration::from_secs(5);

    loop {
        match timeout(timeout_duration, rx.recv()).await {
            Ok(Some(notification)) => {
                if notification.method() == method {
                    return Some(notification);
                }
                // Skip other notifications (like log_message)
            }
            _ => return None,
        }
    }
}

/// Wait for the next `versionChecker/status` notification
pub async fn wait_for_status(rx: &mut mpsc::Receiver<Request>) -> StatusParams {
    let notification = wait_for_notification(rx, "versionChecker/status")
        .await
        .expect("expected a status notification");
    serde_json::from_value(notification.params().cloned().unwrap()).unwrap()
}
