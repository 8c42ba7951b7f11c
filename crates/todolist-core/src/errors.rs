use thiserror::Error;
use todolist_shared::ResponseEnvelope;

use crate::app::{AppAction, RequestStatus};

/// Shown when a rejection carries no server message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Обратитесь к администратору.";

/// Outcome of a coordinating operation that did not commit.
///
/// By the time one of these is returned the status/error signal has already
/// been updated, so callers that only render state may drop it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("request rejected (result code {code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("task {task_id} not found in list {list_id}")]
    TaskNotFound { task_id: String, list_id: String },
}

pub fn server_message<T>(envelope: &ResponseEnvelope<T>) -> String {
    envelope
        .first_message()
        .unwrap_or(FALLBACK_ERROR_MESSAGE)
        .to_string()
}

/// Signal for an application-level rejection: first message (or the
/// fallback) plus a reset to `idle`.
pub fn handle_server_app_error<T>(envelope: &ResponseEnvelope<T>) -> Vec<AppAction> {
    app_error_message(server_message(envelope))
}

pub fn app_error_message(message: String) -> Vec<AppAction> {
    vec![
        AppAction::SetError(Some(message)),
        AppAction::SetStatus(RequestStatus::Idle),
    ]
}

/// Signal for a transport failure: `failed` plus the message verbatim.
pub fn handle_server_network_error(message: &str) -> Vec<AppAction> {
    vec![
        AppAction::SetStatus(RequestStatus::Failed),
        AppAction::SetError(Some(message.to_string())),
    ]
}

pub fn rejected<T>(envelope: &ResponseEnvelope<T>) -> OpError {
    OpError::Rejected {
        code: envelope.result_code,
        message: server_message(envelope),
    }
}
