use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Idle => "idle",
            RequestStatus::Loading => "loading",
            RequestStatus::Succeeded => "succeeded",
            RequestStatus::Failed => "failed",
        }
    }
}

/// Process-wide request lifecycle and last error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AppState {
    pub status: RequestStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    SetStatus(RequestStatus),
    SetError(Option<String>),
}

pub fn reduce(state: &AppState, action: &AppAction) -> AppState {
    match action {
        AppAction::SetStatus(status) => AppState {
            status: *status,
            ..state.clone()
        },
        AppAction::SetError(error) => AppState {
            error: error.clone(),
            ..state.clone()
        },
    }
}
