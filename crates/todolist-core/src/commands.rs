mod tasks;
mod todolists;

use std::sync::Arc;

use tracing::warn;

use crate::api::{ApiError, TodolistApi};
use crate::errors::{self, OpError};
use crate::store::{Action, Store};

/// How the coordinating operations treat rejections and transport failures
/// on the paths where the established behaviour skips a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Commit and signal exactly as the established client does, including
    /// its unchecked result codes and unhandled transport failures.
    Literal,
    /// Check every result code; never commit a failed operation locally.
    #[default]
    Strict,
}

impl SyncPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPolicy::Literal => "literal",
            SyncPolicy::Strict => "strict",
        }
    }
}

impl std::str::FromStr for SyncPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" | "compat" => Ok(SyncPolicy::Literal),
            "strict" => Ok(SyncPolicy::Strict),
            other => Err(format!("unknown sync policy: {other}")),
        }
    }
}

/// Sequences remote calls with store commits and status/error signalling.
pub struct Coordinator<A> {
    api: A,
    store: Arc<Store>,
    policy: SyncPolicy,
}

impl<A: TodolistApi> Coordinator<A> {
    pub fn new(api: A, store: Arc<Store>, policy: SyncPolicy) -> Self {
        Self { api, store, policy }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn commit<I>(&self, actions: I)
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        self.store
            .dispatch_all(actions.into_iter().map(Into::into));
    }

    /// Transport failure routed through the network-error signal.
    fn network_failure(&self, message: String) -> OpError {
        self.commit(errors::handle_server_network_error(&message));
        OpError::Transport(message)
    }

    /// Transport failure on an operation that has no failure path under the
    /// literal policy: logged only, status stays where it was.
    fn unchecked_failure(&self, err: ApiError, operation: &'static str) -> OpError {
        let message = err.user_message();
        match self.policy {
            SyncPolicy::Literal => {
                warn!(operation, error = %err, "transport failure left unhandled");
                OpError::Transport(message)
            }
            SyncPolicy::Strict => self.network_failure(message),
        }
    }
}
