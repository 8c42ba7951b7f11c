//! Error notification model.
//!
//! Mirrors the alert the UI shows for the global error field: open while an
//! error is set, anchored top-center, gone after a fixed window or when the
//! user closes it.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::app::AppAction;
use crate::store::Store;

pub const AUTO_HIDE_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub vertical: Vertical,
    pub horizontal: Horizontal,
}

pub const ANCHOR: Anchor = Anchor {
    vertical: Vertical::Top,
    horizontal: Horizontal::Center,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The auto-hide window elapsed.
    Timeout,
    /// The user pressed the alert's close control.
    Manual,
    /// An interaction somewhere outside the alert.
    ClickAway,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub message: String,
    pub anchor: Anchor,
    pub auto_hide: Duration,
}

impl ErrorNotice {
    pub fn current(store: &Store) -> Option<Self> {
        store.select(|s| s.app.error.clone()).map(|message| Self {
            message,
            anchor: ANCHOR,
            auto_hide: AUTO_HIDE_AFTER,
        })
    }
}

/// Returns whether the close was honoured.
#[instrument(skip(store))]
pub fn close(store: &Store, reason: CloseReason) -> bool {
    if reason == CloseReason::ClickAway {
        debug!("ignoring click-away close");
        return false;
    }
    store.dispatch(AppAction::SetError(None));
    true
}

/// Clears each shown error once it has been visible for `hide_after`.
/// A different error restarts the window; unrelated dispatches do not.
/// A window too long to schedule never elapses. Ends when the store is
/// dropped.
pub async fn run_auto_dismiss(store: Arc<Store>, hide_after: Duration) {
    let mut changes = store.subscribe();
    let store: Weak<Store> = Arc::downgrade(&store);
    let mut pending: Option<(String, Option<Instant>)> = None;
    loop {
        let Some(shown) = store.upgrade().map(|s| s.select(|s| s.app.error.clone())) else {
            return;
        };
        pending = match (shown, pending.take()) {
            (None, _) => None,
            (Some(message), Some((prev, deadline))) if prev == message => Some((prev, deadline)),
            (Some(message), _) => {
                let deadline = Instant::now().checked_add(hide_after);
                if deadline.is_none() {
                    debug!(?hide_after, "auto-hide window out of range; notice stays open");
                }
                Some((message, deadline))
            }
        };

        let Some((message, Some(deadline))) = pending.as_ref() else {
            if changes.changed().await.is_err() {
                return;
            }
            continue;
        };

        tokio::select! {
            _ = tokio::time::sleep_until(*deadline) => {
                let Some(store) = store.upgrade() else {
                    return;
                };
                let still_shown =
                    store.select(|s| s.app.error.as_deref() == Some(message.as_str()));
                if still_shown {
                    debug!(message = %message, "auto-dismissing error notice");
                    close(&store, CloseReason::Timeout);
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }
    }
}
