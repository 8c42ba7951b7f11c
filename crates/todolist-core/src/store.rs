use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::trace;

use crate::app::{self, AppAction, AppState};
use crate::tasks::{self, TaskAction, TasksState};
use crate::todolists::{self, TodolistAction, TodolistEntity};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub app: AppState,
    pub todolists: Vec<TodolistEntity>,
    pub tasks: TasksState,
}

impl RootState {
    /// Task store keys equal list ids.
    pub fn keys_in_step(&self) -> bool {
        self.todolists.len() == self.tasks.len()
            && self
                .todolists
                .iter()
                .all(|tl| self.tasks.contains_key(&tl.id))
    }

    pub fn todolist(&self, id: &str) -> Option<&TodolistEntity> {
        self.todolists.iter().find(|tl| tl.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    App(AppAction),
    Todolist(TodolistAction),
    Task(TaskAction),
}

impl From<AppAction> for Action {
    fn from(action: AppAction) -> Self {
        Action::App(action)
    }
}

impl From<TodolistAction> for Action {
    fn from(action: TodolistAction) -> Self {
        Action::Todolist(action)
    }
}

impl From<TaskAction> for Action {
    fn from(action: TaskAction) -> Self {
        Action::Task(action)
    }
}

pub fn reduce(state: &RootState, action: &Action) -> RootState {
    match action {
        Action::App(action) => RootState {
            app: app::reduce(&state.app, action),
            ..state.clone()
        },
        Action::Todolist(action) => RootState {
            app: state.app.clone(),
            todolists: todolists::reduce(&state.todolists, action),
            tasks: tasks::reduce_list_action(&state.tasks, action)
                .unwrap_or_else(|| state.tasks.clone()),
        },
        Action::Task(action) => RootState {
            tasks: tasks::reduce(&state.tasks, action),
            ..state.clone()
        },
    }
}

/// Single owner of all client state. Every dispatch, including a batch, is
/// one transition under the lock.
#[derive(Debug)]
pub struct Store {
    state: Mutex<RootState>,
    version: watch::Sender<u64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(RootState::default())
    }
}

impl Store {
    pub fn new(initial: RootState) -> Self {
        let (version, _) = watch::channel(0);
        Self {
            state: Mutex::new(initial),
            version,
        }
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        self.dispatch_all([action.into()]);
    }

    pub fn dispatch_all<I>(&self, actions: I)
    where
        I: IntoIterator<Item = Action>,
    {
        let mut guard = self.state.lock();
        let mut next = guard.clone();
        let mut applied = 0usize;
        for action in actions {
            trace!(?action, "reducing action");
            next = reduce(&next, &action);
            applied += 1;
        }
        if applied == 0 {
            return;
        }
        *guard = next;
        drop(guard);
        self.version.send_modify(|v| *v += 1);
    }

    pub fn state(&self) -> RootState {
        self.state.lock().clone()
    }

    pub fn select<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Receiver that observes a new version after every committed dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
