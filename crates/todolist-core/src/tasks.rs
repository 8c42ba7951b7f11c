use std::collections::BTreeMap;

use todolist_shared::{TaskPriority, TaskRecord, TaskStatus, UpdateTaskModel};
use tracing::debug;

use crate::todolists::TodolistAction;

/// Task collections keyed by the owning list id.
pub type TasksState = BTreeMap<String, Vec<TaskRecord>>;

/// Partial task edit; `None` leaves the field as it is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateDomainTaskModel {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub start_date: Option<String>,
    pub deadline: Option<String>,
}

impl UpdateDomainTaskModel {
    pub fn apply_to(&self, task: &mut TaskRecord) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(start_date) = &self.start_date {
            task.start_date = Some(start_date.clone());
        }
        if let Some(deadline) = &self.deadline {
            task.deadline = Some(deadline.clone());
        }
    }

    /// Full payload for the remote update: current values overlaid with this edit.
    pub fn overlay(&self, current: &TaskRecord) -> UpdateTaskModel {
        let mut merged = current.clone();
        self.apply_to(&mut merged);
        UpdateTaskModel::from(&merged)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    SetTasks {
        list_id: String,
        tasks: Vec<TaskRecord>,
    },
    AddTask(TaskRecord),
    RemoveTask {
        task_id: String,
        list_id: String,
    },
    UpdateTask {
        task_id: String,
        list_id: String,
        model: UpdateDomainTaskModel,
    },
}

pub fn reduce(state: &TasksState, action: &TaskAction) -> TasksState {
    let mut next = state.clone();
    match action {
        TaskAction::SetTasks { list_id, tasks } => match next.get_mut(list_id) {
            Some(entry) => *entry = tasks.clone(),
            None => debug!(list_id = %list_id, "tasks for unknown list ignored"),
        },
        TaskAction::AddTask(task) => match next.get_mut(&task.todo_list_id) {
            Some(entry) => entry.insert(0, task.clone()),
            None => debug!(list_id = %task.todo_list_id, "task for unknown list ignored"),
        },
        TaskAction::RemoveTask { task_id, list_id } => {
            if let Some(entry) = next.get_mut(list_id) {
                entry.retain(|t| &t.id != task_id);
            }
        }
        TaskAction::UpdateTask {
            task_id,
            list_id,
            model,
        } => {
            if let Some(task) = next
                .get_mut(list_id)
                .and_then(|entry| entry.iter_mut().find(|t| &t.id == task_id))
            {
                model.apply_to(task);
            }
        }
    }
    next
}

/// Keeps the key set in step with the list collection.
pub fn reduce_list_action(state: &TasksState, action: &TodolistAction) -> Option<TasksState> {
    match action {
        TodolistAction::AddTodolist(record) => {
            let mut next = state.clone();
            next.insert(record.id.clone(), Vec::new());
            Some(next)
        }
        TodolistAction::RemoveTodolist(id) => {
            let mut next = state.clone();
            next.remove(id);
            Some(next)
        }
        TodolistAction::SetTodolists(records) => Some(
            records
                .iter()
                .map(|record| (record.id.clone(), Vec::new()))
                .collect(),
        ),
        TodolistAction::ChangeTitle { .. }
        | TodolistAction::ChangeFilter { .. }
        | TodolistAction::ChangeEntityStatus { .. } => None,
    }
}

pub fn find_task<'a>(state: &'a TasksState, list_id: &str, task_id: &str) -> Option<&'a TaskRecord> {
    state
        .get(list_id)
        .and_then(|entry| entry.iter().find(|t| t.id == task_id))
}
