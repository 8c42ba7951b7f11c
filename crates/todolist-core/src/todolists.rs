use serde::{Deserialize, Serialize};
use todolist_shared::{ListRecord, TaskRecord, TaskStatus};

use crate::app::RequestStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterValue {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterValue::All => "all",
            FilterValue::Active => "active",
            FilterValue::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &TaskRecord) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::Active => task.status != TaskStatus::Completed,
            FilterValue::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl std::str::FromStr for FilterValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterValue::All),
            "active" => Ok(FilterValue::Active),
            "completed" => Ok(FilterValue::Completed),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// A list record plus the client-only fields the UI tracks for it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodolistEntity {
    pub id: String,
    pub title: String,
    pub added_date: String,
    pub order: i64,
    pub filter: FilterValue,
    pub entity_status: RequestStatus,
}

impl TodolistEntity {
    pub fn from_record(record: ListRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            added_date: record.added_date,
            order: record.order,
            filter: FilterValue::All,
            entity_status: RequestStatus::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodolistAction {
    SetTodolists(Vec<ListRecord>),
    AddTodolist(ListRecord),
    RemoveTodolist(String),
    ChangeTitle { id: String, title: String },
    ChangeFilter { id: String, filter: FilterValue },
    ChangeEntityStatus { id: String, status: RequestStatus },
}

pub fn reduce(state: &[TodolistEntity], action: &TodolistAction) -> Vec<TodolistEntity> {
    match action {
        TodolistAction::SetTodolists(records) => records
            .iter()
            .cloned()
            .map(TodolistEntity::from_record)
            .collect(),
        TodolistAction::AddTodolist(record) => {
            let mut next = Vec::with_capacity(state.len() + 1);
            next.push(TodolistEntity::from_record(record.clone()));
            next.extend(state.iter().cloned());
            next
        }
        TodolistAction::RemoveTodolist(id) => {
            state.iter().filter(|tl| &tl.id != id).cloned().collect()
        }
        TodolistAction::ChangeTitle { id, title } => map_matching(state, id, |tl| {
            tl.title = title.clone();
        }),
        TodolistAction::ChangeFilter { id, filter } => map_matching(state, id, |tl| {
            tl.filter = *filter;
        }),
        TodolistAction::ChangeEntityStatus { id, status } => map_matching(state, id, |tl| {
            tl.entity_status = *status;
        }),
    }
}

fn map_matching<F>(state: &[TodolistEntity], id: &str, mut edit: F) -> Vec<TodolistEntity>
where
    F: FnMut(&mut TodolistEntity),
{
    state
        .iter()
        .map(|tl| {
            let mut tl = tl.clone();
            if tl.id == id {
                edit(&mut tl);
            }
            tl
        })
        .collect()
}

/// Tasks of one list as the list's active filter presents them.
pub fn visible_tasks<'a>(tasks: &'a [TaskRecord], filter: FilterValue) -> Vec<&'a TaskRecord> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolist_shared::TaskPriority;

    fn record(id: &str, title: &str, order: i64) -> ListRecord {
        ListRecord {
            id: id.to_string(),
            title: title.to_string(),
            added_date: "2024-01-01T00:00:00".to_string(),
            order,
        }
    }

    fn task(id: &str, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            todo_list_id: "L1".to_string(),
            title: id.to_string(),
            description: None,
            status,
            priority: TaskPriority::Low,
            start_date: None,
            deadline: None,
            order: 0,
            added_date: String::new(),
        }
    }

    #[test]
    fn set_todolists_stamps_defaults_and_keeps_order() {
        let state = reduce(
            &[],
            &TodolistAction::SetTodolists(vec![record("L1", "Work", 0), record("L2", "Home", -1)]),
        );
        assert_eq!(state.len(), 2);
        assert_eq!(state[0].id, "L1");
        assert_eq!(state[1].id, "L2");
        assert_eq!(state[1].order, -1);
        assert!(state.iter().all(|tl| tl.filter == FilterValue::All));
        assert!(state.iter().all(|tl| tl.entity_status == RequestStatus::Idle));
    }

    #[test]
    fn add_todolist_goes_to_front() {
        let start = reduce(
            &[],
            &TodolistAction::SetTodolists(vec![record("L1", "Work", 5), record("L2", "Home", 9)]),
        );
        let next = reduce(&start, &TodolistAction::AddTodolist(record("L3", "New", 100)));
        assert_eq!(next[0].id, "L3");
        assert_eq!(next.len(), 3);
        assert_eq!(start.len(), 2);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let start = reduce(&[], &TodolistAction::SetTodolists(vec![record("L1", "Work", 0)]));
        let next = reduce(&start, &TodolistAction::RemoveTodolist("nope".to_string()));
        assert_eq!(next, start);
    }

    #[test]
    fn field_edits_touch_only_the_matching_list() {
        let start = reduce(
            &[],
            &TodolistAction::SetTodolists(vec![record("L1", "Work", 0), record("L2", "Home", 1)]),
        );
        let next = reduce(
            &start,
            &TodolistAction::ChangeTitle {
                id: "L2".to_string(),
                title: "Family".to_string(),
            },
        );
        let next = reduce(
            &next,
            &TodolistAction::ChangeFilter {
                id: "L2".to_string(),
                filter: FilterValue::Completed,
            },
        );
        let next = reduce(
            &next,
            &TodolistAction::ChangeEntityStatus {
                id: "L2".to_string(),
                status: RequestStatus::Loading,
            },
        );

        assert_eq!(next[0], start[0]);
        assert_eq!(next[1].title, "Family");
        assert_eq!(next[1].filter, FilterValue::Completed);
        assert_eq!(next[1].entity_status, RequestStatus::Loading);
        assert_eq!(start[1].title, "Home");
    }

    #[test]
    fn visible_tasks_follow_filter() {
        let tasks = vec![task("a", TaskStatus::New), task("b", TaskStatus::Completed)];
        assert_eq!(visible_tasks(&tasks, FilterValue::All).len(), 2);

        let active = visible_tasks(&tasks, FilterValue::Active);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "a");

        let done = visible_tasks(&tasks, FilterValue::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "b");
    }
}
