use tracing::{debug, instrument};

use crate::api::TodolistApi;
use crate::cli::Command;
use crate::commands::Coordinator;
use crate::errors::OpError;

/// What the caller should render once a command has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Lists,
    Tasks(String),
}

/// Loads the state a command needs, then runs the command's coordinating
/// operation.
#[instrument(skip(coordinator))]
pub async fn execute<A: TodolistApi>(
    coordinator: &Coordinator<A>,
    command: &Command,
) -> Result<View, OpError> {
    coordinator.fetch_todolists().await?;
    if let Some(list_id) = command.list_scope() {
        debug!(list_id, "loading tasks for command scope");
        coordinator.fetch_tasks(list_id).await?;
    }

    let view = match command {
        Command::Lists => View::Lists,
        Command::AddList { title } => {
            coordinator.add_todolist(title).await?;
            View::Lists
        }
        Command::RmList { list_id } => {
            coordinator.remove_todolist(list_id).await?;
            View::Lists
        }
        Command::RenameList { list_id, title } => {
            coordinator.change_todolist_title(list_id, title).await?;
            View::Lists
        }
        Command::Filter { list_id, filter } => {
            coordinator.change_todolist_filter(list_id, *filter);
            View::Tasks(list_id.clone())
        }
        Command::Tasks { list_id } => View::Tasks(list_id.clone()),
        Command::AddTask { list_id, title } => {
            coordinator.add_task(title, list_id).await?;
            View::Tasks(list_id.clone())
        }
        Command::RmTask { list_id, task_id } => {
            coordinator.remove_task(task_id, list_id).await?;
            View::Tasks(list_id.clone())
        }
        Command::UpdateTask {
            list_id,
            task_id,
            fields,
        } => {
            coordinator
                .update_task(task_id, list_id, fields.clone().into())
                .await?;
            View::Tasks(list_id.clone())
        }
    };

    Ok(view)
}
