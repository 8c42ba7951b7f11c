use todolist_shared::TaskRecord;
use tracing::{info, instrument, warn};

use super::{Coordinator, SyncPolicy};
use crate::api::TodolistApi;
use crate::app::{AppAction, RequestStatus};
use crate::errors::{self, OpError};
use crate::store::Action;
use crate::tasks::{TaskAction, UpdateDomainTaskModel, find_task};

impl<A: TodolistApi> Coordinator<A> {
    #[instrument(skip(self))]
    pub async fn fetch_tasks(&self, list_id: &str) -> Result<(), OpError> {
        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        let response = match self.api.get_tasks(list_id).await {
            Ok(response) => response,
            Err(err) => return Err(self.unchecked_failure(err, "fetch_tasks")),
        };

        if self.policy == SyncPolicy::Strict
            && let Some(message) = response.error.filter(|m| !m.is_empty())
        {
            self.commit(errors::app_error_message(message.clone()));
            return Err(OpError::Rejected { code: 1, message });
        }

        info!(list_id, count = response.items.len(), "fetched tasks");
        self.commit([
            Action::from(TaskAction::SetTasks {
                list_id: list_id.to_string(),
                tasks: response.items,
            }),
            Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
        ]);
        Ok(())
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    pub async fn add_task(&self, title: &str, list_id: &str) -> Result<TaskRecord, OpError> {
        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        let envelope = match self.api.create_task(list_id, title).await {
            Ok(envelope) => envelope,
            Err(err) => return Err(self.network_failure(err.user_message())),
        };

        if !envelope.is_ok() {
            info!(list_id, code = envelope.result_code, "create task rejected");
            self.commit(errors::handle_server_app_error(&envelope));
            return Err(errors::rejected(&envelope));
        }

        let Some(task) = envelope.data.item else {
            return Err(self.network_failure("create task response carried no item".to_string()));
        };

        info!(list_id, task_id = %task.id, "task created");
        self.commit([
            Action::from(TaskAction::AddTask(task.clone())),
            Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
        ]);
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn remove_task(&self, task_id: &str, list_id: &str) -> Result<(), OpError> {
        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        let envelope = match self.api.delete_task(list_id, task_id).await {
            Ok(envelope) => envelope,
            Err(err) => return Err(self.unchecked_failure(err, "remove_task")),
        };

        if !envelope.is_ok() {
            match self.policy {
                SyncPolicy::Literal => {
                    warn!(
                        list_id,
                        task_id,
                        code = envelope.result_code,
                        "delete task rejected; removing locally anyway"
                    );
                }
                SyncPolicy::Strict => {
                    info!(list_id, task_id, code = envelope.result_code, "delete task rejected");
                    self.commit(errors::handle_server_app_error(&envelope));
                    return Err(errors::rejected(&envelope));
                }
            }
        }

        self.commit([
            Action::from(TaskAction::RemoveTask {
                task_id: task_id.to_string(),
                list_id: list_id.to_string(),
            }),
            Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
        ]);
        Ok(())
    }

    #[instrument(skip(self, model))]
    pub async fn update_task(
        &self,
        task_id: &str,
        list_id: &str,
        model: UpdateDomainTaskModel,
    ) -> Result<(), OpError> {
        let Some(payload) = self
            .store
            .select(|s| find_task(&s.tasks, list_id, task_id).map(|task| model.overlay(task)))
        else {
            warn!(list_id, task_id, "task not found in the state");
            return Err(OpError::TaskNotFound {
                task_id: task_id.to_string(),
                list_id: list_id.to_string(),
            });
        };

        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        let envelope = match self.api.update_task(list_id, task_id, &payload).await {
            Ok(envelope) => envelope,
            Err(err) => return Err(self.network_failure(err.user_message())),
        };

        if !envelope.is_ok() {
            info!(list_id, task_id, code = envelope.result_code, "update task rejected");
            self.commit(errors::handle_server_app_error(&envelope));
            return Err(errors::rejected(&envelope));
        }

        self.commit([
            Action::from(TaskAction::UpdateTask {
                task_id: task_id.to_string(),
                list_id: list_id.to_string(),
                model,
            }),
            Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
        ]);
        Ok(())
    }
}
