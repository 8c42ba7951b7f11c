use todolist_shared::ListRecord;
use tracing::{info, instrument, warn};

use super::{Coordinator, SyncPolicy};
use crate::api::TodolistApi;
use crate::app::{AppAction, RequestStatus};
use crate::errors::{self, OpError};
use crate::store::Action;
use crate::todolists::{FilterValue, TodolistAction};

impl<A: TodolistApi> Coordinator<A> {
    #[instrument(skip(self))]
    pub async fn fetch_todolists(&self) -> Result<(), OpError> {
        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        match self.api.get_lists().await {
            Ok(lists) => {
                info!(count = lists.len(), "fetched todolists");
                self.commit([
                    Action::from(TodolistAction::SetTodolists(lists)),
                    Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
                ]);
                Ok(())
            }
            Err(err) => Err(self.unchecked_failure(err, "fetch_todolists")),
        }
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    pub async fn add_todolist(&self, title: &str) -> Result<ListRecord, OpError> {
        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));

        let envelope = match self.api.create_list(title).await {
            Ok(envelope) => envelope,
            Err(err) => return Err(self.unchecked_failure(err, "add_todolist")),
        };

        if !envelope.is_ok() {
            info!(code = envelope.result_code, "create todolist rejected");
            match self.policy {
                // Rejection still reports the request as succeeded.
                SyncPolicy::Literal => self.commit([
                    AppAction::SetError(Some(errors::server_message(&envelope))),
                    AppAction::SetStatus(RequestStatus::Succeeded),
                ]),
                SyncPolicy::Strict => self.commit(errors::handle_server_app_error(&envelope)),
            }
            return Err(errors::rejected(&envelope));
        }

        let Some(record) = envelope.data.item else {
            return Err(self.network_failure("create todolist response carried no item".to_string()));
        };

        info!(list_id = %record.id, "todolist created");
        self.commit([
            Action::from(TodolistAction::AddTodolist(record.clone())),
            Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
        ]);
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn remove_todolist(&self, list_id: &str) -> Result<(), OpError> {
        self.commit([
            Action::from(AppAction::SetStatus(RequestStatus::Loading)),
            Action::from(TodolistAction::ChangeEntityStatus {
                id: list_id.to_string(),
                status: RequestStatus::Loading,
            }),
        ]);

        match self.api.delete_list(list_id).await {
            Ok(envelope) if envelope.is_ok() => {
                info!(list_id, "todolist removed");
                self.commit([
                    Action::from(TodolistAction::RemoveTodolist(list_id.to_string())),
                    Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
                ]);
                Ok(())
            }
            Ok(envelope) => {
                info!(list_id, code = envelope.result_code, "remove todolist rejected");
                match self.policy {
                    SyncPolicy::Literal => self.commit([AppAction::SetError(Some(
                        errors::server_message(&envelope),
                    ))]),
                    SyncPolicy::Strict => {
                        let mut actions: Vec<Action> = errors::handle_server_app_error(&envelope)
                            .into_iter()
                            .map(Action::from)
                            .collect();
                        actions.push(Action::from(TodolistAction::ChangeEntityStatus {
                            id: list_id.to_string(),
                            status: RequestStatus::Idle,
                        }));
                        self.commit(actions);
                    }
                }
                Err(errors::rejected(&envelope))
            }
            Err(err) => {
                let message = err.to_string();
                warn!(list_id, error = %message, "remove todolist failed");
                self.commit([
                    Action::from(AppAction::SetStatus(RequestStatus::Failed)),
                    Action::from(TodolistAction::ChangeEntityStatus {
                        id: list_id.to_string(),
                        status: RequestStatus::Failed,
                    }),
                    Action::from(AppAction::SetError(Some(message.clone()))),
                ]);
                Err(OpError::Transport(message))
            }
        }
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    pub async fn change_todolist_title(&self, list_id: &str, title: &str) -> Result<(), OpError> {
        let rename = TodolistAction::ChangeTitle {
            id: list_id.to_string(),
            title: title.to_string(),
        };

        if self.policy == SyncPolicy::Literal {
            // Any response commits; the result code is not consulted.
            return match self.api.rename_list(list_id, title).await {
                Ok(_) => {
                    self.store.dispatch(rename);
                    Ok(())
                }
                Err(err) => Err(self.unchecked_failure(err, "change_todolist_title")),
            };
        }

        self.store
            .dispatch(AppAction::SetStatus(RequestStatus::Loading));
        match self.api.rename_list(list_id, title).await {
            Ok(envelope) if envelope.is_ok() => {
                self.commit([
                    Action::from(rename),
                    Action::from(AppAction::SetStatus(RequestStatus::Succeeded)),
                ]);
                Ok(())
            }
            Ok(envelope) => {
                self.commit(errors::handle_server_app_error(&envelope));
                Err(errors::rejected(&envelope))
            }
            Err(err) => Err(self.network_failure(err.user_message())),
        }
    }

    /// Local-only: the filter never reaches the remote service.
    pub fn change_todolist_filter(&self, list_id: &str, filter: FilterValue) {
        self.store.dispatch(TodolistAction::ChangeFilter {
            id: list_id.to_string(),
            filter,
        });
    }
}
