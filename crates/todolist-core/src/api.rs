mod http;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;
use todolist_shared::{
    Empty, GetTasksResponse, ItemData, ListRecord, ResponseEnvelope, TaskRecord, UpdateTaskModel,
};

pub use http::{ApiConfig, DEFAULT_BASE_URL, HttpTodolistApi};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Text for the error signal: the response body's message when the
    /// server sent one, otherwise the transport error itself.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Remote CRUD service for lists and their tasks.
#[async_trait]
pub trait TodolistApi: Send + Sync {
    async fn get_lists(&self) -> ApiResult<Vec<ListRecord>>;

    async fn create_list(&self, title: &str) -> ApiResult<ResponseEnvelope<ItemData<ListRecord>>>;

    async fn delete_list(&self, list_id: &str) -> ApiResult<ResponseEnvelope<Empty>>;

    async fn rename_list(&self, list_id: &str, title: &str) -> ApiResult<ResponseEnvelope<Empty>>;

    async fn get_tasks(&self, list_id: &str) -> ApiResult<GetTasksResponse>;

    async fn create_task(
        &self,
        list_id: &str,
        title: &str,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>>;

    async fn delete_task(&self, list_id: &str, task_id: &str) -> ApiResult<ResponseEnvelope<Empty>>;

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>>;
}
