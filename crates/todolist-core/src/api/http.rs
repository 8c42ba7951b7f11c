use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use todolist_shared::{
    Empty, GetTasksResponse, ItemData, ListRecord, ResponseEnvelope, TaskRecord, TitleArgs,
    UpdateTaskModel,
};
use tracing::{debug, instrument, warn};

use super::{ApiError, ApiResult, TodolistApi};

pub const DEFAULT_BASE_URL: &str = "https://social-network.samuraijs.com/api/1.1/";

const API_KEY_HEADER: &str = "API-KEY";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ApiError::Config("api base url is empty".to_string()));
        }
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        Ok(Self {
            base_url: Url::parse(&normalized)?,
            api_key: None,
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HttpTodolistApi {
    http_client: Client,
    base_url: Url,
}

impl HttpTodolistApi {
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = config.api_key.as_deref() {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::Config(format!("invalid api key: {e}")))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
        })
    }

    fn request(&self, method: Method, endpoint: &str) -> ApiResult<RequestBuilder> {
        let url = self.base_url.join(endpoint)?;
        debug!(%method, %url, "building request");
        Ok(self.http_client.request(method, url))
    }

    async fn send<R>(&self, builder: RequestBuilder) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let response = builder.send().await?;
        decode(response).await
    }

    async fn send_json<R, B>(&self, builder: RequestBuilder, body: &B) -> ApiResult<R>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = builder.json(body).send().await?;
        decode(response).await
    }
}

async fn decode<R>(response: Response) -> ApiResult<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = body_message(&bytes);
        warn!(%status, message = %message, "request failed with non-success status");
        return Err(ApiError::Status { status, message });
    }

    Ok(serde_json::from_slice(&bytes)?)
}

fn body_message(bytes: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_default()
}

#[async_trait]
impl TodolistApi for HttpTodolistApi {
    #[instrument(skip(self))]
    async fn get_lists(&self) -> ApiResult<Vec<ListRecord>> {
        self.send(self.request(Method::GET, "todo-lists")?).await
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    async fn create_list(&self, title: &str) -> ApiResult<ResponseEnvelope<ItemData<ListRecord>>> {
        let body = TitleArgs {
            title: title.to_string(),
        };
        self.send_json(self.request(Method::POST, "todo-lists")?, &body)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_list(&self, list_id: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        let endpoint = format!("todo-lists/{list_id}");
        self.send(self.request(Method::DELETE, &endpoint)?).await
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    async fn rename_list(&self, list_id: &str, title: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        let endpoint = format!("todo-lists/{list_id}");
        let body = TitleArgs {
            title: title.to_string(),
        };
        self.send_json(self.request(Method::PUT, &endpoint)?, &body)
            .await
    }

    #[instrument(skip(self))]
    async fn get_tasks(&self, list_id: &str) -> ApiResult<GetTasksResponse> {
        let endpoint = format!("todo-lists/{list_id}/tasks");
        self.send(self.request(Method::GET, &endpoint)?).await
    }

    #[instrument(skip(self), fields(title_len = title.len()))]
    async fn create_task(
        &self,
        list_id: &str,
        title: &str,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>> {
        let endpoint = format!("todo-lists/{list_id}/tasks");
        let body = TitleArgs {
            title: title.to_string(),
        };
        self.send_json(self.request(Method::POST, &endpoint)?, &body)
            .await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, list_id: &str, task_id: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        let endpoint = format!("todo-lists/{list_id}/tasks/{task_id}");
        self.send(self.request(Method::DELETE, &endpoint)?).await
    }

    #[instrument(skip(self, model))]
    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>> {
        let endpoint = format!("todo-lists/{list_id}/tasks/{task_id}");
        self.send_json(self.request(Method::PUT, &endpoint)?, model)
            .await
    }
}
