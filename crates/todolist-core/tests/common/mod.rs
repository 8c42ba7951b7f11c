#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use todolist_core::api::{ApiError, ApiResult, TodolistApi};
use todolist_core::commands::{Coordinator, SyncPolicy};
use todolist_core::store::Store;
use todolist_shared::{
    Empty, GetTasksResponse, ItemData, ListRecord, ResponseEnvelope, TaskPriority, TaskRecord,
    TaskStatus, UpdateTaskModel,
};

/// Scripted outcome for the next call into [`FakeApi`].
#[derive(Debug, Clone)]
pub enum Fault {
    /// Envelope with this result code and these messages.
    Reject { code: i32, messages: Vec<String> },
    /// 503 carrying this body message.
    Unavailable(String),
    /// Tasks response whose `error` field is set.
    TasksError(String),
}

impl Fault {
    pub fn reject(code: i32, messages: &[&str]) -> Self {
        Fault::Reject {
            code,
            messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Default)]
struct Remote {
    lists: Vec<ListRecord>,
    tasks: BTreeMap<String, Vec<TaskRecord>>,
    faults: VecDeque<Fault>,
    updates: Vec<UpdateTaskModel>,
}

/// In-memory stand-in for the remote todolist service.
#[derive(Default)]
pub struct FakeApi {
    remote: Mutex<Remote>,
}

impl FakeApi {
    pub fn with_lists(lists: Vec<ListRecord>) -> Self {
        let api = Self::default();
        {
            let mut remote = api.remote.lock();
            for list in &lists {
                remote.tasks.insert(list.id.clone(), Vec::new());
            }
            remote.lists = lists;
        }
        api
    }

    pub fn seed_task(&self, task: TaskRecord) {
        self.remote
            .lock()
            .tasks
            .entry(task.todo_list_id.clone())
            .or_default()
            .push(task);
    }

    pub fn fail_next(&self, fault: Fault) {
        self.remote.lock().faults.push_back(fault);
    }

    pub fn updates(&self) -> Vec<UpdateTaskModel> {
        self.remote.lock().updates.clone()
    }

    pub fn remote_lists(&self) -> Vec<ListRecord> {
        self.remote.lock().lists.clone()
    }

    /// Pops the next fault if `applies` accepts it; others wait for a
    /// call they fit.
    fn take_fault(&self, applies: impl Fn(&Fault) -> bool) -> Option<Fault> {
        let mut remote = self.remote.lock();
        if remote.faults.front().is_some_and(|f| applies(f)) {
            return remote.faults.pop_front();
        }
        None
    }

    fn take_envelope_fault(&self) -> Option<Fault> {
        self.take_fault(|f| !matches!(f, Fault::TasksError(_)))
    }
}

fn ok<T>(data: T) -> ResponseEnvelope<T> {
    ResponseEnvelope {
        result_code: 0,
        messages: vec![],
        fields_errors: vec![],
        data,
    }
}

fn envelope_for<T>(fault: Fault, data: T) -> ApiResult<ResponseEnvelope<T>> {
    match fault {
        Fault::Reject { code, messages } => Ok(ResponseEnvelope {
            result_code: code,
            messages,
            fields_errors: vec![],
            data,
        }),
        Fault::Unavailable(message) => Err(unavailable(message)),
        Fault::TasksError(message) => Err(ApiError::Config(message)),
    }
}

fn unavailable(message: String) -> ApiError {
    ApiError::Status {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message,
    }
}

#[async_trait]
impl TodolistApi for FakeApi {
    async fn get_lists(&self) -> ApiResult<Vec<ListRecord>> {
        match self.take_fault(|f| matches!(f, Fault::Unavailable(_))) {
            Some(Fault::Unavailable(message)) => Err(unavailable(message)),
            _ => Ok(self.remote.lock().lists.clone()),
        }
    }

    async fn create_list(&self, title: &str) -> ApiResult<ResponseEnvelope<ItemData<ListRecord>>> {
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, ItemData { item: None });
        }
        let record = list(&uuid::Uuid::new_v4().to_string(), title);
        let mut remote = self.remote.lock();
        remote.lists.insert(0, record.clone());
        remote.tasks.insert(record.id.clone(), Vec::new());
        Ok(ok(ItemData { item: Some(record) }))
    }

    async fn delete_list(&self, list_id: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, Empty {});
        }
        let mut remote = self.remote.lock();
        remote.lists.retain(|l| l.id != list_id);
        remote.tasks.remove(list_id);
        Ok(ok(Empty {}))
    }

    async fn rename_list(&self, list_id: &str, title: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, Empty {});
        }
        let mut remote = self.remote.lock();
        if let Some(l) = remote.lists.iter_mut().find(|l| l.id == list_id) {
            l.title = title.to_string();
        }
        Ok(ok(Empty {}))
    }

    async fn get_tasks(&self, list_id: &str) -> ApiResult<GetTasksResponse> {
        match self.take_fault(|f| !matches!(f, Fault::Reject { .. })) {
            Some(Fault::Unavailable(message)) => Err(unavailable(message)),
            Some(Fault::TasksError(message)) => Ok(GetTasksResponse {
                items: vec![],
                total_count: 0,
                error: Some(message),
            }),
            _ => {
                let items = self
                    .remote
                    .lock()
                    .tasks
                    .get(list_id)
                    .cloned()
                    .unwrap_or_default();
                Ok(GetTasksResponse {
                    total_count: items.len() as u64,
                    items,
                    error: None,
                })
            }
        }
    }

    async fn create_task(
        &self,
        list_id: &str,
        title: &str,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>> {
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, ItemData { item: None });
        }
        let mut record = task(&uuid::Uuid::new_v4().to_string(), list_id);
        record.title = title.to_string();
        self.remote
            .lock()
            .tasks
            .entry(list_id.to_string())
            .or_default()
            .insert(0, record.clone());
        Ok(ok(ItemData { item: Some(record) }))
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> ApiResult<ResponseEnvelope<Empty>> {
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, Empty {});
        }
        if let Some(tasks) = self.remote.lock().tasks.get_mut(list_id) {
            tasks.retain(|t| t.id != task_id);
        }
        Ok(ok(Empty {}))
    }

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        model: &UpdateTaskModel,
    ) -> ApiResult<ResponseEnvelope<ItemData<TaskRecord>>> {
        let mut remote = self.remote.lock();
        remote.updates.push(model.clone());
        drop(remote);
        if let Some(fault) = self.take_envelope_fault() {
            return envelope_for(fault, ItemData { item: None });
        }
        let mut remote = self.remote.lock();
        let updated = remote
            .tasks
            .get_mut(list_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task_id))
            .map(|t| {
                t.title = model.title.clone();
                t.description = model.description.clone();
                t.status = model.status;
                t.priority = model.priority;
                t.start_date = model.start_date.clone();
                t.deadline = model.deadline.clone();
                t.clone()
            });
        Ok(ok(ItemData { item: updated }))
    }
}

pub fn list(id: &str, title: &str) -> ListRecord {
    ListRecord {
        id: id.to_string(),
        title: title.to_string(),
        added_date: "2024-05-01T10:00:00".to_string(),
        order: 0,
    }
}

pub fn task(id: &str, list_id: &str) -> TaskRecord {
    TaskRecord {
        id: id.to_string(),
        todo_list_id: list_id.to_string(),
        title: format!("Task {id}"),
        description: Some("details".to_string()),
        status: TaskStatus::New,
        priority: TaskPriority::Middle,
        start_date: Some("2024-05-02".to_string()),
        deadline: None,
        order: 0,
        added_date: "2024-05-01T10:00:00".to_string(),
    }
}

pub fn coordinator(api: FakeApi, policy: SyncPolicy) -> Coordinator<FakeApi> {
    Coordinator::new(api, Arc::new(Store::default()), policy)
}
