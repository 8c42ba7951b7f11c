use serde::{
  Deserialize,
  Serialize
};

/// Result code carried by every mutating
/// response envelope.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum ResultCode {
  Ok,
  Error,
  Captcha,
  Unknown(i32)
}

impl ResultCode {
  pub fn from_code(code: i32) -> Self {
    match code {
      | 0 => ResultCode::Ok,
      | 1 => ResultCode::Error,
      | 10 => ResultCode::Captcha,
      | other => ResultCode::Unknown(other)
    }
  }

  pub fn code(self) -> i32 {
    match self {
      | ResultCode::Ok => 0,
      | ResultCode::Error => 1,
      | ResultCode::Captcha => 10,
      | ResultCode::Unknown(other) => other
    }
  }

  pub fn is_ok(self) -> bool {
    self == ResultCode::Ok
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskStatus {
  #[default]
  New,
  InProgress,
  Completed,
  Draft
}

impl TryFrom<u8> for TaskStatus {
  type Error = String;

  fn try_from(
    value: u8
  ) -> Result<Self, Self::Error> {
    match value {
      | 0 => Ok(TaskStatus::New),
      | 1 => Ok(TaskStatus::InProgress),
      | 2 => Ok(TaskStatus::Completed),
      | 3 => Ok(TaskStatus::Draft),
      | other => Err(format!(
        "unknown task status code \
         {other}"
      ))
    }
  }
}

impl From<TaskStatus> for u8 {
  fn from(value: TaskStatus) -> Self {
    match value {
      | TaskStatus::New => 0,
      | TaskStatus::InProgress => 1,
      | TaskStatus::Completed => 2,
      | TaskStatus::Draft => 3
    }
  }
}

impl std::str::FromStr for TaskStatus {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "0" | "new" => Ok(TaskStatus::New),
      | "1" | "in-progress"
      | "inprogress" => {
        Ok(TaskStatus::InProgress)
      }
      | "2" | "completed" | "done" => {
        Ok(TaskStatus::Completed)
      }
      | "3" | "draft" => {
        Ok(TaskStatus::Draft)
      }
      | other => Err(format!(
        "unknown task status: {other}"
      ))
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum TaskPriority {
  Low,
  #[default]
  Middle,
  Hi,
  Urgently,
  Later
}

impl TryFrom<u8> for TaskPriority {
  type Error = String;

  fn try_from(
    value: u8
  ) -> Result<Self, Self::Error> {
    match value {
      | 0 => Ok(TaskPriority::Low),
      | 1 => Ok(TaskPriority::Middle),
      | 2 => Ok(TaskPriority::Hi),
      | 3 => Ok(TaskPriority::Urgently),
      | 4 => Ok(TaskPriority::Later),
      | other => Err(format!(
        "unknown task priority code \
         {other}"
      ))
    }
  }
}

impl From<TaskPriority> for u8 {
  fn from(value: TaskPriority) -> Self {
    match value {
      | TaskPriority::Low => 0,
      | TaskPriority::Middle => 1,
      | TaskPriority::Hi => 2,
      | TaskPriority::Urgently => 3,
      | TaskPriority::Later => 4
    }
  }
}

impl std::str::FromStr for TaskPriority {
  type Err = String;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "0" | "low" => {
        Ok(TaskPriority::Low)
      }
      | "1" | "middle" | "medium" => {
        Ok(TaskPriority::Middle)
      }
      | "2" | "hi" | "high" => {
        Ok(TaskPriority::Hi)
      }
      | "3" | "urgently" | "urgent" => {
        Ok(TaskPriority::Urgently)
      }
      | "4" | "later" => {
        Ok(TaskPriority::Later)
      }
      | other => Err(format!(
        "unknown task priority: {other}"
      ))
    }
  }
}

/// A list as the remote service stores
/// it.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct ListRecord {
  pub id:         String,
  pub title:      String,
  #[serde(default)]
  pub added_date: String,
  #[serde(default)]
  pub order:      i64
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
  pub id:           String,
  pub todo_list_id: String,
  pub title:        String,
  #[serde(default)]
  pub description:  Option<String>,
  #[serde(default)]
  pub status:       TaskStatus,
  #[serde(default)]
  pub priority:     TaskPriority,
  #[serde(default)]
  pub start_date:   Option<String>,
  #[serde(default)]
  pub deadline:     Option<String>,
  #[serde(default)]
  pub order:        i64,
  #[serde(default)]
  pub added_date:   String
}

/// The complete mutable field set the
/// remote service requires on task
/// update.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskModel {
  pub title:       String,
  pub description: Option<String>,
  pub status:      TaskStatus,
  pub priority:    TaskPriority,
  pub start_date:  Option<String>,
  pub deadline:    Option<String>
}

impl From<&TaskRecord> for UpdateTaskModel {
  fn from(task: &TaskRecord) -> Self {
    Self {
      title:       task.title.clone(),
      description: task
        .description
        .clone(),
      status:      task.status,
      priority:    task.priority,
      start_date:  task
        .start_date
        .clone(),
      deadline:    task.deadline.clone()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct FieldError {
  pub field: String,
  pub error: String
}

/// Uniform envelope returned by every
/// mutating endpoint.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
  pub result_code:   i32,
  #[serde(default)]
  pub messages:      Vec<String>,
  #[serde(default)]
  pub fields_errors: Vec<FieldError>,
  pub data:          T
}

impl<T> ResponseEnvelope<T> {
  pub fn code(&self) -> ResultCode {
    ResultCode::from_code(
      self.result_code
    )
  }

  pub fn is_ok(&self) -> bool {
    self.code().is_ok()
  }

  pub fn first_message(
    &self
  ) -> Option<&str> {
    self
      .messages
      .first()
      .map(String::as_str)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ItemData<T> {
  /// Rejected responses carry
  /// `"data": {}`.
  pub item: Option<T>
}

/// Payload of envelopes that carry no
/// data (`"data": {}`).
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct Empty {}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct GetTasksResponse {
  pub items:       Vec<TaskRecord>,
  #[serde(default)]
  pub total_count: u64,
  #[serde(default)]
  pub error:       Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct TitleArgs {
  pub title: String
}
