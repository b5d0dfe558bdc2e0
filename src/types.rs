//! Core data types for the task database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub email: String,
}

/// A task row as stored in `tasks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,

    /// Free text, may be absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// References `status.id`
    pub status_id: i64,

    /// References `users.id`; removed together with the user
    pub user_id: i64,
}

/// Field values for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status_id: i64,
    pub user_id: i64,
}

impl NewTask {
    /// Create a new task without a description.
    pub fn new(title: impl Into<String>, status_id: i64, user_id: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            status_id,
            user_id,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The closed set of task states.
///
/// Any state may move to any other; the store does not police transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    New,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// All states in seed order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::New, TaskStatus::InProgress, TaskStatus::Completed];

    /// The name stored in `status.name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(TaskStatus::New),
            "in progress" | "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// A row of the `status` lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusRow {
    pub id: i64,
    pub name: String,
}

/// Number of tasks carrying a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub id: i64,
    pub name: String,
    pub task_count: i64,
}

/// A task together with its owner's contact details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskWithOwner {
    #[serde(flatten)]
    pub task: Task,
    pub user_fullname: String,
    pub user_email: String,
}

/// A user joined with one of their tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTask {
    #[serde(flatten)]
    pub user: User,
    pub task_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status_id: i64,
}

/// A user with the number of tasks they own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserTaskCount {
    #[serde(flatten)]
    pub user: User,
    pub task_count: i64,
}

/// A document in the cat collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cat {
    /// "cat-" + 10 hex chars
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Field values for a cat that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCat {
    pub name: String,
    pub age: u32,
    pub features: Vec<String>,
}

impl NewCat {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
            features: Vec::new(),
        }
    }

    /// Set the features.
    pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.features = features.into_iter().map(|f| f.into()).collect();
        self
    }

    /// Trim the name and features, drop blank features, and reject a blank name.
    pub fn normalized(&self) -> Result<NewCat, ValidationError> {
        Ok(NewCat {
            name: validate_name(&self.name)?,
            age: self.age,
            features: merge_features(&[], &self.features),
        })
    }
}

/// Trim a cat name and reject it if blank or containing control characters.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(name.to_string())
}

/// Append `extra` to `existing` with set semantics, keeping first-seen order.
///
/// Blank entries are dropped and every entry is trimmed.
pub fn merge_features(existing: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = existing.to_vec();
    for feature in extra {
        let feature = feature.trim();
        if !feature.is_empty() && !merged.iter().any(|f| f == feature) {
            merged.push(feature.to_string());
        }
    }
    merged
}

/// What a delete primitive did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// At least one row was removed and committed.
    Deleted,
    /// The statement ran but matched nothing.
    NotFound,
    /// The statement failed and was rolled back.
    Failed,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}

/// Kinds of rows the catalog deletes by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Task,
    User,
}

impl Entity {
    fn noun(&self) -> &'static str {
        match self {
            Entity::Task => "task",
            Entity::User => "user",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Entity::Task => "Task",
            Entity::User => "User",
        }
    }
}

/// Result of deleting a row by id, rendered as a human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    pub entity: Entity,
    pub id: i64,
    pub outcome: DeleteOutcome,
}

impl fmt::Display for Deletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            DeleteOutcome::Deleted => write!(f, "{} with id {} deleted", self.entity.title(), self.id),
            DeleteOutcome::NotFound => write!(f, "No {} found with id {}", self.entity.noun(), self.id),
            DeleteOutcome::Failed => write!(f, "Failed to delete {} with id {}", self.entity.noun(), self.id),
        }
    }
}

/// Validation errors for caller-supplied values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    UnknownStatus(String),
    EmptyName,
    InvalidCharacters,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownStatus(name) => {
                write!(f, "unknown status '{}': expected new, in progress or completed", name)
            }
            ValidationError::EmptyName => write!(f, "name cannot be empty"),
            ValidationError::InvalidCharacters => write!(f, "name contains control characters"),
        }
    }
}

impl std::error::Error for ValidationError {}
