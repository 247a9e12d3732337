use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TaskStatus {
        Open => "open",
        Completed => "completed",
        NoShow => "no-show",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum TaskPriority {
        Low => "low",
        #[default]
        Medium => "medium",
        High => "high",
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HelperTaskRow {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub task: String,
    pub status: TaskStatus,
    pub assigned_to: Option<Uuid>,
    pub assigned_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
}

/// Volunteer work assignment, loosely tied to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperTask {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub task: String,
    pub status: TaskStatus,
    pub assigned_to: Option<Uuid>,
    pub assigned_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub description: Option<String>,
    pub priority: TaskPriority,
}

impl From<HelperTaskRow> for HelperTask {
    fn from(row: HelperTaskRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            task: row.task,
            status: row.status,
            assigned_to: row.assigned_to,
            assigned_date: row.assigned_date,
            completed_date: row.completed_date,
            created_by: row.created_by,
            description: row.description,
            priority: row.priority.unwrap_or_default(),
        }
    }
}

impl HelperTask {
    /// Moves the task to `status`. Entering `Completed` stamps the
    /// completion time; leaving it keeps the previous stamp.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        if status == TaskStatus::Completed && self.status != TaskStatus::Completed {
            self.completed_date = Some(now);
        }
        self.status = status;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperTaskInput {
    pub task: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

impl HelperTaskInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.task.trim().is_empty() {
            return Err(AppError::bad_request("Please enter a task"));
        }
        Ok(())
    }

    pub fn into_task(self, id: Uuid, created_by: Uuid, now: DateTime<Utc>) -> HelperTask {
        let mut task = HelperTask {
            id,
            event_id: self.event_id,
            task: self.task.trim().to_string(),
            status: TaskStatus::Open,
            assigned_to: self.assigned_to,
            assigned_date: now,
            completed_date: None,
            created_by,
            description: self.description.filter(|d| !d.trim().is_empty()),
            priority: self.priority.unwrap_or_default(),
        };
        task.set_status(self.status.unwrap_or(TaskStatus::Open), now);
        task
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperTaskUpdate {
    pub task: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
    pub event_id: Option<Uuid>,
}

impl HelperTaskUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.task.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::bad_request("Please enter a task"));
        }
        Ok(())
    }

    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply(&self, task: &mut HelperTask, now: DateTime<Utc>) {
        if let Some(text) = &self.task {
            task.task = text.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(event_id) = self.event_id {
            task.event_id = Some(event_id);
        }
        if let Some(status) = self.status {
            task.set_status(status, now);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    pub no_show: usize,
}

impl TaskStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a HelperTask>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Open => stats.open += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::NoShow => stats.no_show += 1,
            }
            stats
        })
    }
}
