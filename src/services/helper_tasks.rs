use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    models::{HelperTask, HelperTaskInput, HelperTaskUpdate, TaskStats, TaskStatus},
    repositories::helper_task,
};
use crate::error::AppError;
use crate::services::{backend::Backend, mirror::Mirror};

const TASK_PAGE_SIZE: i64 = 500;

/// Mirror of the volunteer duties.
#[derive(Clone)]
pub struct HelperTaskBoard {
    backend: Backend,
    tasks: Arc<Mirror<HelperTask>>,
}

impl HelperTaskBoard {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            tasks: Arc::new(Mirror::default()),
        }
    }

    pub async fn seed(&self, tasks: Vec<HelperTask>) {
        self.tasks.replace_all(tasks).await;
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        let Some(pool) = self.backend.pool() else {
            return Ok(());
        };

        match helper_task::list_tasks(pool, TASK_PAGE_SIZE).await {
            Ok(tasks) => {
                log::debug!("Loaded {} helper tasks", tasks.len());
                self.tasks.replace_all(tasks).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load helper tasks: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn list(&self) -> Vec<HelperTask> {
        self.tasks.all().await
    }

    pub async fn find(&self, id: Uuid) -> Result<HelperTask, AppError> {
        self.tasks
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Helper task not found"))
    }

    pub async fn create(
        &self,
        input: HelperTaskInput,
        created_by: Uuid,
    ) -> Result<HelperTask, AppError> {
        input.validate()?;
        let draft = input.into_task(Uuid::new_v4(), created_by, Utc::now());

        let created = match self.backend.pool() {
            Some(pool) => helper_task::create_task(pool, &draft).await.map_err(|e| {
                log::error!("Failed to create helper task '{}': {}", draft.task, e);
                AppError::from(e)
            })?,
            None => draft,
        };

        self.tasks.upsert(created.clone()).await;
        Ok(created)
    }

    /// Merges `update` into the cached task and writes the result through.
    pub async fn update(&self, id: Uuid, update: &HelperTaskUpdate) -> Result<HelperTask, AppError> {
        update.validate()?;

        let mut task = self.find(id).await?;
        update.apply(&mut task, Utc::now());

        let saved = match self.backend.pool() {
            Some(pool) => helper_task::save_task(pool, &task)
                .await
                .map_err(|e| {
                    log::error!("Failed to update helper task {}: {}", id, e);
                    AppError::from(e)
                })?
                .ok_or_else(|| AppError::not_found("Helper task not found"))?,
            None => task,
        };

        self.tasks.upsert(saved.clone()).await;
        Ok(saved)
    }

    pub async fn complete(&self, id: Uuid) -> Result<HelperTask, AppError> {
        self.update(id, &HelperTaskUpdate::status(TaskStatus::Completed))
            .await
    }

    pub async fn mark_no_show(&self, id: Uuid) -> Result<HelperTask, AppError> {
        self.update(id, &HelperTaskUpdate::status(TaskStatus::NoShow))
            .await
    }

    /// Back to open; completion stamp and assignee are kept.
    pub async fn reopen(&self, id: Uuid) -> Result<HelperTask, AppError> {
        self.update(id, &HelperTaskUpdate::status(TaskStatus::Open))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(pool) = self.backend.pool() {
            helper_task::delete_task(pool, id)
                .await
                .map_err(|e| {
                    log::error!("Failed to delete helper task {}: {}", id, e);
                    AppError::from(e)
                })?
                .ok_or_else(|| AppError::not_found("Helper task not found"))?;
            self.tasks.remove(id).await;
            return Ok(());
        }

        self.tasks
            .remove(id)
            .await
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Helper task not found"))
    }

    pub async fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks.all().await)
    }
}
