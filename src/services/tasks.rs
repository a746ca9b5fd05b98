use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskQuery, TaskUpdate};
use crate::store::TaskStore;

const TASK_NOT_FOUND: &str = "task not found";

/// Ownership-scoped task operations.
///
/// A missing task and a task owned by another user produce the same `NotFound`.
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, owner: Uuid, input: TaskInput) -> Result<Task, AppError> {
        let (title, description) = input.into_fields()?;
        self.store
            .insert(Task::new(title, description, owner))
            .await
    }

    pub async fn list(&self, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        self.store.find_by_owner(owner, query).await
    }

    pub async fn get(&self, owner: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        self.store
            .find_owned(task_id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
    }

    pub async fn update(
        &self,
        owner: Uuid,
        task_id: Uuid,
        changes: TaskUpdate,
    ) -> Result<Task, AppError> {
        let changes = changes.normalized()?;
        self.store
            .update_owned(task_id, owner, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.into()))
    }

    pub async fn delete(&self, owner: Uuid, task_id: Uuid) -> Result<(), AppError> {
        if self.store.delete_owned(task_id, owner).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(TASK_NOT_FOUND.into()))
        }
    }
}
