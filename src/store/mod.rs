//! Persistence seam for users and tasks.
//!
//! Lookups return `Ok(None)` or an empty list when nothing matches; errors are reserved
//! for failures of the backend itself. Task mutations always filter on both the task id
//! and the owner in one atomic step, so a task owned by someone else behaves exactly
//! like a task that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskQuery, TaskUpdate, User};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Persists a new user. Fails with `AppError::DuplicateEmail` if the email is taken.
    async fn insert(&self, user: User) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: Task) -> Result<Task, AppError>;

    /// All tasks owned by `owner` that match `query`, oldest first.
    async fn find_by_owner(&self, owner: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError>;

    /// Applies `changes` to the task with `id` if it belongs to `owner`.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no task with `id` belongs to `owner`.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}
