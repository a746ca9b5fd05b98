use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Payload for creating a task.
///
/// Both fields are optional at the serde level so that a missing field is reported
/// with the same message as a blank one.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task. At most 200 characters.
    #[serde(default)]
    #[validate(length(max = 200, message = "title must be at most 200 characters"))]
    pub title: Option<String>,

    /// The description of the task. At most 1000 characters.
    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// Partial update for a task. Absent fields are left untouched.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200, message = "title must be 1 to 200 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 1,
        max = 1000,
        message = "description must be 1 to 1000 characters"
    ))]
    pub description: Option<String>,

    pub completed: Option<bool>,
}

/// A task as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    /// Identifier of the owning user.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Only return tasks with this completion state.
    pub completed: Option<bool>,
}

impl TaskInput {
    /// Checks presence first, then the length limits, and returns the trimmed
    /// `(title, description)` pair.
    pub fn into_fields(self) -> Result<(String, String), AppError> {
        let fields = Self {
            title: non_blank(self.title),
            description: non_blank(self.description),
        };
        if fields.title.is_none() || fields.description.is_none() {
            return Err(AppError::ValidationError(
                "title and description are required".into(),
            ));
        }
        fields.validate()?;
        Ok((
            fields.title.unwrap_or_default(),
            fields.description.unwrap_or_default(),
        ))
    }
}

impl TaskUpdate {
    /// Trims provided text fields and rejects blank ones.
    pub fn normalized(self) -> Result<Self, AppError> {
        let update = Self {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            completed: self.completed,
        };
        update.validate()?;
        Ok(update)
    }

    /// Applies the provided fields to `task` and bumps `updated_at`.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = Utc::now();
    }
}

impl Task {
    /// Creates a new, not yet completed task owned by `user_id`.
    pub fn new(title: String, description: String, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, query: &TaskQuery) -> bool {
        query.completed.map_or(true, |c| self.completed == c)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
