use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Longest title accepted, counted after surrounding whitespace is trimmed.
pub const MAX_TITLE_CHARS: usize = 255;

/// Input structure for creating a todo.
///
/// The title length limit is enforced by `TodoService` on the trimmed value.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1))]
    pub title: String,

    /// Maximum length of 2000 characters if provided.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Input structure for a partial update. Omitted fields keep their value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Represents a todo as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Todo {
    /// Unique identifier (UUID v4).
    pub id: Uuid,
    /// The owning user. Set from the caller's identity, never from input.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// `None` until the first update or toggle.
    pub updated_at: Option<DateTime<Utc>>,
}

/// The fields an update may touch, already validated and trimmed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Todo {
    /// Creates a new, incomplete `Todo` owned by `owner`.
    pub fn new(owner: Uuid, title: String, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            description,
            completed: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Applies `changes` in place and stamps `updated_at`.
    pub fn apply(&mut self, changes: TodoChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        self.updated_at = Some(now);
    }

    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.updated_at = Some(now);
    }
}
