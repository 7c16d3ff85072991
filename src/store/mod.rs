//! Persistence seams.
//!
//! Every todo query takes the owner alongside the id, so a row that belongs to someone
//! else is indistinguishable from one that does not exist. Mutations are single
//! conditional operations; there is no separate ownership check before the write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Todo, TodoChanges, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. A taken email yields `AppError::Conflict`.
    async fn insert_user(&self, user: &User) -> Result<User, AppError>;

    /// Looks a user up by its normalized email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, todo: &Todo) -> Result<Todo, AppError>;

    /// All of `owner`'s todos, newest first, ties broken by id.
    async fn list_todos(&self, owner: Uuid) -> Result<Vec<Todo>, AppError>;

    async fn find_todo(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, AppError>;

    async fn update_todo(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, AppError>;

    async fn toggle_todo(
        &self,
        id: Uuid,
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_todo(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError>;
}
