use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{Todo, TodoChanges, User};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    todos: HashMap<Uuid, Todo>,
}

impl Tables {
    fn owned_mut(&mut self, id: Uuid, owner: Uuid) -> Option<&mut Todo> {
        self.todos.get_mut(&id).filter(|todo| todo.user_id == owner)
    }
}

/// Process-local store used by tests and by `DATABASE_URL=memory://`.
///
/// Each operation runs under one lock acquisition, which gives it the same
/// all-or-nothing behaviour as a single SQL statement.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(&user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        tables.emails.insert(user.email.clone(), user.id);
        tables.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, todo: &Todo) -> Result<Todo, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&todo.user_id) {
            return Err(AppError::Database(format!(
                "todo {} references missing user {}",
                todo.id, todo.user_id
            )));
        }
        tables.todos.insert(todo.id, todo.clone());
        Ok(todo.clone())
    }

    async fn list_todos(&self, owner: Uuid) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        let mut todos: Vec<Todo> = tables
            .todos
            .values()
            .filter(|todo| todo.user_id == owner)
            .cloned()
            .collect();
        todos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(todos)
    }

    async fn find_todo(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .get(&id)
            .filter(|todo| todo.user_id == owner)
            .cloned())
    }

    async fn update_todo(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.owned_mut(id, owner).map(|todo| {
            todo.apply(changes, now);
            todo.clone()
        }))
    }

    async fn toggle_todo(
        &self,
        id: Uuid,
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.owned_mut(id, owner).map(|todo| {
            todo.toggle(now);
            todo.clone()
        }))
    }

    async fn delete_todo(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.owned_mut(id, owner).is_none() {
            return Ok(false);
        }
        Ok(tables.todos.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn store_with_user(email: &str) -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = store.insert_user(&User::new(email, "h".into())).await.unwrap();
        (store, user)
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_a_conflict() {
        let (store, _) = store_with_user("a@x.com").await;
        let err = store
            .insert_user(&User::new("A@X.com", "other".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[actix_rt::test]
    async fn test_find_user_by_email_and_id() {
        let (store, user) = store_with_user("a@x.com").await;
        assert_eq!(
            store.find_user_by_email("a@x.com").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(store.find_user_by_id(user.id).await.unwrap(), Some(user));
        assert_eq!(store.find_user_by_email("b@x.com").await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_todo_requires_existing_owner() {
        let store = MemoryStore::new();
        let orphan = Todo::new(Uuid::new_v4(), "orphan".into(), None);
        assert!(store.insert_todo(&orphan).await.is_err());
    }

    #[actix_rt::test]
    async fn test_equal_timestamps_are_ordered_by_id() {
        let (store, user) = store_with_user("a@x.com").await;
        let stamp = Utc::now();
        let mut ids = Vec::new();
        for title in ["one", "two", "three"] {
            let mut todo = Todo::new(user.id, title.into(), None);
            todo.created_at = stamp;
            ids.push(store.insert_todo(&todo).await.unwrap().id);
        }
        let older = {
            let mut todo = Todo::new(user.id, "older".into(), None);
            todo.created_at = stamp - Duration::seconds(1);
            store.insert_todo(&todo).await.unwrap().id
        };

        ids.sort();
        ids.reverse();
        ids.push(older);

        let listed: Vec<Uuid> = store
            .list_todos(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(listed, ids);
    }

    #[actix_rt::test]
    async fn test_foreign_todo_is_untouchable() {
        let (store, owner) = store_with_user("owner@x.com").await;
        let intruder = store
            .insert_user(&User::new("intruder@x.com", "h".into()))
            .await
            .unwrap();
        let todo = store
            .insert_todo(&Todo::new(owner.id, "mine".into(), None))
            .await
            .unwrap();

        let now = Utc::now();
        assert_eq!(store.find_todo(todo.id, intruder.id).await.unwrap(), None);
        assert_eq!(
            store
                .update_todo(todo.id, intruder.id, TodoChanges::default(), now)
                .await
                .unwrap(),
            None
        );
        assert_eq!(store.toggle_todo(todo.id, intruder.id, now).await.unwrap(), None);
        assert!(!store.delete_todo(todo.id, intruder.id).await.unwrap());

        assert_eq!(store.find_todo(todo.id, owner.id).await.unwrap(), Some(todo));
    }
}
