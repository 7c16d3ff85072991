//! Ownership-scoped operations on todos.
//!
//! Every operation takes the owner id resolved from the caller's token. A todo owned by
//! someone else is reported exactly like a missing one (`None` / `false`).

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::todo::MAX_TITLE_CHARS;
use crate::models::{Todo, TodoChanges};
use crate::store::TodoStore;

#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Creates a todo owned by `owner`. The title must contain something besides whitespace.
    pub async fn create(
        &self,
        owner: Uuid,
        title: &str,
        description: Option<String>,
    ) -> Result<Todo, AppError> {
        let title = required_title(title)?;
        let todo = self
            .store
            .insert_todo(&Todo::new(owner, title, description))
            .await?;
        log::debug!("user {} created todo {}", owner, todo.id);
        Ok(todo)
    }

    /// All of `owner`'s todos, newest first.
    pub async fn list_all(&self, owner: Uuid) -> Result<Vec<Todo>, AppError> {
        self.store.list_todos(owner).await
    }

    pub async fn get_by_id(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, AppError> {
        self.store.find_todo(id, owner).await
    }

    /// Applies only the provided fields and stamps `updated_at`.
    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        title: Option<&str>,
        description: Option<String>,
    ) -> Result<Option<Todo>, AppError> {
        let changes = TodoChanges {
            title: title.map(required_title).transpose()?,
            description,
        };
        self.store.update_todo(id, owner, changes, Utc::now()).await
    }

    /// Removes the todo for good. `false` when there was nothing of `owner`'s to remove.
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let deleted = self.store.delete_todo(id, owner).await?;
        if deleted {
            log::debug!("user {} deleted todo {}", owner, id);
        }
        Ok(deleted)
    }

    pub async fn toggle_complete(&self, id: Uuid, owner: Uuid) -> Result<Option<Todo>, AppError> {
        self.store.toggle_todo(id, owner, Utc::now()).await
    }
}

fn required_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("title: must not be blank".into()));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title: must be at most {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::{MemoryStore, UserStore};
    use pretty_assertions::assert_eq;

    async fn setup() -> (TodoService, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let alice = store
            .insert_user(&User::new("alice@x.com", "h".into()))
            .await
            .unwrap();
        let bob = store
            .insert_user(&User::new("bob@x.com", "h".into()))
            .await
            .unwrap();
        (TodoService::new(store), alice.id, bob.id)
    }

    #[actix_rt::test]
    async fn test_create_then_get_round_trip() {
        let (service, alice, _) = setup().await;
        let created = service.create(alice, "X", None).await.unwrap();

        let fetched = service.get_by_id(created.id, alice).await.unwrap().unwrap();
        assert_eq!(fetched.title, "X");
        assert!(!fetched.completed);
        assert_eq!(fetched.updated_at, None);
        assert_eq!(fetched.user_id, alice);
    }

    #[actix_rt::test]
    async fn test_blank_title_is_rejected() {
        let (service, alice, _) = setup().await;
        for title in ["", "   ", "\t\n"] {
            let err = service.create(alice, title, None).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        assert!(service.list_all(alice).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_title_is_trimmed() {
        let (service, alice, _) = setup().await;
        let created = service.create(alice, "  buy milk ", None).await.unwrap();
        assert_eq!(created.title, "buy milk");
    }

    #[actix_rt::test]
    async fn test_title_limit_applies_after_trimming() {
        let (service, alice, _) = setup().await;
        let longest = "a".repeat(MAX_TITLE_CHARS);

        let padded = format!("   {}   ", longest);
        let created = service.create(alice, &padded, None).await.unwrap();
        assert_eq!(created.title, longest);

        let padded = format!("\t{}\n", longest);
        let updated = service
            .update(created.id, alice, Some(padded.as_str()), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, longest);

        let too_long = "a".repeat(MAX_TITLE_CHARS + 1);
        let err = service.create(alice, &too_long, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = service
            .update(created.id, alice, Some(too_long.as_str()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_rt::test]
    async fn test_list_is_newest_first_and_owner_scoped() {
        let (service, alice, bob) = setup().await;
        let mut created = Vec::new();
        for title in ["first", "second", "third"] {
            created.push(service.create(alice, title, None).await.unwrap().id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        created.reverse();
        service.create(bob, "bob's", None).await.unwrap();

        let ids: Vec<Uuid> = service
            .list_all(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect();
        assert_eq!(ids, created);
    }

    #[actix_rt::test]
    async fn test_partial_update() {
        let (service, alice, _) = setup().await;
        let todo = service
            .create(alice, "title", Some("description".into()))
            .await
            .unwrap();

        let updated = service
            .update(todo.id, alice, Some("new title"), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.description.as_deref(), Some("description"));
        assert!(updated.updated_at.is_some());

        let updated = service
            .update(todo.id, alice, None, Some("new description".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.description.as_deref(), Some("new description"));
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[actix_rt::test]
    async fn test_update_rejects_blank_title() {
        let (service, alice, _) = setup().await;
        let todo = service.create(alice, "title", None).await.unwrap();
        let err = service
            .update(todo.id, alice, Some("  "), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[actix_rt::test]
    async fn test_toggle_twice_restores_state() {
        let (service, alice, _) = setup().await;
        let todo = service.create(alice, "toggle me", None).await.unwrap();

        let once = service.toggle_complete(todo.id, alice).await.unwrap().unwrap();
        assert!(once.completed);
        let twice = service.toggle_complete(todo.id, alice).await.unwrap().unwrap();
        assert!(!twice.completed);
        assert!(twice.updated_at.is_some());
    }

    #[actix_rt::test]
    async fn test_delete_twice() {
        let (service, alice, _) = setup().await;
        let todo = service.create(alice, "delete me", None).await.unwrap();

        assert!(service.delete(todo.id, alice).await.unwrap());
        assert!(!service.delete(todo.id, alice).await.unwrap());
        assert_eq!(service.get_by_id(todo.id, alice).await.unwrap(), None);
    }

    #[actix_rt::test]
    async fn test_other_owner_sees_nothing() {
        let (service, alice, bob) = setup().await;
        let todo = service.create(alice, "private", None).await.unwrap();

        assert_eq!(service.get_by_id(todo.id, bob).await.unwrap(), None);
        assert_eq!(
            service
                .update(todo.id, bob, Some("hijacked"), None)
                .await
                .unwrap(),
            None
        );
        assert_eq!(service.toggle_complete(todo.id, bob).await.unwrap(), None);
        assert!(!service.delete(todo.id, bob).await.unwrap());

        let untouched = service.get_by_id(todo.id, alice).await.unwrap().unwrap();
        assert_eq!(untouched, todo);
    }

    #[actix_rt::test]
    async fn test_missing_id_is_absent() {
        let (service, alice, _) = setup().await;
        let id = Uuid::new_v4();
        assert_eq!(service.get_by_id(id, alice).await.unwrap(), None);
        assert_eq!(service.toggle_complete(id, alice).await.unwrap(), None);
        assert!(!service.delete(id, alice).await.unwrap());
    }
}
