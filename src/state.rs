use std::sync::Arc;

use crate::auth::identity::IdentityResolver;
use crate::auth::password::CredentialStore;
use crate::auth::token::{JwtSettings, TokenService};
use crate::config::Config;
use crate::error::AppError;
use crate::store::{MemoryStore, PgStore, TodoStore, UserStore};
use crate::todos::TodoService;

/// Everything a request handler needs. Cloned per worker, read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: TokenService,
    pub credentials: CredentialStore,
}

impl AppState {
    pub fn from_parts(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        tokens: TokenService,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            users,
            todos,
            tokens,
            credentials,
        }
    }

    /// Builds the state described by `config`, connecting to PostgreSQL unless the
    /// database URL selects the in-memory store.
    pub async fn init(config: &Config) -> Result<Self, AppError> {
        let tokens = TokenService::new(&config.jwt);
        let credentials = CredentialStore::new(config.bcrypt_cost)?;

        if config.uses_memory_store() {
            log::warn!("DATABASE_URL selects the in-memory store; data is lost on exit");
            let store = Arc::new(MemoryStore::new());
            return Ok(Self::from_parts(store.clone(), store, tokens, credentials));
        }

        let store = PgStore::connect(&config.database_url, config.max_connections).await?;
        store.init_schema().await?;
        let store = Arc::new(store);
        Ok(Self::from_parts(store.clone(), store, tokens, credentials))
    }

    /// An in-memory state with the given signing settings.
    pub fn in_memory(jwt: &JwtSettings, bcrypt_cost: u32) -> Result<Self, AppError> {
        let store = Arc::new(MemoryStore::new());
        Ok(Self::from_parts(
            store.clone(),
            store,
            TokenService::new(jwt),
            CredentialStore::new(bcrypt_cost)?,
        ))
    }

    pub fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.tokens.clone(), self.users.clone())
    }

    pub fn todo_service(&self) -> TodoService {
        TodoService::new(self.todos.clone())
    }
}
