use std::sync::Arc;

use uuid::Uuid;

use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Extracts the token from an `Authorization` header value of the form `Bearer <token>`.
///
/// The scheme is matched case-insensitively. Returns `None` for anything else.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Maps an inbound token to the user it was issued for.
///
/// Every failure is `AppError::Unauthenticated`: a forged token, an expired one and
/// one for a deleted user all look the same to the caller.
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: TokenService,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(tokens: TokenService, users: Arc<dyn UserStore>) -> Self {
        Self { tokens, users }
    }

    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let claims = self.tokens.verify(token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
            log::debug!("token subject is not a user id");
            AppError::Unauthenticated
        })?;

        match self.users.find_user_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                log::debug!("token subject {} has no user", user_id);
                Err(AppError::Unauthenticated)
            }
        }
    }

    /// Resolves the raw `Authorization` header, treating a missing header like a bad token.
    pub async fn resolve_header(&self, header: Option<&str>) -> Result<User, AppError> {
        let token = header.and_then(bearer_token).ok_or_else(|| {
            log::debug!("missing or malformed Authorization header");
            AppError::Unauthenticated
        })?;
        self.resolve(token).await
    }
}
