use crate::auth::{AuthResponse, SigninRequest, SignupRequest};
use crate::error::AppError;
use crate::models::user::normalize_email;
use crate::models::{User, UserResponse};
use crate::state::AppState;
use crate::store::UserStore;

/// Creates an account and returns a session for it.
///
/// Fails with `AppError::Conflict` when the email is taken, whatever the password.
pub async fn register(state: &AppState, request: SignupRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = state.credentials.hash_blocking(request.password).await?;
    // A concurrent signup can still win the race; the store reports that as a Conflict too.
    let user = state.users.insert_user(&User::new(&email, password_hash)).await?;
    log::info!("registered user {}", user.id);

    session_for(state, &user)
}

/// Checks an email/password pair and returns a fresh session.
///
/// Unknown email and wrong password both fail with `AppError::InvalidCredentials`.
pub async fn authenticate(
    state: &AppState,
    request: SigninRequest,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&request.email);
    let user = state.users.find_user_by_email(&email).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let matched = state
        .credentials
        .verify_blocking(request.password, stored_hash)
        .await?;

    match user {
        Some(user) if matched => {
            log::info!("user {} signed in", user.id);
            session_for(state, &user)
        }
        _ => {
            log::debug!("signin rejected");
            Err(AppError::InvalidCredentials)
        }
    }
}

fn session_for(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
    let access_token = state.tokens.issue(user.id, None)?;
    Ok(AuthResponse::bearer(access_token, UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{JwtSettings, DEFAULT_TOKEN_TTL_HOURS};
    use chrono::Duration;
    use jsonwebtoken::Algorithm;

    fn state() -> AppState {
        AppState::in_memory(
            &JwtSettings {
                secret: "accounts-test".into(),
                algorithm: Algorithm::HS256,
                ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            },
            4,
        )
        .unwrap()
    }

    fn signup(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    fn signin(email: &str, password: &str) -> SigninRequest {
        SigninRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[actix_rt::test]
    async fn test_signup_then_signin_resolves_to_same_user() {
        let state = state();
        let registered = register(&state, signup("a@x.com", "password1")).await.unwrap();
        let session = authenticate(&state, signin("a@x.com", "password1")).await.unwrap();

        assert_eq!(registered.user.id, session.user.id);
        assert_eq!(session.token_type, "bearer");

        let resolved = state.identity().resolve(&session.access_token).await.unwrap();
        assert_eq!(resolved.id, registered.user.id);
        assert_ne!(resolved.password_hash, "password1");
    }

    #[actix_rt::test]
    async fn test_duplicate_email_conflicts_regardless_of_password() {
        let state = state();
        register(&state, signup("dup@x.com", "password1")).await.unwrap();

        for password in ["password1", "another-password"] {
            let err = register(&state, signup("DUP@x.com", password)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }

    #[actix_rt::test]
    async fn test_signin_failures_are_indistinguishable() {
        let state = state();
        register(&state, signup("a@x.com", "password1")).await.unwrap();

        let wrong_password = authenticate(&state, signin("a@x.com", "password2")).await;
        let unknown_email = authenticate(&state, signin("b@x.com", "password1")).await;

        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AppError::InvalidCredentials)));
    }

    #[actix_rt::test]
    async fn test_email_is_case_insensitive() {
        let state = state();
        register(&state, signup("Mixed@Case.com", "password1")).await.unwrap();

        let session = authenticate(&state, signin("mixed@case.COM", "password1"))
            .await
            .unwrap();
        assert_eq!(session.user.email, "mixed@case.com");
    }
}
