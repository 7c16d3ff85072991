use crate::{
    auth::{accounts, AuthenticatedUser, SigninRequest, SignupRequest},
    error::AppError,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns an access token for it.
///
/// ## Responses:
/// - `201 Created`: `{access_token, token_type, user}`.
/// - `400 Bad Request`: invalid input, or the email is already registered.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let session = accounts::register(&state, signup_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(session))
}

/// Sign in
///
/// Authenticates a user and returns a fresh access token.
///
/// ## Responses:
/// - `200 OK`: `{access_token, token_type, user}`.
/// - `401 Unauthorized`: unknown email or wrong password, not told apart.
#[post("/signin")]
pub async fn signin(
    state: web::Data<AppState>,
    signin_data: web::Json<SigninRequest>,
) -> Result<impl Responder, AppError> {
    signin_data.validate()?;
    let session = accounts::authenticate(&state, signin_data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// Sign out
///
/// Tokens are stateless, so there is nothing to invalidate server-side; the client
/// discards its token. The route still requires a valid one.
pub async fn signout(user: AuthenticatedUser) -> impl Responder {
    log::info!("user {} signed out", user.id());
    HttpResponse::Ok().json(json!({
        "message": "Successfully signed out"
    }))
}
