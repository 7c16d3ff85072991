use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTodoRequest, UpdateTodoRequest},
    state::AppState,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".into())
}

/// Retrieves the authenticated user's todos.
///
/// ## Responses:
/// - `200 OK`: JSON array of todos, newest first. Empty if the user has none.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todo_service().list_all(user.id()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a new todo for the authenticated user.
///
/// The owner is always the caller; the body cannot choose it.
///
/// ## Request Body:
/// - `title`: 1 to 255 characters, not blank.
/// - `description` (optional): up to 2000 characters.
///
/// ## Responses:
/// - `201 Created`: the new todo.
/// - `400 Bad Request`: invalid input.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    todo_data: web::Json<CreateTodoRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let CreateTodoRequest { title, description } = todo_data.into_inner();

    let todo = state
        .todo_service()
        .create(user.id(), &title, description)
        .await?;

    Ok(HttpResponse::Created().json(todo))
}

/// Retrieves a specific todo by its ID.
///
/// ## Responses:
/// - `200 OK`: the todo.
/// - `400 Bad Request`: the id is not a UUID.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = state
        .todo_service()
        .get_by_id(todo_id.into_inner(), user.id())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Updates the provided fields of a todo.
///
/// ## Responses:
/// - `200 OK`: the updated todo.
/// - `400 Bad Request`: invalid id or input.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
#[put("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    todo_data: web::Json<UpdateTodoRequest>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let UpdateTodoRequest { title, description } = todo_data.into_inner();

    let todo = state
        .todo_service()
        .update(todo_id.into_inner(), user.id(), title.as_deref(), description)
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes a todo.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `400 Bad Request`: the id is not a UUID.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let deleted = state
        .todo_service()
        .delete(todo_id.into_inner(), user.id())
        .await?;

    if !deleted {
        return Err(not_found());
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Flips the completion flag of a todo.
///
/// ## Responses:
/// - `200 OK`: the toggled todo.
/// - `400 Bad Request`: the id is not a UUID.
/// - `404 Not Found`: no such todo, or it belongs to someone else.
#[patch("/{id}/complete")]
pub async fn toggle_todo(
    state: web::Data<AppState>,
    todo_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todo = state
        .todo_service()
        .toggle_complete(todo_id.into_inner(), user.id())
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(todo))
}
