pub mod auth;
pub mod health;
pub mod todos;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::{json_error_handler, path_error_handler};

/// Registers the API routes. Mount it under the configured prefix.
///
/// Signup and signin are public; signout and every `/todos` route sit behind
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/auth")
                .service(auth::signup)
                .service(auth::signin)
                .service(
                    web::resource("/signout")
                        .wrap(AuthMiddleware)
                        .route(web::post().to(auth::signout)),
                ),
        )
        .service(
            web::scope("/todos")
                .wrap(AuthMiddleware)
                .service(todos::list_todos)
                .service(todos::create_todo)
                .service(todos::get_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo)
                .service(todos::toggle_todo),
        );
}
