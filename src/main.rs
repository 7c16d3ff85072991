use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use todoforge::config::Config;
use todoforge::error::internal_error_handlers;
use todoforge::routes::{self, health};
use todoforge::AppState;

fn io_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(io_error)?;
    let state = AppState::init(&config).await.map_err(io_error)?;
    let state = web::Data::new(state);

    log::info!(
        "Starting todoforge server at {}{} (token algorithm {:?})",
        config.server_url(),
        config.api_prefix,
        config.algorithm()
    );

    let cors_origins = config.cors_origins.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(internal_error_handlers())
            .service(health::root)
            .service(health::health)
            .service(web::scope(&api_prefix).configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
