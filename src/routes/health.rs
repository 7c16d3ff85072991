use actix_web::{get, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
}

/// Service banner at `/`.
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(ServiceInfo {
        message: "todoforge API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe. Public, and mounted outside the API prefix.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
