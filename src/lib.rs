#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication (password hashing, token issuance, identity"]
#![doc = "resolution), ownership-scoped todo operations, storage backends, routing"]
#![doc = "configuration and error handling. The binary (`main.rs`) wires them into a server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod todos;

pub use error::AppError;
pub use state::AppState;
