#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Authentication (bcrypt password hashing, JWT issuance and a bearer-token gateway),"]
#![doc = "ownership-scoped task management, the persistence seam with Postgres and in-memory"]
#![doc = "stores, routing and error handling. The binary (`main.rs`) wires these together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
