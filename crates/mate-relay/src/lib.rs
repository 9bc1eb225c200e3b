//! mate-relay - sync relay for Mate
//!
//! One authenticated endpoint, `POST /sync`, merges the caller's snapshot
//! into the snapshot stored under its bearer token and returns the result.

pub mod auth;
pub mod config;
pub mod error;
pub mod locks;
pub mod routes;

pub use config::RelayConfig;
pub use error::AppError;
pub use routes::{app_router, AppState};
