//! libSQL persistence for the key-value seam

mod connection;
mod kv_store;
mod migrations;

pub use connection::Database;
pub use kv_store::{LibSqlStore, LOCAL_AREA};
