/// Database module for pantry-dal
///
/// Owns the schema and every statement run against it, using SQLite through
/// sqlx with a pooled connection.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats, TABLES};
pub use models::*;
