/// pantry-dal library
///
/// Persistence layer for pantry and recipe tracking: schema bootstrap plus
/// the user, ingredient and recipe operations built on it.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{PantryError, Result};
