/// Error types for pantry-dal
///
/// Every storage operation fails with `PantryError::Database`, which carries
/// whatever the driver reported. The other variants only come from setup.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Main error type for pantry-dal operations
#[derive(Error, Debug)]
pub enum PantryError {
    /// Database-related errors (constraint violations, connectivity, bad SQL)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (creating the database directory, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for pantry-dal operations
pub type Result<T> = std::result::Result<T, PantryError>;

impl PantryError {
    /// True when the database rejected a write because of a table constraint
    /// (primary key, unique, foreign key, not-null or check).
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            PantryError::Database(sqlx::Error::Database(db_err)) => matches!(
                db_err.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            ),
            _ => false,
        }
    }

    /// Convert PantryError to a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            PantryError::Database(e) if self.is_constraint_violation() => {
                format!("That record conflicts with existing data. Details: {}", e)
            }
            PantryError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            PantryError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            PantryError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = PantryError::Config("PANTRY_MAX_CONNECTIONS is not a number".to_string());
        assert!(err.user_message().contains("PANTRY_MAX_CONNECTIONS"));

        let err = PantryError::Database(sqlx::Error::RowNotFound);
        assert!(err.user_message().starts_with("Database error"));
    }

    #[test]
    fn test_error_display() {
        let err = PantryError::Config("empty path".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Configuration error"));
    }

    #[test]
    fn test_non_database_errors_are_not_constraint_violations() {
        let err = PantryError::Database(sqlx::Error::PoolTimedOut);
        assert!(!err.is_constraint_violation());

        let err = PantryError::Io(std::io::Error::other("disk full"));
        assert!(!err.is_constraint_violation());
    }
}
