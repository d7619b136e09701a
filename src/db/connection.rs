/// Database connection management with connection pooling
///
/// `Database` is the handle every operation runs through. Build it once at
/// startup and clone it into whatever needs storage access.

use crate::config::Config;
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Table definitions, one idempotent statement per table
const SCHEMA: &str = include_str!("../../database/schema.sql");

/// Tables created by `create_tables`
pub const TABLES: [&str; 6] = [
    "users",
    "pantries",
    "usersPantries",
    "ingredients",
    "recipes",
    "usersRecipes",
];

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

impl Database {
    /// Open (or create) the database described by `config` and bootstrap the
    /// schema.
    ///
    /// # Returns
    /// * `Ok(Database)` - Connected, tables present
    /// * `Err(PantryError)` - If the directory, connection or schema fails
    ///
    /// # Examples
    /// ```no_run
    /// use pantry_dal::{Config, Database};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::connect(&Config::new("/var/lib/pantry/pantry.db")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: &Config) -> Result<Self> {
        let db_path = config.database_path.clone();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Built from the path, not a URL: file names may contain '?' or '#'.
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        info!(
            path = %db_path.display(),
            max_connections = config.max_connections,
            "Connected to database"
        );

        Self::from_pool(pool, db_path).await
    }

    /// Wrap an existing pool and bootstrap the schema on it
    pub async fn from_pool(pool: SqlitePool, db_path: PathBuf) -> Result<Self> {
        let db = Self {
            pool: Arc::new(pool),
            db_path,
        };

        db.create_tables().await?;

        Ok(db)
    }

    /// Create an isolated in-memory database.
    ///
    /// Uses one connection that never expires: every connection to
    /// `sqlite::memory:` is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool, PathBuf::from(":memory:")).await
    }

    /// Create every table if it doesn't exist yet.
    ///
    /// Safe to call any number of times.
    pub async fn create_tables(&self) -> Result<()> {
        match self.execute_schema().await {
            Ok(()) => {
                info!(tables = TABLES.len(), "Database schema ready");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to create database schema");
                Err(e)
            }
        }
    }

    async fn execute_schema(&self) -> Result<()> {
        for statement in SCHEMA.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed).execute(self.pool.as_ref()).await?;
            }
        }
        debug!("Schema statements executed");

        Ok(())
    }

    /// Get reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Close all connections in the pool
    ///
    /// Should be called on application shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Row counts and pool usage, for status output
    pub async fn stats(&self) -> Result<DatabaseStats> {
        let user_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool.as_ref())
            .await?;

        let ingredient_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
            .fetch_one(self.pool.as_ref())
            .await?;

        let recipe_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes")
            .fetch_one(self.pool.as_ref())
            .await?;

        let pantry_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pantries")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(DatabaseStats {
            total_users: user_count.0,
            total_ingredients: ingredient_count.0,
            total_recipes: recipe_count.0,
            total_pantries: pantry_count.0,
            pool_size: self.pool.size(),
            idle_connections: self.pool.num_idle(),
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    pub total_users: i64,
    pub total_ingredients: i64,
    pub total_recipes: i64,
    pub total_pantries: i64,
    pub pool_size: u32,
    pub idle_connections: usize,
}
