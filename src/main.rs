// pantry-dal - pantry and recipe storage from the command line
//
// Parses CLI args, opens the database (bootstrapping the schema) and
// dispatches to handlers. Results are printed as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pantry_dal::{
    db::{IngredientInput, MergePolicy, NewRecipe, NewUser},
    logging::{init_tracing, LoggingConfig},
    Config, Database,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "pantry-dal", version, about = "Pantry and recipe storage")]
struct Cli {
    /// SQLite database file (overrides PANTRY_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the tables if they don't exist
    Init,
    /// Look up a user by email
    User { email: String },
    /// List a user's ingredients
    Ingredients { email: String },
    /// Create a user
    AddUser {
        email: String,
        password: String,
        name: String,
    },
    /// Add an ingredient, adding to any stored quantity unless --replace
    AddIngredient {
        email: String,
        ingredient: String,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        unit: Option<String>,
        /// Overwrite the stored quantity instead of adding to it
        #[arg(long)]
        replace: bool,
    },
    /// Create a recipe
    AddRecipe {
        recipe_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Show row counts
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&LoggingConfig { debug: cli.debug }) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "pantry-dal failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }

    // Schema bootstrap happens here; a broken schema stops the process.
    let db = Database::connect(&config)
        .await
        .with_context(|| format!("opening database {}", config.database_path.display()))?;

    let result = dispatch(&db, cli.command).await;
    db.close().await;
    result
}

async fn dispatch(db: &Database, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            db.create_tables().await?;
            println!("Schema ready at {}", db.path().display());
        }
        Commands::User { email } => print_json(&db.select_user(&email).await?)?,
        Commands::Ingredients { email } => print_json(&db.select_ingredients(&email).await?)?,
        Commands::AddUser {
            email,
            password,
            name,
        } => {
            db.insert_user(NewUser {
                email,
                password,
                name,
            })
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("User created");
        }
        Commands::AddIngredient {
            email,
            ingredient,
            quantity,
            unit,
            replace,
        } => {
            let input = IngredientInput {
                ingredient,
                quantity,
                unit,
            };
            let outcome = db
                .insert_ingredients(&email, &[input], MergePolicy::from_replace_flag(replace))
                .await;
            if let Some((_, e)) = outcome.errors().next() {
                anyhow::bail!(e.user_message());
            }
            print_json(&db.select_ingredients(&email).await?)?;
        }
        Commands::AddRecipe {
            recipe_id,
            title,
            image_url,
        } => {
            db.insert_recipe(NewRecipe {
                recipe_id,
                title,
                image_url,
            })
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Recipe created");
        }
        Commands::Stats => print_json(&db.stats().await?)?,
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_ingredient() {
        let cli = Cli::try_parse_from([
            "pantry-dal",
            "add-ingredient",
            "cook@example.com",
            "flour",
            "--quantity",
            "2",
            "--unit",
            "cup",
            "--replace",
        ])
        .unwrap();

        match cli.command {
            Commands::AddIngredient {
                quantity, replace, ..
            } => {
                assert_eq!(quantity, Some(2));
                assert!(replace);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
