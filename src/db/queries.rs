/// SQL query functions for database operations
///
/// Each operation is a single statement; none of them open a transaction.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use futures::future::join_all;
use sqlx::Row;
use tracing::{debug, warn};

const UPSERT_REPLACE: &str = r#"
    INSERT INTO ingredients (email, ingredient, quantity, unit)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(ingredient, email) DO UPDATE SET
        quantity = excluded.quantity,
        unit = excluded.unit,
        updatedAt = CURRENT_TIMESTAMP
"#;

const UPSERT_ACCUMULATE: &str = r#"
    INSERT INTO ingredients (email, ingredient, quantity, unit)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(ingredient, email) DO UPDATE SET
        quantity = ingredients.quantity + excluded.quantity,
        unit = excluded.unit,
        updatedAt = CURRENT_TIMESTAMP
"#;

impl Database {
    /// Look up a user by email
    ///
    /// # Returns
    /// * `Ok(Vec<User>)` - Zero or one user; an unknown email is not an error
    pub async fn select_user(&self, email: &str) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT email, name, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_all(self.pool())
        .await?;

        Ok(users)
    }

    /// Get every ingredient stored for an email
    pub async fn select_ingredients(&self, email: &str) -> Result<Vec<Ingredient>> {
        let ingredients = sqlx::query_as::<_, Ingredient>(
            "SELECT ingredient, quantity, unit FROM ingredients WHERE email = ?",
        )
        .bind(email)
        .fetch_all(self.pool())
        .await?;

        Ok(ingredients)
    }

    /// Create a user
    ///
    /// # Returns
    /// * `Ok(u64)` - Rows inserted
    /// * `Err(PantryError)` - Constraint violation if the email already exists
    pub async fn insert_user(&self, user: NewUser) -> Result<u64> {
        debug!(email = %user.email, "Inserting user");

        let result = sqlx::query("INSERT INTO users (email, password, name) VALUES (?, ?, ?)")
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.name)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Insert or merge one ingredient for an email
    ///
    /// On an existing (ingredient, email) row, `policy` decides whether the
    /// quantity is overwritten or added to. The unit is always overwritten.
    pub async fn upsert_ingredient(
        &self,
        email: &str,
        input: &IngredientInput,
        policy: MergePolicy,
    ) -> Result<u64> {
        let sql = match policy {
            MergePolicy::Replace => UPSERT_REPLACE,
            MergePolicy::Accumulate => UPSERT_ACCUMULATE,
        };

        let result = sqlx::query(sql)
            .bind(email)
            .bind(&input.ingredient)
            .bind(input.quantity)
            .bind(&input.unit)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Upsert a batch of ingredients for an email
    ///
    /// Every item runs as its own statement, concurrently and outside any
    /// transaction. A failing item doesn't stop the rest; the outcome holds
    /// one result per input item in input order.
    pub async fn insert_ingredients(
        &self,
        email: &str,
        ingredients: &[IngredientInput],
        policy: MergePolicy,
    ) -> UpsertOutcome {
        debug!(email, %policy, count = ingredients.len(), "Upserting ingredients");

        let pending = ingredients
            .iter()
            .map(|input| self.upsert_ingredient(email, input, policy));

        let outcome = UpsertOutcome {
            results: join_all(pending).await,
        };

        for (index, err) in outcome.errors() {
            let ingredient = ingredients[index].ingredient.as_str();
            warn!(
                email,
                ingredient,
                error = %err,
                "Ingredient upsert failed"
            );
        }

        outcome
    }

    /// Create a recipe
    ///
    /// # Returns
    /// * `Ok(u64)` - Rows inserted
    /// * `Err(PantryError)` - Constraint violation on a duplicate recipe id
    pub async fn insert_recipe(&self, recipe: NewRecipe) -> Result<u64> {
        debug!(recipe_id = %recipe.recipe_id, "Inserting recipe");

        let result =
            sqlx::query("INSERT INTO recipes (recipeId, title, imageUrl) VALUES (?, ?, ?)")
                .bind(&recipe.recipe_id)
                .bind(&recipe.title)
                .bind(&recipe.image_url)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected())
    }

    /// Link a saved recipe to a user
    pub async fn save_recipe_for_user(&self, email: &str, recipe_id: &str) -> Result<u64> {
        let result = sqlx::query("INSERT INTO usersRecipes (email, recipeId) VALUES (?, ?)")
            .bind(email)
            .bind(recipe_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Get the recipes a user has saved
    pub async fn select_user_recipes(&self, email: &str) -> Result<Vec<Recipe>> {
        let recipes = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT r.recipeId, r.title, r.imageUrl
            FROM recipes r
            JOIN usersRecipes ur ON ur.recipeId = r.recipeId
            WHERE ur.email = ?
            ORDER BY ur.createdAt, r.recipeId
            "#,
        )
        .bind(email)
        .fetch_all(self.pool())
        .await?;

        Ok(recipes)
    }

    /// Create a pantry
    ///
    /// # Returns
    /// * `Ok(i64)` - The new pantry id
    pub async fn create_pantry(&self, name: &str) -> Result<i64> {
        let row = sqlx::query("INSERT INTO pantries (name) VALUES (?) RETURNING pantryId")
            .bind(name)
            .fetch_one(self.pool())
            .await?;

        Ok(row.try_get(0)?)
    }

    /// Give a user access to a pantry
    pub async fn add_user_to_pantry(&self, email: &str, pantry_id: i64) -> Result<u64> {
        let result = sqlx::query("INSERT INTO usersPantries (email, pantryId) VALUES (?, ?)")
            .bind(email)
            .bind(pantry_id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }

    /// Get the pantries a user belongs to
    pub async fn select_user_pantries(&self, email: &str) -> Result<Vec<Pantry>> {
        let pantries = sqlx::query_as::<_, Pantry>(
            r#"
            SELECT p.pantryId, p.name
            FROM pantries p
            JOIN usersPantries up ON up.pantryId = p.pantryId
            WHERE up.email = ?
            ORDER BY p.pantryId
            "#,
        )
        .bind(email)
        .fetch_all(self.pool())
        .await?;

        Ok(pantries)
    }
}
