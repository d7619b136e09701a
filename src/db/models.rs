/// Data models for database entities
///
/// Row types derive `FromRow`; input types carry what callers supply.

use crate::error::PantryError;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user as returned by lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub email: String,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Input for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// One stored ingredient for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub ingredient: String,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
}

/// Input for one ingredient upsert.
///
/// Missing quantity or unit are written as NULL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientInput {
    pub ingredient: String,
    pub quantity: Option<i64>,
    pub unit: Option<String>,
}

impl IngredientInput {
    pub fn new(ingredient: impl Into<String>, quantity: i64, unit: impl Into<String>) -> Self {
        Self {
            ingredient: ingredient.into(),
            quantity: Some(quantity),
            unit: Some(unit.into()),
        }
    }
}

/// How an ingredient upsert treats an existing row for the same
/// (ingredient, email)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Overwrite quantity and unit
    Replace,
    /// Add to the stored quantity, overwrite unit
    #[default]
    Accumulate,
}

impl MergePolicy {
    /// `true` selects `Replace`
    pub fn from_replace_flag(should_replace: bool) -> Self {
        if should_replace {
            MergePolicy::Replace
        } else {
            MergePolicy::Accumulate
        }
    }
}

impl std::fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MergePolicy::Replace => "replace",
            MergePolicy::Accumulate => "accumulate",
        };
        write!(f, "{}", s)
    }
}

/// Per-item results of an ingredient batch, in input order
#[derive(Debug, Default)]
pub struct UpsertOutcome {
    pub results: Vec<Result<u64, PantryError>>,
}

impl UpsertOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.is_ok())
    }

    /// Errors paired with the index of the input item that produced them
    pub fn errors(&self) -> impl Iterator<Item = (usize, &PantryError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }
}

/// Input for creating a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub recipe_id: String,
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// A stored recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    #[sqlx(rename = "recipeId")]
    pub recipe_id: String,
    pub title: Option<String>,
    #[sqlx(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// A shared pantry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Pantry {
    #[sqlx(rename = "pantryId")]
    pub pantry_id: i64,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_policy_from_flag() {
        assert_eq!(MergePolicy::from_replace_flag(true), MergePolicy::Replace);
        assert_eq!(MergePolicy::from_replace_flag(false), MergePolicy::Accumulate);
        assert_eq!(MergePolicy::default(), MergePolicy::Accumulate);
    }

    #[test]
    fn test_merge_policy_display() {
        assert_eq!(MergePolicy::Replace.to_string(), "replace");
        assert_eq!(MergePolicy::Accumulate.to_string(), "accumulate");
    }

    #[test]
    fn test_upsert_outcome_counts() {
        let outcome = UpsertOutcome {
            results: vec![
                Ok(1),
                Err(PantryError::Database(sqlx::Error::PoolTimedOut)),
                Ok(1),
            ],
        };

        assert_eq!(outcome.len(), 3);
        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed(), 1);
        assert!(!outcome.all_succeeded());

        let failed: Vec<usize> = outcome.errors().map(|(i, _)| i).collect();
        assert_eq!(failed, vec![1]);
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = UpsertOutcome::default();
        assert!(outcome.is_empty());
        assert!(outcome.all_succeeded());
    }

    #[test]
    fn test_ingredient_input_deserialize_without_quantity() {
        let input: IngredientInput =
            serde_json::from_str(r#"{"ingredient": "salt", "quantity": null, "unit": null}"#)
                .unwrap();
        assert_eq!(input.ingredient, "salt");
        assert_eq!(input.quantity, None);
    }
}
