//! Shared test utilities for Foodgram.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    core::{
        ingredient::search_key,
        permissions::Requester,
        recipe::{self, IngredientAmount, RecipeInput},
        user::{self, NewUser},
    },
    entities::{Role, ingredient, tag},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a regular user named `username`.
///
/// # Defaults
/// * `email`: `"{username}@example.com"`
/// * `first_name` / `last_name`: `"Test"` / `"User"`
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<crate::entities::user::Model> {
    create_test_user_with_role(db, username, Role::User).await
}

/// Creates a user with a specific role.
pub async fn create_test_user_with_role(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
) -> Result<crate::entities::user::Model> {
    user::create_user(
        db,
        NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
        },
    )
    .await
}

/// Inserts a tag with color `#FFFFFF`.
pub async fn create_test_tag(db: &DatabaseConnection, name: &str, slug: &str) -> Result<tag::Model> {
    let model = tag::ActiveModel {
        name: Set(name.to_string()),
        color: Set("#FFFFFF".to_string()),
        slug: Set(slug.to_string()),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Inserts an ingredient.
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    measurement_unit: &str,
) -> Result<ingredient::Model> {
    let model = ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(measurement_unit.to_string()),
        search_name: Set(search_key(name)),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// Builds recipe input around the given tags and ingredients.
///
/// # Defaults
/// * `text`: `"Mix everything and cook."`
/// * `cooking_time`: 30
/// * `image`: None
#[must_use]
pub fn recipe_input(name: &str, tags: Vec<i64>, ingredients: Vec<IngredientAmount>) -> RecipeInput {
    RecipeInput {
        name: name.to_string(),
        text: "Mix everything and cook.".to_string(),
        cooking_time: 30,
        image: None,
        tags,
        ingredients,
    }
}

/// Creates a recipe by `author_id` using a fresh `"{name} base"` ingredient.
pub async fn create_test_recipe(
    db: &DatabaseConnection,
    author_id: i64,
    name: &str,
) -> Result<crate::entities::recipe::Model> {
    let base = create_test_ingredient(db, &format!("{name} base"), "g").await?;
    recipe::create_recipe(
        db,
        &Requester::user(author_id),
        recipe_input(
            name,
            vec![],
            vec![IngredientAmount {
                ingredient_id: base.id,
                amount: 100,
            }],
        ),
    )
    .await
}
