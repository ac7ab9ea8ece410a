//! Read projections returned by the handlers.
//!
//! Field names are the public contract; requester-relative flags
//! (`is_subscribed`, `is_favorited`, `is_in_shopping_cart`) are computed for the
//! requester passed in and are always false for anonymous requesters.

// Field names are the JSON keys
#![allow(missing_docs)]

use crate::{
    core::{
        favorite::is_favorited,
        follow::{is_subscribed, recipe_preview},
        permissions::Requester,
        recipe::{RecipeIngredientLine, get_recipe_ingredients, get_recipe_tags},
        shopping_cart::is_in_shopping_cart,
        user::require_user,
    },
    entities::{ingredient, recipe, tag, user},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRead {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the requester follows this user
    pub is_subscribed: bool,
}

impl UserRead {
    /// Projects `user` for `requester`.
    pub async fn build(
        db: &DatabaseConnection,
        requester: &Requester,
        user: user::Model,
    ) -> Result<Self> {
        let is_subscribed = is_subscribed(db, requester, user.id).await?;
        Ok(Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRead {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<tag::Model> for TagRead {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientRead {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

impl From<ingredient::Model> for IngredientRead {
    fn from(ingredient: ingredient::Model) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient of a recipe; `id` is the ingredient's ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredientRead {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<RecipeIngredientLine> for RecipeIngredientRead {
    fn from(line: RecipeIngredientLine) -> Self {
        Self {
            id: line.ingredient_id,
            name: line.name,
            measurement_unit: line.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe as shown in lists and detail views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeRead {
    pub id: i64,
    pub tags: Vec<TagRead>,
    pub author: UserRead,
    pub ingredients: Vec<RecipeIngredientRead>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: Option<String>,
    pub text: String,
    pub cooking_time: i32,
}

impl RecipeRead {
    /// Loads tags, author and ingredients of `recipe` and projects it for `requester`.
    pub async fn build(
        db: &DatabaseConnection,
        requester: &Requester,
        recipe: recipe::Model,
    ) -> Result<Self> {
        let tags = get_recipe_tags(db, &recipe).await?;
        let author = require_user(db, recipe.author_id).await?;
        let ingredients = get_recipe_ingredients(db, recipe.id).await?;

        Ok(Self {
            id: recipe.id,
            tags: tags.into_iter().map(TagRead::from).collect(),
            author: UserRead::build(db, requester, author).await?,
            ingredients: ingredients
                .into_iter()
                .map(RecipeIngredientRead::from)
                .collect(),
            is_favorited: is_favorited(db, requester, recipe.id).await?,
            is_in_shopping_cart: is_in_shopping_cart(db, requester, recipe.id).await?,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        })
    }
}

/// Compact recipe used by favorites, cart and subscription previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i32,
}

impl From<recipe::Model> for RecipeShort {
    fn from(recipe: recipe::Model) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionRead {
    #[serde(flatten)]
    pub author: UserRead,
    pub recipes: Vec<RecipeShort>,
    /// Total recipes by the author, not capped by the preview limit
    pub recipes_count: u64,
}

impl SubscriptionRead {
    /// Projects a followed `author` with up to `recipes_limit` recipes.
    pub async fn build(
        db: &DatabaseConnection,
        requester: &Requester,
        author: user::Model,
        recipes_limit: Option<i64>,
    ) -> Result<Self> {
        let preview = recipe_preview(db, author.id, recipes_limit).await?;
        Ok(Self {
            author: UserRead::build(db, requester, author).await?,
            recipes: preview.recipes.into_iter().map(RecipeShort::from).collect(),
            recipes_count: preview.recipes_count,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{favorite::add_favorite, follow::subscribe},
        test_utils::*,
    };

    #[tokio::test]
    async fn test_recipe_read_fields_and_flags() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "author").await?;
        let reader = create_test_user(&db, "reader").await?;
        let recipe = create_test_recipe(&db, author.id, "Stew").await?;
        let requester = Requester::user(reader.id);

        add_favorite(&db, &requester, recipe.id).await?;
        subscribe(&db, &requester, author.id).await?;

        let read = RecipeRead::build(&db, &requester, recipe.clone()).await?;
        assert!(read.is_favorited);
        assert!(!read.is_in_shopping_cart);
        assert!(read.author.is_subscribed);
        assert_eq!(read.ingredients.len(), 1);

        let json = serde_json::to_value(&read).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for key in [
            "id",
            "tags",
            "author",
            "ingredients",
            "is_favorited",
            "is_in_shopping_cart",
            "name",
            "image",
            "text",
            "cooking_time",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(json["ingredients"][0]["name"], "Stew base");
        assert_eq!(json["ingredients"][0]["amount"], 100);

        let anonymous = RecipeRead::build(&db, &Requester::Anonymous, recipe).await?;
        assert!(!anonymous.is_favorited);
        assert!(!anonymous.author.is_subscribed);
        Ok(())
    }

    #[tokio::test]
    async fn test_subscription_read_flattens_author() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "author").await?;
        let reader = create_test_user(&db, "reader").await?;
        create_test_recipe(&db, author.id, "One").await?;
        create_test_recipe(&db, author.id, "Two").await?;
        let requester = Requester::user(reader.id);
        subscribe(&db, &requester, author.id).await?;

        let read = SubscriptionRead::build(&db, &requester, author, Some(1)).await?;
        let json = serde_json::to_value(&read).unwrap();
        assert_eq!(json["username"], "author");
        assert_eq!(json["is_subscribed"], true);
        assert_eq!(json["recipes_count"], 2);
        assert_eq!(json["recipes"].as_array().unwrap().len(), 1);
        assert_eq!(json["recipes"][0]["name"], "Two");
        Ok(())
    }
}
