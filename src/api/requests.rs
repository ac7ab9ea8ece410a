//! Request payloads as decoded by the embedding server.

use crate::{
    api::pagination::PageParams,
    core::{
        filters::RecipeFilter,
        recipe::{IngredientAmount, RecipeInput},
        user::NewUser,
    },
    entities::Role,
    errors::{Error, Result},
};
use serde::Deserialize;

/// One ingredient line of a recipe write; `id` is the ingredient's ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmountWrite {
    /// Ingredient ID
    pub id: i64,
    /// Amount in the ingredient's unit
    pub amount: i32,
}

/// Body of recipe create and update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecipeWrite {
    /// Ingredient lines
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountWrite>,
    /// Tag IDs
    #[serde(default)]
    pub tags: Vec<i64>,
    /// Reference of an already-stored image
    #[serde(default)]
    pub image: Option<String>,
    /// Title
    pub name: String,
    /// Instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i32,
}

impl From<RecipeWrite> for RecipeInput {
    fn from(write: RecipeWrite) -> Self {
        Self {
            name: write.name,
            text: write.text,
            cooking_time: write.cooking_time,
            image: write.image,
            tags: write.tags,
            ingredients: write
                .ingredients
                .into_iter()
                .map(|line| IngredientAmount {
                    ingredient_id: line.id,
                    amount: line.amount,
                })
                .collect(),
        }
    }
}

/// Query string of the recipe list.
///
/// `is_favorited` and `is_in_shopping_cart` take `1` (filter) or `0` (no filter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecipeQuery {
    /// Page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
    /// Author ID
    pub author: Option<i64>,
    /// Tag slugs; any of them matches
    #[serde(default)]
    pub tags: Vec<String>,
    /// `1` to keep only the requester's favorites
    pub is_favorited: Option<u8>,
    /// `1` to keep only recipes in the requester's cart
    pub is_in_shopping_cart: Option<u8>,
}

fn flag(field: &'static str, value: Option<u8>) -> Result<bool> {
    match value {
        None | Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(other) => Err(Error::validation(
            field,
            format!("expected 0 or 1, got {other}"),
        )),
    }
}

impl RecipeQuery {
    /// Splits the query into filter predicates and page parameters.
    pub fn into_parts(self) -> Result<(RecipeFilter, PageParams)> {
        let filter = RecipeFilter {
            author: self.author,
            tags: self.tags,
            is_favorited: flag("is_favorited", self.is_favorited)?,
            is_in_shopping_cart: flag("is_in_shopping_cart", self.is_in_shopping_cart)?,
        };
        Ok((
            filter,
            PageParams {
                page: self.page,
                limit: self.limit,
            },
        ))
    }
}

/// Query string of the subscription list and of subscribe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriptionQuery {
    /// Page number
    pub page: Option<u64>,
    /// Page size
    pub limit: Option<u64>,
    /// Cap on each author's recipe preview
    pub recipes_limit: Option<i64>,
}

impl SubscriptionQuery {
    /// Page parameters of the query.
    #[must_use]
    pub const fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// Query string of the ingredient list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IngredientQuery {
    /// Name prefix, matched case-insensitively
    pub name: Option<String>,
}

/// Body of user registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserWrite {
    /// Email
    pub email: String,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl From<UserWrite> for NewUser {
    fn from(write: UserWrite) -> Self {
        Self {
            email: write.email,
            username: write.username,
            first_name: write.first_name,
            last_name: write.last_name,
            role: Role::User,
        }
    }
}
