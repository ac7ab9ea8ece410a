//! Favorite business logic - Adding and removing recipes from a user's favorites.

use crate::{
    core::{permissions::Requester, recipe::get_recipe},
    entities::{Favorite, favorite, recipe},
    errors::{Error, Result, map_unique_violation},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

const ALREADY_FAVORITED: &str = "recipe is already in favorites";
const NOT_FAVORITED: &str = "recipe is not in favorites";

/// Adds a recipe to the requester's favorites and returns the recipe.
///
/// # Errors
/// `Permission` when anonymous, `NotFound` for an unknown recipe, `Conflict`
/// when the recipe is already a favorite (including a concurrent duplicate
/// insert that lost the race on the primary key).
#[instrument(skip(db))]
pub async fn add_favorite(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<recipe::Model> {
    let user_id = requester.require_user()?;
    let recipe = get_recipe(db, recipe_id).await?;

    if Favorite::find_by_id((user_id, recipe_id)).one(db).await?.is_some() {
        return Err(Error::conflict("recipe", ALREADY_FAVORITED));
    }

    Favorite::insert(favorite::ActiveModel {
        user_id: Set(user_id),
        recipe_id: Set(recipe_id),
    })
    .exec_without_returning(db)
    .await
    .map_err(|e| map_unique_violation(e, "recipe", ALREADY_FAVORITED))?;

    info!(user_id, recipe_id, "Recipe added to favorites");
    Ok(recipe)
}

/// Removes a recipe from the requester's favorites.
///
/// Removing a recipe that is not a favorite is an error, not a no-op.
#[instrument(skip(db))]
pub async fn remove_favorite(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<()> {
    let user_id = requester.require_user()?;
    get_recipe(db, recipe_id).await?;

    let result = Favorite::delete_by_id((user_id, recipe_id)).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotRelated {
            field: "recipe",
            message: NOT_FAVORITED.to_string(),
        });
    }

    info!(user_id, recipe_id, "Recipe removed from favorites");
    Ok(())
}

/// Whether the requester has favorited the recipe; always false when anonymous.
pub async fn is_favorited(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<bool> {
    let Some(user_id) = requester.user_id() else {
        return Ok(false);
    };
    Ok(Favorite::find_by_id((user_id, recipe_id))
        .one(db)
        .await?
        .is_some())
}
