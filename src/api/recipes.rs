//! Recipe endpoints - list, retrieve, write, favorites, cart and shopping-list download.
//!
//! `dispatch` is the single entry point for the recipe resource. Reads project
//! recipes with `RecipeRead`; writes go through `core::recipe` and answer with the
//! stored recipe projected for the requester.

use crate::{
    api::{
        ApiContext,
        pagination::{Page, paginate},
        projections::{RecipeRead, RecipeShort},
        requests::{RecipeQuery, RecipeWrite},
    },
    core::{
        favorite, filters::filtered_recipes_query, permissions::Requester, recipe,
        shopping_cart::{self, ShoppingListFile},
    },
    errors::Result,
};
use tracing::{debug, instrument};

/// An operation on the recipe resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeAction {
    /// Filtered, paginated list
    List(RecipeQuery),
    /// One recipe by ID
    Retrieve(i64),
    /// New recipe authored by the requester
    Create(RecipeWrite),
    /// Full replacement of an existing recipe
    Update {
        /// Recipe to replace
        id: i64,
        /// New contents
        payload: RecipeWrite,
    },
    /// Removal of a recipe
    Destroy(i64),
}

impl RecipeAction {
    /// Whether the action changes stored data.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Create(_) | Self::Update { .. } | Self::Destroy(_))
    }
}

/// Result of a `RecipeAction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeReply {
    /// Answer to `List`
    Page(Page<RecipeRead>),
    /// Answer to `Retrieve`, `Create` and `Update`
    Recipe(Box<RecipeRead>),
    /// Answer to `Destroy`
    Deleted,
}

/// Runs `action` for `requester`.
#[instrument(skip(ctx, action), fields(write = action.is_write()))]
pub async fn dispatch(
    ctx: &ApiContext,
    requester: &Requester,
    action: RecipeAction,
) -> Result<RecipeReply> {
    match action {
        RecipeAction::List(query) => list_recipes(ctx, requester, query)
            .await
            .map(RecipeReply::Page),
        RecipeAction::Retrieve(id) => {
            let stored = recipe::get_recipe(&ctx.database, id).await?;
            project(ctx, requester, stored).await
        }
        RecipeAction::Create(payload) => {
            let created = recipe::create_recipe(&ctx.database, requester, payload.into()).await?;
            project(ctx, requester, created).await
        }
        RecipeAction::Update { id, payload } => {
            let updated =
                recipe::update_recipe(&ctx.database, requester, id, payload.into()).await?;
            project(ctx, requester, updated).await
        }
        RecipeAction::Destroy(id) => {
            recipe::delete_recipe(&ctx.database, requester, id).await?;
            Ok(RecipeReply::Deleted)
        }
    }
}

async fn project(
    ctx: &ApiContext,
    requester: &Requester,
    stored: crate::entities::recipe::Model,
) -> Result<RecipeReply> {
    let read = RecipeRead::build(&ctx.database, requester, stored).await?;
    Ok(RecipeReply::Recipe(Box::new(read)))
}

async fn list_recipes(
    ctx: &ApiContext,
    requester: &Requester,
    query: RecipeQuery,
) -> Result<Page<RecipeRead>> {
    let (filter, params) = query.into_parts()?;
    let page = paginate(
        &ctx.database,
        filtered_recipes_query(requester, &filter),
        params,
        &ctx.settings,
    )
    .await?;
    debug!(count = page.count, page = page.page, "Recipes listed");

    let mut results = Vec::with_capacity(page.results.len());
    for stored in page.results.iter().cloned() {
        results.push(RecipeRead::build(&ctx.database, requester, stored).await?);
    }
    Ok(page.with_results(results))
}

/// Adds a recipe to the requester's favorites.
pub async fn favorite_recipe(
    ctx: &ApiContext,
    requester: &Requester,
    recipe_id: i64,
) -> Result<RecipeShort> {
    favorite::add_favorite(&ctx.database, requester, recipe_id)
        .await
        .map(RecipeShort::from)
}

/// Removes a recipe from the requester's favorites.
pub async fn unfavorite_recipe(
    ctx: &ApiContext,
    requester: &Requester,
    recipe_id: i64,
) -> Result<()> {
    favorite::remove_favorite(&ctx.database, requester, recipe_id).await
}

/// Adds a recipe to the requester's shopping cart.
pub async fn add_to_shopping_cart(
    ctx: &ApiContext,
    requester: &Requester,
    recipe_id: i64,
) -> Result<RecipeShort> {
    shopping_cart::add_to_cart(&ctx.database, requester, recipe_id)
        .await
        .map(RecipeShort::from)
}

/// Removes a recipe from the requester's shopping cart.
pub async fn remove_from_shopping_cart(
    ctx: &ApiContext,
    requester: &Requester,
    recipe_id: i64,
) -> Result<()> {
    shopping_cart::remove_from_cart(&ctx.database, requester, recipe_id).await
}

/// The requester's consolidated shopping list as a text attachment.
pub async fn download_shopping_cart(
    ctx: &ApiContext,
    requester: &Requester,
) -> Result<ShoppingListFile> {
    shopping_cart::export_shopping_list(&ctx.database, requester).await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        api::{error::ErrorBody, requests::IngredientAmountWrite},
        config::Settings,
        entities::Role,
        errors::Error,
        test_utils::*,
    };

    async fn context() -> Result<ApiContext> {
        Ok(ApiContext::new(setup_test_db().await?, Settings::default()))
    }

    fn write(name: &str, ingredient_id: i64, tags: Vec<i64>) -> RecipeWrite {
        RecipeWrite {
            ingredients: vec![IngredientAmountWrite {
                id: ingredient_id,
                amount: 2,
            }],
            tags,
            image: Some("recipes/images/pie.png".to_string()),
            name: name.to_string(),
            text: "Bake it".to_string(),
            cooking_time: 45,
        }
    }

    #[tokio::test]
    async fn test_create_retrieve_update_destroy() -> Result<()> {
        let ctx = context().await?;
        let author = create_test_user(&ctx.database, "author").await?;
        let apples = create_test_ingredient(&ctx.database, "apples", "pcs").await?;
        let dessert = create_test_tag(&ctx.database, "Dessert", "dessert").await?;
        let requester = Requester::user(author.id);

        let action = RecipeAction::Create(write("Pie", apples.id, vec![dessert.id]));
        assert!(action.is_write());
        let RecipeReply::Recipe(created) = dispatch(&ctx, &requester, action).await? else {
            return Err(Error::validation("reply", "expected a recipe"));
        };
        assert_eq!(created.name, "Pie");
        assert_eq!(created.tags[0].slug, "dessert");
        assert_eq!(created.ingredients[0].amount, 2);

        let mut update = write("Apple pie", apples.id, vec![]);
        update.image = None;
        let RecipeReply::Recipe(updated) = dispatch(
            &ctx,
            &requester,
            RecipeAction::Update {
                id: created.id,
                payload: update,
            },
        )
        .await?
        else {
            return Err(Error::validation("reply", "expected a recipe"));
        };
        assert_eq!(updated.name, "Apple pie");
        assert!(updated.tags.is_empty());
        assert_eq!(updated.image.as_deref(), Some("recipes/images/pie.png"));

        let reply = dispatch(&ctx, &requester, RecipeAction::Destroy(created.id)).await?;
        assert_eq!(reply, RecipeReply::Deleted);

        let result = dispatch(&ctx, &requester, RecipeAction::Retrieve(created.id)).await;
        let body = ErrorBody::from(result.unwrap_err());
        assert_eq!(body.status_code(), 404);
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_are_guarded() -> Result<()> {
        let ctx = context().await?;
        let author = create_test_user(&ctx.database, "author").await?;
        let other = create_test_user(&ctx.database, "other").await?;
        let moderator = create_test_user_with_role(&ctx.database, "mod", Role::Moderator).await?;
        let recipe = create_test_recipe(&ctx.database, author.id, "Stew").await?;
        let apples = create_test_ingredient(&ctx.database, "apples", "pcs").await?;

        let result = dispatch(
            &ctx,
            &Requester::Anonymous,
            RecipeAction::Create(write("Pie", apples.id, vec![])),
        )
        .await;
        assert_eq!(ErrorBody::from(result.unwrap_err()).status_code(), 403);

        let result = dispatch(&ctx, &Requester::user(other.id), RecipeAction::Destroy(recipe.id)).await;
        assert!(matches!(result, Err(Error::Permission { .. })));

        let empty = RecipeWrite {
            ingredients: vec![],
            ..write("Stew", apples.id, vec![])
        };
        let result = dispatch(
            &ctx,
            &Requester::user(author.id),
            RecipeAction::Update {
                id: recipe.id,
                payload: empty,
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(Error::Validation {
                field: "ingredients",
                ..
            })
        ));

        let privileged = Requester::User {
            id: moderator.id,
            role: Role::Moderator,
        };
        let reply = dispatch(&ctx, &privileged, RecipeAction::Destroy(recipe.id)).await?;
        assert_eq!(reply, RecipeReply::Deleted);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_with_filters_and_pages() -> Result<()> {
        let ctx = ApiContext::new(
            setup_test_db().await?,
            Settings {
                page_size: 2,
                ..Settings::default()
            },
        );
        let author = create_test_user(&ctx.database, "author").await?;
        let reader = create_test_user(&ctx.database, "reader").await?;
        let reader_req = Requester::user(reader.id);
        let mut ids = Vec::new();
        for name in ["One", "Two", "Three"] {
            ids.push(create_test_recipe(&ctx.database, author.id, name).await?.id);
        }
        favorite_recipe(&ctx, &reader_req, ids[0]).await?;

        let RecipeReply::Page(page) =
            dispatch(&ctx, &reader_req, RecipeAction::List(RecipeQuery::default())).await?
        else {
            return Err(Error::validation("reply", "expected a page"));
        };
        assert_eq!(page.count, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.results[0].name, "Three");

        let query = RecipeQuery {
            is_favorited: Some(1),
            ..Default::default()
        };
        let RecipeReply::Page(page) = dispatch(&ctx, &reader_req, RecipeAction::List(query)).await?
        else {
            return Err(Error::validation("reply", "expected a page"));
        };
        assert_eq!(page.count, 1);
        assert!(page.results[0].is_favorited);
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_and_download() -> Result<()> {
        let ctx = context().await?;
        let cook = create_test_user(&ctx.database, "cook").await?;
        let requester = Requester::user(cook.id);
        let recipe = create_test_recipe(&ctx.database, cook.id, "Stew").await?;

        let short = add_to_shopping_cart(&ctx, &requester, recipe.id).await?;
        assert_eq!(short.id, recipe.id);

        let file = download_shopping_cart(&ctx, &requester).await?;
        assert_eq!(file.body, "Shopping list:\nStew base (g) - 100");

        remove_from_shopping_cart(&ctx, &requester, recipe.id).await?;
        let result = remove_from_shopping_cart(&ctx, &requester, recipe.id).await;
        assert_eq!(
            ErrorBody::from(result.unwrap_err())
                .status_code(),
            404
        );

        favorite_recipe(&ctx, &requester, recipe.id).await?;
        let result = favorite_recipe(&ctx, &requester, recipe.id).await;
        assert!(matches!(result, Err(Error::Conflict { .. })));
        unfavorite_recipe(&ctx, &requester, recipe.id).await?;
        Ok(())
    }
}
