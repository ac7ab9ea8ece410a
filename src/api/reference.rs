//! Tag and ingredient endpoints. Both are read-only and unpaginated.

use crate::{
    api::{
        ApiContext,
        projections::{IngredientRead, TagRead},
        requests::IngredientQuery,
    },
    core::{ingredient, tag},
    errors::Result,
};

/// All tags, alphabetically.
pub async fn list_tags(ctx: &ApiContext) -> Result<Vec<TagRead>> {
    let tags = tag::get_all_tags(&ctx.database).await?;
    Ok(tags.into_iter().map(TagRead::from).collect())
}

/// One tag.
pub async fn retrieve_tag(ctx: &ApiContext, tag_id: i64) -> Result<TagRead> {
    tag::get_tag(&ctx.database, tag_id).await.map(TagRead::from)
}

/// Ingredients, optionally narrowed to a case-insensitive name prefix.
pub async fn list_ingredients(
    ctx: &ApiContext,
    query: IngredientQuery,
) -> Result<Vec<IngredientRead>> {
    let ingredients = ingredient::search_ingredients(&ctx.database, query.name.as_deref()).await?;
    Ok(ingredients.into_iter().map(IngredientRead::from).collect())
}

/// One ingredient.
pub async fn retrieve_ingredient(ctx: &ApiContext, ingredient_id: i64) -> Result<IngredientRead> {
    ingredient::get_ingredient(&ctx.database, ingredient_id)
        .await
        .map(IngredientRead::from)
}
