//! Recipe business logic - Composition, update, deletion and lookups.
//!
//! A recipe is written together with its full ingredient list and tag set. Create and
//! update each run in a single database transaction: the recipe row, its tag links
//! and its ingredient rows either all change or none do. Every input check happens
//! before the first write.

use crate::{
    core::permissions::Requester,
    entities::{
        Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag, ingredient, recipe,
        recipe_ingredient, recipe_tag, tag,
    },
    errors::{Error, Result, map_unique_violation},
};
use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryOrder, Select, Set, TransactionTrait, prelude::*,
};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, instrument};

/// Shortest allowed cooking time in minutes.
pub const MIN_COOKING_TIME: i32 = 1;
/// Longest allowed cooking time in minutes (24 hours).
pub const MAX_COOKING_TIME: i32 = 1440;
/// Longest allowed recipe name.
pub const MAX_NAME_LENGTH: usize = 200;

const DUPLICATE_NAME: &str = "you already have a recipe with this name";

/// One (ingredient, amount) pair of a recipe being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Referenced ingredient
    pub ingredient_id: i64,
    /// Amount in the ingredient's unit; must be positive
    pub amount: i32,
}

/// Everything needed to create a recipe or fully replace an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeInput {
    /// Title of the dish
    pub name: String,
    /// Cooking instructions
    pub text: String,
    /// Cooking time in minutes
    pub cooking_time: i32,
    /// Already-stored image reference; on update `None` keeps the current image
    pub image: Option<String>,
    /// Tag IDs; duplicates collapse
    pub tags: Vec<i64>,
    /// Ingredient amounts; at least one, no ingredient twice
    pub ingredients: Vec<IngredientAmount>,
}

/// Input that passed the checks that need no database access.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CheckedInput {
    name: String,
    text: String,
    cooking_time: i32,
    image: Option<String>,
    tags: BTreeSet<i64>,
    ingredients: Vec<IngredientAmount>,
}

/// An ingredient of a stored recipe joined with its reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    /// Ingredient ID
    pub ingredient_id: i64,
    /// Ingredient name
    pub name: String,
    /// Measurement unit
    pub measurement_unit: String,
    /// Amount used by the recipe
    pub amount: i32,
}

fn check_input(input: RecipeInput) -> Result<CheckedInput> {
    if input.ingredients.is_empty() {
        return Err(Error::validation(
            "ingredients",
            "a recipe needs at least one ingredient, you cannot cook from thin air",
        ));
    }

    let mut seen = HashSet::new();
    for item in &input.ingredients {
        if item.amount < 1 {
            return Err(Error::validation(
                "ingredients",
                format!(
                    "amount of ingredient {} must be at least 1",
                    item.ingredient_id
                ),
            ));
        }
        if !seen.insert(item.ingredient_id) {
            return Err(Error::validation(
                "ingredients",
                format!("ingredient {} is listed more than once", item.ingredient_id),
            ));
        }
    }

    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::validation("name", "recipe name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::validation(
            "name",
            format!("recipe name cannot be longer than {MAX_NAME_LENGTH} characters"),
        ));
    }
    if input.text.trim().is_empty() {
        return Err(Error::validation("text", "recipe text cannot be empty"));
    }
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&input.cooking_time) {
        return Err(Error::validation(
            "cooking_time",
            format!(
                "cooking time must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME} minutes"
            ),
        ));
    }

    Ok(CheckedInput {
        name,
        text: input.text,
        cooking_time: input.cooking_time,
        image: input.image,
        tags: input.tags.into_iter().collect(),
        ingredients: input.ingredients,
    })
}

async fn ensure_references_exist<C>(conn: &C, input: &CheckedInput) -> Result<()>
where
    C: ConnectionTrait,
{
    let ingredient_ids: Vec<i64> = input.ingredients.iter().map(|i| i.ingredient_id).collect();
    let known: HashSet<i64> = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ingredient_ids.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|i| i.id)
        .collect();
    if let Some(missing) = ingredient_ids.iter().copied().find(|id| !known.contains(id)) {
        return Err(Error::validation(
            "ingredients",
            format!("ingredient {missing} does not exist"),
        ));
    }

    if input.tags.is_empty() {
        return Ok(());
    }
    let known: HashSet<i64> = Tag::find()
        .filter(tag::Column::Id.is_in(input.tags.iter().copied()))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    if let Some(missing) = input.tags.iter().copied().find(|id| !known.contains(id)) {
        return Err(Error::validation(
            "tags",
            format!("tag {missing} does not exist"),
        ));
    }

    Ok(())
}

async fn insert_components<C>(conn: &C, recipe_id: i64, input: &CheckedInput) -> Result<()>
where
    C: ConnectionTrait,
{
    if !input.tags.is_empty() {
        let links = input.tags.iter().map(|tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        });
        RecipeTag::insert_many(links)
            .exec_without_returning(conn)
            .await?;
    }

    let rows = input
        .ingredients
        .iter()
        .map(|item| recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(item.ingredient_id),
            amount: Set(item.amount),
        });
    RecipeIngredient::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Creates a recipe authored by the requester, with its tags and ingredients.
///
/// # Errors
/// - `Permission` for anonymous requesters
/// - `Validation` for an empty or malformed ingredient list, unknown tag or
///   ingredient IDs, a blank name or text, or an out-of-range cooking time
/// - `Conflict` on `name` when the author already has a recipe with this name
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create_recipe(
    db: &DatabaseConnection,
    requester: &Requester,
    input: RecipeInput,
) -> Result<recipe::Model> {
    let author_id = requester.require_user()?;
    let input = check_input(input)?;

    let txn = db.begin().await?;
    ensure_references_exist(&txn, &input).await?;

    let created = recipe::ActiveModel {
        name: Set(input.name.clone()),
        text: Set(input.text.clone()),
        cooking_time: Set(input.cooking_time),
        image: Set(input.image.clone()),
        pub_date: Set(chrono::Utc::now()),
        author_id: Set(author_id),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| map_unique_violation(e, "name", DUPLICATE_NAME))?;

    insert_components(&txn, created.id, &input).await?;
    txn.commit().await?;

    info!(recipe_id = created.id, author_id, "Recipe created");
    Ok(created)
}

/// Replaces a recipe's fields, ingredient list and tag set.
///
/// The previous ingredients and tags are removed and the new ones inserted inside
/// one transaction, so a failure leaves the stored recipe exactly as it was. When
/// `input.image` is `None` the current image is kept.
///
/// # Errors
/// Same as `create_recipe`, plus `NotFound` for an unknown recipe and
/// `Permission` when the requester is neither the author nor privileged.
#[instrument(skip(db, input))]
pub async fn update_recipe(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
    input: RecipeInput,
) -> Result<recipe::Model> {
    requester.require_user()?;
    let existing = get_recipe(db, recipe_id).await?;
    requester.ensure_can_modify(&existing)?;
    let input = check_input(input)?;

    let txn = db.begin().await?;
    ensure_references_exist(&txn, &input).await?;

    let keep_image = existing.image.clone();
    let mut active: recipe::ActiveModel = existing.into();
    active.name = Set(input.name.clone());
    active.text = Set(input.text.clone());
    active.cooking_time = Set(input.cooking_time);
    active.image = Set(input.image.clone().or(keep_image));
    let updated = active
        .update(&txn)
        .await
        .map_err(|e| map_unique_violation(e, "name", DUPLICATE_NAME))?;

    RecipeIngredient::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    RecipeTag::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    insert_components(&txn, recipe_id, &input).await?;

    txn.commit().await?;
    info!(recipe_id, "Recipe updated");
    Ok(updated)
}

/// Deletes a recipe. Ingredient rows, tag links, favorites and cart entries
/// referencing it are removed by the foreign-key cascades.
///
/// # Errors
/// `Permission` for anonymous or unprivileged non-authors, `NotFound` for an
/// unknown recipe.
#[instrument(skip(db))]
pub async fn delete_recipe(
    db: &DatabaseConnection,
    requester: &Requester,
    recipe_id: i64,
) -> Result<()> {
    requester.require_user()?;
    let existing = get_recipe(db, recipe_id).await?;
    requester.ensure_can_modify(&existing)?;

    Recipe::delete_by_id(recipe_id).exec(db).await?;
    info!(recipe_id, "Recipe deleted");
    Ok(())
}

/// Finds a recipe by ID, failing with `NotFound` when there is none.
pub async fn get_recipe(db: &DatabaseConnection, recipe_id: i64) -> Result<recipe::Model> {
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "recipe",
            id: recipe_id,
        })
}

/// The ingredients of a recipe with names and units, ordered by name.
pub async fn get_recipe_ingredients(
    db: &DatabaseConnection,
    recipe_id: i64,
) -> Result<Vec<RecipeIngredientLine>> {
    let rows = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .find_also_related(Ingredient)
        .order_by_asc(ingredient::Column::SearchName)
        .order_by_asc(ingredient::Column::Name)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(row, ingredient)| {
            ingredient.map(|ing| RecipeIngredientLine {
                ingredient_id: row.ingredient_id,
                name: ing.name,
                measurement_unit: ing.measurement_unit,
                amount: row.amount,
            })
        })
        .collect())
}

/// The tags attached to a recipe, ordered by ID.
pub async fn get_recipe_tags(
    db: &DatabaseConnection,
    recipe: &recipe::Model,
) -> Result<Vec<tag::Model>> {
    recipe
        .find_related(Tag)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Query over one author's recipes, newest first.
#[must_use]
pub fn recipes_by_author_query(author_id: i64) -> Select<Recipe> {
    Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author_id))
        .order_by_desc(recipe::Column::PubDate)
        .order_by_desc(recipe::Column::Id)
}

/// Number of recipes written by an author.
pub async fn count_recipes_by_author(db: &DatabaseConnection, author_id: i64) -> Result<u64> {
    Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author_id))
        .count(db)
        .await
        .map_err(Into::into)
}
