//! Ingredient business logic - Lookup, prefix search and seeding.
//!
//! Every ingredient row carries `search_name`, its name lowercased with Unicode
//! rules. `SQLite` only folds ASCII case, so ordering and prefix search run on
//! that column instead of `name`.

use crate::{
    config::reference_data::IngredientConfig,
    entities::{Ingredient, ingredient},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Select, Set, prelude::*};
use tracing::{debug, info, instrument};

/// The value stored in `search_name` for an ingredient called `name`.
#[must_use]
pub fn search_key(name: &str) -> String {
    name.to_lowercase()
}

/// All ingredients in alphabetical order, ignoring case.
#[must_use]
pub fn ingredients_query() -> Select<Ingredient> {
    Ingredient::find()
        .order_by_asc(ingredient::Column::SearchName)
        .order_by_asc(ingredient::Column::Name)
        .order_by_asc(ingredient::Column::Id)
}

/// Retrieves all ingredients ordered alphabetically by name.
pub async fn get_all_ingredients(db: &DatabaseConnection) -> Result<Vec<ingredient::Model>> {
    ingredients_query().all(db).await.map_err(Into::into)
}

/// Finds an ingredient by ID, failing with `NotFound` when there is none.
pub async fn get_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i64,
) -> Result<ingredient::Model> {
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "ingredient",
            id: ingredient_id,
        })
}

/// Searches ingredients whose name starts with `prefix`, ignoring case.
///
/// The prefix is lowercased the same way as `search_name` and matched as a
/// range on the indexed column: every key starting with `prefix` sorts between
/// `prefix` itself and `prefix` followed by `char::MAX`. A missing or blank
/// prefix returns every ingredient.
pub async fn search_ingredients(
    db: &DatabaseConnection,
    prefix: Option<&str>,
) -> Result<Vec<ingredient::Model>> {
    let Some(prefix) = prefix.map(str::trim).filter(|p| !p.is_empty()) else {
        return get_all_ingredients(db).await;
    };

    let lower = search_key(prefix);
    let upper = format!("{lower}{}", char::MAX);
    let matching = ingredients_query()
        .filter(ingredient::Column::SearchName.gte(lower))
        .filter(ingredient::Column::SearchName.lt(upper))
        .all(db)
        .await?;
    debug!("{} ingredients match prefix '{}'", matching.len(), prefix);
    Ok(matching)
}

/// Inserts every configured ingredient whose (name, unit) pair is not present yet.
///
/// Returns the number of ingredients inserted.
#[instrument(skip(db, ingredients), fields(count = ingredients.len()))]
pub async fn seed_ingredients(
    db: &DatabaseConnection,
    ingredients: &[IngredientConfig],
) -> Result<usize> {
    let mut inserted = 0;
    for config in ingredients {
        let name = config.name.trim();
        let unit = config.measurement_unit.trim();
        if name.is_empty() || unit.is_empty() {
            return Err(Error::Config {
                message: "Ingredient name and measurement unit cannot be empty".to_string(),
            });
        }

        let existing = Ingredient::find()
            .filter(ingredient::Column::Name.eq(name))
            .filter(ingredient::Column::MeasurementUnit.eq(unit))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        ingredient::ActiveModel {
            name: Set(name.to_string()),
            measurement_unit: Set(unit.to_string()),
            search_name: Set(search_key(name)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!("Seeded {} new ingredients", inserted);
    Ok(inserted)
}
