//! Database configuration module for Foodgram.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the foreign keys (including their `ON DELETE CASCADE` rules) come straight from the
//! entity relations. Constraints that span several columns and are not primary keys, the
//! (name, author) uniqueness of recipes and the no-self-follow check, are added here on top
//! of the generated statements.

use crate::entities::{
    Favorite, Follow, Ingredient, Recipe, RecipeIngredient, RecipeTag, ShoppingCart, Tag, User,
    follow, ingredient, recipe,
};
use crate::errors::Result;
use sea_orm::sea_query::{Expr, Index, TableCreateStatement};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the `SQLite` database when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/foodgram.sqlite?mode=rwc";

/// Name of the unique index over (recipe name, author).
pub const RECIPE_NAME_AUTHOR_INDEX: &str = "idx_recipes_name_author_unique";

/// Name of the index backing ingredient prefix search.
pub const INGREDIENT_SEARCH_INDEX: &str = "idx_ingredients_search_name";

/// Creates the directory holding a file-backed `SQLite` database.
///
/// In-memory URLs and non-`SQLite` URLs are left alone.
pub fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        debug!("Ensured database directory {}", parent.display());
    }
    Ok(())
}

/// Establishes a connection to the database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

async fn create_table(db: &DatabaseConnection, mut stmt: TableCreateStatement) -> Result<()> {
    let builder = db.get_database_backend();
    stmt.if_not_exists();
    db.execute(builder.build(&stmt)).await?;
    Ok(())
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema.create_table_from_entity(entity)
}

/// Creates all tables and indexes if they do not exist yet.
///
/// Tables are created parents first so every foreign key points at an existing
/// table. Running this against an already initialized database is a no-op.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    create_table(db, table_for(&schema, User)).await?;
    create_table(db, table_for(&schema, Tag)).await?;
    create_table(db, table_for(&schema, Ingredient)).await?;
    create_table(db, table_for(&schema, Recipe)).await?;
    create_table(db, table_for(&schema, RecipeIngredient)).await?;
    create_table(db, table_for(&schema, RecipeTag)).await?;
    create_table(db, table_for(&schema, Favorite)).await?;
    create_table(db, table_for(&schema, ShoppingCart)).await?;

    let mut follows = table_for(&schema, Follow);
    follows.check(
        Expr::col(follow::Column::UserId).ne(Expr::col(follow::Column::AuthorId)),
    );
    create_table(db, follows).await?;

    let recipe_index = Index::create()
        .name(RECIPE_NAME_AUTHOR_INDEX)
        .table(Recipe)
        .col(recipe::Column::Name)
        .col(recipe::Column::AuthorId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&recipe_index)).await?;

    let ingredient_index = Index::create()
        .name(INGREDIENT_SEARCH_INDEX)
        .table(Ingredient)
        .col(ingredient::Column::SearchName)
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&ingredient_index)).await?;

    info!("Database tables ensured");
    Ok(())
}
