//! Tag business logic - Read access and seeding of recipe tags.

use crate::{
    config::reference_data::TagConfig,
    entities::{Tag, tag},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Retrieves all tags ordered alphabetically by name, ignoring case.
///
/// The tag list is short, so case folding happens here with Unicode rules
/// rather than in `SQLite`, which only folds ASCII.
pub async fn get_all_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>> {
    let mut tags = Tag::find()
        .order_by_asc(tag::Column::Name)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?;
    tags.sort_by_cached_key(|t| t.name.to_lowercase());
    Ok(tags)
}

/// Finds a tag by ID, failing with `NotFound` when there is none.
pub async fn get_tag(db: &DatabaseConnection, tag_id: i64) -> Result<tag::Model> {
    Tag::find_by_id(tag_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "tag",
            id: tag_id,
        })
}

/// Finds a tag by its slug.
pub async fn get_tag_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<tag::Model>> {
    Tag::find()
        .filter(tag::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Checks that `color` is a `#RRGGBB` hex color.
#[must_use]
pub fn is_valid_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Inserts every configured tag whose slug is not present yet.
///
/// Returns the number of tags inserted. Existing tags are not modified.
#[instrument(skip(db, tags), fields(count = tags.len()))]
pub async fn seed_tags(db: &DatabaseConnection, tags: &[TagConfig]) -> Result<usize> {
    let mut inserted = 0;
    for config in tags {
        if config.name.trim().is_empty() || config.slug.trim().is_empty() {
            return Err(Error::Config {
                message: "Tag name and slug cannot be empty".to_string(),
            });
        }
        if !is_valid_color(&config.color) {
            return Err(Error::Config {
                message: format!(
                    "Tag '{}' has invalid color '{}', expected #RRGGBB",
                    config.slug, config.color
                ),
            });
        }
        if get_tag_by_slug(db, &config.slug).await?.is_some() {
            continue;
        }

        tag::ActiveModel {
            name: Set(config.name.trim().to_string()),
            color: Set(config.color.to_uppercase()),
            slug: Set(config.slug.trim().to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted += 1;
    }

    info!("Seeded {} new tags", inserted);
    Ok(inserted)
}
