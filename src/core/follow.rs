//! Follow business logic - Subscriptions between users and recipe previews.

use crate::{
    core::{
        permissions::Requester,
        recipe::{count_recipes_by_author, recipes_by_author_query},
        user::require_user,
    },
    entities::{Follow, User, follow, recipe, user},
    errors::{Error, Result, map_unique_violation},
};
use sea_orm::{JoinType, QueryOrder, QuerySelect, RelationTrait, Select, Set, prelude::*};
use tracing::{info, instrument};

const ALREADY_SUBSCRIBED: &str = "you are already subscribed to this author";
const NOT_SUBSCRIBED: &str = "you are not subscribed to this author";
const SELF_FOLLOW: &str = "you cannot follow yourself";

/// An author's most recent recipes plus their total recipe count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecipes {
    /// Newest first, capped by the requested limit
    pub recipes: Vec<recipe::Model>,
    /// Number of recipes regardless of the cap
    pub recipes_count: u64,
}

/// Subscribes the requester to `author_id` and returns the author.
///
/// # Errors
/// - `Conflict` on `author` when following yourself or an existing subscription
/// - `NotFound` when the author does not exist
#[instrument(skip(db))]
pub async fn subscribe(
    db: &DatabaseConnection,
    requester: &Requester,
    author_id: i64,
) -> Result<user::Model> {
    let user_id = requester.require_user()?;
    if user_id == author_id {
        return Err(Error::conflict("author", SELF_FOLLOW));
    }
    let author = require_user(db, author_id).await?;

    if Follow::find_by_id((user_id, author_id))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::conflict("author", ALREADY_SUBSCRIBED));
    }

    Follow::insert(follow::ActiveModel {
        user_id: Set(user_id),
        author_id: Set(author_id),
        created_at: Set(chrono::Utc::now()),
    })
    .exec_without_returning(db)
    .await
    .map_err(|e| map_unique_violation(e, "author", ALREADY_SUBSCRIBED))?;

    info!(user_id, author_id, "Subscribed to author");
    Ok(author)
}

/// Ends the requester's subscription to `author_id`.
#[instrument(skip(db))]
pub async fn unsubscribe(
    db: &DatabaseConnection,
    requester: &Requester,
    author_id: i64,
) -> Result<()> {
    let user_id = requester.require_user()?;
    require_user(db, author_id).await?;

    let result = Follow::delete_by_id((user_id, author_id)).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotRelated {
            field: "author",
            message: NOT_SUBSCRIBED.to_string(),
        });
    }

    info!(user_id, author_id, "Unsubscribed from author");
    Ok(())
}

/// Whether the requester follows `author_id`; false when anonymous.
pub async fn is_subscribed(
    db: &DatabaseConnection,
    requester: &Requester,
    author_id: i64,
) -> Result<bool> {
    let Some(user_id) = requester.user_id() else {
        return Ok(false);
    };
    Ok(Follow::find_by_id((user_id, author_id))
        .one(db)
        .await?
        .is_some())
}

/// Authors followed by `user_id`, most recent subscription first.
#[must_use]
pub fn subscribed_authors_query(user_id: i64) -> Select<User> {
    User::find()
        .join(JoinType::InnerJoin, follow::Relation::Author.def().rev())
        .filter(follow::Column::UserId.eq(user_id))
        .order_by_desc(follow::Column::CreatedAt)
        .order_by_desc(follow::Column::AuthorId)
}

/// Preview of an author's recipes for the subscription listing.
///
/// `limit` caps the preview (zero gives an empty one); the count is never capped.
///
/// # Errors
/// `Validation` on `recipes_limit` for a negative limit.
pub async fn recipe_preview(
    db: &DatabaseConnection,
    author_id: i64,
    limit: Option<i64>,
) -> Result<AuthorRecipes> {
    let mut query = recipes_by_author_query(author_id);
    if let Some(limit) = limit {
        let limit = u64::try_from(limit).map_err(|_| {
            Error::validation("recipes_limit", "recipes_limit cannot be negative")
        })?;
        query = query.limit(limit);
    }

    Ok(AuthorRecipes {
        recipes: query.all(db).await?,
        recipes_count: count_recipes_by_author(db, author_id).await?,
    })
}
