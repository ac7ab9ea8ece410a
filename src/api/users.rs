//! User endpoints - registration, profiles and subscriptions.

use crate::{
    api::{
        ApiContext,
        pagination::{Page, PageParams, paginate},
        projections::{SubscriptionRead, UserRead},
        requests::{SubscriptionQuery, UserWrite},
    },
    core::{follow, permissions::Requester, user},
    errors::{Error, Result},
};
use tracing::instrument;

/// Registers a regular user.
pub async fn create_user(ctx: &ApiContext, payload: UserWrite) -> Result<UserRead> {
    let created = user::create_user(&ctx.database, payload.into()).await?;
    // Nobody follows a brand-new user
    UserRead::build(&ctx.database, &Requester::Anonymous, created).await
}

/// All users ordered by ID.
pub async fn list_users(
    ctx: &ApiContext,
    requester: &Requester,
    params: PageParams,
) -> Result<Page<UserRead>> {
    let page = paginate(&ctx.database, user::users_query(), params, &ctx.settings).await?;
    let mut results = Vec::with_capacity(page.results.len());
    for stored in page.results.iter().cloned() {
        results.push(UserRead::build(&ctx.database, requester, stored).await?);
    }
    Ok(page.with_results(results))
}

/// One user's profile.
pub async fn retrieve_user(
    ctx: &ApiContext,
    requester: &Requester,
    user_id: i64,
) -> Result<UserRead> {
    let stored = user::require_user(&ctx.database, user_id).await?;
    UserRead::build(&ctx.database, requester, stored).await
}

/// The requester's own profile.
pub async fn me(ctx: &ApiContext, requester: &Requester) -> Result<UserRead> {
    let user_id = requester.require_user()?;
    retrieve_user(ctx, requester, user_id).await
}

/// Follows `author_id` and returns the author with a recipe preview.
#[instrument(skip(ctx))]
pub async fn subscribe(
    ctx: &ApiContext,
    requester: &Requester,
    author_id: i64,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionRead> {
    // Rejected before the follow row is written
    if recipes_limit.is_some_and(|limit| limit < 0) {
        return Err(Error::validation(
            "recipes_limit",
            "recipes_limit cannot be negative",
        ));
    }
    let author = follow::subscribe(&ctx.database, requester, author_id).await?;
    SubscriptionRead::build(&ctx.database, requester, author, recipes_limit).await
}

/// Stops following `author_id`.
pub async fn unsubscribe(ctx: &ApiContext, requester: &Requester, author_id: i64) -> Result<()> {
    follow::unsubscribe(&ctx.database, requester, author_id).await
}

/// Authors the requester follows, most recent first, each with a recipe preview.
#[instrument(skip(ctx))]
pub async fn subscriptions(
    ctx: &ApiContext,
    requester: &Requester,
    query: SubscriptionQuery,
) -> Result<Page<SubscriptionRead>> {
    let user_id = requester.require_user()?;
    let page = paginate(
        &ctx.database,
        follow::subscribed_authors_query(user_id),
        query.page_params(),
        &ctx.settings,
    )
    .await?;

    let mut results = Vec::with_capacity(page.results.len());
    for author in page.results.iter().cloned() {
        results.push(
            SubscriptionRead::build(&ctx.database, requester, author, query.recipes_limit).await?,
        );
    }
    Ok(page.with_results(results))
}
