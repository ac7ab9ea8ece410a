//! Page-number pagination for list endpoints.

use crate::{
    config::Settings,
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

/// Requested page; unset values fall back to page 1 and the configured size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u64>,
    /// Items per page, capped at `Settings::max_page_size`
    pub limit: Option<u64>,
}

impl PageParams {
    /// Shorthand for explicit values.
    #[must_use]
    pub const fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Resolves to `(page, page_size)`.
    ///
    /// # Errors
    /// `Validation` on `page` or `limit` when either is zero.
    pub fn resolve(self, settings: &Settings) -> Result<(u64, u64)> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(Error::validation("page", "page numbers start at 1"));
        }
        let limit = self.limit.unwrap_or(settings.page_size);
        if limit == 0 {
            return Err(Error::validation("limit", "limit must be at least 1"));
        }
        Ok((page, limit.min(settings.max_page_size)))
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of matching items
    pub count: u64,
    /// This page's number
    pub page: u64,
    /// Number of pages at the effective page size
    pub total_pages: u64,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Keeps the counters and swaps in projected results.
    #[must_use]
    pub fn with_results<U>(self, results: Vec<U>) -> Page<U> {
        Page {
            count: self.count,
            page: self.page,
            total_pages: self.total_pages,
            results,
        }
    }
}

/// Fetches one page of `query`. Pages past the end are empty.
pub async fn paginate<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    params: PageParams,
    settings: &Settings,
) -> Result<Page<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync + 'static,
{
    let (page, page_size) = params.resolve(settings)?;
    let paginator = query.paginate(db, page_size);
    let totals = paginator.num_items_and_pages().await?;
    let results = paginator.fetch_page(page - 1).await?;

    Ok(Page {
        count: totals.number_of_items,
        page,
        total_pages: totals.number_of_pages,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::tag::get_all_tags, entities::Tag, test_utils::*};
    use sea_orm::QueryOrder;

    fn settings() -> Settings {
        Settings {
            page_size: 2,
            max_page_size: 3,
            ..Settings::default()
        }
    }

    #[test]
    fn test_resolve_defaults_and_cap() -> Result<()> {
        let settings = settings();
        assert_eq!(PageParams::default().resolve(&settings)?, (1, 2));
        assert_eq!(PageParams::new(4, 50).resolve(&settings)?, (4, 3));
        assert!(matches!(
            PageParams::new(0, 2).resolve(&settings),
            Err(Error::Validation { field: "page", .. })
        ));
        assert!(matches!(
            PageParams::new(1, 0).resolve(&settings),
            Err(Error::Validation { field: "limit", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_paginate_counts_pages() -> Result<()> {
        let db = setup_test_db().await?;
        for slug in ["a", "b", "c", "d", "e"] {
            create_test_tag(&db, slug, slug).await?;
        }
        assert_eq!(get_all_tags(&db).await?.len(), 5);

        let query = || Tag::find().order_by_asc(crate::entities::tag::Column::Slug);

        let first = paginate(&db, query(), PageParams::default(), &settings()).await?;
        assert_eq!(first.count, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.results.len(), 2);
        assert_eq!(first.results[0].slug, "a");

        let last = paginate(&db, query(), PageParams::new(3, 2), &settings()).await?;
        assert_eq!(last.results.len(), 1);
        assert_eq!(last.results[0].slug, "e");

        let beyond = paginate(&db, query(), PageParams::new(9, 2), &settings()).await?;
        assert!(beyond.results.is_empty());
        assert_eq!(beyond.count, 5);
        Ok(())
    }
}
