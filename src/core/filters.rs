//! Recipe filtering - Optional predicates composed onto the recipe query.
//!
//! Every predicate is independent; an unset one places no restriction. The
//! favorited/in-cart predicates are evaluated against the requester and match
//! nothing for anonymous requesters.

use crate::{
    core::permissions::Requester,
    entities::{
        Favorite, Recipe, RecipeTag, ShoppingCart, Tag, favorite, recipe, recipe_tag,
        shopping_cart, tag,
    },
};
use sea_orm::{
    QueryFilter, QueryOrder, Select,
    prelude::*,
    sea_query::{Expr, Query, SelectStatement},
};

/// Filter parameters for the recipe list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author: Option<i64>,
    /// Only recipes carrying at least one tag with one of these slugs
    pub tags: Vec<String>,
    /// Only recipes the requester favorited
    pub is_favorited: bool,
    /// Only recipes in the requester's shopping cart
    pub is_in_shopping_cart: bool,
}

fn recipes_with_tag_slugs(slugs: &[String]) -> SelectStatement {
    Query::select()
        .column((RecipeTag, recipe_tag::Column::RecipeId))
        .from(RecipeTag)
        .inner_join(
            Tag,
            Expr::col((Tag, tag::Column::Id)).equals((RecipeTag, recipe_tag::Column::TagId)),
        )
        .and_where(Expr::col((Tag, tag::Column::Slug)).is_in(slugs.iter().cloned()))
        .to_owned()
}

fn recipes_favorited_by(user_id: i64) -> SelectStatement {
    Query::select()
        .column(favorite::Column::RecipeId)
        .from(Favorite)
        .and_where(Expr::col(favorite::Column::UserId).eq(user_id))
        .to_owned()
}

fn recipes_in_cart_of(user_id: i64) -> SelectStatement {
    Query::select()
        .column(shopping_cart::Column::RecipeId)
        .from(ShoppingCart)
        .and_where(Expr::col(shopping_cart::Column::UserId).eq(user_id))
        .to_owned()
}

impl RecipeFilter {
    /// Adds the set predicates to `query`.
    #[must_use]
    pub fn apply(&self, requester: &Requester, mut query: Select<Recipe>) -> Select<Recipe> {
        if let Some(author_id) = self.author {
            query = query.filter(recipe::Column::AuthorId.eq(author_id));
        }

        if !self.tags.is_empty() {
            query = query.filter(recipe::Column::Id.in_subquery(recipes_with_tag_slugs(&self.tags)));
        }

        if self.is_favorited {
            query = match requester.user_id() {
                Some(user_id) => {
                    query.filter(recipe::Column::Id.in_subquery(recipes_favorited_by(user_id)))
                }
                None => query.filter(Expr::val(1).eq(0)),
            };
        }

        if self.is_in_shopping_cart {
            query = match requester.user_id() {
                Some(user_id) => {
                    query.filter(recipe::Column::Id.in_subquery(recipes_in_cart_of(user_id)))
                }
                None => query.filter(Expr::val(1).eq(0)),
            };
        }

        query
    }
}

/// All recipes matching `filter`, newest first. Pagination is left to the caller.
#[must_use]
pub fn filtered_recipes_query(requester: &Requester, filter: &RecipeFilter) -> Select<Recipe> {
    filter
        .apply(requester, Recipe::find())
        .order_by_desc(recipe::Column::PubDate)
        .order_by_desc(recipe::Column::Id)
}
