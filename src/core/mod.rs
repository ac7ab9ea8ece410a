//! Core layer - Framework-agnostic Foodgram business logic
//!
//! Every function takes the database connection and, where the outcome depends on
//! who is asking, an explicit `Requester`. Nothing here knows about transports.

/// Adding and removing favorite recipes
pub mod favorite;
/// Optional recipe list predicates
pub mod filters;
/// Subscriptions between users and recipe previews
pub mod follow;
/// Ingredient lookups, prefix search and seeding
pub mod ingredient;
/// Requester identity and access rules
pub mod permissions;
/// Recipe composition, update and deletion
pub mod recipe;
/// Shopping cart membership and shopping-list aggregation
pub mod shopping_cart;
/// Tag lookups and seeding
pub mod tag;
/// User registration and lookups
pub mod user;
