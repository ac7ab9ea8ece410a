//! API layer - Transport-agnostic request handlers
//!
//! Each handler takes the shared `ApiContext`, the already-authenticated
//! `Requester` and a decoded request payload, calls into `core`, and returns a
//! serializable projection. Routing, token handling and image storage stay with
//! whatever server embeds the crate.

/// Error responses
pub mod error;
/// Page parameters and the page envelope
pub mod pagination;
/// Serializable read projections
pub mod projections;
/// Tag and ingredient endpoints
pub mod reference;
/// Recipe endpoints, favorites, shopping cart and shopping-list download
pub mod recipes;
/// Decoded request payloads
pub mod requests;
/// User endpoints and subscriptions
pub mod users;

use crate::config::Settings;
use sea_orm::DatabaseConnection;

pub use error::ErrorBody;
pub use pagination::{Page, PageParams};

/// Shared state available to every handler.
#[derive(Debug, Clone)]
pub struct ApiContext {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Page sizes and other runtime settings
    pub settings: Settings,
}

impl ApiContext {
    /// Creates a new `ApiContext` from a connection and the runtime settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}
