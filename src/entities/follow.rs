//! Follow entity - Subscription of one user to another user's recipes.
//!
//! Both columns point at `users`, so there is no `Related` impl; joins pick the
//! relation explicitly. Self-follows are rejected by a CHECK constraint added in
//! `config::database`.

use sea_orm::entity::prelude::*;

/// Follow database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    /// The follower
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// The followed author
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: i64,
    /// When the subscription was made; listings show newest first
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Follow and users
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The follower
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Follower,
    /// The followed author
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Author,
}

impl ActiveModelBehavior for ActiveModel {}
