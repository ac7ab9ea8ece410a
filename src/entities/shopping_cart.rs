//! Shopping cart entity - Recipes a user plans to shop for.
//!
//! The ingredients of every recipe in a user's cart are summed into the
//! downloadable shopping list.

use sea_orm::entity::prelude::*;

/// Shopping cart item database model; (user, recipe) is the primary key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shopping_cart")]
pub struct Model {
    /// Cart owner
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    /// Recipe placed in the cart
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipe_id: i64,
}

/// Defines relationships between cart items and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Cart owner
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    /// Recipe in the cart
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Recipe,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
