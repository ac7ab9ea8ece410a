//! Requester identity and access rules.
//!
//! The boundary layer resolves authentication and hands the result to every core
//! function as a `Requester`. Nothing in the crate keeps an ambient "current user".

use crate::{
    entities::{Role, recipe},
    errors::{Error, Result},
};

/// Who is making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    /// No credentials were presented
    Anonymous,
    /// A logged-in user
    User {
        /// ID of the authenticated user
        id: i64,
        /// Role of the authenticated user
        role: Role,
    },
}

impl Requester {
    /// Authenticated requester with the regular `user` role.
    #[must_use]
    pub const fn user(id: i64) -> Self {
        Self::User {
            id,
            role: Role::User,
        }
    }

    /// The requester's user ID, or `None` when anonymous.
    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        match self {
            Self::Anonymous => None,
            Self::User { id, .. } => Some(*id),
        }
    }

    /// The requester's user ID, failing with a permission error when anonymous.
    pub fn require_user(&self) -> Result<i64> {
        self.user_id()
            .ok_or_else(|| Error::permission("authentication credentials were not provided"))
    }

    /// Whether the requester may moderate content authored by others.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        matches!(
            self,
            Self::User {
                role: Role::Moderator | Role::Admin,
                ..
            }
        )
    }

    /// Whether the requester may change or delete `recipe`: its author, a
    /// moderator or an admin.
    #[must_use]
    pub const fn can_modify(&self, recipe: &recipe::Model) -> bool {
        match self {
            Self::Anonymous => false,
            Self::User { id, .. } => *id == recipe.author_id || self.is_privileged(),
        }
    }

    /// Fails with a permission error unless `can_modify` holds.
    pub fn ensure_can_modify(&self, recipe: &recipe::Model) -> Result<()> {
        if self.can_modify(recipe) {
            Ok(())
        } else {
            Err(Error::permission(
                "only the author, a moderator or an admin may change this recipe",
            ))
        }
    }
}
