//! User business logic - Registration of profiles and lookups.
//!
//! Passwords and tokens are handled outside the crate; this module only keeps the
//! public profile rows consistent (non-blank fields, unique username and email).

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result, is_unique_violation},
};
use sea_orm::{QueryOrder, Select, Set, SqlErr, prelude::*};
use tracing::{info, instrument};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Email address
    pub email: String,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Access level
    pub role: Role,
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

/// The users column a unique violation was raised on.
///
/// `SQLite` names the failing column as `users.<column>` in the error text.
fn duplicated_field(err: &DbErr) -> &'static str {
    let detail = match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => detail,
        _ => err.to_string(),
    };
    if detail.contains("users.email") {
        "email"
    } else {
        "username"
    }
}

/// Creates a user after validating that every field is filled in.
///
/// # Errors
/// - `Validation` when a field is blank or the email has no `@`
/// - `Conflict` on `username` or `email` when another user already has it
#[instrument(skip(db, new_user), fields(username = %new_user.username))]
pub async fn create_user(db: &DatabaseConnection, new_user: NewUser) -> Result<user::Model> {
    let email = required("email", &new_user.email)?;
    if !email.contains('@') {
        return Err(Error::validation("email", "enter a valid email address"));
    }
    let username = required("username", &new_user.username)?;
    let first_name = required("first_name", &new_user.first_name)?;
    let last_name = required("last_name", &new_user.last_name)?;

    if get_user_by_username(db, &username).await?.is_some() {
        return Err(Error::conflict(
            "username",
            "a user with that username already exists",
        ));
    }
    if User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
        .is_some()
    {
        return Err(Error::conflict(
            "email",
            "a user with that email already exists",
        ));
    }

    let model = user::ActiveModel {
        username: Set(username),
        email: Set(email),
        first_name: Set(first_name),
        last_name: Set(last_name),
        role: Set(new_user.role),
        ..Default::default()
    };

    let created = model.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            let field = duplicated_field(&e);
            Error::conflict(field, format!("a user with that {field} already exists"))
        } else {
            Error::Database(e)
        }
    })?;
    info!(user_id = created.id, "User created");
    Ok(created)
}

/// Finds a user by ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by ID, failing with `NotFound` when there is none.
pub async fn require_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })
}

/// Finds a user by username.
pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Query over all users, ordered by ID. Pagination is applied by the caller.
#[must_use]
pub fn users_query() -> Select<User> {
    User::find().order_by_asc(user::Column::Id)
}
