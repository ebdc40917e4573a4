//! User accounts

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::impl_entity;
use super::profile::Profile;
use crate::core::Owned;

/// Letters, digits, spaces and `@ . + - _`
pub static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+\- ]+$").expect("username pattern is valid"));

/// A registered account
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

impl_entity!(User, "users", "user");

impl Owned for User {
    fn owner_id(&self) -> Uuid {
        self.id
    }
}

/// Payload for `POST /users/register`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(
        length(min = 1, max = 60, message = "username must be 1 to 60 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "username may contain only letters, digits, spaces and @/./+/-/_"
        )
    )]
    pub username: String,

    #[validate(email(message = "enter a valid email address"))]
    pub email: String,

    pub password: String,
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Payload for `PATCH /users/{id}`; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(
        length(min = 1, max = 60, message = "username must be 1 to 60 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "username may contain only letters, digits, spaces and @/./+/-/_"
        )
    )]
    pub username: Option<String>,

    #[validate(email(message = "enter a valid email address"))]
    pub email: Option<String>,

    pub password: Option<String>,
}

/// Public representation of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub profile_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl UserView {
    pub fn new(user: &User, profile: &Profile) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_active: user.is_active,
            profile_id: profile.id,
            created_at: user.created_at,
        }
    }
}

/// Compact author reference embedded in posts, comments and likes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorSummary {
    pub user_id: Uuid,
    pub username: String,
    pub profile_name: String,
}
