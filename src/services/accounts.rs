//! Registration, login sessions and account management

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::require_user;
use crate::core::auth::{hash_password_async, validate_password, verify_password_async};
use crate::core::query::contains_ci;
use crate::core::{Owned, SocialError, StorageError, ValidationError};
use crate::entities::{LoginRequest, Profile, RegisterUser, Session, UpdateUser, User, UserView};
use crate::storage::{SocialStore, constraints};

/// Filters for `GET /users`
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring of the username
    pub username: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn SocialStore>,
    token_ttl: Duration,
}

/// Map username / email uniqueness violations to their user-facing errors
fn account_conflict(err: StorageError) -> SocialError {
    if err.is_conflict_on(constraints::USERNAME) {
        ValidationError::Duplicate {
            field: "username".to_string(),
            message: "username already taken".to_string(),
        }
        .into()
    } else if err.is_conflict_on(constraints::EMAIL) {
        ValidationError::Duplicate {
            field: "email".to_string(),
            message: "email already registered".to_string(),
        }
        .into()
    } else {
        err.into()
    }
}

impl AccountService {
    pub fn new(store: Arc<dyn SocialStore>, token_ttl: Duration) -> Self {
        Self { store, token_ttl }
    }

    /// Create a user and its empty profile
    pub async fn register(&self, req: RegisterUser) -> Result<UserView, SocialError> {
        validate_password(&req.password, &req.username)?;

        let password_hash = hash_password_async(req.password).await?;
        let user = User::new(req.username, req.email, password_hash);
        let profile = Profile::for_user(&user);

        self.store
            .create_account(&user, &profile)
            .await
            .map_err(account_conflict)?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(UserView::new(&user, &profile))
    }

    /// Exchange credentials for a session token
    pub async fn login(&self, req: LoginRequest) -> Result<Session, SocialError> {
        let invalid = || SocialError::unauthorized("invalid username or password");

        let user = self
            .store
            .find_user_by_username(&req.username)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password_async(req.password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        if !user.is_active {
            return Err(SocialError::unauthorized("account is disabled"));
        }

        let session = Session::open(user.id, self.token_ttl);
        self.store.create_session(&session).await?;

        tracing::info!(user_id = %user.id, "session opened");
        Ok(session)
    }

    pub async fn logout(&self, token: &str) -> Result<(), SocialError> {
        if self.store.delete_session(token).await? {
            tracing::debug!("session closed");
        }
        Ok(())
    }

    /// Resolve a bearer token to an active user
    pub async fn authenticate(&self, token: &str) -> Result<User, SocialError> {
        let session = self
            .store
            .get_session(token)
            .await?
            .ok_or_else(|| SocialError::unauthorized("invalid token"))?;

        if session.is_expired(Utc::now()) {
            self.store.delete_session(token).await?;
            return Err(SocialError::unauthorized("token expired"));
        }

        let user = self
            .store
            .get_user(&session.user_id)
            .await?
            .ok_or_else(|| SocialError::unauthorized("invalid token"))?;

        if !user.is_active {
            return Err(SocialError::unauthorized("account is disabled"));
        }

        Ok(user)
    }

    async fn view(&self, user: &User) -> Result<UserView, SocialError> {
        let profile = self
            .store
            .get_profile_by_user(&user.id)
            .await?
            .ok_or_else(|| SocialError::not_found("profile", user.id))?;
        Ok(UserView::new(user, &profile))
    }

    pub async fn get_user(&self, id: &Uuid) -> Result<UserView, SocialError> {
        let user = require_user(self.store.as_ref(), id).await?;
        self.view(&user).await
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserView>, SocialError> {
        let profiles: HashMap<Uuid, Profile> = self
            .store
            .list_profiles()
            .await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        let users = self.store.list_users().await?;
        Ok(users
            .iter()
            .filter(|u| {
                filter
                    .username
                    .as_deref()
                    .is_none_or(|needle| contains_ci(&u.username, needle))
            })
            .filter(|u| filter.is_active.is_none_or(|active| u.is_active == active))
            .filter_map(|u| profiles.get(&u.id).map(|p| UserView::new(u, p)))
            .collect())
    }

    /// Change username, email or password of the caller's own account
    pub async fn update_user(
        &self,
        actor_id: &Uuid,
        id: &Uuid,
        req: UpdateUser,
    ) -> Result<UserView, SocialError> {
        let mut user = require_user(self.store.as_ref(), id).await?;
        user.ensure_owner(actor_id)?;

        if let Some(username) = req.username {
            user.username = username;
        }
        if let Some(email) = req.email {
            user.email = email;
        }
        if let Some(password) = req.password {
            validate_password(&password, &user.username)?;
            user.password_hash = hash_password_async(password).await?;
        }

        self.store
            .update_user(&user)
            .await
            .map_err(account_conflict)?;

        tracing::info!(user_id = %user.id, "user updated");
        self.view(&user).await
    }

    /// Delete the caller's own account and everything it owns
    pub async fn delete_user(&self, actor_id: &Uuid, id: &Uuid) -> Result<(), SocialError> {
        let user = require_user(self.store.as_ref(), id).await?;
        user.ensure_owner(actor_id)?;

        self.store.delete_user(id).await?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
