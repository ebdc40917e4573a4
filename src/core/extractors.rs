//! Axum extractors for validated bodies, ids, query filters and the current user
//!
//! Every rejection is a [`SocialError`], so malformed requests render with
//! the same JSON error shape as domain failures.

use axum::Json;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::core::auth::bearer_token;
use crate::core::error::{RequestError, SocialError};
use crate::entities::user::User;
use crate::server::AppState;

/// Parse a path segment as a UUID
pub fn parse_id(value: &str) -> Result<Uuid, SocialError> {
    Uuid::parse_str(value).map_err(|_| {
        RequestError::InvalidId {
            value: value.to_string(),
        }
        .into()
    })
}

/// JSON body that has been deserialized and passed `Validate`
///
/// ```rust,ignore
/// pub async fn create_post(
///     user: AuthUser,
///     ValidatedJson(payload): ValidatedJson<CreatePost>,
/// ) -> Result<Json<PostView>, SocialError> { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = SocialError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await.map_err(|e| {
            SocialError::from(RequestError::InvalidJson {
                message: e.body_text(),
            })
        })?;

        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}

/// The `{id}` path segment parsed as a UUID
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = SocialError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| RequestError::InvalidId {
                value: e.body_text(),
            })?;

        parse_id(&raw).map(IdPath)
    }
}

/// Query string filters with JSON error rejections
#[derive(Debug, Clone, Default)]
pub struct Filters<T>(pub T);

impl<S, T> FromRequestParts<S> for Filters<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = SocialError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(filters) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| RequestError::InvalidQuery {
                message: e.body_text(),
            })?;

        Ok(Filters(filters))
    }
}

/// The authenticated caller, resolved from a bearer session token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = SocialError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| SocialError::unauthorized("authentication credentials were not provided"))?
            .to_string();

        let app = AppState::from_ref(state);
        let user = app.accounts.authenticate(&token).await?;

        Ok(AuthUser { user, token })
    }
}
