//! Registration, login and user management

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use crate::core::extractors::{AuthUser, Filters, IdPath, ValidatedJson};
use crate::core::{PaginatedResponse, SocialError};
use crate::entities::{LoginRequest, RegisterUser, Session, UpdateUser, UserView};
use crate::server::AppState;
use crate::services::UserFilter;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub username: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUser>,
) -> Result<(StatusCode, Json<UserView>), SocialError> {
    let user = state.accounts.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<Session>, SocialError> {
    Ok(Json(state.accounts.login(payload).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<StatusCode, SocialError> {
    state.accounts.logout(&user.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_users(
    State(state): State<AppState>,
    Filters(query): Filters<UserQuery>,
) -> Result<Json<PaginatedResponse<UserView>>, SocialError> {
    let filter = UserFilter {
        username: query.username,
        is_active: query.is_active,
    };
    let users = state.accounts.list_users(&filter).await?;
    Ok(Json(state.page(query.page, query.limit).paginate(users)))
}

pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<UserView>, SocialError> {
    Ok(Json(state.accounts.get_user(&id).await?))
}

pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> Result<Json<UserView>, SocialError> {
    Ok(Json(state.accounts.update_user(&user.id(), &id, payload).await?))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    state.accounts.delete_user(&user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
