use axum::Json;
use axum::extract::State;

use super::ListQuery;
use crate::core::extractors::{AuthUser, Filters, IdPath, ValidatedJson};
use crate::core::{PaginatedResponse, SocialError};
use crate::entities::{ProfileView, UpdateProfile};
use crate::server::AppState;

pub async fn list_profiles(
    State(state): State<AppState>,
    Filters(query): Filters<ListQuery>,
) -> Result<Json<PaginatedResponse<ProfileView>>, SocialError> {
    let page = state.page(query.page, query.limit);
    Ok(Json(
        state
            .profiles
            .list_profiles(query.search.as_deref(), page)
            .await?,
    ))
}

pub async fn get_profile(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ProfileView>, SocialError> {
    Ok(Json(state.profiles.get_profile(&id).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdateProfile>,
) -> Result<Json<ProfileView>, SocialError> {
    Ok(Json(
        state
            .profiles
            .update_profile(&user.id(), &id, payload)
            .await?,
    ))
}
