//! Follow and unfollow, followers and followed listings

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::ListQuery;
use crate::core::extractors::{AuthUser, Filters, IdPath};
use crate::core::{PaginatedResponse, SocialError};
use crate::entities::{Follow, FollowEntry};
use crate::server::AppState;
use crate::services::FollowFilter;

fn follow_filter(query: &ListQuery) -> FollowFilter {
    FollowFilter {
        search: query.search.clone(),
        created: query.created(),
    }
}

pub async fn follow(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<(StatusCode, Json<Follow>), SocialError> {
    let edge = state.follows.follow(&user.id(), &id).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

pub async fn unfollow(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    state.follows.unfollow(&user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn followers(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Filters(query): Filters<ListQuery>,
) -> Result<Json<PaginatedResponse<FollowEntry>>, SocialError> {
    let entries = state.follows.followers(&id, &follow_filter(&query)).await?;
    Ok(Json(state.page(query.page, query.limit).paginate(entries)))
}

pub async fn following(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Filters(query): Filters<ListQuery>,
) -> Result<Json<PaginatedResponse<FollowEntry>>, SocialError> {
    let entries = state.follows.following(&id, &follow_filter(&query)).await?;
    Ok(Json(state.page(query.page, query.limit).paginate(entries)))
}
