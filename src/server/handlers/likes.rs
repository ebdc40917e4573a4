//! Like and unlike for posts and comments
//!
//! Each route pins the [`LikeTarget`] kind and delegates to one shared
//! implementation.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::core::SocialError;
use crate::core::extractors::{AuthUser, IdPath};
use crate::entities::{Like, LikeTarget, LikeView};
use crate::server::AppState;

async fn like(
    state: &AppState,
    user: &AuthUser,
    target: LikeTarget,
) -> Result<(StatusCode, Json<Like>), SocialError> {
    let like = state.likes.like(&user.id(), target).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

async fn unlike(
    state: &AppState,
    user: &AuthUser,
    target: LikeTarget,
) -> Result<StatusCode, SocialError> {
    state.likes.unlike(&user.id(), target).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<(StatusCode, Json<Like>), SocialError> {
    like(&state, &user, LikeTarget::Post(id)).await
}

pub async fn unlike_post(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    unlike(&state, &user, LikeTarget::Post(id)).await
}

pub async fn like_comment(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<(StatusCode, Json<Like>), SocialError> {
    like(&state, &user, LikeTarget::Comment(id)).await
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    unlike(&state, &user, LikeTarget::Comment(id)).await
}

pub async fn post_likers(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Vec<LikeView>>, SocialError> {
    Ok(Json(state.likes.likers(LikeTarget::Post(id)).await?))
}

pub async fn comment_likers(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Vec<LikeView>>, SocialError> {
    Ok(Json(state.likes.likers(LikeTarget::Comment(id)).await?))
}
