use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use super::PageQuery;
use crate::core::extractors::{AuthUser, Filters, IdPath, ValidatedJson};
use crate::core::{PaginatedResponse, SocialError};
use crate::entities::{CommentView, CreateComment};
use crate::server::AppState;

pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(post_id): IdPath,
    Filters(query): Filters<PageQuery>,
) -> Result<Json<PaginatedResponse<CommentView>>, SocialError> {
    let page = state.page(query.page, query.limit);
    Ok(Json(state.comments.list_comments(&post_id, page).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(payload): ValidatedJson<CreateComment>,
) -> Result<(StatusCode, Json<CommentView>), SocialError> {
    let comment = state
        .comments
        .create_comment(&user.id(), &post_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<CommentView>, SocialError> {
    Ok(Json(state.comments.get_comment(&id).await?))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    state.comments.delete_comment(&user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
