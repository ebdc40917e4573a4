//! Posts, the feed and tags

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::extractors::{AuthUser, Filters, IdPath, ValidatedJson};
use crate::core::{PaginatedResponse, SocialError, TimeRange};
use crate::entities::tag::parse_tag_filter;
use crate::entities::{CreatePost, PostView, Tag, UpdatePost};
use crate::server::AppState;
use crate::services::PostFilter;

/// Query for `GET /posts` and `GET /posts/feed`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search_author: Option<String>,
    pub search_post: Option<String>,
    /// Comma separated tag names
    pub tags: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl PostQuery {
    fn filter(&self) -> PostFilter {
        PostFilter {
            search_author: self.search_author.clone(),
            search_post: self.search_post.clone(),
            tags: self
                .tags
                .as_deref()
                .map(parse_tag_filter)
                .unwrap_or_default(),
            created: TimeRange::new(self.created_after, self.created_before),
        }
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    Filters(query): Filters<PostQuery>,
) -> Result<Json<PaginatedResponse<PostView>>, SocialError> {
    let page = state.page(query.page, query.limit);
    Ok(Json(state.posts.list_posts(&query.filter(), page).await?))
}

pub async fn feed(
    State(state): State<AppState>,
    user: AuthUser,
    Filters(query): Filters<PostQuery>,
) -> Result<Json<PaginatedResponse<PostView>>, SocialError> {
    let page = state.page(query.page, query.limit);
    Ok(Json(state.posts.feed(&user.id(), &query.filter(), page).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreatePost>,
) -> Result<(StatusCode, Json<PostView>), SocialError> {
    let post = state.posts.create_post(&user.id(), payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn get_post(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<PostView>, SocialError> {
    Ok(Json(state.posts.get_post(&id).await?))
}

pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<UpdatePost>,
) -> Result<Json<PostView>, SocialError> {
    Ok(Json(state.posts.update_post(&user.id(), &id, payload).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, SocialError> {
    state.posts.delete_post(&user.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, SocialError> {
    Ok(Json(state.posts.list_tags().await?))
}
