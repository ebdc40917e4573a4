//! Route table

use axum::Json;
use axum::Router;
use axum::http::Uri;
use axum::routing::{delete, get, post};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use super::handlers::{accounts, comments, follows, likes, posts, profiles};
use super::state::AppState;
use crate::core::SocialError;

/// Build every REST route over `state`
///
/// Static segments such as `/posts/feed` take priority over `/posts/{id}`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // accounts
        .route("/users/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/logout", post(accounts::logout))
        .route("/users", get(accounts::list_users))
        .route(
            "/users/{id}",
            get(accounts::get_user)
                .patch(accounts::update_user)
                .delete(accounts::delete_user),
        )
        // follow graph
        .route("/users/{id}/follow", post(follows::follow))
        .route("/users/{id}/unfollow", delete(follows::unfollow))
        .route("/users/{id}/followers", get(follows::followers))
        .route("/users/{id}/followed", get(follows::following))
        // profiles
        .route("/profiles", get(profiles::list_profiles))
        .route(
            "/profiles/{id}",
            get(profiles::get_profile).patch(profiles::update_profile),
        )
        // posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/feed", get(posts::feed))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/like", post(likes::like_post).delete(likes::unlike_post))
        .route("/posts/{id}/likes", get(likes::post_likers))
        .route(
            "/posts/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        // comments
        .route(
            "/comments/{id}",
            get(comments::get_comment).delete(comments::delete_comment),
        )
        .route(
            "/comments/{id}/like",
            post(likes::like_comment).delete(likes::unlike_comment),
        )
        .route("/comments/{id}/likes", get(likes::comment_likers))
        .route("/tags", get(posts::list_tags))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn not_found(uri: Uri) -> SocialError {
    SocialError::not_found("route", uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::storage::InMemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(AppConfig::default()),
        );
        build_router(state)
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health_route() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_feed_is_not_captured_by_id_route() {
        // /posts/{id} would answer 400 INVALID_ID for "feed"
        assert_eq!(status_of("GET", "/posts/feed").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        assert_eq!(status_of("GET", "/nope").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method() {
        assert_eq!(
            status_of("PUT", "/tags").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
