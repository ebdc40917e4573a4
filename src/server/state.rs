//! Application state shared across handlers

use std::sync::Arc;

use chrono::Duration;

use crate::config::AppConfig;
use crate::core::PageRequest;
use crate::services::{
    AccountService, CommentService, FollowService, LikeService, PostService, ProfileService,
};
use crate::storage::SocialStore;

/// Services wired to one store, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub follows: FollowService,
    pub posts: PostService,
    pub comments: CommentService,
    pub likes: LikeService,
}

impl AppState {
    pub fn new(store: Arc<dyn SocialStore>, config: Arc<AppConfig>) -> Self {
        let token_ttl = Duration::hours(config.auth.token_ttl_hours);

        Self {
            accounts: AccountService::new(store.clone(), token_ttl),
            profiles: ProfileService::new(store.clone()),
            follows: FollowService::new(store.clone()),
            posts: PostService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            likes: LikeService::new(store),
            config,
        }
    }

    /// Resolve `page` / `limit` query values against the configured limits
    pub fn page(&self, page: Option<usize>, limit: Option<usize>) -> PageRequest {
        let pagination = &self.config.pagination;
        PageRequest::new(page, limit, pagination.default_limit, pagination.max_limit)
    }
}
