//! Follow graph: one directed edge per ordered pair, never a self loop

use std::sync::Arc;

use uuid::Uuid;

use super::{author_summary, require_user};
use crate::core::query::contains_ci;
use crate::core::{SocialError, StorageError, TimeRange, ValidationError};
use crate::entities::{Follow, FollowEntry};
use crate::storage::{SocialStore, constraints};

/// Filters for the followers / following listings
#[derive(Debug, Clone, Default)]
pub struct FollowFilter {
    /// Case-insensitive substring of the other user's username or profile name
    pub search: Option<String>,
    /// Inclusive range on the edge's creation time
    pub created: TimeRange,
}

#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn SocialStore>,
}

fn follow_conflict(err: StorageError) -> SocialError {
    if err.is_conflict_on(constraints::FOLLOW_PAIR) {
        ValidationError::AlreadyFollowing.into()
    } else if err.is_conflict_on(constraints::FOLLOW_NO_SELF) {
        ValidationError::SelfFollow.into()
    } else {
        err.into()
    }
}

impl FollowService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    /// Make `follower_id` follow `followed_id`
    pub async fn follow(&self, follower_id: &Uuid, followed_id: &Uuid) -> Result<Follow, SocialError> {
        require_user(self.store.as_ref(), follower_id).await?;
        require_user(self.store.as_ref(), followed_id).await?;

        let edge = Follow::new(*follower_id, *followed_id)?;

        if self
            .store
            .find_follow(follower_id, followed_id)
            .await?
            .is_some()
        {
            return Err(ValidationError::AlreadyFollowing.into());
        }

        // The pair constraint still decides races between concurrent requests
        self.store
            .insert_follow(&edge)
            .await
            .map_err(follow_conflict)?;

        tracing::info!(follower_id = %follower_id, followed_id = %followed_id, "follow created");
        Ok(edge)
    }

    pub async fn unfollow(&self, follower_id: &Uuid, followed_id: &Uuid) -> Result<(), SocialError> {
        require_user(self.store.as_ref(), followed_id).await?;

        if !self.store.delete_follow(follower_id, followed_id).await? {
            return Err(ValidationError::NotFollowing.into());
        }

        tracing::info!(follower_id = %follower_id, followed_id = %followed_id, "follow removed");
        Ok(())
    }

    /// Users following `user_id`, oldest edge first
    pub async fn followers(
        &self,
        user_id: &Uuid,
        filter: &FollowFilter,
    ) -> Result<Vec<FollowEntry>, SocialError> {
        require_user(self.store.as_ref(), user_id).await?;
        let edges = self.store.list_followers(user_id).await?;
        self.entries(edges, |f| f.follower_id, filter).await
    }

    /// Users `user_id` follows, oldest edge first
    pub async fn following(
        &self,
        user_id: &Uuid,
        filter: &FollowFilter,
    ) -> Result<Vec<FollowEntry>, SocialError> {
        require_user(self.store.as_ref(), user_id).await?;
        let edges = self.store.list_following(user_id).await?;
        self.entries(edges, |f| f.followed_id, filter).await
    }

    async fn entries(
        &self,
        edges: Vec<Follow>,
        other_end: fn(&Follow) -> Uuid,
        filter: &FollowFilter,
    ) -> Result<Vec<FollowEntry>, SocialError> {
        let mut entries = Vec::with_capacity(edges.len());

        for edge in edges.iter().filter(|e| filter.created.contains(e.created_at)) {
            let other = author_summary(self.store.as_ref(), &other_end(edge)).await?;

            let matches = filter.search.as_deref().is_none_or(|needle| {
                contains_ci(&other.username, needle) || contains_ci(&other.profile_name, needle)
            });
            if matches {
                entries.push(FollowEntry {
                    user_id: other.user_id,
                    username: other.username,
                    profile_name: other.profile_name,
                    followed_at: edge.created_at,
                });
            }
        }

        Ok(entries)
    }
}
