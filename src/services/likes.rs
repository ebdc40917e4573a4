//! Likes: at most one per user per post or comment

use std::sync::Arc;

use uuid::Uuid;

use super::author_summary;
use crate::core::{SocialError, StorageError, ValidationError};
use crate::entities::{Like, LikeTarget, LikeView};
use crate::storage::{SocialStore, like_constraint};

fn like_conflict(err: StorageError, target: &LikeTarget) -> SocialError {
    if err.is_conflict_on(like_constraint(target)) {
        ValidationError::AlreadyLiked.into()
    } else {
        err.into()
    }
}

#[derive(Clone)]
pub struct LikeService {
    store: Arc<dyn SocialStore>,
}

impl LikeService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    async fn ensure_target(&self, target: &LikeTarget) -> Result<(), SocialError> {
        let exists = match target {
            LikeTarget::Post(id) => self.store.get_post(id).await?.is_some(),
            LikeTarget::Comment(id) => self.store.get_comment(id).await?.is_some(),
        };

        if exists {
            Ok(())
        } else {
            Err(SocialError::not_found(target.entity_type(), target.id()))
        }
    }

    pub async fn like(&self, user_id: &Uuid, target: LikeTarget) -> Result<Like, SocialError> {
        self.ensure_target(&target).await?;

        if self.store.find_like(user_id, &target).await?.is_some() {
            return Err(ValidationError::AlreadyLiked.into());
        }

        let like = Like::new(*user_id, target);
        self.store
            .insert_like(&like)
            .await
            .map_err(|err| like_conflict(err, &target))?;

        tracing::info!(user_id = %user_id, target = target.entity_type(), target_id = %target.id(), "like added");
        Ok(like)
    }

    pub async fn unlike(&self, user_id: &Uuid, target: LikeTarget) -> Result<(), SocialError> {
        self.ensure_target(&target).await?;

        if !self.store.delete_like(user_id, &target).await? {
            return Err(ValidationError::NotLiked.into());
        }

        tracing::info!(user_id = %user_id, target = target.entity_type(), target_id = %target.id(), "like removed");
        Ok(())
    }

    /// Users who liked `target`, earliest first
    pub async fn likers(&self, target: LikeTarget) -> Result<Vec<LikeView>, SocialError> {
        self.ensure_target(&target).await?;

        let likes = self.store.list_likes(&target).await?;
        let mut views = Vec::with_capacity(likes.len());
        for like in likes {
            let user = author_summary(self.store.as_ref(), &like.user_id).await?;
            views.push(LikeView {
                user_id: user.user_id,
                username: user.username,
                profile_name: user.profile_name,
                liked_at: like.created_at,
            });
        }
        Ok(views)
    }
}
