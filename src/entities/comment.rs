//! Comments on posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::AuthorSummary;
use super::{impl_entity, not_blank};
use crate::core::Owned;

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            post_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

impl_entity!(Comment, "comments", "comment");

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

/// Payload for `POST /posts/{id}/comments`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(custom(function = "not_blank", message = "content may not be blank"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub total_likes: usize,
}

impl CommentView {
    pub fn new(comment: &Comment, author: AuthorSummary, total_likes: usize) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author,
            content: comment.content.clone(),
            created_at: comment.created_at,
            total_likes,
        }
    }
}
