//! Likes on posts and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl LikeTarget {
    pub fn id(&self) -> Uuid {
        match self {
            LikeTarget::Post(id) | LikeTarget::Comment(id) => *id,
        }
    }

    /// Singular entity name of the target
    pub fn entity_type(&self) -> &'static str {
        match self {
            LikeTarget::Post(_) => "post",
            LikeTarget::Comment(_) => "comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: LikeTarget,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(user_id: Uuid, target: LikeTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            target,
            created_at: Utc::now(),
        }
    }
}

impl_entity!(Like, "likes", "like");

/// One liker of a post or comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikeView {
    pub user_id: Uuid,
    pub username: String,
    pub profile_name: String,
    pub liked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_accessors() {
        let id = Uuid::new_v4();
        assert_eq!(LikeTarget::Post(id).id(), id);
        assert_eq!(LikeTarget::Post(id).entity_type(), "post");
        assert_eq!(LikeTarget::Comment(id).entity_type(), "comment");
        assert_ne!(LikeTarget::Post(id), LikeTarget::Comment(id));
    }

    #[test]
    fn test_target_serialization() {
        let id = Uuid::nil();
        let json = serde_json::to_value(LikeTarget::Comment(id)).unwrap();
        assert_eq!(json["type"], "comment");
        assert_eq!(json["id"], id.to_string());
    }
}
