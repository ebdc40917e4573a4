//! Directed follow edges between users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::impl_entity;
use crate::core::ValidationError;

/// `follower_id` follows `followed_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    /// Build a new edge, rejecting self loops
    pub fn new(follower_id: Uuid, followed_id: Uuid) -> Result<Self, ValidationError> {
        if follower_id == followed_id {
            return Err(ValidationError::SelfFollow);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            follower_id,
            followed_id,
            created_at: Utc::now(),
        })
    }
}

impl_entity!(Follow, "follows", "follow");

/// One row of a followers / following listing: the other endpoint of the edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowEntry {
    pub user_id: Uuid,
    pub username: String,
    pub profile_name: String,
    pub followed_at: DateTime<Utc>,
}
