//! Entity traits shared by every persisted record

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::SocialError;

/// Base trait for all entities in the system.
///
/// All entities have a unique identifier and a creation timestamp, and know
/// the resource names used in URLs and error messages.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The plural resource name used in URLs (e.g., "posts")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "post")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Build the not-found error for an id of this entity type
    fn not_found(id: &Uuid) -> SocialError {
        SocialError::not_found(Self::resource_name_singular(), id)
    }
}

/// Entities that belong to exactly one user.
///
/// Mutations on owned entities are restricted to the owner.
pub trait Owned: Entity {
    /// The id of the owning user
    fn owner_id(&self) -> Uuid;

    /// Check whether `user_id` owns this entity
    fn is_owned_by(&self, user_id: &Uuid) -> bool {
        &self.owner_id() == user_id
    }

    /// Fail with 403 unless `user_id` owns this entity
    fn ensure_owner(&self, user_id: &Uuid) -> Result<(), SocialError> {
        if self.is_owned_by(user_id) {
            Ok(())
        } else {
            Err(SocialError::forbidden(format!(
                "you are not allowed to modify this {}",
                Self::resource_name_singular()
            )))
        }
    }
}
