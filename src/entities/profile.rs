//! Profiles: the public, editable side of a user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::impl_entity;
use super::user::User;
use crate::core::Owned;

/// Picture reference assigned to every new profile
pub const DEFAULT_PROFILE_PICTURE: &str = "/profile_pictures/default_profile_picture.png";

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub picture: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The empty profile created alongside `user`
    pub fn for_user(user: &User) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: String::new(),
            bio: String::new(),
            picture: DEFAULT_PROFILE_PICTURE.to_string(),
            created_at: user.created_at,
            updated_at: user.created_at,
        }
    }

    pub fn apply(&mut self, changes: UpdateProfile, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(bio) = changes.bio {
            self.bio = bio;
        }
        if let Some(picture) = changes.picture {
            self.picture = picture;
        }
        self.updated_at = now;
    }
}

impl_entity!(Profile, "profiles", "profile");

impl Owned for Profile {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Payload for `PATCH /profiles/{id}`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(max = 20, message = "name must be at most 20 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 150, message = "bio must be at most 150 characters"))]
    pub bio: Option<String>,

    #[validate(length(min = 1, max = 255, message = "picture must be 1 to 255 characters"))]
    pub picture: Option<String>,
}

/// Derived relationship and content counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileCounts {
    pub followers: usize,
    pub following: usize,
    pub posts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub picture: String,
    pub followers_count: usize,
    pub following_count: usize,
    pub posts_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(profile: &Profile, username: &str, counts: ProfileCounts) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            username: username.to_string(),
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            picture: profile.picture.clone(),
            followers_count: counts.followers,
            following_count: counts.following,
            posts_count: counts.posts,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_for_user_defaults() {
        let user = User::new("bob", "bob@example.com", "hash");
        let profile = Profile::for_user(&user);

        assert_eq!(profile.user_id, user.id);
        assert!(profile.name.is_empty());
        assert!(profile.bio.is_empty());
        assert_eq!(profile.picture, DEFAULT_PROFILE_PICTURE);
    }

    #[test]
    fn test_apply_partial_update() {
        let user = User::new("bob", "bob@example.com", "hash");
        let mut profile = Profile::for_user(&user);
        let later = profile.updated_at + Duration::minutes(5);

        profile.apply(
            UpdateProfile {
                bio: Some("hello".to_string()),
                ..Default::default()
            },
            later,
        );

        assert_eq!(profile.bio, "hello");
        assert!(profile.name.is_empty());
        assert_eq!(profile.updated_at, later);
    }

    #[test]
    fn test_update_length_limits() {
        let too_long = UpdateProfile {
            name: Some("n".repeat(21)),
            ..Default::default()
        };
        assert!(too_long.validate().is_err());

        let bio = UpdateProfile {
            bio: Some("b".repeat(150)),
            ..Default::default()
        };
        assert!(bio.validate().is_ok());
    }
}
