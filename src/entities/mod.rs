//! Domain records, request payloads and response views

/// Implement [`Entity`](crate::core::Entity) for a record with `id` and `created_at` fields
macro_rules! impl_entity {
    ($type:ty, $plural:literal, $singular:literal) => {
        impl $crate::core::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.created_at
            }
        }
    };
}

pub(crate) use impl_entity;

/// Reject text that is empty once surrounding whitespace is trimmed
pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod profile;
pub mod session;
pub mod tag;
pub mod user;

pub use comment::{Comment, CommentView, CreateComment};
pub use follow::{Follow, FollowEntry};
pub use like::{Like, LikeTarget, LikeView};
pub use post::{CreatePost, Post, PostView, UpdatePost};
pub use profile::{Profile, ProfileView, UpdateProfile};
pub use session::Session;
pub use tag::Tag;
pub use user::{AuthorSummary, LoginRequest, RegisterUser, UpdateUser, User, UserView};
