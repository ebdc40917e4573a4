//! Domain services
//!
//! Each service wraps the shared [`SocialStore`] and owns one slice of the
//! domain rules. Mutations validate explicitly, persist through the store, and
//! translate store conflicts into the matching [`ValidationError`](crate::core::ValidationError).

pub mod accounts;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod profiles;
#[cfg(test)]
pub(crate) mod stale;

pub use accounts::{AccountService, UserFilter};
pub use comments::CommentService;
pub use follows::{FollowFilter, FollowService};
pub use likes::LikeService;
pub use posts::{PostFilter, PostService};
pub use profiles::ProfileService;

use uuid::Uuid;

use crate::core::{Entity, SocialError};
use crate::entities::{AuthorSummary, User};
use crate::storage::SocialStore;

/// Username and profile name of `user_id`
pub(crate) async fn author_summary(
    store: &dyn SocialStore,
    user_id: &Uuid,
) -> Result<AuthorSummary, SocialError> {
    let user = store
        .get_user(user_id)
        .await?
        .ok_or_else(|| User::not_found(user_id))?;

    let profile_name = store
        .get_profile_by_user(user_id)
        .await?
        .map(|p| p.name)
        .unwrap_or_default();

    Ok(AuthorSummary {
        user_id: user.id,
        username: user.username,
        profile_name,
    })
}

/// Load a user or fail with 404
pub(crate) async fn require_user(store: &dyn SocialStore, id: &Uuid) -> Result<User, SocialError> {
    store
        .get_user(id)
        .await?
        .ok_or_else(|| User::not_found(id))
}
