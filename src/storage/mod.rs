//! Storage backends behind the [`SocialStore`] trait
//!
//! Backends own every uniqueness rule (username, email, follow pair, like
//! pair, one profile per user) and the one-shot edit transition. A rejected
//! write reports [`StorageError::Conflict`] naming one of the
//! [`constraints`]; services translate that into the domain error.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::StorageError;
use crate::entities::{Comment, Follow, Like, LikeTarget, Post, Profile, Session, Tag, User};

/// Constraint names reported in [`StorageError::Conflict`]
pub mod constraints {
    pub const USERNAME: &str = "uq_users_username";
    pub const EMAIL: &str = "uq_users_email";
    pub const PROFILE_USER: &str = "uq_profiles_user";
    pub const FOLLOW_PAIR: &str = "uq_follows_pair";
    pub const FOLLOW_NO_SELF: &str = "ck_follows_no_self";
    pub const POST_LIKE_PAIR: &str = "uq_post_likes_pair";
    pub const COMMENT_LIKE_PAIR: &str = "uq_comment_likes_pair";
    /// The stored post was already edited when the edit was applied
    pub const POST_ALREADY_EDITED: &str = "ck_posts_single_edit";
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait SocialStore: Send + Sync + 'static {
    // === Accounts ===

    /// Insert a user and its profile in one atomic step
    async fn create_account(&self, user: &User, profile: &Profile) -> StorageResult<()>;

    async fn get_user(&self, id: &Uuid) -> StorageResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// All users, oldest first
    async fn list_users(&self) -> StorageResult<Vec<User>>;

    /// Replace a user's username, email, password hash and active flag
    async fn update_user(&self, user: &User) -> StorageResult<()>;

    /// Remove a user and everything that references it
    async fn delete_user(&self, id: &Uuid) -> StorageResult<()>;

    // === Profiles ===

    async fn get_profile(&self, id: &Uuid) -> StorageResult<Option<Profile>>;

    async fn get_profile_by_user(&self, user_id: &Uuid) -> StorageResult<Option<Profile>>;

    /// All profiles, oldest first
    async fn list_profiles(&self) -> StorageResult<Vec<Profile>>;

    async fn update_profile(&self, profile: &Profile) -> StorageResult<()>;

    // === Sessions ===

    async fn create_session(&self, session: &Session) -> StorageResult<()>;

    async fn get_session(&self, token: &str) -> StorageResult<Option<Session>>;

    /// Returns whether a session was removed
    async fn delete_session(&self, token: &str) -> StorageResult<bool>;

    // === Follow graph ===

    /// Insert an edge; `Conflict(FOLLOW_PAIR)` if the ordered pair exists
    async fn insert_follow(&self, follow: &Follow) -> StorageResult<()>;

    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followed_id: &Uuid,
    ) -> StorageResult<Option<Follow>>;

    /// Returns whether an edge was removed
    async fn delete_follow(&self, follower_id: &Uuid, followed_id: &Uuid) -> StorageResult<bool>;

    /// Edges pointing at `user_id`, oldest first
    async fn list_followers(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>>;

    /// Edges leaving `user_id`, oldest first
    async fn list_following(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>>;

    async fn count_followers(&self, user_id: &Uuid) -> StorageResult<usize> {
        Ok(self.list_followers(user_id).await?.len())
    }

    async fn count_following(&self, user_id: &Uuid) -> StorageResult<usize> {
        Ok(self.list_following(user_id).await?.len())
    }

    // === Tags ===

    /// All tags ordered by name
    async fn list_tags(&self) -> StorageResult<Vec<Tag>>;

    // === Posts ===

    /// Insert a post, creating any of its tags not yet stored.
    ///
    /// Tags are matched by name; the returned post carries the stored tags.
    async fn insert_post(&self, post: &Post) -> StorageResult<Post>;

    async fn get_post(&self, id: &Uuid) -> StorageResult<Option<Post>>;

    /// All posts, newest first
    async fn list_posts(&self) -> StorageResult<Vec<Post>>;

    /// Persist an edited post, only if the stored row is still unedited.
    ///
    /// Fails with `Conflict(POST_ALREADY_EDITED)` otherwise, in which case no
    /// tag is created. Tags are resolved as in [`SocialStore::insert_post`].
    async fn apply_post_edit(&self, post: &Post) -> StorageResult<Post>;

    /// Remove a post with its comments, likes and tag links
    async fn delete_post(&self, id: &Uuid) -> StorageResult<()>;

    async fn count_posts_by(&self, author_id: &Uuid) -> StorageResult<usize> {
        Ok(self
            .list_posts()
            .await?
            .iter()
            .filter(|p| &p.author_id == author_id)
            .count())
    }

    // === Comments ===

    async fn insert_comment(&self, comment: &Comment) -> StorageResult<()>;

    async fn get_comment(&self, id: &Uuid) -> StorageResult<Option<Comment>>;

    /// Comments on a post, oldest first
    async fn list_comments(&self, post_id: &Uuid) -> StorageResult<Vec<Comment>>;

    /// Remove a comment with its likes
    async fn delete_comment(&self, id: &Uuid) -> StorageResult<()>;

    async fn count_comments(&self, post_id: &Uuid) -> StorageResult<usize> {
        Ok(self.list_comments(post_id).await?.len())
    }

    // === Likes ===

    /// Insert a like; `Conflict(POST_LIKE_PAIR | COMMENT_LIKE_PAIR)` on duplicates
    async fn insert_like(&self, like: &Like) -> StorageResult<()>;

    async fn find_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<Option<Like>>;

    /// Returns whether a like was removed
    async fn delete_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<bool>;

    /// Likes on a target, oldest first
    async fn list_likes(&self, target: &LikeTarget) -> StorageResult<Vec<Like>>;

    async fn count_likes(&self, target: &LikeTarget) -> StorageResult<usize> {
        Ok(self.list_likes(target).await?.len())
    }
}

/// The pair constraint guarding likes on `target`
pub fn like_constraint(target: &LikeTarget) -> &'static str {
    match target {
        LikeTarget::Post(_) => constraints::POST_LIKE_PAIR,
        LikeTarget::Comment(_) => constraints::COMMENT_LIKE_PAIR,
    }
}
