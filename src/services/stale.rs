//! A store whose existence checks always look at an old snapshot
//!
//! `find_follow` and `find_like` report nothing and `get_post` reports the
//! post as unedited, as if every check ran before a concurrent writer
//! committed. Writes go to the wrapped store, whose constraints then decide.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Comment, Follow, Like, LikeTarget, Post, Profile, Session, Tag, User};
use crate::storage::{InMemoryStore, SocialStore, StorageResult};

#[derive(Clone, Default)]
pub struct StaleReads {
    pub inner: InMemoryStore,
}

#[async_trait]
impl SocialStore for StaleReads {
    async fn create_account(&self, user: &User, profile: &Profile) -> StorageResult<()> {
        self.inner.create_account(user, profile).await
    }

    async fn get_user(&self, id: &Uuid) -> StorageResult<Option<User>> {
        self.inner.get_user(id).await
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        self.inner.find_user_by_username(username).await
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        self.inner.list_users().await
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        self.inner.update_user(user).await
    }

    async fn delete_user(&self, id: &Uuid) -> StorageResult<()> {
        self.inner.delete_user(id).await
    }

    async fn get_profile(&self, id: &Uuid) -> StorageResult<Option<Profile>> {
        self.inner.get_profile(id).await
    }

    async fn get_profile_by_user(&self, user_id: &Uuid) -> StorageResult<Option<Profile>> {
        self.inner.get_profile_by_user(user_id).await
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        self.inner.list_profiles().await
    }

    async fn update_profile(&self, profile: &Profile) -> StorageResult<()> {
        self.inner.update_profile(profile).await
    }

    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        self.inner.create_session(session).await
    }

    async fn get_session(&self, token: &str) -> StorageResult<Option<Session>> {
        self.inner.get_session(token).await
    }

    async fn delete_session(&self, token: &str) -> StorageResult<bool> {
        self.inner.delete_session(token).await
    }

    async fn insert_follow(&self, follow: &Follow) -> StorageResult<()> {
        self.inner.insert_follow(follow).await
    }

    async fn find_follow(&self, _: &Uuid, _: &Uuid) -> StorageResult<Option<Follow>> {
        Ok(None)
    }

    async fn delete_follow(&self, follower_id: &Uuid, followed_id: &Uuid) -> StorageResult<bool> {
        self.inner.delete_follow(follower_id, followed_id).await
    }

    async fn list_followers(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        self.inner.list_followers(user_id).await
    }

    async fn list_following(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        self.inner.list_following(user_id).await
    }

    async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        self.inner.list_tags().await
    }

    async fn insert_post(&self, post: &Post) -> StorageResult<Post> {
        self.inner.insert_post(post).await
    }

    async fn get_post(&self, id: &Uuid) -> StorageResult<Option<Post>> {
        Ok(self.inner.get_post(id).await?.map(|post| Post {
            edited: false,
            ..post
        }))
    }

    async fn list_posts(&self) -> StorageResult<Vec<Post>> {
        self.inner.list_posts().await
    }

    async fn apply_post_edit(&self, post: &Post) -> StorageResult<Post> {
        self.inner.apply_post_edit(post).await
    }

    async fn delete_post(&self, id: &Uuid) -> StorageResult<()> {
        self.inner.delete_post(id).await
    }

    async fn insert_comment(&self, comment: &Comment) -> StorageResult<()> {
        self.inner.insert_comment(comment).await
    }

    async fn get_comment(&self, id: &Uuid) -> StorageResult<Option<Comment>> {
        self.inner.get_comment(id).await
    }

    async fn list_comments(&self, post_id: &Uuid) -> StorageResult<Vec<Comment>> {
        self.inner.list_comments(post_id).await
    }

    async fn delete_comment(&self, id: &Uuid) -> StorageResult<()> {
        self.inner.delete_comment(id).await
    }

    async fn insert_like(&self, like: &Like) -> StorageResult<()> {
        self.inner.insert_like(like).await
    }

    async fn find_like(&self, _: &Uuid, _: &LikeTarget) -> StorageResult<Option<Like>> {
        Ok(None)
    }

    async fn delete_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<bool> {
        self.inner.delete_like(user_id, target).await
    }

    async fn list_likes(&self, target: &LikeTarget) -> StorageResult<Vec<Like>> {
        self.inner.list_likes(target).await
    }
}
