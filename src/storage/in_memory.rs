//! In-memory implementation of SocialStore for testing and development

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use uuid::Uuid;

use super::{SocialStore, StorageResult, constraints, like_constraint};
use crate::core::StorageError;
use crate::entities::{Comment, Follow, Like, LikeTarget, Post, Profile, Session, Tag, User};

/// All tables behind one lock, so multi-table checks and cascades are atomic
#[derive(Default)]
struct Tables {
    users: IndexMap<Uuid, User>,
    profiles: IndexMap<Uuid, Profile>,
    sessions: HashMap<String, Session>,
    follows: IndexMap<Uuid, Follow>,
    tags: IndexMap<String, Tag>,
    posts: IndexMap<Uuid, Post>,
    comments: IndexMap<Uuid, Comment>,
    likes: IndexMap<Uuid, Like>,
}

impl Tables {
    fn require_user(&self, id: &Uuid) -> StorageResult<()> {
        if self.users.contains_key(id) {
            Ok(())
        } else {
            Err(StorageError::not_found("user", id))
        }
    }

    fn target_exists(&self, target: &LikeTarget) -> bool {
        match target {
            LikeTarget::Post(id) => self.posts.contains_key(id),
            LikeTarget::Comment(id) => self.comments.contains_key(id),
        }
    }

    /// Swap each tag for the stored one with the same name, creating missing ones
    fn resolve_tags(&mut self, tags: &[Tag]) -> Vec<Tag> {
        tags.iter()
            .map(|tag| {
                self.tags
                    .entry(tag.name.clone())
                    .or_insert_with(|| tag.clone())
                    .clone()
            })
            .collect()
    }

    /// Drop a set of comments and every like on them
    fn purge_comments(&mut self, doomed: &[Uuid]) {
        self.comments.retain(|id, _| !doomed.contains(id));
        self.likes.retain(|_, like| match like.target {
            LikeTarget::Comment(id) => !doomed.contains(&id),
            LikeTarget::Post(_) => true,
        });
    }

    /// Drop a set of posts with their comments and likes
    fn purge_posts(&mut self, doomed: &[Uuid]) {
        let comments: Vec<Uuid> = self
            .comments
            .values()
            .filter(|c| doomed.contains(&c.post_id))
            .map(|c| c.id)
            .collect();
        self.purge_comments(&comments);

        self.posts.retain(|id, _| !doomed.contains(id));
        self.likes.retain(|_, like| match like.target {
            LikeTarget::Post(id) => !doomed.contains(&id),
            LikeTarget::Comment(_) => true,
        });
    }
}

/// In-memory store implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// every check-then-write happens under a single write guard.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::Backend(format!("Failed to acquire write lock: {}", e)))
    }
}

/// Stable sort by creation time, keeping insertion order for ties
fn oldest_first<T>(
    items: impl Iterator<Item = T>,
    created_at: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| created_at(item));
    items
}

#[async_trait]
impl SocialStore for InMemoryStore {
    async fn create_account(&self, user: &User, profile: &Profile) -> StorageResult<()> {
        let mut tables = self.write()?;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::conflict(constraints::USERNAME));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StorageError::conflict(constraints::EMAIL));
        }
        if tables.profiles.values().any(|p| p.user_id == user.id) {
            return Err(StorageError::conflict(constraints::PROFILE_USER));
        }

        tables.users.insert(user.id, user.clone());
        tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn get_user(&self, id: &Uuid) -> StorageResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let tables = self.read()?;
        Ok(oldest_first(tables.users.values().cloned(), |u| u.created_at))
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&user.id)?;

        for other in tables.users.values().filter(|u| u.id != user.id) {
            if other.username == user.username {
                return Err(StorageError::conflict(constraints::USERNAME));
            }
            if other.email == user.email {
                return Err(StorageError::conflict(constraints::EMAIL));
            }
        }

        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &Uuid) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(id)?;

        let posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| &p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.purge_posts(&posts);

        let comments: Vec<Uuid> = tables
            .comments
            .values()
            .filter(|c| &c.author_id == id)
            .map(|c| c.id)
            .collect();
        tables.purge_comments(&comments);

        tables.likes.retain(|_, like| &like.user_id != id);
        tables
            .follows
            .retain(|_, f| &f.follower_id != id && &f.followed_id != id);
        tables.sessions.retain(|_, s| &s.user_id != id);
        tables.profiles.retain(|_, p| &p.user_id != id);
        tables.users.shift_remove(id);

        Ok(())
    }

    async fn get_profile(&self, id: &Uuid) -> StorageResult<Option<Profile>> {
        Ok(self.read()?.profiles.get(id).cloned())
    }

    async fn get_profile_by_user(&self, user_id: &Uuid) -> StorageResult<Option<Profile>> {
        Ok(self
            .read()?
            .profiles
            .values()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        let tables = self.read()?;
        Ok(oldest_first(tables.profiles.values().cloned(), |p| p.created_at))
    }

    async fn update_profile(&self, profile: &Profile) -> StorageResult<()> {
        let mut tables = self.write()?;
        let stored = tables
            .profiles
            .get_mut(&profile.id)
            .ok_or_else(|| StorageError::not_found("profile", profile.id))?;

        *stored = profile.clone();
        Ok(())
    }

    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&session.user_id)?;
        tables
            .sessions
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, token: &str) -> StorageResult<Option<Session>> {
        Ok(self.read()?.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> StorageResult<bool> {
        Ok(self.write()?.sessions.remove(token).is_some())
    }

    async fn insert_follow(&self, follow: &Follow) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&follow.follower_id)?;
        tables.require_user(&follow.followed_id)?;

        if follow.follower_id == follow.followed_id {
            return Err(StorageError::conflict(constraints::FOLLOW_NO_SELF));
        }
        if tables.follows.values().any(|f| {
            f.follower_id == follow.follower_id && f.followed_id == follow.followed_id
        }) {
            return Err(StorageError::conflict(constraints::FOLLOW_PAIR));
        }

        tables.follows.insert(follow.id, follow.clone());
        Ok(())
    }

    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followed_id: &Uuid,
    ) -> StorageResult<Option<Follow>> {
        Ok(self
            .read()?
            .follows
            .values()
            .find(|f| &f.follower_id == follower_id && &f.followed_id == followed_id)
            .cloned())
    }

    async fn delete_follow(&self, follower_id: &Uuid, followed_id: &Uuid) -> StorageResult<bool> {
        let mut tables = self.write()?;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|_, f| !(&f.follower_id == follower_id && &f.followed_id == followed_id));
        Ok(tables.follows.len() < before)
    }

    async fn list_followers(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        let tables = self.read()?;
        Ok(oldest_first(
            tables
                .follows
                .values()
                .filter(|f| &f.followed_id == user_id)
                .cloned(),
            |f| f.created_at,
        ))
    }

    async fn list_following(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        let tables = self.read()?;
        Ok(oldest_first(
            tables
                .follows
                .values()
                .filter(|f| &f.follower_id == user_id)
                .cloned(),
            |f| f.created_at,
        ))
    }

    async fn count_followers(&self, user_id: &Uuid) -> StorageResult<usize> {
        Ok(self
            .read()?
            .follows
            .values()
            .filter(|f| &f.followed_id == user_id)
            .count())
    }

    async fn count_following(&self, user_id: &Uuid) -> StorageResult<usize> {
        Ok(self
            .read()?
            .follows
            .values()
            .filter(|f| &f.follower_id == user_id)
            .count())
    }

    async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self.read()?.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn insert_post(&self, post: &Post) -> StorageResult<Post> {
        let mut tables = self.write()?;
        tables.require_user(&post.author_id)?;

        let stored = Post {
            tags: tables.resolve_tags(&post.tags),
            ..post.clone()
        };
        tables.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_post(&self, id: &Uuid) -> StorageResult<Option<Post>> {
        Ok(self.read()?.posts.get(id).cloned())
    }

    async fn list_posts(&self) -> StorageResult<Vec<Post>> {
        let tables = self.read()?;
        // Newest insert wins ties on created_at
        let mut posts: Vec<Post> = tables.posts.values().rev().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn apply_post_edit(&self, post: &Post) -> StorageResult<Post> {
        let mut tables = self.write()?;
        match tables.posts.get(&post.id) {
            None => return Err(StorageError::not_found("post", post.id)),
            Some(stored) if stored.edited => {
                return Err(StorageError::conflict(constraints::POST_ALREADY_EDITED));
            }
            Some(_) => {}
        }

        let stored = Post {
            tags: tables.resolve_tags(&post.tags),
            ..post.clone()
        };
        tables.posts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_post(&self, id: &Uuid) -> StorageResult<()> {
        let mut tables = self.write()?;
        if !tables.posts.contains_key(id) {
            return Err(StorageError::not_found("post", id));
        }
        tables.purge_posts(&[*id]);
        Ok(())
    }

    async fn count_posts_by(&self, author_id: &Uuid) -> StorageResult<usize> {
        Ok(self
            .read()?
            .posts
            .values()
            .filter(|p| &p.author_id == author_id)
            .count())
    }

    async fn insert_comment(&self, comment: &Comment) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&comment.author_id)?;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(StorageError::not_found("post", comment.post_id));
        }

        tables.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn get_comment(&self, id: &Uuid) -> StorageResult<Option<Comment>> {
        Ok(self.read()?.comments.get(id).cloned())
    }

    async fn list_comments(&self, post_id: &Uuid) -> StorageResult<Vec<Comment>> {
        let tables = self.read()?;
        Ok(oldest_first(
            tables
                .comments
                .values()
                .filter(|c| &c.post_id == post_id)
                .cloned(),
            |c| c.created_at,
        ))
    }

    async fn count_comments(&self, post_id: &Uuid) -> StorageResult<usize> {
        Ok(self
            .read()?
            .comments
            .values()
            .filter(|c| &c.post_id == post_id)
            .count())
    }

    async fn delete_comment(&self, id: &Uuid) -> StorageResult<()> {
        let mut tables = self.write()?;
        if !tables.comments.contains_key(id) {
            return Err(StorageError::not_found("comment", id));
        }
        tables.purge_comments(&[*id]);
        Ok(())
    }

    async fn insert_like(&self, like: &Like) -> StorageResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&like.user_id)?;
        if !tables.target_exists(&like.target) {
            return Err(StorageError::not_found(
                like.target.entity_type(),
                like.target.id(),
            ));
        }
        if tables
            .likes
            .values()
            .any(|l| l.user_id == like.user_id && l.target == like.target)
        {
            return Err(StorageError::conflict(like_constraint(&like.target)));
        }

        tables.likes.insert(like.id, like.clone());
        Ok(())
    }

    async fn find_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<Option<Like>> {
        Ok(self
            .read()?
            .likes
            .values()
            .find(|l| &l.user_id == user_id && &l.target == target)
            .cloned())
    }

    async fn delete_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<bool> {
        let mut tables = self.write()?;
        let before = tables.likes.len();
        tables
            .likes
            .retain(|_, l| !(&l.user_id == user_id && &l.target == target));
        Ok(tables.likes.len() < before)
    }

    async fn list_likes(&self, target: &LikeTarget) -> StorageResult<Vec<Like>> {
        let tables = self.read()?;
        Ok(oldest_first(
            tables
                .likes
                .values()
                .filter(|l| &l.target == target)
                .cloned(),
            |l| l.created_at,
        ))
    }

    async fn count_likes(&self, target: &LikeTarget) -> StorageResult<usize> {
        Ok(self
            .read()?
            .likes
            .values()
            .filter(|l| &l.target == target)
            .count())
    }
}
