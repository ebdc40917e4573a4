//! PostgreSQL storage backend using sqlx.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! agora = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! One table per record type. Uniqueness rules are named `UNIQUE`
//! constraints and every reference is a foreign key with `ON DELETE CASCADE`,
//! so deleting a user or post removes everything hanging off it. Unique and
//! check violations (SQLSTATE 23505 / 23514) surface as
//! [`StorageError::Conflict`] carrying the constraint name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use super::{SocialStore, StorageResult, constraints};
use crate::core::StorageError;
use crate::entities::{Comment, Follow, Like, LikeTarget, Post, Profile, Session, Tag, User};

// ---------------------------------------------------------------------------
// Schema management
// ---------------------------------------------------------------------------

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username VARCHAR(60) NOT NULL,
        email VARCHAR(254) NOT NULL,
        password_hash TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT uq_users_username UNIQUE (username),
        CONSTRAINT uq_users_email UNIQUE (email)
    )",
    "CREATE TABLE IF NOT EXISTS profiles (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name VARCHAR(20) NOT NULL DEFAULT '',
        bio VARCHAR(150) NOT NULL DEFAULT '',
        picture VARCHAR(255) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT uq_profiles_user UNIQUE (user_id)
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        expires_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS follows (
        id UUID PRIMARY KEY,
        follower_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        followed_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT uq_follows_pair UNIQUE (follower_id, followed_id),
        CONSTRAINT ck_follows_no_self CHECK (follower_id <> followed_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_follows_followed ON follows (followed_id)",
    "CREATE TABLE IF NOT EXISTS tags (
        id UUID PRIMARY KEY,
        name VARCHAR(25) NOT NULL,
        CONSTRAINT uq_tags_name UNIQUE (name)
    )",
    "CREATE TABLE IF NOT EXISTS posts (
        id UUID PRIMARY KEY,
        author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title VARCHAR(45) NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        edited BOOLEAN NOT NULL DEFAULT FALSE
    )",
    "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts (author_id)",
    "CREATE TABLE IF NOT EXISTS post_tags (
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        tag_id UUID NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
        position INTEGER NOT NULL,
        PRIMARY KEY (post_id, tag_id)
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id UUID PRIMARY KEY,
        author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        content TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments (post_id)",
    "CREATE TABLE IF NOT EXISTS post_likes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT uq_post_likes_pair UNIQUE (user_id, post_id)
    )",
    "CREATE TABLE IF NOT EXISTS comment_likes (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        comment_id UUID NOT NULL REFERENCES comments(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT uq_comment_likes_pair UNIQUE (user_id, comment_id)
    )",
];

/// Apply the required tables, constraints and indexes (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(map_db_error)?;
    }
    Ok(())
}

/// Translate sqlx errors into storage errors, keeping constraint names
fn map_db_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or_default().to_string();
        match db.code().as_deref() {
            Some("23505") | Some("23514") => return StorageError::Conflict { constraint },
            Some("23503") => {
                return StorageError::NotFound {
                    entity_type: "referenced row".to_string(),
                    id: constraint,
                };
            }
            _ => {}
        }
    }
    StorageError::Backend(err.to_string())
}

// ---------------------------------------------------------------------------
// Row shapes
// ---------------------------------------------------------------------------

type UserRow = (Uuid, String, String, String, bool, DateTime<Utc>);
type ProfileRow = (
    Uuid,
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);
type SessionRow = (String, Uuid, DateTime<Utc>, DateTime<Utc>);
type FollowRow = (Uuid, Uuid, Uuid, DateTime<Utc>);
type PostRow = (Uuid, Uuid, String, String, DateTime<Utc>, bool);
type CommentRow = (Uuid, Uuid, Uuid, String, DateTime<Utc>);
type LikeRow = (Uuid, Uuid, Uuid, DateTime<Utc>);

const USER_COLUMNS: &str = "id, username, email, password_hash, is_active, created_at";
const PROFILE_COLUMNS: &str = "id, user_id, name, bio, picture, created_at, updated_at";
const POST_COLUMNS: &str = "id, author_id, title, content, created_at, edited";
const COMMENT_COLUMNS: &str = "id, author_id, post_id, content, created_at";

fn user_from_row((id, username, email, password_hash, is_active, created_at): UserRow) -> User {
    User {
        id,
        username,
        email,
        password_hash,
        is_active,
        created_at,
    }
}

fn profile_from_row(
    (id, user_id, name, bio, picture, created_at, updated_at): ProfileRow,
) -> Profile {
    Profile {
        id,
        user_id,
        name,
        bio,
        picture,
        created_at,
        updated_at,
    }
}

fn follow_from_row((id, follower_id, followed_id, created_at): FollowRow) -> Follow {
    Follow {
        id,
        follower_id,
        followed_id,
        created_at,
    }
}

fn comment_from_row((id, author_id, post_id, content, created_at): CommentRow) -> Comment {
    Comment {
        id,
        author_id,
        post_id,
        content,
        created_at,
    }
}

/// `(table, target column)` holding likes for a target kind
fn like_table(target: &LikeTarget) -> (&'static str, &'static str) {
    match target {
        LikeTarget::Post(_) => ("post_likes", "post_id"),
        LikeTarget::Comment(_) => ("comment_likes", "comment_id"),
    }
}

fn like_from_row(target: &LikeTarget, (id, user_id, target_id, created_at): LikeRow) -> Like {
    let target = match target {
        LikeTarget::Post(_) => LikeTarget::Post(target_id),
        LikeTarget::Comment(_) => LikeTarget::Comment(target_id),
    };
    Like {
        id,
        user_id,
        target,
        created_at,
    }
}

/// Resolve `tags` by name, creating missing rows, and link them to `post_id`
/// in order. Runs on the caller's transaction.
async fn link_tags(conn: &mut PgConnection, post_id: Uuid, tags: &[Tag]) -> StorageResult<Vec<Tag>> {
    let mut linked = Vec::with_capacity(tags.len());

    for (position, tag) in tags.iter().enumerate() {
        sqlx::query("INSERT INTO tags (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(tag.id)
            .bind(&tag.name)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;

        let (id,) = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM tags WHERE name = $1")
            .bind(&tag.name)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_db_error)?;

        sqlx::query("INSERT INTO post_tags (post_id, tag_id, position) VALUES ($1, $2, $3)")
            .bind(post_id)
            .bind(id)
            .bind(position as i32)
            .execute(&mut *conn)
            .await
            .map_err(map_db_error)?;

        linked.push(Tag {
            id,
            name: tag.name.clone(),
        });
    }

    Ok(linked)
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let store = PostgresStore::connect("postgres://localhost/agora").await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool; the schema must already exist
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, then apply the schema
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(map_db_error)?;

        ensure_schema(&pool).await?;
        tracing::info!("postgres schema ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Attach tags to already loaded posts, preserving tag insertion order
    async fn load_tags(&self, mut posts: Vec<Post>) -> StorageResult<Vec<Post>> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let rows = sqlx::query_as::<_, (Uuid, Uuid, String)>(
            "SELECT pt.post_id, t.id, t.name FROM post_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = ANY($1) ORDER BY pt.position",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        for (post_id, id, name) in rows {
            if let Some(post) = posts.iter_mut().find(|p| p.id == post_id) {
                post.tags.push(Tag { id, name });
            }
        }
        Ok(posts)
    }

    async fn fetch_posts(&self, sql: &str, bind: Option<Uuid>) -> StorageResult<Vec<Post>> {
        let mut query = sqlx::query_as::<_, PostRow>(sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }

        let posts = query
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?
            .into_iter()
            .map(|(id, author_id, title, content, created_at, edited)| Post {
                id,
                author_id,
                title,
                content,
                tags: Vec::new(),
                created_at,
                edited,
            })
            .collect();

        self.load_tags(posts).await
    }

    async fn count(&self, sql: &str, id: &Uuid) -> StorageResult<usize> {
        let (count,) = sqlx::query_as::<_, (i64,)>(sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl SocialStore for PostgresStore {
    async fn create_account(&self, user: &User, profile: &Profile) -> StorageResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, is_active, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            "INSERT INTO profiles (id, user_id, name, bio, picture, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.picture)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }

    async fn get_user(&self, id: &Uuid) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(user_from_row))
    }

    async fn find_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(user_from_row))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(user_from_row).collect())
    }

    async fn update_user(&self, user: &User) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE users SET username = $2, email = $3, password_hash = $4, is_active = $5 \
             WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("user", user.id));
        }
        Ok(())
    }

    async fn delete_user(&self, id: &Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("user", id));
        }
        Ok(())
    }

    async fn get_profile(&self, id: &Uuid) -> StorageResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(profile_from_row))
    }

    async fn get_profile_by_user(&self, user_id: &Uuid) -> StorageResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(profile_from_row))
    }

    async fn list_profiles(&self) -> StorageResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(profile_from_row).collect())
    }

    async fn update_profile(&self, profile: &Profile) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE profiles SET name = $2, bio = $3, picture = $4, updated_at = $5 WHERE id = $1",
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.bio)
        .bind(&profile.picture)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("profile", profile.id));
        }
        Ok(())
    }

    async fn create_session(&self, session: &Session) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_session(&self, token: &str) -> StorageResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(|(token, user_id, created_at, expires_at)| Session {
            token,
            user_id,
            created_at,
            expires_at,
        }))
    }

    async fn delete_session(&self, token: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_follow(&self, follow: &Follow) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO follows (id, follower_id, followed_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(follow.id)
        .bind(follow.follower_id)
        .bind(follow.followed_id)
        .bind(follow.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_follow(
        &self,
        follower_id: &Uuid,
        followed_id: &Uuid,
    ) -> StorageResult<Option<Follow>> {
        let row = sqlx::query_as::<_, FollowRow>(
            "SELECT id, follower_id, followed_id, created_at FROM follows \
             WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(follow_from_row))
    }

    async fn delete_follow(&self, follower_id: &Uuid, followed_id: &Uuid) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_followers(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        let rows = sqlx::query_as::<_, FollowRow>(
            "SELECT id, follower_id, followed_id, created_at FROM follows \
             WHERE followed_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(follow_from_row).collect())
    }

    async fn list_following(&self, user_id: &Uuid) -> StorageResult<Vec<Follow>> {
        let rows = sqlx::query_as::<_, FollowRow>(
            "SELECT id, follower_id, followed_id, created_at FROM follows \
             WHERE follower_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(follow_from_row).collect())
    }

    async fn count_followers(&self, user_id: &Uuid) -> StorageResult<usize> {
        self.count("SELECT COUNT(*) FROM follows WHERE followed_id = $1", user_id)
            .await
    }

    async fn count_following(&self, user_id: &Uuid) -> StorageResult<usize> {
        self.count("SELECT COUNT(*) FROM follows WHERE follower_id = $1", user_id)
            .await
    }

    async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        let rows = sqlx::query_as::<_, (Uuid, String)>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|(id, name)| Tag { id, name }).collect())
    }

    async fn insert_post(&self, post: &Post) -> StorageResult<Post> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            "INSERT INTO posts (id, author_id, title, content, created_at, edited) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.created_at)
        .bind(post.edited)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let tags = link_tags(&mut tx, post.id, &post.tags).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(Post {
            tags,
            ..post.clone()
        })
    }

    async fn get_post(&self, id: &Uuid) -> StorageResult<Option<Post>> {
        let posts = self
            .fetch_posts(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"),
                Some(*id),
            )
            .await?;
        Ok(posts.into_iter().next())
    }

    async fn list_posts(&self) -> StorageResult<Vec<Post>> {
        self.fetch_posts(
            &format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id"),
            None,
        )
        .await
    }

    async fn apply_post_edit(&self, post: &Post) -> StorageResult<Post> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            "UPDATE posts SET title = $2, content = $3, edited = TRUE \
             WHERE id = $1 AND edited = FALSE",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            let exists = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM posts WHERE id = $1")
                .bind(post.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

            return Err(match exists {
                Some(_) => StorageError::conflict(constraints::POST_ALREADY_EDITED),
                None => StorageError::not_found("post", post.id),
            });
        }

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post.id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let tags = link_tags(&mut tx, post.id, &post.tags).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(Post {
            tags,
            ..post.clone()
        })
    }

    async fn delete_post(&self, id: &Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("post", id));
        }
        Ok(())
    }

    async fn count_posts_by(&self, author_id: &Uuid) -> StorageResult<usize> {
        self.count("SELECT COUNT(*) FROM posts WHERE author_id = $1", author_id)
            .await
    }

    async fn insert_comment(&self, comment: &Comment) -> StorageResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, author_id, post_id, content, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(comment.id)
        .bind(comment.author_id)
        .bind(comment.post_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn get_comment(&self, id: &Uuid) -> StorageResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(comment_from_row))
    }

    async fn list_comments(&self, post_id: &Uuid) -> StorageResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 ORDER BY created_at, id"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(comment_from_row).collect())
    }

    async fn delete_comment(&self, id: &Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("comment", id));
        }
        Ok(())
    }

    async fn count_comments(&self, post_id: &Uuid) -> StorageResult<usize> {
        self.count("SELECT COUNT(*) FROM comments WHERE post_id = $1", post_id)
            .await
    }

    async fn insert_like(&self, like: &Like) -> StorageResult<()> {
        let (table, column) = like_table(&like.target);
        sqlx::query(&format!(
            "INSERT INTO {table} (id, user_id, {column}, created_at) VALUES ($1, $2, $3, $4)"
        ))
        .bind(like.id)
        .bind(like.user_id)
        .bind(like.target.id())
        .bind(like.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    async fn find_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<Option<Like>> {
        let (table, column) = like_table(target);
        let row = sqlx::query_as::<_, LikeRow>(&format!(
            "SELECT id, user_id, {column}, created_at FROM {table} \
             WHERE user_id = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(target.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(|row| like_from_row(target, row)))
    }

    async fn delete_like(&self, user_id: &Uuid, target: &LikeTarget) -> StorageResult<bool> {
        let (table, column) = like_table(target);
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE user_id = $1 AND {column} = $2"
        ))
        .bind(user_id)
        .bind(target.id())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_likes(&self, target: &LikeTarget) -> StorageResult<Vec<Like>> {
        let (table, column) = like_table(target);
        let rows = sqlx::query_as::<_, LikeRow>(&format!(
            "SELECT id, user_id, {column}, created_at FROM {table} \
             WHERE {column} = $1 ORDER BY created_at, id"
        ))
        .bind(target.id())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| like_from_row(target, row))
            .collect())
    }

    async fn count_likes(&self, target: &LikeTarget) -> StorageResult<usize> {
        let (table, column) = like_table(target);
        self.count(
            &format!("SELECT COUNT(*) FROM {table} WHERE {column} = $1"),
            &target.id(),
        )
        .await
    }
}
