//! # Agora
//!
//! A social networking REST backend: user accounts, profiles, follow
//! relationships, posts, tags, comments and likes.
//!
//! ## Features
//!
//! - **Follow graph**: directed, unique edges with no self-follow
//! - **One-shot edits**: a post may be modified once, within 12 hours of creation
//! - **Bounded tagging**: at most 30 tags per post
//! - **Unique likes**: one like per user per post or comment
//! - **Pluggable storage**: in-memory by default, PostgreSQL behind the `postgres` feature
//! - **Typed errors**: every failure renders as a structured JSON error
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agora::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_config(AppConfig::default())
//!         .with_store(InMemoryStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod services;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{hash_password, hash_password_async, verify_password, verify_password_async},
        entity::{Entity, Owned},
        error::{
            ErrorResponse, FieldValidationError, RequestError, SocialError, StorageError,
            ValidationError,
        },
        query::{PageRequest, PaginatedResponse, PaginationMeta},
    };

    // === Entities ===
    pub use crate::entities::{
        comment::{Comment, CommentView, CreateComment},
        follow::{Follow, FollowEntry},
        like::{Like, LikeTarget, LikeView},
        post::{CreatePost, EDIT_WINDOW_HOURS, MAX_TAGS_PER_POST, Post, PostView, UpdatePost},
        profile::{Profile, ProfileView, UpdateProfile},
        session::Session,
        tag::Tag,
        user::{AuthorSummary, LoginRequest, RegisterUser, UpdateUser, User, UserView},
    };

    // === Services ===
    pub use crate::services::{
        AccountService, CommentService, FollowService, LikeService, PostService, ProfileService,
    };

    // === Storage ===
    pub use crate::storage::{InMemoryStore, SocialStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{AppConfig, StorageBackend};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
