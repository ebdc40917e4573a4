//! Core module containing the error model, shared traits and request plumbing

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod query;

pub use entity::{Entity, Owned};
pub use error::{RequestError, SocialError, StorageError, ValidationError};
pub use query::{PageRequest, PaginatedResponse, PaginationMeta, TimeRange};
