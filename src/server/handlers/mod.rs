//! Axum handlers, one module per resource
//!
//! Handlers only translate HTTP to service calls: path ids come in through
//! [`IdPath`](crate::core::extractors::IdPath), bodies through
//! [`ValidatedJson`](crate::core::extractors::ValidatedJson) and the caller
//! through [`AuthUser`](crate::core::extractors::AuthUser). Filtering happens
//! in the services and pagination here, against the configured limits.

pub mod accounts;
pub mod comments;
pub mod follows;
pub mod likes;
pub mod posts;
pub mod profiles;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::core::TimeRange;

/// Bare `page` / `limit` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Paginated list with a free-text search and a creation-time range
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ListQuery {
    pub fn created(&self) -> TimeRange {
        TimeRange::new(self.created_after, self.created_before)
    }
}
