//! Tags attached to posts

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::ValidationError;

pub const MAX_TAG_NAME_LENGTH: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// Trim incoming tag names, reject empty or oversized ones, and drop duplicates
/// while keeping first-seen order
pub fn normalize_tag_names(names: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());

    for raw in names {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::field("tags", "tag names may not be blank"));
        }
        if name.chars().count() > MAX_TAG_NAME_LENGTH {
            return Err(ValidationError::field(
                "tags",
                format!(
                    "tag '{}' is longer than {} characters",
                    name, MAX_TAG_NAME_LENGTH
                ),
            ));
        }
        if !normalized.iter().any(|n| n == name) {
            normalized.push(name.to_string());
        }
    }

    Ok(normalized)
}

/// Split a comma separated `tags` query value
pub fn parse_tag_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
