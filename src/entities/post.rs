//! Posts, the one-shot edit window and the per-post tag limit
//!
//! A post may be modified exactly once, and only while
//! `now <= created_at + EDIT_WINDOW_HOURS`. The checks run in a fixed order
//! (already edited, then window, then tag capacity) and a rejected edit leaves
//! the post untouched.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::tag::Tag;
use super::{impl_entity, not_blank};
use super::user::AuthorSummary;
use crate::core::{Owned, ValidationError};

/// Hours after creation during which a post can still be edited
pub const EDIT_WINDOW_HOURS: i64 = 12;

/// Maximum number of distinct tags on a post
pub const MAX_TAGS_PER_POST: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub edited: bool,
}

impl Post {
    /// Create an unedited post; duplicate tags collapse to one
    pub fn new(
        author_id: Uuid,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Result<Self, ValidationError> {
        let mut distinct: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !distinct.iter().any(|t| t.id == tag.id) {
                distinct.push(tag);
            }
        }
        check_tag_limit(distinct.len())?;

        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            content: content.into(),
            tags: distinct,
            created_at: Utc::now(),
            edited: false,
        })
    }

    pub fn editable_until(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(EDIT_WINDOW_HOURS)
    }

    pub fn is_editable(&self, now: DateTime<Utc>) -> bool {
        self.ensure_editable(now).is_ok()
    }

    pub fn ensure_editable(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.edited {
            return Err(ValidationError::AlreadyEdited);
        }
        if now > self.editable_until() {
            return Err(ValidationError::EditWindowExpired);
        }
        Ok(())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Check that adding `names` keeps the post within [`MAX_TAGS_PER_POST`].
    ///
    /// Names already on the post do not count twice.
    pub fn ensure_tag_capacity(&self, names: &[String]) -> Result<(), ValidationError> {
        let mut additions: Vec<&str> = Vec::new();
        for name in names {
            if !self.has_tag(name) && !additions.contains(&name.as_str()) {
                additions.push(name);
            }
        }
        check_tag_limit(self.tags.len() + additions.len())
    }

    /// Apply the one permitted edit, merging `new_tags` into the existing set
    pub fn apply_edit(
        &mut self,
        title: Option<String>,
        content: Option<String>,
        new_tags: Vec<Tag>,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        self.ensure_editable(now)?;

        let names: Vec<String> = new_tags.iter().map(|t| t.name.clone()).collect();
        self.ensure_tag_capacity(&names)?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        for tag in new_tags {
            if !self.has_tag(&tag.name) {
                self.tags.push(tag);
            }
        }
        self.edited = true;

        Ok(())
    }
}

impl_entity!(Post, "posts", "post");

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

fn check_tag_limit(attempted: usize) -> Result<(), ValidationError> {
    if attempted > MAX_TAGS_PER_POST {
        return Err(ValidationError::TagLimitExceeded {
            limit: MAX_TAGS_PER_POST,
            attempted,
        });
    }
    Ok(())
}

/// Payload for `POST /posts`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePost {
    #[validate(
        length(min = 1, max = 45, message = "title must be 1 to 45 characters"),
        custom(function = "not_blank", message = "title may not be blank")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "content may not be blank"))]
    pub content: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for `PATCH /posts/{id}`; tags are added to the existing set
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePost {
    #[validate(
        length(min = 1, max = 45, message = "title must be 1 to 45 characters"),
        custom(function = "not_blank", message = "title may not be blank")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank", message = "content may not be blank"))]
    pub content: Option<String>,

    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostView {
    pub id: Uuid,
    pub author: AuthorSummary,
    pub title: String,
    pub content: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub edited: bool,
    pub editable_until: DateTime<Utc>,
    pub editable: bool,
    pub total_likes: usize,
    pub total_comments: usize,
    pub total_tags: usize,
}

impl PostView {
    pub fn new(
        post: &Post,
        author: AuthorSummary,
        total_likes: usize,
        total_comments: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: post.id,
            author,
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            created_at: post.created_at,
            edited: post.edited,
            editable_until: post.editable_until(),
            editable: post.is_editable(now),
            total_likes,
            total_comments,
            total_tags: post.tags.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(count: usize, prefix: &str) -> Vec<Tag> {
        (0..count).map(|i| Tag::new(format!("{prefix}{i}"))).collect()
    }

    fn post_with(tag_count: usize) -> Post {
        Post::new(Uuid::new_v4(), "title", "content", tags(tag_count, "t")).unwrap()
    }

    #[test]
    fn test_create_tag_limit() {
        assert!(Post::new(Uuid::new_v4(), "t", "c", tags(30, "t")).is_ok());

        let err = Post::new(Uuid::new_v4(), "t", "c", tags(31, "t")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TagLimitExceeded {
                limit: 30,
                attempted: 31
            }
        ));
    }

    #[test]
    fn test_create_dedupes_tags() {
        let tag = Tag::new("rust");
        let post = Post::new(Uuid::new_v4(), "t", "c", vec![tag.clone(), tag]).unwrap();
        assert_eq!(post.tags.len(), 1);
    }

    #[test]
    fn test_first_edit_succeeds() {
        let mut post = post_with(0);
        let now = post.created_at + Duration::hours(1);

        post.apply_edit(Some("new title".into()), None, vec![], now)
            .unwrap();

        assert!(post.edited);
        assert_eq!(post.title, "new title");
        assert_eq!(post.content, "content");
    }

    #[test]
    fn test_second_edit_rejected() {
        let mut post = post_with(0);
        let now = post.created_at;
        post.apply_edit(None, Some("once".into()), vec![], now).unwrap();

        let err = post
            .apply_edit(None, Some("twice".into()), vec![], now)
            .unwrap_err();
        assert!(matches!(err, ValidationError::AlreadyEdited));
        assert_eq!(post.content, "once");
    }

    #[test]
    fn test_edit_window_boundary() {
        let post = post_with(0);
        let deadline = post.created_at + Duration::hours(EDIT_WINDOW_HOURS);

        assert!(post.ensure_editable(deadline).is_ok());
        assert!(matches!(
            post.ensure_editable(deadline + Duration::seconds(1)),
            Err(ValidationError::EditWindowExpired)
        ));
    }

    #[test]
    fn test_already_edited_checked_before_window() {
        let mut post = post_with(0);
        post.edited = true;
        let late = post.created_at + Duration::hours(EDIT_WINDOW_HOURS + 1);

        assert!(matches!(
            post.ensure_editable(late),
            Err(ValidationError::AlreadyEdited)
        ));
    }

    #[test]
    fn test_tag_overflow_leaves_post_unchanged() {
        let mut post = post_with(3);
        let before = post.clone();

        let err = post
            .apply_edit(
                Some("changed".into()),
                None,
                tags(28, "new"),
                post.created_at,
            )
            .unwrap_err();

        assert!(matches!(
            err,
            ValidationError::TagLimitExceeded { attempted: 31, .. }
        ));
        assert_eq!(post, before);
    }

    #[test]
    fn test_tag_capacity_ignores_existing_names() {
        let post = post_with(30);
        let existing: Vec<String> = post.tags.iter().map(|t| t.name.clone()).collect();

        assert!(post.ensure_tag_capacity(&existing).is_ok());
        assert!(post.ensure_tag_capacity(&["fresh".to_string()]).is_err());
    }

    #[test]
    fn test_edit_merges_tags() {
        let mut post = post_with(2);
        let mut incoming = vec![post.tags[0].clone()];
        incoming.push(Tag::new("extra"));

        post.apply_edit(None, None, incoming, post.created_at).unwrap();

        assert_eq!(post.tags.len(), 3);
        assert!(post.has_tag("extra"));
    }

    #[test]
    fn test_view_derived_fields() {
        let post = post_with(2);
        let author = AuthorSummary {
            user_id: post.author_id,
            username: "alice".into(),
            profile_name: String::new(),
        };
        let view = PostView::new(&post, author, 4, 1, post.created_at);

        assert_eq!(view.total_tags, 2);
        assert_eq!(view.total_likes, 4);
        assert_eq!(view.total_comments, 1);
        assert!(view.editable);
        assert_eq!(view.editable_until, post.created_at + Duration::hours(12));
    }

    #[test]
    fn test_payloads_reject_whitespace_only_text() {
        let create = |title: &str, content: &str| CreatePost {
            title: title.to_string(),
            content: content.to_string(),
            tags: vec![],
        };
        assert!(create("Hello", "body").validate().is_ok());
        assert!(create("Hello", "   ").validate().is_err());
        assert!(create("  ", "body").validate().is_err());

        let blank_content = UpdatePost {
            content: Some("\n\t ".to_string()),
            ..Default::default()
        };
        assert!(blank_content.validate().is_err());

        let title_only = UpdatePost {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(title_only.validate().is_ok());
    }
}
