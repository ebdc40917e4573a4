//! Posts: creation, listing and feed, the one-shot edit, and tags

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::author_summary;
use crate::core::query::{PageRequest, PaginatedResponse, contains_ci};
use crate::core::{Entity, Owned, SocialError, StorageError, TimeRange, ValidationError};
use crate::entities::post::MAX_TAGS_PER_POST;
use crate::entities::tag::normalize_tag_names;
use crate::entities::{AuthorSummary, CreatePost, LikeTarget, Post, PostView, Tag, UpdatePost};
use crate::storage::{SocialStore, constraints};

/// Filters for `GET /posts` and the feed
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Substring of the author's username or profile name
    pub search_author: Option<String>,
    /// Substring of the title or content
    pub search_post: Option<String>,
    /// Every listed tag must be on the post
    pub tags: Vec<String>,
    pub created: TimeRange,
}

impl PostFilter {
    fn matches(&self, post: &Post, author: &AuthorSummary) -> bool {
        self.created.contains(post.created_at)
            && self.search_author.as_deref().is_none_or(|needle| {
                contains_ci(&author.username, needle) || contains_ci(&author.profile_name, needle)
            })
            && self.search_post.as_deref().is_none_or(|needle| {
                contains_ci(&post.title, needle) || contains_ci(&post.content, needle)
            })
            && self.tags.iter().all(|tag| post.has_tag(tag))
    }
}

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn SocialStore>,
}

fn edit_conflict(err: StorageError) -> SocialError {
    if err.is_conflict_on(constraints::POST_ALREADY_EDITED) {
        ValidationError::AlreadyEdited.into()
    } else {
        err.into()
    }
}

impl PostService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    async fn require_post(&self, id: &Uuid) -> Result<Post, SocialError> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| Post::not_found(id))
    }

    async fn view_with(
        &self,
        post: &Post,
        author: AuthorSummary,
        now: DateTime<Utc>,
    ) -> Result<PostView, SocialError> {
        let likes = self.store.count_likes(&LikeTarget::Post(post.id)).await?;
        let comments = self.store.count_comments(&post.id).await?;
        Ok(PostView::new(post, author, likes, comments, now))
    }

    async fn view(&self, post: &Post) -> Result<PostView, SocialError> {
        let author = author_summary(self.store.as_ref(), &post.author_id).await?;
        self.view_with(post, author, Utc::now()).await
    }

    pub async fn create_post(
        &self,
        author_id: &Uuid,
        req: CreatePost,
    ) -> Result<PostView, SocialError> {
        let names = normalize_tag_names(&req.tags)?;
        if names.len() > MAX_TAGS_PER_POST {
            return Err(ValidationError::TagLimitExceeded {
                limit: MAX_TAGS_PER_POST,
                attempted: names.len(),
            }
            .into());
        }

        let tags = names.into_iter().map(Tag::new).collect();
        let post = Post::new(*author_id, req.title, req.content, tags)?;
        let post = self.store.insert_post(&post).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, tags = post.tags.len(), "post created");
        self.view(&post).await
    }

    pub async fn get_post(&self, id: &Uuid) -> Result<PostView, SocialError> {
        let post = self.require_post(id).await?;
        self.view(&post).await
    }

    /// One page of the posts matching `filter`, newest first
    pub async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PaginatedResponse<PostView>, SocialError> {
        let posts = self.store.list_posts().await?;
        self.page_of_views(posts, filter, page).await
    }

    /// One page of posts by users `user_id` follows, newest first
    pub async fn feed(
        &self,
        user_id: &Uuid,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PaginatedResponse<PostView>, SocialError> {
        let followed: HashSet<Uuid> = self
            .store
            .list_following(user_id)
            .await?
            .into_iter()
            .map(|f| f.followed_id)
            .collect();

        let posts = self
            .store
            .list_posts()
            .await?
            .into_iter()
            .filter(|p| followed.contains(&p.author_id))
            .collect();
        self.page_of_views(posts, filter, page).await
    }

    /// Filter on post and author, slice the page, then count likes and
    /// comments for the posts on that page only
    async fn page_of_views(
        &self,
        posts: Vec<Post>,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PaginatedResponse<PostView>, SocialError> {
        let mut authors: HashMap<Uuid, AuthorSummary> = HashMap::new();
        let mut matching = Vec::new();

        for post in posts {
            let author = match authors.get(&post.author_id) {
                Some(author) => author.clone(),
                None => {
                    let author = author_summary(self.store.as_ref(), &post.author_id).await?;
                    authors.insert(post.author_id, author.clone());
                    author
                }
            };

            if filter.matches(&post, &author) {
                matching.push((post, author));
            }
        }

        let page = page.paginate(matching);
        let now = Utc::now();
        let mut views = Vec::with_capacity(page.data.len());
        for (post, author) in page.data {
            views.push(self.view_with(&post, author, now).await?);
        }

        Ok(PaginatedResponse {
            data: views,
            pagination: page.pagination,
        })
    }

    /// Apply the single permitted edit.
    ///
    /// Rejections (already edited, window expired, tag limit) leave the post
    /// unchanged. New tags are created by the store in the same write as the
    /// edit, so a refused edit never leaves tags behind.
    pub async fn update_post(
        &self,
        actor_id: &Uuid,
        id: &Uuid,
        req: UpdatePost,
    ) -> Result<PostView, SocialError> {
        let mut post = self.require_post(id).await?;
        post.ensure_owner(actor_id)?;

        let now = Utc::now();
        post.ensure_editable(now)?;

        let names = normalize_tag_names(&req.tags.unwrap_or_default())?;
        post.ensure_tag_capacity(&names)?;

        let additions: Vec<Tag> = names
            .into_iter()
            .filter(|n| !post.has_tag(n))
            .map(Tag::new)
            .collect();

        post.apply_edit(req.title, req.content, additions, now)?;
        let post = self
            .store
            .apply_post_edit(&post)
            .await
            .map_err(edit_conflict)?;

        tracing::info!(post_id = %post.id, tags = post.tags.len(), "post edited");
        self.view(&post).await
    }

    pub async fn delete_post(&self, actor_id: &Uuid, id: &Uuid) -> Result<(), SocialError> {
        let post = self.require_post(id).await?;
        post.ensure_owner(actor_id)?;

        self.store.delete_post(id).await?;

        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// All tags ordered by name
    pub async fn list_tags(&self) -> Result<Vec<Tag>, SocialError> {
        Ok(self.store.list_tags().await?)
    }
}
