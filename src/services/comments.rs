//! Comments on posts

use std::sync::Arc;

use uuid::Uuid;

use super::author_summary;
use crate::core::{Entity, Owned, PageRequest, PaginatedResponse, SocialError};
use crate::entities::{Comment, CommentView, CreateComment, LikeTarget, Post};
use crate::storage::SocialStore;

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn SocialStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    async fn ensure_post(&self, post_id: &Uuid) -> Result<(), SocialError> {
        match self.store.get_post(post_id).await? {
            Some(_) => Ok(()),
            None => Err(Post::not_found(post_id)),
        }
    }

    async fn view(&self, comment: &Comment) -> Result<CommentView, SocialError> {
        let author = author_summary(self.store.as_ref(), &comment.author_id).await?;
        let likes = self
            .store
            .count_likes(&LikeTarget::Comment(comment.id))
            .await?;
        Ok(CommentView::new(comment, author, likes))
    }

    pub async fn create_comment(
        &self,
        author_id: &Uuid,
        post_id: &Uuid,
        req: CreateComment,
    ) -> Result<CommentView, SocialError> {
        self.ensure_post(post_id).await?;

        let comment = Comment::new(*author_id, *post_id, req.content);
        self.store.insert_comment(&comment).await?;

        tracing::info!(comment_id = %comment.id, post_id = %post_id, author_id = %author_id, "comment created");
        self.view(&comment).await
    }

    /// One page of the comments on a post, oldest first
    pub async fn list_comments(
        &self,
        post_id: &Uuid,
        page: PageRequest,
    ) -> Result<PaginatedResponse<CommentView>, SocialError> {
        self.ensure_post(post_id).await?;

        let page = page.paginate(self.store.list_comments(post_id).await?);
        let mut views = Vec::with_capacity(page.data.len());
        for comment in &page.data {
            views.push(self.view(comment).await?);
        }
        Ok(PaginatedResponse {
            data: views,
            pagination: page.pagination,
        })
    }

    pub async fn get_comment(&self, id: &Uuid) -> Result<CommentView, SocialError> {
        let comment = self
            .store
            .get_comment(id)
            .await?
            .ok_or_else(|| Comment::not_found(id))?;
        self.view(&comment).await
    }

    pub async fn delete_comment(&self, actor_id: &Uuid, id: &Uuid) -> Result<(), SocialError> {
        let comment = self
            .store
            .get_comment(id)
            .await?
            .ok_or_else(|| Comment::not_found(id))?;
        comment.ensure_owner(actor_id)?;

        self.store.delete_comment(id).await?;

        tracing::info!(comment_id = %id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Profile, User};
    use crate::storage::InMemoryStore;
    use axum::http::StatusCode;

    async fn setup() -> (CommentService, Uuid, Uuid, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let mut ids = Vec::new();
        for name in ["alice", "bob"] {
            let user = User::new(name, format!("{name}@example.com"), "hash");
            store
                .create_account(&user, &Profile::for_user(&user))
                .await
                .unwrap();
            ids.push(user.id);
        }
        let post = Post::new(ids[0], "t", "c", vec![]).unwrap();
        store.insert_post(&post).await.unwrap();
        (CommentService::new(store), ids[0], ids[1], post.id)
    }

    fn content(text: &str) -> CreateComment {
        CreateComment {
            content: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_comments_oldest_first() {
        let (comments, alice, bob, post_id) = setup().await;
        comments
            .create_comment(&bob, &post_id, content("first"))
            .await
            .unwrap();
        comments
            .create_comment(&alice, &post_id, content("second"))
            .await
            .unwrap();

        let listed = comments
            .list_comments(&post_id, PageRequest::default())
            .await
            .unwrap();
        let texts: Vec<&str> = listed.data.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(listed.data[0].author.username, "bob");

        let second = comments
            .list_comments(&post_id, PageRequest::new(Some(2), Some(1), 20, 100))
            .await
            .unwrap();
        assert_eq!(second.pagination.total, 2);
        assert_eq!(second.data[0].content, "second");
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let (comments, alice, _, _) = setup().await;
        let err = comments
            .create_comment(&alice, &Uuid::new_v4(), content("hi"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_requires_author() {
        let (comments, alice, bob, post_id) = setup().await;
        let comment = comments
            .create_comment(&bob, &post_id, content("mine"))
            .await
            .unwrap();

        let err = comments
            .delete_comment(&alice, &comment.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        comments.delete_comment(&bob, &comment.id).await.unwrap();
        assert!(comments.get_comment(&comment.id).await.is_err());
    }
}
