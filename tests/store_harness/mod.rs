//! Shared test harness for storage backend testing
//!
//! Provides seed helpers and the `store_contract_tests!` macro, which checks
//! any [`SocialStore`] against the uniqueness, cascade, ordering and
//! conditional-edit contract the services rely on.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! store_contract_tests!(InMemoryStore::new());
//! ```

#![allow(dead_code)]

use agora::entities::{Comment, Post, Profile, User};
use agora::storage::SocialStore;
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Register `username` with a default profile
pub async fn seed_user(store: &impl SocialStore, username: &str) -> User {
    let user = User::new(username, format!("{username}@example.com"), "hash");
    store
        .create_account(&user, &Profile::for_user(&user))
        .await
        .expect("seed user");
    user
}

/// Insert a post created `minutes_ago` minutes in the past
pub async fn seed_post(store: &impl SocialStore, author: &Uuid, title: &str, minutes_ago: i64) -> Post {
    let mut post = Post::new(*author, title, "content", vec![]).expect("valid post");
    post.created_at = Utc::now() - Duration::minutes(minutes_ago);
    store.insert_post(&post).await.expect("seed post");
    post
}

pub async fn seed_comment(store: &impl SocialStore, author: &Uuid, post: &Uuid, minutes_ago: i64) -> Comment {
    let mut comment = Comment::new(*author, *post, "nice");
    comment.created_at = Utc::now() - Duration::minutes(minutes_ago);
    store.insert_comment(&comment).await.expect("seed comment");
    comment
}

/// Generate the `SocialStore` conformance suite.
///
/// `$factory` is re-evaluated for every test so each test starts empty.
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr) => {
        mod store_contract_tests {
            use super::*;
            use agora::core::StorageError;
            use agora::entities::{Follow, Like, LikeTarget, Post, Profile, Session, Tag, User};
            use agora::storage::{SocialStore, constraints};
            use chrono::{Duration, Utc};
            use uuid::Uuid;

            // ==================================================================
            // Accounts
            // ==================================================================

            #[tokio::test]
            async fn test_create_account_creates_one_profile() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;

                let found = store.get_user(&user.id).await.unwrap().unwrap();
                assert_eq!(found.username, "alice");
                assert_eq!(found.email, "alice@example.com");

                let profile = store.get_profile_by_user(&user.id).await.unwrap().unwrap();
                assert_eq!(profile.user_id, user.id);
                assert_eq!(store.list_profiles().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_duplicate_username_conflicts() {
                let store = $factory;
                seed_user(&store, "alice").await;

                let dup = User::new("alice", "other@example.com", "hash");
                let err = store
                    .create_account(&dup, &Profile::for_user(&dup))
                    .await
                    .unwrap_err();
                assert!(err.is_conflict_on(constraints::USERNAME), "got {err:?}");
                assert!(store.get_profile_by_user(&dup.id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_duplicate_email_conflicts() {
                let store = $factory;
                seed_user(&store, "alice").await;

                let dup = User::new("bob", "alice@example.com", "hash");
                let err = store
                    .create_account(&dup, &Profile::for_user(&dup))
                    .await
                    .unwrap_err();
                assert!(err.is_conflict_on(constraints::EMAIL), "got {err:?}");
            }

            #[tokio::test]
            async fn test_find_user_by_username() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;

                let found = store.find_user_by_username("alice").await.unwrap().unwrap();
                assert_eq!(found.id, user.id);
                assert!(store.find_user_by_username("nobody").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_update_user_rename_conflict() {
                let store = $factory;
                seed_user(&store, "alice").await;
                let mut bob = seed_user(&store, "bob").await;

                bob.username = "alice".to_string();
                let err = store.update_user(&bob).await.unwrap_err();
                assert!(err.is_conflict_on(constraints::USERNAME), "got {err:?}");

                bob.username = "robert".to_string();
                store.update_user(&bob).await.unwrap();
                let found = store.get_user(&bob.id).await.unwrap().unwrap();
                assert_eq!(found.username, "robert");
            }

            #[tokio::test]
            async fn test_update_profile() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;
                let mut profile = store.get_profile_by_user(&user.id).await.unwrap().unwrap();

                profile.name = "Alice".to_string();
                profile.bio = "hello".to_string();
                store.update_profile(&profile).await.unwrap();

                let found = store.get_profile(&profile.id).await.unwrap().unwrap();
                assert_eq!(found.name, "Alice");
                assert_eq!(found.bio, "hello");
            }

            // ==================================================================
            // Sessions
            // ==================================================================

            #[tokio::test]
            async fn test_session_lifecycle() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;
                let session = Session::open(user.id, Duration::hours(1));

                store.create_session(&session).await.unwrap();
                let found = store.get_session(&session.token).await.unwrap().unwrap();
                assert_eq!(found.user_id, user.id);

                assert!(store.delete_session(&session.token).await.unwrap());
                assert!(!store.delete_session(&session.token).await.unwrap());
                assert!(store.get_session(&session.token).await.unwrap().is_none());
            }

            // ==================================================================
            // Follow graph
            // ==================================================================

            #[tokio::test]
            async fn test_follow_pair_is_unique() {
                let store = $factory;
                let a = seed_user(&store, "a").await;
                let b = seed_user(&store, "b").await;

                store.insert_follow(&Follow::new(a.id, b.id).unwrap()).await.unwrap();
                let err = store
                    .insert_follow(&Follow::new(a.id, b.id).unwrap())
                    .await
                    .unwrap_err();
                assert!(err.is_conflict_on(constraints::FOLLOW_PAIR), "got {err:?}");

                // the reverse direction is a different edge
                store.insert_follow(&Follow::new(b.id, a.id).unwrap()).await.unwrap();

                assert_eq!(store.count_followers(&b.id).await.unwrap(), 1);
                assert_eq!(store.count_following(&b.id).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_follow_unknown_user_is_not_found() {
                let store = $factory;
                let a = seed_user(&store, "a").await;

                let err = store
                    .insert_follow(&Follow::new(a.id, Uuid::new_v4()).unwrap())
                    .await
                    .unwrap_err();
                assert!(matches!(err, StorageError::NotFound { .. }), "got {err:?}");
            }

            #[tokio::test]
            async fn test_delete_follow() {
                let store = $factory;
                let a = seed_user(&store, "a").await;
                let b = seed_user(&store, "b").await;

                assert!(!store.delete_follow(&a.id, &b.id).await.unwrap());
                store.insert_follow(&Follow::new(a.id, b.id).unwrap()).await.unwrap();
                assert!(store.find_follow(&a.id, &b.id).await.unwrap().is_some());
                assert!(store.delete_follow(&a.id, &b.id).await.unwrap());
                assert!(store.find_follow(&a.id, &b.id).await.unwrap().is_none());
            }

            // ==================================================================
            // Tags and posts
            // ==================================================================

            #[tokio::test]
            async fn test_post_tags_reuse_rows() {
                let store = $factory;
                let author = seed_user(&store, "alice").await;

                let first = Post::new(author.id, "one", "content", vec![Tag::new("rust"), Tag::new("async")]).unwrap();
                let first = store.insert_post(&first).await.unwrap();
                let second = Post::new(author.id, "two", "content", vec![Tag::new("async"), Tag::new("web")]).unwrap();
                let second = store.insert_post(&second).await.unwrap();

                assert_eq!(first.tags[1].id, second.tags[0].id);
                assert_eq!(second.tags[0].name, "async");

                let found = store.get_post(&second.id).await.unwrap().unwrap();
                assert_eq!(found.tags, second.tags);

                let names: Vec<String> = store
                    .list_tags()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                assert_eq!(names, vec!["async", "rust", "web"]);
            }

            #[tokio::test]
            async fn test_posts_newest_first_with_tags() {
                let store = $factory;
                let author = seed_user(&store, "alice").await;
                seed_post(&store, &author.id, "old", 30).await;
                seed_post(&store, &author.id, "mid", 20).await;

                let mut post = Post::new(author.id, "new", "content", vec![Tag::new("rust")]).unwrap();
                post.created_at = Utc::now() - Duration::minutes(10);
                store.insert_post(&post).await.unwrap();

                let titles: Vec<String> = store
                    .list_posts()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|p| p.title)
                    .collect();
                assert_eq!(titles, vec!["new", "mid", "old"]);

                let found = store.get_post(&post.id).await.unwrap().unwrap();
                assert!(found.has_tag("rust"));
                assert!(!found.edited);
                assert_eq!(store.count_posts_by(&author.id).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_post_edit_applies_once() {
                let store = $factory;
                let author = seed_user(&store, "alice").await;
                let post = seed_post(&store, &author.id, "draft", 1).await;

                let mut edited = post.clone();
                edited
                    .apply_edit(Some("final".to_string()), None, vec![Tag::new("late")], Utc::now())
                    .unwrap();
                store.apply_post_edit(&edited).await.unwrap();

                let found = store.get_post(&post.id).await.unwrap().unwrap();
                assert_eq!(found.title, "final");
                assert!(found.edited);
                assert!(found.has_tag("late"));

                // a second edit built from the stale copy is refused by the store
                let mut again = post.clone();
                again
                    .apply_edit(Some("again".to_string()), None, vec![Tag::new("stray")], Utc::now())
                    .unwrap();
                let err = store.apply_post_edit(&again).await.unwrap_err();
                assert!(
                    err.is_conflict_on(constraints::POST_ALREADY_EDITED),
                    "got {err:?}"
                );
                let found = store.get_post(&post.id).await.unwrap().unwrap();
                assert_eq!(found.title, "final");
                let names: Vec<String> = store
                    .list_tags()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.name)
                    .collect();
                assert_eq!(names, vec!["late"]);
            }

            #[tokio::test]
            async fn test_edit_missing_post_is_not_found() {
                let store = $factory;
                let author = seed_user(&store, "alice").await;
                let post = Post::new(author.id, "ghost", "content", vec![]).unwrap();

                let err = store.apply_post_edit(&post).await.unwrap_err();
                assert!(matches!(err, StorageError::NotFound { .. }), "got {err:?}");
            }

            // ==================================================================
            // Comments and likes
            // ==================================================================

            #[tokio::test]
            async fn test_comments_oldest_first() {
                let store = $factory;
                let author = seed_user(&store, "alice").await;
                let post = seed_post(&store, &author.id, "p", 60).await;
                let second = seed_comment(&store, &author.id, &post.id, 5).await;
                let first = seed_comment(&store, &author.id, &post.id, 10).await;

                let ids: Vec<Uuid> = store
                    .list_comments(&post.id)
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|c| c.id)
                    .collect();
                assert_eq!(ids, vec![first.id, second.id]);
                assert_eq!(store.count_comments(&post.id).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_like_pair_is_unique_per_target_kind() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;
                let post = seed_post(&store, &user.id, "p", 5).await;
                let comment = seed_comment(&store, &user.id, &post.id, 1).await;

                let on_post = LikeTarget::Post(post.id);
                let on_comment = LikeTarget::Comment(comment.id);

                store.insert_like(&Like::new(user.id, on_post)).await.unwrap();
                let err = store
                    .insert_like(&Like::new(user.id, on_post))
                    .await
                    .unwrap_err();
                assert!(err.is_conflict_on(constraints::POST_LIKE_PAIR), "got {err:?}");

                store.insert_like(&Like::new(user.id, on_comment)).await.unwrap();
                let err = store
                    .insert_like(&Like::new(user.id, on_comment))
                    .await
                    .unwrap_err();
                assert!(
                    err.is_conflict_on(constraints::COMMENT_LIKE_PAIR),
                    "got {err:?}"
                );

                assert_eq!(store.count_likes(&on_post).await.unwrap(), 1);
                assert_eq!(store.count_likes(&on_comment).await.unwrap(), 1);
                assert!(store.find_like(&user.id, &on_post).await.unwrap().is_some());

                assert!(store.delete_like(&user.id, &on_post).await.unwrap());
                assert!(!store.delete_like(&user.id, &on_post).await.unwrap());
                assert_eq!(store.count_likes(&on_comment).await.unwrap(), 1);
            }

            // ==================================================================
            // Cascades
            // ==================================================================

            #[tokio::test]
            async fn test_delete_post_cascades() {
                let store = $factory;
                let user = seed_user(&store, "alice").await;
                let post = seed_post(&store, &user.id, "p", 5).await;
                let comment = seed_comment(&store, &user.id, &post.id, 1).await;
                store
                    .insert_like(&Like::new(user.id, LikeTarget::Post(post.id)))
                    .await
                    .unwrap();
                store
                    .insert_like(&Like::new(user.id, LikeTarget::Comment(comment.id)))
                    .await
                    .unwrap();

                store.delete_post(&post.id).await.unwrap();

                assert!(store.get_post(&post.id).await.unwrap().is_none());
                assert!(store.get_comment(&comment.id).await.unwrap().is_none());
                assert_eq!(
                    store
                        .count_likes(&LikeTarget::Comment(comment.id))
                        .await
                        .unwrap(),
                    0
                );
            }

            #[tokio::test]
            async fn test_delete_user_cascades() {
                let store = $factory;
                let alice = seed_user(&store, "alice").await;
                let bob = seed_user(&store, "bob").await;

                store.insert_follow(&Follow::new(alice.id, bob.id).unwrap()).await.unwrap();
                store.insert_follow(&Follow::new(bob.id, alice.id).unwrap()).await.unwrap();
                let alice_post = seed_post(&store, &alice.id, "mine", 5).await;
                let bob_post = seed_post(&store, &bob.id, "theirs", 5).await;
                let comment = seed_comment(&store, &alice.id, &bob_post.id, 1).await;
                store
                    .insert_like(&Like::new(alice.id, LikeTarget::Post(bob_post.id)))
                    .await
                    .unwrap();
                let session = Session::open(alice.id, Duration::hours(1));
                store.create_session(&session).await.unwrap();

                store.delete_user(&alice.id).await.unwrap();

                assert!(store.get_user(&alice.id).await.unwrap().is_none());
                assert!(store.get_profile_by_user(&alice.id).await.unwrap().is_none());
                assert!(store.get_post(&alice_post.id).await.unwrap().is_none());
                assert!(store.get_comment(&comment.id).await.unwrap().is_none());
                assert!(store.get_session(&session.token).await.unwrap().is_none());
                assert_eq!(store.count_followers(&bob.id).await.unwrap(), 0);
                assert_eq!(store.count_following(&bob.id).await.unwrap(), 0);
                assert_eq!(
                    store
                        .count_likes(&LikeTarget::Post(bob_post.id))
                        .await
                        .unwrap(),
                    0
                );

                // bob's own data survives
                assert!(store.get_post(&bob_post.id).await.unwrap().is_some());
                assert_eq!(store.list_users().await.unwrap().len(), 1);
            }
        }
    };
}
