//! Profile reads with derived counts, and owner-only profile edits

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::require_user;
use crate::core::query::{PageRequest, PaginatedResponse, contains_ci};
use crate::core::{Entity, Owned, SocialError};
use crate::entities::profile::ProfileCounts;
use crate::entities::{Profile, ProfileView, UpdateProfile};
use crate::storage::SocialStore;

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn SocialStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn SocialStore>) -> Self {
        Self { store }
    }

    async fn counts(&self, user_id: &Uuid) -> Result<ProfileCounts, SocialError> {
        Ok(ProfileCounts {
            followers: self.store.count_followers(user_id).await?,
            following: self.store.count_following(user_id).await?,
            posts: self.store.count_posts_by(user_id).await?,
        })
    }

    async fn view(&self, profile: &Profile, username: &str) -> Result<ProfileView, SocialError> {
        let counts = self.counts(&profile.user_id).await?;
        Ok(ProfileView::new(profile, username, counts))
    }

    async fn require_profile(&self, id: &Uuid) -> Result<Profile, SocialError> {
        self.store
            .get_profile(id)
            .await?
            .ok_or_else(|| Profile::not_found(id))
    }

    pub async fn get_profile(&self, id: &Uuid) -> Result<ProfileView, SocialError> {
        let profile = self.require_profile(id).await?;
        let user = require_user(self.store.as_ref(), &profile.user_id).await?;
        self.view(&profile, &user.username).await
    }

    /// One page of the profiles whose name, bio or username contains `search`
    /// (case-insensitive). Counts are derived only for the returned page.
    pub async fn list_profiles(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<PaginatedResponse<ProfileView>, SocialError> {
        let usernames: HashMap<Uuid, String> = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        let mut matching = Vec::new();
        for profile in self.store.list_profiles().await? {
            let Some(username) = usernames.get(&profile.user_id) else {
                continue;
            };
            let matches = search.is_none_or(|needle| {
                contains_ci(&profile.name, needle)
                    || contains_ci(&profile.bio, needle)
                    || contains_ci(username, needle)
            });
            if matches {
                matching.push((profile, username.as_str()));
            }
        }

        let page = page.paginate(matching);
        let mut views = Vec::with_capacity(page.data.len());
        for (profile, username) in page.data {
            views.push(self.view(&profile, username).await?);
        }
        Ok(PaginatedResponse {
            data: views,
            pagination: page.pagination,
        })
    }

    pub async fn update_profile(
        &self,
        actor_id: &Uuid,
        id: &Uuid,
        changes: UpdateProfile,
    ) -> Result<ProfileView, SocialError> {
        let mut profile = self.require_profile(id).await?;
        profile.ensure_owner(actor_id)?;

        profile.apply(changes, Utc::now());
        self.store.update_profile(&profile).await?;

        tracing::info!(profile_id = %profile.id, user_id = %profile.user_id, "profile updated");

        let user = require_user(self.store.as_ref(), &profile.user_id).await?;
        self.view(&profile, &user.username).await
    }
}
