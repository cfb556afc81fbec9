//! Typed lookups, likes and follows.

use crate::client::{fetch, ApiClient};
use crate::credentials::CredentialStore;
use crate::error::{ClientError, Result};
use crate::types::ApiRequest;
use soundbyte_core::{Playlist, ServiceType, Track, User};
use tracing::{debug, info};

/// Resource helpers for SoundCloud.
///
/// Works against any [`ApiClient`], so the same helpers serve the real
/// client and test fakes.
pub struct Resources<'a> {
    api: &'a dyn ApiClient,
    credentials: &'a CredentialStore,
}

impl<'a> Resources<'a> {
    pub fn new(api: &'a dyn ApiClient, credentials: &'a CredentialStore) -> Self {
        Self { api, credentials }
    }

    fn require_login(&self) -> Result<()> {
        if self.credentials.is_connected(ServiceType::SoundCloud) {
            Ok(())
        } else {
            Err(ClientError::AuthRequired(ServiceType::SoundCloud))
        }
    }

    /// Get a single track by ID.
    pub async fn get_track(&self, track_id: &str) -> Result<Track> {
        debug!(track_id = %track_id, "Fetching track");
        fetch(self.api, &ApiRequest::soundcloud(format!("/tracks/{}", track_id))).await
    }

    /// Get a user profile by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        debug!(user_id = %user_id, "Fetching user");
        fetch(self.api, &ApiRequest::soundcloud(format!("/users/{}", user_id))).await
    }

    /// Get the signed-in user's profile.
    pub async fn get_me(&self) -> Result<User> {
        self.require_login()?;
        fetch(self.api, &ApiRequest::soundcloud("/me")).await
    }

    /// Get a playlist with its tracks embedded.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        debug!(playlist_id = %playlist_id, "Fetching playlist");
        let playlist: Playlist = fetch(
            self.api,
            &ApiRequest::soundcloud(format!("/playlists/{}", playlist_id)),
        )
        .await?;

        debug!(
            playlist_id = %playlist_id,
            tracks = playlist.tracks.len(),
            "Fetched playlist"
        );
        Ok(playlist)
    }

    pub async fn like_track(&self, track_id: &str) -> Result<bool> {
        self.require_login()?;
        let liked = self
            .api
            .put(&ApiRequest::soundcloud(format!("/me/favorites/{}", track_id)), None)
            .await?;
        if liked {
            info!(track_id = %track_id, "Track liked");
        }
        Ok(liked)
    }

    pub async fn unlike_track(&self, track_id: &str) -> Result<bool> {
        self.require_login()?;
        self.api
            .delete(&ApiRequest::soundcloud(format!("/me/favorites/{}", track_id)))
            .await
    }

    pub async fn is_track_liked(&self, track_id: &str) -> Result<bool> {
        self.require_login()?;
        self.api
            .exists(&ApiRequest::soundcloud(format!("/me/favorites/{}", track_id)))
            .await
    }

    pub async fn follow_user(&self, user_id: &str) -> Result<bool> {
        self.require_login()?;
        let followed = self
            .api
            .put(&ApiRequest::soundcloud(format!("/me/followings/{}", user_id)), None)
            .await?;
        if followed {
            info!(user_id = %user_id, "User followed");
        }
        Ok(followed)
    }

    pub async fn unfollow_user(&self, user_id: &str) -> Result<bool> {
        self.require_login()?;
        self.api
            .delete(&ApiRequest::soundcloud(format!("/me/followings/{}", user_id)))
            .await
    }

    pub async fn is_following(&self, user_id: &str) -> Result<bool> {
        self.require_login()?;
        self.api
            .exists(&ApiRequest::soundcloud(format!("/me/followings/{}", user_id)))
            .await
    }
}
