//! The seam between the core and the streaming platform.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Config, gs};

/// Which application a user authorizes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Host,
    Guest,
}
impl Role {
    const HOST_SCOPES: &[&str] = &[
        "playlist-modify-public",
        "playlist-modify-private",
        "playlist-read-private",
        "playlist-read-collaborative",
        "user-top-read",
        "user-library-read",
    ];
    const GUEST_SCOPES: &[&str] = &[
        "playlist-read-private",
        "playlist-read-collaborative",
        "user-top-read",
        "user-library-read",
    ];

    pub fn scopes(&self) -> &'static [&'static str] {
        match self {
            Role::Host => Self::HOST_SCOPES,
            Role::Guest => Self::GUEST_SCOPES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Guest => "guest",
        }
    }
}
impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An opaque handle to one user's authorized session.
pub type SessionHandle = Arc<dyn UserSession>;

/// Issues authorization URIs and turns authorization codes into sessions.
#[async_trait]
pub trait Authorizer: Send + Sync {
    fn authorize_url(&self, role: Role, state: &str) -> gs::ClientResult<String>;

    async fn exchange_code(&self, role: Role, code: &str) -> gs::ClientResult<SessionHandle>;
}

/// Everything the core asks of the platform on a user's behalf.
#[async_trait]
pub trait UserSession: Send + Sync {
    async fn current_user(&self) -> gs::ClientResult<gs::PrivateUser>;
    async fn top_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullTrack>>;
    async fn top_artists(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullArtist>>;
    async fn saved_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::SavedTrack>>;
    async fn playlists(&self, limit: u32) -> gs::ClientResult<Vec<gs::SimplifiedPlaylist>>;
    async fn playlist(&self, id: &str) -> gs::ClientResult<gs::FullPlaylist>;

    /// At most [`gs::MAX_IDS_PER_REQUEST`] ids.
    async fn several_artists(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullArtist>>;
    /// At most [`gs::MAX_IDS_PER_REQUEST`] ids.
    async fn several_tracks(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullTrack>>;
    async fn recommendations(
        &self,
        seed_track_ids: &[String],
        limit: usize,
    ) -> gs::ClientResult<Vec<gs::SimplifiedTrack>>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &gs::CreatePlaylistRequest,
    ) -> gs::ClientResult<gs::FullPlaylist>;
    /// At most [`gs::MAX_URIS_PER_REQUEST`] URIs.
    async fn add_tracks_to_playlist(&self, id: &str, uris: &[String]) -> gs::ClientResult<()>;
    async fn unfollow_playlist(&self, id: &str) -> gs::ClientResult<()>;
}

/// The real platform: one registered application per role.
pub struct SpotifyAuthorizer {
    host: gs::Client,
    guest: gs::Client,
}
impl SpotifyAuthorizer {
    pub fn new(config: &Config) -> Self {
        Self {
            host: gs::Client::new(
                &config.host.client_id,
                &config.host.client_secret,
                &config.host.redirect_uri,
            ),
            guest: gs::Client::new(
                &config.guest.client_id,
                &config.guest.client_secret,
                &config.host.redirect_uri,
            ),
        }
    }

    pub fn from_clients(host: gs::Client, guest: gs::Client) -> Self {
        Self { host, guest }
    }

    fn client(&self, role: Role) -> &gs::Client {
        match role {
            Role::Host => &self.host,
            Role::Guest => &self.guest,
        }
    }
}
#[async_trait]
impl Authorizer for SpotifyAuthorizer {
    fn authorize_url(&self, role: Role, state: &str) -> gs::ClientResult<String> {
        // Always show the dialog so a shared device can switch accounts.
        self.client(role).authorize_url(role.scopes(), state, true)
    }

    async fn exchange_code(&self, role: Role, code: &str) -> gs::ClientResult<SessionHandle> {
        let client = self.client(role);
        let token = client.exchange_code(code).await?;
        Ok(Arc::new(client.authorized(token)))
    }
}

#[async_trait]
impl UserSession for gs::UserClient {
    async fn current_user(&self) -> gs::ClientResult<gs::PrivateUser> {
        gs::UserClient::current_user(self).await
    }

    async fn top_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullTrack>> {
        gs::UserClient::top_tracks(self, gs::TimeRange::default(), limit).await
    }

    async fn top_artists(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullArtist>> {
        gs::UserClient::top_artists(self, gs::TimeRange::default(), limit).await
    }

    async fn saved_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::SavedTrack>> {
        gs::UserClient::saved_tracks(self, limit, 0).await
    }

    async fn playlists(&self, limit: u32) -> gs::ClientResult<Vec<gs::SimplifiedPlaylist>> {
        Ok(self.current_user_playlists(limit, 0).await?.items)
    }

    async fn playlist(&self, id: &str) -> gs::ClientResult<gs::FullPlaylist> {
        gs::UserClient::playlist(self, id).await
    }

    async fn several_artists(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullArtist>> {
        gs::UserClient::several_artists(self, ids).await
    }

    async fn several_tracks(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullTrack>> {
        gs::UserClient::several_tracks(self, ids).await
    }

    async fn recommendations(
        &self,
        seed_track_ids: &[String],
        limit: usize,
    ) -> gs::ClientResult<Vec<gs::SimplifiedTrack>> {
        gs::UserClient::recommendations(self, seed_track_ids, limit).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &gs::CreatePlaylistRequest,
    ) -> gs::ClientResult<gs::FullPlaylist> {
        gs::UserClient::create_playlist(self, user_id, request).await
    }

    async fn add_tracks_to_playlist(&self, id: &str, uris: &[String]) -> gs::ClientResult<()> {
        gs::UserClient::add_tracks_to_playlist(self, id, uris).await?;
        Ok(())
    }

    async fn unfollow_playlist(&self, id: &str) -> gs::ClientResult<()> {
        gs::UserClient::unfollow_playlist(self, id).await
    }
}
