#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use groupify_core::{Authorizer, Config, Groupify, Role, SessionHandle, UserSession, gs};

/// Everything the fake platform was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AuthorizeUrl { role: Role, state: String },
    Exchange { role: Role, code: String },
    CurrentUser(String),
    Playlists(String),
    Playlist(String),
    SeveralArtists(Vec<String>),
    SeveralTracks(Vec<String>),
    Recommendations { seeds: Vec<String>, limit: usize },
    CreatePlaylist { user_id: String, name: String, description: String },
    AddTracks { playlist_id: String, uris: Vec<String> },
    Unfollow(String),
}

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: String,
    pub display_name: Option<String>,
    pub top_tracks: Vec<gs::FullTrack>,
    pub top_artists: Vec<gs::FullArtist>,
    pub saved_tracks: Vec<gs::FullTrack>,
    pub playlists: Vec<gs::SimplifiedPlaylist>,
    pub fail_top_tracks: bool,
    pub fail_playlists: bool,
}
impl FakeUser {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: Some(capitalize(id)),
            top_tracks: vec![],
            top_artists: vec![],
            saved_tracks: vec![],
            playlists: vec![],
            fail_top_tracks: false,
            fail_playlists: false,
        }
    }

    pub fn top_tracks(mut self, tracks: impl IntoIterator<Item = gs::FullTrack>) -> Self {
        self.top_tracks = tracks.into_iter().collect();
        self
    }

    pub fn top_artists(mut self, artists: impl IntoIterator<Item = gs::FullArtist>) -> Self {
        self.top_artists = artists.into_iter().collect();
        self
    }

    pub fn playlists(mut self, playlists: impl IntoIterator<Item = gs::SimplifiedPlaylist>) -> Self {
        self.playlists = playlists.into_iter().collect();
        self
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn track(id: &str, artists: &[&str]) -> gs::FullTrack {
    gs::FullTrack {
        id: Some(id.to_string()),
        name: format!("Track {id}"),
        uri: format!("spotify:track:{id}"),
        artists: artists
            .iter()
            .map(|a| gs::SimplifiedArtist {
                id: Some(a.to_string()),
                name: format!("Artist {a}"),
            })
            .collect(),
        duration_ms: 180_000,
        popularity: None,
        is_local: false,
        external_urls: gs::ExternalUrls::default(),
    }
}

pub fn artist(id: &str, genres: &[&str]) -> gs::FullArtist {
    gs::FullArtist {
        id: id.to_string(),
        name: format!("Artist {id}"),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        popularity: None,
        uri: format!("spotify:artist:{id}"),
    }
}

pub fn simplified_playlist(id: &str, name: &str, owner: &str) -> gs::SimplifiedPlaylist {
    gs::SimplifiedPlaylist {
        id: id.to_string(),
        name: name.to_string(),
        owner: gs::PublicUser {
            id: owner.to_string(),
            display_name: None,
        },
        tracks: gs::PlaylistItemsRef { total: 0 },
        uri: format!("spotify:playlist:{id}"),
    }
}

/// Pull the state token back out of an authorization URI issued by [`FakeSpotify`].
pub fn state_of(uri: &str) -> String {
    uri.split_once("state=")
        .map(|(_, state)| state.to_string())
        .unwrap_or_default()
}

#[derive(Default)]
struct Shared {
    calls: Mutex<Vec<Call>>,
    users_by_code: Mutex<HashMap<String, FakeUser>>,
    catalog_artists: Mutex<HashMap<String, gs::FullArtist>>,
    catalog_tracks: Mutex<HashMap<String, gs::FullTrack>>,
    recommendations: Mutex<Vec<gs::FullTrack>>,
    exchange_failures: AtomicUsize,
    exchange_delay: Mutex<Option<Duration>>,
    fail_add_at: Mutex<Option<usize>>,
    add_calls: AtomicUsize,
    created_playlists: AtomicUsize,
}

/// An in-memory stand-in for the streaming platform that records every call.
#[derive(Clone, Default)]
pub struct FakeSpotify {
    shared: Arc<Shared>,
}
impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groupify(&self, config: Config) -> Groupify {
        Groupify::with_authorizer(config, Arc::new(self.clone()))
    }

    /// Make `code` exchange into a session for `user`.
    pub fn add_user(&self, code: &str, user: FakeUser) {
        self.shared
            .users_by_code
            .lock()
            .unwrap()
            .insert(code.to_string(), user);
    }

    pub fn add_catalog_artist(&self, artist: gs::FullArtist) {
        self.shared
            .catalog_artists
            .lock()
            .unwrap()
            .insert(artist.id.clone(), artist);
    }

    pub fn add_catalog_track(&self, track: gs::FullTrack) {
        let id = track.id.clone().unwrap();
        self.shared
            .catalog_tracks
            .lock()
            .unwrap()
            .insert(id, track);
    }

    /// Recommendations are served from here and resolvable through the catalog.
    pub fn set_recommendations(&self, tracks: Vec<gs::FullTrack>) {
        for track in &tracks {
            self.add_catalog_track(track.clone());
        }
        *self.shared.recommendations.lock().unwrap() = tracks;
    }

    pub fn fail_next_exchanges(&self, count: usize) {
        self.shared.exchange_failures.store(count, Ordering::SeqCst);
    }

    pub fn set_exchange_delay(&self, delay: Duration) {
        *self.shared.exchange_delay.lock().unwrap() = Some(delay);
    }

    /// Fail the `index`th (zero-based) append call.
    pub fn fail_add_at(&self, index: usize) {
        *self.shared.fail_add_at.lock().unwrap() = Some(index);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.shared.calls.lock().unwrap().clear();
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| f(c)).count()
    }

    pub fn appended(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AddTracks { uris, .. } => Some(uris),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.shared.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Authorizer for FakeSpotify {
    fn authorize_url(&self, role: Role, state: &str) -> gs::ClientResult<String> {
        self.record(Call::AuthorizeUrl {
            role,
            state: state.to_string(),
        });
        Ok(format!("https://accounts.fake/authorize?role={role}&state={state}"))
    }

    async fn exchange_code(&self, role: Role, code: &str) -> gs::ClientResult<SessionHandle> {
        self.record(Call::Exchange {
            role,
            code: code.to_string(),
        });
        let delay = *self.shared.exchange_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failures = &self.shared.exchange_failures;
        if failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(gs::ClientError::AuthError {
                error: "server_error".to_string(),
                description: None,
            });
        }

        let user = self.shared.users_by_code.lock().unwrap().get(code).cloned();
        match user {
            Some(user) => Ok(Arc::new(FakeSession {
                user,
                platform: self.clone(),
            })),
            None => Err(gs::ClientError::AuthError {
                error: "invalid_grant".to_string(),
                description: Some("Invalid authorization code".to_string()),
            }),
        }
    }
}

struct FakeSession {
    user: FakeUser,
    platform: FakeSpotify,
}
impl FakeSession {
    fn shared(&self) -> &Shared {
        &self.platform.shared
    }
}

fn unavailable() -> gs::ClientError {
    gs::ClientError::SpotifyError {
        status: 503,
        message: Some("Service unavailable".to_string()),
    }
}

#[async_trait]
impl UserSession for FakeSession {
    async fn current_user(&self) -> gs::ClientResult<gs::PrivateUser> {
        self.platform.record(Call::CurrentUser(self.user.id.clone()));
        Ok(gs::PrivateUser {
            id: self.user.id.clone(),
            display_name: self.user.display_name.clone(),
            uri: format!("spotify:user:{}", self.user.id),
            country: None,
            product: None,
            external_urls: gs::ExternalUrls::default(),
        })
    }

    async fn top_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullTrack>> {
        if self.user.fail_top_tracks {
            return Err(unavailable());
        }
        Ok(self.user.top_tracks.iter().take(limit as usize).cloned().collect())
    }

    async fn top_artists(&self, limit: u32) -> gs::ClientResult<Vec<gs::FullArtist>> {
        Ok(self.user.top_artists.iter().take(limit as usize).cloned().collect())
    }

    async fn saved_tracks(&self, limit: u32) -> gs::ClientResult<Vec<gs::SavedTrack>> {
        Ok(self
            .user
            .saved_tracks
            .iter()
            .take(limit as usize)
            .map(|track| gs::SavedTrack {
                added_at: "2024-01-01T00:00:00Z".to_string(),
                track: track.clone(),
            })
            .collect())
    }

    async fn playlists(&self, limit: u32) -> gs::ClientResult<Vec<gs::SimplifiedPlaylist>> {
        self.platform.record(Call::Playlists(self.user.id.clone()));
        if self.user.fail_playlists {
            return Err(unavailable());
        }
        Ok(self.user.playlists.iter().take(limit as usize).cloned().collect())
    }

    async fn playlist(&self, id: &str) -> gs::ClientResult<gs::FullPlaylist> {
        self.platform.record(Call::Playlist(id.to_string()));
        let playlist = self
            .user
            .playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| gs::ClientError::SpotifyError {
                status: 404,
                message: Some("Not found".to_string()),
            })?;
        Ok(gs::FullPlaylist {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: None,
            owner: playlist.owner.clone(),
            uri: playlist.uri.clone(),
            external_urls: gs::ExternalUrls::default(),
            tracks: gs::Paging::default(),
        })
    }

    async fn several_artists(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullArtist>> {
        assert!(ids.len() <= gs::MAX_IDS_PER_REQUEST);
        self.platform.record(Call::SeveralArtists(ids.to_vec()));
        let catalog = self.shared().catalog_artists.lock().unwrap();
        Ok(ids.iter().filter_map(|id| catalog.get(id).cloned()).collect())
    }

    async fn several_tracks(&self, ids: &[String]) -> gs::ClientResult<Vec<gs::FullTrack>> {
        assert!(ids.len() <= gs::MAX_IDS_PER_REQUEST);
        self.platform.record(Call::SeveralTracks(ids.to_vec()));
        let catalog = self.shared().catalog_tracks.lock().unwrap();
        Ok(ids.iter().filter_map(|id| catalog.get(id).cloned()).collect())
    }

    async fn recommendations(
        &self,
        seed_track_ids: &[String],
        limit: usize,
    ) -> gs::ClientResult<Vec<gs::SimplifiedTrack>> {
        assert!(seed_track_ids.len() <= gs::MAX_SEED_TRACKS);
        assert!(limit <= gs::MAX_RECOMMENDATIONS);
        self.platform.record(Call::Recommendations {
            seeds: seed_track_ids.to_vec(),
            limit,
        });
        Ok(self
            .shared()
            .recommendations
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .map(|t| gs::SimplifiedTrack {
                id: t.id.clone(),
                name: t.name.clone(),
                uri: t.uri.clone(),
                artists: t.artists.clone(),
            })
            .collect())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &gs::CreatePlaylistRequest,
    ) -> gs::ClientResult<gs::FullPlaylist> {
        self.platform.record(Call::CreatePlaylist {
            user_id: user_id.to_string(),
            name: request.name.clone(),
            description: request.description.clone(),
        });
        let n = self.shared().created_playlists.fetch_add(1, Ordering::SeqCst);
        let id = format!("playlist{n}");
        Ok(gs::FullPlaylist {
            uri: format!("spotify:playlist:{id}"),
            external_urls: gs::ExternalUrls {
                spotify: Some(format!("https://open.spotify.com/playlist/{id}")),
            },
            id,
            name: request.name.clone(),
            description: Some(request.description.clone()),
            owner: gs::PublicUser {
                id: user_id.to_string(),
                display_name: None,
            },
            tracks: gs::Paging::default(),
        })
    }

    async fn add_tracks_to_playlist(&self, id: &str, uris: &[String]) -> gs::ClientResult<()> {
        assert!(uris.len() <= gs::MAX_URIS_PER_REQUEST);
        self.platform.record(Call::AddTracks {
            playlist_id: id.to_string(),
            uris: uris.to_vec(),
        });
        let index = self.shared().add_calls.fetch_add(1, Ordering::SeqCst);
        if *self.shared().fail_add_at.lock().unwrap() == Some(index) {
            return Err(unavailable());
        }
        Ok(())
    }

    async fn unfollow_playlist(&self, id: &str) -> gs::ClientResult<()> {
        self.platform.record(Call::Unfollow(id.to_string()));
        Ok(())
    }
}

/// A config with working credentials and an unlimited party size.
pub fn config() -> Config {
    let mut config = Config::default();
    config.host.client_id = "host-id".to_string();
    config.host.client_secret = "host-secret".to_string();
    config.guest.client_id = "guest-id".to_string();
    config.guest.client_secret = "guest-secret".to_string();
    config
}

/// Run a host through the whole authorization flow and return the party id.
pub async fn host_party(
    spotify: &FakeSpotify,
    groupify: &Groupify,
    code: &str,
    user: FakeUser,
) -> groupify_core::PartyId {
    spotify.add_user(code, user);
    let auth = groupify.begin_host_auth().unwrap();
    groupify
        .on_callback(code, &state_of(&auth.uri))
        .await
        .unwrap();
    auth.party_id
}

/// Run a guest through the whole authorization flow.
pub async fn join_party(
    spotify: &FakeSpotify,
    groupify: &Groupify,
    party_id: &groupify_core::PartyId,
    code: &str,
    user: FakeUser,
) {
    spotify.add_user(code, user);
    let uri = groupify.begin_guest_auth(party_id).unwrap();
    groupify.on_callback(code, &state_of(&uri)).await.unwrap();
}
