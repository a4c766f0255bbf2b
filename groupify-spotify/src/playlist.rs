use serde::{Deserialize, Serialize};

use crate::{
    ClientResult, ExternalUrls, FullTrack, MAX_URIS_PER_REQUEST, Paging, PublicUser, UserClient,
    check_item_count,
};

/// A reference to the items of a playlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistItemsRef {
    /// The number of items in the playlist.
    #[serde(default)]
    pub total: u32,
}

/// A playlist without its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    /// The id of the playlist.
    pub id: String,
    /// The name of the playlist.
    pub name: String,
    /// The user who owns the playlist.
    pub owner: PublicUser,
    /// Where to find the items of the playlist.
    #[serde(default)]
    pub tracks: PlaylistItemsRef,
    /// The Spotify URI of the playlist.
    #[serde(default)]
    pub uri: String,
}

/// An item in a playlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    /// The track. Absent if it is no longer available.
    #[serde(default)]
    pub track: Option<FullTrack>,
}

/// A playlist with full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullPlaylist {
    /// The id of the playlist.
    pub id: String,
    /// The name of the playlist.
    pub name: String,
    /// The playlist description.
    #[serde(default)]
    pub description: Option<String>,
    /// The user who owns the playlist.
    pub owner: PublicUser,
    /// The Spotify URI of the playlist.
    #[serde(default)]
    pub uri: String,
    /// Known external URLs for the playlist.
    #[serde(default)]
    pub external_urls: ExternalUrls,
    /// The first page of the playlist's items.
    #[serde(default)]
    pub tracks: Paging<PlaylistItem>,
}

/// A request to create a playlist.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    /// The name of the new playlist.
    pub name: String,
    /// The description of the new playlist.
    pub description: String,
    /// Whether the playlist is shown on the user's profile.
    pub public: bool,
    /// Whether other users can modify the playlist.
    pub collaborative: bool,
}

/// The version identifier of a playlist after a modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotId {
    /// The snapshot id.
    pub snapshot_id: String,
}

/// Playlist-related endpoints.
impl UserClient {
    /// Get a page of the current user's playlists.
    ///
    /// Limit has a maximum of 50.
    pub async fn current_user_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> ClientResult<Paging<SimplifiedPlaylist>> {
        self.get(
            "me/playlists",
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    /// Get a playlist with the first page of its items.
    pub async fn playlist(&self, id: &str) -> ClientResult<FullPlaylist> {
        self.get(&format!("playlists/{id}"), &[]).await
    }

    /// Create a playlist owned by `user_id`.
    pub async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> ClientResult<FullPlaylist> {
        self.post(&format!("users/{user_id}/playlists"), request)
            .await
    }

    /// Append items to a playlist.
    ///
    /// At most [`MAX_URIS_PER_REQUEST`] URIs can be added at once.
    pub async fn add_tracks_to_playlist(
        &self,
        id: &str,
        uris: &[String],
    ) -> ClientResult<SnapshotId> {
        check_item_count(MAX_URIS_PER_REQUEST, uris.len())?;

        #[derive(Serialize)]
        struct AddTracksRequest<'a> {
            uris: &'a [String],
        }

        self.post(&format!("playlists/{id}/tracks"), &AddTracksRequest { uris })
            .await
    }

    /// Remove a playlist from the current user's library.
    pub async fn unfollow_playlist(&self, id: &str) -> ClientResult<()> {
        self.delete(&format!("playlists/{id}/followers")).await
    }
}
