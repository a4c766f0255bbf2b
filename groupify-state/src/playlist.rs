use serde::{Deserialize, Serialize};

use crate::{Track, TrackId, UserId, gs};

/// A playlist ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaylistId(pub String);
impl std::fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A playlist owned or followed by a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// The playlist ID
    pub id: PlaylistId,
    /// The playlist name
    pub name: String,
    /// The owner of the playlist
    pub owner_id: UserId,
    /// The total number of items in the playlist
    pub track_count: u32,
    /// The IDs of the first page of tracks
    pub track_ids: Vec<TrackId>,
}
impl From<gs::FullPlaylist> for Playlist {
    fn from(playlist: gs::FullPlaylist) -> Self {
        Playlist {
            id: PlaylistId(playlist.id),
            name: playlist.name,
            owner_id: UserId(playlist.owner.id),
            track_count: playlist.tracks.total,
            track_ids: playlist
                .tracks
                .items
                .into_iter()
                .filter_map(|item| item.track.and_then(Track::from_full))
                .map(|track| track.id)
                .collect(),
        }
    }
}
impl From<gs::SimplifiedPlaylist> for Playlist {
    fn from(playlist: gs::SimplifiedPlaylist) -> Self {
        Playlist {
            id: PlaylistId(playlist.id),
            name: playlist.name,
            owner_id: UserId(playlist.owner.id),
            track_count: playlist.tracks.total,
            track_ids: vec![],
        }
    }
}
