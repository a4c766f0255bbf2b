use serde::{Deserialize, Serialize};

use crate::{ArtistCredit, ArtistId, gs};

/// A track ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub String);
impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A track, as `groupify` cares about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// The track ID
    pub id: TrackId,
    /// The Spotify URI, used when adding the track to a playlist
    pub uri: String,
    /// The track name
    pub name: String,
    /// The credited artists, main artist first
    pub artists: Vec<ArtistCredit>,
}
impl Track {
    /// Convert a full track. Returns `None` for tracks without an ID (local files).
    pub fn from_full(track: gs::FullTrack) -> Option<Self> {
        Some(Track {
            id: TrackId(track.id?),
            uri: track.uri,
            name: track.name,
            artists: track.artists.into_iter().map(ArtistCredit::from).collect(),
        })
    }

    /// The IDs of the credited artists that have one.
    pub fn artist_ids(&self) -> impl Iterator<Item = &ArtistId> {
        self.artists.iter().filter_map(|a| a.id.as_ref())
    }
}
