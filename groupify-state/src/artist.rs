use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::gs;

/// An artist ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtistId(pub String);
impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An artist as credited on a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCredit {
    /// The artist ID, absent for local files
    pub id: Option<ArtistId>,
    /// The artist name
    pub name: String,
}
impl From<gs::SimplifiedArtist> for ArtistCredit {
    fn from(artist: gs::SimplifiedArtist) -> Self {
        ArtistCredit {
            id: artist.id.map(ArtistId),
            name: artist.name,
        }
    }
}

/// An artist, as `groupify` cares about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    /// The artist ID
    pub id: ArtistId,
    /// The artist name
    pub name: String,
    /// The genres the artist is tagged with
    pub genres: Vec<String>,
}
impl From<gs::FullArtist> for Artist {
    fn from(artist: gs::FullArtist) -> Self {
        Artist {
            id: ArtistId(artist.id),
            name: artist.name,
            genres: artist.genres,
        }
    }
}

/// Rank the genres carried by `artists`, most frequent first.
///
/// Ties are broken alphabetically so the ranking is stable across runs.
pub fn rank_genres(artists: &[Artist]) -> Vec<String> {
    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for genre in artists.iter().flat_map(|a| &a.genres) {
        *occurrences.entry(genre.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = occurrences.into_iter().collect();
    ranked.sort_by(|(a_genre, a_count), (b_genre, b_count)| {
        b_count.cmp(a_count).then_with(|| a_genre.cmp(b_genre))
    });
    ranked
        .into_iter()
        .map(|(genre, _)| genre.to_string())
        .collect()
}
