use serde::{Deserialize, Serialize};

use crate::{ClientResult, MAX_IDS_PER_REQUEST, UserClient, check_item_count};

/// An artist as credited on a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedArtist {
    /// The id of the artist. Absent for local files.
    #[serde(default)]
    pub id: Option<String>,
    /// The name of the artist.
    pub name: String,
}

/// An artist with full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullArtist {
    /// The id of the artist.
    pub id: String,
    /// The name of the artist.
    pub name: String,
    /// The genres the artist is associated with.
    #[serde(default)]
    pub genres: Vec<String>,
    /// The popularity of the artist, between 0 and 100.
    #[serde(default)]
    pub popularity: Option<u32>,
    /// The Spotify URI of the artist.
    #[serde(default)]
    pub uri: String,
}

/// Artist-related endpoints.
impl UserClient {
    /// Get several artists by id.
    ///
    /// At most [`MAX_IDS_PER_REQUEST`] ids can be requested at once. Unknown
    /// ids are skipped.
    pub async fn several_artists(&self, ids: &[String]) -> ClientResult<Vec<FullArtist>> {
        check_item_count(MAX_IDS_PER_REQUEST, ids.len())?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        #[derive(Deserialize)]
        struct SeveralArtistsResponse {
            artists: Vec<Option<FullArtist>>,
        }

        Ok(self
            .get::<SeveralArtistsResponse>("artists", &[("ids", ids.join(","))])
            .await?
            .artists
            .into_iter()
            .flatten()
            .collect())
    }
}
