use serde::{Deserialize, Serialize};

use crate::{
    ClientResult, ExternalUrls, MAX_IDS_PER_REQUEST, MAX_RECOMMENDATIONS, MAX_SEED_TRACKS, Paging,
    SimplifiedArtist, UserClient, check_item_count,
};

/// A track with full details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTrack {
    /// The id of the track. Absent for local files.
    #[serde(default)]
    pub id: Option<String>,
    /// The name of the track.
    pub name: String,
    /// The Spotify URI of the track.
    pub uri: String,
    /// The artists who performed the track.
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    /// The track length in milliseconds.
    #[serde(default)]
    pub duration_ms: u32,
    /// The popularity of the track, between 0 and 100.
    #[serde(default)]
    pub popularity: Option<u32>,
    /// Whether the track is a local file.
    #[serde(default)]
    pub is_local: bool,
    /// Known external URLs for the track.
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// A track without album or popularity details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedTrack {
    /// The id of the track.
    #[serde(default)]
    pub id: Option<String>,
    /// The name of the track.
    pub name: String,
    /// The Spotify URI of the track.
    pub uri: String,
    /// The artists who performed the track.
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

/// A track saved in the user's library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrack {
    /// When the track was saved. [ISO 8601]
    pub added_at: String,
    /// The track.
    pub track: FullTrack,
}

/// Track-related endpoints.
impl UserClient {
    /// Get several tracks by id.
    ///
    /// At most [`MAX_IDS_PER_REQUEST`] ids can be requested at once. Unknown
    /// ids are skipped.
    pub async fn several_tracks(&self, ids: &[String]) -> ClientResult<Vec<FullTrack>> {
        check_item_count(MAX_IDS_PER_REQUEST, ids.len())?;
        if ids.is_empty() {
            return Ok(vec![]);
        }

        #[derive(Deserialize)]
        struct SeveralTracksResponse {
            tracks: Vec<Option<FullTrack>>,
        }

        Ok(self
            .get::<SeveralTracksResponse>("tracks", &[("ids", ids.join(","))])
            .await?
            .tracks
            .into_iter()
            .flatten()
            .collect())
    }

    /// Get the tracks saved in the current user's library, most recent first.
    ///
    /// Limit has a maximum of 50.
    pub async fn saved_tracks(&self, limit: u32, offset: u32) -> ClientResult<Vec<SavedTrack>> {
        Ok(self
            .get::<Paging<SavedTrack>>(
                "me/tracks",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?
            .items)
    }

    /// Get recommendations seeded by up to [`MAX_SEED_TRACKS`] tracks.
    ///
    /// Limit has a maximum of [`MAX_RECOMMENDATIONS`].
    pub async fn recommendations(
        &self,
        seed_track_ids: &[String],
        limit: usize,
    ) -> ClientResult<Vec<SimplifiedTrack>> {
        check_item_count(MAX_SEED_TRACKS, seed_track_ids.len())?;
        check_item_count(MAX_RECOMMENDATIONS, limit)?;

        #[derive(Deserialize)]
        struct RecommendationsResponse {
            tracks: Vec<SimplifiedTrack>,
        }

        Ok(self
            .get::<RecommendationsResponse>(
                "recommendations",
                &[
                    ("seed_tracks", seed_track_ids.join(",")),
                    ("limit", limit.to_string()),
                ],
            )
            .await?
            .tracks)
    }
}
