use serde::{Deserialize, Serialize};

use crate::{ClientResult, ExternalUrls, FullArtist, FullTrack, Paging, UserClient};

/// The profile of the current user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateUser {
    /// The user id.
    pub id: String,
    /// The name displayed on the user's profile.
    #[serde(default)]
    pub display_name: Option<String>,
    /// The Spotify URI of the user.
    #[serde(default)]
    pub uri: String,
    /// The country of the user, as an ISO 3166-1 alpha-2 code.
    #[serde(default)]
    pub country: Option<String>,
    /// The user's subscription level.
    #[serde(default)]
    pub product: Option<String>,
    /// Known external URLs for the user.
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

/// The public profile of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    /// The user id.
    pub id: String,
    /// The name displayed on the user's profile.
    #[serde(default)]
    pub display_name: Option<String>,
}

/// The time frame affinities are computed over.
#[derive(Debug, Clone, Copy, Default)]
pub enum TimeRange {
    /// Approximately the last four weeks.
    ShortTerm,
    /// Approximately the last six months.
    #[default]
    MediumTerm,
    /// Approximately the last year.
    LongTerm,
}
impl TimeRange {
    fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

/// User profile and personalization endpoints.
impl UserClient {
    /// Get the profile of the current user.
    pub async fn current_user(&self) -> ClientResult<PrivateUser> {
        self.get("me", &[]).await
    }

    /// Get the current user's top tracks, most preferred first.
    ///
    /// Limit has a maximum of 50.
    pub async fn top_tracks(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> ClientResult<Vec<FullTrack>> {
        Ok(self
            .get::<Paging<FullTrack>>(
                "me/top/tracks",
                &[
                    ("time_range", time_range.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?
            .items)
    }

    /// Get the current user's top artists, most preferred first.
    ///
    /// Limit has a maximum of 50.
    pub async fn top_artists(
        &self,
        time_range: TimeRange,
        limit: u32,
    ) -> ClientResult<Vec<FullArtist>> {
        Ok(self
            .get::<Paging<FullArtist>>(
                "me/top/artists",
                &[
                    ("time_range", time_range.as_str().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?
            .items)
    }
}
