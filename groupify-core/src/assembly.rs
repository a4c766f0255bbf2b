//! Turns a candidate set into a real playlist on the host's account.
use serde::{Deserialize, Serialize};

use crate::{
    AggregationConfig, CandidateSet, GroupifyError, TasteProfile, UserSession, gs,
    groupify_state::{PlaylistId, Track, TrackId},
};

/// A playlist created for a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub id: PlaylistId,
    pub uri: String,
    /// Link to open the playlist in a browser.
    pub url: Option<String>,
    /// Number of tracks the playlist was filled with.
    pub track_count: usize,
}

/// "A playlist for A, B and C."
pub fn describe_members<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => "A playlist.".to_string(),
        [only] => format!("A playlist for {}.", only.as_ref()),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("A playlist for {} and {}.", init.join(", "), last.as_ref())
        }
    }
}

/// Top the candidates up to the target size with recommendations seeded by the
/// first few of them. Returns how many tracks were added.
pub async fn fill_with_recommendations(
    candidates: &mut CandidateSet,
    config: &AggregationConfig,
    session: &dyn UserSession,
) -> gs::ClientResult<usize> {
    if !config.recommendations || candidates.len() >= config.target_size {
        return Ok(0);
    }
    let seeds: Vec<String> = candidates
        .ids()
        .take(gs::MAX_SEED_TRACKS)
        .map(|id| id.0.clone())
        .collect();
    if seeds.is_empty() {
        tracing::warn!("No candidate tracks to seed recommendations with");
        return Ok(0);
    }

    let shortfall = config.target_size - candidates.len();
    let recommended = session
        .recommendations(&seeds, shortfall.min(gs::MAX_RECOMMENDATIONS))
        .await?;
    let ids: Vec<String> = recommended
        .into_iter()
        .filter_map(|track| track.id)
        .filter(|id| !candidates.contains(&TrackId(id.clone())))
        .collect();

    let mut added = 0;
    for chunk in ids.chunks(gs::MAX_IDS_PER_REQUEST) {
        let tracks = session.several_tracks(chunk).await?;
        added += candidates.extend(tracks.into_iter().filter_map(Track::from_full));
    }
    tracing::debug!("Added {added} recommended tracks");
    Ok(added)
}

/// Create the playlist on the host's account and write `candidates` into it.
///
/// Creation and appends are separate calls. If an append fails the playlist
/// is left as it is and the failure reports what was written.
pub async fn assemble(
    mut candidates: CandidateSet,
    config: &AggregationConfig,
    host: &TasteProfile,
    member_names: &[String],
    name: &str,
) -> Result<PlaylistRef, GroupifyError> {
    let session = host.session.as_ref();

    fill_with_recommendations(&mut candidates, config, session).await?;
    candidates.truncate(config.target_size);

    let created = session
        .create_playlist(
            &host.user_id.0,
            &gs::CreatePlaylistRequest {
                name: name.to_string(),
                description: describe_members(member_names),
                public: true,
                collaborative: false,
            },
        )
        .await?;
    let mut playlist = PlaylistRef {
        id: PlaylistId(created.id),
        uri: created.uri,
        url: created.external_urls.spotify,
        track_count: 0,
    };

    let uris = candidates.uris();
    for chunk in uris.chunks(gs::MAX_URIS_PER_REQUEST) {
        if let Err(source) = session.add_tracks_to_playlist(&playlist.id.0, chunk).await {
            let written = playlist.track_count;
            return Err(GroupifyError::PlaylistIncomplete {
                playlist,
                written,
                source,
            });
        }
        playlist.track_count += chunk.len();
    }

    tracing::info!(
        "Created playlist {} with {} tracks for {}",
        playlist.id,
        playlist.track_count,
        host.display_name
    );
    Ok(playlist)
}
