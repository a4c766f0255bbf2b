//! Loads a [`TasteProfile`] for a freshly authorized user.
use crate::{
    Role, SessionHandle, TasteProfile, gs,
    groupify_state::{Artist, Playlist, Track, UserId, rank_genres},
};

pub const TOP_TRACKS_TO_RETRIEVE: u32 = 50;
pub const TOP_ARTISTS_TO_RETRIEVE: u32 = 50;
pub const SAVED_TRACKS_TO_RETRIEVE: u32 = 50;
pub const PLAYLISTS_TO_RETRIEVE: u32 = 50;

/// Fetch and freeze everything the aggregation needs to know about a user.
///
/// Any failure other than loading playlists fails the whole load.
pub async fn load_taste_profile(
    session: SessionHandle,
    role: Role,
) -> gs::ClientResult<TasteProfile> {
    let (user, top_tracks, top_artists, saved_tracks) = tokio::try_join!(
        session.current_user(),
        session.top_tracks(TOP_TRACKS_TO_RETRIEVE),
        session.top_artists(TOP_ARTISTS_TO_RETRIEVE),
        session.saved_tracks(SAVED_TRACKS_TO_RETRIEVE),
    )?;
    let playlists = load_playlists(&session, &user.id).await;

    let top_tracks: Vec<Track> = top_tracks.into_iter().filter_map(Track::from_full).collect();
    let top_artists: Vec<Artist> = top_artists.into_iter().map(Artist::from).collect();
    let top_genres = rank_genres(&top_artists);
    let saved_tracks: Vec<Track> = saved_tracks
        .into_iter()
        .filter_map(|saved| Track::from_full(saved.track))
        .collect();

    let display_name = user
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| user.id.clone());

    tracing::debug!(
        "Loaded {role} profile for {}: {} top tracks, {} top artists, {} genres, {} saved tracks, {} playlists",
        user.id,
        top_tracks.len(),
        top_artists.len(),
        top_genres.len(),
        saved_tracks.len(),
        playlists.len()
    );

    Ok(TasteProfile {
        user_id: UserId(user.id),
        display_name,
        is_host: role == Role::Host,
        top_tracks,
        top_artists,
        top_genres,
        saved_tracks,
        playlists,
        session,
    })
}

async fn load_playlists(session: &SessionHandle, user_id: &str) -> Vec<Playlist> {
    let listed = match session.playlists(PLAYLISTS_TO_RETRIEVE).await {
        Ok(listed) => listed,
        Err(e) => {
            tracing::warn!("Failed to list playlists for {user_id}, continuing without them: {e}");
            return vec![];
        }
    };

    let mut playlists = Vec::with_capacity(listed.len());
    for simplified in listed {
        match session.playlist(&simplified.id).await {
            Ok(full) => playlists.push(Playlist::from(full)),
            Err(e) => {
                tracing::warn!("Failed to load playlist {} for {user_id}: {e}", simplified.id);
                playlists.push(Playlist::from(simplified));
            }
        }
    }
    playlists
}
