use crate::{
    SessionHandle,
    groupify_state::{Artist, Playlist, Track, UserId},
};

/// A frozen snapshot of one user's taste, plus the session it was loaded with.
///
/// Never updated after loading; a user who wants fresh data rejoins.
#[derive(Clone)]
pub struct TasteProfile {
    pub user_id: UserId,
    /// Falls back to the user id for accounts without a display name.
    pub display_name: String,
    pub is_host: bool,
    /// Most preferred first.
    pub top_tracks: Vec<Track>,
    /// Most preferred first.
    pub top_artists: Vec<Artist>,
    /// Derived from `top_artists`; most frequent first.
    pub top_genres: Vec<String>,
    pub saved_tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub session: SessionHandle,
}
impl std::fmt::Debug for TasteProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasteProfile")
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .field("is_host", &self.is_host)
            .field("top_tracks", &self.top_tracks.len())
            .field("top_artists", &self.top_artists.len())
            .field("top_genres", &self.top_genres)
            .field("saved_tracks", &self.saved_tracks.len())
            .field("playlists", &self.playlists.len())
            .finish_non_exhaustive()
    }
}
