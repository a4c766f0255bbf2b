//! Turns the taste profiles of a party into one set of candidate tracks.
//!
//! Three selectors look for tracks, artists and genres that at least
//! `strictness` members have in common. Their results are unioned in that
//! order, keeping the first occurrence of each track.
use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    TasteProfile, UserSession, gs,
    groupify_state::{ArtistId, Track, TrackId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// How many members must share a track, artist or genre.
    pub strictness: usize,
    pub target_size: usize,
    /// Fill up to `target_size` with upstream recommendations.
    pub recommendations: bool,
}
impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            strictness: 2,
            target_size: 80,
            recommendations: true,
        }
    }
}
impl AggregationConfig {
    /// The effective strictness. A threshold of zero would admit every track.
    pub fn threshold(&self) -> usize {
        self.strictness.max(1)
    }
}

/// Tracks in first-inserted order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    tracks: Vec<Track>,
    ids: HashSet<TrackId>,
}
impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the track was new.
    pub fn insert(&mut self, track: Track) -> bool {
        if !self.ids.insert(track.id.clone()) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Returns how many of the tracks were new.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        tracks
            .into_iter()
            .map(|track| self.insert(track))
            .filter(|inserted| *inserted)
            .count()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn ids(&self) -> impl Iterator<Item = &TrackId> {
        self.tracks.iter().map(|t| &t.id)
    }

    /// Keep the first `len` tracks.
    pub fn truncate(&mut self, len: usize) {
        for track in self.tracks.drain(len.min(self.tracks.len())..) {
            self.ids.remove(&track.id);
        }
    }

    pub fn uris(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.uri.clone()).collect()
    }
}
impl FromIterator<Track> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
impl IntoIterator for CandidateSet {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

/// Count how many members have each key. A member counts at most once per key.
fn member_counts<'a, K, I>(
    members: &'a [Arc<TasteProfile>],
    keys: impl Fn(&'a TasteProfile) -> I,
) -> HashMap<K, usize>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    let mut counts = HashMap::new();
    for member in members {
        let unique: HashSet<K> = keys(&**member).into_iter().collect();
        for key in unique {
            *counts.entry(key).or_default() += 1;
        }
    }
    counts
}

/// Every top track of every member, in member order then rank order.
fn top_track_pool(members: &[Arc<TasteProfile>]) -> impl Iterator<Item = &Track> {
    members.iter().flat_map(|m| &m.top_tracks)
}

/// Tracks in the top tracks of at least `threshold` members.
pub fn shared_top_tracks(members: &[Arc<TasteProfile>], threshold: usize) -> CandidateSet {
    let counts = member_counts(members, |m| m.top_tracks.iter().map(|t| &t.id));
    top_track_pool(members)
        .filter(|t| counts.get(&t.id).copied().unwrap_or(0) >= threshold)
        .cloned()
        .collect()
}

/// Top tracks with at least one artist in the top artists of at least `threshold` members.
pub fn shared_top_artist_tracks(members: &[Arc<TasteProfile>], threshold: usize) -> CandidateSet {
    let counts = member_counts(members, |m| m.top_artists.iter().map(|a| &a.id));
    top_track_pool(members)
        .filter(|t| {
            t.artist_ids()
                .any(|id| counts.get(id).copied().unwrap_or(0) >= threshold)
        })
        .cloned()
        .collect()
}

/// Genres in the derived top genres of at least `threshold` members.
pub fn shared_genres(members: &[Arc<TasteProfile>], threshold: usize) -> HashSet<String> {
    member_counts(members, |m| m.top_genres.iter())
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(genre, _)| genre.clone())
        .collect()
}

/// Top tracks with at least one artist tagged with one of `genres`, as given
/// by [`shared_genres`]. Artists missing from `artist_genres` have no genres.
pub fn shared_top_genre_tracks(
    members: &[Arc<TasteProfile>],
    genres: &HashSet<String>,
    artist_genres: &ArtistGenres,
) -> CandidateSet {
    if genres.is_empty() {
        return CandidateSet::new();
    }
    top_track_pool(members)
        .filter(|t| {
            t.artist_ids()
                .flat_map(|id| artist_genres.genres(id))
                .any(|genre| genres.contains(genre))
        })
        .cloned()
        .collect()
}

/// Genre tags per artist, filled from the members' top artists and then from
/// the platform for any artist not already known.
#[derive(Debug, Default)]
pub struct ArtistGenres {
    genres: HashMap<ArtistId, Vec<String>>,
}
impl ArtistGenres {
    pub fn from_members(members: &[Arc<TasteProfile>]) -> Self {
        let genres = members
            .iter()
            .flat_map(|m| &m.top_artists)
            .map(|a| (a.id.clone(), a.genres.clone()))
            .collect();
        Self { genres }
    }

    pub fn genres(&self, id: &ArtistId) -> &[String] {
        self.genres.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, id: &ArtistId) -> bool {
        self.genres.contains_key(id)
    }

    /// Look up every artist in `ids` that isn't known yet, in batches of
    /// [`gs::MAX_IDS_PER_REQUEST`]. Returns the number of requests made.
    pub async fn resolve<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a ArtistId>,
        session: &dyn UserSession,
    ) -> gs::ClientResult<usize> {
        let mut seen = HashSet::new();
        let missing: Vec<String> = ids
            .into_iter()
            .filter(|id| !self.contains(id) && seen.insert(*id))
            .map(|id| id.0.clone())
            .collect();

        let mut requests = 0;
        for chunk in missing.chunks(gs::MAX_IDS_PER_REQUEST) {
            let artists = session.several_artists(chunk).await?;
            requests += 1;
            for artist in artists {
                self.genres.insert(ArtistId(artist.id), artist.genres);
            }
            // Unknown artists come back as null; don't ask again.
            for id in chunk {
                self.genres.entry(ArtistId(id.clone())).or_default();
            }
        }
        Ok(requests)
    }
}

/// Run all three selectors and union their results.
///
/// `session` is used to resolve the genres of artists none of the members
/// has among their top artists. That lookup only happens if some genre is
/// shared widely enough to matter.
pub async fn aggregate(
    members: &[Arc<TasteProfile>],
    config: &AggregationConfig,
    session: &dyn UserSession,
) -> gs::ClientResult<CandidateSet> {
    let threshold = config.threshold();

    let mut candidates = shared_top_tracks(members, threshold);
    tracing::debug!("{} shared top tracks", candidates.len());

    let by_artist = shared_top_artist_tracks(members, threshold);
    let by_artist_len = by_artist.len();
    let added = candidates.extend(by_artist);
    tracing::debug!("{by_artist_len} shared top artist tracks, {added} new");

    let genres = shared_genres(members, threshold);
    if genres.is_empty() {
        tracing::debug!("No genre shared by {threshold} members, skipping genre selector");
    } else {
        let mut artist_genres = ArtistGenres::from_members(members);
        let requests = artist_genres
            .resolve(
                top_track_pool(members).flat_map(|t| t.artist_ids()),
                session,
            )
            .await?;
        let by_genre = shared_top_genre_tracks(members, &genres, &artist_genres);
        let by_genre_len = by_genre.len();
        let added = candidates.extend(by_genre);
        tracing::debug!(
            "{by_genre_len} shared top genre tracks, {added} new ({requests} artist lookups)"
        );
    }

    Ok(candidates)
}
