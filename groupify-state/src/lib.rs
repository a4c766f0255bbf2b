//! Representations of the taste data groupify reasons about, as well as
//! conversions from the Spotify wire types.
//!
//! Separated out to allow for use in other utilities.
#![deny(missing_docs)]

pub use groupify_spotify as gs;

mod artist;
pub use artist::{Artist, ArtistCredit, ArtistId, rank_genres};

mod track;
pub use track::{Track, TrackId};

mod playlist;
pub use playlist::{Playlist, PlaylistId};

mod user;
pub use user::UserId;
