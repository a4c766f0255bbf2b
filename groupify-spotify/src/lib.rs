//! A barebones client for the Spotify Web API.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod auth;
pub use auth::*;

mod paging;
pub use paging::*;

mod user;
pub use user::*;

mod artist;
pub use artist::*;

mod track;
pub use track::*;

mod playlist;
pub use playlist::*;

mod request;
