use std::path::PathBuf;

use thiserror::Error;

use crate::{PartyId, PlaylistRef, gs, groupify_state::UserId};

/// Problems with the startup configuration. None of these are recoverable.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing credential `{0}`")]
    MissingCredential(&'static str),

    #[error("`{field}` is {value}, at most {max} is allowed")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Failures while resolving an authorization callback.
#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("callback is missing `{0}`")]
    MissingField(&'static str),

    #[error("no pending authentication for `{0}`")]
    UnknownCorrelation(String),

    /// The correlation id matched but the full state did not. Treated as a
    /// forgery attempt; nothing is attached.
    #[error("state mismatch for `{0}`")]
    StateMismatch(String),

    #[error("failed to exchange authorization code: {0}")]
    UpstreamAuthFailure(#[source] gs::ClientError),

    #[error("failed to load taste profile: {0}")]
    ProfileLoad(#[source] gs::ClientError),

    #[error("failed to attach profile: {0}")]
    Attach(#[source] Box<GroupifyError>),
}

#[derive(Error, Debug)]
pub enum GroupifyError {
    #[error("no party with id {0}")]
    PartyNotFound(PartyId),

    #[error("party {party_id} is full ({max_size} members)")]
    Capacity { party_id: PartyId, max_size: usize },

    #[error("{user_id} is already a member of party {party_id}")]
    DuplicateMember { party_id: PartyId, user_id: UserId },

    #[error("{user_id} is not a member of party {party_id}")]
    MemberNotFound { party_id: PartyId, user_id: UserId },

    #[error("the host of party {0} cannot be removed")]
    HostRemoval(PartyId),

    #[error("upstream API call failed: {0}")]
    UpstreamApi(#[from] gs::ClientError),

    /// The playlist exists but not every track made it in. Nothing is rolled back.
    #[error("playlist {} was created but only {written} tracks were added: {source}", .playlist.id)]
    PlaylistIncomplete {
        playlist: PlaylistRef,
        written: usize,
        #[source]
        source: gs::ClientError,
    },

    #[error(transparent)]
    Callback(#[from] CallbackError),
}
