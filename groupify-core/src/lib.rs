pub use groupify_state;
pub use groupify_spotify as gs;

mod config;
pub use config::{Config, GuestApp, HostApp, PartySettings, PlaylistSettings};

mod error;
pub use error::{CallbackError, ConfigurationError, GroupifyError};

mod upstream;
pub use upstream::{Authorizer, Role, SessionHandle, SpotifyAuthorizer, UserSession};

mod profile;
pub use profile::TasteProfile;

pub mod loader;

mod party;
pub use party::{Party, PartyId, PartySummary};

mod manager;
pub use manager::{PartyManager, ReapReport};

mod auth;
pub use auth::{CallbackOutcome, Correlator, HostAuth, PendingAuthentication};

pub mod aggregate;
pub use aggregate::{AggregationConfig, CandidateSet};

pub mod assembly;
pub use assembly::PlaylistRef;

mod service;
pub use service::Groupify;
