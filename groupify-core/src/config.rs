use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{AggregationConfig, ConfigurationError};

const PLACEHOLDER_PREFIX: &str = "YOUR_";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log per-member and per-selector details.
    pub verbose: bool,
    #[serde(default)]
    pub host: HostApp,
    #[serde(default)]
    pub guest: GuestApp,
    #[serde(default)]
    pub party: PartySettings,
    #[serde(default)]
    pub playlist: PlaylistSettings,
}
impl Config {
    pub const FILENAME: &str = "groupify.toml";

    /// Load the config at `path`, falling back to the defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(source) => Err(ConfigurationError::Read {
                path: path.to_owned(),
                source,
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        std::fs::write(path, toml::to_string(self)?).map_err(|source| {
            ConfigurationError::Write {
                path: path.to_owned(),
                source,
            }
        })?;
        tracing::info!("saved config to {}", path.display());
        Ok(())
    }

    /// Check that both applications have real credentials and that party
    /// durations are within their limits.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let credentials = [
            ("host.client_id", &self.host.client_id),
            ("host.client_secret", &self.host.client_secret),
            ("host.redirect_uri", &self.host.redirect_uri),
            ("guest.client_id", &self.guest.client_id),
            ("guest.client_secret", &self.guest.client_secret),
        ];
        for (name, value) in credentials {
            if value.trim().is_empty() || value.starts_with(PLACEHOLDER_PREFIX) {
                return Err(ConfigurationError::MissingCredential(name));
            }
        }
        self.party.validate()
    }
}

/// The application hosts authorize against. Needs playlist write access.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostApp {
    pub client_id: String,
    pub client_secret: String,
    /// Where the accounts service sends users back to; shared with guests.
    pub redirect_uri: String,
}
impl Default for HostApp {
    fn default() -> Self {
        Self {
            client_id: "YOUR_CLIENT_ID".to_string(),
            client_secret: "YOUR_CLIENT_SECRET".to_string(),
            redirect_uri: "http://localhost:8080/api/callback".to_string(),
        }
    }
}

/// The read-only application guests authorize against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuestApp {
    pub client_id: String,
    pub client_secret: String,
}
impl Default for GuestApp {
    fn default() -> Self {
        Self {
            client_id: "YOUR_GUEST_CLIENT_ID".to_string(),
            client_secret: "YOUR_GUEST_CLIENT_SECRET".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PartySettings {
    /// Maximum number of members, host included. Unlimited if unset.
    pub max_size: Option<usize>,
    pub max_age_hours: u64,
    pub reaper_interval_secs: u64,
    pub pending_auth_ttl_secs: u64,
}
impl Default for PartySettings {
    fn default() -> Self {
        Self {
            max_size: None,
            max_age_hours: 8,
            reaper_interval_secs: 300,
            pending_auth_ttl_secs: 600,
        }
    }
}
impl PartySettings {
    pub const MAX_AGE_HOURS: u64 = 24 * 365;
    pub const MAX_REAPER_INTERVAL_SECS: u64 = 24 * 60 * 60;
    pub const MAX_PENDING_AUTH_TTL_SECS: u64 = 24 * 60 * 60;

    fn validate(&self) -> Result<(), ConfigurationError> {
        let limits = [
            ("party.max_age_hours", self.max_age_hours, Self::MAX_AGE_HOURS),
            (
                "party.reaper_interval_secs",
                self.reaper_interval_secs,
                Self::MAX_REAPER_INTERVAL_SECS,
            ),
            (
                "party.pending_auth_ttl_secs",
                self.pending_auth_ttl_secs,
                Self::MAX_PENDING_AUTH_TTL_SECS,
            ),
        ];
        for (field, value, max) in limits {
            if value > max {
                return Err(ConfigurationError::OutOfRange { field, value, max });
            }
        }
        Ok(())
    }

    /// Clamped to [`Self::MAX_AGE_HOURS`].
    pub fn max_age(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::try_hours(self.max_age_hours.min(Self::MAX_AGE_HOURS) as i64)
            .unwrap_or(chrono::TimeDelta::MAX)
    }

    /// Clamped to between one second and [`Self::MAX_REAPER_INTERVAL_SECS`].
    pub fn reaper_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.reaper_interval_secs
                .clamp(1, Self::MAX_REAPER_INTERVAL_SECS),
        )
    }

    /// Clamped to [`Self::MAX_PENDING_AUTH_TTL_SECS`].
    pub fn pending_auth_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::try_seconds(
            self.pending_auth_ttl_secs
                .min(Self::MAX_PENDING_AUTH_TTL_SECS) as i64,
        )
        .unwrap_or(chrono::TimeDelta::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaylistSettings {
    /// The name given to generated playlists. Also used to find them when purging.
    pub name: String,
    pub strictness: usize,
    pub size: usize,
    pub recommendations: bool,
}
impl Default for PlaylistSettings {
    fn default() -> Self {
        let defaults = AggregationConfig::default();
        Self {
            name: "Groupify Playlist".to_string(),
            strictness: defaults.strictness,
            size: defaults.target_size,
            recommendations: defaults.recommendations,
        }
    }
}
impl PlaylistSettings {
    /// The aggregation settings used when a request doesn't supply its own.
    pub fn aggregation(&self) -> AggregationConfig {
        AggregationConfig {
            strictness: self.strictness,
            target_size: self.size,
            recommendations: self.recommendations,
        }
    }
}
