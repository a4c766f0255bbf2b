use crate::Token;

#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when (de)serializing a body.
    DeserializationError(serde_json::Error),
    /// The Web API returned an error.
    SpotifyError {
        /// The HTTP status code.
        status: u16,
        /// The error message.
        message: Option<String>,
    },
    /// The accounts service rejected an authorization request.
    AuthError {
        /// The OAuth error code, e.g. `invalid_grant`.
        error: String,
        /// The human-readable description.
        description: Option<String>,
    },
    /// More items were passed to an endpoint than it accepts in one call.
    TooManyItems {
        /// The endpoint's ceiling.
        limit: usize,
        /// The number of items that were passed.
        actual: usize,
    },
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::SpotifyError { status, message } => {
                write!(f, "Spotify error: {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            ClientError::AuthError { error, description } => {
                write!(f, "Authorization error: {error}")?;
                if let Some(description) = description {
                    write!(f, ": {description}")?;
                }
                Ok(())
            }
            ClientError::TooManyItems { limit, actual } => {
                write!(f, "Too many items: {actual} passed, at most {limit} allowed")
            }
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// The maximum number of ids accepted by the "get several" endpoints.
pub const MAX_IDS_PER_REQUEST: usize = 50;
/// The maximum number of URIs accepted when adding items to a playlist.
pub const MAX_URIS_PER_REQUEST: usize = 100;
/// The maximum number of seed tracks accepted by the recommendations endpoint.
pub const MAX_SEED_TRACKS: usize = 5;
/// The maximum number of recommendations returned in one call.
pub const MAX_RECOMMENDATIONS: usize = 100;

pub(crate) fn check_item_count(limit: usize, actual: usize) -> ClientResult<()> {
    if actual > limit {
        return Err(ClientError::TooManyItems { limit, actual });
    }
    Ok(())
}

/// A client for one registered Spotify application.
///
/// Used to issue authorization URIs and exchange authorization codes. Once a
/// user has been authorized, calls on their behalf go through a [`UserClient`].
#[derive(Clone)]
pub struct Client {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: String,
    pub(crate) accounts_url: String,
    pub(crate) api_url: String,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// The base URL of the accounts service.
    pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";
    /// The base URL of the Web API.
    pub const API_URL: &str = "https://api.spotify.com/v1";

    /// Create a new client.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            accounts_url: Self::ACCOUNTS_URL.to_string(),
            api_url: Self::API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at different hosts. Mostly useful for testing.
    pub fn with_base_urls(
        mut self,
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        self.accounts_url = accounts_url.into();
        self.api_url = api_url.into();
        self
    }

    /// The application's client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Create a client that acts on behalf of the user the token was issued to.
    pub fn authorized(&self, token: Token) -> UserClient {
        UserClient {
            api_url: self.api_url.clone(),
            token,
            client: self.client.clone(),
        }
    }
}

/// A client authorized to act on behalf of a single user.
#[derive(Clone)]
pub struct UserClient {
    pub(crate) api_url: String,
    pub(crate) token: Token,
    pub(crate) client: reqwest::Client,
}
impl UserClient {
    /// The token this client authenticates with.
    pub fn token(&self) -> &Token {
        &self.token
    }
}
