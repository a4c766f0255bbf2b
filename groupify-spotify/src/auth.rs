use serde::{Deserialize, Serialize};

use crate::{Client, ClientError, ClientResult};

/// An access/refresh token pair issued by the accounts service.
#[derive(Clone, Serialize, Deserialize)]
pub struct Token {
    /// The access token used for API calls.
    pub access_token: String,
    /// The token type, always `Bearer`.
    pub token_type: String,
    /// The space-separated scopes that were granted.
    #[serde(default)]
    pub scope: Option<String>,
    /// The lifetime of the access token in seconds.
    pub expires_in: u64,
    /// The refresh token, if one was issued.
    #[serde(default)]
    pub refresh_token: Option<String>,
}
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct AuthErrorBody {
    error: String,
    error_description: Option<String>,
}

/// Authorization code flow.
impl Client {
    /// Build the URI the user has to visit to grant `scopes` to this application.
    ///
    /// `state` is echoed back to the redirect URI untouched.
    pub fn authorize_url(
        &self,
        scopes: &[&str],
        state: &str,
        show_dialog: bool,
    ) -> ClientResult<String> {
        let scope = scopes.join(" ");
        let request = self
            .client
            .get(format!("{}/authorize", self.accounts_url))
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("show_dialog", if show_dialog { "true" } else { "false" }),
            ])
            .build()?;

        Ok(request.url().to_string())
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AuthError`] if the accounts service rejects the code.
    pub async fn exchange_code(&self, code: &str) -> ClientResult<Token> {
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(match serde_json::from_slice::<AuthErrorBody>(&bytes) {
                Ok(body) => ClientError::AuthError {
                    error: body.error,
                    description: body.error_description,
                },
                Err(_) => ClientError::SpotifyError {
                    status: status.as_u16(),
                    message: None,
                },
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
