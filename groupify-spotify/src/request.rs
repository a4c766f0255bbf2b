use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{ClientError, ClientResult, UserClient};

/// Making requests to the Web API.
impl UserClient {
    /// Make a `GET` request against `path`, relative to the API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &[(&str, String)],
    ) -> ClientResult<T> {
        let bytes = self
            .send(self.client.get(self.url(path)).query(parameters))
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make a `POST` request with a JSON body against `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is not valid.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_vec(body)?;
        let bytes = self
            .send(
                self.client
                    .post(self.url(path))
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body),
            )
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Make a `DELETE` request against `path`, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.send(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = request
            .bearer_auth(&self.token.access_token)
            .send()
            .await?;

        let status = response.status();
        let bytes: Vec<u8> = response.bytes().await?.into();
        if !status.is_success() {
            return Err(Self::parse_error(status.as_u16(), &bytes));
        }

        Ok(bytes)
    }

    fn parse_error(status: u16, bytes: &[u8]) -> ClientError {
        let message = serde_json::from_slice::<ErrorResponse>(bytes)
            .ok()
            .and_then(|response| response.error.message);

        ClientError::SpotifyError { status, message }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// The envelope the Web API wraps errors in.
struct ErrorResponse {
    error: ResponseError,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseError {
    message: Option<String>,
}
