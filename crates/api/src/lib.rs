pub mod error;
pub mod scope;

use error::{ApiError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use scope::RequestScope;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

#[derive(Clone, Debug)]
pub enum AuthMethod {
    Basic { username: String, token: String },
    Bearer { token: String },
}

/// Authenticated HTTP client bound to a Zendesk instance base URL.
///
/// Cloning is cheap and clones share the underlying connection pool, so a
/// single client can back any number of resource accessors.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Option<AuthMethod>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(ApiError::InvalidUrl)?;

        let client = Client::builder()
            .user_agent(format!("zendesk-rs/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: url,
            auth: None,
        })
    }

    /// Basic auth. Zendesk API-token auth is this with `{email}/token` as the
    /// username and the API token as the password.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.auth = Some(AuthMethod::Basic {
            username: username.into(),
            token: token.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Bearer {
            token: token.into(),
        });
        self
    }

    /// Issues an authenticated GET under `scope` and decodes the JSON body.
    ///
    /// Transport failures, non-success statuses, and decode failures all map
    /// to an [`ApiError`]; payload-level interpretation is left to callers.
    /// Cancellation or an elapsed deadline on `scope` aborts the in-flight
    /// request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        scope: &RequestScope,
        path: &str,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T> {
        if scope.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let joined = self
            .base_url
            .join(path.strip_prefix('/').unwrap_or(path))
            .map_err(ApiError::InvalidUrl)?;

        debug!(url = %joined, "Sending request");

        tokio::select! {
            result = self.execute(joined, query) => result,
            _ = scope.cancelled() => Err(ApiError::Cancelled),
            _ = scope.deadline_elapsed() => Err(ApiError::DeadlineExceeded),
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        url: Url,
        query: Option<&[(&str, &str)]>,
    ) -> Result<T> {
        let mut req = self.client.get(url.clone());
        req = self.apply_auth(req);

        if let Some(query) = query {
            req = req.query(query);
        }

        let response = req.send().await.map_err(ApiError::RequestFailed)?;
        let status = response.status();

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::AuthenticationFailed {
                message: "Invalid or expired credentials".to_string(),
            }),
            StatusCode::NOT_FOUND => {
                let resource = url.path().to_string();
                Err(ApiError::NotFound { resource })
            }
            StatusCode::BAD_REQUEST => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest { message })
            }
            status if status.is_success() => response.json::<T>().await.map_err(|e| {
                error!("Failed to parse JSON response: {}", e);
                ApiError::InvalidResponse(e.to_string())
            }),
            status => {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Unexpected status: {}", status));
                Err(ApiError::ServerError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(AuthMethod::Basic { username, token }) => {
                request.basic_auth(username, Some(token))
            }
            Some(AuthMethod::Bearer { token }) => request.bearer_auth(token),
            None => request,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
