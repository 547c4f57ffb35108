//! HTTP implementation of the backend traits.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{ApiResult, AuthBackend, MenuSource};
use crate::config::Config;
use crate::error::{NavError, NavResult};
use crate::session::{CredentialStore, TokenInfo};

/// Backend client over HTTP.
///
/// Reads the credential store on every request to attach the bearer header,
/// so a token swap or teardown takes effect immediately.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    oauth_client_id: String,
    oauth_client_secret: String,
    credentials: Arc<dyn CredentialStore>,
}

impl HttpBackend {
    pub fn new(config: &Config, credentials: Arc<dyn CredentialStore>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            oauth_client_id: config.oauth_client_id.clone(),
            oauth_client_secret: config.oauth_client_secret.clone(),
            credentials,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach the bearer header when a token is stored.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.get() {
            Some(info) if !info.access_token.token_value.is_empty() => {
                request.bearer_auth(info.access_token.token_value)
            }
            _ => request,
        }
    }

    /// Decode a result envelope, mapping transport-level authorization
    /// failures onto [`NavError::SessionExpired`].
    async fn decode<T: DeserializeOwned>(response: Response) -> NavResult<ApiResult<T>> {
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(NavError::SessionExpired);
        }
        response
            .json::<ApiResult<T>>()
            .await
            .map_err(|e| NavError::Fetch(e.to_string()))
    }
}

#[async_trait]
impl MenuSource for HttpBackend {
    async fn fetch_menu_tree(&self) -> NavResult<Value> {
        let response = self
            .authorize(self.client.get(self.url("/menu/role-tree")))
            .send()
            .await
            .map_err(|e| NavError::Fetch(e.to_string()))?;

        let envelope = Self::decode::<Value>(response).await?;
        Ok(envelope.into_data()?.unwrap_or_else(|| Value::Array(Vec::new())))
    }
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn authenticate(&self, username: &str, password: &str) -> NavResult<TokenInfo> {
        let form = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];

        let response = self
            .client
            .post(self.url("/oauth2/token"))
            .basic_auth(&self.oauth_client_id, Some(&self.oauth_client_secret))
            .form(&form)
            .send()
            .await
            .map_err(|e| NavError::Fetch(e.to_string()))?;

        let envelope = Self::decode::<TokenInfo>(response).await?;
        envelope
            .into_data()?
            .ok_or_else(|| NavError::Fetch("token response carried no payload".to_string()))
    }

    async fn revoke(&self) -> NavResult<()> {
        let response = self
            .authorize(self.client.delete(self.url("/token/logout")))
            .send()
            .await
            .map_err(|e| NavError::Fetch(e.to_string()))?;

        Self::decode::<Value>(response).await?.into_data()?;
        Ok(())
    }
}
