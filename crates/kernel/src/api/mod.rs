//! Backend API surface.
//!
//! Everything the engine asks of the backend goes through the two traits
//! here so tests can inject fakes; [`HttpBackend`] is the production
//! implementation.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{NavError, NavResult};
use crate::session::TokenInfo;

/// Envelope code signalling success.
const CODE_OK: i64 = 200;

/// Envelope code signalling an expired or rejected authorization.
const CODE_UNAUTHORIZED: i64 = 401;

/// Generic result envelope wrapping every backend response.
///
/// The optional fields must deserialize for any payload type, so they rely
/// on serde's built-in missing-field handling for `Option` rather than a
/// container default (which would bound `T: Default`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    pub code: i64,
    pub error_message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// Unwrap the envelope into its payload, mapping failure codes onto the
    /// engine's error taxonomy.
    pub fn into_data(self) -> NavResult<Option<T>> {
        match self.code {
            CODE_OK => Ok(self.data),
            CODE_UNAUTHORIZED => Err(NavError::SessionExpired),
            code => Err(NavError::Fetch(
                self.error_message
                    .unwrap_or_else(|| format!("request failed with code {code}")),
            )),
        }
    }
}

/// Read-only source of the current principal's permission-scoped menu tree.
///
/// The response is already authority-filtered; the engine never re-filters
/// by permission.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu_tree(&self) -> NavResult<Value>;
}

/// Remote authentication operations.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a token (password grant).
    async fn authenticate(&self, username: &str, password: &str) -> NavResult<TokenInfo>;

    /// Revoke the current token. Callers treat this as best-effort; local
    /// teardown proceeds regardless of the outcome.
    async fn revoke(&self) -> NavResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_success_yields_data() {
        let envelope: ApiResult<Value> =
            serde_json::from_value(json!({"code": 200, "errorMessage": null, "data": [1, 2]}))
                .unwrap();
        assert_eq!(envelope.into_data().unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn envelope_failure_carries_message() {
        let envelope: ApiResult<Value> =
            serde_json::from_value(json!({"code": 500, "errorMessage": "boom"})).unwrap();
        assert_eq!(envelope.into_data().unwrap_err(), NavError::Fetch("boom".to_string()));
    }

    #[test]
    fn envelope_401_is_session_expired() {
        let envelope: ApiResult<Value> = serde_json::from_value(json!({"code": 401})).unwrap();
        assert_eq!(envelope.into_data().unwrap_err(), NavError::SessionExpired);
    }

    #[test]
    fn envelope_decodes_payload_types_without_default_impls() {
        // TokenInfo has no Default impl; absent fields must still decode.
        let envelope: ApiResult<TokenInfo> =
            serde_json::from_value(json!({"code": 401})).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.into_data().unwrap_err(), NavError::SessionExpired);
    }

    #[test]
    fn envelope_failure_without_message_names_code() {
        let envelope: ApiResult<Value> = serde_json::from_value(json!({"code": 503})).unwrap();
        let NavError::Fetch(message) = envelope.into_data().unwrap_err() else {
            panic!("expected fetch error");
        };
        assert!(message.contains("503"));
    }
}
