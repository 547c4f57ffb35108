//! Credential persistence.
//!
//! One key-value entry holds the current token payload. It is read on every
//! outbound request to attach the authorization header, and cleared by the
//! session teardown path.

use std::path::PathBuf;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Token payload as issued by the authorization server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub access_token: AccessToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<RefreshToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_parameters: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub token_value: String,
    #[serde(default)]
    pub issued_at: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub token_type: Option<TokenType>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenType {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub token_value: String,
    #[serde(default)]
    pub issued_at: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl TokenInfo {
    /// Build a minimal token payload from a bearer value. Test and tooling
    /// convenience.
    pub fn bearer(token_value: impl Into<String>) -> Self {
        Self {
            access_token: AccessToken {
                token_value: token_value.into(),
                issued_at: None,
                expires_at: None,
                token_type: None,
                scopes: Vec::new(),
            },
            refresh_token: None,
            additional_parameters: None,
        }
    }
}

/// Persisted key-value entry holding the current token payload.
pub trait CredentialStore: Send + Sync {
    /// The stored token, if any.
    fn get(&self) -> Option<TokenInfo>;

    /// Store or clear the token.
    fn set(&self, info: Option<TokenInfo>);
}

/// In-memory store. Credentials do not survive a restart.
#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<TokenInfo>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<TokenInfo> {
        self.token.read().clone()
    }

    fn set(&self, info: Option<TokenInfo>) {
        *self.token.write() = info;
    }
}

/// JSON-file-backed store so the session survives a restart.
///
/// Reads go through an in-memory copy loaded once at construction; writes
/// persist best-effort, with failures logged rather than surfaced — losing
/// persistence degrades to a sign-in prompt on the next run.
pub struct FileCredentialStore {
    path: PathBuf,
    token: RwLock<Option<TokenInfo>>,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        let token = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable credential file");
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            path,
            token: RwLock::new(token),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<TokenInfo> {
        self.token.read().clone()
    }

    fn set(&self, info: Option<TokenInfo>) {
        let result = match &info {
            Some(token) => serde_json::to_string(token)
                .map_err(anyhow::Error::from)
                .and_then(|raw| std::fs::write(&self.path, raw).map_err(Into::into)),
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            },
        };
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to persist credentials");
        }
        *self.token.write() = info;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.get().is_none());

        store.set(Some(TokenInfo::bearer("abc")));
        assert_eq!(store.get().unwrap().access_token.token_value, "abc");

        store.set(None);
        assert!(store.get().is_none());
    }

    #[test]
    fn token_info_deserializes_wire_shape() {
        let raw = serde_json::json!({
            "accessToken": {
                "tokenValue": "tok",
                "issuedAt": 100,
                "expiresAt": 200,
                "tokenType": {"value": "Bearer"},
                "scopes": ["openid"]
            },
            "refreshToken": {"tokenValue": "ref", "issuedAt": 100, "expiresAt": null},
            "additionalParameters": {"id_token": "idt"}
        });
        let info: TokenInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(info.access_token.token_value, "tok");
        assert_eq!(info.access_token.scopes, ["openid"]);
        assert_eq!(info.refresh_token.unwrap().token_value, "ref");
    }
}
