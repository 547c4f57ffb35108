//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API (default: <http://localhost:8080/api>).
    pub api_base_url: String,

    /// Outbound request timeout in seconds (default: 30).
    pub api_timeout_secs: u64,

    /// Path of the sign-in entry point (default: /sign-in).
    pub sign_in_path: String,

    /// OAuth client id presented on the token endpoint (default: test).
    pub oauth_client_id: String,

    /// OAuth client secret presented on the token endpoint (default: test).
    pub oauth_client_secret: String,

    /// Where to persist the credential between runs. When None, credentials
    /// live in memory only and a restart signs the user out.
    pub credentials_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_base_url = env::var("ATRIUM_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let api_timeout_secs = env::var("ATRIUM_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("ATRIUM_API_TIMEOUT_SECS must be a valid u64")?;

        let sign_in_path =
            env::var("ATRIUM_SIGN_IN_PATH").unwrap_or_else(|_| "/sign-in".to_string());

        let oauth_client_id =
            env::var("ATRIUM_OAUTH_CLIENT_ID").unwrap_or_else(|_| "test".to_string());

        let oauth_client_secret =
            env::var("ATRIUM_OAUTH_CLIENT_SECRET").unwrap_or_else(|_| "test".to_string());

        let credentials_file = env::var("ATRIUM_CREDENTIALS_FILE").map(PathBuf::from).ok();

        Ok(Self {
            api_base_url,
            api_timeout_secs,
            sign_in_path,
            oauth_client_id,
            oauth_client_secret,
            credentials_file,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            api_timeout_secs: 30,
            sign_in_path: "/sign-in".to_string(),
            oauth_client_id: "test".to_string(),
            oauth_client_secret: "test".to_string(),
            credentials_file: None,
        }
    }
}
