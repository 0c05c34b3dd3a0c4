use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::catalog::Credential;

/// Host configuration loaded from environment variables.
/// Startup fails if the backend URL or credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub credential: Credential,
    pub port: u16,
    pub rust_log: String,
    pub report_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let api_base_url = Url::parse(&require("API_BASE_URL")?)
            .context("API_BASE_URL must be an absolute URL")?;
        if api_base_url.cannot_be_a_base() {
            bail!("API_BASE_URL must be a hierarchical http(s) URL");
        }

        let credential = match (
            get("API_TOKEN"),
            get("FEDERATED_ID_TOKEN"),
            get("FEDERATED_PROVIDER"),
        ) {
            (Some(_), Some(_), _) => {
                bail!("Set either API_TOKEN or FEDERATED_ID_TOKEN, not both")
            }
            (Some(token), None, _) => Credential::OpaqueToken(token),
            (None, Some(id_token), Some(provider)) => {
                Credential::FederatedIdentity { provider, id_token }
            }
            (None, Some(_), None) => {
                bail!("FEDERATED_PROVIDER is required when FEDERATED_ID_TOKEN is set")
            }
            (None, None, _) => {
                bail!("Required environment variable 'API_TOKEN' (or 'FEDERATED_ID_TOKEN') is not set")
            }
        };

        Ok(Config {
            api_base_url,
            credential,
            port: get("PORT")
                .unwrap_or_else(|| "8090".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            report_dir: get("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("reports")),
            request_timeout: Duration::from_secs(
                get("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}
