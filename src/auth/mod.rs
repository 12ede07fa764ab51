//! Authentication for the Bitbucket REST API
//!
//! Supports environment variables and the config file. Environment wins.

use crate::config::BitbucketConfig;
use crate::error::{Error, Result};
use tracing::debug;

/// Source of authentication credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Credentials from the config file
    ConfigFile,
    /// Credentials from environment variables
    EnvVar,
}

/// Basic-auth credentials for Bitbucket
#[derive(Clone)]
pub struct BitbucketAuth {
    /// Account name
    pub username: String,
    /// App password
    pub app_password: String,
    /// Where the password came from
    pub source: AuthSource,
}

impl std::fmt::Debug for BitbucketAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitbucketAuth")
            .field("username", &self.username)
            .field("app_password", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve Bitbucket credentials from the environment and `config`
pub fn get_bitbucket_auth(config: &BitbucketConfig) -> Result<BitbucketAuth> {
    resolve_bitbucket_auth(config, |key| std::env::var(key).ok())
}

/// Resolve Bitbucket credentials, reading variables through `lookup`
pub fn resolve_bitbucket_auth(
    config: &BitbucketConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BitbucketAuth> {
    let from_env = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let username = from_env("BITBUCKET_USERNAME")
        .or_else(|| config.username.clone())
        .ok_or_else(|| Error::Auth("missing Bitbucket user".to_string()))?;

    let (app_password, source) = match from_env("BITBUCKET_APP_PASSWORD") {
        Some(p) => (p, AuthSource::EnvVar),
        None => (
            config
                .app_password
                .clone()
                .ok_or_else(|| Error::Auth("missing Bitbucket app password".to_string()))?,
            AuthSource::ConfigFile,
        ),
    };

    debug!(username = %username, ?source, "resolved Bitbucket credentials");
    Ok(BitbucketAuth {
        username,
        app_password,
        source,
    })
}
