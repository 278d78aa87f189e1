//! Orchestrator connection settings.
//!
//! The configuration is built once at startup and handed to every proxy
//! component; nothing reads the process environment after that.

use std::fmt;

/// Environment variable holding the orchestrator base address.
pub const BASE_URL_VAR: &str = "BACKEND_BASE_URL";

/// Environment variable holding the static API token.
pub const AUTH_TOKEN_VAR: &str = "API_AUTH_TOKEN";

/// Where the orchestrator lives and how to authenticate against it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Option<String>,
    auth_token: Option<String>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BackendConfig {
    /// Build a configuration from optional values.
    ///
    /// Blank strings count as absent and a trailing `/` on the base address
    /// is dropped.
    pub fn new(base_url: Option<String>, auth_token: Option<String>) -> Self {
        Self {
            base_url: non_blank(base_url).map(|url| url.trim_end_matches('/').to_string()),
            auth_token: non_blank(auth_token),
        }
    }

    /// Read `BACKEND_BASE_URL` and `API_AUTH_TOKEN`, loading `.env` first if
    /// one is present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::new(lookup(BASE_URL_VAR), lookup(AUTH_TOKEN_VAR))
    }

    /// Apply command-line values on top; `None` keeps the current value.
    pub fn overridden(self, base_url: Option<String>, auth_token: Option<String>) -> Self {
        let config = match base_url {
            Some(url) => self.with_base_url(url),
            None => self,
        };
        match auth_token {
            Some(token) => config.with_auth_token(token),
            None => config,
        }
    }

    /// Override the base address.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = non_blank(Some(url.into())).map(|u| u.trim_end_matches('/').to_string());
        self
    }

    /// Override the token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = non_blank(Some(token.into()));
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Token value for the `x-api-token` header; empty when unset.
    pub fn auth_token(&self) -> &str {
        self.auth_token.as_deref().unwrap_or_default()
    }

    pub fn has_auth_token(&self) -> bool {
        self.auth_token.is_some()
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
