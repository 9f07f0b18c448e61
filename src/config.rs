//! Client configuration.
//!
//! A [`Config`] carries everything the client needs to talk to the API: the base URL and the
//! account credentials sent with every request as HTTP Basic authentication. It is consumed at
//! client construction and never mutated afterwards.

use snafu::{OptionExt, ResultExt, Snafu};
use std::fmt;
use url::Url;

/// Production endpoint of the Esendex REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.esendex.com/";

pub const USERNAME_VAR: &str = "ESENDEX_USERNAME";
pub const PASSWORD_VAR: &str = "ESENDEX_PASSWORD";
pub const BASE_URL_VAR: &str = "ESENDEX_BASE_URL";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("environment variable '{name}' is not set"))]
    MissingVariable { name: String },

    #[snafu(display("invalid base URL '{value}'"))]
    InvalidBaseUrl {
        source: url::ParseError,
        value: String,
    },
}

/// Immutable connection settings for an [`Esendex`](crate::Esendex) client.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    base_url: Url,
    username: String,
    password: String,
}

impl Config {
    /// Create a configuration pointing at the production endpoint.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Override the base URL, e.g. to point at a local test server.
    ///
    /// Request paths are appended beneath the URL's path, so `http://proxy/esendex` and
    /// `http://proxy/esendex/` behave the same.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Load the configuration from `ESENDEX_USERNAME`, `ESENDEX_PASSWORD` and the optional
    /// `ESENDEX_BASE_URL`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`], resolving variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .context(MissingVariableSnafu { name })
        };

        let config = Self::new(required(USERNAME_VAR)?, required(PASSWORD_VAR)?);

        match lookup(BASE_URL_VAR).filter(|value| !value.is_empty()) {
            Some(value) => {
                let base_url = Url::parse(&value).context(InvalidBaseUrlSnafu { value })?;
                Ok(config.with_base_url(base_url))
            }
            None => Ok(config),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}
