//! Runtime settings for the CLI, resolved from flags and the environment.

use std::path::PathBuf;

use time::Date;

use crate::{
    Error,
    client::ApiClient,
    month::YearMonth,
    timezone::{current_month, today},
    token::{TokenStore, default_token_path},
};

/// The API the CLI talks to when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// The time zone used for "this month" and "today" when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Where the API lives, where the token is kept and which time zone the user
/// is in.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The API base URL.
    pub api_url: String,
    /// The file the bearer token is stored in.
    pub token_path: PathBuf,
    /// A canonical IANA time zone name, e.g. "America/Santiago".
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            token_path: default_token_path(),
            timezone: DEFAULT_TIMEZONE.to_owned(),
        }
    }
}

impl Config {
    /// The token store at [Config::token_path].
    pub fn token_store(&self) -> TokenStore {
        TokenStore::new(&self.token_path)
    }

    /// A client without a token, for logging in and registering.
    pub fn client(&self) -> Result<ApiClient, Error> {
        ApiClient::new(&self.api_url)
    }

    /// A client carrying the stored token.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotLoggedIn] if no token has been stored.
    pub fn authenticated_client(&self) -> Result<ApiClient, Error> {
        let token = self.token_store().load()?.ok_or(Error::NotLoggedIn)?;

        Ok(self.client()?.with_token(token))
    }

    /// The current month in the configured time zone.
    pub fn current_month(&self) -> Result<YearMonth, Error> {
        current_month(&self.timezone)
    }

    /// Today's date in the configured time zone.
    pub fn today(&self) -> Result<Date, Error> {
        today(&self.timezone)
    }
}
