//! # sitehub-adapter-holidays-reqwest
//!
//! Holiday calendar adapter using [reqwest](https://docs.rs/reqwest).
//!
//! Fetches French public holidays and school holiday calendars and hands
//! the documents back untouched, so the browser never talks to the
//! government APIs directly.
//!
//! ## Dependency rule
//! Depends on `sitehub-app` (for the port trait) and `sitehub-domain` (for
//! the error type). The `app` and `domain` crates must never reference
//! this adapter.

use std::time::Duration;

use sitehub_app::ports::HolidayProvider;
use sitehub_domain::error::SiteError;

/// Default public holiday endpoint. `{year}` is substituted.
pub const PUBLIC_HOLIDAYS_URL: &str =
    "https://calendrier.api.gouv.fr/jours-feries/metropole/{year}.json";

/// Default school holiday endpoint. `{school_year}` is substituted.
pub const SCHOOL_HOLIDAYS_URL: &str = concat!(
    "https://data.education.gouv.fr/api/records/1.0/search/",
    "?dataset=fr-en-calendrier-scolaire&q=&rows=2000",
    "&refine.annee_scolaire={school_year}",
);

/// Errors raised while talking to a holiday API.
#[derive(Debug, thiserror::Error)]
pub enum HolidayError {
    /// The HTTP client could not be built.
    #[error("unable to build http client")]
    Client(#[source] reqwest::Error),

    /// The request failed or the remote answered with an error status.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HolidayError> for SiteError {
    fn from(err: HolidayError) -> Self {
        tracing::warn!(error = ?err, "holiday api failure");
        Self::Upstream(Box::new(err))
    }
}

/// Endpoints and timeout of the holiday APIs.
#[derive(Debug, Clone)]
pub struct Config {
    pub public_holidays_url: String,
    pub school_holidays_url: String,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            public_holidays_url: PUBLIC_HOLIDAYS_URL.to_string(),
            school_holidays_url: SCHOOL_HOLIDAYS_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    /// Build the HTTP client for these endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`HolidayError::Client`] when the TLS backend cannot be
    /// initialised.
    pub fn build(self) -> Result<ReqwestHolidayProvider, HolidayError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("sitehubd/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HolidayError::Client)?;

        Ok(ReqwestHolidayProvider {
            client,
            public_holidays_url: self.public_holidays_url,
            school_holidays_url: self.school_holidays_url,
        })
    }
}

/// [`HolidayProvider`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestHolidayProvider {
    client: reqwest::Client,
    public_holidays_url: String,
    school_holidays_url: String,
}

impl ReqwestHolidayProvider {
    async fn fetch(&self, url: String) -> Result<serde_json::Value, HolidayError> {
        tracing::debug!(%url, "fetching holidays");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);
        let response = match response {
            Ok(response) => response,
            Err(source) => return Err(HolidayError::Request { url, source }),
        };

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|source| HolidayError::Request { url, source })
    }
}

impl HolidayProvider for ReqwestHolidayProvider {
    async fn public_holidays(&self, year: i32) -> Result<serde_json::Value, SiteError> {
        let url = self
            .public_holidays_url
            .replace("{year}", &year.to_string());
        Ok(self.fetch(url).await?)
    }

    async fn school_holidays(&self, school_year: &str) -> Result<serde_json::Value, SiteError> {
        let url = self
            .school_holidays_url
            .replace("{school_year}", school_year);
        Ok(self.fetch(url).await?)
    }
}
