//! ADIF portal client.
//!
//! Fetches station schedules by replaying the portal's own page flow:
//! load the station page to obtain a token and session cookies, then POST
//! the schedule form to the portlet resource endpoint.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::domain::CommuterNetwork;
use crate::stations::StationPage;

use super::error::AdifError;
use super::form::{DEFAULT_ASSET_ENTRY_ID, ScheduleForm, resource_url};
use super::session::Session;
use super::token::TokenChain;

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://www.adif.es";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Browser User-Agent sent on every upstream call.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const DEFAULT_ACCEPT_LANGUAGE: &str = "es-ES,es;q=0.9,en;q=0.8";

/// How the upstream JSON is handed back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseShape {
    /// Pass the decoded body through untouched.
    #[default]
    Raw,
    /// Return only the top-level `horarios` field.
    Horarios,
}

impl ResponseShape {
    /// Apply the shape to a decoded upstream body.
    pub fn apply(self, body: Value) -> Result<Value, AdifError> {
        match self {
            ResponseShape::Raw => Ok(body),
            ResponseShape::Horarios => match body {
                Value::Object(mut map) => {
                    map.remove("horarios")
                        .ok_or_else(|| AdifError::UpstreamFormat {
                            message: "response has no horarios field".to_string(),
                            body: None,
                        })
                }
                _ => Err(AdifError::UpstreamFormat {
                    message: "expected a JSON object".to_string(),
                    body: None,
                }),
            },
        }
    }
}

impl FromStr for ResponseShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(ResponseShape::Raw),
            "horarios" => Ok(ResponseShape::Horarios),
            other => Err(format!("unknown response shape '{other}' (expected raw or horarios)")),
        }
    }
}

/// Configuration for the ADIF client.
#[derive(Debug, Clone)]
pub struct AdifConfig {
    /// Site root (defaults to production ADIF)
    pub base_url: String,
    /// Per-call timeout in seconds, applied to the GET and the POST separately
    pub timeout_secs: u64,
    /// User-Agent header value
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// `assetEntryId` routing parameter
    pub asset_entry_id: String,
    /// Shape of successful responses
    pub shape: ResponseShape,
}

impl AdifConfig {
    /// Create a config pointing at production ADIF.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            asset_entry_id: DEFAULT_ASSET_ENTRY_ID.to_string(),
            shape: ResponseShape::Raw,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the response shape.
    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.shape = shape;
        self
    }
}

impl Default for AdifConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// ADIF schedule client.
///
/// Holds configuration only. Each call to [`AdifClient::departures`] opens
/// its own [`Session`], so the client can be shared freely across requests.
#[derive(Debug, Clone)]
pub struct AdifClient {
    config: AdifConfig,
    base_url: Url,
    locators: Arc<TokenChain>,
}

impl AdifClient {
    /// Create a new client with the standard token locators.
    pub fn new(config: AdifConfig) -> Result<Self, AdifError> {
        Self::with_locators(config, TokenChain::standard())
    }

    /// Create a client with a custom locator chain.
    pub fn with_locators(config: AdifConfig, locators: TokenChain) -> Result<Self, AdifError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AdifError::Client(format!("invalid base URL {}: {e}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(AdifError::Client(format!(
                "base URL {} cannot be a base",
                config.base_url
            )));
        }

        Ok(Self {
            config,
            base_url,
            locators: Arc::new(locators),
        })
    }

    /// Landing page for a station: `<base>/w/<path>`.
    pub fn landing_url(&self, page: &StationPage) -> Result<Url, AdifError> {
        let root = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{root}/w/{}", page.path()))
            .map_err(|e| AdifError::Client(format!("invalid landing URL: {e}")))
    }

    /// Fetch the next commuter departures for a station.
    ///
    /// Performs one GET (token) and one POST (schedule) in a fresh session.
    /// Nothing is retried or cached.
    pub async fn departures(
        &self,
        page: &StationPage,
        network: &CommuterNetwork,
    ) -> Result<Value, AdifError> {
        let landing = self.landing_url(page)?;
        let session = Session::open(&self.config)?;

        debug!(%landing, "acquiring token");
        let token = session.acquire_token(&landing, &self.locators).await?;

        let resource = resource_url(&landing, &self.config.asset_entry_id, &token);
        let form = ScheduleForm::next_departures(page.code(), network);
        let body = session.fetch_schedule(resource, &landing, &form).await?;

        info!(station = page.code(), %network, "schedule fetched");
        self.config.shape.apply(body)
    }
}
