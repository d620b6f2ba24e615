//! Per-request upstream session.
//!
//! A [`Session`] owns the cookie jar and connection pool for exactly one
//! inbound request: the landing-page GET sets cookies that the schedule POST
//! must replay. Sessions are never shared or reused; dropping one releases
//! its client.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::client::AdifConfig;
use super::error::{AdifError, excerpt};
use super::form::ScheduleForm;
use super::token::{AuthToken, TokenChain};

/// Accept header for the landing page, as a browser would send it.
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Accept header for the schedule resource.
const JSON_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Stands in for an error body that failed to arrive.
const UNREADABLE_BODY: &str = "<unreadable body>";

/// One inbound request's view of the upstream portal.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
}

impl Session {
    /// Open a fresh session with its own cookie store.
    pub fn open(config: &AdifConfig) -> Result<Self, AdifError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(HTML_ACCEPT));

        let accept_language = HeaderValue::from_str(&config.accept_language)
            .map_err(|_| AdifError::Client("invalid Accept-Language value".to_string()))?;
        headers.insert(header::ACCEPT_LANGUAGE, accept_language);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdifError::Client(e.to_string()))?;

        debug!("upstream session opened");
        Ok(Self { http })
    }

    /// GET the landing page and extract its `p_p_auth` token.
    ///
    /// Any failure, including a page without a token, is reported as
    /// [`AdifError::TokenAcquisition`].
    pub async fn acquire_token(
        &self,
        landing: &Url,
        locators: &TokenChain,
    ) -> Result<AuthToken, AdifError> {
        let response = self
            .http
            .get(landing.clone())
            .send()
            .await
            .map_err(|e| AdifError::token(format!("landing page request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%landing, status = status.as_u16(), "landing page returned error status");
            return Err(AdifError::token(format!(
                "landing page returned HTTP {}",
                status.as_u16()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AdifError::token(format!("failed to read landing page: {e}")))?;

        match locators.locate(&html) {
            Some((token, strategy)) => {
                debug!(strategy, token_len = token.as_str().len(), "token located");
                Ok(token)
            }
            None => {
                warn!(%landing, strategies = ?locators.names(), "no token in landing page");
                Err(AdifError::token("no p_p_auth token in landing page"))
            }
        }
    }

    /// POST the schedule form and decode the JSON answer.
    pub async fn fetch_schedule(
        &self,
        resource: Url,
        landing: &Url,
        form: &ScheduleForm<'_>,
    ) -> Result<Value, AdifError> {
        let origin = landing.origin().ascii_serialization();

        let response = self
            .http
            .post(resource)
            .header(header::ACCEPT, JSON_ACCEPT)
            .header(header::REFERER, landing.as_str())
            .header(header::ORIGIN, origin)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(form)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            warn!(status = status.as_u16(), "schedule endpoint returned error status");
            return Err(AdifError::UpstreamHttp {
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;

        if let Some(content_type) = content_type
            && !content_type.to_ascii_lowercase().contains("json")
        {
            return Err(AdifError::UpstreamFormat {
                message: format!("expected JSON, got {content_type}"),
                body: Some(excerpt(&body)),
            });
        }

        serde_json::from_str(&body).map_err(|e| AdifError::UpstreamFormat {
            message: e.to_string(),
            body: Some(excerpt(&body)),
        })
    }
}

/// Excerpt of an error answer's body, or a marker when it could not be read.
fn error_body(body: reqwest::Result<String>) -> String {
    match body {
        Ok(body) => excerpt(&body),
        Err(e) => {
            debug!(error = %e.without_url(), "could not read error body");
            UNREADABLE_BODY.to_string()
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("upstream session closed");
    }
}
