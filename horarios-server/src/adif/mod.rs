//! ADIF web portal adapter.
//!
//! ADIF publishes no schedule API, so this module drives the public site
//! the way a browser does:
//! - GET the station landing page (`/w/<station>`) and pull the ephemeral
//!   `p_p_auth` token out of the HTML
//! - POST the schedule form to the station's portlet resource endpoint
//!   with that token and the session cookies from the GET
//!
//! Tokens are session-scoped and short-lived, so every request does a fresh
//! GET+POST pair in its own [`Session`].

mod client;
mod error;
mod form;
mod session;
mod token;

pub use client::{AdifClient, AdifConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ResponseShape};
pub use error::{AdifError, EXCERPT_CHARS, excerpt};
pub use form::{DEFAULT_ASSET_ENTRY_ID, PORTLET_ID, RESOURCE_ID, ScheduleForm, resource_url};
pub use session::Session;
pub use token::{
    AnchorHrefLocator, AuthToken, HiddenInputLocator, QueryFragmentLocator, TOKEN_PARAM,
    TokenChain, TokenLocator,
};
