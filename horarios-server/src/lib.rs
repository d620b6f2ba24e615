//! ADIF station schedule proxy.
//!
//! ADIF publishes no public departures API. This server answers
//! `GET /api/horarios?codigo=<station>` by loading the station's page on
//! the ADIF portal, lifting the session token out of the HTML and replaying
//! the portal's own schedule request, returning its JSON.

pub mod adif;
pub mod config;
pub mod domain;
pub mod stations;
pub mod web;
