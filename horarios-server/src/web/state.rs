//! Application state for the web layer.

use std::sync::Arc;

use crate::adif::AdifClient;
use crate::domain::CommuterNetwork;
use crate::stations::{StationSlugs, UnmappedPolicy};

/// Shared application state.
///
/// Everything here is read-only while serving; per-request upstream state
/// lives in the session each request opens.
#[derive(Clone)]
pub struct AppState {
    /// ADIF portal client
    pub adif: Arc<AdifClient>,

    /// Station code → slug table
    pub stations: Arc<StationSlugs>,

    /// Network used when the request has no `red` parameter
    pub default_network: CommuterNetwork,

    /// Handling of codes missing from the slug table
    pub unmapped: UnmappedPolicy,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        adif: AdifClient,
        stations: StationSlugs,
        default_network: CommuterNetwork,
        unmapped: UnmappedPolicy,
    ) -> Self {
        Self {
            adif: Arc::new(adif),
            stations: Arc::new(stations),
            default_network,
            unmapped,
        }
    }
}
