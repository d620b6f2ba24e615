//! Schedule resource request: routing query string and form body.

use serde::Serialize;
use url::Url;

use crate::domain::CommuterNetwork;

use super::token::{AuthToken, TOKEN_PARAM};

/// Portlet that serves station schedules.
pub const PORTLET_ID: &str = "servicios_estacion_ServiciosEstacionPortlet";

/// Resource id of the "consult timetable" action.
pub const RESOURCE_ID: &str = "/consultarHorario";

/// Asset entry the schedule portlet is registered under.
pub const DEFAULT_ASSET_ENTRY_ID: &str = "3127062";

/// Build the schedule resource URL from a landing-page URL.
///
/// The routing parameters are fixed; only the asset entry and the token
/// vary. Values are URL-safe, so they're written verbatim (the resource id
/// keeps its literal `/`).
pub fn resource_url(landing: &Url, asset_entry_id: &str, token: &AuthToken) -> Url {
    let params = [
        ("p_p_id", PORTLET_ID),
        ("p_p_lifecycle", "2"),
        ("p_p_state", "normal"),
        ("p_p_mode", "view"),
        ("p_p_resource_id", RESOURCE_ID),
        ("p_p_cacheability", "cacheLevelPage"),
        ("assetEntryId", asset_entry_id),
        (TOKEN_PARAM, token.as_str()),
    ];

    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut url = landing.clone();
    url.set_query(Some(&query));
    url
}

/// Form body of the schedule POST.
///
/// Exactly five fields, namespaced with the portlet id the way the portal's
/// own forms submit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleForm<'a> {
    #[serde(rename = "_servicios_estacion_ServiciosEstacionPortlet_searchType")]
    search_type: &'static str,

    #[serde(rename = "_servicios_estacion_ServiciosEstacionPortlet_trafficType")]
    traffic_type: &'static str,

    #[serde(rename = "_servicios_estacion_ServiciosEstacionPortlet_numPage")]
    num_page: u32,

    #[serde(rename = "_servicios_estacion_ServiciosEstacionPortlet_commuterNetwork")]
    commuter_network: &'a str,

    #[serde(rename = "_servicios_estacion_ServiciosEstacionPortlet_stationCode")]
    station_code: &'a str,
}

impl<'a> ScheduleForm<'a> {
    /// Next commuter-rail departures, first page.
    pub fn next_departures(station_code: &'a str, network: &'a CommuterNetwork) -> Self {
        Self {
            search_type: "proximasSalidas",
            traffic_type: "cercanias",
            num_page: 0,
            commuter_network: network.as_str(),
            station_code,
        }
    }
}
