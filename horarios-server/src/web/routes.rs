//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::adif::AdifError;
use crate::domain::{CommuterNetwork, StationCode};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/horarios", get(horarios_by_query))
        .route("/api/horarios/", get(horarios_without_codigo))
        .route("/api/horarios/:codigo", get(horarios_by_path))
        .route("/api/estaciones", get(list_stations))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// `GET /api/horarios?codigo=<station>&red=<network>`
async fn horarios_by_query(
    State(state): State<AppState>,
    Query(req): Query<HorariosQuery>,
) -> Result<Json<Value>, AppError> {
    let codigo = req
        .codigo
        .as_deref()
        .ok_or_else(|| AdifError::InvalidInput("missing codigo parameter".to_string()))?;

    fetch_schedule(&state, codigo, req.red.as_deref()).await
}

/// `GET /api/horarios/<station>?red=<network>`
async fn horarios_by_path(
    State(state): State<AppState>,
    Path(codigo): Path<String>,
    Query(req): Query<HorariosQuery>,
) -> Result<Json<Value>, AppError> {
    fetch_schedule(&state, &codigo, req.red.as_deref()).await
}

/// `GET /api/horarios/` with an empty station segment.
async fn horarios_without_codigo() -> Result<Json<Value>, AppError> {
    Err(AdifError::InvalidInput("missing station code".to_string()).into())
}

/// Validate the request, then run the GET+POST pair upstream.
///
/// Validation happens before any network call.
async fn fetch_schedule(
    state: &AppState,
    codigo: &str,
    red: Option<&str>,
) -> Result<Json<Value>, AppError> {
    let station = StationCode::parse(codigo).map_err(AdifError::from)?;

    let network = match red.filter(|r| !r.trim().is_empty()) {
        Some(red) => CommuterNetwork::parse(red).map_err(AdifError::from)?,
        None => state.default_network.clone(),
    };

    let page = state.stations.resolve(&station, state.unmapped)?;
    let body = state.adif.departures(&page, &network).await?;

    Ok(Json(body))
}

/// List the station slug table.
async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationEntry>> {
    let entries = state
        .stations
        .entries()
        .into_iter()
        .map(|(codigo, slug)| StationEntry {
            codigo: codigo.to_string(),
            slug: slug.to_string(),
        })
        .collect();

    Json(entries)
}

/// Application error type.
#[derive(Debug)]
pub struct AppError(pub AdifError);

impl From<AdifError> for AppError {
    fn from(e: AdifError) -> Self {
        AppError(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AdifError::InvalidInput(_) | AdifError::UnmappedStation { .. } => {
                StatusCode::BAD_REQUEST
            }
            AdifError::TokenAcquisition { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AdifError::UpstreamHttp { .. }
            | AdifError::UpstreamFormat { .. }
            | AdifError::Network(_) => StatusCode::BAD_GATEWAY,
            AdifError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<ErrorDetails> {
        match &self.0 {
            AdifError::UpstreamHttp { status, body } => Some(ErrorDetails {
                status: Some(*status),
                body: Some(body.clone()).filter(|b| !b.is_empty()),
            }),
            AdifError::UpstreamFormat {
                body: Some(body), ..
            } => Some(ErrorDetails {
                status: None,
                body: Some(body.clone()),
            }),
            AdifError::Network(e) => e.status().map(|status| ErrorDetails {
                status: Some(status.as_u16()),
                body: None,
            }),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.0.kind();
        let message = self.0.to_string();

        if status.is_server_error() && status != StatusCode::INTERNAL_SERVER_ERROR {
            warn!(%status, kind, "{message}");
        } else if status.is_server_error() {
            error!(%status, kind, "{message}");
        } else {
            warn!(%status, kind, "rejected request: {message}");
        }

        let body = Json(ErrorResponse {
            error: true,
            kind: kind.to_string(),
            details: self.details(),
            message,
        });
        (status, body).into_response()
    }
}
