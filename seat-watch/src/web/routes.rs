//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{InvalidId, RouteId, StationId, TimeError, Watch, parse_date};
use crate::notify::{ItineraryView, render_all};
use crate::planner::{DiscoveryError, Planner, SeatOracle, TimetableSource};
use crate::regiojet::UpstreamError;
use crate::store::{StoreError, WatchStore};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<U, S>(state: AppState<U, S>) -> Router
where
    U: SeatOracle + TimetableSource + 'static,
    S: WatchStore + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/routes", get(list_routes::<U, S>))
        .route("/watchdog", post(set_watchdog::<U, S>))
        .route("/constants", get(constants::<U, S>))
        .route("/allSegments", get(all_segments::<U, S>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Bookable connections between two stations on a date.
async fn list_routes<U, S>(
    State(state): State<AppState<U, S>>,
    Query(req): Query<RoutesQuery>,
) -> Result<Json<Vec<OfferResult>>, AppError>
where
    U: SeatOracle + TimetableSource + 'static,
    S: WatchStore + 'static,
{
    let from = StationId::parse(&req.station_from_id)?;
    let to = StationId::parse(&req.station_to_id)?;
    let date = parse_date(&req.departure_date)?;

    let offers = state.upstream.search_routes(from, to, date).await?;

    Ok(Json(offers.iter().map(OfferResult::from_offer).collect()))
}

/// Register a watch that lasts until the train departs.
async fn set_watchdog<U, S>(
    State(state): State<AppState<U, S>>,
    Json(req): Json<WatchdogRequest>,
) -> Result<Json<WatchdogResponse>, AppError>
where
    U: SeatOracle + TimetableSource + 'static,
    S: WatchStore + 'static,
{
    let from = StationId::parse(&req.station_from_id)?;
    let to = StationId::parse(&req.station_to_id)?;
    let route = RouteId::parse(&req.route_id)?;

    let watch = Watch::new(req.webhook_url.trim(), from, to, route).map_err(|e| {
        AppError::BadRequest {
            message: format!("webhookURL: {e}"),
        }
    })?;

    let details = state.upstream.route_details(route, from, to).await?;
    let departure = details.departure.ok_or_else(|| AppError::Upstream {
        message: format!("route {route} has no readable departure time"),
    })?;

    let expires_at = departure.with_timezone(&Utc);
    if expires_at <= Utc::now() {
        return Err(AppError::BadRequest {
            message: format!("route {route} has already departed"),
        });
    }

    let key = state.store.insert(&watch, expires_at).await?;

    info!(watch = %key, %route, %from, %to, %expires_at, "watch registered");

    Ok(Json(WatchdogResponse {
        message: "Watchdog set successfully.".to_string(),
        key: key.to_string(),
    }))
}

/// Station id → name map.
async fn constants<U, S>(State(state): State<AppState<U, S>>) -> Json<BTreeMap<String, String>>
where
    U: SeatOracle + TimetableSource + 'static,
    S: WatchStore + 'static,
{
    let names = state.names.snapshot().await;

    Json(
        names
            .iter()
            .map(|(id, name)| (id.to_string(), name.clone()))
            .collect(),
    )
}

/// Seat-change alternatives for one route, rendered.
async fn all_segments<U, S>(
    State(state): State<AppState<U, S>>,
    Query(req): Query<SegmentsQuery>,
) -> Result<Json<Vec<ItineraryView>>, AppError>
where
    U: SeatOracle + TimetableSource + 'static,
    S: WatchStore + 'static,
{
    let from = StationId::parse(&req.station_from_id)?;
    let to = StationId::parse(&req.station_to_id)?;
    let route = RouteId::parse(&req.route_id)?;
    let date = parse_date(&req.departure_date)?;

    let upstream = state.upstream.as_ref();
    let planner = Planner::new(upstream, upstream, &state.config);
    let itineraries = planner.find_alternatives(route, from, to, date).await?;

    let names = state.names.snapshot().await;
    Ok(Json(render_all(&itineraries, &names)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
}

impl From<InvalidId> for AppError {
    fn from(e: InvalidId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TimeError> for AppError {
    fn from(e: TimeError) -> Self {
        AppError::BadRequest {
            message: format!("invalid departureDate: {e}"),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl From<DiscoveryError> for AppError {
    fn from(e: DiscoveryError) -> Self {
        match e {
            DiscoveryError::OriginNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExpired(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            StoreError::Unavailable(_) => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(status = status.as_u16(), error = %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
