use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use ulid::Ulid;

use crate::engine::{Engine, EngineError, LocationFilter};
use crate::model::{Reservation, TimeWindow, Verdict, VerdictReason};
use crate::observability;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

pub fn build_router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/rooms", get(search_rooms))
        .route("/api/rooms/:id/reservations", get(room_reservations))
        .route("/api/reservations", post(create_reservation))
        .route("/api/reservations/:id", delete(cancel_reservation))
        .layer(cors_layer())
        .with_state(AppState { engine })
}

/// The browser UIs are served from other origins; keep CORS permissive.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn healthz() -> &'static str {
    "ok"
}

// ── Search ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub location: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

async fn search_rooms(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Verdict>>, ApiError> {
    let started = Instant::now();
    let window = parse_window_params(&state, &params)?;
    let mode = if window.is_some() { "window" } else { "browse" };
    let filter = LocationFilter::parse(params.location.as_deref());

    let verdicts = state.engine.search(filter, window).await;

    metrics::counter!(observability::SEARCHES_TOTAL, "mode" => mode).increment(1);
    metrics::histogram!(observability::SEARCH_DURATION_SECONDS)
        .record(started.elapsed().as_secs_f64());
    Ok(Json(verdicts))
}

/// A browse query carries no time fields at all; once any is present the
/// whole triple goes through the validator.
fn parse_window_params(
    state: &AppState,
    params: &SearchParams,
) -> Result<Option<TimeWindow>, ApiError> {
    if params.date.is_none() && params.start_time.is_none() && params.end_time.is_none() {
        return Ok(None);
    }
    let date = parse_date_param(params.date.as_deref())?;
    let start = parse_time_param(params.start_time.as_deref(), "startTime")?;
    let end = parse_time_param(params.end_time.as_deref(), "endTime")?;
    let now = chrono::Local::now().naive_local();
    let window = state.engine.validate_window(date, start, end, now)?;
    Ok(Some(window))
}

// ── Booking ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub room_id: Ulid,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

async fn create_reservation(
    State(state): State<AppState>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let date = parse_date_param(req.date.as_deref())?;
    let start = parse_time_param(req.start_time.as_deref(), "startTime")?;
    let end = parse_time_param(req.end_time.as_deref(), "endTime")?;
    let now = chrono::Local::now().naive_local();

    let outcome = match state.engine.validate_window(date, start, end, now) {
        Ok(window) => state.engine.book(req.room_id, window).await,
        Err(e) => Err(e),
    };
    let status_label = match &outcome {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::counter!(observability::BOOKINGS_TOTAL, "status" => status_label).increment(1);

    let reservation = outcome?;
    info!(
        "booked room {} on {} [{}, {})",
        reservation.room_id,
        reservation.window.date(),
        reservation.window.start(),
        reservation.window.end()
    );
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<Ulid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room_id = state.engine.cancel(id).await?;
    metrics::counter!(observability::CANCELLATIONS_TOTAL).increment(1);
    info!("cancelled reservation {id}");
    Ok(Json(serde_json::json!({
        "reservationId": id.to_string(),
        "roomId": room_id.to_string(),
    })))
}

async fn room_reservations(
    State(state): State<AppState>,
    Path(id): Path<Ulid>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    Ok(Json(state.engine.reservations_for_room(id).await?))
}

// ── Parameter parsing ───────────────────────────────────────────

fn parse_date_param(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::BadField("date")),
    }
}

/// HTML time inputs send `HH:MM`; accept `HH:MM:SS` too.
fn parse_time_param(raw: Option<&str>, field: &'static str) -> Result<Option<NaiveTime>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Some)
            .map_err(|_| ApiError::BadField(field)),
    }
}

// ── Errors ──────────────────────────────────────────────────────

/// Adapter-level error: an engine error, or a field that failed to parse
/// before reaching the engine.
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    BadField(&'static str),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<VerdictReason>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadField(field) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("malformed field: {field}"),
                    reason: None,
                },
            ),
            ApiError::Engine(e) => (
                status_for(&e),
                ErrorBody {
                    error: e.to_string(),
                    reason: e.verdict_reason(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Conflict and maintenance both map to 409 but carry distinct `reason`
/// labels, so a UI can suggest "try another time" vs "try another room".
fn status_for(e: &EngineError) -> StatusCode {
    match e {
        EngineError::MissingField(_)
        | EngineError::PastDate
        | EngineError::PastTime
        | EngineError::InvalidRange
        | EngineError::OutsideOperatingHours => StatusCode::BAD_REQUEST,
        EngineError::RoomNotFound(_) | EngineError::ReservationNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        EngineError::AlreadyExists(_)
        | EngineError::Maintenance(_)
        | EngineError::Conflict(_) => StatusCode::CONFLICT,
    }
}
