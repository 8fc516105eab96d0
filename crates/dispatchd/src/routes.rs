//! API routes for dispatchd
//!
//! Handlers are thin: decode, run the workflow on the blocking pool (the
//! store may hit SQLite), encode.

use crate::admin::{
    CitizenInput, CitizenPatch, DepartmentInput, DepartmentPatch, PersonnelInput, PersonnelPatch, StationInput,
    StationPatch, UnitInput, UnitPatch,
};
use crate::api_error::{ApiJson, ApiQuery, ApiResult};
use crate::dispatcher::Dispatcher;
use crate::incidents::{AdvanceRequest, Advancement, IncidentQuery};
use crate::intake::NewAlertRequest;
use crate::referral::{ReferralQuery, ReferralResponse};
use crate::server::AppStateArc;
use crate::triage::{Acceptance, AlertQuery, DeclineRequest, ReferRequest};
use crate::ws;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use dispatch_shared::{
    Citizen, Department, EmergencyAlert, Incident, Personnel, Referral, Result, Station,
    TurnoutSlip, Unit, VersionInfo,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Run a workflow call off the async executor
async fn blocking<T, F>(state: &AppStateArc, f: F) -> ApiResult<T>
where
    F: FnOnce(&Dispatcher) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let dispatcher = state.dispatcher.clone();
    Ok(tokio::task::spawn_blocking(move || f(&dispatcher)).await??)
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: VersionInfo,
    pub uptime_seconds: u64,
    pub store: String,
    pub subscribers: usize,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: VersionInfo::current(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        store: state.dispatcher.store().backend().to_string(),
        subscribers: state.dispatcher.notifier().subscriber_count(),
    })
}

// ============================================================================
// Alert Routes
// ============================================================================

pub fn alert_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/alerts", post(submit_alert).get(list_alerts))
        .route("/v1/alerts/:id", get(get_alert))
        .route("/v1/alerts/:id/accept", post(accept_alert))
        .route("/v1/alerts/:id/decline", post(decline_alert))
        .route("/v1/alerts/:id/refer", post(refer_alert))
}

async fn submit_alert(
    State(state): State<AppStateArc>,
    ApiJson(req): ApiJson<NewAlertRequest>,
) -> ApiResult<(StatusCode, Json<EmergencyAlert>)> {
    info!("  New alert: {}", req.incident_type);
    let alert = blocking(&state, move |d| d.submit_alert(req)).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

async fn list_alerts(
    State(state): State<AppStateArc>,
    ApiQuery(query): ApiQuery<AlertQuery>,
) -> ApiResult<Json<Vec<EmergencyAlert>>> {
    Ok(Json(blocking(&state, move |d| d.list_alerts(&query)).await?))
}

async fn get_alert(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<EmergencyAlert>> {
    Ok(Json(blocking(&state, move |d| d.get_alert(&id)).await?))
}

async fn accept_alert(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Acceptance>> {
    Ok(Json(blocking(&state, move |d| d.accept_alert(&id)).await?))
}

async fn decline_alert(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<DeclineRequest>,
) -> ApiResult<Json<EmergencyAlert>> {
    Ok(Json(
        blocking(&state, move |d| d.decline_alert(&id, req)).await?,
    ))
}

async fn refer_alert(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReferRequest>,
) -> ApiResult<(StatusCode, Json<Referral>)> {
    let referral = blocking(&state, move |d| d.refer_alert(&id, req)).await?;
    Ok((StatusCode::CREATED, Json(referral)))
}

// ============================================================================
// Incident Routes
// ============================================================================

pub fn incident_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/incidents", get(list_incidents))
        .route("/v1/incidents/:id", get(get_incident))
        .route("/v1/incidents/:id/advance", post(advance_incident))
        .route("/v1/incidents/:id/refer", post(refer_incident))
        .route("/v1/incidents/:id/turnout-slip", get(turnout_slip))
}

async fn list_incidents(
    State(state): State<AppStateArc>,
    ApiQuery(query): ApiQuery<IncidentQuery>,
) -> ApiResult<Json<Vec<Incident>>> {
    Ok(Json(blocking(&state, move |d| d.list_incidents(&query)).await?))
}

async fn get_incident(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Incident>> {
    Ok(Json(blocking(&state, move |d| d.get_incident(&id)).await?))
}

async fn advance_incident(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Advancement>> {
    let req = AdvanceRequest::from_body(&body)?;
    Ok(Json(
        blocking(&state, move |d| d.advance_incident(&id, req)).await?,
    ))
}

async fn refer_incident(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReferRequest>,
) -> ApiResult<(StatusCode, Json<Referral>)> {
    let referral = blocking(&state, move |d| {
        d.refer_incident(&id, &req.to_station_id, &req.reason)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(referral)))
}

async fn turnout_slip(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<TurnoutSlip>> {
    Ok(Json(blocking(&state, move |d| d.turnout_slip(&id)).await?))
}

// ============================================================================
// Referral Routes
// ============================================================================

pub fn referral_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/referrals", get(list_referrals))
        .route("/v1/referrals/:id/respond", post(respond_referral))
}

async fn list_referrals(
    State(state): State<AppStateArc>,
    ApiQuery(query): ApiQuery<ReferralQuery>,
) -> ApiResult<Json<Vec<Referral>>> {
    Ok(Json(blocking(&state, move |d| d.list_referrals(&query)).await?))
}

async fn respond_referral(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(resp): ApiJson<ReferralResponse>,
) -> ApiResult<Json<Referral>> {
    Ok(Json(
        blocking(&state, move |d| d.respond_referral(&id, resp)).await?,
    ))
}

// ============================================================================
// Station Routes (stations, departments, units)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StationFilter {
    #[serde(default)]
    pub station_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentFilter {
    #[serde(default)]
    pub department_id: Option<String>,
}

pub fn station_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/stations", post(create_station).get(list_stations))
        .route(
            "/v1/stations/:id",
            get(get_station).patch(update_station).delete(delete_station),
        )
        .route(
            "/v1/departments",
            post(create_department).get(list_departments),
        )
        .route(
            "/v1/departments/:id",
            get(get_department)
                .patch(update_department)
                .delete(delete_department),
        )
        .route("/v1/units", post(create_unit).get(list_units))
        .route(
            "/v1/units/:id",
            get(get_unit).patch(update_unit).delete(delete_unit),
        )
}

async fn create_station(
    State(state): State<AppStateArc>,
    ApiJson(input): ApiJson<StationInput>,
) -> ApiResult<(StatusCode, Json<Station>)> {
    let station = blocking(&state, move |d| d.create_station(input)).await?;
    Ok((StatusCode::CREATED, Json(station)))
}

async fn list_stations(State(state): State<AppStateArc>) -> ApiResult<Json<Vec<Station>>> {
    Ok(Json(blocking(&state, |d| d.list_stations()).await?))
}

async fn get_station(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Station>> {
    Ok(Json(blocking(&state, move |d| d.get_station(&id)).await?))
}

async fn update_station(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<StationPatch>,
) -> ApiResult<Json<Station>> {
    Ok(Json(
        blocking(&state, move |d| d.update_station(&id, patch)).await?,
    ))
}

async fn delete_station(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |d| d.delete_station(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_department(
    State(state): State<AppStateArc>,
    ApiJson(input): ApiJson<DepartmentInput>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    let department = blocking(&state, move |d| d.create_department(input)).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn list_departments(
    State(state): State<AppStateArc>,
    ApiQuery(filter): ApiQuery<StationFilter>,
) -> ApiResult<Json<Vec<Department>>> {
    Ok(Json(
        blocking(&state, move |d| d.list_departments(filter.station_id.as_deref())).await?,
    ))
}

async fn get_department(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Department>> {
    Ok(Json(blocking(&state, move |d| d.get_department(&id)).await?))
}

async fn update_department(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<DepartmentPatch>,
) -> ApiResult<Json<Department>> {
    Ok(Json(
        blocking(&state, move |d| d.update_department(&id, patch)).await?,
    ))
}

async fn delete_department(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |d| d.delete_department(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_unit(
    State(state): State<AppStateArc>,
    ApiJson(input): ApiJson<UnitInput>,
) -> ApiResult<(StatusCode, Json<Unit>)> {
    let unit = blocking(&state, move |d| d.create_unit(input)).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

async fn list_units(
    State(state): State<AppStateArc>,
    ApiQuery(filter): ApiQuery<DepartmentFilter>,
) -> ApiResult<Json<Vec<Unit>>> {
    Ok(Json(
        blocking(&state, move |d| d.list_units(filter.department_id.as_deref())).await?,
    ))
}

async fn get_unit(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Unit>> {
    Ok(Json(blocking(&state, move |d| d.get_unit(&id)).await?))
}

async fn update_unit(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UnitPatch>,
) -> ApiResult<Json<Unit>> {
    Ok(Json(blocking(&state, move |d| d.update_unit(&id, patch)).await?))
}

async fn delete_unit(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |d| d.delete_unit(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// People Routes (citizens, personnel)
// ============================================================================

pub fn people_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/citizens", post(create_citizen).get(list_citizens))
        .route(
            "/v1/citizens/:id",
            get(get_citizen).patch(update_citizen).delete(delete_citizen),
        )
        .route("/v1/personnel", post(create_personnel).get(list_personnel))
        .route(
            "/v1/personnel/:id",
            get(get_personnel)
                .patch(update_personnel)
                .delete(delete_personnel),
        )
}

async fn create_citizen(
    State(state): State<AppStateArc>,
    ApiJson(input): ApiJson<CitizenInput>,
) -> ApiResult<(StatusCode, Json<Citizen>)> {
    let citizen = blocking(&state, move |d| d.create_citizen(input)).await?;
    Ok((StatusCode::CREATED, Json(citizen)))
}

async fn list_citizens(State(state): State<AppStateArc>) -> ApiResult<Json<Vec<Citizen>>> {
    Ok(Json(blocking(&state, |d| d.list_citizens()).await?))
}

async fn get_citizen(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Citizen>> {
    Ok(Json(blocking(&state, move |d| d.get_citizen(&id)).await?))
}

async fn update_citizen(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CitizenPatch>,
) -> ApiResult<Json<Citizen>> {
    Ok(Json(
        blocking(&state, move |d| d.update_citizen(&id, patch)).await?,
    ))
}

async fn delete_citizen(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |d| d.delete_citizen(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_personnel(
    State(state): State<AppStateArc>,
    ApiJson(input): ApiJson<PersonnelInput>,
) -> ApiResult<(StatusCode, Json<Personnel>)> {
    let personnel = blocking(&state, move |d| d.create_personnel(input)).await?;
    Ok((StatusCode::CREATED, Json(personnel)))
}

async fn list_personnel(
    State(state): State<AppStateArc>,
    ApiQuery(filter): ApiQuery<StationFilter>,
) -> ApiResult<Json<Vec<Personnel>>> {
    Ok(Json(
        blocking(&state, move |d| d.list_personnel(filter.station_id.as_deref())).await?,
    ))
}

async fn get_personnel(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<Json<Personnel>> {
    Ok(Json(blocking(&state, move |d| d.get_personnel(&id)).await?))
}

async fn update_personnel(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<PersonnelPatch>,
) -> ApiResult<Json<Personnel>> {
    Ok(Json(
        blocking(&state, move |d| d.update_personnel(&id, patch)).await?,
    ))
}

async fn delete_personnel(
    State(state): State<AppStateArc>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&state, move |d| d.delete_personnel(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Event Stream
// ============================================================================

pub fn event_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/ws", get(ws::event_stream))
}
