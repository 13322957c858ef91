use axum::{
    Router,
    extract::{Json, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    ChildSpec, ChildcareOutcome, ChildcareRequest, CommuteComparison, CommuteRequest, DataError,
    DataSet, DrivingOption, NATIONAL_REGION, TableVersion, TransitOption, WorkSchedule, compare,
    run_childcare,
};

const DEFAULT_HOURLY_WAGE: f64 = 15.0;
const DEFAULT_HOURS_PER_WEEK: f64 = 40.0;
const DEFAULT_DAYS_PER_WEEK: u32 = 5;
const DEFAULT_AGE_BAND: &str = "infant";
const DEFAULT_CARE_SETTING: &str = "center";
const DEFAULT_VEHICLE_CLASS: &str = "medium_sedan";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Data(DataError::UnknownCostKey { .. }) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("data error while serving request: {self}");
        } else {
            warn!("rejected request: {self}");
        }
        error_response(status, &self.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChildPayload {
    age_band: Option<String>,
    care_setting: Option<String>,
}

/// Form state sent by the childcare page; absent keys take defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChildcarePayload {
    region: Option<String>,
    children: Option<Vec<ChildPayload>>,
    hourly_wage: Option<f64>,
    hours_per_week: Option<f64>,
    days_per_week: Option<i64>,
    use_pre_tax_account: Option<bool>,
    sweep: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CommutePayload {
    region: Option<String>,
    hourly_wage: Option<f64>,
    hours_per_week: Option<f64>,
    days_per_week: Option<i64>,
    vehicle_class: Option<String>,
    round_trip_miles: Option<f64>,
    daily_parking: Option<f64>,
    daily_tolls: Option<f64>,
    drive_minutes: Option<f64>,
    transit_minutes: Option<f64>,
    monthly_pass: Option<f64>,
    use_pre_tax_account: Option<bool>,
    sweep: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TablesResponse {
    tables: Vec<TableVersion>,
    childcare_regions: Vec<String>,
    vehicle_regions: Vec<String>,
    transit_regions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(data: Arc<DataSet>) -> Router {
    Router::new()
        .route("/api/childcare", post(childcare_handler))
        .route("/api/commute", post(commute_handler))
        .route("/api/tables", get(tables_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(data)
}

pub async fn run_http_server(addr: SocketAddr, data: DataSet) -> std::io::Result<()> {
    let app = router(Arc::new(data));

    let listener = TcpListener::bind(addr).await?;
    info!("work viability API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn tables_handler(State(data): State<Arc<DataSet>>) -> Response {
    json_response(StatusCode::OK, tables_response(&data))
}

async fn childcare_handler(
    State(data): State<Arc<DataSet>>,
    payload: Result<Json<ChildcarePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = childcare_request_from_payload(payload);
    debug!(
        region = %request.region,
        children = request.children.len(),
        days = request.schedule.days_per_week,
        "childcare request"
    );
    let outcome: ChildcareOutcome = run_childcare(&data, &request)?;
    Ok(json_response(StatusCode::OK, outcome))
}

async fn commute_handler(
    State(data): State<Arc<DataSet>>,
    payload: Result<Json<CommutePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let request = commute_request_from_payload(payload);
    debug!(
        region = %request.region,
        vehicle = %request.driving.vehicle_class,
        days = request.schedule.days_per_week,
        "commute request"
    );
    let comparison: CommuteComparison = compare(&data, &request)?;
    Ok(json_response(StatusCode::OK, comparison))
}

fn tables_response(data: &DataSet) -> TablesResponse {
    TablesResponse {
        tables: data.versions(),
        childcare_regions: data.childcare_costs.regions(),
        vehicle_regions: data.vehicle_costs.regions(),
        transit_regions: data.transit_passes.regions(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

/// JSON numbers outside `u32` are folded into range; the core clamps the rest.
fn days_from_payload(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

fn schedule_from_payload(
    hourly_wage: Option<f64>,
    hours_per_week: Option<f64>,
    days_per_week: Option<i64>,
) -> WorkSchedule {
    WorkSchedule::new(
        hourly_wage.unwrap_or(DEFAULT_HOURLY_WAGE),
        hours_per_week.unwrap_or(DEFAULT_HOURS_PER_WEEK),
        days_per_week
            .map(days_from_payload)
            .unwrap_or(DEFAULT_DAYS_PER_WEEK),
    )
}

fn region_from_payload(region: Option<String>) -> String {
    region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| NATIONAL_REGION.to_string())
}

fn sweep_from_payload(sweep: Option<Vec<i64>>) -> Option<Vec<u32>> {
    sweep.map(|days| days.into_iter().map(days_from_payload).collect())
}

#[cfg(test)]
fn childcare_request_from_json(json: &str) -> Result<ChildcareRequest, String> {
    let payload: ChildcarePayload =
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
    Ok(childcare_request_from_payload(payload))
}

fn childcare_request_from_payload(payload: ChildcarePayload) -> ChildcareRequest {
    let children = payload
        .children
        .unwrap_or_default()
        .into_iter()
        .map(|child| ChildSpec {
            age_band: child
                .age_band
                .unwrap_or_else(|| DEFAULT_AGE_BAND.to_string()),
            care_setting: child
                .care_setting
                .unwrap_or_else(|| DEFAULT_CARE_SETTING.to_string()),
        })
        .collect();

    ChildcareRequest {
        region: region_from_payload(payload.region),
        children,
        schedule: schedule_from_payload(
            payload.hourly_wage,
            payload.hours_per_week,
            payload.days_per_week,
        ),
        use_pre_tax_account: payload.use_pre_tax_account.unwrap_or(false),
        sweep: sweep_from_payload(payload.sweep),
    }
}

#[cfg(test)]
fn commute_request_from_json(json: &str) -> Result<CommuteRequest, String> {
    let payload: CommutePayload =
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
    Ok(commute_request_from_payload(payload))
}

fn commute_request_from_payload(payload: CommutePayload) -> CommuteRequest {
    CommuteRequest {
        region: region_from_payload(payload.region),
        schedule: schedule_from_payload(
            payload.hourly_wage,
            payload.hours_per_week,
            payload.days_per_week,
        ),
        driving: DrivingOption {
            vehicle_class: payload
                .vehicle_class
                .unwrap_or_else(|| DEFAULT_VEHICLE_CLASS.to_string()),
            round_trip_miles: payload.round_trip_miles.unwrap_or(0.0),
            daily_parking: payload.daily_parking.unwrap_or(0.0),
            daily_tolls: payload.daily_tolls.unwrap_or(0.0),
            round_trip_minutes: payload.drive_minutes.unwrap_or(0.0),
        },
        transit: TransitOption {
            monthly_pass: payload.monthly_pass,
            round_trip_minutes: payload.transit_minutes.unwrap_or(0.0),
        },
        use_pre_tax_account: payload.use_pre_tax_account.unwrap_or(false),
        sweep: sweep_from_payload(payload.sweep),
    }
}
