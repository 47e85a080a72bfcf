use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::domain::{FarmerId, Registration};
use super::outcome::{BucketStatus, OutcomeKind};
use super::repository::{CapacityStore, RegistrationStore};
use super::service::QuotaEvaluator;

/// Header carrying the authenticated farmer's identity.
pub const FARMER_ID_HEADER: &str = "x-farmer-id";

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    pub crop_name: String,
    pub planting_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapacityQuery {
    pub planting_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationListQuery {
    pub crop: String,
}

/// Router builder exposing registration, capacity, and catalog endpoints.
pub fn quota_router<C, R>(evaluator: Arc<QuotaEvaluator<C, R>>) -> Router
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/registrations",
            post(register_handler::<C, R>).get(list_handler::<C, R>),
        )
        .route(
            "/api/v1/capacity/:crop_name",
            get(capacity_handler::<C, R>),
        )
        .route("/api/v1/crops", get(crops_handler::<C, R>))
        .with_state(evaluator)
}

pub(crate) fn farmer_from_headers(headers: &HeaderMap) -> Option<FarmerId> {
    headers
        .get(FARMER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| FarmerId(value.to_string()))
}

pub(crate) async fn register_handler<C, R>(
    State(evaluator): State<Arc<QuotaEvaluator<C, R>>>,
    headers: HeaderMap,
    Json(request): Json<RegistrationRequest>,
) -> Response
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    let farmer_id = farmer_from_headers(&headers);
    let outcome = evaluator
        .check_and_register(farmer_id.as_ref(), &request.crop_name, request.planting_date)
        .await;

    let status = match outcome.kind() {
        OutcomeKind::Approved | OutcomeKind::Warning => StatusCode::CREATED,
        OutcomeKind::Rejected => StatusCode::CONFLICT,
        OutcomeKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        OutcomeKind::Fault => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(outcome.result())).into_response()
}

pub(crate) async fn capacity_handler<C, R>(
    State(evaluator): State<Arc<QuotaEvaluator<C, R>>>,
    Path(crop_name): Path<String>,
    Query(query): Query<CapacityQuery>,
) -> Result<Json<BucketStatus>, AppError>
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    let status = evaluator
        .bucket_status(&crop_name, query.planting_date)
        .await?;
    Ok(Json(status))
}

pub(crate) async fn list_handler<C, R>(
    State(evaluator): State<Arc<QuotaEvaluator<C, R>>>,
    Query(query): Query<RegistrationListQuery>,
) -> Result<Json<Vec<Registration>>, AppError>
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    Ok(Json(evaluator.registrations_for(&query.crop).await?))
}

pub(crate) async fn crops_handler<C, R>(
    State(evaluator): State<Arc<QuotaEvaluator<C, R>>>,
) -> Response
where
    C: CapacityStore + 'static,
    R: RegistrationStore + 'static,
{
    let config = evaluator.config();
    let payload = json!({
        "crops": evaluator.catalog().entries(),
        "default_cycle_months": config.default_cycle_months,
        "default_max_farmers": config.default_max_farmers,
        "warning_threshold": config.warning_threshold,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
