//! Route table and JSON handlers.
//!
//! # Responsibility
//! - Map HTTP requests onto `AdminService` / `IntakeService` calls.
//! - Log one `http_request` event per request with a generated request id.
//!
//! # Invariants
//! - Handlers never hold a connection across an `.await`.
//! - "No eligible operator" is a successful intake with `operator: null`.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use leadroute_core::{
    core_version, AdminService, Contact, ContactReceipt, ContactReportRow, ContactRequest,
    IntakeService, Lead, NewOperator, NewSource, Operator, OperatorId, OperatorPatch, Source,
    SourceId, WeightAssignment, WeightInput,
};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";

type ApiResult<T> = Result<T, ApiError>;

/// Builds the full application router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/operators", post(create_operator).get(list_operators))
        .route("/operators/:id", get(get_operator).patch(update_operator))
        .route("/sources", post(create_source).get(list_sources))
        .route("/sources/:id/weights", post(assign_weights).get(list_weights))
        .route(
            "/sources/:id/weights/:operator_id",
            patch(update_weight).delete(delete_weight),
        )
        .route("/contacts", post(create_contact).get(list_contacts))
        .route("/leads", get(list_leads))
        .route("/reports", get(report))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let mut response = next.run(request).await;

    info!(
        "event=http_request module=api method={} path={} http_status={} request_id={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        request_id,
        started_at.elapsed().as_millis()
    );
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": core_version(),
    }))
}

async fn create_operator(
    State(state): State<AppState>,
    Json(body): Json<NewOperator>,
) -> ApiResult<(StatusCode, Json<Operator>)> {
    let created = state
        .with_connection(move |conn| AdminService::new(conn).create_operator(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_operators(State(state): State<AppState>) -> ApiResult<Json<Vec<Operator>>> {
    let operators = state
        .with_connection(|conn| AdminService::new(conn).list_operators())
        .await?;
    Ok(Json(operators))
}

async fn get_operator(
    State(state): State<AppState>,
    Path(id): Path<OperatorId>,
) -> ApiResult<Json<Operator>> {
    let operator = state
        .with_connection(move |conn| AdminService::new(conn).get_operator(id))
        .await?;
    Ok(Json(operator))
}

async fn update_operator(
    State(state): State<AppState>,
    Path(id): Path<OperatorId>,
    Json(patch): Json<OperatorPatch>,
) -> ApiResult<Json<Operator>> {
    let operator = state
        .with_connection(move |conn| AdminService::new(conn).update_operator(id, &patch))
        .await?;
    Ok(Json(operator))
}

async fn create_source(
    State(state): State<AppState>,
    Json(body): Json<NewSource>,
) -> ApiResult<(StatusCode, Json<Source>)> {
    let created = state
        .with_connection(move |conn| AdminService::new(conn).create_source(&body))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_sources(State(state): State<AppState>) -> ApiResult<Json<Vec<Source>>> {
    let sources = state
        .with_connection(|conn| AdminService::new(conn).list_sources())
        .await?;
    Ok(Json(sources))
}

/// Response for bulk weight assignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignWeightsResponse {
    pub status: String,
    pub assigned: usize,
}

async fn assign_weights(
    State(state): State<AppState>,
    Path(source_id): Path<SourceId>,
    Json(inputs): Json<Vec<WeightInput>>,
) -> ApiResult<Json<AssignWeightsResponse>> {
    let assigned = state
        .with_connection(move |conn| AdminService::new(conn).assign_weights(source_id, &inputs))
        .await?;
    Ok(Json(AssignWeightsResponse {
        status: "ok".to_string(),
        assigned: assigned.len(),
    }))
}

async fn list_weights(
    State(state): State<AppState>,
    Path(source_id): Path<SourceId>,
) -> ApiResult<Json<Vec<WeightAssignment>>> {
    let weights = state
        .with_connection(move |conn| AdminService::new(conn).list_weights(source_id))
        .await?;
    Ok(Json(weights))
}

/// Body of a single weight update.
#[derive(Debug, Deserialize)]
struct WeightUpdate {
    weight: i64,
}

async fn update_weight(
    State(state): State<AppState>,
    Path((source_id, operator_id)): Path<(SourceId, OperatorId)>,
    Json(body): Json<WeightUpdate>,
) -> ApiResult<Json<WeightAssignment>> {
    let updated = state
        .with_connection(move |conn| {
            AdminService::new(conn).update_weight(source_id, operator_id, body.weight)
        })
        .await?;
    Ok(Json(updated))
}

async fn delete_weight(
    State(state): State<AppState>,
    Path((source_id, operator_id)): Path<(SourceId, OperatorId)>,
) -> ApiResult<StatusCode> {
    state
        .with_connection(move |conn| AdminService::new(conn).delete_weight(source_id, operator_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<ContactReceipt>)> {
    let receipt = state
        .with_connection(move |conn| {
            IntakeService::new(conn).create_contact(&body, &mut rand::thread_rng())
        })
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = state
        .with_connection(|conn| AdminService::new(conn).list_contacts())
        .await?;
    Ok(Json(contacts))
}

async fn list_leads(State(state): State<AppState>) -> ApiResult<Json<Vec<Lead>>> {
    let leads = state
        .with_connection(|conn| AdminService::new(conn).list_leads())
        .await?;
    Ok(Json(leads))
}

async fn report(State(state): State<AppState>) -> ApiResult<Json<Vec<ContactReportRow>>> {
    let rows = state
        .with_connection(|conn| AdminService::new(conn).report())
        .await?;
    Ok(Json(rows))
}
