use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{LeadProfile, OfferSubmission};
use super::import::write_results;
use super::repository::LeadStore;
use super::service::{LeadScoringService, ScoringError, ServiceError};

/// Router builder exposing ingestion, scoring, and reporting endpoints.
pub fn scoring_router<S>(service: Arc<LeadScoringService<S>>) -> Router
where
    S: LeadStore + 'static,
{
    Router::new()
        .route("/offer", post(offer_handler::<S>))
        .route("/leads", post(leads_handler::<S>))
        .route("/leads/upload", post(upload_handler::<S>))
        .route("/score", post(score_handler::<S>))
        .route("/results", get(results_handler::<S>))
        .route("/results/export", get(export_handler::<S>))
        .with_state(service)
}

pub(crate) async fn offer_handler<S>(
    State(service): State<Arc<LeadScoringService<S>>>,
    Json(submission): Json<OfferSubmission>,
) -> Response
where
    S: LeadStore + 'static,
{
    match service.save_offer(submission) {
        Ok(offer) => (StatusCode::CREATED, Json(offer)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn leads_handler<S>(
    State(service): State<Arc<LeadScoringService<S>>>,
    Json(profiles): Json<Vec<LeadProfile>>,
) -> Response
where
    S: LeadStore + 'static,
{
    match service.import_leads(profiles) {
        Ok(leads) => imported_response(leads.len()),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn upload_handler<S>(
    State(service): State<Arc<LeadScoringService<S>>>,
    body: String,
) -> Response
where
    S: LeadStore + 'static,
{
    match service.import_leads_csv(body.as_bytes()) {
        Ok(leads) => imported_response(leads.len()),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn score_handler<S>(State(service): State<Arc<LeadScoringService<S>>>) -> Response
where
    S: LeadStore + 'static,
{
    match service.run_scoring().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            let message = err.to_string();
            let (status, payload) = match err {
                ScoringError::NoOffer | ScoringError::NoLeads => {
                    (StatusCode::BAD_REQUEST, json!({ "error": message }))
                }
                ScoringError::Persistence {
                    scored, results, ..
                } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": message,
                        "leads_scored": scored,
                        "results": results,
                    }),
                ),
            };
            (status, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn results_handler<S>(
    State(service): State<Arc<LeadScoringService<S>>>,
) -> Response
where
    S: LeadStore + 'static,
{
    match service.results() {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<LeadScoringService<S>>>,
) -> Response
where
    S: LeadStore + 'static,
{
    let results = match service.results() {
        Ok(results) => results,
        Err(err) => return service_error_response(err),
    };

    let mut buffer = Vec::new();
    if let Err(err) = write_results(&mut buffer, &results) {
        let payload = json!({ "error": err.to_string() });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"results.csv\""),
        ],
        buffer,
    )
        .into_response()
}

fn imported_response(count: usize) -> Response {
    let payload = json!({ "leads_imported": count });
    (StatusCode::CREATED, Json(payload)).into_response()
}

fn service_error_response(err: ServiceError) -> Response {
    let status = match err {
        ServiceError::InvalidOffer | ServiceError::Import(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
