//! HTTP request handlers for the Property Projection Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{project, project_portfolio};
use crate::error::EngineError;

use super::request::{PortfolioRequest, ProjectionRequest, TaxEstimateRequest};
use super::response::{ApiError, ApiErrorResponse, TaxEstimateResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/projections", post(projection_handler))
        .route("/portfolio", post(portfolio_handler))
        .route("/tax/estimate", post(tax_estimate_handler))
        .with_state(state)
}

/// Handler for POST /projections.
///
/// Projects a single property and returns the full result.
async fn projection_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProjectionRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing projection request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(err) = request.validate() {
        return engine_error_response(correlation_id, err);
    }

    let start_time = Instant::now();
    let result = project(
        &request.property,
        &request.investors,
        &request.settings,
        state.rules(),
    );
    info!(
        correlation_id = %correlation_id,
        property_id = %result.property_id,
        years = result.years.len(),
        warnings = result.audit_trace.warnings.len(),
        final_total_return = %result.summary.final_total_return,
        duration_us = start_time.elapsed().as_micros(),
        "Projection completed successfully"
    );
    json_response(StatusCode::OK, &result)
}

/// Handler for POST /portfolio.
///
/// Projects each property independently and sums the years.
async fn portfolio_handler(
    State(state): State<AppState>,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing portfolio request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(err) = request.validate() {
        return engine_error_response(correlation_id, err);
    }

    let start_time = Instant::now();
    let result = project_portfolio(&request.properties, &request.settings, state.rules());
    info!(
        correlation_id = %correlation_id,
        properties = result.properties.len(),
        years = result.years.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Portfolio projection completed successfully"
    );
    json_response(StatusCode::OK, &result)
}

/// Handler for POST /tax/estimate.
///
/// Returns income tax, Medicare levy and marginal rate for one income.
async fn tax_estimate_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxEstimateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let schedule = state.rules().tax();
    let income_tax = schedule.income_tax(request.income);
    let medicare_levy = schedule.medicare_levy(request.income, request.has_medicare_levy);
    let response = TaxEstimateResponse {
        income: request.income,
        income_tax,
        medicare_levy,
        total_tax: income_tax + medicare_levy,
        marginal_rate: schedule.marginal_rate(request.income),
        rule_set: state.config().metadata().code.clone(),
    };
    info!(
        correlation_id = %correlation_id,
        total_tax = %response.total_tax,
        "Tax estimate completed"
    );
    json_response(StatusCode::OK, &response)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            // Check if it's a missing field error
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}
