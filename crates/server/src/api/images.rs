//! Image resolution API handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use imagebus_core::{ImageQuery, ProviderStatus, ResolutionOutcome, ResultGroup, MAX_IMAGE_COUNT};
use tracing::debug;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ResolveSingleResponse {
    pub group: Option<ResultGroup>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersStatusResponse {
    pub providers: BTreeMap<String, ProviderStatus>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(error: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error }))
}

fn validate(query: &ImageQuery) -> Result<(), ApiError> {
    if query.text.trim().is_empty() {
        return Err(bad_request("text cannot be empty".to_string()));
    }
    if query.count > MAX_IMAGE_COUNT {
        return Err(bad_request(format!(
            "count must be at most {}",
            MAX_IMAGE_COUNT
        )));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/images/resolve
///
/// An empty outcome is a normal 200 response with no groups.
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Json(query): Json<ImageQuery>,
) -> Result<Json<ResolutionOutcome>, ApiError> {
    validate(&query)?;
    debug!(query = %query.text, category = query.category.as_str(), "Resolve request");
    Ok(Json(state.orchestrator().resolve(&query).await))
}

/// POST /api/v1/images/resolve-single
pub async fn resolve_single(
    State(state): State<Arc<AppState>>,
    Json(query): Json<ImageQuery>,
) -> Result<Json<ResolveSingleResponse>, ApiError> {
    validate(&query)?;
    let group = state.orchestrator().resolve_single(&query).await;
    Ok(Json(ResolveSingleResponse { group }))
}

/// GET /api/v1/images/status
///
/// Per-provider availability. Makes no upstream calls.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<ProvidersStatusResponse> {
    Json(ProvidersStatusResponse {
        providers: state.orchestrator().status().await,
    })
}
