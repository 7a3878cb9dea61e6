//! Analyze Route - the persona analysis pipeline

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::routes::error_response;
use crate::AppState;

/// Analyze a product and generate persona insights
#[utoipa::path(
    post,
    path = "/mirra/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Analysis finished", body = AnalyzeResponse),
        (status = 400, description = "Missing product description"),
        (status = 503, description = "Analysis services not configured"),
        (status = 500, description = "Pipeline error")
    ),
    tag = "Analysis"
)]
pub async fn analyze_product(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    if payload.product_description.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Missing 'product_description' in request body".to_string(),
        ));
    }

    let pipeline = state.pipeline.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Analysis services not configured".to_string(),
    ))?;

    let report = pipeline
        .run(&payload.product_description)
        .await
        .map_err(error_response)?;

    if !report.errors.is_empty() {
        tracing::warn!("Analysis finished with {} non-fatal errors", report.errors.len());
    }

    Ok(Json(AnalyzeResponse::from_report(&report)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/mirra/analyze", post(analyze_product))
}
