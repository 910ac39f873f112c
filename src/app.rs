use std::path::Path;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::artifact::artifact_path;
use crate::data::filter::filter_by_quality;
use crate::data::model::RowView;
use crate::error::ApiError;
use crate::render::MAX_FEATURES;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/filter-wine/", post(filter_wine))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello, Docker" }))
}

// ---------------------------------------------------------------------------
// POST /filter-wine/
// ---------------------------------------------------------------------------

/// Request body: the quality to select and the features to plot, in order.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSpec {
    pub quality: i64,
    pub features: Vec<String>,
}

#[derive(Serialize)]
struct FilterResponse<'a> {
    filtered_data: Vec<RowView<'a>>,
    visualization: String,
}

/// Body parsing and validation happen before any dataset access. Filtering
/// and rendering then run on the blocking pool.
async fn filter_wine(
    State(state): State<AppState>,
    payload: Result<Json<FilterSpec>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(spec) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    if spec.features.is_empty() {
        return Err(ApiError::Validation(
            "features must name at least one column".to_string(),
        ));
    }
    if spec.features.len() > MAX_FEATURES {
        return Err(ApiError::Validation(format!(
            "features may name at most {MAX_FEATURES} columns, got {}",
            spec.features.len()
        )));
    }

    tokio::task::spawn_blocking(move || filter_and_render(&state, &spec))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
}

fn filter_and_render(state: &AppState, spec: &FilterSpec) -> Result<Response, ApiError> {
    let rows = filter_by_quality(&state.dataset, spec.quality);
    if rows.is_empty() {
        return Err(ApiError::NotFound(
            "No data found for the given quality".to_string(),
        ));
    }

    let output = artifact_path(&state.output_dir, spec.quality, &spec.features);
    state.renderer.render(&rows, &spec.features, &output)?;
    verify_artifact(&output)?;

    log::info!(
        "quality {}: {} rows, {} feature(s) -> {}",
        spec.quality,
        rows.len(),
        spec.features.len(),
        output.display()
    );

    let body = FilterResponse {
        filtered_data: rows.views(),
        visualization: output.display().to_string(),
    };
    Ok(Json(body).into_response())
}

/// The renderer returning `Ok` is not trusted on its own: the file must be
/// on disk and non-empty.
fn verify_artifact(path: &Path) -> Result<(), ApiError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(ApiError::Integrity(
            "Failed to save the visualization".to_string(),
        )),
    }
}
