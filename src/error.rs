//! Error types for loading, rendering and the HTTP boundary.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure to load the dataset at startup.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The file parsed but its shape is wrong (e.g. a non-object JSON row).
    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("dataset has no '{0}' column")]
    MissingColumn(String),
}

/// Failure to produce the histogram artifact.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no features specified")]
    NoFeatures,

    #[error("{requested} features requested, at most {max} can be plotted")]
    TooManyFeatures { requested: usize, max: usize },

    #[error("{panels} panels of {panel_height} px exceed the image height limit")]
    ImageTooLarge { panels: usize, panel_height: u32 },

    #[error("unknown feature column: '{0}'")]
    UnknownFeature(String),

    #[error("feature column '{0}' is not numeric")]
    NonNumericFeature(String),

    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoding image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Every way a request can end in an error, each with one status code.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or incomplete request body.
    #[error("{0}")]
    Validation(String),

    /// The filter matched zero rows.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// The renderer reported success but the artifact is missing or empty.
    #[error("{0}")]
    Integrity(String),

    /// The worker running the request panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Render(_) | ApiError::Integrity(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed ({status}): {self}");
        } else {
            log::warn!("request rejected ({status}): {self}");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
