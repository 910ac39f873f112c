use std::path::PathBuf;
use std::sync::Arc;

use crate::data::model::Dataset;
use crate::render::Renderer;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared, read-only state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Dataset loaded once at startup.
    pub dataset: Arc<Dataset>,

    /// Directory histogram images are written to.
    pub output_dir: Arc<PathBuf>,

    pub renderer: Arc<Renderer>,
}

impl AppState {
    pub fn new(dataset: Dataset, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            dataset: Arc::new(dataset),
            output_dir: Arc::new(output_dir.into()),
            renderer: Arc::new(Renderer::default()),
        }
    }
}
