use std::sync::Arc;

use crate::config::Config;
use crate::export::handlers::ExportTracker;
use crate::export::raster::{BitmapRasterizer, Rasterizer};
use crate::session::Studio;
use crate::store_client::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub studio: Studio,
    pub config: Config,
    /// Pluggable rasterizer for the PDF export. Default: BitmapRasterizer.
    pub rasterizer: Arc<dyn Rasterizer>,
    /// One export at a time, plus its last reported progress.
    pub exports: ExportTracker,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ResumeStore>) -> Self {
        Self {
            studio: Studio::new(store, config.autosave_delay),
            config,
            rasterizer: Arc::new(BitmapRasterizer),
            exports: ExportTracker::default(),
        }
    }
}
