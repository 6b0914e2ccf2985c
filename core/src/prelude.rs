use crate::model::EclipseFeature;
use crate::query::SpatialQuery;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the map host selects features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Click a path to select it, click the background to drop a pin and re-query.
    #[default]
    Click,
    /// Hover a path to select it; the panel hides itself after an idle period.
    Hover,
}

/// Shared configuration for the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    pub mode: InteractionMode,
    pub idle_timeout: Duration,
    pub slide_duration: Duration,
    pub panel_width: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Click,
            idle_timeout: Duration::from_millis(3000),
            slide_duration: Duration::from_millis(300),
            panel_width: 175.0,
        }
    }
}

/// Common error type for the viewer core.
#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    #[error("incompatible rendering surface: {0}")]
    IncompatibleSurface(String),
    #[error("feature service error {code}: {message}")]
    Service { code: i64, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type ViewerResult<T> = Result<T, ViewerError>;

/// A read-only source of eclipse features answering spatial queries.
pub trait FeatureSource {
    fn query(&self, query: &SpatialQuery) -> ViewerResult<Vec<EclipseFeature>>;
}
