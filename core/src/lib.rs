//! Core of the eclipse path viewer.
//!
//! Holds the eclipse data model, the selection/highlight and info panel
//! controllers, query sequencing, and the feature-service wire format. The
//! GUI and the local feature server only wire platform events into these
//! types.

pub mod controller;
pub mod feature_source;
pub mod format;
pub mod geometry;
pub mod host;
pub mod model;
pub mod panel;
pub mod prelude;
pub mod query;
pub mod selection;
pub mod telemetry;

pub use controller::EclipseController;
pub use prelude::{ControllerConfig, FeatureSource, InteractionMode, ViewerError, ViewerResult};
