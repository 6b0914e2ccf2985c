pub mod feature;
pub mod record;

pub use feature::{EclipseFeature, FeatureId};
pub use record::{EclipseRecord, EclipseType};
