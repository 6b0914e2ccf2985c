use crate::geometry::{MapPoint, PathGeometry};
use crate::model::record::EclipseRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object id assigned by the feature service; identifies a rendered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub i64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One eclipse path: its attributes plus the polygon drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseFeature {
    pub id: FeatureId,
    pub record: EclipseRecord,
    #[serde(default)]
    pub geometry: PathGeometry,
}

impl EclipseFeature {
    pub fn new(id: FeatureId, record: EclipseRecord, geometry: PathGeometry) -> Self {
        Self {
            id,
            record,
            geometry,
        }
    }

    pub fn contains(&self, point: MapPoint) -> bool {
        self.geometry.contains(point)
    }
}
