use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Eclipse classification carried by the service's `EclType` code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EclipseType {
    Annular,
    Hybrid,
    Total,
}

impl EclipseType {
    /// Maps a service code onto a type. Unknown codes fall back to `Total`.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "A" => EclipseType::Annular,
            "H" => EclipseType::Hybrid,
            "T" => EclipseType::Total,
            _ => EclipseType::Total,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            EclipseType::Annular => "A",
            EclipseType::Hybrid => "H",
            EclipseType::Total => "T",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EclipseType::Annular => "Annular Eclipse",
            EclipseType::Hybrid => "Hybrid Eclipse",
            EclipseType::Total => "Total Eclipse",
        }
    }
}

/// Attributes of one eclipse as returned by the feature service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseRecord {
    pub eclipse_type: EclipseType,
    pub date: DateTime<Utc>,
    pub greatest_eclipse: DateTime<Utc>,
    /// Duration at maximum eclipse, in seconds.
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    /// Shadow width on the Earth's surface, in km.
    #[serde(default)]
    pub path_width_km: Option<f64>,
    pub magnitude: f64,
    pub sun_altitude: f64,
    pub sun_azimuth: f64,
    pub lunation: i64,
    pub saros: i64,
    pub gamma: f64,
    /// Delta-T in seconds.
    pub delta_t: f64,
}

impl EclipseRecord {
    pub fn is_past(&self, reference: DateTime<Utc>) -> bool {
        self.date < reference
    }
}
