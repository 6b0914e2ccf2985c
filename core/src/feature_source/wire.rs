use crate::geometry::{MapPoint, PathGeometry};
use crate::model::{EclipseFeature, EclipseRecord, EclipseType, FeatureId};
use crate::prelude::{ViewerError, ViewerResult};
use crate::query::{SortOrder, SpatialFilter, SpatialQuery};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Attribute fields requested from the service.
pub const OUT_FIELDS: [&str; 13] = [
    "OBJECTID",
    "EclType",
    "Date",
    "TimeGE",
    "DurationSeconds",
    "PathWid",
    "EclMagn",
    "SunAlt",
    "SunAzi",
    "Lunation",
    "Saro",
    "Gamma",
    "DT",
];

const WGS84: &str = "4326";
const POINT_GEOMETRY: &str = "esriGeometryPoint";
const INTERSECTS: &str = "esriSpatialRelIntersects";

/// Query-string parameters for the service's `query` operation.
pub fn to_params(query: &SpatialQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("where", "1=1".to_string())];
    if let SpatialFilter::Intersects(point) = query.filter {
        params.push(("geometry", format!("{},{}", point.lon, point.lat)));
        params.push(("geometryType", POINT_GEOMETRY.to_string()));
        params.push(("inSR", WGS84.to_string()));
        params.push(("spatialRel", INTERSECTS.to_string()));
    }
    let order = match query.order {
        SortOrder::DateDescending => "Date DESC",
        SortOrder::DateAscending => "Date ASC",
    };
    params.push(("outFields", OUT_FIELDS.join(",")));
    params.push(("orderByFields", order.to_string()));
    params.push(("outSR", WGS84.to_string()));
    params.push(("returnGeometry", "true".to_string()));
    params.push(("f", "json".to_string()));
    params
}

/// Reads a query back from its parameters; the subset `to_params` emits.
pub fn from_params(params: &HashMap<String, String>) -> ViewerResult<SpatialQuery> {
    let get = |key: &str| params.get(key).map(|value| value.trim());

    if let Some(kind) = get("geometryType") {
        if kind != POINT_GEOMETRY {
            return Err(ViewerError::InvalidQuery(format!("unsupported geometryType {kind}")));
        }
    }
    if let Some(relation) = get("spatialRel") {
        if relation != INTERSECTS {
            return Err(ViewerError::InvalidQuery(format!("unsupported spatialRel {relation}")));
        }
    }

    let filter = match get("geometry").filter(|value| !value.is_empty()) {
        Some(text) => SpatialFilter::Intersects(parse_point(text)?),
        None => SpatialFilter::All,
    };

    let order = match get("orderByFields") {
        None | Some("") => SortOrder::DateDescending,
        Some(text) => {
            let mut parts = text.split_whitespace();
            match (parts.next(), parts.next().map(str::to_ascii_uppercase)) {
                (Some("Date"), None) => SortOrder::DateAscending,
                (Some("Date"), Some(direction)) if direction == "ASC" => SortOrder::DateAscending,
                (Some("Date"), Some(direction)) if direction == "DESC" => {
                    SortOrder::DateDescending
                }
                _ => {
                    return Err(ViewerError::InvalidQuery(format!(
                        "unsupported orderByFields {text}"
                    )))
                }
            }
        }
    };

    Ok(SpatialQuery { filter, order })
}

fn parse_point(text: &str) -> ViewerResult<MapPoint> {
    let invalid = || ViewerError::InvalidQuery(format!("invalid point geometry {text}"));
    let (x, y) = text.split_once(',').ok_or_else(invalid)?;
    let lon = x.trim().parse::<f64>().map_err(|_| invalid())?;
    let lat = y.trim().parse::<f64>().map_err(|_| invalid())?;
    if !lon.is_finite() || !lat.is_finite() {
        return Err(invalid());
    }
    Ok(MapPoint::new(lon, lat))
}

#[derive(Debug, Deserialize)]
struct FeatureSetResponse {
    #[serde(default)]
    features: Vec<WireFeature>,
    #[serde(default)]
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct WireFeature {
    attributes: WireAttributes,
    #[serde(default)]
    geometry: Option<PathGeometry>,
}

/// Attribute row as the service spells it. Dates are epoch milliseconds.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WireAttributes {
    #[serde(rename = "OBJECTID")]
    object_id: Option<i64>,
    #[serde(rename = "EclType")]
    ecl_type: Option<String>,
    #[serde(rename = "Date")]
    date: Option<f64>,
    #[serde(rename = "TimeGE")]
    time_ge: Option<f64>,
    #[serde(rename = "DurationSeconds")]
    duration_seconds: Option<f64>,
    #[serde(rename = "PathWid")]
    path_wid: Option<f64>,
    #[serde(rename = "EclMagn")]
    ecl_magn: Option<f64>,
    #[serde(rename = "SunAlt")]
    sun_alt: Option<f64>,
    #[serde(rename = "SunAzi")]
    sun_azi: Option<f64>,
    #[serde(rename = "Lunation")]
    lunation: Option<i64>,
    #[serde(rename = "Saro")]
    saro: Option<i64>,
    #[serde(rename = "Gamma")]
    gamma: Option<f64>,
    #[serde(rename = "DT")]
    dt: Option<f64>,
}

fn required<T>(value: Option<T>, field: &str) -> ViewerResult<T> {
    value.ok_or_else(|| ViewerError::Decode(format!("missing attribute {field}")))
}

fn timestamp(value: Option<f64>, field: &str) -> ViewerResult<DateTime<Utc>> {
    let millis = required(value, field)?;
    DateTime::from_timestamp_millis(millis.round() as i64)
        .ok_or_else(|| ViewerError::Decode(format!("attribute {field} out of range")))
}

impl WireAttributes {
    fn into_feature(self, geometry: PathGeometry) -> ViewerResult<EclipseFeature> {
        let id = FeatureId(required(self.object_id, "OBJECTID")?);
        let record = EclipseRecord {
            eclipse_type: EclipseType::from_code(self.ecl_type.as_deref().unwrap_or_default()),
            date: timestamp(self.date, "Date")?,
            greatest_eclipse: timestamp(self.time_ge, "TimeGE")?,
            duration_seconds: self.duration_seconds,
            path_width_km: self.path_wid,
            magnitude: required(self.ecl_magn, "EclMagn")?,
            sun_altitude: required(self.sun_alt, "SunAlt")?,
            sun_azimuth: required(self.sun_azi, "SunAzi")?,
            lunation: required(self.lunation, "Lunation")?,
            saros: required(self.saro, "Saro")?,
            gamma: required(self.gamma, "Gamma")?,
            delta_t: required(self.dt, "DT")?,
        };
        Ok(EclipseFeature::new(id, record, geometry))
    }

    fn from_feature(feature: &EclipseFeature) -> Self {
        let record = &feature.record;
        Self {
            object_id: Some(feature.id.0),
            ecl_type: Some(record.eclipse_type.code().to_string()),
            date: Some(record.date.timestamp_millis() as f64),
            time_ge: Some(record.greatest_eclipse.timestamp_millis() as f64),
            duration_seconds: record.duration_seconds,
            path_wid: record.path_width_km,
            ecl_magn: Some(record.magnitude),
            sun_alt: Some(record.sun_altitude),
            sun_azi: Some(record.sun_azimuth),
            lunation: Some(record.lunation),
            saro: Some(record.saros),
            gamma: Some(record.gamma),
            dt: Some(record.delta_t),
        }
    }
}

/// Decodes a `query` response body. Malformed features are skipped.
pub fn decode_feature_set(body: &str) -> ViewerResult<Vec<EclipseFeature>> {
    let response: FeatureSetResponse =
        serde_json::from_str(body).map_err(|err| ViewerError::Decode(err.to_string()))?;
    if let Some(error) = response.error {
        return Err(ViewerError::Service {
            code: error.code,
            message: error.message,
        });
    }

    let mut features = Vec::with_capacity(response.features.len());
    for wire in response.features {
        match wire.attributes.into_feature(wire.geometry.unwrap_or_default()) {
            Ok(feature) => features.push(feature),
            Err(err) => warn!("skipping malformed eclipse feature: {err}"),
        }
    }
    Ok(features)
}

pub fn encode_feature_set(features: &[EclipseFeature]) -> Value {
    let features: Vec<Value> = features
        .iter()
        .map(|feature| {
            json!({
                "attributes": WireAttributes::from_feature(feature),
                "geometry": feature.geometry,
            })
        })
        .collect();
    json!({
        "objectIdFieldName": "OBJECTID",
        "geometryType": "esriGeometryPolygon",
        "spatialReference": { "wkid": 4326 },
        "features": features,
    })
}

pub fn encode_error(code: i64, message: &str) -> Value {
    json!({ "error": { "code": code, "message": message } })
}
