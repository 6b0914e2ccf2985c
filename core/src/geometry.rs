use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub lon: f64,
    pub lat: f64,
}

impl MapPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Polygon geometry of an eclipse path as one or more closed rings.
///
/// Rings are stored as `[lon, lat]` pairs, matching the service's `rings`
/// array. Containment uses the even-odd rule, so inner rings act as holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathGeometry {
    pub rings: Vec<Vec<[f64; 2]>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: MapPoint,
    pub max: MapPoint,
}

impl PathGeometry {
    pub fn new(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self { rings }
    }

    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(|ring| ring.len() < 3)
    }

    pub fn contains(&self, point: MapPoint) -> bool {
        let mut inside = false;
        for ring in &self.rings {
            if ring.len() < 3 {
                continue;
            }
            let mut j = ring.len() - 1;
            for i in 0..ring.len() {
                let [xi, yi] = ring[i];
                let [xj, yj] = ring[j];
                if (yi > point.lat) != (yj > point.lat)
                    && point.lon < (xj - xi) * (point.lat - yi) / (yj - yi) + xi
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut coords = self.rings.iter().flatten();
        let first = coords.next()?;
        let mut bounds = Bounds {
            min: MapPoint::new(first[0], first[1]),
            max: MapPoint::new(first[0], first[1]),
        };
        for &[lon, lat] in coords {
            bounds.min.lon = bounds.min.lon.min(lon);
            bounds.min.lat = bounds.min.lat.min(lat);
            bounds.max.lon = bounds.max.lon.max(lon);
            bounds.max.lat = bounds.max.lat.max(lat);
        }
        Some(bounds)
    }
}

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 10.0;
const TILE_SIZE: f64 = 256.0;

/// Equirectangular view onto the map: `256 * 2^zoom` pixels span 360 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: MapPoint,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: MapPoint::new(-30.0, 30.0),
            zoom: 3.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn new(center: MapPoint, zoom: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn pixels_per_degree(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2() / 360.0
    }

    pub fn project(&self, point: MapPoint) -> (f64, f64) {
        let scale = self.pixels_per_degree();
        (
            self.width / 2.0 + (point.lon - self.center.lon) * scale,
            self.height / 2.0 - (point.lat - self.center.lat) * scale,
        )
    }

    pub fn unproject(&self, x: f64, y: f64) -> MapPoint {
        let scale = self.pixels_per_degree();
        MapPoint::new(
            self.center.lon + (x - self.width / 2.0) / scale,
            self.center.lat - (y - self.height / 2.0) / scale,
        )
    }

    /// Zooms by `delta` levels while keeping the map point under `(x, y)` fixed.
    pub fn zoom_at(&mut self, x: f64, y: f64, delta: f64) {
        let anchor = self.unproject(x, y);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let scale = self.pixels_per_degree();
        self.center = MapPoint::new(
            anchor.lon - (x - self.width / 2.0) / scale,
            anchor.lat + (y - self.height / 2.0) / scale,
        );
    }
}
