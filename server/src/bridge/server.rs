use anyhow::{anyhow, Context, Result};
use eclipsecore::feature_source::wire::{encode_error, OUT_FIELDS};
use eclipsecore::feature_source::{encode_feature_set, from_params, MemorySource};
use eclipsecore::telemetry::MetricsRecorder;
use eclipsecore::FeatureSource;
use log::{info, warn};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

pub const LAYER_NAME: &str = "SolarEclipsePath";

pub fn bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Answers one `query` request against the catalogue.
///
/// Failures are reported in the service's error envelope rather than as HTTP
/// errors, the way the remote service does.
pub fn answer_query(
    source: &MemorySource,
    params: &HashMap<String, String>,
    metrics: &MetricsRecorder,
) -> Value {
    metrics.record_issued();
    let result = from_params(params).and_then(|query| source.query(&query));
    match result {
        Ok(features) => {
            metrics.record_applied();
            encode_feature_set(&features)
        }
        Err(err) => {
            metrics.record_failed();
            warn!("rejected query {:?}: {}", params, err);
            encode_error(400, &err.to_string())
        }
    }
}

fn layer_info(source: &MemorySource) -> Value {
    json!({
        "name": LAYER_NAME,
        "geometryType": "esriGeometryPolygon",
        "objectIdField": "OBJECTID",
        "fields": OUT_FIELDS,
        "featureCount": source.len(),
    })
}

/// Hosts the local feature endpoint over a shared catalogue.
pub struct FeatureBridge {
    state: Arc<RwLock<MemorySource>>,
    metrics: Arc<MetricsRecorder>,
}

impl FeatureBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MemorySource::default())),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    /// Binds the endpoint and serves it from a background thread.
    ///
    /// Binding happens on the calling thread, so a taken port is reported
    /// here instead of inside the server thread.
    pub fn serve(&self, port: u16) -> Result<SocketAddr> {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let metrics = self.metrics.clone();
        let metrics_filter = warp::any().map(move || metrics.clone());

        let query_route = warp::path!("SolarEclipsePath" / "FeatureServer" / "0" / "query")
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .and(state_filter.clone())
            .and(metrics_filter)
            .map(
                |params: HashMap<String, String>,
                 state: Arc<RwLock<MemorySource>>,
                 metrics: Arc<MetricsRecorder>| {
                    let body = match state.read() {
                        Ok(source) => answer_query(&source, &params, &metrics),
                        Err(_) => encode_error(500, "catalog unavailable"),
                    };
                    warp::reply::json(&body)
                },
            );

        let layer_route = warp::path!("SolarEclipsePath" / "FeatureServer" / "0")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<MemorySource>>| {
                let body = match state.read() {
                    Ok(source) => layer_info(&source),
                    Err(_) => encode_error(500, "catalog unavailable"),
                };
                warp::reply::json(&body)
            });

        let routes = query_route.or(layer_route);
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building feature endpoint runtime")?;
        let (address, server) = {
            let _context = runtime.enter();
            warp::serve(routes)
                .try_bind_ephemeral(bind_address(port))
                .with_context(|| format!("binding feature endpoint on port {port}"))?
        };
        thread::spawn(move || runtime.block_on(server));
        info!(
            "feature endpoint at http://{}/{}/FeatureServer/0",
            address, LAYER_NAME
        );
        Ok(address)
    }

    pub fn publish(&self, source: MemorySource) -> Result<()> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| anyhow!("catalog lock poisoned"))?;
        *guard = source;
        info!("[bridge] catalog holds {} eclipse paths", guard.len());
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        info!("[bridge] {}", message);
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MemorySource {
        self.state.read().unwrap().clone()
    }
}

impl Default for FeatureBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::generator::{build_catalog, GeneratorConfig};
    use eclipsecore::feature_source::{decode_feature_set, to_params};
    use eclipsecore::geometry::MapPoint;
    use eclipsecore::query::SpatialQuery;
    use eclipsecore::ViewerError;

    fn params(query: &SpatialQuery) -> HashMap<String, String> {
        to_params(query)
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    fn catalog() -> MemorySource {
        MemorySource::new(
            build_catalog(&GeneratorConfig {
                count: 12,
                seed: 7,
                ..Default::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn bridge_publish_replaces_catalog() {
        let bridge = FeatureBridge::new();
        bridge.publish(catalog()).unwrap();
        assert_eq!(bridge.snapshot().len(), 12);
    }

    #[test]
    fn query_answers_decode_newest_first() {
        let source = catalog();
        let metrics = MetricsRecorder::new();
        let body = answer_query(&source, &params(&SpatialQuery::all()), &metrics);
        let features = decode_feature_set(&body.to_string()).unwrap();
        assert_eq!(features.len(), 12);
        assert!(features
            .windows(2)
            .all(|pair| pair[0].record.date >= pair[1].record.date));
        assert_eq!(metrics.snapshot().applied, 1);
    }

    #[test]
    fn point_query_matches_only_intersecting_paths() {
        let source = catalog();
        let target = &source.features()[3];
        let ring = &target.geometry.rings[0];
        let point = MapPoint::new(ring[4][0], ring[4][1] - 0.01);
        let body = answer_query(
            &source,
            &params(&SpatialQuery::at(point)),
            &MetricsRecorder::new(),
        );
        let features = decode_feature_set(&body.to_string()).unwrap();
        assert!(features.iter().any(|feature| feature.id == target.id));
        assert!(features.iter().all(|feature| feature.contains(point)));
    }

    #[test]
    fn invalid_query_returns_error_envelope() {
        let mut request = params(&SpatialQuery::all());
        request.insert("geometry".into(), "nowhere".into());
        let metrics = MetricsRecorder::new();
        let body = answer_query(&catalog(), &request, &metrics);
        assert!(matches!(
            decode_feature_set(&body.to_string()),
            Err(ViewerError::Service { code: 400, .. })
        ));
        assert_eq!(metrics.snapshot().failed, 1);
    }

    #[test]
    fn serve_reports_a_taken_port() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let bridge = FeatureBridge::new();
        assert!(bridge.serve(port).is_err());
    }

    #[test]
    fn serve_binds_an_ephemeral_port() {
        let bridge = FeatureBridge::new();
        let address = bridge.serve(0).unwrap();
        assert_eq!(address.ip(), bind_address(0).ip());
        assert_ne!(address.port(), 0);
    }
}
