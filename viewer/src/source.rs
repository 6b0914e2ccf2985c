use eclipsecore::feature_source::{decode_feature_set, to_params};
use eclipsecore::model::EclipseFeature;
use eclipsecore::query::SpatialQuery;

/// Client for the remote eclipse-path feature layer.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    layer_url: String,
}

impl RemoteSource {
    pub fn new(layer_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            layer_url: layer_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn query_url(&self) -> String {
        format!("{}/query", self.layer_url)
    }

    pub async fn query(self, query: SpatialQuery) -> Result<Vec<EclipseFeature>, String> {
        let response = self
            .client
            .get(self.query_url())
            .query(&to_params(&query))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("feature service returned {}", response.status()));
        }
        let body = response.text().await.map_err(|e| e.to_string())?;
        decode_feature_set(&body).map_err(|e| e.to_string())
    }
}
