use anyhow::Context;
use eclipsecore::feature_source::{decode_feature_set, MemorySource};
use eclipsecore::model::EclipseFeature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Eclipse catalogue served by the local endpoint.
///
/// YAML files hold a `features` list; `.json` files are read as a saved
/// service response.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub features: Vec<EclipseFeature>,
}

impl CatalogConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading catalog {}", path_ref.display()))?;
        let is_json = path_ref
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let config = if is_json {
            CatalogConfig {
                features: decode_feature_set(&contents)
                    .with_context(|| format!("decoding feature set {}", path_ref.display()))?,
            }
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("parsing catalog {}", path_ref.display()))?
        };
        Ok(config)
    }

    pub fn into_source(self) -> MemorySource {
        MemorySource::new(self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclipsecore::feature_source::encode_feature_set;
    use eclipsecore::model::{EclipseType, FeatureId};
    use std::io::Write;
    use tempfile::Builder;

    const CATALOG: &str = r#"
features:
  - id: 42
    record:
      eclipse_type: Total
      date: 2024-04-08T00:00:00Z
      greatest_eclipse: 2024-04-08T18:17:16Z
      duration_seconds: 268
      path_width_km: 198
      magnitude: 1.0566
      sun_altitude: 70
      sun_azimuth: 149
      lunation: 294
      saros: 139
      gamma: 0.3431
      delta_t: 74
    geometry:
      rings:
        - [[-100, 20], [-80, 20], [-80, 40], [-100, 40], [-100, 20]]
"#;

    #[test]
    fn catalog_load_reads_yaml() {
        let mut temp = Builder::new().suffix(".yaml").tempfile().unwrap();
        temp.write_all(CATALOG.as_bytes()).unwrap();
        let path = temp.into_temp_path();
        let catalog = CatalogConfig::load(&path).unwrap();
        assert_eq!(catalog.features.len(), 1);
        assert_eq!(catalog.features[0].id, FeatureId(42));
        assert_eq!(catalog.features[0].record.eclipse_type, EclipseType::Total);
        assert_eq!(catalog.features[0].record.path_width_km, Some(198.0));
    }

    #[test]
    fn catalog_load_reads_saved_service_response() {
        let mut yaml = Builder::new().suffix(".yaml").tempfile().unwrap();
        yaml.write_all(CATALOG.as_bytes()).unwrap();
        let features = CatalogConfig::load(yaml.path()).unwrap().features;

        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        json.write_all(encode_feature_set(&features).to_string().as_bytes())
            .unwrap();
        let catalog = CatalogConfig::load(json.path()).unwrap();
        assert_eq!(catalog.features, features);
    }

    #[test]
    fn missing_catalog_reports_path() {
        let err = CatalogConfig::load("/nonexistent/catalog.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.yaml"));
    }
}
