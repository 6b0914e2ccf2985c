use anyhow::Context;
use eclipsecore::geometry::{MapPoint, Viewport, MAX_ZOOM, MIN_ZOOM};
use eclipsecore::host::RenderSurface;
use eclipsecore::selection::Palette;
use eclipsecore::{ControllerConfig, InteractionMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str =
    "https://services.arcgis.com/6DIQcwlPy8knb6sg/arcgis/rest/services/SolarEclipsePath/FeatureServer/0";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub service_url: String,
    pub mode: InteractionMode,
    pub idle_timeout_ms: u64,
    pub slide_ms: u64,
    pub panel_width: f32,
    /// Map centre as `[lon, lat]`.
    pub center: [f64; 2],
    pub zoom: f64,
    pub palette: Palette,
    pub surface: RenderSurface,
    pub show_tutorial: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            mode: InteractionMode::Click,
            idle_timeout_ms: 3000,
            slide_ms: 300,
            panel_width: 175.0,
            center: [-30.0, 30.0],
            zoom: 3.0,
            palette: Palette::default(),
            surface: RenderSurface::Vector,
            show_tutorial: true,
        }
    }
}

impl ViewerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading viewer config {}", path_ref.display()))?;
        let config: ViewerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing viewer config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.palette.validate().context("validating palette")?;
        anyhow::ensure!(
            self.panel_width > 0.0,
            "panel_width must be positive, got {}",
            self.panel_width
        );
        anyhow::ensure!(
            (MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom),
            "zoom must lie in {MIN_ZOOM}..={MAX_ZOOM}, got {}",
            self.zoom
        );
        anyhow::ensure!(
            reqwest::Url::parse(&self.service_url).is_ok(),
            "service_url {:?} is not a URL",
            self.service_url
        );
        Ok(())
    }

    pub fn to_controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            mode: self.mode,
            idle_timeout: Duration::from_millis(self.idle_timeout_ms),
            slide_duration: Duration::from_millis(self.slide_ms),
            panel_width: self.panel_width,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(MapPoint::new(self.center[0], self.center[1]), self.zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_hosted_viewer() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        let controller = config.to_controller_config();
        assert_eq!(controller.mode, InteractionMode::Click);
        assert_eq!(controller.idle_timeout, Duration::from_secs(3));
        assert_eq!(controller.slide_duration, Duration::from_millis(300));
        assert_eq!(config.viewport().zoom, 3.0);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"service_url: http://127.0.0.1:9000/SolarEclipsePath/FeatureServer/0\n\
              mode: hover\nidle_timeout_ms: 1500\npalette:\n  highlight: \"#ff00ff\"\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.mode, InteractionMode::Hover);
        assert_eq!(config.idle_timeout_ms, 1500);
        assert_eq!(config.palette.highlight, "#ff00ff");
        assert_eq!(config.palette.past, "#008080");
        assert_eq!(config.slide_ms, 300);
    }

    #[test]
    fn invalid_palette_is_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"palette:\n  past: teal\n").unwrap();
        assert!(ViewerConfig::load(temp.path()).is_err());
    }
}
