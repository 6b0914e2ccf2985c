use crate::prelude::{ViewerError, ViewerResult};
use serde::{Deserialize, Serialize};

/// Rendering surface offered by the map host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderSurface {
    /// Shapes are drawn as vector paths and can be recoloured in place.
    #[default]
    Vector,
    /// Pre-rendered raster tiles; paths cannot be restyled.
    Raster,
}

pub const INCOMPATIBLE_NOTICE: &str = "This viewer is not compatible with this display.";

/// Startup check: path highlighting needs a vector surface.
pub fn ensure_vector_surface(surface: RenderSurface) -> ViewerResult<()> {
    match surface {
        RenderSurface::Vector => Ok(()),
        RenderSurface::Raster => Err(ViewerError::IncompatibleSurface(
            INCOMPATIBLE_NOTICE.to_string(),
        )),
    }
}
