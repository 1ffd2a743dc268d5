//! Device Interface
//!
//! Common surface of the geometry generators as seen by the layout library.

use crate::error::InvalidParameterError;
use crate::grating::RingGratingGenerator;
use crate::membrane::MembraneParameters;
use crate::polygon::Polygon;

/// A parametric device that can be drawn as polygons.
pub trait Device {
    /// Unique device name.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Polygonised geometry, `vertices` points per curved edge or full circle.
    fn polygons(&self, vertices: usize) -> Result<Vec<Polygon>, InvalidParameterError>;
}

impl Device for RingGratingGenerator {
    fn name(&self) -> &'static str {
        "CUSTOM_CBG"
    }

    fn description(&self) -> &'static str {
        "Circular Bragg Grating"
    }

    /// Etched air rings.
    fn polygons(&self, vertices: usize) -> Result<Vec<Polygon>, InvalidParameterError> {
        let center = self.params().center;
        self.generate()?
            .iter()
            .map(|arc| arc.to_polygon(center, vertices))
            .collect()
    }
}

impl Device for MembraneParameters {
    fn name(&self) -> &'static str {
        "CUSTOM_FFM"
    }

    fn description(&self) -> &'static str {
        "Free-free membrane resonator"
    }

    /// Support disk followed by the unetched membrane and tethers.
    fn polygons(&self, vertices: usize) -> Result<Vec<Polygon>, InvalidParameterError> {
        let geometry = self.geometry_with_vertices(vertices)?;
        let mut polygons = Vec::with_capacity(1 + geometry.keep.len());
        polygons.push(geometry.support);
        polygons.extend(geometry.keep);
        Ok(polygons)
    }
}
