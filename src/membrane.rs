//! Free-Free Membrane Resonator
//!
//! Rectangular membrane suspended by two tethers that span a circular
//! support ring. The etched area is the support disk minus the membrane
//! and the tethers.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{InvalidParameterError, Result};
use crate::polygon::Polygon;

/// Vertices used for the support ring.
pub const SUPPORT_RING_VERTICES: usize = 64;

const LENGTH_RANGE: (f64, f64) = (0.5, 150.0);

/// Membrane dimensions in µm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembraneParameters {
    /// Membrane length along y (L).
    pub length: f64,
    /// Membrane width along x (W).
    pub width: f64,
    pub tether_width: f64,
    /// Distance of each tether from the membrane center.
    pub tether_offset: f64,
    /// Support ring radius (R).
    pub ring_radius: f64,
}

impl Default for MembraneParameters {
    fn default() -> Self {
        Self {
            length: 40.0,
            width: 12.5,
            tether_width: 2.0,
            tether_offset: 11.0,
            ring_radius: 30.0,
        }
    }
}

impl MembraneParameters {
    pub fn validate(&self) -> std::result::Result<(), InvalidParameterError> {
        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("tether_width", self.tether_width),
            ("ring_radius", self.ring_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidParameterError::new(
                    name,
                    format!("must be a finite value > 0, got {}", value),
                ));
            }
        }
        if !self.tether_offset.is_finite() || self.tether_offset < 0.0 {
            return Err(InvalidParameterError::new(
                "tether_offset",
                format!("must be a finite value >= 0, got {}", self.tether_offset),
            ));
        }

        let (lo, hi) = LENGTH_RANGE;
        if !(lo..=hi).contains(&self.length) {
            return Err(InvalidParameterError::new(
                "length",
                format!("must lie in [{}, {}], got {}", lo, hi, self.length),
            ));
        }

        if self.width / 2.0 >= self.ring_radius || self.length / 2.0 >= self.ring_radius {
            return Err(InvalidParameterError::for_parameters(
                &["length", "width", "ring_radius"],
                "membrane does not fit inside the support ring",
            ));
        }

        if self.tether_offset + self.tether_width / 2.0 > self.length / 2.0 {
            return Err(InvalidParameterError::for_parameters(
                &["tether_offset", "tether_width", "length"],
                "tethers must attach to the membrane",
            ));
        }

        Ok(())
    }

    /// Build the support ring and the structures kept out of the etch.
    pub fn geometry(&self) -> std::result::Result<MembraneGeometry, InvalidParameterError> {
        self.geometry_with_vertices(SUPPORT_RING_VERTICES)
    }

    /// Same as [`geometry`](Self::geometry) with `vertices` points on the support ring.
    pub fn geometry_with_vertices(
        &self,
        vertices: usize,
    ) -> std::result::Result<MembraneGeometry, InvalidParameterError> {
        self.validate()?;
        if vertices < 3 {
            return Err(InvalidParameterError::new(
                "vertices",
                format!("a support ring needs at least 3 points, got {}", vertices),
            ));
        }

        let support = Polygon::circle((0.0, 0.0), self.ring_radius, vertices);
        let membrane = Polygon::rect((0.0, 0.0), self.width, self.length);
        let tether_len = 2.0 * self.ring_radius;
        let upper = Polygon::rect((0.0, self.tether_offset), tether_len, self.tether_width);
        let lower = Polygon::rect((0.0, -self.tether_offset), tether_len, self.tether_width);

        debug!(
            length = self.length,
            width = self.width,
            ring_radius = self.ring_radius,
            "membrane geometry"
        );

        Ok(MembraneGeometry {
            support,
            keep: vec![membrane, upper, lower],
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}

/// Etched region `support - union(keep)`.
#[derive(Clone, Debug)]
pub struct MembraneGeometry {
    pub support: Polygon,
    /// Membrane first, then the upper and lower tether.
    pub keep: Vec<Polygon>,
}
