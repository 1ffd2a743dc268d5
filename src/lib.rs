//! Parametric Photonic Device Geometry
//!
//! Geometry generators for mask layout: circular Bragg gratings with
//! electrical contacts and free-free membrane resonators. Output is plain
//! arcs and polygons for an external layout library to place and export.

pub mod device;
pub mod error;
pub mod grating;
pub mod membrane;
pub mod params;
pub mod polygon;

pub use device::Device;
pub use error::{Error, InvalidParameterError, Result};
pub use grating::{generate, ArcSegment, RingGratingGenerator, RingLayout};
pub use membrane::{MembraneGeometry, MembraneParameters};
pub use params::{GapMode, GratingParameters, MAX_ARCS};
pub use polygon::{BoundingBox, Polygon, DEFAULT_ARC_VERTICES};
