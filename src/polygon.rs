//! Polygon Conversion
//!
//! Arcs are handed to the layout library as closed polygons. Vertices are
//! stored as an `(n, 2)` array of `[x, y]` rows; the closing edge from the
//! last vertex back to the first is implicit.

use ndarray::{s, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::InvalidParameterError;
use crate::grating::ArcSegment;

/// Default number of points per arc edge.
pub const DEFAULT_ARC_VERTICES: usize = 32;

/// Closed polygon in the layout plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Array2<f64>,
}

/// Axis-aligned bounds `(x_min, y_min, x_max, y_max)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Polygon {
    /// Build from points in drawing order.
    pub fn from_points(points: &[Complex64]) -> Self {
        let mut vertices = Array2::zeros((points.len(), 2));
        for (i, p) in points.iter().enumerate() {
            vertices[[i, 0]] = p.re;
            vertices[[i, 1]] = p.im;
        }
        Self { vertices }
    }

    /// Regular polygon approximating a circle.
    pub fn circle(center: (f64, f64), radius: f64, vertices: usize) -> Self {
        let c = Complex64::new(center.0, center.1);
        let points: Vec<Complex64> = (0..vertices)
            .map(|i| c + Complex64::from_polar(radius, 2.0 * PI * i as f64 / vertices as f64))
            .collect();
        Self::from_points(&points)
    }

    /// Axis-aligned rectangle centered on `center`.
    pub fn rect(center: (f64, f64), width: f64, height: f64) -> Self {
        let (x, y) = center;
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self::from_points(&[
            Complex64::new(x - hw, y - hh),
            Complex64::new(x + hw, y - hh),
            Complex64::new(x + hw, y + hh),
            Complex64::new(x - hw, y + hh),
        ])
    }

    pub fn len(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.nrows() == 0
    }

    /// Vertex rows `[x, y]`.
    pub fn vertices(&self) -> &Array2<f64> {
        &self.vertices
    }

    /// Enclosed area (shoelace formula), independent of orientation.
    pub fn area(&self) -> f64 {
        let n = self.len();
        if n < 3 {
            return 0.0;
        }
        let x = self.vertices.column(0);
        let y = self.vertices.column(1);

        let mut twice_area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            twice_area += x[i] * y[j] - x[j] * y[i];
        }
        twice_area.abs() / 2.0
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.is_empty() {
            return None;
        }
        let fold = |col: usize| {
            self.vertices
                .column(col)
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        let (x_min, x_max) = fold(0);
        let (y_min, y_max) = fold(1);
        Some(BoundingBox {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    /// Shift every vertex by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.vertices.slice_mut(s![.., 0]).mapv_inplace(|x| x + dx);
        self.vertices.slice_mut(s![.., 1]).mapv_inplace(|y| y + dy);
    }
}

/// `vertices` evenly spaced points on the circle of `radius` between two angles (degrees).
fn arc_points(
    center: Complex64,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    vertices: usize,
) -> Vec<Complex64> {
    let step = (end_deg - start_deg) / (vertices - 1) as f64;
    (0..vertices)
        .map(|k| center + Complex64::from_polar(radius, (start_deg + k as f64 * step).to_radians()))
        .collect()
}

fn check_vertices(vertices: usize) -> Result<(), InvalidParameterError> {
    if vertices < 2 {
        return Err(InvalidParameterError::new(
            "vertices",
            format!("an arc edge needs at least 2 points, got {}", vertices),
        ));
    }
    Ok(())
}

impl ArcSegment {
    /// Annular wedge polygon: outer edge counter-clockwise, inner edge back.
    pub fn to_polygon(
        &self,
        center: (f64, f64),
        vertices: usize,
    ) -> Result<Polygon, InvalidParameterError> {
        check_vertices(vertices)?;
        let c = Complex64::new(center.0, center.1);

        let (a1, a2) = (self.angle_start, self.angle_end);

        let mut points = arc_points(c, self.outer_radius(), a1, a2, vertices);
        let mut inner = arc_points(c, self.inner_radius(), a1, a2, vertices);
        inner.reverse();
        points.extend(inner);

        Ok(Polygon::from_points(&points))
    }

    /// The wedge cut into `vertices - 1` quadrilaterals along its angle.
    pub fn to_quads(
        &self,
        center: (f64, f64),
        vertices: usize,
    ) -> Result<Vec<Polygon>, InvalidParameterError> {
        check_vertices(vertices)?;
        let c = Complex64::new(center.0, center.1);

        let (a1, a2) = (self.angle_start, self.angle_end);

        let outer = arc_points(c, self.outer_radius(), a1, a2, vertices);
        let inner = arc_points(c, self.inner_radius(), a1, a2, vertices);

        Ok((0..vertices - 1)
            .map(|k| Polygon::from_points(&[inner[k], outer[k], outer[k + 1], inner[k + 1]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_arc() -> ArcSegment {
        ArcSegment {
            ring_index: 0,
            center_radius: 1.0,
            width: 0.2,
            angle_start: 0.0,
            angle_end: 90.0,
        }
    }

    #[test]
    fn test_rect_area_and_bounds() {
        let r = Polygon::rect((1.0, 2.0), 4.0, 2.0);
        assert_eq!(r.len(), 4);
        assert!((r.area() - 8.0).abs() < 1e-12);

        let bb = r.bounding_box().unwrap();
        assert_eq!(bb, BoundingBox { x_min: -1.0, y_min: 1.0, x_max: 3.0, y_max: 3.0 });
    }

    #[test]
    fn test_circle_area_converges() {
        let c = Polygon::circle((0.0, 0.0), 2.0, 256);
        assert!((c.area() - PI * 4.0).abs() / (PI * 4.0) < 1e-3);
    }

    #[test]
    fn test_arc_polygon_shape() {
        let arc = quarter_arc();
        let poly = arc.to_polygon((0.0, 0.0), 32).unwrap();
        assert_eq!(poly.len(), 64);

        // First point lies on the outer edge at angle_start
        let v = poly.vertices();
        assert!((v[[0, 0]] - 1.1).abs() < 1e-12);
        assert!(v[[0, 1]].abs() < 1e-12);
        // Last point lies on the inner edge at angle_start
        assert!((v[[63, 0]] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_arc_area_matches_annular_sector() {
        let arc = quarter_arc();
        let poly = arc.to_polygon((0.0, 0.0), 512).unwrap();
        let exact = PI / 360.0 * (1.1_f64.powi(2) - 0.9_f64.powi(2)) * 90.0;
        assert!((poly.area() - exact).abs() / exact < 1e-4);
    }

    #[test]
    fn test_quads_tile_wedge() {
        let arc = quarter_arc();
        let quads = arc.to_quads((0.0, 0.0), 16).unwrap();
        assert_eq!(quads.len(), 15);

        let total: f64 = quads.iter().map(|q| q.area()).sum();
        let whole = arc.to_polygon((0.0, 0.0), 16).unwrap().area();
        assert!((total - whole).abs() < 1e-10);
    }

    #[test]
    fn test_center_offset() {
        let arc = quarter_arc();
        let mut at_origin = arc.to_polygon((0.0, 0.0), 8).unwrap();
        let shifted = arc.to_polygon((3.0, -2.0), 8).unwrap();
        at_origin.translate(3.0, -2.0);

        for (a, b) in at_origin.vertices().iter().zip(shifted.vertices().iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(quarter_arc().to_polygon((0.0, 0.0), 1).is_err());
        assert!(quarter_arc().to_quads((0.0, 0.0), 0).is_err());
    }
}
