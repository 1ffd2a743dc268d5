//! Circular Bragg Grating Generator
//!
//! Turns a [`GratingParameters`] set into the etched air rings of a CBG.
//! Every ring is drawn as `contact_count` arcs; the angular gaps between
//! them are left unetched and carry the electrical contacts.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::InvalidParameterError;
use crate::params::GratingParameters;

/// One etched annular wedge of the grating.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub ring_index: usize,
    pub center_radius: f64,
    /// Radial width of the wedge.
    pub width: f64,
    /// Start angle in degrees.
    pub angle_start: f64,
    /// End angle in degrees.
    pub angle_end: f64,
}

impl ArcSegment {
    #[inline]
    pub fn inner_radius(&self) -> f64 {
        self.center_radius - self.width / 2.0
    }

    #[inline]
    pub fn outer_radius(&self) -> f64 {
        self.center_radius + self.width / 2.0
    }

    /// Angular extent in degrees.
    #[inline]
    pub fn span(&self) -> f64 {
        self.angle_end - self.angle_start
    }
}

/// Placement of a single ring before it is split into arcs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingLayout {
    pub index: usize,
    pub center_radius: f64,
    /// Half of the angle taken by one contact, in degrees.
    pub beta: f64,
    /// Rotation of the contact pattern, in degrees.
    pub alpha: f64,
}

/// Circular Bragg Grating generator.
///
/// Parameters are validated once in [`new`](Self::new); geometry that only
/// becomes infeasible at a particular ring is rejected by
/// [`generate`](Self::generate) before anything is returned.
#[derive(Clone, Debug)]
pub struct RingGratingGenerator {
    params: GratingParameters,
}

impl RingGratingGenerator {
    /// Create a generator for a validated parameter set.
    pub fn new(params: GratingParameters) -> Result<Self, InvalidParameterError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GratingParameters {
        &self.params
    }

    /// Number of arcs a successful [`generate`](Self::generate) returns.
    pub fn arc_count(&self) -> usize {
        (self.params.ring_count + 1) * self.params.contact_count
    }

    /// Angle between two neighbouring contacts, in degrees.
    #[inline]
    pub fn angle_diff(&self) -> f64 {
        360.0 / self.params.contact_count as f64
    }

    /// Center radius of ring `n`, including the gap offset.
    pub fn center_radius(&self, n: usize) -> f64 {
        let p = &self.params;
        let mut r = p.center_disk_radius + p.air_gap_width / 2.0 + n as f64 * p.ring_pitch();
        if p.gap_mode.applies(n, p.gap_start_index) {
            r += p.gap_width;
        }
        r
    }

    /// Half-angle in degrees consumed by one contact on a ring of center radius `r`.
    fn contact_half_angle(&self, n: usize, r: f64) -> Result<f64, InvalidParameterError> {
        let p = &self.params;
        let inner = r - p.air_gap_width / 2.0;
        let ratio = p.contact_width / (2.0 * inner);

        if !(ratio <= 1.0) {
            return Err(InvalidParameterError::for_parameters(
                &["contact_width", "center_disk_radius"],
                format!(
                    "contact of width {} does not fit on ring {} with inner radius {}",
                    p.contact_width, n, inner
                ),
            ));
        }

        Ok(ratio.asin().to_degrees())
    }

    /// Lay out every ring, checking that its arcs are realizable.
    pub fn rings(&self) -> Result<Vec<RingLayout>, InvalidParameterError> {
        let p = &self.params;
        let angle_diff = self.angle_diff();

        let mut rings = Vec::with_capacity(p.ring_count + 1);
        let mut alpha = 0.0;

        for n in 0..=p.ring_count {
            let center_radius = self.center_radius(n);
            let beta = self.contact_half_angle(n, center_radius)?;

            if angle_diff <= 2.0 * beta {
                return Err(InvalidParameterError::for_parameters(
                    &["contact_width", "contact_count"],
                    format!(
                        "contacts too wide for contact count (ring {}: {:.3} > {:.3} deg)",
                        n,
                        2.0 * beta,
                        angle_diff
                    ),
                ));
            }

            debug!(ring = n, center_radius, width = p.air_gap_width, beta, "ring layout");

            rings.push(RingLayout {
                index: n,
                center_radius,
                beta,
                alpha,
            });

            // Rotate the next ring's contacts so they do not line up radially
            alpha += p.contact_angle_step;
        }

        Ok(rings)
    }

    /// Generate all arcs, ring by ring and contact by contact.
    pub fn generate(&self) -> Result<Vec<ArcSegment>, InvalidParameterError> {
        let rings = self.rings()?;
        let angle_diff = self.angle_diff();
        let width = self.params.air_gap_width;

        let mut arcs = Vec::with_capacity(self.arc_count());
        for ring in &rings {
            for i in 0..self.params.contact_count {
                let arc = ArcSegment {
                    ring_index: ring.index,
                    center_radius: ring.center_radius,
                    width,
                    angle_start: ring.alpha + i as f64 * angle_diff + ring.beta,
                    angle_end: ring.alpha + (i + 1) as f64 * angle_diff - ring.beta,
                };
                trace!(?arc, "arc");
                arcs.push(arc);
            }
        }

        Ok(arcs)
    }
}

/// Validate `params` and generate its arcs.
pub fn generate(params: &GratingParameters) -> Result<Vec<ArcSegment>, InvalidParameterError> {
    RingGratingGenerator::new(params.clone())?.generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GapMode;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn single_ring() -> GratingParameters {
        GratingParameters {
            center_disk_radius: 0.36,
            air_gap_width: 0.30,
            ring_width: 0.36,
            ring_count: 0,
            contact_count: 4,
            contact_width: 0.1,
            contact_angle_step: 90.0,
            gap_start_index: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_ring_example() {
        let arcs = generate(&single_ring()).unwrap();
        assert_eq!(arcs.len(), 4);

        let beta = (0.1_f64 / (2.0 * 0.36)).asin().to_degrees();
        assert!((beta - 7.98).abs() < 0.05);

        for (i, arc) in arcs.iter().enumerate() {
            assert_eq!(arc.ring_index, 0);
            assert!((arc.center_radius - 0.51).abs() < 1e-12);
            assert!((arc.width - 0.30).abs() < 1e-12);
            assert!((arc.angle_start - (i as f64 * 90.0 + beta)).abs() < 1e-10);
            assert!((arc.angle_end - ((i + 1) as f64 * 90.0 - beta)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_second_ring_without_gap() {
        let params = GratingParameters {
            ring_count: 1,
            gap_width: 5.0,
            ..single_ring()
        };
        let arcs = generate(&params).unwrap();
        assert_eq!(arcs.len(), 8);

        let ring1: Vec<_> = arcs.iter().filter(|a| a.ring_index == 1).collect();
        assert_eq!(ring1.len(), 4);
        for arc in ring1 {
            assert!((arc.center_radius - 1.17).abs() < 1e-12);
        }
    }

    #[test]
    fn test_contact_pattern_rotates_per_ring() {
        let params = GratingParameters {
            ring_count: 2,
            contact_angle_step: 30.0,
            ..single_ring()
        };
        let gen = RingGratingGenerator::new(params).unwrap();
        let rings = gen.rings().unwrap();
        let alphas: Vec<f64> = rings.iter().map(|r| r.alpha).collect();
        assert_eq!(alphas, vec![0.0, 30.0, 60.0]);

        let arcs = gen.generate().unwrap();
        let first_of_ring2 = arcs[8];
        assert!((first_of_ring2.angle_start - (60.0 + rings[2].beta)).abs() < 1e-10);
    }

    #[test]
    fn test_gap_after_index() {
        let params = GratingParameters {
            ring_count: 5,
            gap_start_index: 2,
            gap_width: 1.0,
            ..Default::default()
        };
        let gen = RingGratingGenerator::new(params.clone()).unwrap();
        let pitch = params.ring_pitch();

        for n in 0..5 {
            let step = gen.center_radius(n + 1) - gen.center_radius(n);
            let expected = if n == 2 { pitch + 1.0 } else { pitch };
            assert!((step - expected).abs() < 1e-12, "ring {}: {}", n, step);
        }
    }

    #[test]
    fn test_gap_from_index() {
        let params = GratingParameters {
            ring_count: 5,
            gap_start_index: 2,
            gap_width: 1.0,
            gap_mode: GapMode::FromIndex,
            ..Default::default()
        };
        let gen = RingGratingGenerator::new(params.clone()).unwrap();
        let step = gen.center_radius(2) - gen.center_radius(1);
        assert!((step - (params.ring_pitch() + 1.0)).abs() < 1e-12);
        let step = gen.center_radius(3) - gen.center_radius(2);
        assert!((step - params.ring_pitch()).abs() < 1e-12);
    }

    #[test]
    fn test_zero_contact_width_spans_full_sector() {
        let params = GratingParameters {
            contact_width: 0.0,
            contact_count: 3,
            ..Default::default()
        };
        for arc in generate(&params).unwrap() {
            assert!((arc.span() - 120.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_single_contact_covers_almost_full_circle() {
        let params = GratingParameters {
            contact_count: 1,
            ..Default::default()
        };
        let arcs = generate(&params).unwrap();
        assert_eq!(arcs.len(), params.ring_count + 1);
        assert!(arcs.iter().all(|a| a.span() > 300.0));
    }

    #[test]
    fn test_contact_wider_than_ring_fails() {
        let params = GratingParameters {
            contact_width: 1.0,
            ..single_ring()
        };
        let err = generate(&params).unwrap_err();
        assert!(err.involves("contact_width"));
    }

    #[test]
    fn test_contacts_too_wide_for_count() {
        // beta = asin(0.7 / 0.72) ~ 76.5 deg > angle_diff / 2 = 45 deg
        let params = GratingParameters {
            contact_width: 0.7,
            ..single_ring()
        };
        let err = generate(&params).unwrap_err();
        assert!(err.involves("contact_count"));
        assert!(err.reason.contains("too wide"));
    }

    #[test]
    fn test_huge_counts_fail_instead_of_overflowing() {
        let params = GratingParameters {
            ring_count: usize::MAX,
            ..Default::default()
        };
        assert!(generate(&params).unwrap_err().involves("ring_count"));

        let params = GratingParameters {
            ring_count: usize::MAX / 2,
            contact_count: usize::MAX / 2,
            ..Default::default()
        };
        assert!(RingGratingGenerator::new(params).is_err());
    }

    #[test]
    fn test_invalid_parameters_rejected_up_front() {
        let params = GratingParameters {
            contact_count: 0,
            ..Default::default()
        };
        assert!(RingGratingGenerator::new(params).is_err());
    }

    #[test]
    fn test_idempotent() {
        let params = GratingParameters {
            gap_start_index: 1,
            ..Default::default()
        };
        assert_eq!(generate(&params).unwrap(), generate(&params).unwrap());
    }

    #[test]
    fn test_random_parameter_sets() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let params = GratingParameters {
                center_disk_radius: rng.gen_range(0.2..2.0),
                air_gap_width: rng.gen_range(0.05..0.5),
                ring_width: rng.gen_range(0.05..0.5),
                ring_count: rng.gen_range(0..12),
                contact_count: rng.gen_range(1..9),
                contact_width: rng.gen_range(0.0..0.15),
                contact_angle_step: rng.gen_range(0.0..90.0),
                gap_start_index: rng.gen_range(0..6),
                gap_width: rng.gen_range(0.0..2.0),
                ..Default::default()
            };
            let gen = RingGratingGenerator::new(params.clone()).unwrap();
            let arcs = gen.generate().unwrap();
            let rings = gen.rings().unwrap();

            assert_eq!(arcs.len(), (params.ring_count + 1) * params.contact_count);

            for arc in &arcs {
                let ring = &rings[arc.ring_index];
                assert!(arc.angle_start < arc.angle_end);
                assert!(arc.angle_start.is_finite() && arc.angle_end.is_finite());
                assert!((arc.span() - (gen.angle_diff() - 2.0 * ring.beta)).abs() < 1e-9);
            }

            for w in rings.windows(2) {
                assert!(w[1].center_radius > w[0].center_radius);
            }

            // Ring-then-contact order
            for w in arcs.windows(2) {
                assert!(w[1].ring_index >= w[0].ring_index);
            }
        }
    }
}
