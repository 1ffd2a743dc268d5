//! Circular Bragg Grating parameters
//!
//! All lengths are in µm, all angles in degrees.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{InvalidParameterError, Result};

/// Which rings receive the extra radial gap offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapMode {
    /// Rings with index `n > gap_start_index`.
    #[default]
    AfterIndex,
    /// Rings with index `n >= gap_start_index`.
    FromIndex,
}

impl GapMode {
    /// Whether ring `n` sits beyond the gap.
    #[inline]
    pub fn applies(self, n: usize, gap_start_index: usize) -> bool {
        if gap_start_index == 0 {
            return false;
        }
        match self {
            GapMode::AfterIndex => n > gap_start_index,
            GapMode::FromIndex => n >= gap_start_index,
        }
    }
}

/// Geometry of a circular Bragg grating with electrical contacts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GratingParameters {
    /// Radius of the center disk (Rc).
    pub center_disk_radius: f64,
    /// Width of each etched air ring (w_Air).
    pub air_gap_width: f64,
    /// Width of each semiconductor ring (w_GaAs).
    pub ring_width: f64,
    /// Number of rings beyond ring 0 (n_rings).
    pub ring_count: usize,
    /// Grating center (x0, y0).
    pub center: (f64, f64),
    /// Electrical contacts per ring (elC_n).
    pub contact_count: usize,
    /// Width of one electrical contact (elC_w).
    pub contact_width: f64,
    /// Rotation of the contact pattern from one ring to the next (elC_relAngle).
    pub contact_angle_step: f64,
    /// Ring index after which the gap is inserted, 0 disables it.
    pub gap_start_index: usize,
    /// Extra radial offset applied to rings past the gap.
    pub gap_width: f64,
    /// Which rings the gap applies to; `AfterIndex` (`n > gap_start_index`) by default.
    pub gap_mode: GapMode,
}

impl Default for GratingParameters {
    fn default() -> Self {
        Self {
            center_disk_radius: 0.36,
            air_gap_width: 0.30,
            ring_width: 0.36,
            ring_count: 4,
            center: (0.0, 0.0),
            contact_count: 4,
            contact_width: 0.1,
            contact_angle_step: 90.0,
            gap_start_index: 0,
            gap_width: 1.0,
            gap_mode: GapMode::AfterIndex,
        }
    }
}

// Design ranges of the device parameter table.
const LENGTH_RANGE: (f64, f64) = (0.0, 2.0);
const COUNT_RANGE: (usize, usize) = (0, 20);
const ANGLE_STEP_RANGE: (f64, f64) = (0.0, 90.0);
const GAP_WIDTH_RANGE: (f64, f64) = (0.0, 10.0);

/// Upper bound on the arcs a single grating may produce.
pub const MAX_ARCS: usize = 1 << 24;

fn positive(name: &str, value: f64) -> std::result::Result<(), InvalidParameterError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(InvalidParameterError::new(
            name,
            format!("must be a finite value > 0, got {}", value),
        ));
    }
    Ok(())
}

fn non_negative(name: &str, value: f64) -> std::result::Result<(), InvalidParameterError> {
    if !value.is_finite() || value < 0.0 {
        return Err(InvalidParameterError::new(
            name,
            format!("must be a finite value >= 0, got {}", value),
        ));
    }
    Ok(())
}

fn clip_f64(name: &str, value: f64, (lo, hi): (f64, f64)) -> f64 {
    let clipped = value.clamp(lo, hi);
    if clipped != value {
        warn!(parameter = name, value, clipped, "parameter clipped to design range");
    }
    clipped
}

fn clip_usize(name: &str, value: usize, (lo, hi): (usize, usize)) -> usize {
    let clipped = value.clamp(lo, hi);
    if clipped != value {
        warn!(parameter = name, value, clipped, "parameter clipped to design range");
    }
    clipped
}

impl GratingParameters {
    /// Build from the period / duty-cycle parameterisation.
    ///
    /// The etched width is `(1 - duty_cycle) * period` and the remaining
    /// `duty_cycle * period` is the ring, so rings repeat every `period`.
    pub fn from_duty_cycle(
        period: f64,
        duty_cycle: f64,
    ) -> std::result::Result<Self, InvalidParameterError> {
        positive("period", period)?;
        if !duty_cycle.is_finite() || duty_cycle <= 0.0 || duty_cycle >= 1.0 {
            return Err(InvalidParameterError::new(
                "duty_cycle",
                format!("must lie strictly between 0 and 1, got {}", duty_cycle),
            ));
        }

        Ok(Self {
            air_gap_width: (1.0 - duty_cycle) * period,
            ring_width: duty_cycle * period,
            ..Self::default()
        })
    }

    /// Distance between the centers of two neighbouring rings.
    #[inline]
    pub fn ring_pitch(&self) -> f64 {
        self.air_gap_width + self.ring_width
    }

    /// Check every field against its domain.
    pub fn validate(&self) -> std::result::Result<(), InvalidParameterError> {
        positive("center_disk_radius", self.center_disk_radius)?;
        positive("air_gap_width", self.air_gap_width)?;
        positive("ring_width", self.ring_width)?;
        non_negative("contact_width", self.contact_width)?;
        non_negative("gap_width", self.gap_width)?;

        if !self.center.0.is_finite() || !self.center.1.is_finite() {
            return Err(InvalidParameterError::new(
                "center",
                format!("must be finite, got {:?}", self.center),
            ));
        }

        if self.contact_count == 0 {
            return Err(InvalidParameterError::new(
                "contact_count",
                "at least one electrical contact is required",
            ));
        }

        let arcs = self
            .ring_count
            .checked_add(1)
            .and_then(|rings| rings.checked_mul(self.contact_count));
        if !matches!(arcs, Some(n) if n <= MAX_ARCS) {
            return Err(InvalidParameterError::for_parameters(
                &["ring_count", "contact_count"],
                format!(
                    "{} rings of {} contacts exceed the limit of {} arcs",
                    self.ring_count, self.contact_count, MAX_ARCS
                ),
            ));
        }

        let (lo, hi) = ANGLE_STEP_RANGE;
        if !(lo..=hi).contains(&self.contact_angle_step) {
            return Err(InvalidParameterError::new(
                "contact_angle_step",
                format!(
                    "must lie in [{}, {}] degrees, got {}",
                    lo, hi, self.contact_angle_step
                ),
            ));
        }

        Ok(())
    }

    /// Clamp every field into the design range of the parameter table.
    ///
    /// The result may still fail [`validate`](Self::validate), e.g. when a
    /// width is clipped to zero.
    pub fn clip_to_design_range(&self) -> Self {
        Self {
            center_disk_radius: clip_f64(
                "center_disk_radius",
                self.center_disk_radius,
                LENGTH_RANGE,
            ),
            air_gap_width: clip_f64("air_gap_width", self.air_gap_width, LENGTH_RANGE),
            ring_width: clip_f64("ring_width", self.ring_width, LENGTH_RANGE),
            ring_count: clip_usize("ring_count", self.ring_count, COUNT_RANGE),
            center: (
                clip_f64("center.x", self.center.0, LENGTH_RANGE),
                clip_f64("center.y", self.center.1, LENGTH_RANGE),
            ),
            contact_count: clip_usize("contact_count", self.contact_count, COUNT_RANGE),
            contact_width: clip_f64("contact_width", self.contact_width, LENGTH_RANGE),
            contact_angle_step: clip_f64(
                "contact_angle_step",
                self.contact_angle_step,
                ANGLE_STEP_RANGE,
            ),
            gap_start_index: clip_usize("gap_start_index", self.gap_start_index, COUNT_RANGE),
            gap_width: clip_f64("gap_width", self.gap_width, GAP_WIDTH_RANGE),
            gap_mode: self.gap_mode,
        }
    }

    /// Save parameters to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate parameters from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
