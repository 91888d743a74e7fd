use mimo_types::{LengthUnit, MaterialSpec};
use serde::{Deserialize, Serialize};

/// A design parameter that violates its constraint.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid parameter {field}: {reason}")]
pub struct ParameterError {
    pub field: &'static str,
    pub reason: String,
}

impl ParameterError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Physical inputs of one array build. Lengths are in `length_unit`.
///
/// Missing fields in a serialized set take the tuned 28 GHz values;
/// unrecognised fields are an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterSet {
    /// Design frequency in Hz.
    pub frequency_hz: f64,
    pub length_unit: LengthUnit,
    pub substrate_width: f64,
    pub substrate_length: f64,
    pub substrate_height: f64,
    /// Patch extent along the feed axis (x).
    pub patch_length: f64,
    /// Patch extent along the array axis (y).
    pub patch_width: f64,
    pub feed_width: f64,
    /// How far the feed strip reaches into the patch.
    pub inset_depth: f64,
    /// Clearance on each side of the feed strip inside the notch.
    pub inset_gap: f64,
    pub dgs_length: f64,
    pub dgs_width: f64,
    /// Centre-to-centre distance between the two elements.
    pub element_spacing: f64,
    pub air_margin: f64,
    pub substrate: MaterialSpec,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            frequency_hz: 28.0e9,
            length_unit: LengthUnit::Mm,
            substrate_width: 12.0,
            substrate_length: 14.0,
            substrate_height: 0.254,
            patch_length: 3.48,
            patch_width: 4.23,
            feed_width: 0.78,
            inset_depth: 1.05,
            inset_gap: 0.20,
            dgs_length: 4.0,
            dgs_width: 0.5,
            element_spacing: 7.0,
            air_margin: 3.0,
            substrate: MaterialSpec::rogers_5880(),
        }
    }
}

impl ParameterSet {
    /// Width of the notch cut around the feed strip.
    pub fn notch_width(&self) -> f64 {
        self.feed_width + 2.0 * self.inset_gap
    }

    /// x coordinate of the radiating edge where the feed enters the patch.
    pub fn feed_edge_x(&self) -> f64 {
        -self.patch_length / 2.0
    }

    /// Array-axis centres of element 1 and element 2.
    pub fn element_offsets(&self) -> [f64; 2] {
        let half = self.element_spacing / 2.0;
        [half, -half]
    }

    /// Check every constraint; the first violation is returned.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let lengths = [
            ("substrate_width", self.substrate_width),
            ("substrate_length", self.substrate_length),
            ("substrate_height", self.substrate_height),
            ("patch_length", self.patch_length),
            ("patch_width", self.patch_width),
            ("feed_width", self.feed_width),
            ("inset_depth", self.inset_depth),
            ("inset_gap", self.inset_gap),
            ("dgs_length", self.dgs_length),
            ("dgs_width", self.dgs_width),
            ("element_spacing", self.element_spacing),
            ("air_margin", self.air_margin),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::new(
                    field,
                    format!("must be a positive length, got {value}"),
                ));
            }
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ParameterError::new(
                "frequency_hz",
                format!("must be positive, got {}", self.frequency_hz),
            ));
        }

        let material = &self.substrate;
        if material.name.trim().is_empty() {
            return Err(ParameterError::new("substrate.name", "must not be empty"));
        }
        if !(material.properties.permittivity >= 1.0) {
            return Err(ParameterError::new(
                "substrate.permittivity",
                format!(
                    "relative permittivity must be at least 1, got {}",
                    material.properties.permittivity
                ),
            ));
        }
        if !(material.properties.loss_tangent >= 0.0) {
            return Err(ParameterError::new(
                "substrate.loss_tangent",
                format!(
                    "loss tangent must not be negative, got {}",
                    material.properties.loss_tangent
                ),
            ));
        }

        if self.inset_depth >= self.patch_length / 2.0 {
            return Err(ParameterError::new(
                "inset_depth",
                format!(
                    "{} must be less than half the patch length {}",
                    self.inset_depth, self.patch_length
                ),
            ));
        }
        if self.notch_width() >= self.patch_width {
            return Err(ParameterError::new(
                "inset_gap",
                format!(
                    "notch width feed_width + 2*inset_gap = {} must be less than patch_width {}",
                    self.notch_width(),
                    self.patch_width
                ),
            ));
        }
        if self.element_spacing <= self.patch_width {
            return Err(ParameterError::new(
                "element_spacing",
                format!(
                    "{} must exceed patch_width {} or the elements overlap",
                    self.element_spacing, self.patch_width
                ),
            ));
        }

        let half_w = self.substrate_width / 2.0;
        let half_l = self.substrate_length / 2.0;
        let half_spacing = self.element_spacing / 2.0;
        if self.patch_length / 2.0 > half_w {
            return Err(ParameterError::new(
                "patch_length",
                format!("{} does not fit on substrate width {}", self.patch_length, self.substrate_width),
            ));
        }
        if half_spacing + self.patch_width / 2.0 > half_l {
            return Err(ParameterError::new(
                "element_spacing",
                format!(
                    "patches at ±{half_spacing} overrun substrate length {}",
                    self.substrate_length
                ),
            ));
        }
        if self.dgs_length / 2.0 > half_w {
            return Err(ParameterError::new(
                "dgs_length",
                format!("{} does not fit on ground width {}", self.dgs_length, self.substrate_width),
            ));
        }
        if half_spacing + self.dgs_width / 2.0 > half_l {
            return Err(ParameterError::new(
                "dgs_width",
                format!(
                    "slots at ±{half_spacing} overrun ground length {}",
                    self.substrate_length
                ),
            ));
        }
        if self.element_spacing <= self.dgs_width {
            return Err(ParameterError::new(
                "dgs_width",
                format!(
                    "{} must be less than element_spacing {} or the slots overlap",
                    self.dgs_width, self.element_spacing
                ),
            ));
        }
        Ok(())
    }
}
