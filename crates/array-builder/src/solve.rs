use std::collections::BTreeMap;

use mimo_types::{
    Excitation, FarFieldSphere, FrequencyUnit, SetupProperties, SweepKind, SweepSpec,
};
use model_kernel::ModelState;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::build::AntennaModel;
use crate::error::BuildError;

/// Solve defaults applied when the caller does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolveSettings {
    pub setup_name: String,
    pub maximum_passes: u32,
    pub max_delta_s: f64,
    pub sweep: SweepSpec,
    pub sphere: FarFieldSphere,
    /// Source applied to every port that has no explicit excitation.
    pub default_excitation: Excitation,
    /// Per-port sources that override `default_excitation`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub excitations: BTreeMap<String, Excitation>,
}

impl Default for SolveSettings {
    fn default() -> Self {
        Self {
            setup_name: "Setup28GHz".to_string(),
            maximum_passes: 12,
            max_delta_s: 0.03,
            sweep: SweepSpec {
                name: "Sweep28GHz".to_string(),
                unit: FrequencyUnit::GHz,
                start: 26.0,
                stop: 30.0,
                count: 10,
                kind: SweepKind::LinearCount,
            },
            sphere: FarFieldSphere {
                name: "3D_Sphere".to_string(),
                theta_step_deg: 10.0,
                phi_step_deg: 10.0,
            },
            default_excitation: Excitation::new(1.0, 0.0),
            excitations: BTreeMap::new(),
        }
    }
}

/// Validated solve configuration for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveConfig {
    pub setup_name: String,
    pub setup: SetupProperties,
    pub sweep: SweepSpec,
    pub sphere: FarFieldSphere,
    pub excitations: BTreeMap<String, Excitation>,
}

/// Fluent builder for [`SolveConfig`]; nothing is checked until [`build`].
///
/// [`build`]: SolveConfigBuilder::build
#[derive(Debug, Clone)]
pub struct SolveConfigBuilder {
    setup_name: String,
    frequency_hz: f64,
    maximum_passes: u32,
    max_delta_s: f64,
    sweep: SweepSpec,
    sphere: FarFieldSphere,
    default_excitation: Excitation,
    excitations: BTreeMap<String, Excitation>,
}

impl Default for SolveConfigBuilder {
    fn default() -> Self {
        Self::from_settings(SolveSettings::default())
    }
}

impl SolveConfigBuilder {
    pub fn from_settings(settings: SolveSettings) -> Self {
        Self {
            setup_name: settings.setup_name,
            frequency_hz: 28.0e9,
            maximum_passes: settings.maximum_passes,
            max_delta_s: settings.max_delta_s,
            sweep: settings.sweep,
            sphere: settings.sphere,
            default_excitation: settings.default_excitation,
            excitations: settings.excitations,
        }
    }

    /// Target the model's design frequency and excite every port that does
    /// not already have an explicit excitation.
    pub fn for_model(mut self, model: &AntennaModel) -> Self {
        self.frequency_hz = model.params.frequency_hz;
        for port in model.port_names() {
            self.excitations
                .entry(port)
                .or_insert(self.default_excitation);
        }
        self
    }

    pub fn setup_name(mut self, name: impl Into<String>) -> Self {
        self.setup_name = name.into();
        self
    }

    pub fn frequency_hz(mut self, frequency_hz: f64) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn maximum_passes(mut self, passes: u32) -> Self {
        self.maximum_passes = passes;
        self
    }

    pub fn max_delta_s(mut self, delta: f64) -> Self {
        self.max_delta_s = delta;
        self
    }

    pub fn sweep(mut self, sweep: SweepSpec) -> Self {
        self.sweep = sweep;
        self
    }

    pub fn sphere(mut self, sphere: FarFieldSphere) -> Self {
        self.sphere = sphere;
        self
    }

    pub fn excite(mut self, port: impl Into<String>, excitation: Excitation) -> Self {
        self.excitations.insert(port.into(), excitation);
        self
    }

    /// Validate numeric settings and port references against `model`.
    pub fn build(self, model: &ModelState) -> Result<SolveConfig, BuildError> {
        if self.setup_name.trim().is_empty() {
            return Err(invalid("setup_name", "must not be empty"));
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(invalid(
                "frequency_hz",
                format!("must be positive, got {}", self.frequency_hz),
            ));
        }
        if self.maximum_passes < 1 {
            return Err(invalid("maximum_passes", "at least one adaptive pass is required"));
        }
        if !self.max_delta_s.is_finite() || self.max_delta_s <= 0.0 {
            return Err(invalid(
                "max_delta_s",
                format!("must be positive, got {}", self.max_delta_s),
            ));
        }
        check_sweep(&self.sweep)?;
        check_sphere(&self.sphere)?;

        for (port, excitation) in &self.excitations {
            if !model.has_port(port) {
                return Err(BuildError::UnknownPort { port: port.clone() });
            }
            if !excitation.magnitude_w.is_finite() || excitation.magnitude_w < 0.0 {
                return Err(invalid(
                    "excitation.magnitude_w",
                    format!("{port}: must be non-negative, got {}", excitation.magnitude_w),
                ));
            }
            if !excitation.phase_deg.is_finite() {
                return Err(invalid("excitation.phase_deg", format!("{port}: must be finite")));
            }
        }

        let (lo, hi) = (self.sweep.start_hz(), self.sweep.stop_hz());
        if self.frequency_hz < lo || self.frequency_hz > hi {
            warn!(
                frequency_hz = self.frequency_hz,
                sweep_start_hz = lo,
                sweep_stop_hz = hi,
                "adaptive frequency lies outside the sweep band"
            );
        }

        Ok(SolveConfig {
            setup_name: self.setup_name,
            setup: SetupProperties {
                frequency_hz: self.frequency_hz,
                maximum_passes: self.maximum_passes,
                max_delta_s: self.max_delta_s,
            },
            sweep: self.sweep,
            sphere: self.sphere,
            excitations: self.excitations,
        })
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> BuildError {
    BuildError::InvalidSolveSetup {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn check_sweep(sweep: &SweepSpec) -> Result<(), BuildError> {
    if sweep.name.trim().is_empty() {
        return Err(invalid("sweep.name", "must not be empty"));
    }
    if !sweep.start.is_finite() || !sweep.stop.is_finite() || sweep.start <= 0.0 {
        return Err(invalid(
            "sweep.start",
            format!("band {}..{} {} is not a positive range", sweep.start, sweep.stop, sweep.unit),
        ));
    }
    if sweep.start >= sweep.stop {
        return Err(invalid(
            "sweep.stop",
            format!("stop {} must exceed start {}", sweep.stop, sweep.start),
        ));
    }
    if sweep.count < 2 {
        return Err(invalid(
            "sweep.count",
            format!("at least two points are required, got {}", sweep.count),
        ));
    }
    Ok(())
}

fn check_sphere(sphere: &FarFieldSphere) -> Result<(), BuildError> {
    if sphere.name.trim().is_empty() {
        return Err(invalid("sphere.name", "must not be empty"));
    }
    if !(sphere.theta_step_deg > 0.0 && sphere.theta_step_deg <= 180.0) {
        return Err(invalid(
            "sphere.theta_step_deg",
            format!("must be in (0, 180], got {}", sphere.theta_step_deg),
        ));
    }
    if !(sphere.phi_step_deg > 0.0 && sphere.phi_step_deg <= 360.0) {
        return Err(invalid(
            "sphere.phi_step_deg",
            format!("must be in (0, 360], got {}", sphere.phi_step_deg),
        ));
    }
    Ok(())
}
