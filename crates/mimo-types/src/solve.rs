use serde::{Deserialize, Serialize};

/// Unit a frequency sweep is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FrequencyUnit {
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    /// Multiplier from this unit to hertz.
    pub fn scale(self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    pub fn to_hz(self, value: f64) -> f64 {
        value * self.scale()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl std::fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the engine solves the sweep's points.
///
/// Both kinds sample the same evenly spaced points; the kind only selects
/// the engine's solution method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SweepKind {
    /// Evenly spaced points, `count` of them, inclusive of both ends.
    LinearCount,
    /// Each point solved as a discrete frequency.
    Discrete,
}

/// A named frequency sweep attached to a solve setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSpec {
    pub name: String,
    pub unit: FrequencyUnit,
    pub start: f64,
    pub stop: f64,
    pub count: u32,
    pub kind: SweepKind,
}

impl SweepSpec {
    pub fn start_hz(&self) -> f64 {
        self.unit.to_hz(self.start)
    }

    pub fn stop_hz(&self) -> f64 {
        self.unit.to_hz(self.stop)
    }

    /// Sweep points in the sweep's own unit. Independent of `kind`.
    pub fn points(&self) -> Vec<f64> {
        if self.count < 2 {
            return vec![self.start];
        }
        let step = (self.stop - self.start) / f64::from(self.count - 1);
        (0..self.count)
            .map(|i| self.start + step * f64::from(i))
            .collect()
    }
}

/// Adaptive solve properties handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetupProperties {
    /// Adaptive mesh refinement frequency, in hertz.
    pub frequency_hz: f64,
    pub maximum_passes: u32,
    pub max_delta_s: f64,
}

/// Angular sampling of the far-field sphere, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarFieldSphere {
    pub name: String,
    pub theta_step_deg: f64,
    pub phi_step_deg: f64,
}

/// Source amplitude and phase for one port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Excitation {
    /// Incident power, in watts.
    pub magnitude_w: f64,
    pub phase_deg: f64,
}

impl Excitation {
    pub fn new(magnitude_w: f64, phase_deg: f64) -> Self {
        Self {
            magnitude_w,
            phase_deg,
        }
    }
}
