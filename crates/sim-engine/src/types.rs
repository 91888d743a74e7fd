use std::collections::BTreeMap;

use mimo_types::{
    Excitation, FarFieldSphere, IntegrationLine, LengthUnit, MaterialProperties, Plane,
    SetupProperties, SweepSpec,
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Opaque handle to a material in the engine session.
/// Valid only for the session that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub(crate) u64);

/// Opaque handle to a shape in the engine session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) u64);

/// Errors reported by the simulation engine.
///
/// The diagnostic is the engine's own text and is passed through unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("{operation} rejected by engine: {diagnostic}")]
    Rejected {
        operation: String,
        diagnostic: String,
    },

    #[error("analysis of {setup} failed: {diagnostic}")]
    AnalysisFailed { setup: String, diagnostic: String },

    #[error("engine unavailable: {diagnostic}")]
    Unavailable { diagnostic: String },
}

impl EngineError {
    pub fn diagnostic(&self) -> &str {
        match self {
            EngineError::Rejected { diagnostic, .. }
            | EngineError::AnalysisFailed { diagnostic, .. }
            | EngineError::Unavailable { diagnostic } => diagnostic,
        }
    }

    pub(crate) fn rejected(operation: &str, diagnostic: impl Into<String>) -> Self {
        EngineError::Rejected {
            operation: operation.to_string(),
            diagnostic: diagnostic.into(),
        }
    }
}

/// One engine call as recorded by [`MockEngine`](crate::MockEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineCommand {
    SetModelUnits {
        unit: LengthUnit,
    },
    CreateMaterial {
        name: String,
        properties: MaterialProperties,
    },
    CreateBox {
        name: String,
        origin: Point3<f64>,
        size: Vector3<f64>,
        material: Option<String>,
    },
    CreateRectangle {
        name: String,
        plane: Plane,
        origin: Point3<f64>,
        size: [f64; 2],
    },
    Subtract {
        primary: String,
        secondaries: Vec<String>,
        keep_originals: bool,
    },
    Unite {
        names: Vec<String>,
    },
    AssignPerfectConductor {
        shape: String,
    },
    AssignRadiationBoundary {
        shape: String,
    },
    CreatePort {
        sheet: String,
        line: IntegrationLine,
        name: String,
    },
    CreateSolveSetup {
        name: String,
        properties: SetupProperties,
    },
    CreateFrequencySweep {
        setup: String,
        sweep: SweepSpec,
    },
    CreateFarFieldSphere {
        sphere: FarFieldSphere,
    },
    Analyze {
        setup: String,
    },
    SetExcitations {
        excitations: BTreeMap<String, Excitation>,
    },
}
