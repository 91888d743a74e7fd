use mimo_types::{IntegrationLine, MaterialProperties, Plane};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// One successful model operation, in the order it was applied.
///
/// The history is the recipe a simulation engine replays to reconstruct the
/// model; it only ever records operations that succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelOp {
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
    },
    Unite {
        names: Vec<String>,
    },
    AssignConductor {
        shape: String,
    },
    AssignRadiation {
        shape: String,
    },
    AssignPort {
        sheet: String,
        port: String,
        line: IntegrationLine,
    },
}

impl ModelOp {
    /// Short operation label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ModelOp::CreateMaterial { .. } => "material",
            ModelOp::CreateBox { .. } => "box",
            ModelOp::CreateRectangle { .. } => "rectangle",
            ModelOp::Subtract { .. } => "subtract",
            ModelOp::Unite { .. } => "unite",
            ModelOp::AssignConductor { .. } => "perfect-e",
            ModelOp::AssignRadiation { .. } => "radiation",
            ModelOp::AssignPort { .. } => "lumped-port",
        }
    }
}
