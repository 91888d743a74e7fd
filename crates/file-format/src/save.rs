use array_builder::{AntennaModel, Element, ParameterSet, SolveConfig};
use model_kernel::ModelOp;
use serde::{Deserialize, Serialize};

use crate::errors::SaveError;
use crate::metadata::ProjectMetadata;

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

pub const PARAMETERS_FORMAT: &str = "mimo-array-parameters";
pub const MODEL_FORMAT: &str = "mimo-array-model";

/// A stored parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterFile {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub parameters: ParameterSet,
}

/// A built model: the recipe that reproduces it plus its solve setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub parameters: ParameterSet,
    /// Successful operations in build order.
    pub history: Vec<ModelOp>,
    pub elements: Vec<Element>,
    pub solve: SolveConfig,
}

/// Serialize a parameter set to pretty-printed JSON.
pub fn save_parameters(
    params: &ParameterSet,
    metadata: &ProjectMetadata,
) -> Result<String, SaveError> {
    let file = ParameterFile {
        format: PARAMETERS_FORMAT.to_string(),
        version: FORMAT_VERSION,
        project: metadata.clone(),
        parameters: params.clone(),
    };
    serde_json::to_string_pretty(&file).map_err(|source| SaveError::Serialize {
        what: "parameter file",
        source,
    })
}

/// Serialize a built model and its solve configuration to pretty-printed JSON.
pub fn save_model(
    model: &AntennaModel,
    solve: &SolveConfig,
    metadata: &ProjectMetadata,
) -> Result<String, SaveError> {
    let file = ModelFile {
        format: MODEL_FORMAT.to_string(),
        version: FORMAT_VERSION,
        project: metadata.clone(),
        parameters: model.params.clone(),
        history: model.state.history().to_vec(),
        elements: model.elements.clone(),
        solve: solve.clone(),
    };
    serde_json::to_string_pretty(&file).map_err(|source| SaveError::Serialize {
        what: "model file",
        source,
    })
}
