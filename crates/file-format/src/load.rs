use array_builder::ParameterSet;
use serde::Deserialize;

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::save::{ModelFile, ParameterFile, FORMAT_VERSION, MODEL_FORMAT, PARAMETERS_FORMAT};

/// Just the header, read before committing to a full parse.
#[derive(Debug, Deserialize)]
struct Header {
    format: String,
    version: u32,
}

fn check_header(json: &str, expected: &str) -> Result<(), LoadError> {
    let header: Header =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    if header.format != expected {
        return Err(LoadError::UnknownFormat {
            found: header.format,
            expected: expected.to_string(),
        });
    }
    if header.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: header.version,
            supported_version: FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Deserialize a parameter set from a JSON string.
///
/// Validates the format identifier, the version and the parameters
/// themselves.
pub fn load_parameters(json: &str) -> Result<(ParameterSet, ProjectMetadata), LoadError> {
    check_header(json, PARAMETERS_FORMAT)?;
    let file: ParameterFile =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    file.parameters.validate()?;
    Ok((file.parameters, file.project))
}

/// Deserialize a saved model file.
pub fn load_model(json: &str) -> Result<ModelFile, LoadError> {
    check_header(json, MODEL_FORMAT)?;
    let file: ModelFile =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;
    file.parameters.validate()?;
    Ok(file)
}
