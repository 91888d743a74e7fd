use std::fmt;

use model_kernel::ModelError;
use sim_engine::EngineError;

use crate::params::ParameterError;

/// Failure category of a build, independent of which crate raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ParameterError,
    NameCollision,
    InvalidDimensions,
    InvalidOperand,
    StaleReference,
    GeometryMismatch,
    DuplicateBoundary,
    UnknownPort,
    InvalidSolveSetup,
    EngineFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Any error that aborts a build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("port {port} is not defined in the model")]
    UnknownPort { port: String },

    #[error("invalid solve setup {field}: {reason}")]
    InvalidSolveSetup { field: String, reason: String },

    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Parameter(_) => ErrorKind::ParameterError,
            BuildError::Model(e) => match e {
                ModelError::NameCollision { .. } => ErrorKind::NameCollision,
                ModelError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
                ModelError::InvalidOperand { .. } => ErrorKind::InvalidOperand,
                ModelError::StaleReference { .. } => ErrorKind::StaleReference,
                ModelError::GeometryMismatch { .. } => ErrorKind::GeometryMismatch,
                ModelError::DuplicateBoundary { .. } => ErrorKind::DuplicateBoundary,
            },
            BuildError::UnknownPort { .. } => ErrorKind::UnknownPort,
            BuildError::InvalidSolveSetup { .. } => ErrorKind::InvalidSolveSetup,
            BuildError::Engine(_) => ErrorKind::EngineFailure,
        }
    }

    /// Name of the parameter, shape, port or engine object at fault.
    pub fn entity(&self) -> &str {
        match self {
            BuildError::Parameter(e) => e.field,
            BuildError::Model(e) => e.entity(),
            BuildError::UnknownPort { port } => port,
            BuildError::InvalidSolveSetup { field, .. } => field,
            BuildError::Engine(e) => match e {
                EngineError::Rejected { operation, .. } => operation,
                EngineError::AnalysisFailed { setup, .. } => setup,
                EngineError::Unavailable { .. } => "engine",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mimo_types::BoundaryKind;

    #[test]
    fn model_errors_map_to_their_kind() {
        let err: BuildError = ModelError::DuplicateBoundary {
            name: "AirBox".into(),
            kind: BoundaryKind::Radiation,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::DuplicateBoundary);
        assert_eq!(err.entity(), "AirBox");
    }

    #[test]
    fn engine_diagnostic_survives_display() {
        let err: BuildError = EngineError::AnalysisFailed {
            setup: "Setup28GHz".into(),
            diagnostic: "license checkout failed".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
        assert!(err.to_string().contains("license checkout failed"));
    }
}
