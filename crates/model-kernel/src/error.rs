use mimo_types::BoundaryKind;

/// Errors from primitive, boolean and boundary operations on a model.
///
/// Every variant names the entity that caused it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("name already in use: {name}")]
    NameCollision { name: String },

    #[error("invalid dimensions for {name}: {reason}")]
    InvalidDimensions { name: String, reason: String },

    #[error("invalid operand {name}: {reason}")]
    InvalidOperand { name: String, reason: String },

    #[error("stale reference to {name}: {reason}")]
    StaleReference { name: String, reason: String },

    #[error("geometry mismatch on {name}: {reason}")]
    GeometryMismatch { name: String, reason: String },

    #[error("duplicate {kind} boundary on {name}")]
    DuplicateBoundary { name: String, kind: BoundaryKind },
}

impl ModelError {
    /// Name of the shape or port the error is about.
    pub fn entity(&self) -> &str {
        match self {
            ModelError::NameCollision { name }
            | ModelError::InvalidDimensions { name, .. }
            | ModelError::InvalidOperand { name, .. }
            | ModelError::StaleReference { name, .. }
            | ModelError::GeometryMismatch { name, .. }
            | ModelError::DuplicateBoundary { name, .. } => name,
        }
    }
}
