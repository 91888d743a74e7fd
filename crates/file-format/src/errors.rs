use array_builder::ParameterError;

/// Errors while loading a parameter or model file.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    ParseError(String),

    #[error("unknown file format: {found} (expected {expected})")]
    UnknownFormat { found: String, expected: String },

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },

    #[error("stored parameters are invalid: {0}")]
    InvalidParameters(#[from] ParameterError),
}

/// Errors while serializing a file.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
