pub mod errors;
pub mod load;
pub mod metadata;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::{load_model, load_parameters};
pub use metadata::ProjectMetadata;
pub use save::{save_model, save_parameters, ModelFile, ParameterFile, FORMAT_VERSION};
