//! Parametric construction of the two-element MIMO patch array.
//!
//! [`build_model`] turns a [`ParameterSet`] into a solver-ready model,
//! [`SolveConfigBuilder`] produces the solve configuration for it, and
//! [`submit`] hands both to a [`SimulationEngine`](sim_engine::SimulationEngine).

pub mod build;
pub mod element;
pub mod error;
pub mod params;
pub mod solve;
pub mod submit;

pub use build::{build_model, AntennaModel};
pub use element::{generate_element, Element};
pub use error::{BuildError, ErrorKind};
pub use params::{ParameterError, ParameterSet};
pub use solve::{SolveConfig, SolveConfigBuilder, SolveSettings};
pub use submit::{replay, submit};

use sim_engine::SimulationEngine;
use tracing::info;

/// A built model together with the solve configuration it was submitted with.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub model: AntennaModel,
    pub solve: SolveConfig,
}

/// Build the model, configure the default solve and run it on `engine`.
pub fn run(
    params: &ParameterSet,
    settings: &SolveSettings,
    engine: &mut dyn SimulationEngine,
) -> Result<BuildOutcome, BuildError> {
    let model = build_model(params)?;
    let solve = SolveConfigBuilder::from_settings(settings.clone())
        .for_model(&model)
        .build(&model.state)?;
    submit(&model, &solve, engine)?;
    info!(
        elements = model.elements.len(),
        setup = %solve.setup_name,
        "build submitted"
    );
    Ok(BuildOutcome { model, solve })
}
