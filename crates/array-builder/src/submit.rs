use mimo_types::LengthUnit;
use model_kernel::ModelOp;
use sim_engine::SimulationEngine;
use tracing::{debug, info, instrument};

use crate::build::AntennaModel;
use crate::error::BuildError;
use crate::solve::SolveConfig;

/// Set the model units on `engine`, then replay recorded model operations
/// in order.
///
/// Boolean tools are never kept: the model consumed them.
pub fn replay(
    unit: LengthUnit,
    history: &[ModelOp],
    engine: &mut dyn SimulationEngine,
) -> Result<(), BuildError> {
    engine.set_model_units(unit)?;
    for op in history {
        debug!(op = op.label(), "replaying");
        match op {
            ModelOp::CreateMaterial { name, properties } => {
                engine.create_material(name, properties)?;
            }
            ModelOp::CreateBox {
                name,
                origin,
                size,
                material,
            } => {
                engine.create_box(*origin, *size, name, material.as_deref())?;
            }
            ModelOp::CreateRectangle {
                name,
                plane,
                origin,
                size,
            } => {
                engine.create_rectangle(*plane, *origin, *size, name)?;
            }
            ModelOp::Subtract {
                primary,
                secondaries,
            } => engine.subtract(primary, secondaries, false)?,
            ModelOp::Unite { names } => engine.unite(names)?,
            ModelOp::AssignConductor { shape } => engine.assign_perfect_conductor(shape)?,
            ModelOp::AssignRadiation { shape } => engine.assign_radiation_boundary(shape)?,
            ModelOp::AssignPort { sheet, port, line } => engine.create_port(sheet, line, port)?,
        }
    }
    Ok(())
}

/// Send the model and its solve configuration to `engine` and run the solve.
///
/// Excitations are set after `analyze`, matching how a live session applies
/// source phases to solved fields.
#[instrument(skip_all, fields(setup = %config.setup_name))]
pub fn submit(
    model: &AntennaModel,
    config: &SolveConfig,
    engine: &mut dyn SimulationEngine,
) -> Result<(), BuildError> {
    if let Some(port) = config
        .excitations
        .keys()
        .find(|p| !model.state.has_port(p))
    {
        return Err(BuildError::UnknownPort { port: port.clone() });
    }

    replay(model.params.length_unit, model.state.history(), engine)?;

    engine.create_solve_setup(&config.setup_name, &config.setup)?;
    engine.create_frequency_sweep(&config.setup_name, &config.sweep)?;
    engine.create_far_field_sphere(&config.sphere)?;
    info!("analysis started");
    engine.analyze(&config.setup_name)?;
    engine.set_excitations(&config.excitations)?;
    info!(ports = config.excitations.len(), "excitations applied");
    Ok(())
}
