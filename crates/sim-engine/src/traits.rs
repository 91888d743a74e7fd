use std::collections::BTreeMap;

use mimo_types::{
    Excitation, FarFieldSphere, IntegrationLine, LengthUnit, MaterialProperties, Plane,
    SetupProperties, SweepSpec,
};
use nalgebra::{Point3, Vector3};

use crate::types::*;

/// Field-solver session that receives a finished model and runs the solve.
///
/// Implemented by adapters to a real solver process and by [`MockEngine`]
/// (deterministic test double). Calls are synchronous; `analyze` blocks
/// until the solve finishes or fails.
///
/// [`MockEngine`]: crate::MockEngine
pub trait SimulationEngine {
    /// Set the length unit later coordinates are read in. Issued before any
    /// shape is drawn.
    fn set_model_units(&mut self, unit: LengthUnit) -> Result<(), EngineError>;

    /// Look up or create a material. Idempotent by name.
    fn create_material(
        &mut self,
        name: &str,
        properties: &MaterialProperties,
    ) -> Result<MaterialHandle, EngineError>;

    /// Create a solid box, optionally assigned a material (vacuum otherwise).
    fn create_box(
        &mut self,
        origin: Point3<f64>,
        size: Vector3<f64>,
        name: &str,
        material: Option<&str>,
    ) -> Result<ShapeHandle, EngineError>;

    /// Create a zero-thickness rectangle on a plane.
    fn create_rectangle(
        &mut self,
        plane: Plane,
        origin: Point3<f64>,
        size: [f64; 2],
        name: &str,
    ) -> Result<ShapeHandle, EngineError>;

    /// Subtract secondaries from primary.
    fn subtract(
        &mut self,
        primary: &str,
        secondaries: &[String],
        keep_originals: bool,
    ) -> Result<(), EngineError>;

    /// Unite all shapes into the first.
    fn unite(&mut self, names: &[String]) -> Result<(), EngineError>;

    /// Assign a perfect-E boundary to a sheet.
    fn assign_perfect_conductor(&mut self, shape: &str) -> Result<(), EngineError>;

    /// Assign a radiation boundary to the outer faces of a volume.
    fn assign_radiation_boundary(&mut self, shape: &str) -> Result<(), EngineError>;

    /// Create a lumped port on a sheet.
    fn create_port(
        &mut self,
        sheet: &str,
        line: &IntegrationLine,
        name: &str,
    ) -> Result<(), EngineError>;

    /// Create a named adaptive solve setup.
    fn create_solve_setup(
        &mut self,
        name: &str,
        properties: &SetupProperties,
    ) -> Result<(), EngineError>;

    /// Attach a frequency sweep to an existing setup.
    fn create_frequency_sweep(&mut self, setup: &str, sweep: &SweepSpec)
        -> Result<(), EngineError>;

    /// Insert an infinite sphere for far-field sampling.
    fn create_far_field_sphere(&mut self, sphere: &FarFieldSphere) -> Result<(), EngineError>;

    /// Mesh and solve the named setup. Blocks until done.
    fn analyze(&mut self, setup: &str) -> Result<(), EngineError>;

    /// Set the per-port source magnitude and phase.
    fn set_excitations(
        &mut self,
        excitations: &BTreeMap<String, Excitation>,
    ) -> Result<(), EngineError>;
}
