use std::collections::{BTreeMap, BTreeSet, HashMap};

use mimo_types::{
    Excitation, FarFieldSphere, IntegrationLine, LengthUnit, MaterialProperties, Plane,
    SetupProperties, SweepSpec,
};
use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::traits::SimulationEngine;
use crate::types::*;

/// A shape as the engine session sees it.
#[derive(Debug, Clone)]
struct ShapeEntry {
    is_sheet: bool,
}

/// Solve setup with the sweeps attached to it.
#[derive(Debug, Clone, Default)]
struct SetupEntry {
    sweeps: BTreeSet<String>,
}

/// Deterministic in-memory engine for tests and dry runs.
///
/// Enforces the name rules of a real solver session (unique live names,
/// existing operands, existing setups) without meshing anything. Every
/// accepted call is appended to a journal that tests and the driver can
/// inspect or serialize.
pub struct MockEngine {
    next_handle: u64,
    units: Option<LengthUnit>,
    materials: HashMap<String, (MaterialHandle, MaterialProperties)>,
    shapes: HashMap<String, ShapeEntry>,
    bound: HashMap<String, &'static str>,
    ports: BTreeSet<String>,
    setups: BTreeMap<String, SetupEntry>,
    spheres: BTreeSet<String>,
    analyzed: Vec<String>,
    excitations: BTreeMap<String, Excitation>,
    journal: Vec<EngineCommand>,
    analysis_failure: Option<String>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            units: None,
            materials: HashMap::new(),
            shapes: HashMap::new(),
            bound: HashMap::new(),
            ports: BTreeSet::new(),
            setups: BTreeMap::new(),
            spheres: BTreeSet::new(),
            analyzed: Vec::new(),
            excitations: BTreeMap::new(),
            journal: Vec::new(),
            analysis_failure: None,
        }
    }

    /// Make every later `analyze` call fail with `diagnostic`.
    pub fn fail_analysis(&mut self, diagnostic: impl Into<String>) {
        self.analysis_failure = Some(diagnostic.into());
    }

    /// Accepted calls, in order.
    pub fn journal(&self) -> &[EngineCommand] {
        &self.journal
    }

    /// Unit set by `set_model_units`, if any.
    pub fn model_units(&self) -> Option<LengthUnit> {
        self.units
    }

    pub fn has_shape(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    /// Names of live shapes, sorted.
    pub fn shape_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.shapes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn port_names(&self) -> Vec<String> {
        self.ports.iter().cloned().collect()
    }

    pub fn sweeps_of(&self, setup: &str) -> Vec<String> {
        self.setups
            .get(setup)
            .map(|s| s.sweeps.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn analyzed_setups(&self) -> &[String] {
        &self.analyzed
    }

    pub fn excitations(&self) -> &BTreeMap<String, Excitation> {
        &self.excitations
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    fn add_shape(
        &mut self,
        operation: &str,
        name: &str,
        is_sheet: bool,
    ) -> Result<ShapeHandle, EngineError> {
        if name.is_empty() {
            return Err(EngineError::rejected(operation, "empty object name"));
        }
        if self.shapes.contains_key(name) {
            return Err(EngineError::rejected(
                operation,
                format!("object name {name} already exists"),
            ));
        }
        let handle = ShapeHandle(self.alloc());
        self.shapes
            .insert(name.to_string(), ShapeEntry { is_sheet });
        Ok(handle)
    }

    fn require_shape(&self, operation: &str, name: &str) -> Result<&ShapeEntry, EngineError> {
        self.shapes
            .get(name)
            .ok_or_else(|| EngineError::rejected(operation, format!("object {name} not found")))
    }

    fn require_unbound(&self, operation: &str, name: &str) -> Result<(), EngineError> {
        match self.bound.get(name) {
            Some(existing) => Err(EngineError::rejected(
                operation,
                format!("object {name} already has a {existing} assignment"),
            )),
            None => Ok(()),
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationEngine for MockEngine {
    fn set_model_units(&mut self, unit: LengthUnit) -> Result<(), EngineError> {
        if !self.shapes.is_empty() {
            return Err(EngineError::rejected(
                "set_model_units",
                "model units must be set before any object is drawn",
            ));
        }
        self.units = Some(unit);
        self.journal.push(EngineCommand::SetModelUnits { unit });
        debug!(%unit, "model units set");
        Ok(())
    }

    fn create_material(
        &mut self,
        name: &str,
        properties: &MaterialProperties,
    ) -> Result<MaterialHandle, EngineError> {
        if let Some((handle, existing)) = self.materials.get(name) {
            if existing != properties {
                warn!(material = name, "material exists with other properties; keeping it");
            }
            return Ok(*handle);
        }
        if properties.permittivity < 1.0 || properties.loss_tangent < 0.0 {
            return Err(EngineError::rejected(
                "create_material",
                format!("material {name} has non-physical properties"),
            ));
        }
        let handle = MaterialHandle(self.alloc());
        self.materials
            .insert(name.to_string(), (handle, *properties));
        self.journal.push(EngineCommand::CreateMaterial {
            name: name.to_string(),
            properties: *properties,
        });
        debug!(material = name, "material created");
        Ok(handle)
    }

    fn create_box(
        &mut self,
        origin: Point3<f64>,
        size: Vector3<f64>,
        name: &str,
        material: Option<&str>,
    ) -> Result<ShapeHandle, EngineError> {
        if let Some(material) = material {
            if !self.materials.contains_key(material) {
                return Err(EngineError::rejected(
                    "create_box",
                    format!("material {material} not found"),
                ));
            }
        }
        let handle = self.add_shape("create_box", name, false)?;
        self.journal.push(EngineCommand::CreateBox {
            name: name.to_string(),
            origin,
            size,
            material: material.map(str::to_string),
        });
        Ok(handle)
    }

    fn create_rectangle(
        &mut self,
        plane: Plane,
        origin: Point3<f64>,
        size: [f64; 2],
        name: &str,
    ) -> Result<ShapeHandle, EngineError> {
        let handle = self.add_shape("create_rectangle", name, true)?;
        self.journal.push(EngineCommand::CreateRectangle {
            name: name.to_string(),
            plane,
            origin,
            size,
        });
        Ok(handle)
    }

    fn subtract(
        &mut self,
        primary: &str,
        secondaries: &[String],
        keep_originals: bool,
    ) -> Result<(), EngineError> {
        self.require_shape("subtract", primary)?;
        for name in secondaries {
            self.require_shape("subtract", name)?;
        }
        if !keep_originals {
            for name in secondaries {
                self.shapes.remove(name);
            }
        }
        self.journal.push(EngineCommand::Subtract {
            primary: primary.to_string(),
            secondaries: secondaries.to_vec(),
            keep_originals,
        });
        Ok(())
    }

    fn unite(&mut self, names: &[String]) -> Result<(), EngineError> {
        let Some((first, rest)) = names.split_first() else {
            return Err(EngineError::rejected("unite", "no objects given"));
        };
        self.require_shape("unite", first)?;
        for name in rest {
            self.require_shape("unite", name)?;
        }
        for name in rest {
            self.shapes.remove(name);
        }
        self.journal.push(EngineCommand::Unite {
            names: names.to_vec(),
        });
        Ok(())
    }

    fn assign_perfect_conductor(&mut self, shape: &str) -> Result<(), EngineError> {
        if !self.require_shape("assign_perfect_conductor", shape)?.is_sheet {
            return Err(EngineError::rejected(
                "assign_perfect_conductor",
                format!("{shape} is not a sheet"),
            ));
        }
        self.require_unbound("assign_perfect_conductor", shape)?;
        self.bound.insert(shape.to_string(), "PerfectE");
        self.journal.push(EngineCommand::AssignPerfectConductor {
            shape: shape.to_string(),
        });
        Ok(())
    }

    fn assign_radiation_boundary(&mut self, shape: &str) -> Result<(), EngineError> {
        if self.require_shape("assign_radiation_boundary", shape)?.is_sheet {
            return Err(EngineError::rejected(
                "assign_radiation_boundary",
                format!("{shape} is not a volume"),
            ));
        }
        self.require_unbound("assign_radiation_boundary", shape)?;
        self.bound.insert(shape.to_string(), "Radiation");
        self.journal.push(EngineCommand::AssignRadiationBoundary {
            shape: shape.to_string(),
        });
        Ok(())
    }

    fn create_port(
        &mut self,
        sheet: &str,
        line: &IntegrationLine,
        name: &str,
    ) -> Result<(), EngineError> {
        if !self.require_shape("create_port", sheet)?.is_sheet {
            return Err(EngineError::rejected(
                "create_port",
                format!("{sheet} is not a sheet"),
            ));
        }
        if self.ports.contains(name) {
            return Err(EngineError::rejected(
                "create_port",
                format!("port {name} already exists"),
            ));
        }
        self.require_unbound("create_port", sheet)?;
        self.bound.insert(sheet.to_string(), "LumpedPort");
        self.ports.insert(name.to_string());
        self.journal.push(EngineCommand::CreatePort {
            sheet: sheet.to_string(),
            line: *line,
            name: name.to_string(),
        });
        Ok(())
    }

    fn create_solve_setup(
        &mut self,
        name: &str,
        properties: &SetupProperties,
    ) -> Result<(), EngineError> {
        if self.setups.contains_key(name) {
            return Err(EngineError::rejected(
                "create_solve_setup",
                format!("setup {name} already exists"),
            ));
        }
        self.setups.insert(name.to_string(), SetupEntry::default());
        self.journal.push(EngineCommand::CreateSolveSetup {
            name: name.to_string(),
            properties: *properties,
        });
        Ok(())
    }

    fn create_frequency_sweep(
        &mut self,
        setup: &str,
        sweep: &SweepSpec,
    ) -> Result<(), EngineError> {
        let entry = self.setups.get_mut(setup).ok_or_else(|| {
            EngineError::rejected("create_frequency_sweep", format!("setup {setup} not found"))
        })?;
        if !entry.sweeps.insert(sweep.name.clone()) {
            return Err(EngineError::rejected(
                "create_frequency_sweep",
                format!("sweep {} already exists on {setup}", sweep.name),
            ));
        }
        self.journal.push(EngineCommand::CreateFrequencySweep {
            setup: setup.to_string(),
            sweep: sweep.clone(),
        });
        Ok(())
    }

    fn create_far_field_sphere(&mut self, sphere: &FarFieldSphere) -> Result<(), EngineError> {
        if !self.spheres.insert(sphere.name.clone()) {
            return Err(EngineError::rejected(
                "create_far_field_sphere",
                format!("sphere {} already exists", sphere.name),
            ));
        }
        self.journal.push(EngineCommand::CreateFarFieldSphere {
            sphere: sphere.clone(),
        });
        Ok(())
    }

    fn analyze(&mut self, setup: &str) -> Result<(), EngineError> {
        if !self.setups.contains_key(setup) {
            return Err(EngineError::rejected(
                "analyze",
                format!("setup {setup} not found"),
            ));
        }
        if self.ports.is_empty() {
            return Err(EngineError::AnalysisFailed {
                setup: setup.to_string(),
                diagnostic: "design has no excitations".to_string(),
            });
        }
        if let Some(diagnostic) = &self.analysis_failure {
            return Err(EngineError::AnalysisFailed {
                setup: setup.to_string(),
                diagnostic: diagnostic.clone(),
            });
        }
        self.analyzed.push(setup.to_string());
        self.journal.push(EngineCommand::Analyze {
            setup: setup.to_string(),
        });
        debug!(setup, "analysis complete");
        Ok(())
    }

    fn set_excitations(
        &mut self,
        excitations: &BTreeMap<String, Excitation>,
    ) -> Result<(), EngineError> {
        if let Some(unknown) = excitations.keys().find(|p| !self.ports.contains(*p)) {
            return Err(EngineError::rejected(
                "set_excitations",
                format!("port {unknown} not found"),
            ));
        }
        self.excitations.extend(excitations.iter().map(|(k, v)| (k.clone(), *v)));
        self.journal.push(EngineCommand::SetExcitations {
            excitations: excitations.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(engine: &mut MockEngine, name: &str) {
        engine
            .create_rectangle(Plane::XY, Point3::origin(), [1.0, 1.0], name)
            .unwrap();
    }

    fn port_line() -> IntegrationLine {
        IntegrationLine::new(Point3::origin(), Point3::new(0.0, 0.0, 0.254))
    }

    #[test]
    fn test_deterministic_handles() {
        let mut a = MockEngine::new();
        let mut b = MockEngine::new();
        let ha = a
            .create_rectangle(Plane::XY, Point3::origin(), [1.0, 1.0], "Patch")
            .unwrap();
        let hb = b
            .create_rectangle(Plane::XY, Point3::origin(), [1.0, 1.0], "Patch")
            .unwrap();
        assert_eq!(ha, hb);
    }

    #[test]
    fn test_material_is_idempotent() {
        let mut engine = MockEngine::new();
        let props = MaterialProperties::new(2.2, 0.0009);
        let first = engine.create_material("Rogers_5880_Clean", &props).unwrap();
        let second = engine.create_material("Rogers_5880_Clean", &props).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.journal().len(), 1);
    }

    #[test]
    fn test_box_with_unknown_material_is_rejected() {
        let mut engine = MockEngine::new();
        let err = engine
            .create_box(Point3::origin(), Vector3::new(1.0, 1.0, 1.0), "Sub", Some("FR4"))
            .unwrap_err();
        assert!(matches!(err, EngineError::Rejected { .. }));
        assert!(!engine.has_shape("Sub"));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "Patch_1");
        let err = engine
            .create_rectangle(Plane::XY, Point3::origin(), [1.0, 1.0], "Patch_1")
            .unwrap_err();
        assert!(err.diagnostic().contains("already exists"));
    }

    #[test]
    fn test_subtract_removes_tools() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "Ground");
        sheet(&mut engine, "Slot_1");
        engine
            .subtract("Ground", &["Slot_1".to_string()], false)
            .unwrap();
        assert_eq!(engine.shape_names(), vec!["Ground".to_string()]);
    }

    #[test]
    fn test_unite_missing_operand_is_rejected() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "Patch_1");
        let err = engine
            .unite(&["Patch_1".to_string(), "FeedStrip_1".to_string()])
            .unwrap_err();
        assert!(err.diagnostic().contains("FeedStrip_1"));
    }

    #[test]
    fn test_sweep_needs_setup() {
        let mut engine = MockEngine::new();
        let sweep = SweepSpec {
            name: "Sweep28GHz".into(),
            unit: mimo_types::FrequencyUnit::GHz,
            start: 26.0,
            stop: 30.0,
            count: 10,
            kind: mimo_types::SweepKind::LinearCount,
        };
        assert!(engine.create_frequency_sweep("Setup28GHz", &sweep).is_err());

        let props = SetupProperties {
            frequency_hz: 28e9,
            maximum_passes: 12,
            max_delta_s: 0.03,
        };
        engine.create_solve_setup("Setup28GHz", &props).unwrap();
        engine.create_frequency_sweep("Setup28GHz", &sweep).unwrap();
        assert_eq!(engine.sweeps_of("Setup28GHz"), vec!["Sweep28GHz".to_string()]);
    }

    #[test]
    fn test_injected_analysis_failure() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "PortSheet_1");
        engine
            .create_port("PortSheet_1", &port_line(), "Port_1")
            .unwrap();
        let props = SetupProperties {
            frequency_hz: 28e9,
            maximum_passes: 12,
            max_delta_s: 0.03,
        };
        engine.create_solve_setup("Setup28GHz", &props).unwrap();
        engine.fail_analysis("mesh generation failed");

        let err = engine.analyze("Setup28GHz").unwrap_err();
        assert_eq!(err.diagnostic(), "mesh generation failed");
        assert!(engine.analyzed_setups().is_empty());
    }

    #[test]
    fn test_excitation_for_unknown_port_is_rejected() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "PortSheet_1");
        engine
            .create_port("PortSheet_1", &port_line(), "Port_1")
            .unwrap();
        let mut ex = BTreeMap::new();
        ex.insert("Port_3".to_string(), Excitation::new(1.0, 0.0));
        assert!(engine.set_excitations(&ex).is_err());
        assert!(engine.excitations().is_empty());
    }

    #[test]
    fn test_journal_serializes_tagged() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "Patch_1");
        let json = serde_json::to_string(engine.journal()).unwrap();
        assert!(json.contains("\"type\":\"CreateRectangle\""));
    }

    #[test]
    fn test_model_units_are_recorded() {
        let mut engine = MockEngine::new();
        assert_eq!(engine.model_units(), None);
        engine.set_model_units(LengthUnit::Mm).unwrap();
        assert_eq!(engine.model_units(), Some(LengthUnit::Mm));
        assert_eq!(
            engine.journal(),
            &[EngineCommand::SetModelUnits { unit: LengthUnit::Mm }]
        );
    }

    #[test]
    fn test_units_after_drawing_are_rejected() {
        let mut engine = MockEngine::new();
        sheet(&mut engine, "Ground");
        let err = engine.set_model_units(LengthUnit::Mm).unwrap_err();
        assert!(err.diagnostic().contains("before any object"));
        assert_eq!(engine.model_units(), None);
    }
}
