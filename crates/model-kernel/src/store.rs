use std::collections::HashMap;

use mimo_types::{BoundaryKind, IntegrationLine, MaterialProperties, MaterialSpec, ShapeKind};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::geometry::{Aabb, Region};
use crate::history::ModelOp;
use crate::Tolerance;

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct ShapeId;
    pub struct MaterialId;
}

// ─── Entities ────────────────────────────────────────────────────────────────

/// What a shape is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    Dielectric(MaterialId),
    Vacuum,
    /// Zero-thickness sheet.
    Sheet,
}

/// Whether a shape can still be referenced on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeState {
    Live,
    /// Merged into another shape by a boolean; its name stays reserved.
    Consumed { by: String },
}

/// A named shape in the model.
#[derive(Debug, Clone)]
pub struct Shape {
    pub name: String,
    pub kind: ShapeKind,
    /// Origin as given to the primitive builder.
    pub origin: Point3<f64>,
    /// Creation size lifted to 3-D (zero along a sheet's normal).
    pub size: Vector3<f64>,
    pub fill: Fill,
    /// Current geometry, after any booleans applied to this shape.
    pub region: Region,
    pub state: ShapeState,
    pub boundary: Option<BoundaryKind>,
}

impl Shape {
    pub fn is_live(&self) -> bool {
        self.state == ShapeState::Live
    }

    pub fn is_sheet(&self) -> bool {
        self.kind.is_sheet()
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        self.region.bounding_box()
    }
}

/// A material registered in the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub properties: MaterialProperties,
}

/// Port-specific data of a lumped-port assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct PortBinding {
    pub name: String,
    pub line: IntegrationLine,
}

/// A boundary bound to a finished shape.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryAssignment {
    pub shape: ShapeId,
    pub shape_name: String,
    pub kind: BoundaryKind,
    pub port: Option<PortBinding>,
}

// ─── Model State ─────────────────────────────────────────────────────────────

/// Arena holding every shape, material and boundary of one model build.
///
/// Shapes are addressed by name; names stay reserved after a shape is
/// consumed so later references fail loudly instead of resolving to
/// something else.
#[derive(Debug, Clone, Default)]
pub struct ModelState {
    pub(crate) shapes: SlotMap<ShapeId, Shape>,
    pub(crate) names: HashMap<String, ShapeId>,
    pub(crate) materials: SlotMap<MaterialId, Material>,
    pub(crate) material_names: HashMap<String, MaterialId>,
    pub(crate) boundaries: Vec<BoundaryAssignment>,
    pub(crate) history: Vec<ModelOp>,
    pub(crate) tolerance: Tolerance,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Look up or create a material by name.
    ///
    /// Idempotent: a second call with the same name returns the first id and
    /// keeps the first call's properties.
    pub fn ensure_material(&mut self, spec: &MaterialSpec) -> MaterialId {
        if let Some(&id) = self.material_names.get(&spec.name) {
            if self.materials[id].properties != spec.properties {
                warn!(
                    material = %spec.name,
                    "material already defined with different properties; keeping the original"
                );
            }
            return id;
        }
        let id = self.materials.insert(Material {
            name: spec.name.clone(),
            properties: spec.properties,
        });
        self.material_names.insert(spec.name.clone(), id);
        self.history.push(ModelOp::CreateMaterial {
            name: spec.name.clone(),
            properties: spec.properties,
        });
        debug!(material = %spec.name, "material created");
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn material_by_name(&self, name: &str) -> Option<MaterialId> {
        self.material_names.get(name).copied()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn shape_id(&self, name: &str) -> Option<ShapeId> {
        self.names.get(name).copied()
    }

    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.shape_id(name).and_then(|id| self.shapes.get(id))
    }

    /// All shapes still referenceable on their own, in creation order.
    pub fn live_shapes(&self) -> impl Iterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().filter(|(_, s)| s.is_live())
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn boundaries(&self) -> &[BoundaryAssignment] {
        &self.boundaries
    }

    /// Lumped-port assignments, in assignment order.
    pub fn ports(&self) -> impl Iterator<Item = &BoundaryAssignment> {
        self.boundaries.iter().filter(|b| b.port.is_some())
    }

    pub fn has_port(&self, name: &str) -> bool {
        self.ports()
            .any(|b| b.port.as_ref().is_some_and(|p| p.name == name))
    }

    pub fn history(&self) -> &[ModelOp] {
        &self.history
    }

    // ── crate-internal helpers ──────────────────────────────────────────────

    pub(crate) fn reserve_name(&self, name: &str) -> Result<(), ModelError> {
        if self.names.contains_key(name) {
            return Err(ModelError::NameCollision {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert_shape(&mut self, shape: Shape) -> ShapeId {
        let name = shape.name.clone();
        let id = self.shapes.insert(shape);
        self.names.insert(name, id);
        id
    }

    /// Resolve a boolean operand: it must exist and be live.
    pub(crate) fn live_operand(&self, name: &str) -> Result<ShapeId, ModelError> {
        let id = self.shape_id(name).ok_or_else(|| ModelError::InvalidOperand {
            name: name.to_string(),
            reason: "no such shape".to_string(),
        })?;
        match &self.shapes[id].state {
            ShapeState::Live => Ok(id),
            ShapeState::Consumed { by } => Err(ModelError::InvalidOperand {
                name: name.to_string(),
                reason: format!("already consumed by {by}"),
            }),
        }
    }

    /// Resolve a boundary target: it must exist, and a consumed shape is stale.
    pub(crate) fn boundary_target(&self, name: &str) -> Result<ShapeId, ModelError> {
        let id = self.shape_id(name).ok_or_else(|| ModelError::InvalidOperand {
            name: name.to_string(),
            reason: "no such shape".to_string(),
        })?;
        match &self.shapes[id].state {
            ShapeState::Live => Ok(id),
            ShapeState::Consumed { by } => Err(ModelError::StaleReference {
                name: name.to_string(),
                reason: format!("geometry was merged into {by}"),
            }),
        }
    }
}
