use mimo_types::{Plane, ShapeKind};
use nalgebra::{Point3, Vector3};
use tracing::{info, instrument};

use crate::error::ModelError;
use crate::geometry::{Aabb, Region};
use crate::history::ModelOp;
use crate::store::{Fill, MaterialId, ModelState, Shape, ShapeId, ShapeState};

/// Create a solid axis-aligned box spanning `origin` to `origin + size`.
///
/// `material` of `None` fills the box with vacuum.
#[instrument(skip(model))]
pub fn create_box(
    model: &mut ModelState,
    origin: Point3<f64>,
    size: Vector3<f64>,
    name: &str,
    material: Option<MaterialId>,
) -> Result<ShapeId, ModelError> {
    check_origin(name, &origin)?;
    check_sizes(name, size.as_slice())?;
    model.reserve_name(name)?;

    let material_name = match material {
        Some(id) => Some(
            model
                .material(id)
                .ok_or_else(|| ModelError::InvalidOperand {
                    name: name.to_string(),
                    reason: "unknown material".to_string(),
                })?
                .name
                .clone(),
        ),
        None => None,
    };

    let id = model.insert_shape(Shape {
        name: name.to_string(),
        kind: ShapeKind::Box,
        origin,
        size,
        fill: material.map_or(Fill::Vacuum, Fill::Dielectric),
        region: Region::solid(Aabb::from_origin_size(origin, size)),
        state: ShapeState::Live,
        boundary: None,
    });
    model.history.push(ModelOp::CreateBox {
        name: name.to_string(),
        origin,
        size,
        material: material_name,
    });

    info!(name, origin = ?origin.coords.as_slice(), size = ?size.as_slice(), "box created");
    Ok(id)
}

/// Create a zero-thickness rectangle on `plane` with its corner at `origin`.
///
/// `size` is in the plane's own axis order (see [`Plane::lift_size`]).
#[instrument(skip(model))]
pub fn create_rect(
    model: &mut ModelState,
    plane: Plane,
    origin: Point3<f64>,
    size: [f64; 2],
    name: &str,
) -> Result<ShapeId, ModelError> {
    check_origin(name, &origin)?;
    check_sizes(name, &size)?;
    model.reserve_name(name)?;

    let lifted = plane.lift_size(size);
    let id = model.insert_shape(Shape {
        name: name.to_string(),
        kind: ShapeKind::Rectangle { plane },
        origin,
        size: lifted,
        fill: Fill::Sheet,
        region: Region::sheet(Aabb::from_origin_size(origin, lifted), plane.normal_axis()),
        state: ShapeState::Live,
        boundary: None,
    });
    model.history.push(ModelOp::CreateRectangle {
        name: name.to_string(),
        plane,
        origin,
        size,
    });

    info!(name, %plane, origin = ?origin.coords.as_slice(), ?size, "rectangle created");
    Ok(id)
}

fn check_origin(name: &str, origin: &Point3<f64>) -> Result<(), ModelError> {
    if origin.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(ModelError::InvalidDimensions {
            name: name.to_string(),
            reason: format!("origin {:?} is not finite", origin.coords.as_slice()),
        })
    }
}

fn check_sizes(name: &str, size: &[f64]) -> Result<(), ModelError> {
    match size.iter().position(|s| !(s.is_finite() && *s > 0.0)) {
        None => Ok(()),
        Some(i) => Err(ModelError::InvalidDimensions {
            name: name.to_string(),
            reason: format!("size component {i} is {} (must be > 0)", size[i]),
        }),
    }
}
