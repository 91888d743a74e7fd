use mimo_types::{BoundaryKind, IntegrationLine};
use tracing::{info, instrument, warn};

use crate::error::ModelError;
use crate::history::ModelOp;
use crate::store::{BoundaryAssignment, ModelState, PortBinding, ShapeId};

/// Mark a finished sheet as a perfect electric conductor.
#[instrument(skip(model))]
pub fn assign_conductor(model: &mut ModelState, shape: &str) -> Result<ShapeId, ModelError> {
    let id = model.boundary_target(shape)?;
    require_sheet(model, id, BoundaryKind::PerfectConductor)?;
    require_unbound(model, id)?;

    bind(model, id, BoundaryKind::PerfectConductor, None);
    model.history.push(ModelOp::AssignConductor {
        shape: shape.to_string(),
    });
    info!(shape, "perfect conductor assigned");
    Ok(id)
}

/// Mark an enclosing volume's outer faces as a radiation boundary.
///
/// A second radiation boundary whose volume overlaps an existing one is
/// rejected.
#[instrument(skip(model))]
pub fn assign_radiation(model: &mut ModelState, shape: &str) -> Result<ShapeId, ModelError> {
    let tol = model.tolerance.coincidence;
    let id = model.boundary_target(shape)?;
    if model.shapes[id].is_sheet() {
        return Err(ModelError::GeometryMismatch {
            name: shape.to_string(),
            reason: "radiation boundary needs an enclosing volume, not a sheet".to_string(),
        });
    }
    require_unbound(model, id)?;

    let region = &model.shapes[id].region;
    let clash = model
        .boundaries
        .iter()
        .filter(|b| b.kind == BoundaryKind::Radiation)
        .find(|b| model.shapes[b.shape].region.overlaps(region, tol));
    if let Some(existing) = clash {
        warn!(
            shape,
            existing = %existing.shape_name,
            "radiation volume overlaps an existing radiation boundary"
        );
        return Err(ModelError::DuplicateBoundary {
            name: shape.to_string(),
            kind: BoundaryKind::Radiation,
        });
    }

    bind(model, id, BoundaryKind::Radiation, None);
    model.history.push(ModelOp::AssignRadiation {
        shape: shape.to_string(),
    });
    info!(shape, "radiation boundary assigned");
    Ok(id)
}

/// Bind a lumped-port excitation named `port` to a sheet.
///
/// Both integration-line endpoints must lie on the sheet.
#[instrument(skip(model))]
pub fn assign_port(
    model: &mut ModelState,
    sheet: &str,
    line: IntegrationLine,
    port: &str,
) -> Result<ShapeId, ModelError> {
    if model.has_port(port) {
        return Err(ModelError::NameCollision {
            name: port.to_string(),
        });
    }
    let id = model.boundary_target(sheet)?;
    require_sheet(model, id, BoundaryKind::LumpedPort)?;
    require_unbound(model, id)?;

    let tol = model.tolerance;
    if tol.is_zero_length(line.length()) {
        return Err(ModelError::GeometryMismatch {
            name: sheet.to_string(),
            reason: format!("integration line of {port} has zero length"),
        });
    }
    let region = &model.shapes[id].region;
    for (label, point) in [("start", &line.start), ("end", &line.end)] {
        if !region.contains_point(point, tol.containment) {
            return Err(ModelError::GeometryMismatch {
                name: sheet.to_string(),
                reason: format!(
                    "integration line {label} {:?} of {port} lies outside the sheet",
                    point.coords.as_slice()
                ),
            });
        }
    }

    bind(
        model,
        id,
        BoundaryKind::LumpedPort,
        Some(PortBinding {
            name: port.to_string(),
            line,
        }),
    );
    model.history.push(ModelOp::AssignPort {
        sheet: sheet.to_string(),
        port: port.to_string(),
        line,
    });
    info!(sheet, port, "lumped port assigned");
    Ok(id)
}

fn require_sheet(model: &ModelState, id: ShapeId, kind: BoundaryKind) -> Result<(), ModelError> {
    let shape = &model.shapes[id];
    if shape.is_sheet() {
        Ok(())
    } else {
        Err(ModelError::GeometryMismatch {
            name: shape.name.clone(),
            reason: format!("{kind} boundary needs a sheet, not a solid"),
        })
    }
}

fn require_unbound(model: &ModelState, id: ShapeId) -> Result<(), ModelError> {
    let shape = &model.shapes[id];
    match shape.boundary {
        None => Ok(()),
        Some(kind) => Err(ModelError::DuplicateBoundary {
            name: shape.name.clone(),
            kind,
        }),
    }
}

fn bind(model: &mut ModelState, id: ShapeId, kind: BoundaryKind, port: Option<PortBinding>) {
    let shape = &mut model.shapes[id];
    shape.boundary = Some(kind);
    let shape_name = shape.name.clone();
    model.boundaries.push(BoundaryAssignment {
        shape: id,
        shape_name,
        kind,
        port,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boolean::{subtract, unite};
    use crate::primitives::{create_box, create_rect};
    use mimo_types::Plane;
    use nalgebra::{Point3, Vector3};

    fn port_sheet(model: &mut ModelState) {
        create_rect(
            model,
            Plane::YZ,
            Point3::new(-1.74, 3.11, 0.0),
            [0.78, 0.254],
            "PortSheet_1",
        )
        .unwrap();
    }

    fn feed_line() -> IntegrationLine {
        IntegrationLine::new(Point3::new(-1.74, 3.5, 0.0), Point3::new(-1.74, 3.5, 0.254))
    }

    #[test]
    fn conductor_on_consumed_shape_is_stale() {
        let mut model = ModelState::new();
        create_rect(&mut model, Plane::XY, Point3::origin(), [4.0, 4.0], "Patch").unwrap();
        create_rect(&mut model, Plane::XY, Point3::origin(), [1.0, 1.0], "Feed").unwrap();
        unite(&mut model, &["Patch", "Feed"]).unwrap();

        let err = assign_conductor(&mut model, "Feed").unwrap_err();
        assert!(matches!(err, ModelError::StaleReference { ref name, .. } if name == "Feed"));
    }

    #[test]
    fn boolean_after_boundary_is_stale() {
        let mut model = ModelState::new();
        create_rect(&mut model, Plane::XY, Point3::origin(), [4.0, 4.0], "Patch").unwrap();
        create_rect(&mut model, Plane::XY, Point3::origin(), [1.0, 1.0], "Notch").unwrap();
        assign_conductor(&mut model, "Patch").unwrap();

        let err = subtract(&mut model, "Patch", &["Notch"]).unwrap_err();
        assert!(matches!(err, ModelError::StaleReference { ref name, .. } if name == "Patch"));
    }

    #[test]
    fn conductor_on_solid_is_mismatch() {
        let mut model = ModelState::new();
        create_box(&mut model, Point3::origin(), Vector3::new(1.0, 1.0, 1.0), "Block", None)
            .unwrap();
        let err = assign_conductor(&mut model, "Block").unwrap_err();
        assert!(matches!(err, ModelError::GeometryMismatch { .. }));
    }

    #[test]
    fn second_overlapping_radiation_is_rejected() {
        let mut model = ModelState::new();
        create_box(
            &mut model,
            Point3::new(-9.0, -10.0, -3.0),
            Vector3::new(18.0, 20.0, 6.254),
            "AirBox",
            None,
        )
        .unwrap();
        create_box(
            &mut model,
            Point3::new(-1.0, -1.0, -1.0),
            Vector3::new(2.0, 2.0, 2.0),
            "InnerAir",
            None,
        )
        .unwrap();
        assign_radiation(&mut model, "AirBox").unwrap();
        let err = assign_radiation(&mut model, "InnerAir").unwrap_err();
        assert_eq!(
            err,
            ModelError::DuplicateBoundary {
                name: "InnerAir".into(),
                kind: BoundaryKind::Radiation
            }
        );
    }

    #[test]
    fn disjoint_radiation_volumes_are_allowed() {
        let mut model = ModelState::new();
        for (name, x) in [("AirA", 0.0), ("AirB", 10.0)] {
            create_box(
                &mut model,
                Point3::new(x, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 1.0),
                name,
                None,
            )
            .unwrap();
            assign_radiation(&mut model, name).unwrap();
        }
        assert_eq!(model.boundaries().len(), 2);
    }

    #[test]
    fn port_line_on_sheet_is_accepted() {
        let mut model = ModelState::new();
        port_sheet(&mut model);
        assign_port(&mut model, "PortSheet_1", feed_line(), "Port_1").unwrap();
        assert!(model.has_port("Port_1"));
    }

    #[test]
    fn port_line_off_sheet_is_mismatch() {
        let mut model = ModelState::new();
        port_sheet(&mut model);
        let line = IntegrationLine::new(Point3::new(-1.74, 3.5, 0.0), Point3::new(-1.74, 3.5, 1.0));
        let err = assign_port(&mut model, "PortSheet_1", line, "Port_1").unwrap_err();
        assert!(matches!(err, ModelError::GeometryMismatch { ref name, .. } if name == "PortSheet_1"));
        assert!(!model.has_port("Port_1"));
    }

    #[test]
    fn port_names_are_unique() {
        let mut model = ModelState::new();
        port_sheet(&mut model);
        create_rect(
            &mut model,
            Plane::YZ,
            Point3::new(-1.74, -3.89, 0.0),
            [0.78, 0.254],
            "PortSheet_2",
        )
        .unwrap();
        assign_port(&mut model, "PortSheet_1", feed_line(), "Port_1").unwrap();
        let line = IntegrationLine::new(Point3::new(-1.74, -3.5, 0.0), Point3::new(-1.74, -3.5, 0.254));
        let err = assign_port(&mut model, "PortSheet_2", line, "Port_1").unwrap_err();
        assert_eq!(
            err,
            ModelError::NameCollision {
                name: "Port_1".into()
            }
        );
    }
}
