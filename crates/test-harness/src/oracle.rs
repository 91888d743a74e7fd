//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail instead of
//! panicking, so a single pass can collect every failure.

use array_builder::{AntennaModel, Element};
use mimo_types::{BoundaryKind, Plane, ShapeKind};
use model_kernel::ModelState;

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Element Oracles ─────────────────────────────────────────────────────────

/// Check that no two element patches share area, and report the smallest
/// edge-to-edge gap along the array axis.
pub fn check_elements_disjoint(model: &AntennaModel) -> OracleVerdict {
    const NAME: &str = "elements_disjoint";
    let state = &model.state;
    let tol = state.tolerance().coincidence;

    let mut min_gap = f64::INFINITY;
    for (i, a) in model.elements.iter().enumerate() {
        for b in &model.elements[i + 1..] {
            let (Some(pa), Some(pb)) = (
                state.shape_by_name(&a.patch),
                state.shape_by_name(&b.patch),
            ) else {
                return OracleVerdict::fail(NAME, format!("{} or {} missing", a.patch, b.patch));
            };
            if pa.region.overlaps(&pb.region, tol) {
                return OracleVerdict::fail(NAME, format!("{} overlaps {}", a.patch, b.patch));
            }
            if let (Some(ba), Some(bb)) = (pa.bounding_box(), pb.bounding_box()) {
                let gap = (ba.min.y - bb.max.y).max(bb.min.y - ba.max.y);
                min_gap = min_gap.min(gap);
            }
        }
    }

    if model.elements.len() < 2 {
        OracleVerdict::fail(
            NAME,
            format!("expected two elements, found {}", model.elements.len()),
        )
    } else if min_gap > 0.0 {
        OracleVerdict::pass_val(NAME, format!("minimum patch gap {min_gap:.4} mm"), min_gap)
    } else {
        OracleVerdict::fail_val(NAME, format!("patches touch (gap {min_gap:.4} mm)"), min_gap)
    }
}

/// Check that an element's patch is one connected piece that covers the
/// point where its port line meets the patch plane.
pub fn check_feed_attached(state: &ModelState, element: &Element) -> OracleVerdict {
    const NAME: &str = "feed_attached";
    let Some(patch) = state.shape_by_name(&element.patch) else {
        return OracleVerdict::fail(NAME, format!("{} missing", element.patch));
    };
    let tol = state.tolerance();
    let pieces = patch.region.connected_components(tol.coincidence);
    let feed_point = element.port_line.end;

    if pieces != 1 {
        OracleVerdict::fail_val(
            NAME,
            format!("{} splits into {pieces} pieces", element.patch),
            pieces as f64,
        )
    } else if !patch.region.contains_point(&feed_point, tol.containment) {
        OracleVerdict::fail(
            NAME,
            format!(
                "{} does not cover feed point ({:.3}, {:.3}, {:.3})",
                element.patch, feed_point.x, feed_point.y, feed_point.z
            ),
        )
    } else {
        OracleVerdict::pass(NAME, format!("{} fed at y={:.3}", element.patch, feed_point.y))
    }
}

// ── Boundary Oracles ────────────────────────────────────────────────────────

/// Check that every lumped port sits on a live YZ sheet and both ends of its
/// integration line lie on that sheet.
pub fn check_ports_on_sheets(state: &ModelState) -> OracleVerdict {
    const NAME: &str = "ports_on_sheets";
    let tol = state.tolerance().containment;
    let mut count = 0usize;

    for assignment in state.ports() {
        let Some(port) = &assignment.port else {
            continue;
        };
        let Some(sheet) = state.shape(assignment.shape) else {
            return OracleVerdict::fail(NAME, format!("{} has no sheet", port.name));
        };
        if !sheet.is_live() || sheet.kind != (ShapeKind::Rectangle { plane: Plane::YZ }) {
            return OracleVerdict::fail(
                NAME,
                format!("{} sits on {} which is not a live YZ sheet", port.name, sheet.name),
            );
        }
        let on_sheet = |p| sheet.region.contains_point(p, tol);
        if !on_sheet(&port.line.start) || !on_sheet(&port.line.end) {
            return OracleVerdict::fail(
                NAME,
                format!("{} integration line leaves {}", port.name, sheet.name),
            );
        }
        count += 1;
    }

    OracleVerdict::pass_val(NAME, format!("{count} ports verified"), count as f64)
}

/// Check the ground plane area equals the footprint minus both DGS slots.
pub fn check_ground_slots(model: &AntennaModel) -> OracleVerdict {
    const NAME: &str = "ground_slots";
    let p = &model.params;
    let Some(ground) = model.state.shape_by_name(&model.ground) else {
        return OracleVerdict::fail(NAME, format!("{} missing", model.ground));
    };
    let tol = model.state.tolerance().coincidence;
    let area = ground.region.measure(tol);
    let expected = p.substrate_width * p.substrate_length
        - model.slots.len() as f64 * p.dgs_length * p.dgs_width;

    if (area - expected).abs() <= 1e-9 * expected.max(1.0) {
        OracleVerdict::pass_val(
            NAME,
            format!("ground area {area:.4} mm² with {} slots", model.slots.len()),
            area,
        )
    } else {
        OracleVerdict::fail_val(
            NAME,
            format!("ground area {area:.6} mm², expected {expected:.6}"),
            area,
        )
    }
}

/// Check each named shape carries the boundary the array needs.
pub fn check_boundary_kinds(model: &AntennaModel) -> OracleVerdict {
    const NAME: &str = "boundary_kinds";
    let mut expected = vec![
        (model.ground.as_str(), BoundaryKind::PerfectConductor),
        (model.air_box.as_str(), BoundaryKind::Radiation),
    ];
    for e in &model.elements {
        expected.push((e.patch.as_str(), BoundaryKind::PerfectConductor));
        expected.push((e.port_sheet.as_str(), BoundaryKind::LumpedPort));
    }

    let mut wrong = Vec::new();
    for (name, kind) in &expected {
        let actual = model.state.shape_by_name(name).and_then(|s| s.boundary);
        if actual != Some(*kind) {
            wrong.push(format!("{name}: expected {kind}, got {actual:?}"));
        }
    }

    if wrong.is_empty() {
        OracleVerdict::pass(NAME, format!("{} assignments correct", expected.len()))
    } else {
        OracleVerdict::fail(NAME, wrong.join("; "))
    }
}

/// Check the radiation box encloses every other live shape.
pub fn check_air_box_encloses(model: &AntennaModel) -> OracleVerdict {
    const NAME: &str = "air_box_encloses";
    let state = &model.state;
    let tol = state.tolerance().containment;
    let Some(air) = state
        .shape_by_name(&model.air_box)
        .and_then(|s| s.bounding_box())
    else {
        return OracleVerdict::fail(NAME, format!("{} missing", model.air_box));
    };

    for (_, shape) in state.live_shapes() {
        if shape.name == model.air_box {
            continue;
        }
        let Some(bb) = shape.bounding_box() else {
            continue;
        };
        if !air.contains_point(&bb.min, tol) || !air.contains_point(&bb.max, tol) {
            return OracleVerdict::fail(NAME, format!("{} pokes out of {}", shape.name, model.air_box));
        }
    }
    OracleVerdict::pass(NAME, format!("{} encloses the model", model.air_box))
}

// ── Structural Oracles ──────────────────────────────────────────────────────

/// Check two builds recorded identical operation histories.
pub fn check_structural_equality(a: &ModelState, b: &ModelState) -> OracleVerdict {
    const NAME: &str = "structural_equality";
    let (ha, hb) = (a.history(), b.history());
    if ha.len() != hb.len() {
        return OracleVerdict::fail(
            NAME,
            format!("history lengths differ: {} vs {}", ha.len(), hb.len()),
        );
    }
    match ha.iter().zip(hb).position(|(x, y)| x != y) {
        Some(i) => OracleVerdict::fail(
            NAME,
            format!("histories diverge at step {i} ({})", ha[i].label()),
        ),
        None => OracleVerdict::pass_val(
            NAME,
            format!("{} operations identical", ha.len()),
            ha.len() as f64,
        ),
    }
}

/// Run every single-model oracle.
pub fn run_all_oracles(model: &AntennaModel) -> Vec<OracleVerdict> {
    let mut verdicts = vec![check_elements_disjoint(model)];
    verdicts.extend(
        model
            .elements
            .iter()
            .map(|e| check_feed_attached(&model.state, e)),
    );
    verdicts.push(check_ports_on_sheets(&model.state));
    verdicts.push(check_ground_slots(model));
    verdicts.push(check_boundary_kinds(model));
    verdicts.push(check_air_box_encloses(model));
    verdicts
}
