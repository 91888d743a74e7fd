use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::error::ModelError;
use crate::history::ModelOp;
use crate::store::{ModelState, ShapeId, ShapeState};

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Subtract,
    Unite,
}

/// Remove every secondary from `primary` and consume the secondaries.
///
/// Returns the primary's id; its name and identity carry the result.
#[instrument(skip(model))]
pub fn subtract(
    model: &mut ModelState,
    primary: &str,
    secondaries: &[&str],
) -> Result<ShapeId, ModelError> {
    if secondaries.is_empty() {
        return Err(ModelError::InvalidOperand {
            name: primary.to_string(),
            reason: "subtract needs at least one secondary operand".to_string(),
        });
    }
    let mut names = Vec::with_capacity(secondaries.len() + 1);
    names.push(primary);
    names.extend_from_slice(secondaries);
    execute_boolean(model, &names, BooleanKind::Subtract)
}

/// Merge every listed shape into the first and consume the rest.
#[instrument(skip(model))]
pub fn unite(model: &mut ModelState, names: &[&str]) -> Result<ShapeId, ModelError> {
    if names.len() < 2 {
        return Err(ModelError::InvalidOperand {
            name: names.first().copied().unwrap_or_default().to_string(),
            reason: "unite needs at least two operands".to_string(),
        });
    }
    execute_boolean(model, names, BooleanKind::Unite)
}

/// Validate all operands, compute the result, then commit.
///
/// Nothing in the model changes unless every check passes.
fn execute_boolean(
    model: &mut ModelState,
    names: &[&str],
    kind: BooleanKind,
) -> Result<ShapeId, ModelError> {
    let tol = model.tolerance.coincidence;

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(names.len());
    for &name in names {
        if !seen.insert(name) {
            return Err(ModelError::InvalidOperand {
                name: name.to_string(),
                reason: "listed more than once".to_string(),
            });
        }
        let id = model.live_operand(name)?;
        if let Some(bound) = model.shapes[id].boundary {
            return Err(ModelError::StaleReference {
                name: name.to_string(),
                reason: format!("already carries a {bound} boundary bound to its current faces"),
            });
        }
        ids.push(id);
    }

    let (primary_id, rest) = ids.split_first().ok_or_else(|| ModelError::InvalidOperand {
        name: String::new(),
        reason: "no operands".to_string(),
    })?;
    let primary = &model.shapes[*primary_id];
    let mut result = primary.region.clone();

    for &id in rest {
        let operand = &model.shapes[id];
        if !primary.region.compatible_with(&operand.region, tol) {
            return Err(ModelError::InvalidOperand {
                name: operand.name.clone(),
                reason: format!(
                    "cannot combine with {}: operands must both be solids or coplanar sheets",
                    primary.name
                ),
            });
        }
        match kind {
            BooleanKind::Subtract => result.subtract(&operand.region, tol),
            BooleanKind::Unite => result.unite(&operand.region, tol),
        }
    }

    if result.is_empty() {
        return Err(ModelError::GeometryMismatch {
            name: primary.name.clone(),
            reason: "subtraction leaves no material".to_string(),
        });
    }

    let primary_name = primary.name.clone();
    model.shapes[*primary_id].region = result;
    for &id in rest {
        model.shapes[id].state = ShapeState::Consumed {
            by: primary_name.clone(),
        };
    }

    let consumed: Vec<String> = names[1..].iter().map(|s| s.to_string()).collect();
    model.history.push(match kind {
        BooleanKind::Subtract => ModelOp::Subtract {
            primary: primary_name.clone(),
            secondaries: consumed.clone(),
        },
        BooleanKind::Unite => ModelOp::Unite {
            names: names.iter().map(|s| s.to_string()).collect(),
        },
    });

    debug!(
        op = ?kind,
        primary = %primary_name,
        consumed = ?consumed,
        cells = model.shapes[*primary_id].region.cells().len(),
        "boolean applied"
    );
    Ok(*primary_id)
}
