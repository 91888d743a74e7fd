use mimo_types::Plane;
use model_kernel::{assign_conductor, assign_radiation, create_box, create_rect, subtract, ModelState};
use nalgebra::{Point3, Vector3};
use tracing::{info, instrument};

use crate::element::{generate_element, Element};
use crate::error::BuildError;
use crate::params::ParameterSet;

pub const SUBSTRATE: &str = "Substrate";
pub const GROUND: &str = "Ground";
pub const AIR_BOX: &str = "AirBox";

/// Name of the DGS slot under element `index`.
pub fn slot_name(index: usize) -> String {
    format!("Slot_{index}")
}

/// A finished, solver-ready array model.
#[derive(Debug, Clone)]
pub struct AntennaModel {
    pub params: ParameterSet,
    pub state: ModelState,
    pub substrate: String,
    pub ground: String,
    pub slots: Vec<String>,
    pub elements: Vec<Element>,
    pub air_box: String,
}

impl AntennaModel {
    /// Port names in element order.
    pub fn port_names(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.port.clone()).collect()
    }
}

/// Run the full construction pass for `params`.
///
/// Parameters are validated before any geometry is created. Build order:
/// material, substrate, ground with DGS slots, ground conductor, element 1
/// at `+spacing/2`, element 2 at `-spacing/2`, then the radiation air box.
#[instrument(skip_all)]
pub fn build_model(params: &ParameterSet) -> Result<AntennaModel, BuildError> {
    params.validate()?;

    let mut state = ModelState::new();
    let material = state.ensure_material(&params.substrate);

    let (sub_w, sub_l, sub_h) = (
        params.substrate_width,
        params.substrate_length,
        params.substrate_height,
    );
    create_box(
        &mut state,
        Point3::new(-sub_w / 2.0, -sub_l / 2.0, 0.0),
        Vector3::new(sub_w, sub_l, sub_h),
        SUBSTRATE,
        Some(material),
    )?;

    create_rect(
        &mut state,
        Plane::XY,
        Point3::new(-sub_w / 2.0, -sub_l / 2.0, 0.0),
        [sub_w, sub_l],
        GROUND,
    )?;
    let offsets = params.element_offsets();
    let mut slots = Vec::with_capacity(offsets.len());
    for (i, y) in offsets.iter().enumerate() {
        let name = slot_name(i + 1);
        create_rect(
            &mut state,
            Plane::XY,
            Point3::new(-params.dgs_length / 2.0, y - params.dgs_width / 2.0, 0.0),
            [params.dgs_length, params.dgs_width],
            &name,
        )?;
        slots.push(name);
    }
    let slot_refs: Vec<&str> = slots.iter().map(String::as_str).collect();
    subtract(&mut state, GROUND, &slot_refs)?;
    assign_conductor(&mut state, GROUND)?;

    let mut elements = Vec::with_capacity(offsets.len());
    for (i, &c) in offsets.iter().enumerate() {
        elements.push(generate_element(&mut state, params, i + 1, c)?);
    }

    let m = params.air_margin;
    create_box(
        &mut state,
        Point3::new(-sub_w / 2.0 - m, -sub_l / 2.0 - m, -m),
        Vector3::new(sub_w + 2.0 * m, sub_l + 2.0 * m, sub_h + 2.0 * m),
        AIR_BOX,
        None,
    )?;
    assign_radiation(&mut state, AIR_BOX)?;

    info!(
        shapes = state.shape_count(),
        operations = state.history().len(),
        "model built"
    );
    Ok(AntennaModel {
        params: params.clone(),
        state,
        substrate: SUBSTRATE.to_string(),
        ground: GROUND.to_string(),
        slots,
        elements,
        air_box: AIR_BOX.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mimo_types::BoundaryKind;

    #[test]
    fn default_build_has_two_ports() {
        let model = build_model(&ParameterSet::default()).unwrap();
        assert_eq!(model.port_names(), vec!["Port_1", "Port_2"]);
        assert_eq!(model.state.ports().count(), 2);
    }

    #[test]
    fn ground_is_slotted_conductor() {
        let model = build_model(&ParameterSet::default()).unwrap();
        let ground = model.state.shape_by_name(GROUND).unwrap();
        assert_eq!(ground.boundary, Some(BoundaryKind::PerfectConductor));
        assert_relative_eq!(ground.region.measure(1e-9), 12.0 * 14.0 - 2.0 * 4.0 * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn air_box_carries_radiation() {
        let model = build_model(&ParameterSet::default()).unwrap();
        let air = model.state.shape_by_name(AIR_BOX).unwrap();
        assert_eq!(air.boundary, Some(BoundaryKind::Radiation));
        assert_relative_eq!(air.origin.z, -3.0);
        assert_relative_eq!(air.size.z, 6.254, epsilon = 1e-12);
    }

    #[test]
    fn invalid_params_create_nothing() {
        let params = ParameterSet {
            element_spacing: 4.0,
            ..ParameterSet::default()
        };
        let err = build_model(&params).unwrap_err();
        assert!(matches!(err, BuildError::Parameter(_)));
    }
}
