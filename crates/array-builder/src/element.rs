use mimo_types::{IntegrationLine, Plane};
use model_kernel::{assign_conductor, assign_port, create_rect, subtract, unite, ModelError, ModelState};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::params::ParameterSet;

/// One radiating element of the array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// 1-based element number, used in every shape name.
    pub index: usize,
    /// Array-axis (y) centre of the element.
    pub center_offset: f64,
    /// Inset-fed patch after notch and feed composition.
    pub patch: String,
    pub port_sheet: String,
    pub port: String,
    pub port_line: IntegrationLine,
}

/// Shape names for element `index`.
pub struct ElementNames {
    pub patch: String,
    pub notch: String,
    pub feed_strip: String,
    pub port_sheet: String,
    pub port: String,
}

impl ElementNames {
    pub fn new(index: usize) -> Self {
        Self {
            patch: format!("Patch_{index}"),
            notch: format!("Notch_{index}"),
            feed_strip: format!("FeedStrip_{index}"),
            port_sheet: format!("PortSheet_{index}"),
            port: format!("Port_{index}"),
        }
    }
}

/// Build one inset-fed patch element centred at `y = center_offset`.
///
/// The notch is subtracted before the feed strip is united; the other order
/// would cut the feed back out and leave the port unconnected.
#[instrument(skip(model, params))]
pub fn generate_element(
    model: &mut ModelState,
    params: &ParameterSet,
    index: usize,
    center_offset: f64,
) -> Result<Element, ModelError> {
    let names = ElementNames::new(index);
    let c = center_offset;
    let h = params.substrate_height;
    let p_x = params.feed_edge_x();
    let p_y = c - params.patch_width / 2.0;
    let notch_w = params.notch_width();

    create_rect(
        model,
        Plane::XY,
        Point3::new(p_x, p_y, h),
        [params.patch_length, params.patch_width],
        &names.patch,
    )?;
    create_rect(
        model,
        Plane::XY,
        Point3::new(p_x, c - notch_w / 2.0, h),
        [params.inset_depth, notch_w],
        &names.notch,
    )?;
    create_rect(
        model,
        Plane::XY,
        Point3::new(p_x, c - params.feed_width / 2.0, h),
        [params.inset_depth, params.feed_width],
        &names.feed_strip,
    )?;

    subtract(model, &names.patch, &[names.notch.as_str()])?;
    unite(model, &[names.patch.as_str(), names.feed_strip.as_str()])?;
    assign_conductor(model, &names.patch)?;

    create_rect(
        model,
        Plane::YZ,
        Point3::new(p_x, c - params.feed_width / 2.0, 0.0),
        [params.feed_width, h],
        &names.port_sheet,
    )?;
    let port_line = IntegrationLine::new(Point3::new(p_x, c, 0.0), Point3::new(p_x, c, h));
    assign_port(model, &names.port_sheet, port_line, &names.port)?;

    info!(index, center_offset, patch = %names.patch, port = %names.port, "element generated");
    Ok(Element {
        index,
        center_offset,
        patch: names.patch,
        port_sheet: names.port_sheet,
        port: names.port,
        port_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mimo_types::BoundaryKind;

    #[test]
    fn element_patch_is_one_piece() {
        let params = ParameterSet::default();
        let mut model = ModelState::new();
        generate_element(&mut model, &params, 1, 3.5).unwrap();

        let tol = model.tolerance().coincidence;
        let patch = model.shape_by_name("Patch_1").unwrap();
        assert_eq!(patch.region.connected_components(tol), 1);
        assert_eq!(patch.boundary, Some(BoundaryKind::PerfectConductor));

        let expected = params.patch_length * params.patch_width
            - params.inset_depth * params.notch_width()
            + params.inset_depth * params.feed_width;
        assert_relative_eq!(patch.region.measure(tol), expected, epsilon = 1e-9);
    }

    #[test]
    fn feed_point_lies_on_patch_edge() {
        let params = ParameterSet::default();
        let mut model = ModelState::new();
        let element = generate_element(&mut model, &params, 2, -3.5).unwrap();

        let tol = model.tolerance().containment;
        let patch = model.shape_by_name(&element.patch).unwrap();
        let feed_point = Point3::new(params.feed_edge_x(), -3.5, params.substrate_height);
        assert!(patch.region.contains_point(&feed_point, tol));
        assert_eq!(element.port_line.end, feed_point);
    }

    #[test]
    fn notch_and_feed_are_consumed() {
        let params = ParameterSet::default();
        let mut model = ModelState::new();
        generate_element(&mut model, &params, 1, 3.5).unwrap();
        assert!(!model.shape_by_name("Notch_1").unwrap().is_live());
        assert!(!model.shape_by_name("FeedStrip_1").unwrap().is_live());
        assert!(model.has_port("Port_1"));
    }

    #[test]
    fn same_index_twice_collides() {
        let params = ParameterSet::default();
        let mut model = ModelState::new();
        generate_element(&mut model, &params, 1, 3.5).unwrap();
        let err = generate_element(&mut model, &params, 1, -3.5).unwrap_err();
        assert!(matches!(err, ModelError::NameCollision { ref name } if name == "Patch_1"));
    }
}
