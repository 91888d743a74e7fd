//! Property-based tests for the build pipeline using `proptest`.

use proptest::prelude::*;

use array_builder::{build_model, ParameterSet};
use model_kernel::ModelState;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// The tuned design scaled uniformly; every length constraint is
/// scale-invariant, so these sets are all valid.
fn arb_scaled_params() -> impl Strategy<Value = ParameterSet> {
    (0.25f64..4.0, 1.0e9f64..100.0e9).prop_map(|(s, f)| {
        let d = ParameterSet::default();
        ParameterSet {
            frequency_hz: f,
            length_unit: d.length_unit,
            substrate_width: d.substrate_width * s,
            substrate_length: d.substrate_length * s,
            substrate_height: d.substrate_height * s,
            patch_length: d.patch_length * s,
            patch_width: d.patch_width * s,
            feed_width: d.feed_width * s,
            inset_depth: d.inset_depth * s,
            inset_gap: d.inset_gap * s,
            dgs_length: d.dgs_length * s,
            dgs_width: d.dgs_width * s,
            element_spacing: d.element_spacing * s,
            air_margin: d.air_margin * s,
            substrate: d.substrate,
        }
    })
}

/// Patch, notch and feed dimensions drawn independently inside their
/// constraints; the substrate is sized to fit whatever was drawn.
fn arb_feed_geometry() -> impl Strategy<Value = ParameterSet> {
    (
        2.0f64..6.0,
        2.0f64..6.0,
        0.02f64..0.98,
        0.02f64..0.95,
        0.01f64..0.98,
        1.05f64..2.0,
    )
        .prop_map(|(patch_l, patch_w, depth, feed, gap, ratio)| {
            let d = ParameterSet::default();
            let feed_width = feed * patch_w;
            let spacing = ratio * patch_w;
            ParameterSet {
                patch_length: patch_l,
                patch_width: patch_w,
                inset_depth: depth * patch_l / 2.0,
                feed_width,
                inset_gap: gap * (patch_w - feed_width) / 2.0,
                element_spacing: spacing,
                substrate_width: patch_l.max(d.dgs_length) + 2.0,
                substrate_length: spacing + patch_w + 2.0,
                ..d
            }
        })
}

// ---------------------------------------------------------------------------
// 1. Valid sets build two disjoint, connected patches
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scaled_design_builds_disjoint_elements(params in arb_scaled_params()) {
        let model = build_model(&params).unwrap();
        let tol = model.state.tolerance().coincidence;
        let p1 = &model.state.shape_by_name("Patch_1").unwrap().region;
        let p2 = &model.state.shape_by_name("Patch_2").unwrap().region;

        prop_assert!(!p1.overlaps(p2, tol));
        prop_assert_eq!(p1.connected_components(tol), 1);
        prop_assert_eq!(p2.connected_components(tol), 1);
    }
}

// ---------------------------------------------------------------------------
// 2. Spacing at or below the patch width is always rejected
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn overlapping_spacing_is_rejected(frac in 0.1f64..1.0) {
        let d = ParameterSet::default();
        let params = ParameterSet {
            element_spacing: d.patch_width * frac,
            ..d
        };
        let err = params.validate().unwrap_err();
        prop_assert_eq!(err.field, "element_spacing");
    }
}

// ---------------------------------------------------------------------------
// 3. Any notch depth and feed placement leaves the feed attached
// ---------------------------------------------------------------------------

fn patch_is_fed(state: &ModelState, patch: &str, feed_point: &nalgebra::Point3<f64>) -> bool {
    let tol = state.tolerance();
    let region = &state.shape_by_name(patch).unwrap().region;
    region.connected_components(tol.coincidence) == 1
        && region.contains_point(feed_point, tol.containment)
}

proptest! {
    #[test]
    fn feed_stays_attached(params in arb_feed_geometry()) {
        prop_assert!(params.validate().is_ok(), "{:?}", params.validate());
        let model = build_model(&params).unwrap();
        prop_assert_eq!(model.elements.len(), 2);
        for element in &model.elements {
            prop_assert!(
                patch_is_fed(&model.state, &element.patch, &element.port_line.end),
                "{} detached for {:?}",
                element.patch,
                params
            );
        }
    }
}
