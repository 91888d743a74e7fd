//! Tests for text model reports.

use array_builder::{build_model, ParameterSet, SolveConfigBuilder};
use test_harness::ModelReport;

#[test]
fn report_lists_shapes_ports_and_oracles() {
    let model = build_model(&ParameterSet::default()).unwrap();
    let report = ModelReport::from_model(&model, None);
    let text = report.to_text();

    assert!(text.starts_with("=== MIMO Array Model Report ==="));
    assert!(text.contains("Patch_1 (XY rectangle, sheet)"), "{text}");
    assert!(text.contains("Substrate (box, Rogers_5880_Clean)"), "{text}");
    assert!(text.contains("AirBox (box, vacuum)"), "{text}");
    assert!(text.contains("Notch_1 -> Patch_1"), "{text}");
    assert!(text.contains("Port_2 on PortSheet_2"), "{text}");
    assert!(text.contains("Oracles (7/7 passed)"), "{text}");
    assert!(!text.contains("Solve:"));
    assert!(report.all_passed());
}

#[test]
fn report_includes_solve_section() {
    let model = build_model(&ParameterSet::default()).unwrap();
    let solve = SolveConfigBuilder::default()
        .for_model(&model)
        .build(&model.state)
        .unwrap();
    let text = ModelReport::from_model(&model, Some(&solve)).to_string();

    assert!(text.contains("Solve: Setup28GHz at 28.000 GHz, 12 passes"), "{text}");
    assert!(text.contains("sweep Sweep28GHz: 26-30 GHz x10"), "{text}");
    assert!(text.contains("sphere 3D_Sphere"), "{text}");
    assert!(text.contains("Port_1: 1 W @ 0°"), "{text}");
}
