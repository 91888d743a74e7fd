use array_builder::*;
use mimo_types::{Excitation, Plane};
use model_kernel::{create_rect, subtract, unite, ModelOp, ModelState};
use nalgebra::Point3;
use sim_engine::{EngineCommand, MockEngine};

fn slot_centre(history: &[ModelOp], name: &str) -> f64 {
    history
        .iter()
        .find_map(|op| match op {
            ModelOp::CreateRectangle {
                name: n,
                origin,
                size,
                ..
            } if n == name => Some(origin.y + size[1] / 2.0),
            _ => None,
        })
        .unwrap()
}

#[test]
fn default_28ghz_run() {
    let mut engine = MockEngine::new();
    let outcome = run(&ParameterSet::default(), &SolveSettings::default(), &mut engine).unwrap();

    let history = outcome.model.state.history();
    assert!((slot_centre(history, "Slot_1") - 3.5).abs() < 1e-12);
    assert!((slot_centre(history, "Slot_2") + 3.5).abs() < 1e-12);

    let points = outcome.solve.sweep.points();
    assert_eq!(points.len(), 10);
    assert!((points[0] - 26.0).abs() < 1e-12);
    assert!((points[9] - 30.0).abs() < 1e-12);
    assert!((outcome.solve.sweep.start_hz() - 26.0e9).abs() < 1.0);

    assert_eq!(engine.analyzed_setups(), ["Setup28GHz".to_string()]);
    assert_eq!(engine.sweeps_of("Setup28GHz"), vec!["Sweep28GHz"]);
    assert_eq!(engine.excitations().len(), 2);
    assert_eq!(engine.excitations()["Port_1"], Excitation::new(1.0, 0.0));
}

#[test]
fn rebuild_is_deterministic() {
    let params = ParameterSet::default();
    let mut first = MockEngine::new();
    let mut second = MockEngine::new();
    let a = run(&params, &SolveSettings::default(), &mut first).unwrap();
    let b = run(&params, &SolveSettings::default(), &mut second).unwrap();

    assert_eq!(a.model.state.history(), b.model.state.history());
    assert_eq!(a.solve, b.solve);
    assert_eq!(first.journal(), second.journal());
}

#[test]
fn unknown_port_excitation_fails_before_engine() {
    let model = build_model(&ParameterSet::default()).unwrap();
    let err = SolveConfigBuilder::default()
        .for_model(&model)
        .excite("Port_3", Excitation::new(1.0, 0.0))
        .build(&model.state)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownPort);
}

#[test]
fn analysis_failure_passes_diagnostic_through() {
    let mut engine = MockEngine::new();
    engine.fail_analysis("adaptive solution did not converge");
    let err = run(&ParameterSet::default(), &SolveSettings::default(), &mut engine).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EngineFailure);
    assert_eq!(err.entity(), "Setup28GHz");
    match err {
        BuildError::Engine(e) => assert_eq!(e.diagnostic(), "adaptive solution did not converge"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!engine
        .journal()
        .iter()
        .any(|c| matches!(c, EngineCommand::SetExcitations { .. })));
}

#[test]
fn materials_are_created_once() {
    let mut engine = MockEngine::new();
    run(&ParameterSet::default(), &SolveSettings::default(), &mut engine).unwrap();
    let materials = engine
        .journal()
        .iter()
        .filter(|c| matches!(c, EngineCommand::CreateMaterial { .. }))
        .count();
    assert_eq!(materials, 1);
}

#[test]
fn unite_before_subtract_loses_the_feed() {
    let params = ParameterSet::default();
    let mut model = ModelState::new();
    let (p_x, c, h) = (params.feed_edge_x(), 3.5, params.substrate_height);
    let notch_w = params.notch_width();

    create_rect(
        &mut model,
        Plane::XY,
        Point3::new(p_x, c - params.patch_width / 2.0, h),
        [params.patch_length, params.patch_width],
        "Patch_1",
    )
    .unwrap();
    create_rect(
        &mut model,
        Plane::XY,
        Point3::new(p_x, c - notch_w / 2.0, h),
        [params.inset_depth, notch_w],
        "Notch_1",
    )
    .unwrap();
    create_rect(
        &mut model,
        Plane::XY,
        Point3::new(p_x, c - params.feed_width / 2.0, h),
        [params.inset_depth, params.feed_width],
        "FeedStrip_1",
    )
    .unwrap();

    unite(&mut model, &["Patch_1", "FeedStrip_1"]).unwrap();
    subtract(&mut model, "Patch_1", &["Notch_1"]).unwrap();

    let patch = model.shape_by_name("Patch_1").unwrap();
    let feed_point = Point3::new(p_x, c, h);
    assert!(!patch.region.contains_point(&feed_point, 1e-9));
}

#[test]
fn parameter_error_names_field_through_run() {
    let params = ParameterSet {
        inset_depth: 2.0,
        ..ParameterSet::default()
    };
    let mut engine = MockEngine::new();
    let err = run(&params, &SolveSettings::default(), &mut engine).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParameterError);
    assert_eq!(err.entity(), "inset_depth");
    assert!(engine.journal().is_empty());
}
