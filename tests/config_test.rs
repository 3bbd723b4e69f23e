mod common;

use std::fs;

use orbitflow::equations_of_motion::two_body::TwoBody;
use orbitflow::integrator::{params::IntegratorParams, Integrator, StepMethod};
use orbitflow::propagation_errors::PropagationError;
use orbitflow::system::AstrodynamicsSystem;
use orbitflow::time::seconds;

use crate::common::{inclined_orbit, vehicle_at};

fn load(path: &str) -> IntegratorParams {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_load_integrator_params_from_json() {
    let params = load("tests/data/integrator.json").validate().unwrap();
    assert_eq!(params.step_method, StepMethod::Rkf78);
    assert_eq!(params.abs_tol, 1e-10);
    assert_eq!(params.initial_time_step, 60.0);
    assert_eq!(params.max_time_step, 3600.0);
    // not listed in the file
    assert_eq!(params.max_step_retries, IntegratorParams::default().max_step_retries);

    let sys = AstrodynamicsSystem::default();
    let mut integrator = Integrator::new(params);
    let history = integrator
        .propagate_for(seconds(3600.0), &TwoBody::new(&sys), &mut vehicle_at(inclined_orbit()), true)
        .unwrap();
    assert!(history.len() > 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = load("tests/data/bad_integrator.json").validate().unwrap_err();
    assert_eq!(
        err,
        PropagationError::InvalidIntegratorParameter(
            "require min_time_step <= max_time_step".into()
        )
    );
}

#[test]
fn test_params_survive_json_round_trip() {
    let params = IntegratorParams::builder()
        .step_method(StepMethod::Rkf45)
        .use_fixed_step(true)
        .fixed_time_step(30.0)
        .build()
        .unwrap();
    let text = serde_json::to_string_pretty(&params).unwrap();
    assert!(text.contains("\"Rkf45\""));
    let back: IntegratorParams = serde_json::from_str(&text).unwrap();
    assert_eq!(back, params);
}
