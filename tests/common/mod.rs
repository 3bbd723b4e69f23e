#![allow(dead_code)]

use approx::assert_relative_eq;
use orbitflow::integrator::{params::IntegratorParams, Integrator, StepMethod};
use orbitflow::orbit_type::cartesian_element::CartesianElements;
use orbitflow::orbit_type::keplerian_element::KeplerianElements;
use orbitflow::state::State;
use orbitflow::time::j2000;
use orbitflow::vehicle::{spacecraft::Spacecraft, Vehicle};

/// Inclined, eccentric orbit with every classical angle well defined.
pub fn inclined_orbit() -> KeplerianElements {
    KeplerianElements::new(8000.0, 0.1, 0.5, 1.0, 0.7, 2.0)
}

pub fn vehicle_at(elements: KeplerianElements) -> Vehicle {
    Vehicle::new(Spacecraft::new(State::new(elements, j2000())))
}

pub fn integrator(method: StepMethod) -> Integrator {
    let params = IntegratorParams::builder()
        .step_method(method)
        .abs_tol(1e-11)
        .rel_tol(1e-11)
        .build()
        .unwrap();
    Integrator::new(params)
}

pub fn assert_cartesian_close(actual: &CartesianElements, expected: &CartesianElements, max_relative: f64) {
    for i in 0..3 {
        assert_relative_eq!(
            actual.position[i],
            expected.position[i],
            max_relative = max_relative,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            actual.velocity[i],
            expected.velocity[i],
            max_relative = max_relative,
            epsilon = 1e-9
        );
    }
}
