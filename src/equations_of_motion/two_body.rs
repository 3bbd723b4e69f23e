use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    equations_of_motion::{check_set, Derivative, EquationsOfMotion},
    orbit_type::{
        rate::{CartesianRate, Rate},
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Point-mass gravity of the central body, `dr = v`, `dv = -μ r / R³`.
pub fn point_mass_acceleration(position: &Vector3<f64>, mu: f64) -> Vector3<f64> {
    -mu * position / position.norm().powi(3)
}

/// Unperturbed Keplerian motion in Cartesian coordinates.
#[derive(Debug, Clone)]
pub struct TwoBody<'a> {
    system: &'a AstrodynamicsSystem,
}

impl<'a> TwoBody<'a> {
    pub fn new(system: &'a AstrodynamicsSystem) -> Self {
        TwoBody { system }
    }
}

impl EquationsOfMotion for TwoBody<'_> {
    fn evaluate_at(
        &self,
        _epoch: Epoch,
        state: &OrbitalElements,
        _vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        check_set(self, state)?;
        let cartesian = state.to_cartesian(self.system);
        Ok(Derivative::new(Rate::Cartesian(CartesianRate {
            velocity: cartesian.velocity,
            acceleration: point_mass_acceleration(&cartesian.position, self.system.mu()),
        })))
    }

    fn expected_set(&self) -> ElementSet {
        ElementSet::Cartesian
    }

    fn system(&self) -> &AstrodynamicsSystem {
        self.system
    }

    fn name(&self) -> &'static str {
        "TwoBody"
    }
}

#[cfg(test)]
mod two_body_test {
    use super::*;
    use crate::orbit_type::{cartesian_element::CartesianElements, keplerian_element::KeplerianElements};
    use crate::state::State;
    use crate::time::j2000;
    use crate::vehicle::spacecraft::Spacecraft;
    use approx::assert_relative_eq;

    #[test]
    fn test_leo_acceleration() {
        let sys = AstrodynamicsSystem::default();
        let state = OrbitalElements::from(CartesianElements::leo(&sys));
        let vehicle = Vehicle::new(Spacecraft::new(State::new(state, j2000())));
        let derivative = TwoBody::new(&sys).evaluate(&state, &vehicle).unwrap();
        let rate = derivative.rate.to_vector();
        assert_relative_eq!(rate[3], -0.0081347028957142863, max_relative = 1e-9);
        assert_eq!(rate[4], 0.0);
        assert_eq!(rate[5], 0.0);
        assert_relative_eq!(rate[1], (sys.mu() / 7000.0).sqrt(), max_relative = 1e-14);
        assert_eq!(derivative.degeneracy, None);
    }

    #[test]
    fn test_vallado_8_5() {
        let sys = AstrodynamicsSystem::default();
        let state = OrbitalElements::from(CartesianElements::new(
            Vector3::new(-605.790796, -5870.230422, 3493.051916),
            Vector3::new(-1.568251, -3.702348, -6.479485),
        ));
        let vehicle = Vehicle::default();
        let rate = TwoBody::new(&sys)
            .evaluate(&state, &vehicle)
            .unwrap()
            .rate
            .to_vector();
        assert_relative_eq!(rate[3], 0.00074873079, max_relative = 1e-6);
        assert_relative_eq!(rate[4], 0.00725534667, max_relative = 1e-6);
        assert_relative_eq!(rate[5], -0.00431725847, max_relative = 1e-6);
    }

    #[test]
    fn test_rejects_other_sets() {
        let sys = AstrodynamicsSystem::default();
        let state = OrbitalElements::from(KeplerianElements::leo());
        let err = TwoBody::new(&sys)
            .evaluate(&state, &Vehicle::default())
            .unwrap_err();
        assert_eq!(
            err,
            PropagationError::ElementSetMismatch {
                strategy: "TwoBody",
                expected: ElementSet::Cartesian,
                found: ElementSet::Keplerian,
            }
        );
    }
}
