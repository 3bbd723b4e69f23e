use hifitime::Epoch;

use crate::{
    equations_of_motion::{check_set, two_body::point_mass_acceleration, Derivative, EquationsOfMotion},
    forces::ForceModel,
    orbit_type::{
        rate::{CartesianRate, Rate},
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Cowell's method: point-mass gravity plus the sum of a [`ForceModel`], in Cartesian
/// coordinates.
#[derive(Debug, Clone)]
pub struct Cowell<'a> {
    system: &'a AstrodynamicsSystem,
    forces: &'a ForceModel,
}

impl<'a> Cowell<'a> {
    pub fn new(system: &'a AstrodynamicsSystem, forces: &'a ForceModel) -> Self {
        Cowell { system, forces }
    }

    pub fn forces(&self) -> &ForceModel {
        self.forces
    }
}

impl EquationsOfMotion for Cowell<'_> {
    fn evaluate_at(
        &self,
        epoch: Epoch,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        check_set(self, state)?;
        let cartesian = state.to_cartesian(self.system);
        let perturbation = self
            .forces
            .compute_forces(epoch, &cartesian, vehicle, self.system)?;
        Ok(Derivative::new(Rate::Cartesian(CartesianRate {
            velocity: cartesian.velocity,
            acceleration: point_mass_acceleration(&cartesian.position, self.system.mu())
                + perturbation,
        })))
    }

    fn expected_set(&self) -> ElementSet {
        ElementSet::Cartesian
    }

    fn system(&self) -> &AstrodynamicsSystem {
        self.system
    }

    fn name(&self) -> &'static str {
        "Cowell"
    }
}

#[cfg(test)]
mod cowell_test {
    use super::*;
    use crate::equations_of_motion::two_body::TwoBody;
    use crate::forces::oblateness::{j2_acceleration, OblatenessForce};
    use crate::orbit_type::cartesian_element::CartesianElements;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_empty_force_model_matches_two_body() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(CartesianElements::gps(&sys));
        let vehicle = Vehicle::default();
        let cowell = Cowell::new(&sys, &forces).evaluate(&state, &vehicle).unwrap();
        let two_body = TwoBody::new(&sys).evaluate(&state, &vehicle).unwrap();
        assert_eq!(cowell, two_body);
    }

    #[test]
    fn test_adds_perturbations() {
        let sys = AstrodynamicsSystem::default();
        let mut forces = ForceModel::default();
        forces.add(OblatenessForce);
        let position = Vector3::new(-605.790796, -5870.230422, 3493.051916);
        let state = OrbitalElements::from(CartesianElements::new(
            position,
            Vector3::new(-1.568251, -3.702348, -6.479485),
        ));
        let vehicle = Vehicle::default();
        let cowell = Cowell::new(&sys, &forces)
            .evaluate(&state, &vehicle)
            .unwrap()
            .rate
            .to_vector();
        let expected = point_mass_acceleration(&position, sys.mu())
            + j2_acceleration(&position, sys.central_body());
        assert_relative_eq!(
            Vector3::new(cowell[3], cowell[4], cowell[5]),
            expected,
            max_relative = 1e-14
        );
    }
}
