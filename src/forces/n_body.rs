use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    forces::Force, orbit_type::cartesian_element::CartesianElements,
    propagation_errors::PropagationError, system::AstrodynamicsSystem, vehicle::Vehicle,
};

/// Third-body perturbation of every secondary body of the system.
///
/// For a body `b` at `r_cb` from the center and `r_vb` from the vehicle the contribution is
/// `μ_b (r_vb / |r_vb|³ - r_cb / |r_cb|³)`: the direct pull on the vehicle minus the pull on
/// the central body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NBodyForce;

impl Force for NBodyForce {
    fn compute_force(
        &self,
        epoch: Epoch,
        state: &CartesianElements,
        _vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        system
            .secondary_bodies()
            .try_fold(Vector3::zeros(), |acc, body| {
                let center_to_body = body.position_at(epoch)?;
                let vehicle_to_body = center_to_body - state.position;
                let direct = vehicle_to_body / vehicle_to_body.norm().powi(3);
                let indirect = center_to_body / center_to_body.norm().powi(3);
                Ok(acc + body.mu * (direct - indirect))
            })
    }

    fn name(&self) -> &'static str {
        "NBodyForce"
    }
}

#[cfg(test)]
mod n_body_test {
    use super::*;
    use crate::celestial_body::{CelestialBody, TabulatedEphemeris};
    use crate::constants::MOON_MU;
    use crate::orbit_type::keplerian_element::KeplerianElements;
    use crate::state::State;
    use crate::time::{j2000, offset_seconds};
    use crate::vehicle::spacecraft::Spacecraft;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_tidal_acceleration_along_moon_axis() {
        let d = 384_400.0;
        let table = TabulatedEphemeris::new(vec![
            (offset_seconds(j2000(), -10.0), Vector3::new(d, 0.0, 0.0)),
            (offset_seconds(j2000(), 10.0), Vector3::new(d, 0.0, 0.0)),
        ])
        .unwrap();
        let moon = CelestialBody::moon().with_ephemeris(Arc::new(table));
        let sys = AstrodynamicsSystem::new(CelestialBody::earth(), vec![moon]);
        let vehicle = Vehicle::new(Spacecraft::new(State::new(KeplerianElements::leo(), j2000())));

        let state = CartesianElements::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::zeros());
        let accel = NBodyForce
            .compute_force(j2000(), &state, &vehicle, &sys)
            .unwrap();
        let expected = MOON_MU * (1.0 / (d - 7000.0).powi(2) - 1.0 / d.powi(2));
        assert_relative_eq!(accel.x, expected, max_relative = 1e-9);
        assert_eq!(accel.y, 0.0);

        let late = offset_seconds(j2000(), 60.0);
        assert!(matches!(
            NBodyForce.compute_force(late, &state, &vehicle, &sys),
            Err(PropagationError::EphemerisOutOfRange { .. })
        ));
    }

    #[test]
    fn test_no_secondary_bodies() {
        let sys = AstrodynamicsSystem::new(CelestialBody::earth(), vec![]);
        let vehicle = Vehicle::default();
        let state = CartesianElements::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::zeros());
        assert_eq!(
            NBodyForce
                .compute_force(j2000(), &state, &vehicle, &sys)
                .unwrap(),
            Vector3::zeros()
        );
    }
}
