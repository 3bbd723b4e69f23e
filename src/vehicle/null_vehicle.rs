use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    propagation_errors::PropagationError, state::State, system::AstrodynamicsSystem,
    vehicle::VehicleModel,
};

/// Point mass with no surfaces: drag, lift and radiation pressure all vanish on it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullVehicle {
    state: State,
    initial_state: State,
    mass: f64,
}

impl NullVehicle {
    pub fn new(initial_state: State, mass: f64) -> Self {
        NullVehicle {
            state: initial_state,
            initial_state,
            mass,
        }
    }
}

impl VehicleModel for NullVehicle {
    fn state(&self) -> &State {
        &self.state
    }

    fn update_state(&mut self, state: State) {
        self.state = state;
    }

    fn initial_state(&self) -> &State {
        &self.initial_state
    }

    fn name(&self) -> &str {
        "NullVehicle"
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn inertial_position(
        &self,
        _epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(self.state.elements.to_cartesian(system).position)
    }

    fn inertial_velocity(
        &self,
        _epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(self.state.elements.to_cartesian(system).velocity)
    }

    fn clone_box(&self) -> Box<dyn VehicleModel> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod null_vehicle_test {
    use super::*;
    use crate::orbit_type::keplerian_element::KeplerianElements;
    use crate::time::j2000;

    #[test]
    fn test_position_from_state() {
        let sys = AstrodynamicsSystem::default();
        let vehicle = NullVehicle::new(State::new(KeplerianElements::gps(), j2000()), 500.0);
        let r = vehicle.inertial_position(j2000(), &sys).unwrap();
        assert!((r.x - 22000.0).abs() < 1e-9);
        assert_eq!(vehicle.mass(), 500.0);
        assert_eq!(vehicle.coefficient_of_drag(), 0.0);
    }
}
