use hifitime::Duration;

use crate::{
    events::Event,
    orbit_type::{ElementSet, OrbitalElements},
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Instantaneous burn at every periapsis passage.
///
/// The true anomaly is not tracked as an absolute angle, a periapsis passage is recognized by
/// the anomaly wrapping around (decreasing) between two measurements. The Δv is the sum of the
/// impulses of the vehicle thrusters, applied along the velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImpulsiveBurn {
    previous_anomaly: f64,
}

impl ImpulsiveBurn {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Event for ImpulsiveBurn {
    fn measure_event(
        &mut self,
        _time: Duration,
        state: &OrbitalElements,
        _vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> f64 {
        let anomaly = state.to_keplerian(system).true_anomaly;
        let wrapped = anomaly < self.previous_anomaly;
        self.previous_anomaly = anomaly;
        if wrapped {
            0.0
        } else {
            1.0
        }
    }

    fn trigger_action(
        &self,
        vehicle: &mut Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<(), PropagationError> {
        let delta_v = vehicle.impulsive_delta_v();
        let mut state = *vehicle.state();
        let mut cartesian = state.elements.to_cartesian(system);
        let speed = cartesian.speed();
        if speed > 0.0 {
            cartesian.velocity += delta_v * cartesian.velocity / speed;
        }
        log::debug!(
            "{}: {delta_v:e} km/s burn at {}",
            self.name(),
            state.epoch
        );
        state.set_elements(cartesian.into(), true, system);
        vehicle.update_state(state);
        Ok(())
    }

    fn name(&self) -> &str {
        "ImpulsiveBurn"
    }

    fn clone_box(&self) -> Box<dyn Event> {
        Box::new(*self)
    }
}
