use crate::constants::M_TO_KM;

/// Thruster firing for a fixed duration, modelled as an instantaneous velocity change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thruster {
    /// Thrust (N)
    pub thrust: f64,
    /// Burn duration (s)
    pub burn_duration: f64,
}

impl Thruster {
    pub fn new(thrust: f64, burn_duration: f64) -> Self {
        Thruster {
            thrust,
            burn_duration,
        }
    }

    /// Impulse (N.s)
    pub fn impulse(&self) -> f64 {
        self.thrust * self.burn_duration
    }

    /// Δv (km/s) delivered to a vehicle of the given mass (kg).
    pub fn impulsive_delta_v(&self, mass: f64) -> f64 {
        self.impulse() / mass * M_TO_KM
    }
}
