use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    celestial_body::CelestialBody, forces::Force,
    orbit_type::cartesian_element::CartesianElements, propagation_errors::PropagationError,
    system::AstrodynamicsSystem, vehicle::Vehicle,
};

/// Acceleration of the J2 zonal harmonic of `body` at `position` (body-centered, km).
///
/// With `A = -3/2 J2 μ Re² / R⁵` the components are
/// `A x (1 - 5z²/R²)`, `A y (1 - 5z²/R²)` and `A z (3 - 5z²/R²)`.
pub fn j2_acceleration(position: &Vector3<f64>, body: &CelestialBody) -> Vector3<f64> {
    let r_sq = position.norm_squared();
    let r = r_sq.sqrt();
    let re = body.equatorial_radius;
    let term_a = -1.5 * body.j2 * body.mu * re * re / (r_sq * r_sq * r);
    let z_ratio = position.z * position.z / r_sq;
    Vector3::new(
        term_a * (1.0 - 5.0 * z_ratio) * position.x,
        term_a * (1.0 - 5.0 * z_ratio) * position.y,
        term_a * (3.0 - 5.0 * z_ratio) * position.z,
    )
}

/// J2 perturbation of the central body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OblatenessForce;

impl Force for OblatenessForce {
    fn compute_force(
        &self,
        _epoch: Epoch,
        state: &CartesianElements,
        _vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        Ok(j2_acceleration(&state.position, system.central_body()))
    }

    fn name(&self) -> &'static str {
        "OblatenessForce"
    }
}
