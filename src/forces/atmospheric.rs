use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::M_TO_KM, forces::Force, orbit_type::cartesian_element::CartesianElements,
    propagation_errors::PropagationError, system::AstrodynamicsSystem, vehicle::Vehicle,
};

/// Aerodynamic drag and lift from the exponential atmosphere of the central body.
///
/// Drag opposes the velocity relative to an atmosphere co-rotating with the body; lift acts
/// along the radius and scales with the square of the radial velocity. The density is read at
/// the spherical altitude `R - Re`; bodies without an atmosphere produce no acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AtmosphericForce;

impl Force for AtmosphericForce {
    fn compute_force(
        &self,
        _epoch: Epoch,
        state: &CartesianElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        let center = system.central_body();
        let r = &state.position;
        let v = &state.velocity;
        let r_norm = r.norm();

        let density = center.atmospheric_density(r_norm - center.equatorial_radius);
        if density == 0.0 || vehicle.mass() == 0.0 {
            return Ok(Vector3::zeros());
        }

        let omega = center.rotation_rate;
        let v_rel = Vector3::new(v.x + omega * r.y, v.y - omega * r.x, v.z);

        // m² / kg * kg/m³ * km²/s² -> km²/(m s²), 1/M_TO_KM brings it to km/s²
        let drag_scale = -0.5 * vehicle.coefficient_of_drag() * vehicle.ram_area()
            / vehicle.mass()
            * density
            * v_rel.norm()
            / M_TO_KM;
        let drag = drag_scale * v_rel;

        let radial_velocity = r.dot(v) / r_norm;
        let lift_scale = 0.5 * vehicle.coefficient_of_lift() * vehicle.lift_area()
            / vehicle.mass()
            * density
            * radial_velocity
            * radial_velocity
            / r_norm
            / M_TO_KM;
        let lift = lift_scale * r;

        Ok(drag + lift)
    }

    fn name(&self) -> &'static str {
        "AtmosphericForce"
    }
}
