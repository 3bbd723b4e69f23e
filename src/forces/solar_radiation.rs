use hifitime::Epoch;
use nalgebra::Vector3;

use crate::{
    constants::{AU, M_TO_KM, SOLAR_PRESSURE_1AU, SUN_SHADOW_DIAMETER},
    forces::Force,
    orbit_type::cartesian_element::CartesianElements,
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Name of the body the radiation comes from.
pub const SUN: &str = "Sun";

/// Cannonball solar radiation pressure with cylindrical-cone shadowing by the central body.
///
/// The Sun must be part of the system, either as the central body or as a secondary body
/// with an ephemeris.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolarRadiationPressure;

/// Fraction of sunlight received at `position` behind a body of radius `body_radius`, given
/// the body → Sun vector: `1.0` lit, `0.5` penumbra, `0.0` umbra (Vallado, algorithm 34).
pub fn sunlight_fraction(
    position: &Vector3<f64>,
    center_to_sun: &Vector3<f64>,
    body_radius: f64,
) -> f64 {
    let r = position.norm();
    let d_sun = center_to_sun.norm();
    let angle = (center_to_sun.dot(position) / (d_sun * r))
        .clamp(-1.0, 1.0)
        .acos();
    let angle_vehicle = (body_radius / r).clamp(-1.0, 1.0).acos();
    let angle_sun = (body_radius / d_sun).clamp(-1.0, 1.0).acos();
    if angle_vehicle + angle_sun > angle {
        return 1.0;
    }

    let umbra_apex_distance = body_radius * d_sun / (SUN_SHADOW_DIAMETER - body_radius);
    let apex = -umbra_apex_distance * center_to_sun / d_sun;
    let apex_to_vehicle = position - apex;
    // angle between the shadow axis and the apex -> vehicle direction
    let alpha = ((-apex_to_vehicle.dot(&apex)) / (apex.norm() * apex_to_vehicle.norm()))
        .clamp(-1.0, 1.0)
        .acos();
    if alpha < (body_radius / umbra_apex_distance).clamp(-1.0, 1.0).asin() {
        0.0
    } else {
        0.5
    }
}

impl Force for SolarRadiationPressure {
    fn compute_force(
        &self,
        epoch: Epoch,
        state: &CartesianElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<Vector3<f64>, PropagationError> {
        if vehicle.mass() == 0.0 {
            return Ok(Vector3::zeros());
        }
        let center = system.central_body();
        let sun_is_center = center.name == SUN;
        let center_to_sun = if sun_is_center {
            Vector3::zeros()
        } else {
            system.get(SUN)?.position_at(epoch)?
        };

        let vehicle_to_sun = center_to_sun - state.position;
        let distance = vehicle_to_sun.norm();
        let pressure = SOLAR_PRESSURE_1AU * (AU / distance).powi(2);

        let fraction = if sun_is_center {
            1.0
        } else {
            sunlight_fraction(&state.position, &center_to_sun, center.equatorial_radius)
        };

        // N/m² * m² / kg = m/s²
        let scale = -pressure * vehicle.coefficient_of_reflectivity() * vehicle.solar_area()
            / vehicle.mass()
            / distance
            * fraction
            * M_TO_KM;
        Ok(scale * vehicle_to_sun)
    }

    fn name(&self) -> &'static str {
        "SolarRadiationPressure"
    }
}
