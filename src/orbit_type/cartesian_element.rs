use std::fmt;

use nalgebra::Vector3;

use crate::{
    orbit_type::{equinoctial_element::EquinoctialElements, keplerian_element::KeplerianElements},
    system::AstrodynamicsSystem,
};

/// Inertial position (km) and velocity (km/s) relative to the central body.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct CartesianElements {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl CartesianElements {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        CartesianElements { position, velocity }
    }

    pub fn leo(system: &AstrodynamicsSystem) -> Self {
        KeplerianElements::leo().to_cartesian(system.mu())
    }

    pub fn lmeo(system: &AstrodynamicsSystem) -> Self {
        KeplerianElements::lmeo().to_cartesian(system.mu())
    }

    pub fn gps(system: &AstrodynamicsSystem) -> Self {
        KeplerianElements::gps().to_cartesian(system.mu())
    }

    pub fn hmeo(system: &AstrodynamicsSystem) -> Self {
        KeplerianElements::hmeo().to_cartesian(system.mu())
    }

    pub fn geo(system: &AstrodynamicsSystem) -> Self {
        KeplerianElements::geo().to_cartesian(system.mu())
    }

    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Specific angular momentum vector r × v (km²/s)
    pub fn angular_momentum(&self) -> Vector3<f64> {
        self.position.cross(&self.velocity)
    }

    /// Specific mechanical energy v²/2 - μ/r (km²/s²)
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.velocity.norm_squared() - mu / self.radius()
    }

    /// Unit vectors of the radial / transverse / normal frame attached to this state.
    ///
    /// Return
    /// ------
    /// * `(R̂, T̂, N̂)` with `R̂ = r/|r|`, `N̂ = h/|h|` and `T̂ = N̂ × R̂`.
    pub fn rtn_frame(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let radial = self.position.normalize();
        let normal = self.angular_momentum().normalize();
        let transverse = normal.cross(&radial);
        (radial, transverse, normal)
    }

    /// Project an inertial vector onto the RTN axes of this state.
    pub fn to_rtn(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        let (radial, transverse, normal) = self.rtn_frame();
        Vector3::new(
            vector.dot(&radial),
            vector.dot(&transverse),
            vector.dot(&normal),
        )
    }

    pub fn to_keplerian(&self, mu: f64) -> KeplerianElements {
        KeplerianElements::from_cartesian(self, mu)
    }

    /// Direct equinoctial → Cartesian conversion (Walker, Ireland & Owens).
    ///
    /// Arguments
    /// ---------
    /// * `equinoctial`: modified equinoctial elements.
    /// * `mu`: gravitational parameter (km³/s²).
    pub fn from_equinoctial(equinoctial: &EquinoctialElements, mu: f64) -> Self {
        let EquinoctialElements {
            semilatus_rectum: p,
            f,
            g,
            h,
            k,
            true_longitude,
        } = *equinoctial;

        let (sin_l, cos_l) = true_longitude.sin_cos();
        let alpha_sq = h * h - k * k;
        let s_sq = 1.0 + h * h + k * k;
        let w = 1.0 + f * cos_l + g * sin_l;
        let r = p / w;
        let hk = 2.0 * h * k;

        let position = Vector3::new(
            cos_l + alpha_sq * cos_l + hk * sin_l,
            sin_l - alpha_sq * sin_l + hk * cos_l,
            2.0 * (h * sin_l - k * cos_l),
        ) * (r / s_sq);

        let v_scale = -(mu / p).sqrt() / s_sq;
        let velocity = Vector3::new(
            sin_l + alpha_sq * sin_l - hk * cos_l + g - f * hk + alpha_sq * g,
            -cos_l + alpha_sq * cos_l + hk * sin_l - f + g * hk + alpha_sq * f,
            -2.0 * (h * cos_l + k * sin_l + f * h + g * k),
        ) * v_scale;

        CartesianElements { position, velocity }
    }

    pub(crate) fn to_vector(self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }

    pub(crate) fn from_vector(v: [f64; 6]) -> Self {
        CartesianElements {
            position: Vector3::new(v[0], v[1], v[2]),
            velocity: Vector3::new(v[3], v[4], v[5]),
        }
    }
}

impl fmt::Display for CartesianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cartesian Elements:")?;
        writeln!(f, "  x   = {:.6} km", self.position.x)?;
        writeln!(f, "  y   = {:.6} km", self.position.y)?;
        writeln!(f, "  z   = {:.6} km", self.position.z)?;
        writeln!(f, "  vx  = {:.9} km/s", self.velocity.x)?;
        writeln!(f, "  vy  = {:.9} km/s", self.velocity.y)?;
        writeln!(f, "  vz  = {:.9} km/s", self.velocity.z)
    }
}

#[cfg(test)]
mod cartesian_test {
    use super::*;
    use crate::constants::EARTH_MU;
    use approx::assert_relative_eq;

    #[test]
    fn test_leo_seed() {
        let sys = AstrodynamicsSystem::default();
        let leo = CartesianElements::leo(&sys);
        assert_relative_eq!(leo.position.x, 7000.0, max_relative = 1e-14);
        assert_eq!(leo.position.z, 0.0);
        assert_relative_eq!(
            leo.velocity.y,
            (EARTH_MU / 7000.0_f64).sqrt(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn test_rtn_projection() {
        let cart = CartesianElements::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::new(0.0, 7.5, 0.0));
        let rtn = cart.to_rtn(&Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(rtn, Vector3::new(1.0, 2.0, 3.0));

        let retro =
            CartesianElements::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::new(0.0, -7.5, 0.0));
        let rtn = retro.to_rtn(&Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(rtn, Vector3::new(1.0, -2.0, -3.0));
    }

    #[test]
    fn test_equinoctial_to_cartesian_matches_keplerian_path() {
        let kep = KeplerianElements::new(9000.0, 0.15, 0.7, 1.1, 2.3, 0.4);
        let direct = CartesianElements::from_equinoctial(&kep.to_equinoctial(), EARTH_MU);
        let through_kep = kep.to_cartesian(EARTH_MU);
        assert_relative_eq!(direct.position, through_kep.position, max_relative = 1e-10);
        assert_relative_eq!(direct.velocity, through_kep.velocity, max_relative = 1e-10);
    }

    #[test]
    fn test_specific_energy() {
        let sys = AstrodynamicsSystem::default();
        let gps = CartesianElements::gps(&sys);
        assert_relative_eq!(
            gps.specific_energy(EARTH_MU),
            -EARTH_MU / (2.0 * 22000.0),
            max_relative = 1e-12
        );
    }
}
