//! # Keplerian orbital elements
//!
//! This module defines the [`KeplerianElements`] struct, the **classical orbital element
//! representation** `(a, e, i, Ω, ω, ν)`.
//!
//! ## Units
//!
//! - Lengths: **km**
//! - Angles: **radians**, normalized to `[0, 2π)` (inclination in `[0, π]`)
//!
//! ## Degeneracies
//!
//! Classical Keplerian elements suffer from singularities:
//!
//! - **Circular orbits (`e → 0`)**: argument of perigee ω is undefined.
//!   → set to `0.0` during conversion, the true anomaly then measures the argument of latitude.
//! - **Equatorial orbits (`i → 0`)**: right ascension Ω is undefined.
//!   → set to `0.0` during conversion, ω (or ν when also circular) is measured from the x axis.
//!
//! [`KeplerianElements::degeneracy`] flags these cases instead of silently discarding them.
//!
//! ## See also
//!
//! - [`EquinoctialElements`] – non-singular form.
//! - [`CartesianElements`] – position/velocity form.
//! - Vallado, *Fundamentals of Astrodynamics and Applications*, algorithms 9 and 10.
use std::f64::consts::PI;
use std::fmt;

use nalgebra::Vector3;

use crate::{
    constants::{
        GEO_SEMI_MAJOR_AXIS, GPS_SEMI_MAJOR_AXIS, HMEO_SEMI_MAJOR_AXIS, LEO_SEMI_MAJOR_AXIS,
        LMEO_SEMI_MAJOR_AXIS,
    },
    orbit_type::{
        anomaly::{mean_to_true, principal_angle, true_to_mean},
        cartesian_element::CartesianElements,
        equinoctial_element::EquinoctialElements,
    },
    propagation_errors::PropagationError,
};

/// Threshold under which eccentricity and sin(i) are treated as zero by the conversions.
pub const DEGENERACY_TOL: f64 = 1.0e-10;

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `semi_major_axis`: km (negative for hyperbolic orbits).
/// * `eccentricity`: unitless.
/// * `inclination`: radians.
/// * `right_ascension`: radians (Ω).
/// * `argument_of_perigee`: radians (ω).
/// * `true_anomaly`: radians (ν).
///
/// See also
/// --------
/// * [`KeplerianElements::new`] – Constructor normalizing the angles.
/// * [`KeplerianElements::from_cartesian`] – Conversion from a state vector.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct KeplerianElements {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub right_ascension: f64,
    pub argument_of_perigee: f64,
    pub true_anomaly: f64,
}

/// Which classical angles are ill-defined for a given orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degeneracy {
    pub eccentricity: bool,
    pub inclination: bool,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.eccentricity, self.inclination) {
            (true, true) => write!(f, "eccentricity and inclination"),
            (true, false) => write!(f, "eccentricity"),
            (false, true) => write!(f, "inclination"),
            (false, false) => write!(f, "none"),
        }
    }
}

impl KeplerianElements {
    /// Build a Keplerian set, normalizing Ω, ω and ν to `[0, 2π)`.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        right_ascension: f64,
        argument_of_perigee: f64,
        true_anomaly: f64,
    ) -> Self {
        KeplerianElements {
            semi_major_axis,
            eccentricity,
            inclination,
            right_ascension: principal_angle(right_ascension),
            argument_of_perigee: principal_angle(argument_of_perigee),
            true_anomaly: principal_angle(true_anomaly),
        }
    }

    /// Same as [`KeplerianElements::new`] with the mean anomaly instead of the true anomaly.
    pub fn from_mean_anomaly(
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        right_ascension: f64,
        argument_of_perigee: f64,
        mean_anomaly: f64,
    ) -> Result<Self, PropagationError> {
        Ok(KeplerianElements::new(
            semi_major_axis,
            eccentricity,
            inclination,
            right_ascension,
            argument_of_perigee,
            mean_to_true(mean_anomaly, eccentricity)?,
        ))
    }

    fn circular_equatorial(semi_major_axis: f64) -> Self {
        KeplerianElements::new(semi_major_axis, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Circular equatorial low Earth orbit (a = 7000 km)
    pub fn leo() -> Self {
        Self::circular_equatorial(LEO_SEMI_MAJOR_AXIS)
    }

    /// Circular equatorial lower medium Earth orbit (a = 10000 km)
    pub fn lmeo() -> Self {
        Self::circular_equatorial(LMEO_SEMI_MAJOR_AXIS)
    }

    /// Circular equatorial GPS-altitude orbit (a = 22000 km)
    pub fn gps() -> Self {
        Self::circular_equatorial(GPS_SEMI_MAJOR_AXIS)
    }

    /// Circular equatorial higher medium Earth orbit (a = 30000 km)
    pub fn hmeo() -> Self {
        Self::circular_equatorial(HMEO_SEMI_MAJOR_AXIS)
    }

    /// Circular equatorial geostationary orbit (a = 42164 km)
    pub fn geo() -> Self {
        Self::circular_equatorial(GEO_SEMI_MAJOR_AXIS)
    }

    pub fn semilatus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Specific angular momentum magnitude (km²/s)
    pub fn angular_momentum(&self, mu: f64) -> f64 {
        (mu * self.semilatus_rectum()).sqrt()
    }

    /// Orbital period (s), `None` for open orbits
    pub fn period(&self, mu: f64) -> Option<f64> {
        (self.eccentricity < 1.0 && self.semi_major_axis > 0.0)
            .then(|| 2.0 * PI * (self.semi_major_axis.powi(3) / mu).sqrt())
    }

    pub fn mean_anomaly(&self) -> f64 {
        true_to_mean(self.true_anomaly, self.eccentricity)
    }

    /// Argument of latitude u = ω + ν, normalized
    pub fn argument_of_latitude(&self) -> f64 {
        principal_angle(self.argument_of_perigee + self.true_anomaly)
    }

    /// Report the angles that are ill-defined at the given tolerance.
    ///
    /// Return
    /// ------
    /// * `None` when the orbit is neither near-circular nor near-equatorial.
    pub fn degeneracy(&self, tol: f64) -> Option<Degeneracy> {
        let report = Degeneracy {
            eccentricity: self.eccentricity <= tol,
            inclination: self.inclination.sin().abs() <= tol,
        };
        (report.eccentricity || report.inclination).then_some(report)
    }

    /// Convert a Cartesian state into Keplerian elements.
    ///
    /// Degenerate cases follow the conventions of the module documentation. A zero position
    /// vector produces all-zero elements.
    ///
    /// Arguments
    /// ---------
    /// * `cartesian`: inertial position (km) and velocity (km/s).
    /// * `mu`: gravitational parameter of the central body (km³/s²).
    pub fn from_cartesian(cartesian: &CartesianElements, mu: f64) -> Self {
        let r = &cartesian.position;
        let v = &cartesian.velocity;
        let r_norm = r.norm();
        if r_norm == 0.0 {
            return KeplerianElements::default();
        }
        let v_norm = v.norm();

        // angular momentum and nodal vector n = z × h
        let h = r.cross(v);
        let h_norm = h.norm();
        let h_hat = h / h_norm;
        let node = Vector3::new(-h.y, h.x, 0.0);
        let node_norm = node.norm();

        let semi_major_axis = 1.0 / (2.0 / r_norm - v_norm * v_norm / mu);

        let ecc_vec = ((v_norm * v_norm - mu / r_norm) * r - r.dot(v) * v) / mu;
        let mut eccentricity = ecc_vec.norm();
        if eccentricity < DEGENERACY_TOL {
            eccentricity = 0.0;
        }

        let prograde = h.z >= 0.0;
        let equatorial = node_norm <= DEGENERACY_TOL * h_norm;
        let inclination = if equatorial {
            if prograde {
                0.0
            } else {
                PI
            }
        } else {
            (h.z / h_norm).clamp(-1.0, 1.0).acos()
        };

        // in-plane angle of a vector measured from the x axis for equatorial orbits
        let planar_angle = |u: &Vector3<f64>| {
            if prograde {
                u.y.atan2(u.x)
            } else {
                (-u.y).atan2(u.x)
            }
        };
        // in-plane angle from `from` to `to`, positive along the motion
        let angle_between = |from: &Vector3<f64>, to: &Vector3<f64>| {
            h_hat.dot(&from.cross(to)).atan2(from.dot(to))
        };

        let right_ascension = if equatorial {
            0.0
        } else {
            node.y.atan2(node.x)
        };

        let (argument_of_perigee, true_anomaly) = match (eccentricity == 0.0, equatorial) {
            // true longitude
            (true, true) => (0.0, planar_angle(r)),
            // argument of latitude
            (true, false) => (0.0, angle_between(&node, r)),
            // longitude of perigee
            (false, true) => (planar_angle(&ecc_vec), angle_between(&ecc_vec, r)),
            (false, false) => (angle_between(&node, &ecc_vec), angle_between(&ecc_vec, r)),
        };

        KeplerianElements::new(
            semi_major_axis,
            eccentricity,
            inclination,
            right_ascension,
            argument_of_perigee,
            true_anomaly,
        )
    }

    /// Convert to an inertial position/velocity pair through the perifocal frame.
    pub fn to_cartesian(&self, mu: f64) -> CartesianElements {
        let ecc = self.eccentricity;
        let (sin_nu, cos_nu) = self.true_anomaly.sin_cos();
        let (sin_w, cos_w) = self.argument_of_perigee.sin_cos();
        let (sin_raan, cos_raan) = self.right_ascension.sin_cos();
        let (sin_inc, cos_inc) = self.inclination.sin_cos();

        let h = self.angular_momentum(mu);
        let radius = h * h / mu / (1.0 + ecc * cos_nu);
        let speed = mu / h;

        // perifocal coordinates
        let x_peri = radius * cos_nu;
        let y_peri = radius * sin_nu;
        let vx_peri = -speed * sin_nu;
        let vy_peri = speed * (ecc + cos_nu);

        let dcm11 = cos_w * cos_raan - sin_w * cos_inc * sin_raan;
        let dcm12 = -sin_w * cos_raan - cos_w * cos_inc * sin_raan;
        let dcm21 = cos_w * sin_raan + sin_w * cos_inc * cos_raan;
        let dcm22 = -sin_w * sin_raan + cos_w * cos_inc * cos_raan;
        let dcm31 = sin_inc * sin_w;
        let dcm32 = sin_inc * cos_w;

        CartesianElements::new(
            Vector3::new(
                dcm11 * x_peri + dcm12 * y_peri,
                dcm21 * x_peri + dcm22 * y_peri,
                dcm31 * x_peri + dcm32 * y_peri,
            ),
            Vector3::new(
                dcm11 * vx_peri + dcm12 * vy_peri,
                dcm21 * vx_peri + dcm22 * vy_peri,
                dcm31 * vx_peri + dcm32 * vy_peri,
            ),
        )
    }

    /// Convert equinoctial elements to Keplerian elements.
    ///
    /// The longitude of perigee ϖ = ω + Ω is set to zero when `e` is under the degeneracy
    /// tolerance and Ω is set to zero when `tan(i/2)` is, so that ω and ν keep a meaning on
    /// circular or equatorial orbits.
    pub fn from_equinoctial(equinoctial: &EquinoctialElements) -> Self {
        let EquinoctialElements {
            semilatus_rectum,
            f,
            g,
            h,
            k,
            true_longitude,
        } = *equinoctial;

        let ecc_sq = f * f + g * g;
        let eccentricity = ecc_sq.sqrt();
        let tan_half_sq = h * h + k * k;
        let tan_half = tan_half_sq.sqrt();

        let longitude_of_perigee = if eccentricity < DEGENERACY_TOL {
            0.0
        } else {
            g.atan2(f)
        };
        let right_ascension = if tan_half < DEGENERACY_TOL {
            0.0
        } else {
            k.atan2(h)
        };

        KeplerianElements::new(
            semilatus_rectum / (1.0 - ecc_sq),
            eccentricity,
            (2.0 * tan_half).atan2(1.0 - tan_half_sq),
            right_ascension,
            longitude_of_perigee - right_ascension,
            true_longitude - longitude_of_perigee,
        )
    }

    pub fn to_equinoctial(&self) -> EquinoctialElements {
        EquinoctialElements::from_keplerian(self)
    }

    pub(crate) fn to_vector(self) -> [f64; 6] {
        [
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.right_ascension,
            self.argument_of_perigee,
            self.true_anomaly,
        ]
    }

    pub(crate) fn from_vector(v: [f64; 6]) -> Self {
        KeplerianElements::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

impl fmt::Display for KeplerianElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / PI;
        writeln!(f, "Keplerian Elements:")?;
        writeln!(f, "  a   = {:.6} km", self.semi_major_axis)?;
        writeln!(f, "  e   = {:.8}", self.eccentricity)?;
        writeln!(
            f,
            "  i   = {:.6} rad ({:.4}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   = {:.6} rad ({:.4}°)",
            self.right_ascension,
            self.right_ascension * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   = {:.6} rad ({:.4}°)",
            self.argument_of_perigee,
            self.argument_of_perigee * rad_to_deg
        )?;
        writeln!(
            f,
            "  ν   = {:.6} rad ({:.4}°)",
            self.true_anomaly,
            self.true_anomaly * rad_to_deg
        )
    }
}

#[cfg(test)]
mod keplerian_test {
    use super::*;
    use crate::constants::{EARTH_MU, RADEG};
    use approx::assert_relative_eq;

    #[test]
    fn test_vallado_rv2coe() {
        // Vallado example 2-5
        let cart = CartesianElements::new(
            Vector3::new(6524.834, 6862.875, 6448.296),
            Vector3::new(4.901327, 5.533756, -1.976341),
        );
        let kep = KeplerianElements::from_cartesian(&cart, EARTH_MU);

        assert_relative_eq!(kep.semi_major_axis, 36127.343, max_relative = 1e-5);
        assert_relative_eq!(kep.eccentricity, 0.832853, max_relative = 1e-5);
        assert_relative_eq!(kep.inclination / RADEG, 87.870, max_relative = 1e-4);
        assert_relative_eq!(kep.right_ascension / RADEG, 227.898, max_relative = 1e-4);
        assert_relative_eq!(kep.argument_of_perigee / RADEG, 53.38, max_relative = 1e-3);
        assert_relative_eq!(kep.true_anomaly / RADEG, 92.335, max_relative = 1e-4);
    }

    #[test]
    fn test_circular_equatorial_uses_true_longitude() {
        let cart = CartesianElements::new(
            Vector3::new(0.0, 7000.0, 0.0),
            Vector3::new(-(EARTH_MU / 7000.0_f64).sqrt(), 0.0, 0.0),
        );
        let kep = KeplerianElements::from_cartesian(&cart, EARTH_MU);
        assert_eq!(kep.eccentricity, 0.0);
        assert_eq!(kep.inclination, 0.0);
        assert_eq!(kep.right_ascension, 0.0);
        assert_eq!(kep.argument_of_perigee, 0.0);
        assert_relative_eq!(kep.true_anomaly, PI / 2.0, epsilon = 1e-12);
        assert_eq!(
            kep.degeneracy(DEGENERACY_TOL),
            Some(Degeneracy {
                eccentricity: true,
                inclination: true
            })
        );
    }

    #[test]
    fn test_zero_position_gives_zero_elements() {
        let kep = KeplerianElements::from_cartesian(&CartesianElements::default(), EARTH_MU);
        assert_eq!(kep, KeplerianElements::default());
    }

    #[test]
    fn test_seed_orbits_are_circular_equatorial() {
        for seed in [
            KeplerianElements::leo(),
            KeplerianElements::lmeo(),
            KeplerianElements::gps(),
            KeplerianElements::hmeo(),
            KeplerianElements::geo(),
        ] {
            assert_eq!(seed.eccentricity, 0.0);
            assert_eq!(seed.inclination, 0.0);
            assert!(seed.degeneracy(DEGENERACY_TOL).is_some());
        }
        assert_eq!(KeplerianElements::geo().semi_major_axis, 42164.0);
    }

    #[test]
    fn test_degeneracy_display() {
        let d = Degeneracy {
            eccentricity: true,
            inclination: false,
        };
        assert_eq!(d.to_string(), "eccentricity");
        let inclined = KeplerianElements::new(8000.0, 0.1, 0.5, 0.0, 0.0, 0.0);
        assert_eq!(inclined.degeneracy(DEGENERACY_TOL), None);
    }

    #[test]
    fn test_period_and_mean_anomaly() {
        let kep = KeplerianElements::from_mean_anomaly(8000.0, 0.2, 0.3, 0.1, 0.2, 1.0).unwrap();
        assert_relative_eq!(kep.mean_anomaly(), 1.0, epsilon = 1e-10);
        let period = kep.period(EARTH_MU).unwrap();
        assert_relative_eq!(period, 2.0 * PI * (8000.0_f64.powi(3) / EARTH_MU).sqrt());
        let open = KeplerianElements::new(-8000.0, 1.5, 0.3, 0.0, 0.0, 0.0);
        assert!(open.period(EARTH_MU).is_none());
    }
}
