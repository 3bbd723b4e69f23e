//! # Modified equinoctial elements
//!
//! Non-singular element set `(p, f, g, h, k, L)` well defined for circular and equatorial
//! orbits, which makes it the natural state vector of the equinoctial VOP.
//!
//! | Symbol | Definition            |
//! |--------|-----------------------|
//! | p      | a (1 - e²)            |
//! | f      | e cos(ω + Ω)          |
//! | g      | e sin(ω + Ω)          |
//! | h      | tan(i/2) cos Ω        |
//! | k      | tan(i/2) sin Ω        |
//! | L      | Ω + ω + ν             |
//!
//! Retrograde equatorial orbits (i = π) are the only singularity of the set.
use std::fmt;

use crate::{
    orbit_type::{
        anomaly::principal_angle, cartesian_element::CartesianElements,
        keplerian_element::KeplerianElements,
    },
    system::AstrodynamicsSystem,
};

/// Modified equinoctial elements. `semilatus_rectum` in km, `true_longitude` in radians.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct EquinoctialElements {
    pub semilatus_rectum: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub k: f64,
    pub true_longitude: f64,
}

impl EquinoctialElements {
    pub fn new(semilatus_rectum: f64, f: f64, g: f64, h: f64, k: f64, true_longitude: f64) -> Self {
        EquinoctialElements {
            semilatus_rectum,
            f,
            g,
            h,
            k,
            true_longitude: principal_angle(true_longitude),
        }
    }

    pub fn leo() -> Self {
        KeplerianElements::leo().to_equinoctial()
    }

    pub fn lmeo() -> Self {
        KeplerianElements::lmeo().to_equinoctial()
    }

    pub fn gps() -> Self {
        KeplerianElements::gps().to_equinoctial()
    }

    pub fn hmeo() -> Self {
        KeplerianElements::hmeo().to_equinoctial()
    }

    pub fn geo() -> Self {
        KeplerianElements::geo().to_equinoctial()
    }

    pub fn eccentricity(&self) -> f64 {
        self.f.hypot(self.g)
    }

    /// Inclination (rad), recovered from `tan(i/2) = √(h² + k²)`
    pub fn inclination(&self) -> f64 {
        2.0 * self.h.hypot(self.k).atan()
    }

    pub fn from_keplerian(keplerian: &KeplerianElements) -> Self {
        let ecc = keplerian.eccentricity;
        let longitude_of_perigee = keplerian.argument_of_perigee + keplerian.right_ascension;
        let tan_half_inc = (0.5 * keplerian.inclination).tan();
        let (sin_raan, cos_raan) = keplerian.right_ascension.sin_cos();

        EquinoctialElements::new(
            keplerian.semilatus_rectum(),
            ecc * longitude_of_perigee.cos(),
            ecc * longitude_of_perigee.sin(),
            tan_half_inc * cos_raan,
            tan_half_inc * sin_raan,
            longitude_of_perigee + keplerian.true_anomaly,
        )
    }

    pub fn to_keplerian(&self) -> KeplerianElements {
        KeplerianElements::from_equinoctial(self)
    }

    pub fn from_cartesian(cartesian: &CartesianElements, system: &AstrodynamicsSystem) -> Self {
        EquinoctialElements::from_keplerian(&cartesian.to_keplerian(system.mu()))
    }

    pub fn to_cartesian(&self, system: &AstrodynamicsSystem) -> CartesianElements {
        CartesianElements::from_equinoctial(self, system.mu())
    }

    pub(crate) fn to_vector(self) -> [f64; 6] {
        [
            self.semilatus_rectum,
            self.f,
            self.g,
            self.h,
            self.k,
            self.true_longitude,
        ]
    }

    pub(crate) fn from_vector(v: [f64; 6]) -> Self {
        EquinoctialElements::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }
}

impl fmt::Display for EquinoctialElements {
    fn fmt(&self, fm: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(fm, "Equinoctial Elements:")?;
        writeln!(fm, "  p   = {:.6} km", self.semilatus_rectum)?;
        writeln!(fm, "  f   = {:.8}", self.f)?;
        writeln!(fm, "  g   = {:.8}", self.g)?;
        writeln!(fm, "  h   = {:.8}", self.h)?;
        writeln!(fm, "  k   = {:.8}", self.k)?;
        writeln!(
            fm,
            "  L   = {:.6} rad ({:.4}°)",
            self.true_longitude,
            self.true_longitude.to_degrees()
        )
    }
}
