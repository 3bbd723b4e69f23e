//! # Orbital element representations
//!
//! This module defines the **element sets** a state can be expressed in and the conversions
//! between them:
//!
//! - [`cartesian_element`](crate::orbit_type::cartesian_element) – Inertial position and
//!   velocity `(r, v)`.
//! - [`keplerian_element`](crate::orbit_type::keplerian_element) – Classical elements
//!   `(a, e, i, Ω, ω, ν)`, singular for circular or equatorial orbits.
//! - [`equinoctial_element`](crate::orbit_type::equinoctial_element) – Modified equinoctial
//!   elements `(p, f, g, h, k, L)`, non-singular except for retrograde equatorial orbits.
//!
//! [`OrbitalElements`] is the **tagged sum type** carried by states and vehicles, and
//! [`Rate`](crate::orbit_type::rate::Rate) is its derivative counterpart. Every conversion
//! takes the [`AstrodynamicsSystem`] that supplies the gravitational parameter.
//!
//! ## Typical workflow
//!
//! ```rust, no_run
//! use orbitflow::orbit_type::{ElementSet, OrbitalElements};
//! use orbitflow::orbit_type::keplerian_element::KeplerianElements;
//! use orbitflow::system::AstrodynamicsSystem;
//!
//! let system = AstrodynamicsSystem::default();
//! let leo = OrbitalElements::from(KeplerianElements::leo());
//!
//! let cartesian = leo.convert_to(ElementSet::Cartesian, &system);
//! println!("{cartesian}");
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    orbit_type::{
        anomaly::angle_diff, cartesian_element::CartesianElements,
        equinoctial_element::EquinoctialElements, keplerian_element::KeplerianElements,
        rate::Rate,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
};

/// Anomaly conversions and Kepler's equation.
pub mod anomaly;

/// Inertial position / velocity.
pub mod cartesian_element;

/// Modified equinoctial elements.
pub mod equinoctial_element;

/// Classical Keplerian elements.
pub mod keplerian_element;

/// Derivatives of the element sets.
pub mod rate;

/// Tag identifying the element set of a state or a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementSet {
    Cartesian,
    Keplerian,
    Equinoctial,
}

impl ElementSet {
    /// Indices of the components that are angles, compared and interpolated modulo 2π.
    fn angle_components(&self) -> &'static [usize] {
        match self {
            ElementSet::Cartesian => &[],
            ElementSet::Keplerian => &[3, 4, 5],
            ElementSet::Equinoctial => &[5],
        }
    }

    /// Index of the fast variable, if the set has one.
    fn fast_component(&self) -> Option<usize> {
        match self {
            ElementSet::Cartesian => None,
            ElementSet::Keplerian | ElementSet::Equinoctial => Some(5),
        }
    }
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementSet::Cartesian => "Cartesian",
            ElementSet::Keplerian => "Keplerian",
            ElementSet::Equinoctial => "Equinoctial",
        };
        write!(f, "{name}")
    }
}

/// Orbital state in one of the supported element sets.
///
/// Variants
/// --------
/// * `Cartesian`   – Position/velocity; the set of the Cowell and two-body strategies.
/// * `Keplerian`   – Classical elements; the set of the Keplerian and J2-mean VOPs.
/// * `Equinoctial` – Non-singular elements; the set of the equinoctial VOP.
///
/// See also
/// --------
/// * [`OrbitalElements::convert_to`] – Conversion to any set.
/// * [`OrbitalElements::add_rate`] – Tag-checked `state + rate * dt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitalElements {
    Cartesian(CartesianElements),
    Keplerian(KeplerianElements),
    Equinoctial(EquinoctialElements),
}

impl OrbitalElements {
    pub fn element_set(&self) -> ElementSet {
        match self {
            OrbitalElements::Cartesian(_) => ElementSet::Cartesian,
            OrbitalElements::Keplerian(_) => ElementSet::Keplerian,
            OrbitalElements::Equinoctial(_) => ElementSet::Equinoctial,
        }
    }

    /// Express the state in another element set. Converting to the current set is a copy.
    ///
    /// Arguments
    /// ---------
    /// * `set`: target element set.
    /// * `system`: gravitational context providing μ.
    pub fn convert_to(&self, set: ElementSet, system: &AstrodynamicsSystem) -> OrbitalElements {
        if self.element_set() == set {
            return *self;
        }
        match set {
            ElementSet::Cartesian => OrbitalElements::Cartesian(self.to_cartesian(system)),
            ElementSet::Keplerian => OrbitalElements::Keplerian(self.to_keplerian(system)),
            ElementSet::Equinoctial => OrbitalElements::Equinoctial(self.to_equinoctial(system)),
        }
    }

    pub fn to_cartesian(&self, system: &AstrodynamicsSystem) -> CartesianElements {
        match self {
            OrbitalElements::Cartesian(c) => *c,
            OrbitalElements::Keplerian(k) => k.to_cartesian(system.mu()),
            OrbitalElements::Equinoctial(e) => e.to_cartesian(system),
        }
    }

    pub fn to_keplerian(&self, system: &AstrodynamicsSystem) -> KeplerianElements {
        match self {
            OrbitalElements::Cartesian(c) => c.to_keplerian(system.mu()),
            OrbitalElements::Keplerian(k) => *k,
            OrbitalElements::Equinoctial(e) => e.to_keplerian(),
        }
    }

    pub fn to_equinoctial(&self, system: &AstrodynamicsSystem) -> EquinoctialElements {
        match self {
            OrbitalElements::Cartesian(c) => EquinoctialElements::from_cartesian(c, system),
            OrbitalElements::Keplerian(k) => k.to_equinoctial(),
            OrbitalElements::Equinoctial(e) => *e,
        }
    }

    pub fn as_cartesian(&self) -> Option<&CartesianElements> {
        if let OrbitalElements::Cartesian(ref c) = self {
            Some(c)
        } else {
            None
        }
    }

    pub fn as_keplerian(&self) -> Option<&KeplerianElements> {
        if let OrbitalElements::Keplerian(ref k) = self {
            Some(k)
        } else {
            None
        }
    }

    pub fn as_equinoctial(&self) -> Option<&EquinoctialElements> {
        if let OrbitalElements::Equinoctial(ref e) = self {
            Some(e)
        } else {
            None
        }
    }

    /// Component vector in the canonical order of the set.
    pub fn to_vector(&self) -> [f64; 6] {
        match self {
            OrbitalElements::Cartesian(c) => c.to_vector(),
            OrbitalElements::Keplerian(k) => k.to_vector(),
            OrbitalElements::Equinoctial(e) => e.to_vector(),
        }
    }

    /// Rebuild a state from its component vector, normalizing the angles.
    pub fn from_vector(set: ElementSet, v: [f64; 6]) -> Self {
        match set {
            ElementSet::Cartesian => OrbitalElements::Cartesian(CartesianElements::from_vector(v)),
            ElementSet::Keplerian => OrbitalElements::Keplerian(KeplerianElements::from_vector(v)),
            ElementSet::Equinoctial => {
                OrbitalElements::Equinoctial(EquinoctialElements::from_vector(v))
            }
        }
    }

    /// `self + rate * dt`.
    ///
    /// Return
    /// ------
    /// * `PropagationError::ElementSetMismatch` when the rate was not computed in the
    ///   element set of this state.
    pub fn add_rate(&self, rate: &Rate, dt: f64) -> Result<OrbitalElements, PropagationError> {
        let set = self.element_set();
        if rate.element_set() != set {
            return Err(PropagationError::ElementSetMismatch {
                strategy: "OrbitalElements::add_rate",
                expected: set,
                found: rate.element_set(),
            });
        }
        let state = self.to_vector();
        let derivative = rate.to_vector();
        Ok(OrbitalElements::from_vector(
            set,
            std::array::from_fn(|i| state[i] + derivative[i] * dt),
        ))
    }

    /// Component-wise closeness test.
    ///
    /// Each component passes when `|a - b| <= abs_tol + rel_tol * max(|a|, |b|)`. Angles are
    /// compared modulo 2π. States of different sets are never equal.
    ///
    /// Arguments
    /// ---------
    /// * `other`: state to compare with.
    /// * `ignore_fast`: skip the fast variable (ν or L). Ignored for Cartesian states.
    /// * `rel_tol`, `abs_tol`: relative and absolute tolerances.
    pub fn nearly_equal(
        &self,
        other: &OrbitalElements,
        ignore_fast: bool,
        rel_tol: f64,
        abs_tol: f64,
    ) -> bool {
        let set = self.element_set();
        if set != other.element_set() {
            return false;
        }
        let fast = if ignore_fast {
            set.fast_component()
        } else {
            None
        };
        let a = self.to_vector();
        let b = other.to_vector();
        (0..6).filter(|i| Some(*i) != fast).all(|i| {
            let diff = if set.angle_components().contains(&i) {
                angle_diff(a[i], b[i])
            } else {
                a[i] - b[i]
            };
            diff.abs() <= abs_tol + rel_tol * a[i].abs().max(b[i].abs())
        })
    }

    /// Linear interpolation `self + fraction * (other - self)` in the set of `self`.
    ///
    /// `other` is converted to the set of `self` first. Angles follow the shortest arc.
    pub fn interpolate(
        &self,
        other: &OrbitalElements,
        fraction: f64,
        system: &AstrodynamicsSystem,
    ) -> OrbitalElements {
        let set = self.element_set();
        let a = self.to_vector();
        let b = other.convert_to(set, system).to_vector();
        let angles = set.angle_components();
        OrbitalElements::from_vector(
            set,
            std::array::from_fn(|i| {
                let delta = if angles.contains(&i) {
                    angle_diff(b[i], a[i])
                } else {
                    b[i] - a[i]
                };
                a[i] + fraction * delta
            }),
        )
    }
}

impl From<CartesianElements> for OrbitalElements {
    fn from(value: CartesianElements) -> Self {
        OrbitalElements::Cartesian(value)
    }
}

impl From<KeplerianElements> for OrbitalElements {
    fn from(value: KeplerianElements) -> Self {
        OrbitalElements::Keplerian(value)
    }
}

impl From<EquinoctialElements> for OrbitalElements {
    fn from(value: EquinoctialElements) -> Self {
        OrbitalElements::Equinoctial(value)
    }
}

impl Default for OrbitalElements {
    fn default() -> Self {
        OrbitalElements::Cartesian(CartesianElements::default())
    }
}

impl fmt::Display for OrbitalElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrbitalElements::Cartesian(c) => {
                writeln!(f, "[Cartesian representation]")?;
                write!(f, "{c}")
            }
            OrbitalElements::Keplerian(k) => {
                writeln!(f, "[Keplerian representation]")?;
                write!(f, "{k}")
            }
            OrbitalElements::Equinoctial(e) => {
                writeln!(f, "[Equinoctial representation]")?;
                write!(f, "{e}")
            }
        }
    }
}
