//! Time derivatives of the element sets.
//!
//! A [`Rate`] always carries the tag of the state it was differentiated from, and the only
//! arithmetic it supports with a state is [`OrbitalElements::add_rate`](super::OrbitalElements::add_rate),
//! which checks the tags.
use std::fmt;

use nalgebra::Vector3;

use crate::{orbit_type::ElementSet, propagation_errors::PropagationError};

/// Derivative of a Cartesian state: velocity (km/s) and acceleration (km/s²).
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct CartesianRate {
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

/// Derivative of the Keplerian elements, per second.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct KeplerianRate {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub right_ascension: f64,
    pub argument_of_perigee: f64,
    pub true_anomaly: f64,
}

/// Derivative of the modified equinoctial elements, per second.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct EquinoctialRate {
    pub semilatus_rectum: f64,
    pub f: f64,
    pub g: f64,
    pub h: f64,
    pub k: f64,
    pub true_longitude: f64,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Rate {
    Cartesian(CartesianRate),
    Keplerian(KeplerianRate),
    Equinoctial(EquinoctialRate),
}

impl Rate {
    pub fn element_set(&self) -> ElementSet {
        match self {
            Rate::Cartesian(_) => ElementSet::Cartesian,
            Rate::Keplerian(_) => ElementSet::Keplerian,
            Rate::Equinoctial(_) => ElementSet::Equinoctial,
        }
    }

    /// Zero derivative of the given set.
    pub fn zero(set: ElementSet) -> Self {
        Rate::from_vector(set, [0.0; 6])
    }

    /// Component vector, in the same order as the matching element set.
    pub fn to_vector(&self) -> [f64; 6] {
        match self {
            Rate::Cartesian(r) => [
                r.velocity.x,
                r.velocity.y,
                r.velocity.z,
                r.acceleration.x,
                r.acceleration.y,
                r.acceleration.z,
            ],
            Rate::Keplerian(r) => [
                r.semi_major_axis,
                r.eccentricity,
                r.inclination,
                r.right_ascension,
                r.argument_of_perigee,
                r.true_anomaly,
            ],
            Rate::Equinoctial(r) => [
                r.semilatus_rectum,
                r.f,
                r.g,
                r.h,
                r.k,
                r.true_longitude,
            ],
        }
    }

    pub fn from_vector(set: ElementSet, v: [f64; 6]) -> Self {
        match set {
            ElementSet::Cartesian => Rate::Cartesian(CartesianRate {
                velocity: Vector3::new(v[0], v[1], v[2]),
                acceleration: Vector3::new(v[3], v[4], v[5]),
            }),
            ElementSet::Keplerian => Rate::Keplerian(KeplerianRate {
                semi_major_axis: v[0],
                eccentricity: v[1],
                inclination: v[2],
                right_ascension: v[3],
                argument_of_perigee: v[4],
                true_anomaly: v[5],
            }),
            ElementSet::Equinoctial => Rate::Equinoctial(EquinoctialRate {
                semilatus_rectum: v[0],
                f: v[1],
                g: v[2],
                h: v[3],
                k: v[4],
                true_longitude: v[5],
            }),
        }
    }

    /// `self * dt`, same tag.
    pub fn scaled(&self, dt: f64) -> Self {
        Rate::from_vector(self.element_set(), self.to_vector().map(|x| x * dt))
    }

    /// Component-wise sum of two rates of the same set.
    pub fn checked_add(&self, other: &Rate) -> Result<Rate, PropagationError> {
        if self.element_set() != other.element_set() {
            return Err(PropagationError::ElementSetMismatch {
                strategy: "Rate",
                expected: self.element_set(),
                found: other.element_set(),
            });
        }
        let a = self.to_vector();
        let b = other.to_vector();
        Ok(Rate::from_vector(
            self.element_set(),
            std::array::from_fn(|i| a[i] + b[i]),
        ))
    }

    /// Weighted sum `Σ wᵢ rᵢ` of rates sharing one set. Zero weights are skipped.
    ///
    /// Return
    /// ------
    /// * `ElementSetMismatch` if the slice mixes sets.
    pub fn linear_combination(
        set: ElementSet,
        weights: &[f64],
        rates: &[Rate],
    ) -> Result<Rate, PropagationError> {
        let mut acc = [0.0; 6];
        for (w, rate) in weights.iter().zip(rates) {
            if *w == 0.0 {
                continue;
            }
            if rate.element_set() != set {
                return Err(PropagationError::ElementSetMismatch {
                    strategy: "Rate",
                    expected: set,
                    found: rate.element_set(),
                });
            }
            for (a, r) in acc.iter_mut().zip(rate.to_vector()) {
                *a += w * r;
            }
        }
        Ok(Rate::from_vector(set, acc))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.to_vector();
        write!(
            f,
            "{} rate [{:e}, {:e}, {:e}, {:e}, {:e}, {:e}]",
            self.element_set(),
            v[0],
            v[1],
            v[2],
            v[3],
            v[4],
            v[5]
        )
    }
}

#[cfg(test)]
mod rate_test {
    use super::*;

    #[test]
    fn test_checked_add_mismatch() {
        let a = Rate::zero(ElementSet::Cartesian);
        let b = Rate::zero(ElementSet::Keplerian);
        assert_eq!(
            a.checked_add(&b).unwrap_err(),
            PropagationError::ElementSetMismatch {
                strategy: "Rate",
                expected: ElementSet::Cartesian,
                found: ElementSet::Keplerian,
            }
        );
    }

    #[test]
    fn test_scaled_and_add() {
        let a = Rate::from_vector(ElementSet::Equinoctial, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let sum = a.checked_add(&a.scaled(2.0)).unwrap();
        assert_eq!(sum.to_vector(), [3.0, 6.0, 9.0, 12.0, 15.0, 18.0]);
        assert_eq!(sum.element_set(), ElementSet::Equinoctial);
    }

    #[test]
    fn test_linear_combination_skips_zero_weights() {
        let a = Rate::from_vector(ElementSet::Keplerian, [1.0; 6]);
        let other = Rate::zero(ElementSet::Cartesian);
        let combo =
            Rate::linear_combination(ElementSet::Keplerian, &[0.5, 0.0], &[a, other]).unwrap();
        assert_eq!(combo.to_vector(), [0.5; 6]);
        assert!(
            Rate::linear_combination(ElementSet::Keplerian, &[0.5, 1.0], &[a, other]).is_err()
        );
    }
}
