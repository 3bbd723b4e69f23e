//! # Equations of motion
//!
//! Strategies turning an orbital state into its time derivative. Each strategy integrates a
//! fixed element set, advertised by [`EquationsOfMotion::expected_set`]; the
//! [`Integrator`](crate::integrator::Integrator) converts the vehicle state into that set
//! before the first step.
//!
//! | Strategy                                   | Set          | Perturbations              |
//! |--------------------------------------------|--------------|----------------------------|
//! | [`two_body::TwoBody`]                      | Cartesian    | none                       |
//! | [`cowell::Cowell`]                         | Cartesian    | [`ForceModel`](crate::forces::ForceModel) |
//! | [`keplerian_vop::KeplerianVop`]            | Keplerian    | [`ForceModel`](crate::forces::ForceModel) |
//! | [`equinoctial_vop::EquinoctialVop`]        | Equinoctial  | [`ForceModel`](crate::forces::ForceModel) |
//! | [`j2_mean_vop::J2MeanVop`]                 | Keplerian    | J2 of the central body     |
//!
//! Strategies whose element set is singular for circular or equatorial orbits report it in
//! [`Derivative::degeneracy`] instead of mutating themselves during an evaluation.
use std::f64::consts::{FRAC_PI_2, PI};

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    orbit_type::{
        keplerian_element::{Degeneracy, KeplerianElements},
        rate::Rate,
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

pub mod cowell;
pub mod equinoctial_vop;
pub mod j2_mean_vop;
pub mod keplerian_vop;
pub mod two_body;

/// Eccentricity / sin(i) floor used by the VOP strategies.
pub const VOP_DEGENERACY_TOL: f64 = 1.0e-10;

/// Rate of a state plus the degeneracy diagnostic of the evaluation, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derivative {
    pub rate: Rate,
    pub degeneracy: Option<Degeneracy>,
}

impl Derivative {
    pub fn new(rate: Rate) -> Self {
        Derivative {
            rate,
            degeneracy: None,
        }
    }

    pub fn with_degeneracy(rate: Rate, degeneracy: Option<Degeneracy>) -> Self {
        Derivative { rate, degeneracy }
    }
}

/// What the VOP strategies do when e or i fall under [`VOP_DEGENERACY_TOL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DegeneracyPolicy {
    /// Regularize the elements to the tolerance and report the degeneracy.
    #[default]
    Warn,
    /// Fail with [`PropagationError::DegenerateOrbit`].
    Raise,
}

pub trait EquationsOfMotion: Send + Sync {
    /// Time derivative of `state` at `epoch`.
    ///
    /// Return
    /// ------
    /// * `PropagationError::ElementSetMismatch` if `state` is not in [`Self::expected_set`].
    fn evaluate_at(
        &self,
        epoch: Epoch,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError>;

    /// [`Self::evaluate_at`] at the epoch of the vehicle state.
    fn evaluate(
        &self,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        self.evaluate_at(vehicle.state().epoch, state, vehicle)
    }

    fn expected_set(&self) -> ElementSet;

    fn system(&self) -> &AstrodynamicsSystem;

    fn name(&self) -> &'static str;
}

/// Return `ElementSetMismatch` unless `state` is in the set of `eom`.
pub(crate) fn check_set<E: EquationsOfMotion + ?Sized>(
    eom: &E,
    state: &OrbitalElements,
) -> Result<(), PropagationError> {
    let expected = eom.expected_set();
    let found = state.element_set();
    if expected != found {
        return Err(PropagationError::ElementSetMismatch {
            strategy: eom.name(),
            expected,
            found,
        });
    }
    Ok(())
}

/// Eccentricity and inclination of `elements` floored away from the VOP singularities.
///
/// Return
/// ------
/// * `(e, i, degeneracy)`; `e` at least the tolerance, `sin(i)` at least the tolerance with
///   `i` kept on its side of π/2.
/// * `PropagationError::DegenerateOrbit` under [`DegeneracyPolicy::Raise`].
pub(crate) fn regularize(
    elements: &KeplerianElements,
    policy: DegeneracyPolicy,
    strategy: &'static str,
) -> Result<(f64, f64, Option<Degeneracy>), PropagationError> {
    let degeneracy = elements.degeneracy(VOP_DEGENERACY_TOL);
    if degeneracy.is_some() && policy == DegeneracyPolicy::Raise {
        return Err(PropagationError::DegenerateOrbit {
            strategy,
            eccentricity: elements.eccentricity,
            inclination: elements.inclination,
        });
    }
    let ecc = elements.eccentricity.max(VOP_DEGENERACY_TOL);
    let inc = if elements.inclination.sin().abs() < VOP_DEGENERACY_TOL {
        if elements.inclination < FRAC_PI_2 {
            VOP_DEGENERACY_TOL
        } else {
            PI - VOP_DEGENERACY_TOL
        }
    } else {
        elements.inclination
    };
    Ok((ecc, inc, degeneracy))
}
