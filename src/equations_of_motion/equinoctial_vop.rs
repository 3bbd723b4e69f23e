use hifitime::Epoch;

use crate::{
    equations_of_motion::{check_set, Derivative, EquationsOfMotion, VOP_DEGENERACY_TOL},
    forces::ForceModel,
    orbit_type::{
        rate::{EquinoctialRate, Rate},
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Gauss variational equations in modified equinoctial elements.
///
/// The set is regular for circular and equatorial orbits, so near-degenerate orbits are only
/// reported through [`Derivative::degeneracy`]; the rate itself is never altered.
#[derive(Debug, Clone)]
pub struct EquinoctialVop<'a> {
    system: &'a AstrodynamicsSystem,
    forces: &'a ForceModel,
}

impl<'a> EquinoctialVop<'a> {
    pub fn new(system: &'a AstrodynamicsSystem, forces: &'a ForceModel) -> Self {
        EquinoctialVop { system, forces }
    }

    pub fn forces(&self) -> &ForceModel {
        self.forces
    }
}

impl EquationsOfMotion for EquinoctialVop<'_> {
    fn evaluate_at(
        &self,
        epoch: Epoch,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        check_set(self, state)?;
        let mu = self.system.mu();
        let degeneracy = state
            .to_keplerian(self.system)
            .degeneracy(VOP_DEGENERACY_TOL);

        let cartesian = state.to_cartesian(self.system);
        let accel = self
            .forces
            .compute_forces(epoch, &cartesian, vehicle, self.system)?;
        let rtn = cartesian.to_rtn(&accel);
        let (radial, transverse, normal) = (rtn.x, rtn.y, rtn.z);

        let eq = state.to_equinoctial(self.system);
        let p = eq.semilatus_rectum;
        let (sin_l, cos_l) = eq.true_longitude.sin_cos();

        let sqrt_p_mu = (p / mu).sqrt();
        let w = 1.0 + eq.f * cos_l + eq.g * sin_l;
        let s2 = 1.0 + eq.h * eq.h + eq.k * eq.k;
        let c = (eq.h * sin_l - eq.k * cos_l) / w;
        let d = sqrt_p_mu * s2 / (2.0 * w);

        Ok(Derivative::with_degeneracy(
            Rate::Equinoctial(EquinoctialRate {
                semilatus_rectum: 2.0 * p / w * sqrt_p_mu * transverse,
                f: sqrt_p_mu
                    * (radial * sin_l + ((w + 1.0) * cos_l + eq.f) / w * transverse
                        - eq.g * c * normal),
                g: sqrt_p_mu
                    * (-radial * cos_l + ((w + 1.0) * sin_l + eq.g) / w * transverse
                        + eq.f * c * normal),
                h: d * cos_l * normal,
                k: d * sin_l * normal,
                true_longitude: (mu * p).sqrt() * (w / p).powi(2) + sqrt_p_mu * c * normal,
            }),
            degeneracy,
        ))
    }

    fn expected_set(&self) -> ElementSet {
        ElementSet::Equinoctial
    }

    fn system(&self) -> &AstrodynamicsSystem {
        self.system
    }

    fn name(&self) -> &'static str {
        "EquinoctialVop"
    }
}

#[cfg(test)]
mod equinoctial_vop_test {
    use super::*;
    use crate::equations_of_motion::{keplerian_vop::KeplerianVop, DegeneracyPolicy};
    use crate::forces::oblateness::OblatenessForce;
    use crate::orbit_type::{
        equinoctial_element::EquinoctialElements, keplerian_element::KeplerianElements,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_unperturbed_leo() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(EquinoctialElements::leo());
        let derivative = EquinoctialVop::new(&sys, &forces)
            .evaluate(&state, &Vehicle::default())
            .unwrap();
        let rate = derivative.rate.to_vector();
        assert_eq!(&rate[..5], &[0.0; 5]);
        assert_relative_eq!(rate[5], 0.0010780076129942077, max_relative = 1e-9);
        // reported, not acted upon
        assert!(derivative.degeneracy.is_some());
    }

    #[test]
    fn test_consistent_with_keplerian_vop() {
        let sys = AstrodynamicsSystem::default();
        let mut forces = ForceModel::default();
        forces.add(OblatenessForce);
        let kep = KeplerianElements::new(7500.0, 0.05, 0.8, 0.4, 1.1, 2.3);
        let vehicle = Vehicle::default();

        let kep_rate = KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Raise)
            .evaluate(&OrbitalElements::from(kep), &vehicle)
            .unwrap()
            .rate
            .to_vector();
        let eq_derivative = EquinoctialVop::new(&sys, &forces)
            .evaluate(&OrbitalElements::from(kep.to_equinoctial()), &vehicle)
            .unwrap();
        assert_eq!(eq_derivative.degeneracy, None);
        let eq_rate = eq_derivative.rate.to_vector();

        // p = a (1 - e²)
        let (a, e) = (kep.semi_major_axis, kep.eccentricity);
        let dp = kep_rate[0] * (1.0 - e * e) - 2.0 * a * e * kep_rate[1];
        assert_relative_eq!(eq_rate[0], dp, max_relative = 1e-7);
        // L = Ω + ω + ν
        assert_relative_eq!(
            eq_rate[5],
            kep_rate[3] + kep_rate[4] + kep_rate[5],
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_rejects_keplerian() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(KeplerianElements::leo());
        let err = EquinoctialVop::new(&sys, &forces)
            .evaluate(&state, &Vehicle::default())
            .unwrap_err();
        assert_eq!(
            err,
            PropagationError::ElementSetMismatch {
                strategy: "EquinoctialVop",
                expected: ElementSet::Equinoctial,
                found: ElementSet::Keplerian,
            }
        );
    }
}
