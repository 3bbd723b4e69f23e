use hifitime::Epoch;

use crate::{
    equations_of_motion::{
        check_set, regularize, DegeneracyPolicy, Derivative, EquationsOfMotion,
    },
    forces::ForceModel,
    orbit_type::{
        rate::{KeplerianRate, Rate},
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Gauss variational equations in classical Keplerian elements.
///
/// The perturbing acceleration of the [`ForceModel`] is projected on the radial / transverse /
/// normal frame of the current state. Circular and equatorial orbits are singular in this set:
/// with [`DegeneracyPolicy::Warn`] the eccentricity and inclination entering the equations
/// are floored at [`VOP_DEGENERACY_TOL`](crate::equations_of_motion::VOP_DEGENERACY_TOL) and
/// the degeneracy is reported in the returned [`Derivative`].
#[derive(Debug, Clone)]
pub struct KeplerianVop<'a> {
    system: &'a AstrodynamicsSystem,
    forces: &'a ForceModel,
    policy: DegeneracyPolicy,
}

impl<'a> KeplerianVop<'a> {
    pub fn new(
        system: &'a AstrodynamicsSystem,
        forces: &'a ForceModel,
        policy: DegeneracyPolicy,
    ) -> Self {
        KeplerianVop {
            system,
            forces,
            policy,
        }
    }

    pub fn forces(&self) -> &ForceModel {
        self.forces
    }

    pub fn policy(&self) -> DegeneracyPolicy {
        self.policy
    }
}

impl EquationsOfMotion for KeplerianVop<'_> {
    fn evaluate_at(
        &self,
        epoch: Epoch,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        check_set(self, state)?;
        let mu = self.system.mu();
        let keplerian = state.to_keplerian(self.system);
        let (ecc, inc, degeneracy) = regularize(&keplerian, self.policy, self.name())?;

        let cartesian = state.to_cartesian(self.system);
        let accel = self
            .forces
            .compute_forces(epoch, &cartesian, vehicle, self.system)?;
        let rtn = cartesian.to_rtn(&accel);
        let (radial, transverse, normal) = (rtn.x, rtn.y, rtn.z);

        let sma = keplerian.semi_major_axis;
        let radius = cartesian.radius();
        let h = (mu * sma * (1.0 - ecc * ecc)).sqrt();
        let p = h * h / mu;
        let (sin_ta, cos_ta) = keplerian.true_anomaly.sin_cos();
        let (sin_u, cos_u) = (keplerian.argument_of_perigee + keplerian.true_anomaly).sin_cos();
        let orbital_rate = h / (radius * radius);

        let dh = radius * transverse;
        let de = h / mu * sin_ta * radial
            + ((h * h + mu * radius) * cos_ta + mu * ecc * radius) * transverse / (mu * h);
        let da = 2.0 / (mu * (1.0 - ecc * ecc)) * (h * dh + sma * mu * ecc * de);
        let di = radius / h * cos_u * normal;
        let dta = orbital_rate
            + (p * cos_ta * radial - (p + radius) * sin_ta * transverse) / (ecc * h);
        let draan = radius * sin_u / (h * inc.sin()) * normal;
        let daop = -dta + (orbital_rate - draan * inc.cos());

        Ok(Derivative::with_degeneracy(
            Rate::Keplerian(KeplerianRate {
                semi_major_axis: da,
                eccentricity: de,
                inclination: di,
                right_ascension: draan,
                argument_of_perigee: daop,
                true_anomaly: dta,
            }),
            degeneracy,
        ))
    }

    fn expected_set(&self) -> ElementSet {
        ElementSet::Keplerian
    }

    fn system(&self) -> &AstrodynamicsSystem {
        self.system
    }

    fn name(&self) -> &'static str {
        "KeplerianVop"
    }
}

#[cfg(test)]
mod keplerian_vop_test {
    use super::*;
    use crate::forces::Force;
    use crate::orbit_type::{cartesian_element::CartesianElements, keplerian_element::KeplerianElements};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    /// Constant acceleration along the local transverse direction.
    #[derive(Debug)]
    struct TransverseThrust(f64);

    impl Force for TransverseThrust {
        fn compute_force(
            &self,
            _epoch: Epoch,
            state: &CartesianElements,
            _vehicle: &Vehicle,
            _system: &AstrodynamicsSystem,
        ) -> Result<Vector3<f64>, PropagationError> {
            Ok(self.0 * state.rtn_frame().1)
        }

        fn name(&self) -> &'static str {
            "TransverseThrust"
        }
    }

    #[test]
    fn test_unperturbed_leo() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(KeplerianElements::leo());
        let derivative = KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Warn)
            .evaluate(&state, &Vehicle::default())
            .unwrap();
        let rate = derivative.rate.to_vector();
        assert_eq!(&rate[..5], &[0.0; 5]);
        assert_relative_eq!(rate[5], 0.0010780076129942077, max_relative = 1e-9);
        assert!(derivative.degeneracy.is_some());
    }

    #[test]
    fn test_raise_policy() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(KeplerianElements::leo());
        let err = KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Raise)
            .evaluate(&state, &Vehicle::default())
            .unwrap_err();
        assert!(matches!(
            err,
            PropagationError::DegenerateOrbit {
                strategy: "KeplerianVop",
                ..
            }
        ));
    }

    #[test]
    fn test_transverse_thrust_matches_gauss_form() {
        let sys = AstrodynamicsSystem::default();
        let mut forces = ForceModel::default();
        let thrust = 1e-7;
        forces.add(TransverseThrust(thrust));
        let elements = KeplerianElements::new(8000.0, 0.1, 0.5, 1.0, 0.7, 2.0);
        let state = OrbitalElements::from(elements);
        let derivative = KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Raise)
            .evaluate(&state, &Vehicle::default())
            .unwrap();
        assert_eq!(derivative.degeneracy, None);
        let rate = derivative.rate.to_vector();

        let mu = sys.mu();
        let h = elements.angular_momentum(mu);
        let p = elements.semilatus_rectum();
        let r = p / (1.0 + elements.eccentricity * elements.true_anomaly.cos());
        let ta = elements.true_anomaly;
        assert_relative_eq!(
            rate[0],
            2.0 * elements.semi_major_axis.powi(2) / h * p / r * thrust,
            max_relative = 1e-8
        );
        assert_relative_eq!(
            rate[1],
            ((p + r) * ta.cos() + r * elements.eccentricity) * thrust / h,
            max_relative = 1e-8
        );
        // in-plane thrust leaves the orbital plane alone
        assert_relative_eq!(rate[2], 0.0, epsilon = 1e-20);
        assert_relative_eq!(rate[3], 0.0, epsilon = 1e-20);
    }

    #[test]
    fn test_rejects_cartesian() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let state = OrbitalElements::from(CartesianElements::leo(&sys));
        assert!(matches!(
            KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Warn)
                .evaluate(&state, &Vehicle::default()),
            Err(PropagationError::ElementSetMismatch { .. })
        ));
    }
}
