use hifitime::Epoch;

use crate::{
    equations_of_motion::{
        check_set, regularize, DegeneracyPolicy, Derivative, EquationsOfMotion,
        VOP_DEGENERACY_TOL,
    },
    forces::oblateness::j2_acceleration,
    orbit_type::{
        rate::{KeplerianRate, Rate},
        ElementSet, OrbitalElements,
    },
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    vehicle::Vehicle,
};

/// Mean-element J2 propagation in Keplerian elements.
///
/// Only the out-of-plane component of the J2 acceleration drives the elements: the size and
/// shape of the orbit stay fixed (`da = de = 0`) while the node and perigee drift with the
/// plane. No force model is involved.
#[derive(Debug, Clone)]
pub struct J2MeanVop<'a> {
    system: &'a AstrodynamicsSystem,
    policy: DegeneracyPolicy,
}

impl<'a> J2MeanVop<'a> {
    pub fn new(system: &'a AstrodynamicsSystem, policy: DegeneracyPolicy) -> Self {
        J2MeanVop { system, policy }
    }
}

impl EquationsOfMotion for J2MeanVop<'_> {
    fn evaluate_at(
        &self,
        _epoch: Epoch,
        state: &OrbitalElements,
        _vehicle: &Vehicle,
    ) -> Result<Derivative, PropagationError> {
        check_set(self, state)?;
        let mu = self.system.mu();
        let keplerian = state.to_keplerian(self.system);
        let (ecc, inc, degeneracy) = regularize(&keplerian, self.policy, self.name())?;

        let cartesian = state.to_cartesian(self.system);
        let (_, _, normal_axis) = cartesian.rtn_frame();
        let normal = j2_acceleration(&cartesian.position, self.system.central_body()).dot(&normal_axis);

        let radius = cartesian.radius();
        let h = (mu * keplerian.semi_major_axis * (1.0 - ecc * ecc)).sqrt();
        let (sin_u, cos_u) = (keplerian.argument_of_perigee + keplerian.true_anomaly).sin_cos();

        let mut di = radius / h * cos_u * normal;
        // equatorial orbit with no plane change: keep it equatorial
        if degeneracy.is_some_and(|d| d.inclination) && di.abs() <= VOP_DEGENERACY_TOL {
            di = 0.0;
        }
        let draan = radius * sin_u / (h * inc.sin()) * normal;

        Ok(Derivative::with_degeneracy(
            Rate::Keplerian(KeplerianRate {
                semi_major_axis: 0.0,
                eccentricity: 0.0,
                inclination: di,
                right_ascension: draan,
                argument_of_perigee: -draan * inc.cos(),
                true_anomaly: h / (radius * radius),
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
        "J2MeanVop"
    }
}
