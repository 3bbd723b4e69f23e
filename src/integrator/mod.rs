//! # Numerical integration
//!
//! Explicit embedded Runge-Kutta propagation of a [`Vehicle`] under a set of
//! [`EquationsOfMotion`], with zero-crossing event detection between steps.
//!
//! The state is integrated in the element set of the equations of motion: the vehicle state is
//! converted once before the first step, and every sample of the returned [`StateHistory`] is
//! expressed in that set.
//!
//! ## Adaptive step control
//!
//! For a trial step `h` the local error of the embedded pair is scaled component-wise,
//!
//! ```text
//! err = max_i |δ_i| / (abs_tol + |y_new_i| rel_tol)
//! ```
//!
//! A step with `err <= 1` is accepted. The next step grows by `5` after a first step with a
//! negligible error, otherwise by `(0.8/err)^(1/5)` on the first step and by
//! `|h/h_prev| (0.8/err)^(2/25) (err/err_prev)^(3/50)` afterwards, never more than
//! `max_growth_ratio` and always within `[min_time_step, max_time_step]`. A rejected step is
//! shrunk by `(0.8/err)^(1/5)`, at most by a factor 5.
//!
//! ## Example
//!
//! ```rust
//! use orbitflow::equations_of_motion::two_body::TwoBody;
//! use orbitflow::integrator::Integrator;
//! use orbitflow::orbit_type::keplerian_element::KeplerianElements;
//! use orbitflow::state::State;
//! use orbitflow::system::AstrodynamicsSystem;
//! use orbitflow::time::{j2000, seconds};
//! use orbitflow::vehicle::{spacecraft::Spacecraft, Vehicle};
//!
//! let sys = AstrodynamicsSystem::default();
//! let eom = TwoBody::new(&sys);
//! let mut vehicle = Vehicle::new(Spacecraft::new(State::new(KeplerianElements::leo(), j2000())));
//!
//! let mut integrator = Integrator::default();
//! let history = integrator
//!     .propagate_for(seconds(600.0), &eom, &mut vehicle, true)
//!     .unwrap();
//! assert_eq!(history.last().unwrap().epoch, j2000() + seconds(600.0));
//! ```
use std::fmt;

use hifitime::{Duration, Epoch};
use serde::{Deserialize, Serialize};

use crate::{
    equations_of_motion::EquationsOfMotion,
    events::{detector::EventDetector, EventHandle},
    integrator::{butcher_tableau::ButcherTableau, params::IntegratorParams},
    orbit_type::{rate::Rate, OrbitalElements},
    propagation_errors::PropagationError,
    state::State,
    state_history::StateHistory,
    system::AstrodynamicsSystem,
    time::{offset_seconds, seconds, seconds_between, Interval},
    vehicle::Vehicle,
};

pub mod butcher_tableau;
pub mod params;

/// Safety factor of the step size predictions
const SAFETY: f64 = 0.8;
/// Below this error the first step grows by [`FIRST_STEP_GROWTH`]
const MIN_ERROR_TO_CATCH: f64 = 2.0e-4;
const FIRST_STEP_GROWTH: f64 = 5.0;
/// Largest shrink of a rejected step
const MIN_REL_STEP_SIZE: f64 = 0.2;
/// A component moving by more than this in one step forces a rejection
const MAX_COMPONENT_JUMP: f64 = 1.0e6;

/// Runge-Kutta pair used by the [`Integrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StepMethod {
    /// Runge-Kutta-Fehlberg 4(5)
    Rkf45,
    /// Dormand-Prince 5(4), first same as last
    #[default]
    Dop45,
    /// Runge-Kutta-Fehlberg 7(8)
    Rkf78,
}

impl StepMethod {
    pub fn tableau(&self) -> &'static ButcherTableau {
        match self {
            StepMethod::Rkf45 => &butcher_tableau::RKF45,
            StepMethod::Dop45 => &butcher_tableau::DOP45,
            StepMethod::Rkf78 => &butcher_tableau::RKF78,
        }
    }
}

impl fmt::Display for StepMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepMethod::Rkf45 => "RKF45",
            StepMethod::Dop45 => "DOP45",
            StepMethod::Rkf78 => "RKF78",
        };
        write!(f, "{name}")
    }
}

/// How the last propagation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStatus {
    /// The end of the interval was reached, or the iteration ceiling was hit.
    Completed,
    /// A terminal event stopped the integration.
    Terminated,
}

/// Summary of the last call to [`Integrator::propagate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationReport {
    pub status: PropagationStatus,
    /// Accepted steps
    pub steps: u64,
    /// Derivative evaluations
    pub function_evaluations: u64,
    /// Derivative evaluations that reported a degenerate orbit
    pub degeneracies: u64,
}

impl fmt::Display for PropagationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} after {} steps ({} function evaluations, {} degenerate)",
            self.status, self.steps, self.function_evaluations, self.degeneracies
        )
    }
}

/// Memory of the adaptive step control within one propagation.
#[derive(Debug, Default)]
struct StepControl {
    accepted: u64,
    previous_step: f64,
    previous_error: f64,
    /// Derivative at the current `(time, state)`, when already known
    first_stage: Option<Rate>,
}

struct StepOutcome {
    state: OrbitalElements,
    error: Rate,
    last_stage: Rate,
}

/// Adaptive or fixed step Runge-Kutta integrator with event detection.
#[derive(Debug, Clone, Default)]
pub struct Integrator {
    params: IntegratorParams,
    detector: EventDetector,
    function_evaluations: u64,
    degeneracies: u64,
    last_report: Option<PropagationReport>,
}

impl Integrator {
    pub fn new(params: IntegratorParams) -> Self {
        Integrator {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &IntegratorParams {
        &self.params
    }

    pub fn set_params(&mut self, params: IntegratorParams) {
        self.params = params;
    }

    /// Replace the watched events. Detection restarts from scratch.
    pub fn set_events(&mut self, events: &[EventHandle]) {
        self.detector.set_events(events);
    }

    pub fn event_detector(&self) -> &EventDetector {
        &self.detector
    }

    /// Derivative evaluations of the last propagation
    pub fn n_func_evals(&self) -> u64 {
        self.function_evaluations
    }

    pub fn last_report(&self) -> Option<&PropagationReport> {
        self.last_report.as_ref()
    }

    pub fn status(&self) -> Option<PropagationStatus> {
        self.last_report.map(|report| report.status)
    }

    /// Propagate `vehicle` over `interval`, measured from `epoch`.
    ///
    /// If the vehicle state is not defined at `epoch + interval.start`, it is first brought
    /// there without storing nor detecting events. The vehicle state is updated after every
    /// accepted step and ends at the last integrated time. Event trackers start afresh on every
    /// call: the first measurement only seeds them, then each accepted step is checked for a
    /// crossing.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: reference epoch of the interval.
    /// * `interval`: start and end offsets; `end < start` propagates backward.
    /// * `eom`: equations of motion, which also fix the integrated element set.
    /// * `vehicle`: the propagated vehicle.
    /// * `store`: keep every accepted step in the history. The initial and final states are
    ///   always part of it when storing, the final state is stored in any case. A sample where
    ///   an event action changed the vehicle holds the state after the action.
    ///
    /// Return
    /// ------
    /// * The state history, with the detected event times attached.
    /// * `PropagationError::InvalidIntegratorParameter` when the parameters do not validate.
    /// * `PropagationError::InvalidState`, `StepSizeUnderflow` or `StepRetriesExceeded` when
    ///   the integration breaks down, and any error of the equations of motion.
    pub fn propagate<E: EquationsOfMotion + ?Sized>(
        &mut self,
        epoch: Epoch,
        interval: Interval,
        eom: &E,
        vehicle: &mut Vehicle,
        store: bool,
    ) -> Result<StateHistory, PropagationError> {
        self.params = self.params.clone().validate()?;
        self.detector.reset();
        self.integrate(epoch, interval, eom, vehicle, store, true)
    }

    /// One integration leg. With `seed_events` unset, the trackers continue from the
    /// measurement that ended the previous leg at `interval.start`.
    fn integrate<E: EquationsOfMotion + ?Sized>(
        &mut self,
        epoch: Epoch,
        interval: Interval,
        eom: &E,
        vehicle: &mut Vehicle,
        store: bool,
        seed_events: bool,
    ) -> Result<StateHistory, PropagationError> {
        self.function_evaluations = 0;
        self.degeneracies = 0;
        self.last_report = None;

        let system = eom.system();
        let start = interval.start.to_seconds();
        let end = interval.end.to_seconds();
        let forward = end >= start;
        log::debug!(
            "propagating {} with {} ({}) from t = {start} s to t = {end} s",
            vehicle.name(),
            eom.name(),
            self.params.step_method
        );

        let mut state = self.initial_state(epoch, start, eom, vehicle)?;
        let tableau = self.params.step_method.tableau();
        let error_weights = tableau.error_weights();

        let mut time = start;
        let mut step = if self.params.use_fixed_step {
            self.params.fixed_time_step
        } else {
            self.params.initial_time_step
        };
        step = step.min((end - start).abs());
        if !forward {
            step = -step;
        }

        let mut control = StepControl::default();
        let mut status = PropagationStatus::Completed;
        if seed_events && self.apply_events(time, &mut state, vehicle, system, &mut control)? {
            status = PropagationStatus::Terminated;
        }

        let mut history = StateHistory::new(vehicle.id());
        if store {
            history.insert(vehicle.state().epoch, *vehicle.state());
        }

        let mut iteration: u64 = 0;
        while time != end
            && status == PropagationStatus::Completed
            && iteration < self.params.max_iterations
        {
            validate_state_and_time(time, &state)?;

            if self.params.use_fixed_step {
                let outcome = self.take_step(
                    tableau,
                    &error_weights,
                    epoch,
                    time,
                    step,
                    &state,
                    eom,
                    vehicle,
                    &mut control,
                )?;
                time += step;
                state = outcome.state;
                control.first_stage = tableau.fsal.then_some(outcome.last_stage);
                control.accepted += 1;
            } else {
                step = self.adaptive_step(
                    tableau,
                    &error_weights,
                    epoch,
                    &mut time,
                    step,
                    &mut state,
                    eom,
                    vehicle,
                    &mut control,
                )?;
            }
            // snap the clamped last step onto the end time
            if (forward && time >= end) || (!forward && time <= end) {
                time = end;
            }

            let sample_epoch = offset_seconds(epoch, time);
            vehicle.update_state(State::new(state, sample_epoch));
            if self.apply_events(time, &mut state, vehicle, system, &mut control)? {
                status = PropagationStatus::Terminated;
            }
            if store {
                history.insert(sample_epoch, State::new(state, sample_epoch));
            }
            log::trace!("step {iteration}: t = {time} s, h = {step} s");

            if (forward && time + step > end) || (!forward && time + step < end) {
                step = end - time;
            }
            iteration += 1;
        }

        if time != end && status == PropagationStatus::Completed {
            log::warn!(
                "maximum number of iterations ({}) reached at t = {time} s before t = {end} s",
                self.params.max_iterations
            );
        }

        history.insert(vehicle.state().epoch, *vehicle.state());
        if !self.detector.is_empty() {
            history.set_event_times(self.detector.event_times(epoch));
        }

        let report = PropagationReport {
            status,
            steps: control.accepted,
            function_evaluations: self.function_evaluations,
            degeneracies: self.degeneracies,
        };
        log::debug!("propagation of {}: {report}", vehicle.name());
        self.last_report = Some(report);
        Ok(history)
    }

    /// Measure the events on the vehicle sample at `time` and pick up the state left by their
    /// actions.
    ///
    /// Return
    /// ------
    /// * `true` if a terminal event was detected.
    fn apply_events(
        &mut self,
        time: f64,
        state: &mut OrbitalElements,
        vehicle: &mut Vehicle,
        system: &AstrodynamicsSystem,
        control: &mut StepControl,
    ) -> Result<bool, PropagationError> {
        if self.detector.is_empty() {
            return Ok(false);
        }
        let terminal = self
            .detector
            .detect_events(seconds(time), state, vehicle, system)?;
        let current = vehicle.state().elements.convert_to(state.element_set(), system);
        if current != *state {
            // an event action moved the vehicle
            control.first_stage = None;
            *state = current;
            let epoch = vehicle.state().epoch;
            vehicle.update_state(State::new(current, epoch));
        }
        Ok(terminal)
    }

    /// Propagate through a list of times, measured from `epoch`.
    ///
    /// The integration runs between consecutive times so that every requested time is part of
    /// the returned history, whatever `store` is. Event detection carries over from one leg to
    /// the next.
    ///
    /// Return
    /// ------
    /// * `PropagationError::InvalidTimeList` unless `times` is non-empty and strictly
    ///   increasing.
    pub fn propagate_times<E: EquationsOfMotion + ?Sized>(
        &mut self,
        epoch: Epoch,
        times: &[Duration],
        eom: &E,
        vehicle: &mut Vehicle,
        store: bool,
    ) -> Result<StateHistory, PropagationError> {
        let Some(first) = times.first() else {
            return Err(PropagationError::InvalidTimeList(
                "at least one time is required".into(),
            ));
        };
        if let Some(pair) = times.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(PropagationError::InvalidTimeList(format!(
                "times must be strictly increasing ({} >= {})",
                pair[0], pair[1]
            )));
        }

        self.params = self.params.clone().validate()?;
        self.detector.reset();
        let mut history =
            self.integrate(epoch, Interval::new(*first, *first), eom, vehicle, store, true)?;
        let mut steps = 0;
        let mut function_evaluations = self.function_evaluations;
        let mut degeneracies = self.degeneracies;
        for pair in times.windows(2) {
            let segment = self.integrate(
                epoch,
                Interval::new(pair[0], pair[1]),
                eom,
                vehicle,
                store,
                false,
            )?;
            for (epoch, state) in segment.iter() {
                history.insert(*epoch, *state);
            }
            history.set_event_times(segment.event_times().clone());
            if let Some(report) = self.last_report {
                steps += report.steps;
                function_evaluations += report.function_evaluations;
                degeneracies += report.degeneracies;
                if report.status == PropagationStatus::Terminated {
                    break;
                }
            }
        }

        self.function_evaluations = function_evaluations;
        self.degeneracies = degeneracies;
        if let Some(report) = self.last_report.as_mut() {
            report.steps = steps;
            report.function_evaluations = function_evaluations;
            report.degeneracies = degeneracies;
        }
        Ok(history)
    }

    /// Propagate from the current vehicle epoch up to `end`.
    pub fn propagate_to<E: EquationsOfMotion + ?Sized>(
        &mut self,
        end: Epoch,
        eom: &E,
        vehicle: &mut Vehicle,
        store: bool,
    ) -> Result<StateHistory, PropagationError> {
        let epoch = vehicle.state().epoch;
        self.propagate(
            epoch,
            Interval::from_seconds(0.0, seconds_between(epoch, end)),
            eom,
            vehicle,
            store,
        )
    }

    /// Propagate from the current vehicle epoch for `duration`.
    pub fn propagate_for<E: EquationsOfMotion + ?Sized>(
        &mut self,
        duration: Duration,
        eom: &E,
        vehicle: &mut Vehicle,
        store: bool,
    ) -> Result<StateHistory, PropagationError> {
        let epoch = vehicle.state().epoch;
        self.propagate(epoch, Interval::new(Duration::ZERO, duration), eom, vehicle, store)
    }

    /// Bring the vehicle to `epoch + start` and into the element set of `eom`.
    fn initial_state<E: EquationsOfMotion + ?Sized>(
        &mut self,
        epoch: Epoch,
        start: f64,
        eom: &E,
        vehicle: &mut Vehicle,
    ) -> Result<OrbitalElements, PropagationError> {
        let system = eom.system();
        let start_epoch = offset_seconds(epoch, start);
        let vehicle_epoch = vehicle.state().epoch;
        if vehicle_epoch != start_epoch {
            let mut catch_up = Integrator::new(self.params.clone());
            catch_up.propagate_to(start_epoch, eom, vehicle, false)?;
            self.function_evaluations += catch_up.function_evaluations;
            self.degeneracies += catch_up.degeneracies;
        }

        let state = vehicle.state().convert_to(eom.expected_set(), system);
        let state = State::new(state.elements, start_epoch);
        vehicle.update_state(state);
        Ok(state.elements)
    }

    /// Find an acceptable step from `(time, state)` and take it.
    ///
    /// Return
    /// ------
    /// * The size of the next trial step; `time` and `state` are advanced in place.
    #[allow(clippy::too_many_arguments)]
    fn adaptive_step<E: EquationsOfMotion + ?Sized>(
        &mut self,
        tableau: &ButcherTableau,
        error_weights: &[f64],
        epoch: Epoch,
        time: &mut f64,
        mut step: f64,
        state: &mut OrbitalElements,
        eom: &E,
        vehicle: &Vehicle,
        control: &mut StepControl,
    ) -> Result<f64, PropagationError> {
        let mut retries = 0;
        loop {
            if *time + step == *time {
                log::error!("step size underflow at t = {} s", *time);
                return Err(PropagationError::StepSizeUnderflow {
                    time: *time,
                    step,
                    state: state.to_vector(),
                });
            }

            let outcome = self.take_step(
                tableau,
                error_weights,
                epoch,
                *time,
                step,
                state,
                eom,
                vehicle,
                control,
            )?;
            let error = self.max_error(state, &outcome.state, &outcome.error);

            if error <= 1.0 {
                *time += step;
                *state = outcome.state;
                control.first_stage = tableau.fsal.then_some(outcome.last_stage);
                let next = self.next_step(step, error, control);
                control.previous_step = step;
                control.previous_error = error;
                control.accepted += 1;
                return Ok(next);
            }

            step *= (SAFETY / error).powf(0.2).max(MIN_REL_STEP_SIZE);
            retries += 1;
            if retries >= self.params.max_step_retries {
                log::error!("no step within tolerance found at t = {} s", *time);
                return Err(PropagationError::StepRetriesExceeded {
                    time: *time,
                    state: state.to_vector(),
                });
            }
        }
    }

    fn next_step(&self, step: f64, error: f64, control: &StepControl) -> f64 {
        let growth = self.params.max_growth_ratio;
        let factor = if control.accepted == 0 {
            if error < MIN_ERROR_TO_CATCH {
                FIRST_STEP_GROWTH
            } else {
                (SAFETY / error).powf(0.2)
            }
        } else if error == 0.0 || control.previous_error == 0.0 {
            growth
        } else {
            (step / control.previous_step).abs()
                * (SAFETY / error).powf(2.0 / 25.0)
                * (error / control.previous_error).powf(3.0 / 50.0)
        };
        let magnitude = (step.abs() * factor.min(growth))
            .clamp(self.params.min_time_step, self.params.max_time_step);
        magnitude.copysign(step)
    }

    /// One Runge-Kutta step of size `step`, without error control.
    #[allow(clippy::too_many_arguments)]
    fn take_step<E: EquationsOfMotion + ?Sized>(
        &mut self,
        tableau: &ButcherTableau,
        error_weights: &[f64],
        epoch: Epoch,
        time: f64,
        step: f64,
        state: &OrbitalElements,
        eom: &E,
        vehicle: &Vehicle,
        control: &mut StepControl,
    ) -> Result<StepOutcome, PropagationError> {
        let set = state.element_set();
        let mut stages: Vec<Rate> = Vec::with_capacity(tableau.stages());
        for (i, (row, c)) in tableau.a.iter().zip(tableau.c).enumerate() {
            let rate = if i == 0 {
                match control.first_stage {
                    Some(rate) => rate,
                    None => {
                        let rate =
                            self.derivative(eom, offset_seconds(epoch, time), state, vehicle)?;
                        control.first_stage = Some(rate);
                        rate
                    }
                }
            } else {
                let increment = Rate::linear_combination(set, row, &stages)?;
                let stage_state = state.add_rate(&increment, step)?;
                let stage_epoch = offset_seconds(epoch, time + c * step);
                self.derivative(eom, stage_epoch, &stage_state, vehicle)?
            };
            stages.push(rate);
        }

        let increment = Rate::linear_combination(set, tableau.b, &stages)?;
        let new_state = state.add_rate(&increment, step)?;
        let error = Rate::linear_combination(set, error_weights, &stages)?.scaled(step);
        let last_stage = stages.pop().unwrap_or_else(|| Rate::zero(set));
        Ok(StepOutcome {
            state: new_state,
            error,
            last_stage,
        })
    }

    fn derivative<E: EquationsOfMotion + ?Sized>(
        &mut self,
        eom: &E,
        epoch: Epoch,
        state: &OrbitalElements,
        vehicle: &Vehicle,
    ) -> Result<Rate, PropagationError> {
        self.function_evaluations += 1;
        let derivative = eom.evaluate_at(epoch, state, vehicle)?;
        if let Some(degeneracy) = derivative.degeneracy {
            if self.degeneracies == 0 {
                log::warn!(
                    "{}: degenerate {degeneracy} at {epoch}, elements regularized",
                    eom.name()
                );
            }
            self.degeneracies += 1;
        }
        Ok(derivative.rate)
    }

    /// Scaled maximum of the local error, `2` when the step is not trustworthy.
    fn max_error(&self, state: &OrbitalElements, new_state: &OrbitalElements, error: &Rate) -> f64 {
        let y = state.to_vector();
        let y_new = new_state.to_vector();
        let delta = error.to_vector();
        let mut max_error: f64 = 0.0;
        for i in 0..6 {
            let scaled =
                delta[i].abs() / (self.params.abs_tol + y_new[i].abs() * self.params.rel_tol);
            if !scaled.is_finite()
                || !y_new[i].is_finite()
                || (y_new[i] - y[i]).abs() > MAX_COMPONENT_JUMP
            {
                return 2.0;
            }
            max_error = max_error.max(scaled);
        }
        max_error
    }
}

fn validate_state_and_time(time: f64, state: &OrbitalElements) -> Result<(), PropagationError> {
    let values = state.to_vector();
    if !time.is_finite() || values.iter().any(|x| !x.is_finite()) {
        log::error!("invalid state or time at t = {time} s");
        return Err(PropagationError::InvalidState {
            time,
            state: values,
        });
    }
    Ok(())
}

#[cfg(test)]
mod integrator_test {
    use super::*;
    use crate::equations_of_motion::{
        keplerian_vop::KeplerianVop, two_body::TwoBody, DegeneracyPolicy, Derivative,
    };
    use crate::forces::ForceModel;
    use crate::orbit_type::{
        cartesian_element::CartesianElements, keplerian_element::KeplerianElements, ElementSet,
    };
    use crate::system::AstrodynamicsSystem;
    use crate::time::j2000;
    use crate::vehicle::null_vehicle::NullVehicle;
    use nalgebra::Vector3;

    fn leo_vehicle() -> Vehicle {
        Vehicle::new(NullVehicle::new(
            State::new(KeplerianElements::leo(), j2000()),
            1000.0,
        ))
    }

    fn fixed(method: StepMethod, step: f64) -> IntegratorParams {
        IntegratorParams::builder()
            .step_method(method)
            .use_fixed_step(true)
            .fixed_time_step(step)
            .build()
            .unwrap()
    }

    /// Equations of motion producing a NaN rate.
    struct Broken<'a>(&'a AstrodynamicsSystem);

    impl EquationsOfMotion for Broken<'_> {
        fn evaluate_at(
            &self,
            _epoch: Epoch,
            _state: &OrbitalElements,
            _vehicle: &Vehicle,
        ) -> Result<Derivative, PropagationError> {
            Ok(Derivative::new(Rate::from_vector(
                ElementSet::Cartesian,
                [f64::NAN; 6],
            )))
        }

        fn expected_set(&self) -> ElementSet {
            ElementSet::Cartesian
        }

        fn system(&self) -> &AstrodynamicsSystem {
            self.0
        }

        fn name(&self) -> &'static str {
            "Broken"
        }
    }

    #[test]
    fn test_fixed_step_counts() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);

        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::new(fixed(StepMethod::Rkf45, 10.0));
        let history = integrator
            .propagate_for(seconds(100.0), &eom, &mut vehicle, true)
            .unwrap();
        assert_eq!(history.len(), 11);
        assert_eq!(integrator.n_func_evals(), 60);
        let report = integrator.last_report().unwrap();
        assert_eq!(report.steps, 10);
        assert_eq!(report.status, PropagationStatus::Completed);

        // first same as last: one evaluation saved per step after the first
        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::new(fixed(StepMethod::Dop45, 10.0));
        integrator
            .propagate_for(seconds(100.0), &eom, &mut vehicle, true)
            .unwrap();
        assert_eq!(integrator.n_func_evals(), 7 + 9 * 6);
    }

    #[test]
    fn test_converts_to_eom_set() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let mut vehicle = leo_vehicle();
        let history = Integrator::default()
            .propagate_for(seconds(60.0), &eom, &mut vehicle, false)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(vehicle.state().element_set(), ElementSet::Cartesian);
        assert_eq!(vehicle.state().epoch, j2000() + seconds(60.0));
    }

    #[test]
    fn test_zero_length_interval() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::default();
        let history = integrator
            .propagate(j2000(), Interval::from_seconds(0.0, 0.0), &eom, &mut vehicle, true)
            .unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(integrator.n_func_evals(), 0);
    }

    #[test]
    fn test_catches_up_to_start() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let mut vehicle = leo_vehicle();
        let history = Integrator::default()
            .propagate(j2000(), Interval::from_seconds(100.0, 200.0), &eom, &mut vehicle, true)
            .unwrap();
        assert_eq!(history.first().unwrap().epoch, j2000() + seconds(100.0));
        assert_eq!(history.last().unwrap().epoch, j2000() + seconds(200.0));
    }

    #[test]
    fn test_invalid_state() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let nan = CartesianElements::new(Vector3::new(f64::NAN, 0.0, 0.0), Vector3::zeros());
        let mut vehicle = Vehicle::new(NullVehicle::new(State::new(nan, j2000()), 1.0));
        let err = Integrator::default()
            .propagate_for(seconds(10.0), &eom, &mut vehicle, false)
            .unwrap_err();
        assert!(matches!(err, PropagationError::InvalidState { time, .. } if time == 0.0));
    }

    #[test]
    fn test_retries_exceeded() {
        let sys = AstrodynamicsSystem::default();
        let params = IntegratorParams::builder()
            .max_step_retries(5)
            .build()
            .unwrap();
        let mut vehicle = Vehicle::new(NullVehicle::new(
            State::new(CartesianElements::leo(&sys), j2000()),
            1.0,
        ));
        let err = Integrator::new(params)
            .propagate_for(seconds(10.0), &Broken(&sys), &mut vehicle, false)
            .unwrap_err();
        assert!(matches!(err, PropagationError::StepRetriesExceeded { .. }));
    }

    #[test]
    fn test_step_size_underflow_reports_state() {
        let sys = AstrodynamicsSystem::default();
        let start = offset_seconds(j2000(), 1.0e6);
        let leo = CartesianElements::leo(&sys);
        let mut vehicle = Vehicle::new(NullVehicle::new(State::new(leo, start), 1.0));
        let err = Integrator::default()
            .propagate(
                j2000(),
                Interval::from_seconds(1.0e6, 1.0e6 + 10.0),
                &Broken(&sys),
                &mut vehicle,
                false,
            )
            .unwrap_err();
        match err {
            PropagationError::StepSizeUnderflow { time, step, state } => {
                assert_eq!(time, 1.0e6);
                assert!(step > 0.0 && time + step == time);
                assert_eq!(state[0], leo.position[0]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unvalidated_params_rejected() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let params = IntegratorParams {
            min_time_step: 10.0,
            max_time_step: 1.0,
            ..Default::default()
        };
        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::new(params);
        assert!(matches!(
            integrator.propagate_for(seconds(100.0), &eom, &mut vehicle, false),
            Err(PropagationError::InvalidIntegratorParameter(_))
        ));
        assert!(matches!(
            integrator.propagate_times(j2000(), &[seconds(0.0)], &eom, &mut vehicle, false),
            Err(PropagationError::InvalidIntegratorParameter(_))
        ));
        assert_eq!(vehicle.state().epoch, j2000());
        assert!(integrator.status().is_none());
    }

    #[test]
    fn test_invalid_time_list() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::default();
        for times in [vec![], vec![seconds(0.0), seconds(10.0), seconds(10.0)]] {
            assert!(matches!(
                integrator.propagate_times(j2000(), &times, &eom, &mut vehicle, false),
                Err(PropagationError::InvalidTimeList(_))
            ));
        }
    }

    #[test]
    fn test_propagate_times_records_requested_times() {
        let sys = AstrodynamicsSystem::default();
        let eom = TwoBody::new(&sys);
        let mut vehicle = leo_vehicle();
        let times = [seconds(0.0), seconds(250.0), seconds(1000.0), seconds(4000.0)];
        let history = Integrator::default()
            .propagate_times(j2000(), &times, &eom, &mut vehicle, false)
            .unwrap();
        assert_eq!(history.len(), times.len());
        for t in times {
            assert!(history.at(j2000() + t).is_ok());
        }
    }

    #[test]
    fn test_degeneracies_are_counted() {
        let sys = AstrodynamicsSystem::default();
        let forces = ForceModel::default();
        let eom = KeplerianVop::new(&sys, &forces, DegeneracyPolicy::Warn);
        let mut vehicle = leo_vehicle();
        let mut integrator = Integrator::default();
        integrator
            .propagate_for(seconds(600.0), &eom, &mut vehicle, false)
            .unwrap();
        let report = integrator.last_report().unwrap();
        assert_eq!(report.degeneracies, report.function_evaluations);
        assert!(report.degeneracies > 0);
    }

    #[test]
    fn test_step_method_serde_names() {
        assert_eq!(serde_json::to_string(&StepMethod::Rkf78).unwrap(), "\"Rkf78\"");
        assert_eq!(StepMethod::default().tableau().stages(), 7);
        assert_eq!(format!("{}", StepMethod::Rkf45), "RKF45");
    }
}
