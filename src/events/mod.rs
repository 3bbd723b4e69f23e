//! # Events
//!
//! Scalar triggering conditions watched during a propagation. An event is detected when its
//! measurement crosses zero between two consecutive integrator samples; see
//! [`detector::EventDetector`] for the detection rules.
//!
//! | Event                              | Terminal | Action                                  |
//! |------------------------------------|----------|-----------------------------------------|
//! | [`null_event::NullEvent`]          | no       | none                                    |
//! | [`impulsive_burn::ImpulsiveBurn`]  | no       | Δv along the velocity at each periapsis |
use std::fmt;

use hifitime::Duration;

use crate::{
    orbit_type::OrbitalElements, propagation_errors::PropagationError,
    system::AstrodynamicsSystem, vehicle::Vehicle,
};

pub mod detector;
pub mod impulsive_burn;
pub mod null_event;

pub trait Event: Send + Sync + fmt::Debug {
    /// Scalar whose sign change marks the event.
    ///
    /// Arguments
    /// ---------
    /// * `time`: elapsed time since the propagation epoch.
    /// * `state`: the state being integrated, in the set of the equations of motion.
    /// * `vehicle`: the propagated vehicle.
    /// * `system`: the astrodynamics context.
    fn measure_event(
        &mut self,
        time: Duration,
        state: &OrbitalElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> f64;

    /// A terminal event stops the propagation once detected.
    fn is_terminal(&self) -> bool {
        false
    }

    /// Run when the event is detected. May modify the vehicle state.
    fn trigger_action(
        &self,
        _vehicle: &mut Vehicle,
        _system: &AstrodynamicsSystem,
    ) -> Result<(), PropagationError> {
        Ok(())
    }

    fn name(&self) -> &str;

    fn clone_box(&self) -> Box<dyn Event>;
}

impl Clone for Box<dyn Event> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Owning polymorphic event. Cloning deep-copies the underlying event.
#[derive(Debug, Clone)]
pub struct EventHandle(Box<dyn Event>);

impl EventHandle {
    pub fn new<E: Event + 'static>(event: E) -> Self {
        EventHandle(Box::new(event))
    }

    pub fn event(&self) -> &dyn Event {
        self.0.as_ref()
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn is_terminal(&self) -> bool {
        self.0.is_terminal()
    }

    pub fn measure_event(
        &mut self,
        time: Duration,
        state: &OrbitalElements,
        vehicle: &Vehicle,
        system: &AstrodynamicsSystem,
    ) -> f64 {
        self.0.measure_event(time, state, vehicle, system)
    }

    pub fn trigger_action(
        &self,
        vehicle: &mut Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<(), PropagationError> {
        self.0.trigger_action(vehicle, system)
    }
}

impl<E: Event + 'static> From<E> for EventHandle {
    fn from(event: E) -> Self {
        EventHandle::new(event)
    }
}

/// Detection bookkeeping of one event during a propagation.
#[derive(Debug, Clone)]
pub struct EventTracker {
    pub event: EventHandle,
    pub first_measurement_pending: bool,
    pub previous_time: Duration,
    pub previous_value: f64,
    pub event_times: Vec<Duration>,
}

impl EventTracker {
    pub fn new(event: EventHandle) -> Self {
        EventTracker {
            event,
            first_measurement_pending: true,
            previous_time: Duration::ZERO,
            previous_value: 0.0,
            event_times: Vec::new(),
        }
    }

    /// Back to the unseeded state, dropping the recorded detections.
    pub fn reset(&mut self) {
        self.first_measurement_pending = true;
        self.previous_time = Duration::ZERO;
        self.previous_value = 0.0;
        self.event_times.clear();
    }
}

#[cfg(test)]
mod events_test {
    use super::*;
    use crate::events::null_event::NullEvent;

    #[derive(Debug, Clone)]
    struct CountingEvent(u32);

    impl Event for CountingEvent {
        fn measure_event(
            &mut self,
            _time: Duration,
            _state: &OrbitalElements,
            _vehicle: &Vehicle,
            _system: &AstrodynamicsSystem,
        ) -> f64 {
            self.0 += 1;
            self.0 as f64
        }

        fn name(&self) -> &str {
            "CountingEvent"
        }

        fn clone_box(&self) -> Box<dyn Event> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn test_handle_clone_is_deep() {
        let sys = AstrodynamicsSystem::default();
        let vehicle = Vehicle::default();
        let state = OrbitalElements::default();
        let mut handle = EventHandle::new(CountingEvent(0));
        handle.measure_event(Duration::ZERO, &state, &vehicle, &sys);
        let mut copy = handle.clone();
        handle.measure_event(Duration::ZERO, &state, &vehicle, &sys);
        assert_eq!(handle.measure_event(Duration::ZERO, &state, &vehicle, &sys), 3.0);
        assert_eq!(copy.measure_event(Duration::ZERO, &state, &vehicle, &sys), 2.0);
        assert!(!copy.is_terminal());
        assert_eq!(copy.name(), "CountingEvent");
    }

    #[test]
    fn test_new_tracker() {
        let tracker = EventTracker::new(NullEvent.into());
        assert!(tracker.first_measurement_pending);
        assert!(tracker.event_times.is_empty());
        assert_eq!(tracker.previous_time, Duration::ZERO);
    }

    #[test]
    fn test_tracker_reset() {
        let mut tracker = EventTracker::new(NullEvent.into());
        tracker.first_measurement_pending = false;
        tracker.previous_time = Duration::from_seconds(30.0);
        tracker.previous_value = -2.0;
        tracker.event_times.push(Duration::from_seconds(20.0));
        tracker.reset();
        assert!(tracker.first_measurement_pending);
        assert!(tracker.event_times.is_empty());
        assert_eq!(tracker.previous_time, Duration::ZERO);
        assert_eq!(tracker.previous_value, 0.0);
    }
}
