use std::collections::HashMap;

use hifitime::{Duration, Epoch};

use crate::{
    events::{EventHandle, EventTracker},
    orbit_type::OrbitalElements,
    propagation_errors::PropagationError,
    system::AstrodynamicsSystem,
    time::round_to_seconds,
    vehicle::Vehicle,
};

/// Zero-crossing detector over a list of events.
///
/// The first measurement of each event only seeds its tracker, so that no sign is assumed
/// before the propagation starts. Afterwards an event is detected when:
/// * the previous measurement was exactly zero and the current one is zero too, the detection
///   time being the previous time;
/// * the measurement changed sign (`prev > 0 && cur <= 0` or `prev < 0 && cur >= 0`), the
///   detection time being the current time.
#[derive(Debug, Clone, Default)]
pub struct EventDetector {
    trackers: Vec<EventTracker>,
}

impl EventDetector {
    pub fn new(events: &[EventHandle]) -> Self {
        let mut detector = EventDetector::default();
        detector.set_events(events);
        detector
    }

    /// Replace the watched events. Previous detections are discarded.
    pub fn set_events(&mut self, events: &[EventHandle]) {
        self.trackers = events.iter().cloned().map(EventTracker::new).collect();
    }

    /// Reseed every tracker and forget past detections, keeping the events.
    pub fn reset(&mut self) {
        self.trackers.iter_mut().for_each(EventTracker::reset);
    }

    pub fn events(&self) -> impl Iterator<Item = &EventHandle> {
        self.trackers.iter().map(|tracker| &tracker.event)
    }

    pub fn trackers(&self) -> &[EventTracker] {
        &self.trackers
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// Measure every event at `(time, state)` and run the actions of the detected ones.
    ///
    /// Arguments
    /// ---------
    /// * `time`: elapsed time since the propagation epoch.
    /// * `state`: current integrated state.
    /// * `vehicle`: the propagated vehicle, handed mutably to the triggered actions.
    /// * `system`: the astrodynamics context.
    ///
    /// Return
    /// ------
    /// * `true` if a terminal event was detected.
    pub fn detect_events(
        &mut self,
        time: Duration,
        state: &OrbitalElements,
        vehicle: &mut Vehicle,
        system: &AstrodynamicsSystem,
    ) -> Result<bool, PropagationError> {
        let mut terminal = false;
        for tracker in self.trackers.iter_mut() {
            let value = tracker.event.measure_event(time, state, vehicle, system);

            if let Some(event_time) = crossing_time(tracker, time, value) {
                tracker.event_times.push(event_time);
                tracker.event.trigger_action(vehicle, system)?;
                if tracker.event.is_terminal() {
                    log::warn!(
                        "terminal event {} detected at t = {} s",
                        tracker.event.name(),
                        event_time.to_seconds()
                    );
                    terminal = true;
                }
            }

            tracker.previous_time = time;
            tracker.previous_value = value;
        }
        Ok(terminal)
    }

    /// Detection epochs of every event, rounded to whole seconds.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: the epoch the tracked times are measured from.
    pub fn event_times(&self, epoch: Epoch) -> HashMap<String, Vec<Epoch>> {
        self.trackers
            .iter()
            .map(|tracker| {
                let epochs = tracker
                    .event_times
                    .iter()
                    .map(|time| epoch + round_to_seconds(*time))
                    .collect();
                (tracker.event.name().to_string(), epochs)
            })
            .collect()
    }
}

fn crossing_time(tracker: &mut EventTracker, time: Duration, value: f64) -> Option<Duration> {
    if tracker.first_measurement_pending {
        tracker.first_measurement_pending = false;
        return None;
    }
    let previous = tracker.previous_value;
    if previous == 0.0 {
        (value == 0.0).then_some(tracker.previous_time)
    } else {
        let crossed = (previous > 0.0 && value <= 0.0) || (previous < 0.0 && value >= 0.0);
        crossed.then_some(time)
    }
}
