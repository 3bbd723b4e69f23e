use hifitime::Duration;

use crate::{
    events::Event, orbit_type::OrbitalElements, system::AstrodynamicsSystem, vehicle::Vehicle,
};

/// Event that never fires: its measurement is constant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullEvent;

impl Event for NullEvent {
    fn measure_event(
        &mut self,
        _time: Duration,
        _state: &OrbitalElements,
        _vehicle: &Vehicle,
        _system: &AstrodynamicsSystem,
    ) -> f64 {
        1.0
    }

    fn name(&self) -> &str {
        "NullEvent"
    }

    fn clone_box(&self) -> Box<dyn Event> {
        Box::new(*self)
    }
}
