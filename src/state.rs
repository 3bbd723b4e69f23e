use std::fmt;

use hifitime::Epoch;

use crate::{
    orbit_type::{ElementSet, OrbitalElements},
    system::AstrodynamicsSystem,
};

/// Orbital elements tagged with the epoch they are defined at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub elements: OrbitalElements,
    pub epoch: Epoch,
}

impl State {
    pub fn new(elements: impl Into<OrbitalElements>, epoch: Epoch) -> Self {
        State {
            elements: elements.into(),
            epoch,
        }
    }

    pub fn element_set(&self) -> ElementSet {
        self.elements.element_set()
    }

    /// Same state expressed in another element set.
    pub fn convert_to(&self, set: ElementSet, system: &AstrodynamicsSystem) -> State {
        State {
            elements: self.elements.convert_to(set, system),
            epoch: self.epoch,
        }
    }

    /// Replace the elements, optionally converting them back to the current element set.
    pub fn set_elements(
        &mut self,
        elements: OrbitalElements,
        keep_current_set: bool,
        system: &AstrodynamicsSystem,
    ) {
        self.elements = if keep_current_set {
            elements.convert_to(self.element_set(), system)
        } else {
            elements
        };
    }
}

impl Default for State {
    fn default() -> Self {
        State::new(OrbitalElements::default(), crate::time::j2000())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State at {}", self.epoch)?;
        write!(f, "{}", self.elements)
    }
}
