//! # State history
//!
//! Time-ordered record of the states produced by a propagation.
//!
//! [`StateHistory`] is keyed by [`Epoch`] and answers three kinds of queries:
//!
//! - exact lookups ([`StateHistory::at`]),
//! - nearest-sample lookups ([`StateHistory::closest_state`]),
//! - interpolated lookups ([`StateHistory::state_at`]), memoized in an interior cache so
//!   repeated queries on the same epoch are free.
//!
//! The history also stores the detection times of the events attached to the propagation
//! and can be exported as flat records, either through serde or directly to CSV.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Mutex;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::{
    orbit_type::ElementSet, propagation_errors::PropagationError, state::State,
    system::AstrodynamicsSystem,
};

/// One exported row of a [`StateHistory`].
///
/// `seconds` counts from the first stored epoch, `e1..e6` follow the canonical component
/// order of `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub seconds: f64,
    pub set: ElementSet,
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
    pub e4: f64,
    pub e5: f64,
    pub e6: f64,
}

#[derive(Debug, Default)]
pub struct StateHistory {
    object_id: u64,
    states: BTreeMap<Epoch, State>,
    event_times: HashMap<String, Vec<Epoch>>,
    interpolated: Mutex<BTreeMap<Epoch, State>>,
}

impl Clone for StateHistory {
    fn clone(&self) -> Self {
        let cache = self
            .interpolated
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default();
        StateHistory {
            object_id: self.object_id,
            states: self.states.clone(),
            event_times: self.event_times.clone(),
            interpolated: Mutex::new(cache),
        }
    }
}

impl PartialEq for StateHistory {
    fn eq(&self, other: &Self) -> bool {
        self.object_id == other.object_id
            && self.states == other.states
            && self.event_times == other.event_times
    }
}

impl StateHistory {
    pub fn new(object_id: u64) -> Self {
        StateHistory {
            object_id,
            ..Default::default()
        }
    }

    fn invalidate_cache(&mut self) {
        if let Ok(cache) = self.interpolated.get_mut() {
            cache.clear();
        }
    }

    pub fn insert(&mut self, epoch: Epoch, state: State) {
        self.invalidate_cache();
        self.states.insert(epoch, state);
    }

    /// Exact lookup.
    ///
    /// Return
    /// ------
    /// * `PropagationError::StateNotFound` if nothing is stored at `epoch`.
    pub fn at(&self, epoch: Epoch) -> Result<&State, PropagationError> {
        self.states
            .get(&epoch)
            .ok_or_else(|| PropagationError::StateNotFound(epoch.to_string()))
    }

    pub fn get_mut(&mut self, epoch: Epoch) -> Option<&mut State> {
        self.invalidate_cache();
        self.states.get_mut(&epoch)
    }

    /// Mutable access to the state at `epoch`, inserting `default` first if the slot is empty.
    pub fn entry_or_insert(&mut self, epoch: Epoch, default: State) -> &mut State {
        self.invalidate_cache();
        self.states.entry(epoch).or_insert(default)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn clear(&mut self) {
        self.invalidate_cache();
        self.states.clear();
        self.event_times.clear();
    }

    pub fn first(&self) -> Option<&State> {
        self.states.first_key_value().map(|(_, s)| s)
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last_key_value().map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Epoch, &State)> {
        self.states.iter()
    }

    pub fn epochs(&self) -> impl Iterator<Item = &Epoch> {
        self.states.keys()
    }

    pub fn object_id(&self) -> u64 {
        self.object_id
    }

    pub fn set_object_id(&mut self, id: u64) {
        self.object_id = id;
    }

    pub fn event_times(&self) -> &HashMap<String, Vec<Epoch>> {
        &self.event_times
    }

    pub fn set_event_times(&mut self, event_times: HashMap<String, Vec<Epoch>>) {
        self.event_times = event_times;
    }

    /// Stored state nearest to `epoch`. Ties go to the earlier sample.
    pub fn closest_state(&self, epoch: Epoch) -> Result<&State, PropagationError> {
        let before = self.states.range(..=epoch).next_back();
        let after = self.states.range(epoch..).next();
        match (before, after) {
            (Some((t0, s0)), Some((t1, s1))) => {
                if (epoch - *t0).abs() <= (*t1 - epoch).abs() {
                    Ok(s0)
                } else {
                    Ok(s1)
                }
            }
            (Some((_, s)), None) | (None, Some((_, s))) => Ok(s),
            (None, None) => Err(PropagationError::EmptyStateHistory),
        }
    }

    /// State at an arbitrary epoch within the stored range.
    ///
    /// Exact hits are returned as stored. Other epochs are linearly interpolated between the
    /// two bracketing samples, in the element set of the earlier one, and memoized.
    ///
    /// Arguments
    /// ---------
    /// * `epoch`: requested epoch.
    /// * `system`: gravitational context used to bring both samples to the same set.
    ///
    /// Return
    /// ------
    /// * `PropagationError::EmptyStateHistory` if nothing is stored.
    /// * `PropagationError::OutOfRange` if `epoch` lies outside `[first, last]`.
    pub fn state_at(
        &self,
        epoch: Epoch,
        system: &AstrodynamicsSystem,
    ) -> Result<State, PropagationError> {
        if self.states.is_empty() {
            return Err(PropagationError::EmptyStateHistory);
        }
        if let Some(state) = self.states.get(&epoch) {
            return Ok(*state);
        }
        if let Some(state) = self
            .interpolated
            .lock()
            .ok()
            .and_then(|cache| cache.get(&epoch).copied())
        {
            return Ok(state);
        }

        let before = self.states.range(..epoch).next_back();
        let after = self.states.range(epoch..).next();
        let ((t0, s0), (t1, s1)) = match (before, after) {
            (Some(b), Some(a)) => (b, a),
            _ => return Err(PropagationError::OutOfRange(epoch.to_string())),
        };

        let fraction = (epoch - *t0).to_seconds() / (*t1 - *t0).to_seconds();
        let state = State::new(s0.elements.interpolate(&s1.elements, fraction, system), epoch);

        if let Ok(mut cache) = self.interpolated.lock() {
            cache.insert(epoch, state);
        }
        Ok(state)
    }

    /// Number of interpolated states currently memoized.
    pub fn cached_len(&self) -> usize {
        self.interpolated.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Flatten the history into serializable rows, ordered by epoch.
    pub fn to_records(&self) -> Vec<StateRecord> {
        let Some(origin) = self.states.keys().next().copied() else {
            return Vec::new();
        };
        self.states
            .iter()
            .map(|(epoch, state)| {
                let [e1, e2, e3, e4, e5, e6] = state.elements.to_vector();
                StateRecord {
                    seconds: (*epoch - origin).to_seconds(),
                    set: state.element_set(),
                    e1,
                    e2,
                    e3,
                    e4,
                    e5,
                    e6,
                }
            })
            .collect()
    }

    /// Write [`StateHistory::to_records`] to a CSV file with a header row.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), PropagationError> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in self.to_records() {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}
