use thiserror::Error;

use crate::orbit_type::ElementSet;

#[derive(Error, Debug)]
pub enum PropagationError {
    #[error("{strategy}: expected {expected} elements but received {found}")]
    ElementSetMismatch {
        strategy: &'static str,
        expected: ElementSet,
        found: ElementSet,
    },

    #[error("Force not registered in the force model: {0}")]
    ForceNotRegistered(String),

    #[error("{strategy}: degenerate orbit (e = {eccentricity:e}, i = {inclination:e} rad)")]
    DegenerateOrbit {
        strategy: &'static str,
        eccentricity: f64,
        inclination: f64,
    },

    #[error("Unable to find a step size within tolerance at t = {time} s (state = {state:?})")]
    StepRetriesExceeded { time: f64, state: [f64; 6] },

    #[error("Step size underflow at t = {time} s (step = {step:e} s, state = {state:?})")]
    StepSizeUnderflow {
        time: f64,
        step: f64,
        state: [f64; 6],
    },

    #[error("Invalid state or time (NaN or Inf) at t = {time} s (state = {state:?})")]
    InvalidState { time: f64, state: [f64; 6] },

    #[error("Invalid propagation time list: {0}")]
    InvalidTimeList(String),

    #[error("Invalid integrator parameter: {0}")]
    InvalidIntegratorParameter(String),

    #[error("No state stored at epoch {0}")]
    StateNotFound(String),

    #[error("Requested epoch {0} is outside the stored state history")]
    OutOfRange(String),

    #[error("Ephemeris of {body} is not valid at {epoch}")]
    EphemerisOutOfRange { body: String, epoch: String },

    #[error("No ephemeris attached to {0}")]
    MissingEphemeris(String),

    #[error("Invalid ephemeris table: {0}")]
    InvalidEphemerisTable(String),

    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("State history is empty")]
    EmptyStateHistory,

    #[error("Kepler equation solver failed: {0}")]
    KeplerSolverFailed(#[from] roots::SearchError),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for PropagationError {
    fn eq(&self, other: &Self) -> bool {
        use PropagationError::*;
        match (self, other) {
            (
                ElementSetMismatch {
                    strategy: s1,
                    expected: e1,
                    found: f1,
                },
                ElementSetMismatch {
                    strategy: s2,
                    expected: e2,
                    found: f2,
                },
            ) => s1 == s2 && e1 == e2 && f1 == f2,
            (ForceNotRegistered(a), ForceNotRegistered(b)) => a == b,
            (DegenerateOrbit { strategy: a, .. }, DegenerateOrbit { strategy: b, .. }) => a == b,
            (StepRetriesExceeded { time: a, .. }, StepRetriesExceeded { time: b, .. }) => a == b,
            (StepSizeUnderflow { time: a, .. }, StepSizeUnderflow { time: b, .. }) => a == b,
            (InvalidState { time: a, .. }, InvalidState { time: b, .. }) => a == b,
            (InvalidTimeList(a), InvalidTimeList(b)) => a == b,
            (InvalidIntegratorParameter(a), InvalidIntegratorParameter(b)) => a == b,
            (StateNotFound(a), StateNotFound(b)) => a == b,
            (OutOfRange(a), OutOfRange(b)) => a == b,
            (EphemerisOutOfRange { body: a, .. }, EphemerisOutOfRange { body: b, .. }) => a == b,
            (MissingEphemeris(a), MissingEphemeris(b)) => a == b,
            (InvalidEphemerisTable(a), InvalidEphemerisTable(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (EmptyStateHistory, EmptyStateHistory) => true,
            (KeplerSolverFailed(a), KeplerSolverFailed(b)) => a == b,

            // Not comparable: same variant is enough
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
