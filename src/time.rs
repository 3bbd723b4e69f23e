use hifitime::{Duration, Epoch, TimeScale};

use crate::constants::SECONDS_PER_WEEK;

/// The J2000 reference epoch (2000-01-01 12:00:00 TT)
pub fn j2000() -> Epoch {
    Epoch::from_gregorian(2000, 1, 1, 12, 0, 0, 0, TimeScale::TT)
}

/// Duration from a floating point number of seconds
pub fn seconds(value: f64) -> Duration {
    Duration::from_seconds(value)
}

/// Duration from a floating point number of days
pub fn days(value: f64) -> Duration {
    Duration::from_days(value)
}

/// Duration from a floating point number of weeks
pub fn weeks(value: f64) -> Duration {
    Duration::from_seconds(value * SECONDS_PER_WEEK)
}

/// Elapsed seconds between two epochs (`to - from`)
///
/// Argument
/// --------
/// * `from`: the reference epoch
/// * `to`: the target epoch
///
/// Return
/// ------
/// * the signed number of seconds, negative when `to` precedes `from`
pub fn seconds_between(from: Epoch, to: Epoch) -> f64 {
    (to - from).to_seconds()
}

/// Shift an epoch by a floating point number of seconds
pub fn offset_seconds(epoch: Epoch, seconds: f64) -> Epoch {
    epoch + Duration::from_seconds(seconds)
}

/// Round a duration to the closest whole second
pub fn round_to_seconds(duration: Duration) -> Duration {
    Duration::from_seconds(duration.to_seconds().round())
}

/// A propagation window expressed as offsets from a reference epoch.
///
/// `end` may precede `start`, in which case the propagation runs backward in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: Duration,
    pub end: Duration,
}

impl Interval {
    pub fn new(start: Duration, end: Duration) -> Self {
        Interval { start, end }
    }

    pub fn from_seconds(start: f64, end: f64) -> Self {
        Interval {
            start: seconds(start),
            end: seconds(end),
        }
    }

    /// Signed length of the interval in seconds
    pub fn span_seconds(&self) -> f64 {
        (self.end - self.start).to_seconds()
    }

    pub fn is_forward(&self) -> bool {
        self.end >= self.start
    }
}
