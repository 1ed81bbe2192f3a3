//! Time units.
//!
//! Every duration and timestamp is a whole number of seconds. Timestamps are
//! seconds since the Unix epoch; sums of a timestamp and a duration must use
//! checked arithmetic.

/// Absolute point in time, seconds since the Unix epoch.
pub type Timestamp = u64;

/// A duration in whole seconds.
pub type Seconds = u64;

pub const SECONDS_PER_DAY: Seconds = 60 * 60 * 24;
pub const SECONDS_PER_WEEK: Seconds = SECONDS_PER_DAY * 7;
