//! Construction bounds.
//!
//! Every GateSeal configuration must fall inside these limits, whether it is
//! constructed directly or provisioned by a factory.

use crate::time::{Seconds, SECONDS_PER_DAY};

/// Smallest number of sealables a GateSeal may guard.
pub const MIN_SEALABLES: usize = 1;
/// Largest number of sealables a GateSeal may guard. Bounds the number of
/// resource calls a single seal performs.
pub const MAX_SEALABLES: usize = 8;

pub const MIN_SEAL_DURATION_SECONDS: Seconds = SECONDS_PER_DAY * 4;
pub const MAX_SEAL_DURATION_SECONDS: Seconds = SECONDS_PER_DAY * 14;

pub const MIN_LIFETIME_DURATION_SECONDS: Seconds = SECONDS_PER_DAY * 7;
pub const MAX_LIFETIME_DURATION_SECONDS: Seconds = SECONDS_PER_DAY * 365;

/// Upper bound on the total number of prolongations an instance may be configured with.
pub const MAX_PROLONGATIONS: u32 = 5;

pub const MIN_PROLONGATION_WINDOW_SECONDS: Seconds = SECONDS_PER_DAY;
pub const MAX_PROLONGATION_WINDOW_SECONDS: Seconds = SECONDS_PER_DAY * 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_ordered() {
        assert!(MIN_SEALABLES <= MAX_SEALABLES);
        assert!(MIN_SEAL_DURATION_SECONDS < MAX_SEAL_DURATION_SECONDS);
        assert!(MIN_LIFETIME_DURATION_SECONDS < MAX_LIFETIME_DURATION_SECONDS);
        assert!(MIN_PROLONGATION_WINDOW_SECONDS < MAX_PROLONGATION_WINDOW_SECONDS);
    }

    #[test]
    fn smallest_window_fits_smallest_lifetime() {
        // Otherwise no configuration at the lower lifetime bound would be valid.
        assert!(MIN_PROLONGATION_WINDOW_SECONDS <= MIN_LIFETIME_DURATION_SECONDS);
    }
}
