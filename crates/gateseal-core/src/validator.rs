//! Parameter validation shared by direct construction and factory pre-flight checks.
//!
//! Checks run in a fixed order and the first violation is reported:
//!
//! 1. committee is not the zero address
//! 2. seal duration within bounds
//! 3. sealables non-empty, at most [`MAX_SEALABLES`], no zero address, no duplicates
//! 4. lifetime duration within bounds
//! 5. prolongation count at most [`MAX_PROLONGATIONS`]
//! 6. prolongation window within bounds and not longer than the lifetime
//!
//! All functions are pure; they never touch a clock, a resource or an event sink.

use std::collections::HashSet;

use gateseal_types::{
    Address, Seconds, MAX_LIFETIME_DURATION_SECONDS, MAX_PROLONGATIONS,
    MAX_PROLONGATION_WINDOW_SECONDS, MAX_SEALABLES, MAX_SEAL_DURATION_SECONDS,
    MIN_LIFETIME_DURATION_SECONDS, MIN_PROLONGATION_WINDOW_SECONDS, MIN_SEALABLES,
    MIN_SEAL_DURATION_SECONDS,
};

use crate::error::GateSealError;
use crate::params::GateSealParams;

/// Validate a full parameter set, reporting the first violation.
pub fn check_params(params: &GateSealParams) -> Result<(), GateSealError> {
    check(
        &params.committee,
        params.seal_duration,
        &params.sealables,
        params.lifetime_duration,
        params.max_prolongations,
        params.prolongation_window,
    )
}

/// Boolean form of [`check_params`], for speculative pre-flight checks.
pub fn validate_params(params: &GateSealParams) -> bool {
    check_params(params).is_ok()
}

/// Validate construction parameters given positionally.
pub fn check(
    committee: &Address,
    seal_duration: Seconds,
    sealables: &[Address],
    lifetime_duration: Seconds,
    max_prolongations: u32,
    prolongation_window: Seconds,
) -> Result<(), GateSealError> {
    check_committee(committee)?;
    check_seal_duration(seal_duration)?;
    check_sealables(sealables)?;
    check_lifetime_duration(lifetime_duration)?;
    check_max_prolongations(max_prolongations)?;
    check_prolongation_window(prolongation_window, lifetime_duration)?;
    Ok(())
}

pub fn check_committee(committee: &Address) -> Result<(), GateSealError> {
    if committee.is_zero() {
        return Err(GateSealError::InvalidCommittee);
    }
    Ok(())
}

pub fn check_seal_duration(seal_duration: Seconds) -> Result<(), GateSealError> {
    if !(MIN_SEAL_DURATION_SECONDS..=MAX_SEAL_DURATION_SECONDS).contains(&seal_duration) {
        return Err(GateSealError::SealDurationOutOfRange {
            actual: seal_duration,
            min: MIN_SEAL_DURATION_SECONDS,
            max: MAX_SEAL_DURATION_SECONDS,
        });
    }
    Ok(())
}

pub fn check_sealables(sealables: &[Address]) -> Result<(), GateSealError> {
    if sealables.len() < MIN_SEALABLES {
        return Err(GateSealError::EmptySealableSet);
    }
    if sealables.len() > MAX_SEALABLES {
        return Err(GateSealError::TooManySealables {
            actual: sealables.len(),
            max: MAX_SEALABLES,
        });
    }
    if let Some(index) = sealables.iter().position(Address::is_zero) {
        return Err(GateSealError::NullSealable { index });
    }

    let mut seen = HashSet::with_capacity(sealables.len());
    for sealable in sealables {
        if !seen.insert(sealable) {
            return Err(GateSealError::DuplicateSealable {
                sealable: *sealable,
            });
        }
    }
    Ok(())
}

pub fn check_lifetime_duration(lifetime_duration: Seconds) -> Result<(), GateSealError> {
    if !(MIN_LIFETIME_DURATION_SECONDS..=MAX_LIFETIME_DURATION_SECONDS).contains(&lifetime_duration)
    {
        return Err(GateSealError::LifetimeDurationOutOfRange {
            actual: lifetime_duration,
            min: MIN_LIFETIME_DURATION_SECONDS,
            max: MAX_LIFETIME_DURATION_SECONDS,
        });
    }
    Ok(())
}

pub fn check_max_prolongations(max_prolongations: u32) -> Result<(), GateSealError> {
    if max_prolongations > MAX_PROLONGATIONS {
        return Err(GateSealError::TooManyProlongations {
            actual: max_prolongations,
            max: MAX_PROLONGATIONS,
        });
    }
    Ok(())
}

/// The window must also fit inside the lifetime it trails, so the effective
/// upper bound is the smaller of the two.
pub fn check_prolongation_window(
    prolongation_window: Seconds,
    lifetime_duration: Seconds,
) -> Result<(), GateSealError> {
    let max = MAX_PROLONGATION_WINDOW_SECONDS.min(lifetime_duration);
    if prolongation_window < MIN_PROLONGATION_WINDOW_SECONDS || prolongation_window > max {
        return Err(GateSealError::ProlongationWindowOutOfRange {
            actual: prolongation_window,
            min: MIN_PROLONGATION_WINDOW_SECONDS,
            max,
        });
    }
    Ok(())
}
