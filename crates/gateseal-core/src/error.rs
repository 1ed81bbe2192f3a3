use gateseal_types::{Address, Seconds, Timestamp};
use thiserror::Error;

/// Errors from GateSeal construction, sealing, prolongation and provisioning.
///
/// Every failure is reported to the caller of the operation that triggered it.
/// Nothing is retried internally and a failed operation leaves no trace in the
/// instance state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateSealError {
    // --- Construction ---
    #[error("committee cannot be the zero address")]
    InvalidCommittee,

    #[error("seal duration {actual}s outside allowed range [{min}s, {max}s]")]
    SealDurationOutOfRange {
        actual: Seconds,
        min: Seconds,
        max: Seconds,
    },

    #[error("sealables: empty list")]
    EmptySealableSet,

    #[error("sealables: {actual} entries exceed the maximum of {max}")]
    TooManySealables { actual: usize, max: usize },

    #[error("sealables: zero address at index {index}")]
    NullSealable { index: usize },

    #[error("sealables: duplicate entry {sealable}")]
    DuplicateSealable { sealable: Address },

    #[error("lifetime duration {actual}s outside allowed range [{min}s, {max}s]")]
    LifetimeDurationOutOfRange {
        actual: Seconds,
        min: Seconds,
        max: Seconds,
    },

    #[error("too many prolongations: {actual} exceeds the maximum of {max}")]
    TooManyProlongations { actual: u32, max: u32 },

    #[error("prolongation window {actual}s outside allowed range [{min}s, {max}s]")]
    ProlongationWindowOutOfRange {
        actual: Seconds,
        min: Seconds,
        max: Seconds,
    },

    // --- Authorization and lifecycle ---
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    #[error("gate seal: expired")]
    Expired,

    #[error("re-entrant call into gate seal rejected")]
    ReentrantCall,

    // --- Seal ---
    #[error("sealables: empty subset")]
    EmptySubset,

    #[error("sealables: subset includes duplicate {sealable}")]
    DuplicateEntry { sealable: Address },

    #[error("sealables: {sealable} is not a sealable")]
    NotASealable { sealable: Address },

    #[error("failed sealable indexes: {}", join_indices(.0))]
    SealFailure(Vec<usize>),

    // --- Prolongation ---
    #[error("prolongations: exhausted")]
    ProlongationsExhausted,

    #[error("prolongation window opens at {window_opens_at}")]
    TooEarly { window_opens_at: Timestamp },

    #[error("expiry: overflow")]
    ExpiryOverflow,

    // --- Provisioning ---
    #[error("invalid template: {0}")]
    InvalidTemplate(Address),

    #[error("factory: no default parameters configured")]
    MissingDefaults,
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Faults reported by a pausable resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("resource call reverted: {0}")]
    Reverted(String),

    #[error("pause cannot be undone")]
    Irreversible,
}

/// Errors from loading GateSeal configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config rejected: {0}")]
    Invalid(#[from] GateSealError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_failure_lists_indices_in_given_order() {
        let err = GateSealError::SealFailure(vec![5, 3, 1]);
        assert_eq!(err.to_string(), "failed sealable indexes: 5, 3, 1");
    }

    #[test]
    fn error_display() {
        let err = GateSealError::TooManySealables { actual: 9, max: 8 };
        let s = err.to_string();
        assert!(s.contains('9'));
        assert!(s.contains('8'));

        assert_eq!(GateSealError::Expired.to_string(), "gate seal: expired");
        assert!(ResourceError::Reverted("paused".into())
            .to_string()
            .contains("paused"));
    }

    #[test]
    fn config_error_wraps_validation_failure() {
        let err: ConfigError = GateSealError::InvalidCommittee.into();
        assert!(err.to_string().contains("zero address"));
    }
}
