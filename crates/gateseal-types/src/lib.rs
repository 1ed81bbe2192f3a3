//! Core type definitions for GateSeal.
//!
//! This crate provides the shared vocabulary of the GateSeal crates. No business
//! logic, only identities, time units, construction bounds and the records an
//! instance or factory emits for observers.

pub mod address;
pub mod event;
pub mod limits;
pub mod time;

// Re-export primary types at crate root for ergonomic use.
pub use address::{Address, AddressParseError, ADDRESS_LEN};
pub use event::{GateSealCreated, GateSealEvent, ProlongationUsed, Sealed};
pub use limits::{
    MAX_LIFETIME_DURATION_SECONDS, MAX_PROLONGATIONS, MAX_PROLONGATION_WINDOW_SECONDS,
    MAX_SEALABLES, MAX_SEAL_DURATION_SECONDS, MIN_LIFETIME_DURATION_SECONDS,
    MIN_PROLONGATION_WINDOW_SECONDS, MIN_SEALABLES, MIN_SEAL_DURATION_SECONDS,
};
pub use time::{Seconds, Timestamp, SECONDS_PER_DAY, SECONDS_PER_WEEK};
