//! GateSeal: a time-bounded, single-use emergency pause capability.
//!
//! A committee holds the right to pause a fixed set of resources for a fixed
//! duration, exactly once, before the instance expires. The committee may also
//! push expiry forward a bounded number of times, but only inside a trailing
//! window before the current expiry.
//!
//! ## Guarantees
//!
//! - **Validated construction**: every instance satisfies the construction
//!   bounds in [`validator`]; an invalid parameter set never yields an instance.
//! - **Single use**: a successful seal expires the instance in the same step.
//!   Expired is terminal.
//! - **All-or-nothing seal**: a seal either pauses and confirms every requested
//!   resource, or aborts with no state change and no emitted record.
//! - **Fail-closed confirmation**: a resource counts as sealed only if its pause
//!   call succeeded *and* a fresh `is_paused()` observation reports it paused.
//! - **Bounded prolongation**: at most `max_prolongations` renewals, each
//!   exactly one `lifetime_duration`, each inside the prolongation window.
//!
//! ## Layout
//!
//! - [`validator`]: construction-bound checks
//! - [`gate_seal`]: the instance state machine
//! - [`shared`]: serialized, re-entrancy-safe handle over an instance
//! - [`sealable`]: pausable resource interface and directory
//! - [`environment`]: clock, directory and event sink bundle
//! - [`mocks`]: test doubles for pausable resources

pub mod clock;
pub mod environment;
pub mod error;
pub mod gate_seal;
pub mod mocks;
pub mod params;
pub mod sealable;
pub mod shared;
pub mod sink;
pub mod validator;

pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use environment::SealEnvironment;
pub use error::{ConfigError, GateSealError, ResourceError};
pub use gate_seal::{GateSeal, GateSealSnapshot, GateSealStatus};
pub use mocks::{MockFixture, PauseBehavior, ReentrantSealable, SealableMock};
pub use params::GateSealParams;
pub use sealable::{PausableResource, SealableDirectory, SealableRegistry};
pub use shared::{SharedGateSeal, WeakGateSeal};
pub use sink::{EventSink, MemoryEventLog, TracingEventSink};
pub use validator::validate_params;
