use std::collections::HashSet;
use std::sync::Arc;

use gateseal_types::{Address, ProlongationUsed, Seconds, Sealed, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::environment::SealEnvironment;
use crate::error::GateSealError;
use crate::params::GateSealParams;
use crate::sealable::PausableResource;

/// Lifecycle state, derived from the clock and the stored expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateSealStatus {
    Active,
    /// Terminal: no field changes again and every operation fails.
    Expired,
}

/// Point-in-time view of an instance for observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealSnapshot {
    pub id: Address,
    pub params: GateSealParams,
    pub expiry_timestamp: Timestamp,
    pub prolongations_used: u32,
    pub status: GateSealStatus,
    pub observed_at: Timestamp,
}

impl GateSealSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A time-bounded, single-use right to pause a fixed set of resources.
///
/// The committee may seal (pause a subset of the sealables) exactly once, or
/// prolong the lifetime a bounded number of times inside the trailing window
/// before expiry. Sealing expires the instance immediately.
///
/// Invariants:
/// - configuration never changes after construction
/// - `expiry_timestamp` only grows by exactly `lifetime_duration`, or is
///   pulled down to "now" by a successful seal
/// - `prolongations_used <= max_prolongations`
/// - a failed operation leaves the state untouched and emits nothing
pub struct GateSeal {
    id: Address,
    params: GateSealParams,
    expiry_timestamp: Timestamp,
    prolongations_used: u32,
    env: SealEnvironment,
}

/// Outcome of pausing one resource during a seal.
struct PauseAttempt {
    sealed: bool,
    /// Set whenever `pause_for` returned `Ok`, so an abort knows what to take
    /// back, including extensions of a pause that already existed.
    applied: Option<Arc<dyn PausableResource>>,
}

impl GateSeal {
    /// Construct an instance, validating `params` first.
    ///
    /// Expiry starts at `now + lifetime_duration`.
    pub fn new(
        id: Address,
        params: GateSealParams,
        env: SealEnvironment,
    ) -> Result<Self, GateSealError> {
        params.validate()?;

        let now = env.now();
        let expiry_timestamp = now
            .checked_add(params.lifetime_duration)
            .ok_or(GateSealError::ExpiryOverflow)?;

        info!(
            gate_seal = %id,
            committee = %params.committee,
            sealables = params.sealables.len(),
            expiry = expiry_timestamp,
            "GateSeal constructed"
        );

        Ok(Self {
            id,
            params,
            expiry_timestamp,
            prolongations_used: 0,
            env,
        })
    }

    /// Pause `subset` of the sealables and expire the instance.
    ///
    /// Every resource is asked to pause for `seal_duration`, in the given order,
    /// and each pause is confirmed by observing `is_paused()` afterwards. If any
    /// resource fails, the whole seal is aborted: pauses applied by this call
    /// are undone where the resource allows it, the state is untouched, nothing
    /// is emitted, and the failed indices are reported highest first.
    pub fn seal(
        &mut self,
        caller: &Address,
        subset: &[Address],
    ) -> Result<Vec<Sealed>, GateSealError> {
        self.ensure_committee(caller)?;

        let now = self.env.now();
        if self.is_expired_at(now) {
            return Err(GateSealError::Expired);
        }
        self.check_subset(subset)?;

        let mut failed = Vec::new();
        let mut applied = Vec::new();
        for (index, sealable) in subset.iter().enumerate() {
            let attempt = self.attempt_pause(sealable);
            if let Some(resource) = attempt.applied {
                applied.push((*sealable, resource));
            }
            if !attempt.sealed {
                failed.push(index);
            }
        }

        if !failed.is_empty() {
            failed.reverse();
            warn!(
                gate_seal = %self.id,
                failed = ?failed,
                "Seal aborted: not every resource confirmed paused"
            );
            self.compensate(applied);
            return Err(GateSealError::SealFailure(failed));
        }

        self.expiry_timestamp = now;

        let records: Vec<Sealed> = subset
            .iter()
            .map(|resource| Sealed {
                capability_id: self.id,
                committee: self.params.committee,
                seal_duration: self.params.seal_duration,
                resource: *resource,
                timestamp: now,
            })
            .collect();
        for record in &records {
            self.env.events.emit(record.clone().into());
        }

        info!(
            gate_seal = %self.id,
            sealed = records.len(),
            at = now,
            "GateSeal sealed and expired"
        );

        Ok(records)
    }

    /// Push expiry forward by one lifetime, consuming one prolongation.
    ///
    /// Only legal in `[expiry - prolongation_window, expiry)`.
    pub fn prolong_lifetime(&mut self, caller: &Address) -> Result<ProlongationUsed, GateSealError> {
        self.ensure_committee(caller)?;

        let now = self.env.now();
        if self.is_expired_at(now) {
            return Err(GateSealError::Expired);
        }
        if self.prolongations_used >= self.params.max_prolongations {
            return Err(GateSealError::ProlongationsExhausted);
        }
        let window_opens_at = self.window_opens_at();
        if now < window_opens_at {
            return Err(GateSealError::TooEarly { window_opens_at });
        }
        let new_expiry = self
            .expiry_timestamp
            .checked_add(self.params.lifetime_duration)
            .ok_or(GateSealError::ExpiryOverflow)?;

        self.expiry_timestamp = new_expiry;
        self.prolongations_used += 1;

        let record = ProlongationUsed {
            capability_id: self.id,
            new_expiry,
            prolongations_remaining: self.prolongations_remaining(),
        };
        self.env.events.emit(record.clone().into());

        info!(
            gate_seal = %self.id,
            new_expiry,
            remaining = record.prolongations_remaining,
            "GateSeal lifetime prolonged"
        );

        Ok(record)
    }

    fn ensure_committee(&self, caller: &Address) -> Result<(), GateSealError> {
        if *caller != self.params.committee {
            warn!(gate_seal = %self.id, caller = %caller, "Unauthorized caller rejected");
            return Err(GateSealError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn check_subset(&self, subset: &[Address]) -> Result<(), GateSealError> {
        if subset.is_empty() {
            return Err(GateSealError::EmptySubset);
        }

        let mut seen = HashSet::with_capacity(subset.len());
        for sealable in subset {
            if !seen.insert(sealable) {
                return Err(GateSealError::DuplicateEntry {
                    sealable: *sealable,
                });
            }
        }

        let registered: HashSet<&Address> = self.params.sealables.iter().collect();
        if let Some(stranger) = subset.iter().find(|s| !registered.contains(s)) {
            return Err(GateSealError::NotASealable {
                sealable: *stranger,
            });
        }
        Ok(())
    }

    /// A resource counts as sealed only if its pause call succeeded and a
    /// fresh observation afterwards reports it paused.
    fn attempt_pause(&self, sealable: &Address) -> PauseAttempt {
        let Some(resource) = self.env.directory.resolve(sealable) else {
            debug!(sealable = %sealable, "Sealable did not resolve to a resource");
            return PauseAttempt {
                sealed: false,
                applied: None,
            };
        };

        match resource.pause_for(self.params.seal_duration) {
            Ok(()) => {
                let confirmed = matches!(resource.is_paused(), Ok(true));
                debug!(sealable = %sealable, confirmed, "Pause call succeeded");
                PauseAttempt {
                    sealed: confirmed,
                    applied: Some(resource),
                }
            }
            Err(e) => {
                debug!(sealable = %sealable, error = %e, "Pause call failed");
                PauseAttempt {
                    sealed: false,
                    applied: None,
                }
            }
        }
    }

    /// Take back pauses applied during an aborted seal, newest first.
    fn compensate(&self, applied: Vec<(Address, Arc<dyn PausableResource>)>) {
        for (sealable, resource) in applied.into_iter().rev() {
            if let Err(e) = resource.undo_pause() {
                warn!(
                    gate_seal = %self.id,
                    sealable = %sealable,
                    error = %e,
                    "Could not undo pause of aborted seal"
                );
            }
        }
    }

    fn window_opens_at(&self) -> Timestamp {
        self.expiry_timestamp
            .saturating_sub(self.params.prolongation_window)
    }

    fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expiry_timestamp
    }

    // --- Read accessors ---

    pub fn id(&self) -> Address {
        self.id
    }

    pub fn params(&self) -> &GateSealParams {
        &self.params
    }

    pub fn committee(&self) -> Address {
        self.params.committee
    }

    pub fn seal_duration(&self) -> Seconds {
        self.params.seal_duration
    }

    pub fn sealables(&self) -> &[Address] {
        &self.params.sealables
    }

    pub fn lifetime_duration(&self) -> Seconds {
        self.params.lifetime_duration
    }

    pub fn max_prolongations(&self) -> u32 {
        self.params.max_prolongations
    }

    pub fn prolongation_window(&self) -> Seconds {
        self.params.prolongation_window
    }

    pub fn expiry_timestamp(&self) -> Timestamp {
        self.expiry_timestamp
    }

    pub fn prolongations_used(&self) -> u32 {
        self.prolongations_used
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(self.env.now())
    }

    pub fn status(&self) -> GateSealStatus {
        if self.is_expired() {
            GateSealStatus::Expired
        } else {
            GateSealStatus::Active
        }
    }

    pub fn prolongations_remaining(&self) -> u32 {
        self.params.max_prolongations - self.prolongations_used
    }

    /// Would `prolong_lifetime` by the committee succeed right now, overflow aside?
    pub fn can_prolong(&self) -> bool {
        let now = self.env.now();
        !self.is_expired_at(now)
            && self.prolongations_remaining() > 0
            && now >= self.window_opens_at()
    }

    pub fn time_until_expiry(&self) -> Seconds {
        self.expiry_timestamp.saturating_sub(self.env.now())
    }

    pub fn snapshot(&self) -> GateSealSnapshot {
        let observed_at = self.env.now();
        GateSealSnapshot {
            id: self.id,
            params: self.params.clone(),
            expiry_timestamp: self.expiry_timestamp,
            prolongations_used: self.prolongations_used,
            status: if self.is_expired_at(observed_at) {
                GateSealStatus::Expired
            } else {
                GateSealStatus::Active
            },
            observed_at,
        }
    }
}

impl std::fmt::Debug for GateSeal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateSeal")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("expiry_timestamp", &self.expiry_timestamp)
            .field("prolongations_used", &self.prolongations_used)
            .finish_non_exhaustive()
    }
}
