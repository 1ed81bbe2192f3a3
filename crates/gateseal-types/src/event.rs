use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::time::{Seconds, Timestamp};

/// One resource was sealed by a GateSeal.
///
/// A successful seal emits one of these per resource, in the order the
/// committee listed them. A failed seal emits none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sealed {
    pub capability_id: Address,
    pub committee: Address,
    pub seal_duration: Seconds,
    pub resource: Address,
    pub timestamp: Timestamp,
}

/// The committee consumed one prolongation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProlongationUsed {
    pub capability_id: Address,
    pub new_expiry: Timestamp,
    pub prolongations_remaining: u32,
}

/// A factory provisioned a new GateSeal instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealCreated {
    pub new_instance_id: Address,
}

/// Records emitted for external observers and indexers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GateSealEvent {
    Sealed(Sealed),
    ProlongationUsed(ProlongationUsed),
    GateSealCreated(GateSealCreated),
}

impl GateSealEvent {
    /// Stable event name, as indexers see it.
    pub fn name(&self) -> &'static str {
        match self {
            GateSealEvent::Sealed(_) => "Sealed",
            GateSealEvent::ProlongationUsed(_) => "ProlongationUsed",
            GateSealEvent::GateSealCreated(_) => "GateSealCreated",
        }
    }

    pub fn as_sealed(&self) -> Option<&Sealed> {
        match self {
            GateSealEvent::Sealed(sealed) => Some(sealed),
            _ => None,
        }
    }

    /// Serialize to a JSON object tagged with the event name.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Sealed> for GateSealEvent {
    fn from(event: Sealed) -> Self {
        GateSealEvent::Sealed(event)
    }
}

impl From<ProlongationUsed> for GateSealEvent {
    fn from(event: ProlongationUsed) -> Self {
        GateSealEvent::ProlongationUsed(event)
    }
}

impl From<GateSealCreated> for GateSealEvent {
    fn from(event: GateSealCreated) -> Self {
        GateSealEvent::GateSealCreated(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        let created: GateSealEvent = GateSealCreated {
            new_instance_id: Address::derive(b"instance"),
        }
        .into();
        assert_eq!(created.name(), "GateSealCreated");
        assert!(created.as_sealed().is_none());
    }

    #[test]
    fn json_is_tagged_with_event_name() {
        let event: GateSealEvent = Sealed {
            capability_id: Address::derive(b"gate"),
            committee: Address::derive(b"committee"),
            seal_duration: 604_800,
            resource: Address::derive(b"resource"),
            timestamp: 1_700_000_000,
        }
        .into();

        let json = event.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "Sealed");
        assert_eq!(value["seal_duration"], 604_800);
        assert_eq!(
            value["resource"],
            Address::derive(b"resource").to_string().as_str()
        );

        let restored: GateSealEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}
