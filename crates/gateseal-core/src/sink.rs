//! Event sinks for emitted GateSeal records.

use gateseal_types::{GateSealEvent, Sealed};
use parking_lot::RwLock;
use tracing::info;

/// Receives records emitted by GateSeal instances and factories.
///
/// Records are only emitted for committed operations; an aborted seal emits nothing.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: GateSealEvent);
}

/// In-memory event log for observers and tests.
#[derive(Default)]
pub struct MemoryEventLog {
    events: RwLock<Vec<GateSealEvent>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all events, oldest first.
    pub fn events(&self) -> Vec<GateSealEvent> {
        self.events.read().clone()
    }

    /// Only the `Sealed` records, oldest first.
    pub fn sealed(&self) -> Vec<Sealed> {
        self.events
            .read()
            .iter()
            .filter_map(|e| e.as_sealed().cloned())
            .collect()
    }

    /// Number of events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.read().iter().filter(|e| e.name() == name).count()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventSink for MemoryEventLog {
    fn emit(&self, event: GateSealEvent) {
        self.events.write().push(event);
    }
}

/// Writes every record as a structured log line.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: GateSealEvent) {
        match event.to_json() {
            Ok(payload) => info!(event = event.name(), %payload, "GateSeal record emitted"),
            Err(e) => info!(event = event.name(), error = %e, "GateSeal record emitted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateseal_types::{Address, GateSealCreated};

    fn sealed(resource: &[u8]) -> GateSealEvent {
        Sealed {
            capability_id: Address::derive(b"gate"),
            committee: Address::derive(b"committee"),
            seal_duration: 1,
            resource: Address::derive(resource),
            timestamp: 0,
        }
        .into()
    }

    #[test]
    fn memory_log_keeps_order() {
        let log = MemoryEventLog::new();
        log.emit(sealed(b"a"));
        log.emit(
            GateSealCreated {
                new_instance_id: Address::derive(b"x"),
            }
            .into(),
        );
        log.emit(sealed(b"b"));

        assert_eq!(log.len(), 3);
        assert_eq!(log.count("Sealed"), 2);
        assert_eq!(log.count("GateSealCreated"), 1);

        let sealed = log.sealed();
        assert_eq!(sealed[0].resource, Address::derive(b"a"));
        assert_eq!(sealed[1].resource, Address::derive(b"b"));
    }

    #[test]
    fn clear_empties_log() {
        let log = MemoryEventLog::new();
        log.emit(sealed(b"a"));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn tracing_sink_accepts_events() {
        TracingEventSink.emit(sealed(b"a"));
    }
}
