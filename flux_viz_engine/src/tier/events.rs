//! Engine event schema and the subscriber registry.
//!
//! The registry is a `SlotMap<SubscriberKey, Subscriber>`: the key gives
//! callers a stable "unregister handle" for free, since removing a slot
//! map entry by key is O(1) and the key stays otherwise meaningless to
//! the caller.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::model::Real;
use crate::surface::Tier;

new_key_type! {
    /// Stable handle returned by `TierEngine::subscribe`; dropping it does
    /// nothing on its own, the caller must pass it to `unsubscribe`.
    pub struct SubscriberKey;
}

/// Why a `TierSwitch` event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierSwitchReason {
    Density,
    Performance,
    Manual,
    Fallback,
}

/// Events emitted by the tier engine. Subscribers receive these in
/// arrival order; a `TierSwitch` always precedes the first render on the
/// new tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    TierSwitch {
        from: Tier,
        to: Tier,
        reason: TierSwitchReason,
        density: Real,
        avg_frame_time: Real,
    },
    LODChange {
        level: u8,
    },
    PerformanceViolation {
        consecutive_dropped: usize,
    },
    Error {
        message: String,
    },
}

/// A registered subscriber. Handler failures are caught by the dispatch
/// loop and turned into an `EngineEvent::Error`, never propagated further.
pub struct Subscriber {
    pub handler: Box<dyn FnMut(&EngineEvent)>,
}

/// Typed event bus: subscribers register once and receive a
/// deliver-in-order stream; unregistering is dropping the slot map entry.
#[derive(Default)]
pub struct EventBus {
    subscribers: SlotMap<SubscriberKey, Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { subscribers: SlotMap::with_key() }
    }

    pub fn subscribe(&mut self, handler: Box<dyn FnMut(&EngineEvent)>) -> SubscriberKey {
        self.subscribers.insert(Subscriber { handler })
    }

    pub fn unsubscribe(&mut self, key: SubscriberKey) -> bool {
        self.subscribers.remove(key).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `event` to every subscriber in registration order. A
    /// subscriber that panics is caught and turned into a single follow-up
    /// `Error` event rather than unwinding past the other subscribers.
    /// The follow-up is delivered through `dispatch_inner` directly, so a
    /// subscriber that panics on every event (including the follow-up
    /// itself) still only ever faults once per original `dispatch` call.
    pub fn dispatch(&mut self, event: &EngineEvent) {
        let faulted = self.dispatch_inner(event);
        if faulted > 0 {
            self.dispatch_inner(&EngineEvent::Error {
                message: format!("{} event subscriber(s) faulted handling an event", faulted),
            });
        }
    }

    fn dispatch_inner(&mut self, event: &EngineEvent) -> usize {
        let mut faulted = 0usize;
        for (key, subscriber) in self.subscribers.iter_mut() {
            let handler = std::panic::AssertUnwindSafe(&mut subscriber.handler);
            if std::panic::catch_unwind(move || {
                let handler = handler;
                (handler.0)(event)
            })
            .is_err()
            {
                crate::flux_warn!("flux::tier::events", "event subscriber {:?} faulted, continuing", key);
                faulted += 1;
            }
        }
        faulted
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
