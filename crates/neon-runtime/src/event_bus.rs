//! Queue of host events collected between frames

use crate::event::HostEvent;

/// Hosts push events as they arrive; the driver drains them before each frame.
///
/// Only the latest viewport size matters, so a pending `Resize` is replaced
/// by a newer one. Pointer samples are never merged: spark spawning needs
/// the distance between every consecutive pair.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<HostEvent>,
    coalesced: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HostEvent) {
        if let HostEvent::Resize { .. } = event {
            if let Some(pos) = self
                .events
                .iter()
                .position(|e| matches!(e, HostEvent::Resize { .. }))
            {
                self.events.remove(pos);
                self.coalesced += 1;
            }
        }
        self.events.push(event);
    }

    /// Take pending events in arrival order
    pub fn drain(&mut self) -> std::vec::Drain<'_, HostEvent> {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Resize events dropped in favor of a newer one
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
