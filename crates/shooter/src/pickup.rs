//! Pickup candidate tracking: which item the crosshair is resting on, and keeping its
//! pickup widget visible while it stays there.

use engine_core::Entity;

use crate::effects::{CombatEvent, EffectQueue};
use crate::host::{trace_from_crosshair, HostWorld, TraceHit};

/// Current and previous-frame pickup candidates plus the overlap gate that enables tracing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickupTracker {
    /// Item pickup spheres the character is standing in.
    overlapped_item_count: u32,
    should_trace: bool,
    current: Option<Entity>,
    previous: Option<Entity>,
}

impl PickupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the overlap count when entering (+1) or leaving (-1) an item's pickup area.
    /// Tracing stays enabled while the count is positive.
    pub fn increment_overlapped_item_count(&mut self, delta: i32) {
        let next = self.overlapped_item_count as i64 + delta as i64;
        if next <= 0 {
            self.overlapped_item_count = 0;
            self.should_trace = false;
        } else {
            self.overlapped_item_count = next.min(u32::MAX as i64) as u32;
            self.should_trace = true;
        }
    }

    pub fn overlapped_item_count(&self) -> u32 {
        self.overlapped_item_count
    }

    pub fn should_trace_for_items(&self) -> bool {
        self.should_trace
    }

    /// The item under the crosshair this frame, if any.
    pub fn current(&self) -> Option<Entity> {
        self.current
    }

    /// Trace from the crosshair when tracing is enabled and feed the result to `update`.
    pub fn trace<H: HostWorld + ?Sized>(&mut self, host: &H, effects: &mut EffectQueue) {
        let hit = if self.should_trace {
            trace_from_crosshair(host).and_then(|t| t.hit)
        } else {
            None
        };
        self.update(hit, effects);
    }

    /// Apply this frame's crosshair hit.
    ///
    /// A frame without a blocking hit leaves the candidates as they were. When tracing is
    /// off, the last candidate's widget is hidden and both slots are cleared.
    pub fn update(&mut self, hit: Option<TraceHit>, effects: &mut EffectQueue) {
        if !self.should_trace {
            if let Some(previous) = self.previous.take() {
                effects.push(CombatEvent::PickupWidget {
                    item: previous,
                    visible: false,
                });
            }
            self.current = None;
            return;
        }

        let Some(hit) = hit else {
            return;
        };

        self.current = hit.item;
        if self.current != self.previous {
            if let Some(previous) = self.previous {
                effects.push(CombatEvent::PickupWidget {
                    item: previous,
                    visible: false,
                });
            }
            if let Some(current) = self.current {
                effects.push(CombatEvent::PickupWidget {
                    item: current,
                    visible: true,
                });
            }
        }
        self.previous = self.current;
    }

    /// Forget every overlap and hide any visible widget.
    pub fn reset(&mut self, effects: &mut EffectQueue) {
        self.overlapped_item_count = 0;
        self.should_trace = false;
        self.update(None, effects);
    }

    /// Select the current candidate for pickup. Both slots are cleared so the item is not
    /// traced again while it flies to the camera.
    pub fn select(&mut self, effects: &mut EffectQueue) -> Option<Entity> {
        let item = self.current.take()?;
        self.previous = None;
        log::info!("selected item {:?} for pickup", item);
        effects.push(CombatEvent::PickupSound { item });
        Some(item)
    }
}
