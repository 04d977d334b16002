//! Fire-and-forget presentation requests (sounds, particles, montages, widgets) that
//! gameplay emits for the host to play.

use engine_core::{Entity, Transform, Vec3};

use crate::combat::CombatState;

/// Montage section that starts the hip-fire animation.
pub const HIP_FIRE_SECTION: &str = "StartFire";

/// Animation montages the character plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Montage {
    HipFire,
    Reload,
}

/// One presentation request, queued in the order gameplay produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// A shot was accepted; play the weapon's fire cue.
    FireSound,
    /// Muzzle flash at the barrel socket.
    MuzzleFlash { at: Transform },
    /// Impact particles where the beam ended on a surface.
    Impact { location: Vec3 },
    /// Smoke beam from the barrel socket to `target`.
    Beam { from: Transform, target: Vec3 },
    /// Play `montage` and jump to `section`.
    PlayMontage { montage: Montage, section: String },
    /// Show or hide an item's pickup widget.
    PickupWidget { item: Entity, visible: bool },
    /// An item was selected for pickup.
    PickupSound { item: Entity },
    /// An item finished its pickup and is being equipped.
    EquipSound { item: Entity },
    /// A weapon is now held in the right hand socket.
    WeaponEquipped { weapon: Entity },
    /// A weapon left the hand and is falling.
    WeaponDropped { weapon: Entity },
    /// Combat state moved between values.
    StateChanged { from: CombatState, to: CombatState },
}

/// Ordered queue of events waiting for the host.
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    events: Vec<CombatEvent>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Take everything queued so far, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
