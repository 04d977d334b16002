//! Ammo types and the per-type reserve ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kinds of ammunition a weapon can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmmoType {
    NineMillimeter,
    AssaultRifle,
}

/// Reserve ammo carried by a character, separate from any weapon's loaded magazine.
///
/// Only seeded at spawn and drawn down by reloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmmoLedger {
    counts: HashMap<AmmoType, u32>,
}

impl AmmoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with starting amounts. Later entries for the same type win.
    pub fn with_starting(amounts: &[(AmmoType, u32)]) -> Self {
        let mut ledger = Self::new();
        for &(ammo_type, count) in amounts {
            ledger.counts.insert(ammo_type, count);
        }
        ledger
    }

    /// Carried count for `ammo_type`, or `None` if the type has no entry.
    pub fn get(&self, ammo_type: AmmoType) -> Option<u32> {
        self.counts.get(&ammo_type).copied()
    }

    /// Whether any rounds of `ammo_type` are carried.
    pub fn is_carrying(&self, ammo_type: AmmoType) -> bool {
        self.get(ammo_type).is_some_and(|n| n > 0)
    }

    /// Remove up to `wanted` rounds of `ammo_type` and return how many were taken.
    pub fn withdraw(&mut self, ammo_type: AmmoType, wanted: u32) -> u32 {
        match self.counts.get_mut(&ammo_type) {
            Some(count) => {
                let taken = wanted.min(*count);
                *count -= taken;
                taken
            }
            None => 0,
        }
    }

    /// Iterate over every entry.
    pub fn iter(&self) -> impl Iterator<Item = (AmmoType, u32)> + '_ {
        self.counts.iter().map(|(t, n)| (*t, *n))
    }
}
