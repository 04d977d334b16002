//! Combat state machine: fire-rate gating, automatic fire, reload sequencing and ammo
//! bookkeeping for the equipped weapon.
//!
//! Every guard is a silent no-op. A fire request while busy is dropped rather than
//! queued, and a reload without carried ammo simply does not start.

use engine_core::{Transform, TimerManager};

use crate::ammo::{AmmoLedger, AmmoType};
use crate::config::CombatConfig;
use crate::effects::{CombatEvent, EffectQueue, Montage, HIP_FIRE_SECTION};
use crate::host::{trace_from_barrel, HostWorld, BARREL_SOCKET};
use crate::weapon::{ItemState, Weapon};

/// What the character's hands are busy with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CombatState {
    #[default]
    Unoccupied,
    /// A shot was just accepted and the weapon is cooling down.
    FireRateTimerInProgress,
    /// A reload montage is playing; ends when the host signals `finish_reload`.
    Reloading,
}

/// Timers the controller schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTimer {
    /// Cooldown between automatic shots.
    FireRate,
    /// Keeps the crosshair shooting factor active after a shot.
    CrosshairShot,
}

/// Owns combat state, the equipped weapon and the reserve ammo ledger.
#[derive(Debug, Clone)]
pub struct CombatController {
    state: CombatState,
    weapon: Option<Weapon>,
    ammo: AmmoLedger,
    fire_button_pressed: bool,
    /// Crosshair shooting factor is active.
    firing_bullet: bool,
    /// Where the clip bone was when the off hand grabbed it.
    clip_transform: Option<Transform>,
    automatic_fire_rate: f32,
    crosshair_shooting_duration: f32,
    timers: TimerManager<CombatTimer>,
    effects: EffectQueue,
}

impl CombatController {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            state: CombatState::Unoccupied,
            weapon: None,
            ammo: AmmoLedger::with_starting(&config.starting_ammo),
            fire_button_pressed: false,
            firing_bullet: false,
            clip_transform: None,
            automatic_fire_rate: config.automatic_fire_rate,
            crosshair_shooting_duration: config.crosshair_shooting_duration,
            timers: TimerManager::new(),
            effects: EffectQueue::new(),
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn ammo(&self) -> &AmmoLedger {
        &self.ammo
    }

    /// Reserve rounds carried for `ammo_type`.
    pub fn carried_ammo(&self, ammo_type: AmmoType) -> u32 {
        self.ammo.get(ammo_type).unwrap_or(0)
    }

    pub fn is_fire_button_pressed(&self) -> bool {
        self.fire_button_pressed
    }

    /// Whether a recent shot should still widen the crosshair.
    pub fn is_firing_bullet(&self) -> bool {
        self.firing_bullet
    }

    pub fn clip_transform(&self) -> Option<Transform> {
        self.clip_transform
    }

    pub fn timers(&self) -> &TimerManager<CombatTimer> {
        &self.timers
    }

    pub fn effects_mut(&mut self) -> &mut EffectQueue {
        &mut self.effects
    }

    /// Take every presentation event produced since the last drain.
    pub fn drain_effects(&mut self) -> Vec<CombatEvent> {
        self.effects.drain()
    }

    fn set_state(&mut self, to: CombatState) {
        if self.state == to {
            return;
        }
        log::debug!("combat state {:?} -> {:?}", self.state, to);
        self.effects.push(CombatEvent::StateChanged {
            from: self.state,
            to,
        });
        self.state = to;
    }

    // ── Equipment ─────────────────────────────────────────────────────────

    /// Put `weapon` in hand. Anything already held is dropped first and returned.
    pub fn equip_weapon(&mut self, mut weapon: Weapon) -> Option<Weapon> {
        let dropped = self.drop_weapon();
        weapon.set_item_state(ItemState::Equipped);
        log::info!("equipped {:?} ({})", weapon.weapon_type, weapon.ammo_display());
        self.effects.push(CombatEvent::WeaponEquipped { weapon: weapon.id });
        self.weapon = Some(weapon);
        dropped
    }

    /// Let go of the equipped weapon; it starts falling and ownership passes to the caller.
    ///
    /// Dropping mid-reload returns to `Unoccupied`; that reload's completion signal then
    /// arrives outside `Reloading` and is ignored.
    pub fn drop_weapon(&mut self) -> Option<Weapon> {
        let mut weapon = self.weapon.take()?;
        weapon.set_item_state(ItemState::Falling);
        weapon.set_moving_clip(false);
        if self.state == CombatState::Reloading {
            log::debug!("reload interrupted by dropping {:?}", weapon.weapon_type);
            self.set_state(CombatState::Unoccupied);
        }
        log::info!("dropped {:?}", weapon.weapon_type);
        self.effects.push(CombatEvent::WeaponDropped { weapon: weapon.id });
        Some(weapon)
    }

    /// Drop the held weapon and equip `weapon` in its place.
    pub fn swap_weapon(&mut self, weapon: Weapon) -> Option<Weapon> {
        let dropped = self.drop_weapon();
        self.equip_weapon(weapon);
        dropped
    }

    fn weapon_has_ammo(&self) -> bool {
        self.weapon.as_ref().is_some_and(Weapon::has_ammo)
    }

    /// Whether reserve ammo matching the equipped weapon is carried.
    pub fn is_carrying_ammo(&self) -> bool {
        self.weapon
            .as_ref()
            .is_some_and(|w| self.ammo.is_carrying(w.ammo_type()))
    }

    // ── Firing ────────────────────────────────────────────────────────────

    pub fn fire_button_pressed<H: HostWorld + ?Sized>(&mut self, host: &H) {
        self.fire_button_pressed = true;
        self.request_fire(host);
    }

    pub fn fire_button_released(&mut self) {
        self.fire_button_pressed = false;
    }

    /// Fire one round if a loaded weapon is held and the hands are free.
    ///
    /// Returns true when a shot was taken.
    pub fn request_fire<H: HostWorld + ?Sized>(&mut self, host: &H) -> bool {
        if self.weapon.is_none() || self.state != CombatState::Unoccupied {
            return false;
        }
        if !self.weapon_has_ammo() {
            return false;
        }

        self.effects.push(CombatEvent::FireSound);
        self.send_bullet(host);
        self.effects.push(CombatEvent::PlayMontage {
            montage: Montage::HipFire,
            section: HIP_FIRE_SECTION.to_string(),
        });

        if let Some(weapon) = self.weapon.as_mut() {
            weapon.decrement_ammo();
        }

        self.firing_bullet = true;
        self.timers
            .set(CombatTimer::CrosshairShot, self.crosshair_shooting_duration);

        self.set_state(CombatState::FireRateTimerInProgress);
        self.timers.set(CombatTimer::FireRate, self.automatic_fire_rate);
        true
    }

    fn send_bullet<H: HostWorld + ?Sized>(&mut self, host: &H) {
        let Some(weapon) = self.weapon.as_ref() else {
            return;
        };
        let Some(socket) = host.socket_transform(weapon.id, BARREL_SOCKET) else {
            return;
        };
        self.effects.push(CombatEvent::MuzzleFlash { at: socket });

        if let Some(beam) = trace_from_barrel(host, socket.position) {
            if beam.blocked {
                self.effects.push(CombatEvent::Impact { location: beam.end });
                self.effects.push(CombatEvent::Beam {
                    from: socket,
                    target: beam.end,
                });
            }
        }
    }

    fn fire_rate_timer_reset<H: HostWorld + ?Sized>(&mut self, host: &H) {
        if self.state != CombatState::FireRateTimerInProgress {
            return;
        }
        self.set_state(CombatState::Unoccupied);

        if self.weapon_has_ammo() {
            if self.fire_button_pressed {
                self.request_fire(host);
            }
        } else {
            self.request_reload();
        }
    }

    // ── Reloading ─────────────────────────────────────────────────────────

    /// Start a reload if the hands are free and matching reserve ammo is carried.
    ///
    /// Returns true when the reload montage was started.
    pub fn request_reload(&mut self) -> bool {
        if self.state != CombatState::Unoccupied {
            return false;
        }
        if !self.is_carrying_ammo() {
            return false;
        }
        let Some(weapon) = self.weapon.as_ref() else {
            return false;
        };

        let section = weapon.reload_montage_section().to_string();
        self.set_state(CombatState::Reloading);
        self.effects.push(CombatEvent::PlayMontage {
            montage: Montage::Reload,
            section,
        });
        true
    }

    /// Animation-completion signal for the reload montage.
    ///
    /// Returns to `Unoccupied`, then moves `min(carried, magazine space)` rounds from the
    /// ledger into the equipped weapon. A signal that arrives outside `Reloading` belongs
    /// to a reload that was already cut short and changes nothing.
    pub fn finish_reload(&mut self) {
        if self.state != CombatState::Reloading {
            log::debug!("ignoring reload completion in {:?}", self.state);
            return;
        }
        self.set_state(CombatState::Unoccupied);
        let Some(weapon) = self.weapon.as_mut() else {
            return;
        };

        let space = weapon.magazine_empty_space();
        let loaded = self.ammo.withdraw(weapon.ammo_type(), space);
        weapon.reload_ammo(loaded);
        log::debug!(
            "reloaded {} rounds into {:?}, {} carried",
            loaded,
            weapon.weapon_type,
            self.ammo.get(weapon.ammo_type()).unwrap_or(0)
        );
    }

    /// Animation notify: the off hand takes hold of the clip.
    pub fn grab_clip<H: HostWorld + ?Sized>(&mut self, host: &H) {
        let Some(weapon) = self.weapon.as_mut() else {
            return;
        };
        self.clip_transform = host.socket_transform(weapon.id, weapon.clip_bone_name());
        weapon.set_moving_clip(true);
    }

    /// Animation notify: the clip is back in the weapon.
    pub fn release_clip(&mut self) {
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.set_moving_clip(false);
        }
    }

    // ── Timers ────────────────────────────────────────────────────────────

    /// Advance timers by `dt` seconds and run whatever expired, in expiry order.
    pub fn advance<H: HostWorld + ?Sized>(&mut self, dt: f32, host: &H) {
        let until = self.timers.now() + dt.max(0.0) as f64;
        while let Some(timer) = self.timers.pop_due(until) {
            match timer {
                CombatTimer::FireRate => self.fire_rate_timer_reset(host),
                CombatTimer::CrosshairShot => self.firing_bullet = false,
            }
        }
        self.timers.settle(until);
    }

    /// Cancel every pending timer and return to an idle state. Call when the owning
    /// character is destroyed.
    pub fn destroy(&mut self) {
        self.timers.clear();
        self.fire_button_pressed = false;
        self.firing_bullet = false;
        self.set_state(CombatState::Unoccupied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FlatWorld;
    use crate::weapon::WeaponType;
    use hecs::World;

    fn controller_with(ammo: u32, carried: u32) -> CombatController {
        let config = CombatConfig {
            starting_ammo: vec![(AmmoType::NineMillimeter, carried)],
            ..CombatConfig::default()
        };
        let mut c = CombatController::new(&config);
        let mut world = World::new();
        c.equip_weapon(Weapon::new(world.spawn(()), WeaponType::SubmachineGun).with_ammo(ammo));
        c.drain_effects();
        c
    }

    fn loaded(c: &CombatController) -> u32 {
        c.weapon().map_or(0, Weapon::ammo)
    }

    #[test]
    fn fire_consumes_round_and_starts_cooldown() {
        let host = FlatWorld::with_wall(-500.0);
        let mut c = controller_with(30, 80);
        assert!(c.request_fire(&host));
        assert_eq!(loaded(&c), 29);
        assert_eq!(c.state(), CombatState::FireRateTimerInProgress);
        assert!(c.is_firing_bullet());
        assert!(c.timers().is_active(CombatTimer::FireRate));

        let fx = c.drain_effects();
        assert_eq!(fx[0], CombatEvent::FireSound);
        assert!(matches!(fx[1], CombatEvent::MuzzleFlash { .. }));
        assert!(fx.iter().any(|e| matches!(e, CombatEvent::Beam { .. })));
        assert!(fx.iter().any(|e| matches!(
            e,
            CombatEvent::PlayMontage { montage: Montage::HipFire, section } if section == "StartFire"
        )));
    }

    #[test]
    fn open_sky_shot_has_no_beam() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.request_fire(&host);
        let fx = c.drain_effects();
        assert!(!fx.iter().any(|e| matches!(e, CombatEvent::Beam { .. } | CombatEvent::Impact { .. })));
    }

    #[test]
    fn fire_without_weapon_is_noop() {
        let host = FlatWorld::open();
        let mut c = CombatController::new(&CombatConfig::default());
        assert!(!c.request_fire(&host));
        assert_eq!(c.state(), CombatState::Unoccupied);
        assert!(c.drain_effects().is_empty());
    }

    #[test]
    fn fire_while_busy_changes_nothing() {
        let host = FlatWorld::open();

        let mut cooling = controller_with(30, 80);
        cooling.request_fire(&host);
        assert!(!cooling.request_fire(&host));
        assert_eq!(loaded(&cooling), 29);
        assert_eq!(cooling.state(), CombatState::FireRateTimerInProgress);

        let mut reloading = controller_with(10, 80);
        assert!(reloading.request_reload());
        assert!(!reloading.request_fire(&host));
        assert_eq!(loaded(&reloading), 10);
        assert_eq!(reloading.state(), CombatState::Reloading);
    }

    #[test]
    fn last_round_then_dry_until_reload() {
        let host = FlatWorld::open();
        let mut c = controller_with(1, 0);
        assert!(c.request_fire(&host));
        assert_eq!(loaded(&c), 0);
        c.advance(0.2, &host);
        assert_eq!(c.state(), CombatState::Unoccupied);
        assert!(!c.request_fire(&host));
        assert_eq!(loaded(&c), 0);
    }

    #[test]
    fn holding_fire_is_automatic_at_fire_rate() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.fire_button_pressed(&host);
        // Shots at 0.0, 0.1 and 0.2 in one long frame.
        c.advance(0.25, &host);
        assert_eq!(loaded(&c), 27);
        assert_eq!(c.state(), CombatState::FireRateTimerInProgress);
    }

    #[test]
    fn automatic_fire_across_frames() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.fire_button_pressed(&host);
        for _ in 0..57 {
            c.advance(1.0 / 60.0, &host);
        }
        // 0.95 s of holding: shots at 0.0 through 0.9.
        assert_eq!(loaded(&c), 20);
    }

    #[test]
    fn release_during_cooldown_stops_refire() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.fire_button_pressed(&host);
        assert!(c.is_fire_button_pressed());
        c.advance(0.05, &host);
        c.fire_button_released();
        assert!(!c.is_fire_button_pressed());
        c.advance(0.5, &host);
        assert_eq!(loaded(&c), 29);
        assert_eq!(c.state(), CombatState::Unoccupied);
    }

    #[test]
    fn emptying_magazine_triggers_reload() {
        let host = FlatWorld::open();
        let mut c = controller_with(2, 80);
        c.fire_button_pressed(&host);
        c.advance(0.15, &host);
        assert_eq!(loaded(&c), 0);
        c.advance(0.1, &host);
        assert_eq!(c.state(), CombatState::Reloading);
        assert!(c.drain_effects().iter().any(|e| matches!(
            e,
            CombatEvent::PlayMontage { montage: Montage::Reload, section } if section == "Reload SMG"
        )));
    }

    #[test]
    fn shooting_flag_clears_after_duration() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.request_fire(&host);
        c.advance(0.04, &host);
        assert!(c.is_firing_bullet());
        c.advance(0.02, &host);
        assert!(!c.is_firing_bullet());
    }

    #[test]
    fn reload_requires_free_hands_weapon_and_ammo() {
        let host = FlatWorld::open();
        let mut no_weapon = CombatController::new(&CombatConfig::default());
        assert!(!no_weapon.request_reload());

        let mut no_reserve = controller_with(10, 0);
        assert!(!no_reserve.request_reload());
        assert_eq!(no_reserve.state(), CombatState::Unoccupied);

        let mut busy = controller_with(10, 80);
        busy.request_fire(&host);
        assert!(!busy.request_reload());
        assert_eq!(busy.state(), CombatState::FireRateTimerInProgress);
    }

    #[test]
    fn finish_reload_fills_magazine_from_reserve() {
        let mut c = controller_with(10, 80);
        assert!(c.request_reload());
        c.finish_reload();
        assert_eq!(c.state(), CombatState::Unoccupied);
        assert_eq!(loaded(&c), 30);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 60);
    }

    #[test]
    fn finish_reload_with_short_reserve_loads_everything() {
        let mut c = controller_with(10, 5);
        assert!(c.request_reload());
        c.finish_reload();
        assert_eq!(loaded(&c), 15);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 0);
    }

    #[test]
    fn completion_outside_reload_changes_nothing() {
        let mut c = controller_with(10, 80);
        c.finish_reload();
        assert_eq!(loaded(&c), 10);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 80);
        assert_eq!(c.state(), CombatState::Unoccupied);
    }

    #[test]
    fn reload_of_other_ammo_type_does_nothing() {
        let config = CombatConfig {
            starting_ammo: vec![(AmmoType::AssaultRifle, 120)],
            ..CombatConfig::default()
        };
        let mut c = CombatController::new(&config);
        let mut world = World::new();
        c.equip_weapon(Weapon::new(world.spawn(()), WeaponType::SubmachineGun).with_ammo(3));
        assert!(!c.is_carrying_ammo());
        assert!(!c.request_reload());
        c.finish_reload();
        assert_eq!(loaded(&c), 3);
        assert_eq!(c.carried_ammo(AmmoType::AssaultRifle), 120);
    }

    #[test]
    fn dropping_mid_reload_voids_transfer() {
        let mut c = controller_with(10, 80);
        let mut world = World::new();
        assert!(c.request_reload());
        let dropped = c.drop_weapon().unwrap();
        assert_eq!(dropped.item_state(), ItemState::Falling);
        assert_eq!(c.state(), CombatState::Unoccupied);

        c.equip_weapon(Weapon::new(world.spawn(()), WeaponType::SubmachineGun).with_ammo(4));
        c.finish_reload();
        assert_eq!(loaded(&c), 4);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 80);

        // The next reload is unaffected.
        assert!(c.request_reload());
        c.finish_reload();
        assert_eq!(loaded(&c), 30);
    }

    #[test]
    fn late_reload_completion_keeps_automatic_fire_going() {
        let host = FlatWorld::open();
        let mut c = controller_with(10, 80);
        let mut world = World::new();
        assert!(c.request_reload());
        c.drop_weapon();
        c.equip_weapon(Weapon::new(world.spawn(()), WeaponType::SubmachineGun));
        c.fire_button_pressed(&host);
        assert_eq!(c.state(), CombatState::FireRateTimerInProgress);

        // The dropped weapon's montage reports completion mid-cooldown.
        c.finish_reload();
        assert_eq!(c.state(), CombatState::FireRateTimerInProgress);

        c.advance(0.55, &host);
        // Shots at 0.0 through 0.5.
        assert_eq!(loaded(&c), 24);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 80);
    }

    #[test]
    fn abandoned_reload_does_not_void_the_next_one() {
        let mut c = controller_with(10, 80);
        let mut world = World::new();
        assert!(c.request_reload());
        // Montage cancelled by the host; no completion ever arrives.
        c.drop_weapon();
        c.equip_weapon(Weapon::new(world.spawn(()), WeaponType::SubmachineGun).with_ammo(4));

        assert!(c.request_reload());
        c.finish_reload();
        assert_eq!(loaded(&c), 30);
        assert_eq!(c.carried_ammo(AmmoType::NineMillimeter), 54);
        assert_eq!(c.state(), CombatState::Unoccupied);
    }

    #[test]
    fn swap_returns_previous_weapon() {
        let mut c = controller_with(10, 80);
        let mut world = World::new();
        let rifle = Weapon::new(world.spawn(()), WeaponType::AssaultRifle);
        let old = c.swap_weapon(rifle).unwrap();
        assert_eq!(old.weapon_type, WeaponType::SubmachineGun);
        assert_eq!(old.item_state(), ItemState::Falling);
        let held = c.weapon().unwrap();
        assert_eq!(held.weapon_type, WeaponType::AssaultRifle);
        assert_eq!(held.item_state(), ItemState::Equipped);
    }

    #[test]
    fn clip_grab_and_release() {
        let host = FlatWorld::open();
        let mut c = controller_with(10, 80);
        c.grab_clip(&host);
        assert!(c.weapon().unwrap().is_moving_clip());
        assert!(c.clip_transform().is_some());
        c.release_clip();
        assert!(!c.weapon().unwrap().is_moving_clip());
    }

    #[test]
    fn destroy_cancels_pending_timers() {
        let host = FlatWorld::open();
        let mut c = controller_with(30, 80);
        c.fire_button_pressed(&host);
        c.destroy();
        assert!(c.timers().is_empty());
        assert_eq!(c.state(), CombatState::Unoccupied);
        c.advance(1.0, &host);
        assert_eq!(loaded(&c), 29);
    }
}
