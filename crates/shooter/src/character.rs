//! The playable character: composes the combat controller, camera rig, crosshair
//! spread, pickup tracking and animation properties behind one per-frame entry point.

use engine_core::{Entity, Rotator, Transform, Vec3};
use input::{Action, ActionEdge, Axis, InputFrame};

use crate::anim::AnimationProperties;
use crate::camera::CameraRig;
use crate::combat::CombatController;
use crate::config::ShooterConfig;
use crate::crosshair::{CrosshairSpread, SpreadInputs};
use crate::effects::CombatEvent;
use crate::host::HostWorld;
use crate::movement::{MovementIntent, MovementSample};
use crate::pickup::PickupTracker;
use crate::weapon::Weapon;

/// Control pitch is kept inside this range, in degrees.
const PITCH_LIMIT: f32 = 89.0;

/// Things an input frame handed back to the host.
#[derive(Debug, Default, PartialEq)]
pub struct InputOutcome {
    /// Item selected for pickup; the host starts its fly-to-camera animation.
    pub selected_item: Option<Entity>,
    /// Weapon that left the hand; the host now owns and throws it.
    pub dropped_weapon: Option<Weapon>,
}

pub struct ShooterCharacter {
    config: ShooterConfig,
    combat: CombatController,
    rig: CameraRig,
    spread: CrosshairSpread,
    pickup: PickupTracker,
    anim: AnimationProperties,
    control_rotation: Rotator,
    movement: MovementIntent,
    aiming: bool,
}

impl ShooterCharacter {
    /// Character with the configured starting ammo and empty hands.
    pub fn new(config: ShooterConfig) -> Self {
        Self {
            combat: CombatController::new(&config.combat),
            rig: CameraRig::new(config.camera.clone(), config.look.clone()),
            spread: CrosshairSpread::new(config.spread.clone()),
            pickup: PickupTracker::new(),
            anim: AnimationProperties::default(),
            control_rotation: Rotator::ZERO,
            movement: MovementIntent::default(),
            aiming: false,
            config,
        }
    }

    /// Character that spawns already holding `weapon`.
    pub fn with_default_weapon(config: ShooterConfig, weapon: Weapon) -> Self {
        let mut character = Self::new(config);
        character.combat.equip_weapon(weapon);
        character
    }

    pub fn config(&self) -> &ShooterConfig {
        &self.config
    }

    pub fn combat(&self) -> &CombatController {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut CombatController {
        &mut self.combat
    }

    pub fn camera(&self) -> &CameraRig {
        &self.rig
    }

    pub fn spread(&self) -> &CrosshairSpread {
        &self.spread
    }

    pub fn pickup(&self) -> &PickupTracker {
        &self.pickup
    }

    pub fn animation(&self) -> &AnimationProperties {
        &self.anim
    }

    pub fn control_rotation(&self) -> Rotator {
        self.control_rotation
    }

    pub fn movement(&self) -> &MovementIntent {
        &self.movement
    }

    /// Hand the frame's movement intent to the host and start a fresh one.
    pub fn take_movement(&mut self) -> MovementIntent {
        std::mem::take(&mut self.movement)
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn crosshair_spread_multiplier(&self) -> f32 {
        self.spread.multiplier()
    }

    pub fn drain_effects(&mut self) -> Vec<CombatEvent> {
        self.combat.drain_effects()
    }

    // ── Look ──────────────────────────────────────────────────────────────

    pub fn add_controller_yaw(&mut self, degrees: f32) {
        self.control_rotation.yaw = engine_core::normalize_degrees(self.control_rotation.yaw + degrees);
    }

    pub fn add_controller_pitch(&mut self, degrees: f32) {
        self.control_rotation.pitch =
            (self.control_rotation.pitch + degrees).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    // ── Buttons ───────────────────────────────────────────────────────────

    /// Aiming needs a weapon in hand.
    pub fn aiming_button_pressed(&mut self) {
        if self.combat.weapon().is_some() {
            self.aiming = true;
        }
    }

    pub fn aiming_button_released(&mut self) {
        self.aiming = false;
    }

    /// Pick the item under the crosshair, if any.
    pub fn select_button_pressed(&mut self) -> Option<Entity> {
        self.pickup.select(self.combat.effects_mut())
    }

    /// Item finished flying to the camera: equip it, dropping whatever was held.
    pub fn pickup_item(&mut self, weapon: Weapon) -> Option<Weapon> {
        self.combat
            .effects_mut()
            .push(CombatEvent::EquipSound { item: weapon.id });
        self.combat.swap_weapon(weapon)
    }

    /// Entering (+1) or leaving (-1) an item's pickup area.
    pub fn increment_overlapped_item_count(&mut self, delta: i32) {
        self.pickup.increment_overlapped_item_count(delta);
    }

    /// Where a selected item should fly to, given the host's camera transform.
    pub fn pickup_interp_target(&self, camera: &Transform) -> Vec3 {
        self.rig.pickup_interp_target(camera)
    }

    /// Apply one frame of named input.
    pub fn apply_input<H: HostWorld + ?Sized>(
        &mut self,
        frame: &InputFrame,
        dt: f32,
        host: &H,
    ) -> InputOutcome {
        let control = self.control_rotation;
        self.movement.move_forward(control, frame.axis(Axis::MoveForward));
        self.movement.move_right(control, frame.axis(Axis::MoveRight));

        let yaw = self.rig.turn_at_rate(frame.axis(Axis::TurnRate), dt)
            + self.rig.turn(frame.axis(Axis::Turn), self.aiming);
        let pitch = self.rig.look_up_at_rate(frame.axis(Axis::LookUpRate), dt)
            + self.rig.look_up(frame.axis(Axis::LookUp), self.aiming);
        if yaw != 0.0 {
            self.add_controller_yaw(yaw);
        }
        if pitch != 0.0 {
            self.add_controller_pitch(pitch);
        }

        let mut outcome = InputOutcome::default();
        for &(action, edge) in frame.edges() {
            match (action, edge) {
                (Action::Jump, ActionEdge::Pressed) => self.movement.jump = true,
                (Action::Jump, ActionEdge::Released) => self.movement.stop_jumping = true,
                (Action::Fire, ActionEdge::Pressed) => self.combat.fire_button_pressed(host),
                (Action::Fire, ActionEdge::Released) => self.combat.fire_button_released(),
                (Action::Aim, ActionEdge::Pressed) => self.aiming_button_pressed(),
                (Action::Aim, ActionEdge::Released) => self.aiming_button_released(),
                (Action::Select, ActionEdge::Pressed) => {
                    if let Some(item) = self.select_button_pressed() {
                        outcome.selected_item = Some(item);
                    }
                }
                (Action::Drop, ActionEdge::Pressed) => {
                    if let Some(weapon) = self.combat.drop_weapon() {
                        outcome.dropped_weapon = Some(weapon);
                    }
                }
                (Action::Reload, ActionEdge::Pressed) => {
                    self.combat.request_reload();
                }
                (Action::Select | Action::Drop | Action::Reload, ActionEdge::Released) => {}
            }
        }
        outcome
    }

    /// Per-frame update: timers, then camera zoom, look rates, crosshair spread and the
    /// pickup trace in that order.
    pub fn tick<H: HostWorld + ?Sized>(&mut self, dt: f32, sample: &MovementSample, host: &H) {
        self.combat.advance(dt, host);

        self.rig.interp_zoom(dt, self.aiming);
        self.rig.set_look_rates(self.aiming);
        self.spread.update(
            dt,
            SpreadInputs {
                speed: sample.lateral_speed(),
                airborne: sample.falling,
                aiming: self.aiming,
                shooting: self.combat.is_firing_bullet(),
            },
        );
        self.pickup.trace(host, self.combat.effects_mut());

        self.anim.update(sample, self.control_rotation, self.aiming);
    }

    /// Tear down: cancel timers and clear any visible pickup widget.
    pub fn destroy(&mut self) {
        self.combat.destroy();
        self.pickup.reset(self.combat.effects_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ammo::AmmoType;
    use crate::combat::CombatState;
    use crate::host::testing::FlatWorld;
    use crate::weapon::{ItemState, WeaponType};
    use hecs::World;

    const DT: f32 = 1.0 / 60.0;

    fn armed() -> (ShooterCharacter, World) {
        let mut world = World::new();
        let weapon = Weapon::new(world.spawn(()), WeaponType::SubmachineGun);
        let mut c = ShooterCharacter::with_default_weapon(ShooterConfig::default(), weapon);
        c.drain_effects();
        (c, world)
    }

    #[test]
    fn spawn_seeds_ammo_and_equips() {
        let (c, _) = armed();
        assert_eq!(c.combat().carried_ammo(AmmoType::NineMillimeter), 80);
        assert_eq!(c.combat().carried_ammo(AmmoType::AssaultRifle), 120);
        assert_eq!(c.combat().weapon().unwrap().item_state(), ItemState::Equipped);
        assert_eq!(c.camera().current_fov(), 90.0);
    }

    #[test]
    fn cannot_aim_without_weapon() {
        let mut c = ShooterCharacter::new(ShooterConfig::default());
        let host = FlatWorld::open();
        c.apply_input(&InputFrame::new().pressed(Action::Aim), DT, &host);
        assert!(!c.is_aiming());
    }

    #[test]
    fn aiming_zooms_and_tightens() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        c.apply_input(&InputFrame::new().pressed(Action::Aim), DT, &host);
        assert!(c.is_aiming());
        for _ in 0..60 {
            c.tick(DT, &MovementSample::default(), &host);
        }
        assert!((c.camera().current_fov() - 35.0).abs() < 0.5);
        assert_eq!(c.camera().base_turn_rate(), 20.0);
        assert!(c.crosshair_spread_multiplier() < 0.5);
        assert!(c.animation().aiming);
    }

    #[test]
    fn fire_hold_and_release_through_input() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        c.apply_input(&InputFrame::new().pressed(Action::Fire), DT, &host);
        c.tick(DT, &MovementSample::default(), &host);
        assert!(c.spread().shooting_factor() > 0.0);
        for _ in 0..14 {
            c.tick(DT, &MovementSample::default(), &host);
        }
        // Shots at 0.0, 0.1 and 0.2 within 0.25 s.
        assert_eq!(c.combat().weapon().unwrap().ammo(), 27);

        c.apply_input(&InputFrame::new().released(Action::Fire), DT, &host);
        for _ in 0..30 {
            c.tick(DT, &MovementSample::default(), &host);
        }
        assert_eq!(c.combat().weapon().unwrap().ammo(), 27);
        assert_eq!(c.combat().state(), CombatState::Unoccupied);
    }

    #[test]
    fn reload_via_input_and_animation_signal() {
        let (mut c, _world) = armed();
        let host = FlatWorld::open();
        c.apply_input(&InputFrame::new().pressed(Action::Fire).released(Action::Fire), DT, &host);
        c.tick(0.2, &MovementSample::default(), &host);
        c.apply_input(&InputFrame::new().pressed(Action::Reload), DT, &host);
        assert_eq!(c.combat().state(), CombatState::Reloading);
        c.combat_mut().finish_reload();
        assert_eq!(c.combat().weapon().unwrap().ammo(), 30);
        assert_eq!(c.combat().carried_ammo(AmmoType::NineMillimeter), 79);
    }

    #[test]
    fn mouse_look_scales_while_aiming_and_clamps_pitch() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        c.apply_input(&InputFrame::new().with_axis(Axis::Turn, 10.0), DT, &host);
        assert!((c.control_rotation().yaw - 10.0).abs() < 1e-5);
        c.apply_input(&InputFrame::new().pressed(Action::Aim).with_axis(Axis::Turn, 10.0), DT, &host);
        // Aim applies after this frame's look input.
        assert!((c.control_rotation().yaw - 20.0).abs() < 1e-5);
        c.apply_input(&InputFrame::new().with_axis(Axis::Turn, 10.0), DT, &host);
        assert!((c.control_rotation().yaw - 26.0).abs() < 1e-4);

        c.apply_input(&InputFrame::new().with_axis(Axis::LookUp, 500.0), DT, &host);
        assert_eq!(c.control_rotation().pitch, 89.0);
    }

    #[test]
    fn movement_follows_control_yaw() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        c.add_controller_yaw(90.0);
        c.apply_input(
            &InputFrame::new().with_axis(Axis::MoveForward, 1.0).pressed(Action::Jump),
            DT,
            &host,
        );
        let intent = c.take_movement();
        assert!((intent.input - Vec3::X).length() < 1e-5);
        assert!(intent.jump);
        assert_eq!(c.movement().input, Vec3::ZERO);
    }

    #[test]
    fn jumping_widens_crosshair() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        let airborne = MovementSample {
            falling: true,
            ..Default::default()
        };
        let before = {
            c.tick(DT, &MovementSample::default(), &host);
            c.crosshair_spread_multiplier()
        };
        for _ in 0..30 {
            c.tick(DT, &airborne, &host);
        }
        assert!(c.crosshair_spread_multiplier() > before);
        assert!(c.animation().is_in_air);
    }

    #[test]
    fn trace_select_and_pickup_swaps_weapon() {
        let (mut c, mut world) = armed();
        let rifle_id = world.spawn(());
        let mut host = FlatWorld::with_wall(-200.0);
        host.item_under_crosshair = Some(rifle_id);

        c.increment_overlapped_item_count(1);
        c.tick(DT, &MovementSample::default(), &host);
        assert_eq!(c.pickup().current(), Some(rifle_id));
        assert!(c
            .drain_effects()
            .contains(&CombatEvent::PickupWidget { item: rifle_id, visible: true }));

        let outcome = c.apply_input(&InputFrame::new().pressed(Action::Select), DT, &host);
        assert_eq!(outcome.selected_item, Some(rifle_id));

        let old = c
            .pickup_item(Weapon::new(rifle_id, WeaponType::AssaultRifle))
            .unwrap();
        assert_eq!(old.weapon_type, WeaponType::SubmachineGun);
        assert_eq!(c.combat().weapon().unwrap().id, rifle_id);
        let fx = c.drain_effects();
        assert!(fx.contains(&CombatEvent::PickupSound { item: rifle_id }));
        assert!(fx.contains(&CombatEvent::EquipSound { item: rifle_id }));
    }

    #[test]
    fn drop_hands_weapon_to_host() {
        let (mut c, _) = armed();
        let host = FlatWorld::open();
        let outcome = c.apply_input(&InputFrame::new().pressed(Action::Drop), DT, &host);
        let dropped = outcome.dropped_weapon.unwrap();
        assert_eq!(dropped.item_state(), ItemState::Falling);
        assert!(c.combat().weapon().is_none());
    }

    #[test]
    fn destroy_hides_widget_and_cancels_timers() {
        let (mut c, mut world) = armed();
        let item = world.spawn(());
        let mut host = FlatWorld::with_wall(-200.0);
        host.item_under_crosshair = Some(item);
        c.increment_overlapped_item_count(1);
        c.tick(DT, &MovementSample::default(), &host);
        c.apply_input(&InputFrame::new().pressed(Action::Fire), DT, &host);
        c.drain_effects();

        c.destroy();
        assert!(c.combat().timers().is_empty());
        assert!(c
            .drain_effects()
            .contains(&CombatEvent::PickupWidget { item, visible: false }));
    }
}
