//! Headless driver: plays a scripted session against a small test arena and logs what
//! the character does.

use std::collections::HashSet;

use anyhow::Result;
use engine_core::{normalize_degrees, Rotator, Time, Transform, Vec2, Vec3};
use hecs::{Entity, World};
use input::{ElementState, InputBindings, InputState, KeyCode, MouseButton};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shooter::host::BARREL_SOCKET;
use shooter::{
    CombatEvent, CombatState, HostWorld, ItemState, MovementSample, ShooterCharacter,
    ShooterConfig, TraceHit, Weapon, WeaponType, THROW_FALL_TIME,
};

const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);
/// Radius of an item's collision for visibility traces.
const ITEM_RADIUS: f32 = 60.0;
/// Radius of an item's pickup area.
const PICKUP_RADIUS: f32 = 300.0;
/// The arena's back wall.
const WALL_Z: f32 = -3000.0;
const GRAVITY: f32 = -980.0;
const WALK_SPEED: f32 = 600.0;
/// Height of the camera boom pivot above the character's feet.
const PIVOT_HEIGHT: f32 = 90.0;
/// Where the right hand holds a weapon, relative to the character.
const HAND_OFFSET: Vec3 = Vec3::new(20.0, 110.0, -30.0);
const WEAPON_MASS: f32 = 50.0;
/// Seconds a selected item takes to fly to the camera.
const EQUIP_INTERP_TIME: f32 = 0.7;
const RELOAD_MONTAGE_TIME: f32 = 1.2;
const GRAB_CLIP_AT: f32 = 0.3;
const RELEASE_CLIP_AT: f32 = 0.9;

/// Weapon lying in the arena, available for pickup.
struct GroundItem {
    weapon: Weapon,
}

/// Weapon in flight after being thrown.
struct Thrown {
    weapon: Weapon,
    velocity: Vec3,
    remaining: f32,
}

/// Weapon flying from the ground to the camera after being selected.
struct EquipInterp {
    weapon: Weapon,
    start: Vec3,
    elapsed: f32,
}

/// Static world: a floor at y = 0, a back wall, and whatever items are lying around.
struct Arena {
    world: World,
    camera: Transform,
    fov: f32,
    hand: Transform,
}

impl HostWorld for Arena {
    fn viewport_size(&self) -> Option<Vec2> {
        Some(VIEWPORT)
    }

    fn deproject_screen_to_world(&self, screen: Vec2) -> Option<(Vec3, Vec3)> {
        let half = VIEWPORT * 0.5;
        let tan = (self.fov.to_radians() * 0.5).tan();
        let x = (screen.x - half.x) / half.x * tan;
        let y = (half.y - screen.y) / half.x * tan;
        let direction = (self.camera.rotation * Vec3::new(x, y, -1.0)).normalize();
        Some((self.camera.position, direction))
    }

    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit> {
        let segment = end - start;
        let length = segment.length();
        if length <= f32::EPSILON {
            return None;
        }
        let direction = segment / length;
        let mut nearest: Option<(f32, TraceHit)> = None;
        let mut consider = |distance: f32, hit: TraceHit| {
            if nearest.map_or(true, |(d, _)| distance < d) {
                nearest = Some((distance, hit));
            }
        };

        if (start.z - WALL_Z) * (end.z - WALL_Z) <= 0.0 && start.z != end.z {
            let distance = (WALL_Z - start.z) / direction.z;
            consider(
                distance,
                TraceHit {
                    location: start + direction * distance,
                    item: None,
                },
            );
        }

        for (entity, (transform, _)) in self.world.query::<(&Transform, &GroundItem)>().iter() {
            let offset = start - transform.position;
            let b = offset.dot(direction);
            let c = offset.length_squared() - ITEM_RADIUS * ITEM_RADIUS;
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                continue;
            }
            let distance = -b - discriminant.sqrt();
            if (0.0..=length).contains(&distance) {
                consider(
                    distance,
                    TraceHit {
                        location: start + direction * distance,
                        item: Some(entity),
                    },
                );
            }
        }

        nearest.map(|(_, hit)| hit)
    }

    fn socket_transform(&self, owner: Entity, socket: &str) -> Option<Transform> {
        let mut transform = self
            .world
            .get::<&Transform>(owner)
            .map(|t| *t)
            .unwrap_or(self.hand);
        if socket == BARREL_SOCKET {
            let forward = transform.forward();
            transform.translate(forward * 40.0);
        }
        Some(transform)
    }
}

/// Kinematic stand-in for the host's character mover.
struct Body {
    position: Vec3,
    velocity: Vec3,
    facing_yaw: f32,
}

struct Session {
    arena: Arena,
    character: ShooterCharacter,
    body: Body,
    bindings: InputBindings,
    input: InputState,
    time: Time,
    rng: StdRng,
    overlapping: HashSet<Entity>,
    equip_interp: Option<EquipInterp>,
    reload_clock: Option<f32>,
}

impl Session {
    fn new(config: ShooterConfig) -> Self {
        let mut world = World::new();
        let smg = world.spawn(());
        let character =
            ShooterCharacter::with_default_weapon(config, Weapon::new(smg, WeaponType::SubmachineGun));

        let rifle = world.spawn(());
        let rifle_weapon = Weapon::new(rifle, WeaponType::AssaultRifle).with_ammo(20);
        if let Err(e) = world.insert(
            rifle,
            (
                Transform::from_position(Vec3::new(0.0, 20.0, -600.0)),
                GroundItem {
                    weapon: rifle_weapon,
                },
            ),
        ) {
            log::error!("could not place rifle: {}", e);
        }

        Self {
            arena: Arena {
                world,
                camera: Transform::default(),
                fov: character.camera().current_fov(),
                hand: Transform::default(),
            },
            character,
            body: Body {
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
                facing_yaw: 0.0,
            },
            bindings: InputBindings::default_layout(),
            input: InputState::new(),
            time: Time::with_fixed_rate(60.0),
            rng: StdRng::seed_from_u64(7),
            overlapping: HashSet::new(),
            equip_interp: None,
            reload_clock: None,
        }
    }

    // ── Scripted input ────────────────────────────────────────────────────

    fn key(&mut self, key: KeyCode, state: ElementState) {
        self.input.process_keyboard(key, state);
    }

    fn mouse(&mut self, button: MouseButton, state: ElementState) {
        self.input.process_mouse_button(button, state);
    }

    fn tap_key(&mut self, key: KeyCode) -> Result<()> {
        self.key(key, ElementState::Pressed);
        self.frame()?;
        self.key(key, ElementState::Released);
        Ok(())
    }

    /// Queue mouse motion that turns the camera toward `target`.
    fn look_at(&mut self, target: Vec3) {
        let wanted = Rotator::from_direction(target - self.arena.camera.position);
        let delta = wanted.normalized_delta(self.character.control_rotation());
        // Mouse Y is bound inverted.
        self.input
            .process_mouse_motion((delta.yaw as f64, -delta.pitch as f64));
    }

    fn run(&mut self, label: &str, seconds: f32) -> Result<()> {
        log::info!("── {} ──", label);
        let frames = (seconds / self.time.fixed_timestep_seconds()).round() as u32;
        for _ in 0..frames {
            self.frame()?;
        }
        let combat = self.character.combat();
        log::info!(
            "t={:.2}s state={:?} mag={} reserve={:?} spread={:.3} fov={:.1}",
            self.time.elapsed_seconds(),
            combat.state(),
            combat.weapon().map_or_else(|| "-".to_string(), Weapon::ammo_display),
            combat
                .weapon()
                .map(|w| combat.carried_ammo(w.ammo_type())),
            self.character.crosshair_spread_multiplier(),
            self.character.camera().current_fov(),
        );
        Ok(())
    }

    // ── Frame ─────────────────────────────────────────────────────────────

    fn frame(&mut self) -> Result<()> {
        let dt = self.time.step();

        let frame = self.bindings.sample(&self.input);
        let outcome = self.character.apply_input(&frame, dt, &self.arena);
        self.input.begin_frame();

        if let Some(item) = outcome.selected_item {
            self.begin_equip_interp(item)?;
        }
        if let Some(weapon) = outcome.dropped_weapon {
            self.throw(weapon)?;
        }

        let sample = self.move_body(dt);
        self.update_camera();
        self.character.tick(dt, &sample, &self.arena);

        self.drive_reload_montage(dt);
        self.update_equip_interp(dt)?;
        self.update_thrown(dt)?;
        self.update_overlaps();

        for event in self.character.drain_effects() {
            log_event(&event);
        }
        Ok(())
    }

    fn move_body(&mut self, dt: f32) -> MovementSample {
        let movement = self.character.config().movement.clone();
        let intent = self.character.take_movement();
        let body = &mut self.body;
        let wish = intent.input.clamp_length_max(1.0) * WALK_SPEED;
        let grounded = body.position.y <= 0.0 && body.velocity.y <= 0.0;

        if grounded {
            body.velocity.x = wish.x;
            body.velocity.z = wish.z;
            if intent.jump {
                body.velocity.y = movement.jump_z_velocity;
            }
        } else {
            body.velocity.x += (wish.x - body.velocity.x) * movement.air_control;
            body.velocity.z += (wish.z - body.velocity.z) * movement.air_control;
            body.velocity.y += GRAVITY * dt;
        }

        body.position += body.velocity * dt;
        if body.position.y < 0.0 {
            body.position.y = 0.0;
            body.velocity.y = 0.0;
        }

        if wish.length_squared() > 0.0 {
            let target = Rotator::from_direction(wish).yaw;
            let step = movement.rotation_rate * dt;
            let delta = normalize_degrees(target - body.facing_yaw).clamp(-step, step);
            body.facing_yaw = normalize_degrees(body.facing_yaw + delta);
        }

        MovementSample {
            velocity: body.velocity,
            acceleration: wish,
            falling: body.position.y > 0.0,
        }
    }

    fn update_camera(&mut self) {
        let control = self.character.control_rotation();
        let rotation = control.to_quat();
        let rig = self.character.camera();
        let offset = rig.boom_socket_offset();
        let forward = control.forward();
        let pivot = self.body.position + Vec3::Y * PIVOT_HEIGHT;
        let position = pivot - forward * rig.boom_arm_length()
            + forward * offset.x
            + control.right() * offset.y
            + rotation * Vec3::Y * offset.z;

        self.arena.camera = Transform::from_position_rotation(position, rotation);
        self.arena.fov = rig.current_fov();

        let facing = Rotator::new(0.0, self.body.facing_yaw, 0.0).to_quat();
        self.arena.hand =
            Transform::from_position_rotation(self.body.position + facing * HAND_OFFSET, rotation);
    }

    // ── Host-side animation ───────────────────────────────────────────────

    /// Plays the reload montage's notifies while the character is reloading.
    fn drive_reload_montage(&mut self, dt: f32) {
        if self.character.combat().state() != CombatState::Reloading {
            self.reload_clock = None;
            return;
        }
        let before = self.reload_clock.unwrap_or(0.0);
        let after = before + dt;
        self.reload_clock = Some(after);

        let combat = self.character.combat_mut();
        if before < GRAB_CLIP_AT && after >= GRAB_CLIP_AT {
            combat.grab_clip(&self.arena);
            log::debug!("clip grabbed at {:?}", combat.clip_transform().map(|t| t.position));
        }
        if before < RELEASE_CLIP_AT && after >= RELEASE_CLIP_AT {
            combat.release_clip();
        }
        if after >= RELOAD_MONTAGE_TIME {
            combat.finish_reload();
            self.reload_clock = None;
        }
    }

    fn begin_equip_interp(&mut self, item: Entity) -> Result<()> {
        let GroundItem { mut weapon } = self.arena.world.remove_one::<GroundItem>(item)?;
        let start = self.arena.world.get::<&Transform>(item)?.position;
        weapon.set_item_state(ItemState::EquipInterping);
        self.equip_interp = Some(EquipInterp {
            weapon,
            start,
            elapsed: 0.0,
        });
        Ok(())
    }

    fn update_equip_interp(&mut self, dt: f32) -> Result<()> {
        let Some(interp) = self.equip_interp.as_mut() else {
            return Ok(());
        };
        interp.elapsed += dt;
        let alpha = (interp.elapsed / EQUIP_INTERP_TIME).min(1.0);
        let target = self.character.pickup_interp_target(&self.arena.camera);
        let id = interp.weapon.id;
        self.arena.world.get::<&mut Transform>(id)?.position = interp.start.lerp(target, alpha);
        if alpha < 1.0 {
            return Ok(());
        }

        if let Some(EquipInterp { weapon, .. }) = self.equip_interp.take() {
            self.arena.world.remove_one::<Transform>(id)?;
            if let Some(old) = self.character.pickup_item(weapon) {
                self.throw(old)?;
            }
        }
        Ok(())
    }

    fn throw(&mut self, weapon: Weapon) -> Result<()> {
        let impulse = weapon.throw_impulse(self.body.facing_yaw, &mut self.rng);
        log::info!("throwing {:?} with impulse {:?}", weapon.weapon_type, impulse);
        let id = weapon.id;
        self.arena.world.insert(
            id,
            (
                self.arena.hand,
                Thrown {
                    weapon,
                    velocity: impulse / WEAPON_MASS,
                    remaining: THROW_FALL_TIME,
                },
            ),
        )?;
        Ok(())
    }

    fn update_thrown(&mut self, dt: f32) -> Result<()> {
        let mut landed = Vec::new();
        for (entity, (transform, thrown)) in self
            .arena
            .world
            .query_mut::<(&mut Transform, &mut Thrown)>()
        {
            thrown.velocity.y += GRAVITY * dt;
            transform.position += thrown.velocity * dt;
            if transform.position.y < ITEM_RADIUS / 3.0 {
                transform.position.y = ITEM_RADIUS / 3.0;
                thrown.velocity = Vec3::ZERO;
            }
            thrown.remaining -= dt;
            if thrown.remaining <= 0.0 {
                landed.push(entity);
            }
        }

        for entity in landed {
            let Thrown { mut weapon, .. } = self.arena.world.remove_one::<Thrown>(entity)?;
            weapon.finish_falling();
            log::info!(
                "{:?} landed at {:?}",
                weapon.weapon_type,
                self.arena.world.get::<&Transform>(entity)?.position
            );
            self.arena.world.insert_one(entity, GroundItem { weapon })?;
        }
        Ok(())
    }

    /// Tell the character about pickup areas it entered or left this frame.
    fn update_overlaps(&mut self) {
        let position = self.body.position;
        let inside: HashSet<Entity> = self
            .arena
            .world
            .query::<(&Transform, &GroundItem)>()
            .iter()
            .filter(|(_, (t, _))| t.position.distance(position) <= PICKUP_RADIUS)
            .map(|(e, _)| e)
            .collect();

        for _ in inside.difference(&self.overlapping) {
            self.character.increment_overlapped_item_count(1);
        }
        for _ in self.overlapping.difference(&inside) {
            self.character.increment_overlapped_item_count(-1);
        }
        self.overlapping = inside;
    }

    fn item_position(&self, item: Entity) -> Option<Vec3> {
        self.arena.world.get::<&Transform>(item).ok().map(|t| t.position)
    }

    fn ground_items(&self) -> Vec<Entity> {
        self.arena
            .world
            .query::<&GroundItem>()
            .iter()
            .map(|(e, _)| e)
            .collect()
    }
}

fn log_event(event: &CombatEvent) {
    match event {
        CombatEvent::Impact { location } => log::info!("impact at {:?}", location),
        CombatEvent::StateChanged { from, to } => log::info!("{:?} -> {:?}", from, to),
        CombatEvent::WeaponEquipped { .. } | CombatEvent::WeaponDropped { .. } => {
            log::info!("{:?}", event)
        }
        _ => log::debug!("{:?}", event),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                     Shooter (headless session)                   ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  BINDINGS:                                                       ║");
    println!("║    WASD       - Move           │  Mouse       - Look around      ║");
    println!("║    Left Click - Fire weapon    │  Right Click - Aim              ║");
    println!("║    Space      - Jump           │  R           - Reload           ║");
    println!("║    E          - Pick up        │  Q           - Drop weapon      ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Tuning is read from shooter.ron; RUST_LOG=debug shows events.   ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let config = ShooterConfig::load();
    log::info!("Starting shooter session");
    let mut session = Session::new(config);

    session.mouse(MouseButton::Left, ElementState::Pressed);
    session.run("burst", 0.35)?;
    session.mouse(MouseButton::Left, ElementState::Released);
    session.run("settle", 0.2)?;

    session.mouse(MouseButton::Left, ElementState::Pressed);
    session.run("empty the magazine", 3.0)?;
    session.mouse(MouseButton::Left, ElementState::Released);
    session.run("automatic reload", RELOAD_MONTAGE_TIME + 0.3)?;

    session.tap_key(KeyCode::Space)?;
    session.run("jump", 1.5)?;

    session.mouse(MouseButton::Right, ElementState::Pressed);
    session.run("aim", 0.8)?;
    session.mouse(MouseButton::Right, ElementState::Released);
    session.run("stop aiming", 0.3)?;

    session.key(KeyCode::KeyW, ElementState::Pressed);
    session.run("walk to the rifle", 0.75)?;
    session.key(KeyCode::KeyW, ElementState::Released);

    let rifle = session
        .ground_items()
        .into_iter()
        .find_map(|e| session.item_position(e));
    match rifle {
        Some(at) => {
            session.look_at(at);
            session.run("look at the rifle", 0.2)?;
        }
        None => log::warn!("no rifle on the ground"),
    }
    log::info!(
        "pickup candidate: {:?} ({} areas overlapped)",
        session.character.pickup().current(),
        session.character.pickup().overlapped_item_count()
    );

    session.tap_key(KeyCode::KeyE)?;
    session.run("rifle flies to the camera", EQUIP_INTERP_TIME + 0.3)?;

    session.tap_key(KeyCode::KeyQ)?;
    session.run("drop the rifle", THROW_FALL_TIME + 0.3)?;

    session.character.destroy();
    for event in session.character.drain_effects() {
        log_event(&event);
    }
    log::info!(
        "session finished after {:.2}s ({} frames), {} items on the ground",
        session.time.elapsed_seconds(),
        session.time.frame_count(),
        session.ground_items().len()
    );
    Ok(())
}
