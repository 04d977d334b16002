//! Weapons: loaded magazine, ammo type, and the item state they move through when
//! picked up, equipped, and thrown.

use engine_core::{Entity, Rotator, Vec3};
use glam::Quat;
use rand::Rng;

use crate::ammo::AmmoType;

/// Seconds a thrown weapon falls before it can be picked up again.
pub const THROW_FALL_TIME: f32 = 0.7;

/// Magnitude of the impulse applied to a thrown weapon.
const THROW_IMPULSE: f32 = 20_000.0;

/// Weapon models available to the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponType {
    SubmachineGun,
    AssaultRifle,
}

/// Where an item is in its pickup/equip lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemState {
    /// Lying in the world, can be traced and selected.
    #[default]
    Pickup,
    /// Flying toward the camera after being selected.
    EquipInterping,
    /// Held in the inventory but not in hand.
    PickedUp,
    /// In the character's hand.
    Equipped,
    /// Thrown and still falling.
    Falling,
}

/// Weapon instance with its magazine state.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    /// Entity the host uses for this weapon's mesh and sockets.
    pub id: Entity,
    pub weapon_type: WeaponType,
    ammo: u32,
    magazine_capacity: u32,
    ammo_type: AmmoType,
    /// Montage section played when reloading this weapon.
    reload_montage_section: String,
    /// Bone the off hand grabs during a reload.
    clip_bone_name: String,
    moving_clip: bool,
    item_state: ItemState,
}

impl Weapon {
    /// A weapon with a full magazine.
    pub fn new(id: Entity, weapon_type: WeaponType) -> Self {
        let (magazine_capacity, ammo_type, section, clip_bone) = match weapon_type {
            WeaponType::SubmachineGun => (30, AmmoType::NineMillimeter, "Reload SMG", "smg_clip"),
            WeaponType::AssaultRifle => (30, AmmoType::AssaultRifle, "Reload AR", "ar_clip"),
        };

        Self {
            id,
            weapon_type,
            ammo: magazine_capacity,
            magazine_capacity,
            ammo_type,
            reload_montage_section: section.to_string(),
            clip_bone_name: clip_bone.to_string(),
            moving_clip: false,
            item_state: ItemState::Pickup,
        }
    }

    /// Same weapon with `ammo` rounds loaded (capped at capacity).
    pub fn with_ammo(mut self, ammo: u32) -> Self {
        self.ammo = ammo.min(self.magazine_capacity);
        self
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn magazine_capacity(&self) -> u32 {
        self.magazine_capacity
    }

    pub fn ammo_type(&self) -> AmmoType {
        self.ammo_type
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Room left in the magazine.
    pub fn magazine_empty_space(&self) -> u32 {
        self.magazine_capacity - self.ammo
    }

    /// Spend one round. Does nothing on an empty magazine.
    pub fn decrement_ammo(&mut self) {
        self.ammo = self.ammo.saturating_sub(1);
    }

    /// Load `amount` rounds. Anything beyond the magazine's free space is discarded.
    pub fn reload_ammo(&mut self, amount: u32) {
        debug_assert!(
            amount <= self.magazine_empty_space(),
            "reloading {} rounds into {} free slots",
            amount,
            self.magazine_empty_space()
        );
        self.ammo = (self.ammo + amount).min(self.magazine_capacity);
    }

    pub fn reload_montage_section(&self) -> &str {
        &self.reload_montage_section
    }

    pub fn clip_bone_name(&self) -> &str {
        &self.clip_bone_name
    }

    pub fn is_moving_clip(&self) -> bool {
        self.moving_clip
    }

    pub fn set_moving_clip(&mut self, moving: bool) {
        self.moving_clip = moving;
    }

    pub fn item_state(&self) -> ItemState {
        self.item_state
    }

    pub fn set_item_state(&mut self, state: ItemState) {
        self.item_state = state;
    }

    /// Impulse for throwing the weapon from a mesh facing `facing_yaw` degrees.
    ///
    /// Tossed out to the mesh's right, tilted 20° up, then swung up to 30° around the
    /// vertical at random.
    pub fn throw_impulse<R: Rng + ?Sized>(&self, facing_yaw: f32, rng: &mut R) -> Vec3 {
        let facing = Rotator::new(0.0, facing_yaw, 0.0);
        let forward = facing.forward();
        let right = facing.right();
        let tilted = Quat::from_axis_angle(forward, (-20f32).to_radians()) * right;
        let swing = rng.gen_range(0.0..=30.0f32);
        let direction = Quat::from_rotation_y(-swing.to_radians()) * tilted;
        direction * THROW_IMPULSE
    }

    /// Called by the host once a thrown weapon has landed.
    pub fn finish_falling(&mut self) {
        if self.item_state == ItemState::Falling {
            self.item_state = ItemState::Pickup;
        }
    }

    /// Get ammo display string.
    pub fn ammo_display(&self) -> String {
        format!("{} / {}", self.ammo, self.magazine_capacity)
    }
}
