//! Third-person shooter character: combat and reload state machine, crosshair spread,
//! pickup tracking and the camera rig, driven by a host engine through [`HostWorld`].

pub mod ammo;
pub mod anim;
pub mod camera;
pub mod character;
pub mod combat;
pub mod config;
pub mod crosshair;
pub mod effects;
pub mod host;
pub mod movement;
pub mod pickup;
pub mod weapon;

pub use ammo::{AmmoLedger, AmmoType};
pub use anim::AnimationProperties;
pub use camera::CameraRig;
pub use character::{InputOutcome, ShooterCharacter};
pub use combat::{CombatController, CombatState, CombatTimer};
pub use config::{ConfigError, ShooterConfig};
pub use crosshair::{CrosshairSpread, SpreadInputs};
pub use effects::{CombatEvent, EffectQueue, Montage};
pub use host::{HostWorld, TraceHit};
pub use movement::{MovementIntent, MovementSample};
pub use pickup::PickupTracker;
pub use weapon::{ItemState, Weapon, WeaponType, THROW_FALL_TIME};
