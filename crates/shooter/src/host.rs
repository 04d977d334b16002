//! Queries the character makes against the host engine's world, and the crosshair and
//! barrel traces built on them.

use engine_core::{Entity, Transform, Vec2, Vec3};

/// The crosshair is drawn this many pixels above the viewport centre.
pub const CROSSHAIR_SCREEN_OFFSET: f32 = 50.0;
/// Length of the ray cast out from the crosshair.
pub const CROSSHAIR_TRACE_LENGTH: f32 = 50_000.0;
/// The barrel trace runs this far past the crosshair's end point.
pub const BARREL_TRACE_EXTENSION: f32 = 1.25;
/// Socket on a weapon mesh where shots leave the barrel.
pub const BARREL_SOCKET: &str = "BarrelSocket";

/// A blocking hit on the visibility channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    pub location: Vec3,
    /// The pickup item that was hit, if the blocking actor is one.
    pub item: Option<Entity>,
}

/// Services the host engine provides to the character.
pub trait HostWorld {
    /// Current viewport size in pixels, if there is a viewport.
    fn viewport_size(&self) -> Option<Vec2>;

    /// World-space origin and unit direction under a screen position.
    fn deproject_screen_to_world(&self, screen: Vec2) -> Option<(Vec3, Vec3)>;

    /// First blocking hit between `start` and `end` on the visibility channel.
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<TraceHit>;

    /// World transform of `socket` on `owner`'s mesh.
    fn socket_transform(&self, owner: Entity, socket: &str) -> Option<Transform>;
}

/// Result of tracing out from the crosshair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairTrace {
    pub hit: Option<TraceHit>,
    /// Hit location, or the far end of the trace when nothing was hit.
    pub end: Vec3,
}

/// Trace from the crosshair into the world. `None` when deprojection fails.
pub fn trace_from_crosshair<H: HostWorld + ?Sized>(host: &H) -> Option<CrosshairTrace> {
    let viewport = host.viewport_size().unwrap_or(Vec2::ZERO);
    let screen = Vec2::new(viewport.x / 2.0, viewport.y / 2.0 - CROSSHAIR_SCREEN_OFFSET);
    let (origin, direction) = host.deproject_screen_to_world(screen)?;

    let far = origin + direction * CROSSHAIR_TRACE_LENGTH;
    let hit = host.line_trace(origin, far);
    Some(CrosshairTrace {
        hit,
        end: hit.map_or(far, |h| h.location),
    })
}

/// Where a shot from `muzzle` lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamTrace {
    pub end: Vec3,
    /// True when the barrel trace itself was blocked; only then are beam and impact shown.
    pub blocked: bool,
}

/// Aim through the crosshair, then check the path from the barrel for anything in the way.
///
/// `None` when the crosshair cannot be deprojected.
pub fn trace_from_barrel<H: HostWorld + ?Sized>(host: &H, muzzle: Vec3) -> Option<BeamTrace> {
    let crosshair = trace_from_crosshair(host)?;
    let end = muzzle + (crosshair.end - muzzle) * BARREL_TRACE_EXTENSION;
    Some(match host.line_trace(muzzle, end) {
        Some(hit) => BeamTrace {
            end: hit.location,
            blocked: true,
        },
        None => BeamTrace {
            end: crosshair.end,
            blocked: false,
        },
    })
}


#[cfg(test)]
mod tests {
    use super::testing::FlatWorld;
    use super::*;

    #[test]
    fn crosshair_trace_ends_at_far_point_when_open() {
        let world = FlatWorld::open();
        let trace = trace_from_crosshair(&world).unwrap();
        assert!(trace.hit.is_none());
        assert_eq!(trace.end, Vec3::new(0.0, 0.0, -CROSSHAIR_TRACE_LENGTH));
    }

    #[test]
    fn crosshair_trace_stops_at_wall() {
        let world = FlatWorld::with_wall(-100.0);
        let trace = trace_from_crosshair(&world).unwrap();
        assert!(trace.hit.is_some());
        assert!((trace.end.z + 100.0).abs() < 1e-3);
    }

    #[test]
    fn failed_deprojection_gives_no_trace() {
        let mut world = FlatWorld::open();
        world.deprojects = false;
        assert!(trace_from_crosshair(&world).is_none());
        assert!(trace_from_barrel(&world, Vec3::ZERO).is_none());
        assert!(world.traces.borrow().is_empty());
    }

    #[test]
    fn barrel_trace_extends_past_crosshair_end() {
        let world = FlatWorld::with_wall(-100.0);
        let muzzle = Vec3::new(10.0, -5.0, 0.0);
        let beam = trace_from_barrel(&world, muzzle).unwrap();
        assert!(beam.blocked);
        let traces = world.traces.borrow();
        let (start, end) = traces[1];
        assert_eq!(start, muzzle);
        let crosshair_end = Vec3::new(0.0, 0.0, -100.0);
        let expected = muzzle + (crosshair_end - muzzle) * BARREL_TRACE_EXTENSION;
        assert!((end - expected).length() < 1e-3);
    }

    #[test]
    fn open_sky_beam_is_not_blocked() {
        let world = FlatWorld::open();
        let beam = trace_from_barrel(&world, Vec3::new(10.0, -5.0, 0.0)).unwrap();
        assert!(!beam.blocked);
        assert_eq!(beam.end, Vec3::new(0.0, 0.0, -CROSSHAIR_TRACE_LENGTH));
    }
}
