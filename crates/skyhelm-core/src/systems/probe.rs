/// Short-range obstacle probe for fly-to steering.
///
/// Bodies are probed as spheres of their simulation radius. A probe started
/// inside a body ignores that body, matching how a ray cast from within a
/// collider reports nothing for it.
use glam::Vec3;

use crate::api::types::BodyId;
use crate::core::arena::BodyArena;

/// The nearest surface struck by a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub body: BodyId,
    /// Distance from the probe origin to the surface.
    pub distance: f32,
}

/// Cast a probe of length `max_distance` from `origin` along `dir`
/// (normalized) and return the nearest body surface it strikes.
pub fn cast(arena: &BodyArena, origin: Vec3, dir: Vec3, max_distance: f32) -> Option<ProbeHit> {
    let mut nearest: Option<ProbeHit> = None;
    for body in arena.iter() {
        let radius = body.sim_radius();
        let to_center = body.position() - origin;
        if to_center.length_squared() < radius * radius {
            continue; // started inside this body
        }
        // |origin + t*dir - center|^2 = r^2, solved for the nearest t > 0
        let proj = to_center.dot(dir);
        if proj < 0.0 {
            continue; // center behind the probe
        }
        let closest_sq = to_center.length_squared() - proj * proj;
        if closest_sq > radius * radius {
            continue; // probe line misses the sphere
        }
        let half_chord = (radius * radius - closest_sq).sqrt();
        let t = proj - half_chord;
        if t >= 0.0 && t <= max_distance && nearest.map_or(true, |h| t < h.distance) {
            nearest = Some(ProbeHit {
                body: body.id(),
                distance: t,
            });
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::manifest::BodyParams;

    fn sphere(name: &str, parent: Option<&str>, distance: f32, radius: f32) -> BodyParams {
        BodyParams {
            name: name.into(),
            parent: parent.map(String::from),
            depth: u32::from(parent.is_some()),
            mass: 1.0,
            distance,
            radius,
            inclination_deg: 0.0,
            orbital_period_days: 0.0,
            rotation_period_hours: 0.0,
            surface_gravity: 1.0,
            eccentricity: 1.0,
        }
    }

    /// Star at the origin (sim radius 4800); child placed on +Z at a known
    /// distance with a proportional sim radius.
    fn arena_with_child(child_distance_km: f32, child_radius_km: f32) -> BodyArena {
        let mut arena = BodyArena::new();
        arena.insert(&sphere("Star", None, 0.0, 695_000.0)).unwrap();
        arena
            .insert(&sphere("Terra", Some("Star"), child_distance_km, child_radius_km))
            .unwrap();
        arena
    }

    #[test]
    fn hits_body_straight_ahead() {
        let arena = arena_with_child(695_000_000.0, 6_950.0);
        let terra = arena.get(arena.find("terra").unwrap()).unwrap();
        // terra sits at +Z = 1000 + 4800, sim radius 48
        let origin = terra.position() - Vec3::Z * 500.0;
        let hit = cast(&arena, origin, Vec3::Z, 1000.0).unwrap();
        assert_eq!(hit.body, terra.id());
        assert!((hit.distance - (500.0 - terra.sim_radius())).abs() < 1e-2);
    }

    #[test]
    fn respects_probe_length() {
        let arena = arena_with_child(695_000_000.0, 6_950.0);
        let terra = arena.get(arena.find("terra").unwrap()).unwrap();
        let origin = terra.position() - Vec3::Z * 500.0;
        assert!(cast(&arena, origin, Vec3::Z, 50.0).is_none());
    }

    #[test]
    fn ignores_bodies_behind() {
        let arena = arena_with_child(695_000_000.0, 6_950.0);
        let terra = arena.get(arena.find("terra").unwrap()).unwrap();
        let origin = terra.position() + Vec3::Z * 500.0;
        // probing away from both bodies
        assert!(cast(&arena, origin, Vec3::Z, 1000.0).is_none());
    }

    #[test]
    fn skips_body_containing_the_origin() {
        let arena = arena_with_child(695_000_000.0, 6_950.0);
        let star = arena.get(arena.root().unwrap()).unwrap();
        // origin well inside the star's sim radius
        let hit = cast(&arena, star.position() + Vec3::Z, Vec3::Z, 10.0);
        assert!(hit.is_none());
    }

    #[test]
    fn reports_the_nearest_of_two() {
        let mut arena = BodyArena::new();
        arena.insert(&sphere("Star", None, 0.0, 695_000.0)).unwrap();
        arena.insert(&sphere("Near", Some("Star"), 695_000_000.0, 6_950.0)).unwrap();
        arena.insert(&sphere("Far", Some("Star"), 1_390_000_000.0, 6_950.0)).unwrap();
        let near = arena.get(arena.find("near").unwrap()).unwrap();
        let origin = Vec3::new(near.position().x, near.position().y, near.position().z - 200.0);
        let hit = cast(&arena, origin, Vec3::Z, 10_000.0).unwrap();
        assert_eq!(hit.body, near.id());
    }
}
