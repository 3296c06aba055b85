/// Orbital-motion math — pure functions, no tree or navigator dependencies.
///
/// Angles are radians, angular velocities rad/s. Orbits advance clockwise
/// (negative angular velocity applied per tick) in the XZ plane, with the
/// eccentricity ratio compressing the Z half-axis.
use glam::{Quat, Vec2, Vec3};

pub const TAU: f32 = std::f32::consts::TAU;

/// Convert an orbital period in Earth days to angular velocity in rad/s.
/// A period of zero means "does not orbit" and yields zero velocity.
pub fn orbital_period_to_rad_sec(period_days: f32) -> f32 {
    if period_days == 0.0 {
        return 0.0;
    }
    let in_a_day = TAU / period_days;
    in_a_day / 24.0 / 60.0 / 60.0
}

/// Convert a rotation period in sidereal hours to spin velocity in rad/s.
/// A period of zero means "does not spin" and yields zero velocity.
pub fn rotation_period_to_rad_sec(period_hours: f32) -> f32 {
    if period_hours == 0.0 {
        return 0.0;
    }
    let per_hour = TAU / period_hours;
    per_hour / 60.0 / 60.0
}

/// One step along a circular orbital path, independent of any body's tick.
///
/// `velocity` is tangential speed at `radius`; the returned angle advances by
/// `velocity / (2π·radius)` revolution-fraction radians and wraps to ±2π.
/// The offset vector places the orbiter at `distance` from the center in the
/// XZ plane. `radius` must be non-zero.
pub fn orbit_step(last_angle: f32, radius: f32, velocity: f32, distance: f32) -> (f32, Vec3) {
    let velocity_ratio = velocity / (TAU * radius);
    let angle = (last_angle + velocity_ratio) % TAU;
    let offset = Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
    (angle, offset)
}

/// Orbital-plane tilt as two sequential rotations: about +X by `plane.x`,
/// then about +Z by `plane.y`, each applied only when non-zero.
pub fn plane_rotation(plane: Vec2) -> Quat {
    let mut q = Quat::IDENTITY;
    if plane.x != 0.0 {
        q *= Quat::from_axis_angle(Vec3::X, plane.x);
    }
    if plane.y != 0.0 {
        q *= Quat::from_axis_angle(Vec3::Z, plane.y);
    }
    q
}

/// Spin-axis up vector for a body inclined by `inclination` radians about +X.
pub fn inclined_up(inclination: f32) -> Vec3 {
    Quat::from_axis_angle(Vec3::X, inclination) * Vec3::Y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_conversions() {
        // one revolution per day
        let v = orbital_period_to_rad_sec(1.0);
        assert!((v * 86_400.0 - TAU).abs() < 1e-4);
        // one revolution per hour
        let s = rotation_period_to_rad_sec(1.0);
        assert!((s * 3_600.0 - TAU).abs() < 1e-4);
    }

    #[test]
    fn zero_period_means_stationary() {
        assert_eq!(orbital_period_to_rad_sec(0.0), 0.0);
        assert_eq!(rotation_period_to_rad_sec(0.0), 0.0);
    }

    #[test]
    fn orbit_step_offset_magnitude() {
        let (angle, offset) = orbit_step(0.3, 10.0, 2.0, 25.0);
        assert!(angle.abs() < TAU);
        assert!((offset.length() - 25.0).abs() < 1e-3);
        assert_eq!(offset.y, 0.0);
    }

    #[test]
    fn orbit_step_advances_by_velocity_ratio() {
        let radius = 8.0;
        let velocity = 4.0;
        let (angle, _) = orbit_step(0.0, radius, velocity, 1.0);
        assert!((angle - velocity / (TAU * radius)).abs() < 1e-6);
    }

    #[test]
    fn orbit_step_full_revolution_wraps() {
        let radius = 1.0;
        // velocity chosen so one step is exactly one revolution
        let (angle, _) = orbit_step(0.0, radius, TAU * radius * TAU, 1.0);
        assert!(angle.abs() < 1e-4);
    }

    #[test]
    fn plane_rotation_identity_when_zero() {
        assert_eq!(plane_rotation(Vec2::ZERO), Quat::IDENTITY);
    }

    #[test]
    fn inclined_up_tilts_away_from_y() {
        let up = inclined_up(0.0);
        assert!((up - Vec3::Y).length() < 1e-6);
        let tilted = inclined_up(std::f32::consts::FRAC_PI_2);
        // 90 degrees about +X carries +Y onto +Z
        assert!((tilted - Vec3::Z).length() < 1e-5);
    }
}
