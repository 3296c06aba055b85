use glam::{Quat, Vec2, Vec3};

use crate::api::types::BodyId;
use crate::catalog::manifest::BodyParams;
use crate::core::atmosphere::AtmosphereShell;
use crate::core::orbit::{
    orbital_period_to_rad_sec, plane_rotation, rotation_period_to_rad_sec, TAU,
};
use crate::core::transform::Transform;
use crate::systems::lighting::{CylImage, Terminator};

/// Simulation radius assigned to the root body; descendants derive theirs
/// from the parent's simulation radius scaled by physical-radius ratio.
pub const ROOT_SIM_RADIUS: f32 = 4800.0;

/// One node of the celestial hierarchy: orbital and spin parameters, scaled
/// geometry, owned atmosphere shells and an optional terminator synthesizer.
///
/// Bodies are constructed once at startup through [`BodyArena`] insertion and
/// never destroyed during a run; the parent link is set at construction and
/// immutable thereafter.
///
/// [`BodyArena`]: crate::core::arena::BodyArena
#[derive(Debug)]
pub struct CelestialBody {
    id: BodyId,
    name: String,
    depth: u32,
    parent: Option<BodyId>,
    pub(crate) children: Vec<BodyId>,

    /// Physical radius (km), used only for scale derivation.
    radius: f32,
    /// Scaled display-space radius.
    sim_radius: f32,
    /// Scaled parent-relative placement distance.
    orbit_distance: f32,
    /// Orbital angular velocity, rad/s.
    orbital_velocity: f32,
    /// Spin angular velocity, rad/s.
    spin: f32,
    /// Width-over-breadth ratio compressing the orbit's Z half-axis.
    eccentricity: f32,
    /// u/v rotation angles of the orbital plane, radians.
    orbital_plane: Vec2,
    /// Offset added to the orbit angle, radians.
    period_offset: f32,
    /// Fixed centerpoint bias for orbit calculations.
    bias: Vec3,
    /// Base orientation tilting the spin axis by the inclination.
    axis_tilt: Quat,

    pub(crate) shells: Vec<AtmosphereShell>,
    pub(crate) terminator: Option<Terminator>,

    position: Vec3,
    frame_rotation: Quat,
    spin_angle: f32,
    last_orbit_angle: f32,
    last_relative: Vec3,
    last_absolute_delta: Vec3,
    observer_distance: f32,
}

impl CelestialBody {
    /// Construct from catalog parameters. `parent` is the already-built
    /// parent body and its id; `None` builds the root.
    pub(crate) fn new(id: BodyId, params: &BodyParams, parent: Option<(&CelestialBody, BodyId)>) -> Self {
        let inclination = params.inclination_deg.to_radians();
        let (orbit_distance, sim_radius, parent_pos, parent_id) = match parent {
            Some((p, pid)) => (
                params.distance / p.radius + p.sim_radius,
                params.radius / p.radius * p.sim_radius,
                p.position,
                Some(pid),
            ),
            None => (0.0, ROOT_SIM_RADIUS, Vec3::ZERO, None),
        };
        Self {
            id,
            name: params.name.clone(),
            depth: params.depth,
            parent: parent_id,
            children: Vec::new(),
            radius: params.radius,
            sim_radius,
            orbit_distance,
            orbital_velocity: orbital_period_to_rad_sec(params.orbital_period_days),
            spin: rotation_period_to_rad_sec(params.rotation_period_hours),
            eccentricity: params.eccentricity,
            orbital_plane: Vec2::ZERO,
            period_offset: 0.0,
            bias: Vec3::ZERO,
            axis_tilt: Quat::from_axis_angle(Vec3::X, inclination),
            shells: Vec::new(),
            terminator: None,
            position: parent_pos + Vec3::new(0.0, 0.0, orbit_distance),
            frame_rotation: Quat::IDENTITY,
            spin_angle: 0.0,
            last_orbit_angle: 0.0,
            last_relative: Vec3::ZERO,
            last_absolute_delta: Vec3::ZERO,
            observer_distance: f32::MAX,
        }
    }

    // -- Identity and tree shape --

    pub fn id(&self) -> BodyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn parent(&self) -> Option<BodyId> {
        self.parent
    }

    pub fn children(&self) -> &[BodyId] {
        &self.children
    }

    // -- Geometry and motion state --

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn sim_radius(&self) -> f32 {
        self.sim_radius
    }

    /// Rescale the body. The presented transform picks the new scale up on
    /// the next query; attached terminator activation distances keep the
    /// radius they were registered with.
    pub fn set_sim_radius(&mut self, value: f32) {
        self.sim_radius = value;
    }

    pub fn orbit_distance(&self) -> f32 {
        self.orbit_distance
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Up vector of the orbit frame (plane tilt only, no spin).
    pub fn frame_up(&self) -> Vec3 {
        self.frame_rotation * Vec3::Y
    }

    /// Up vector of the spinning body itself: the tilted spin axis.
    pub fn body_up(&self) -> Vec3 {
        self.frame_rotation * self.axis_tilt * Vec3::Y
    }

    /// Presented world transform: position, composed orientation
    /// (plane tilt, axis tilt, accumulated spin), simulation-radius scale.
    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.frame_rotation * self.axis_tilt * Quat::from_rotation_y(self.spin_angle),
            scale: self.sim_radius,
        }
    }

    pub fn last_relative(&self) -> Vec3 {
        self.last_relative
    }

    pub fn last_absolute_delta(&self) -> Vec3 {
        self.last_absolute_delta
    }

    pub fn last_orbit_angle(&self) -> f32 {
        self.last_orbit_angle
    }

    pub fn observer_distance(&self) -> f32 {
        self.observer_distance
    }

    /// Tangential orbital speed at the current radius.
    pub fn speed(&self) -> f32 {
        (self.orbital_velocity / TAU) * (TAU * self.orbit_distance)
    }

    // -- Attachments --

    /// Register an atmosphere shell. Shells are immutable once created and
    /// never removed. Returns the shell index.
    pub fn add_atmosphere(
        &mut self,
        distance: f32,
        spin: f32,
        spin_offset: f32,
        enterable: bool,
    ) -> usize {
        let index = self.shells.len();
        let shell =
            AtmosphereShell::new(self.id, &self.name, index, distance, spin, spin_offset, enterable);
        self.shells.push(shell);
        index
    }

    pub fn shells(&self) -> &[AtmosphereShell] {
        &self.shells
    }

    /// Attach spin-synchronized day/night synthesis. `activation_ratio` is
    /// expressed in simulation radii and stored pre-multiplied.
    pub fn attach_terminator(
        &mut self,
        day: CylImage,
        night: CylImage,
        column_offset: i32,
        activation_ratio: f32,
    ) {
        let activation_distance = activation_ratio * self.sim_radius;
        self.terminator = Some(Terminator::new(day, night, column_offset, activation_distance));
    }

    pub fn terminator(&self) -> Option<&Terminator> {
        self.terminator.as_ref()
    }

    // -- Per-tick advance --

    /// Advance one tick. `parent_pos` must be the parent's absolute position
    /// as already updated this tick (zero for the root).
    pub(crate) fn advance_from(&mut self, parent_pos: Vec3, observer: Vec3, time_scale: f32) {
        let original_position = self.position;

        let angle = (time_scale * -self.orbital_velocity + self.last_orbit_angle) % TAU;
        let rv = Vec3::new(
            (angle + self.period_offset).cos() * self.orbit_distance,
            0.0,
            (angle + self.period_offset).sin() * self.orbit_distance * self.eccentricity,
        );
        self.last_relative = rv;
        self.frame_rotation = plane_rotation(self.orbital_plane);

        let abs_pos = rv + parent_pos + self.bias;
        self.position = abs_pos;
        self.observer_distance = (observer - abs_pos).length();
        self.last_orbit_angle = angle;

        let spin_delta = self.rotational_spin(time_scale);
        self.spin_angle = (self.spin_angle + spin_delta).rem_euclid(TAU);
        if let Some(term) = self.terminator.as_mut() {
            term.update(self.spin_angle, self.observer_distance);
        }

        self.last_absolute_delta = abs_pos - original_position;
    }

    /// Change the orbit-angle offset, immediately re-placing the body with
    /// the offset delta without advancing time.
    pub fn set_period_offset(&mut self, offset: f32, parent_pos: Vec3) {
        if offset == self.period_offset {
            return;
        }
        let diff = offset - self.period_offset;
        let rv = Vec3::new(
            diff.cos() * self.orbit_distance,
            0.0,
            diff.sin() * self.orbit_distance * self.eccentricity,
        );
        self.frame_rotation = plane_rotation(self.orbital_plane);
        self.position = rv + parent_pos + self.bias;
        self.period_offset = offset;
    }

    /// Spin accumulated over one tick at the given time scale, wrapped.
    pub fn rotational_spin(&self, time_scale: f32) -> f32 {
        (time_scale * self.spin) % TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::manifest::BodyParams;

    fn root_params() -> BodyParams {
        BodyParams {
            name: "Star".into(),
            parent: None,
            depth: 0,
            mass: 1.0e30,
            distance: 0.0,
            radius: 695_000.0,
            inclination_deg: 0.0,
            orbital_period_days: 0.0,
            rotation_period_hours: 1.17,
            surface_gravity: 273.8,
            eccentricity: 1.0,
        }
    }

    fn child_params(name: &str, distance: f32, radius: f32, period: f32) -> BodyParams {
        BodyParams {
            name: name.into(),
            parent: Some("Star".into()),
            depth: 1,
            mass: 1.0e24,
            distance,
            radius,
            inclination_deg: 9.0,
            orbital_period_days: period,
            rotation_period_hours: 24.0,
            surface_gravity: 9.78,
            eccentricity: 0.97,
        }
    }

    #[test]
    fn root_uses_base_sim_radius() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        assert_eq!(root.sim_radius(), ROOT_SIM_RADIUS);
        assert_eq!(root.orbit_distance(), 0.0);
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn child_derives_scaled_geometry() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let params = child_params("Terra", 179_600_000.0, 6_378.15, 365.256);
        let child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));
        let expected_dist = params.distance / root.radius() + root.sim_radius();
        let expected_sim = params.radius / root.radius() * root.sim_radius();
        assert!((child.orbit_distance() - expected_dist).abs() < 1e-2);
        assert!((child.sim_radius() - expected_sim).abs() < 1e-4);
        assert_eq!(child.parent(), Some(BodyId(0)));
    }

    #[test]
    fn zero_time_scale_is_idempotent() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let params = child_params("Terra", 1_000_000.0, 6_000.0, 100.0);
        let mut child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));

        child.advance_from(Vec3::ZERO, Vec3::ZERO, 0.0);
        let pos = child.position();
        let rot = child.transform().rotation;
        for _ in 0..10 {
            child.advance_from(Vec3::ZERO, Vec3::ZERO, 0.0);
        }
        assert!((child.position() - pos).length() < 1e-6);
        assert!((child.transform().rotation.dot(rot).abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orbit_angle_is_periodic() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let params = child_params("Terra", 1_000_000.0, 6_000.0, 10.0);
        let mut child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));

        child.advance_from(Vec3::ZERO, Vec3::ZERO, 0.0);
        let start = child.position();
        // one full orbital period in seconds, applied as a single tick
        let period_secs = params.orbital_period_days * 24.0 * 3600.0;
        child.advance_from(Vec3::ZERO, Vec3::ZERO, period_secs);
        assert!(
            (child.position() - start).length() < child.orbit_distance() * 1e-3,
            "period did not close the orbit: {:?} vs {:?}",
            child.position(),
            start
        );
    }

    #[test]
    fn eccentricity_compresses_z() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let mut params = child_params("Terra", 1_000_000.0, 6_000.0, 4.0);
        params.eccentricity = 0.5;
        let mut child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));
        // quarter period puts the body on the Z half-axis
        let quarter = params.orbital_period_days * 24.0 * 3600.0 / 4.0;
        child.advance_from(Vec3::ZERO, Vec3::ZERO, quarter);
        let rel = child.last_relative();
        assert!(
            (rel.z.abs() - child.orbit_distance() * 0.5).abs() < child.orbit_distance() * 1e-2,
            "z = {}",
            rel.z
        );
    }

    #[test]
    fn speed_is_velocity_times_distance() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let params = child_params("Terra", 1_000_000.0, 6_000.0, 50.0);
        let child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));
        let v = orbital_period_to_rad_sec(50.0);
        assert!((child.speed() - v * child.orbit_distance()).abs() < 1e-3);
    }

    #[test]
    fn period_offset_replaces_position_without_time() {
        let root = CelestialBody::new(BodyId(0), &root_params(), None);
        let params = child_params("Terra", 1_000_000.0, 6_000.0, 100.0);
        let mut child = CelestialBody::new(BodyId(1), &params, Some((&root, BodyId(0))));
        child.advance_from(Vec3::ZERO, Vec3::ZERO, 0.0);
        let before = child.position();
        child.set_period_offset(std::f32::consts::FRAC_PI_2, Vec3::ZERO);
        assert!((child.position() - before).length() > 1.0);
    }

    #[test]
    fn atmosphere_registration_orders_indices() {
        let mut root = CelestialBody::new(BodyId(0), &root_params(), None);
        assert_eq!(root.add_atmosphere(2.05, 0.0, 0.0, false), 0);
        assert_eq!(root.add_atmosphere(4.0, 0.1, 0.0, true), 1);
        assert_eq!(root.shells()[1].name, "StarAtmosphere1");
    }
}
