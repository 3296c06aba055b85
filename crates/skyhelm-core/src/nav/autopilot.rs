use glam::{Quat, Vec2, Vec3};
use log::info;

use crate::api::sim::SimContext;
use crate::api::types::BodyId;
use crate::core::orbit::{orbit_step, TAU};
use crate::systems::probe;

/// Length of the obstacle probe cast along the travel direction.
pub const PROBE_LENGTH: f32 = 50.0;
/// Maximum deflection applied when the probe strikes at zero distance.
const MAX_DEFLECTION_DEG: f32 = 140.0;
/// Fraction of the destination's simulation radius at which fly-to
/// completes into an orbit.
const ARRIVAL_RADIUS_FACTOR: f32 = 0.53;
/// Default trim applied by bare faster/slower.
const TRIM_RATE: f32 = 0.05;

const DEFAULT_VELOCITY: f32 = 0.5;
const DEFAULT_ORBIT_ELEVATION: f32 = 0.05;

/// Obstacle-avoidance deflection for a probe hit at `hit_distance`:
/// zero at the full probe length, approaching the maximum as the hit
/// closes to zero. Radians.
pub fn deflection_angle(hit_distance: f32) -> f32 {
    MAX_DEFLECTION_DEG.to_radians() * (1.0 - hit_distance / PROBE_LENGTH)
}

/// Snapshot of the resumable navigator state, pushed on "pause" and
/// restored verbatim on "resume".
#[derive(Debug, Clone, Copy)]
struct Program {
    destination: Option<BodyId>,
    follow: Option<BodyId>,
    orbit: Option<BodyId>,
    track: Option<BodyId>,
    velocity: f32,
}

/// The autopilot: simultaneous, independently-settable navigation modes
/// plus the craft's scalar motion state.
///
/// Modes are not an exclusive state machine. Every active mode runs each
/// tick in the fixed order Orbit, Track, Follow, Destination; idle drift
/// applies only when Orbit, Follow and Destination are all clear (Track is
/// orientation-only and does not suppress drift). Entering an orbit clears
/// the destination; flying somewhere exits and clears any orbit.
pub struct Navigator {
    destination: Option<BodyId>,
    orbit: Option<BodyId>,
    track: Option<BodyId>,
    follow: Option<BodyId>,
    /// Captured once when Follow begins.
    follow_distance: f32,
    velocity: f32,
    orbit_elevation: f32,
    attitude_locked: bool,
    last_orbit_angle: f32,
    last_orbit_position: Vec3,
    /// The body most recently referred to — target of "enter orbit" and
    /// excluded from "what is that" scans.
    selected: Option<BodyId>,
    program_stack: Vec<Program>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            destination: None,
            orbit: None,
            track: None,
            follow: None,
            follow_distance: 0.0,
            velocity: DEFAULT_VELOCITY,
            orbit_elevation: DEFAULT_ORBIT_ELEVATION,
            attitude_locked: true,
            last_orbit_angle: 0.0,
            last_orbit_position: Vec3::ZERO,
            selected: None,
            program_stack: Vec::new(),
        }
    }

    // -- Mode and scalar state access --

    pub fn destination(&self) -> Option<BodyId> {
        self.destination
    }

    pub fn orbit(&self) -> Option<BodyId> {
        self.orbit
    }

    pub fn track(&self) -> Option<BodyId> {
        self.track
    }

    pub fn follow(&self) -> Option<BodyId> {
        self.follow
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    pub fn orbit_elevation(&self) -> f32 {
        self.orbit_elevation
    }

    pub fn set_orbit_elevation(&mut self, elevation: f32) {
        self.orbit_elevation = elevation;
    }

    pub fn attitude_locked(&self) -> bool {
        self.attitude_locked
    }

    pub fn set_attitude_locked(&mut self, locked: bool) {
        self.attitude_locked = locked;
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    pub fn set_selected(&mut self, selected: Option<BodyId>) {
        self.selected = selected;
    }

    pub fn last_orbit_position(&self) -> Vec3 {
        self.last_orbit_position
    }

    /// One-line mode summary for status displays.
    pub fn status_line(&self) -> String {
        let mut s = String::new();
        if self.orbit.is_some() {
            s.push_str("Orbit:");
        }
        if self.track.is_some() {
            s.push_str("Track:");
        }
        if self.follow.is_some() {
            s.push_str("Follow:");
        }
        if self.destination.is_some() {
            s.push_str("Fly:");
        }
        s
    }

    // -- Mode entry points --

    /// Begin flying toward `target`, exiting and clearing any active orbit.
    pub fn fly_to(&mut self, target: BodyId, ctx: &mut SimContext) {
        self.selected = Some(target);
        if self.orbit.is_some() {
            self.exit_orbit(ctx);
        }
        self.orbit = None;
        self.destination = Some(target);
        info!("autopilot: fly-to {:?}", target);
    }

    /// Place the craft in orbit around `target`: clears the destination,
    /// derives the orbital elevation from the target's size, matches
    /// velocity to the target's spin, and announces the entry.
    pub fn enter_orbit(&mut self, target: BodyId, ctx: &mut SimContext) {
        let Some((sim_radius, pos, last_relative, frame_up, spin, name)) =
            ctx.arena.get(target).map(|b| {
                (b.sim_radius(), b.position(), b.last_relative(), b.frame_up(), b.spin(), b.name().to_string())
            })
        else {
            return;
        };

        self.destination = None;
        self.orbit_elevation = sim_radius / 2.0 + (sim_radius * 0.1).max(1.3);
        self.orbit = Some(target);

        let dirv = (pos * -1.0).normalize_or_zero();
        ctx.craft.position = pos + dirv * self.orbit_elevation;
        ctx.craft.look_at(pos + last_relative, frame_up);

        // match velocity to the target's spin rate at the orbital radius
        let circumference = TAU * sim_radius;
        let velocity_ratio = spin / TAU;
        self.velocity = circumference * velocity_ratio;

        // TODO: both deltas below read the X offset, so the seed collapses
        // to acos(1/dx) and goes NaN for axis-aligned entry offsets; confirm
        // the intended seed geometry before touching it.
        let x = ctx.craft.position.x - pos.x;
        let y = ctx.craft.position.x - pos.x;
        let dp = Vec2::new(1.0, 0.0).dot(Vec2::new(x, y));
        self.last_orbit_angle = (dp / (x * y)).acos();

        ctx.speak(format!("now orbiting {name}"));
        ctx.pose.transform.look_at(pos + last_relative, frame_up);
        self.selected = Some(target);
        info!("autopilot: orbiting {name} at elevation {}", self.orbit_elevation);
    }

    /// Leave the current orbit along its tangent, with departure velocity
    /// scaled by the orbited body's cumulative ancestor speed. No-op when
    /// no orbit is active.
    pub fn exit_orbit(&mut self, ctx: &mut SimContext) {
        let Some(orbit_id) = self.orbit else { return };
        let Some((sim_radius, radius, body_up, name)) = ctx
            .arena
            .get(orbit_id)
            .map(|b| (b.sim_radius(), b.radius(), b.body_up(), b.name().to_string()))
        else {
            return;
        };

        let (angle, crv) = orbit_step(self.last_orbit_angle, sim_radius, 0.0, self.orbit_elevation);
        self.last_orbit_angle = angle;
        let dv = crv.normalize_or_zero();
        ctx.craft.set_forward(body_up.cross(dv));

        let scaler = (radius / 160.0) * (sim_radius / 64.0);
        self.velocity = ctx.arena.cumulative_ancestor_speed(orbit_id) * scaler;
        self.orbit = None;
        ctx.speak(format!("leaving orbit of {name}"));
        info!("autopilot: departed {name} at velocity {}", self.velocity);
    }

    /// Keep the craft oriented toward `target` each tick (orientation only).
    pub fn set_track(&mut self, target: BodyId) {
        self.track = Some(target);
    }

    /// Shadow `target` at the current separation, captured now.
    pub fn set_follow(&mut self, target: BodyId, ctx: &SimContext) {
        if let Some(body) = ctx.arena.get(target) {
            self.follow_distance = (body.position() - ctx.craft.position).length();
            self.follow = Some(target);
        }
    }

    // -- Program stack --

    /// Suspend: push the current mode set and velocity, then zero everything.
    pub fn pause(&mut self) {
        self.program_stack.push(Program {
            destination: self.destination,
            follow: self.follow,
            orbit: self.orbit,
            track: self.track,
            velocity: self.velocity,
        });
        self.destination = None;
        self.follow = None;
        self.orbit = None;
        self.track = None;
        self.velocity = 0.0;
    }

    /// Restore the most recent pause snapshot verbatim. Returns false, with
    /// nothing mutated, when the stack is empty.
    pub fn resume(&mut self) -> bool {
        let Some(program) = self.program_stack.pop() else {
            return false;
        };
        self.destination = program.destination;
        self.follow = program.follow;
        self.orbit = program.orbit;
        self.track = program.track;
        self.velocity = program.velocity;
        true
    }

    /// Cancel everything: clear every mode and zero the velocity.
    pub fn stop(&mut self) {
        self.destination = None;
        self.follow = None;
        self.orbit = None;
        self.track = None;
        self.velocity = 0.0;
    }

    /// Bare faster/slower trim on the craft velocity.
    pub fn trim_velocity(&mut self, grow: bool) {
        if grow {
            self.velocity += self.velocity * TRIM_RATE;
        } else {
            self.velocity -= self.velocity * TRIM_RATE;
        }
    }

    // -- Per-tick update --

    /// Advance the craft one tick. Every active mode runs, in fixed order;
    /// idle drift along the locked or free-look forward direction applies
    /// only when no positional mode is active.
    pub fn tick(&mut self, ctx: &mut SimContext) {
        let time_base = ctx.time_base;
        ctx.pose.transform.position = ctx.craft.position;

        if let Some(orbit_id) = self.orbit {
            if let Some((sim_radius, pos, up)) =
                ctx.arena.get(orbit_id).map(|b| (b.sim_radius(), b.position(), b.frame_up()))
            {
                let (angle, crv) =
                    orbit_step(self.last_orbit_angle, sim_radius, self.velocity * time_base, self.orbit_elevation);
                self.last_orbit_angle = angle;
                let new_position = pos + crv;
                let vv = up.cross(crv.normalize_or_zero());
                ctx.craft.position = new_position;
                ctx.craft.look_at(new_position + vv, up);
                ctx.pose.transform.position = ctx.craft.position;
                self.last_orbit_position = ctx.craft.position;
            }
        }

        if let Some(track_id) = self.track {
            if let Some(pos) = ctx.arena.get(track_id).map(|b| b.position()) {
                ctx.craft.set_forward((pos - ctx.craft.position).normalize_or_zero());
            }
        }

        if let Some(follow_id) = self.follow {
            if let Some(pos) = ctx.arena.get(follow_id).map(|b| b.position()) {
                let away = (ctx.craft.position - pos).normalize_or_zero();
                ctx.craft.position = pos + away * self.follow_distance;
            }
        }

        if let Some(dest_id) = self.destination {
            if let Some((pos, sim_radius)) =
                ctx.arena.get(dest_id).map(|b| (b.position(), b.sim_radius()))
            {
                let dir_vec = pos - ctx.craft.position;
                let dist = dir_vec.length();
                if dist <= sim_radius * ARRIVAL_RADIUS_FACTOR {
                    self.enter_orbit(dest_id, ctx);
                    self.destination = None;
                }
                let mut dvn = dir_vec.normalize_or_zero();
                if let Some(hit) = probe::cast(&ctx.arena, ctx.craft.position, dvn, PROBE_LENGTH) {
                    // deflect only around obstacles, never the destination,
                    // and not on the arrival tick
                    if self.destination.is_some_and(|dest| hit.body != dest) {
                        dvn = Quat::from_axis_angle(Vec3::X, deflection_angle(hit.distance)) * dvn;
                    }
                }
                if self.velocity * 80.0 >= dist {
                    self.velocity -= self.velocity * 0.22;
                } else if self.velocity * 200.0 < dist && self.velocity < 100.0 {
                    self.velocity += self.velocity * 0.06;
                }
                ctx.craft.position += dvn * self.velocity * time_base;
                ctx.craft.set_forward(dvn);
                ctx.pose.transform.position = ctx.craft.position;
            }
        }

        if self.orbit.is_none() && self.follow.is_none() && self.destination.is_none() {
            let dirv = if self.attitude_locked {
                ctx.pose.transform.forward()
            } else {
                ctx.craft.forward()
            };
            ctx.craft.position += dirv * self.velocity * time_base;
            ctx.pose.transform.position = ctx.craft.position;
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::sim::SimContext;
    use crate::catalog::manifest::{BodyManifest, BodyParams};

    fn params(name: &str, parent: Option<&str>, distance: f32, radius: f32, period: f32, spin_hours: f32) -> BodyParams {
        BodyParams {
            name: name.into(),
            parent: parent.map(String::from),
            depth: u32::from(parent.is_some()),
            mass: 1.0e24,
            distance,
            radius,
            inclination_deg: 0.0,
            orbital_period_days: period,
            rotation_period_hours: spin_hours,
            surface_gravity: 9.78,
            eccentricity: 1.0,
        }
    }

    /// Star at the origin plus one planet, advanced once so positions and
    /// relative displacements are populated.
    fn test_context() -> (SimContext, BodyId) {
        let manifest = BodyManifest {
            bodies: vec![
                params("Star", None, 0.0, 695_000.0, 0.0, 1.17),
                params("Terra", Some("Star"), 695_000_000.0, 6_950.0, 100.0, 24.0),
            ],
        };
        let mut ctx = SimContext::new(manifest.build().unwrap());
        ctx.arena.advance(Vec3::ZERO, 0.0);
        let terra = ctx.arena.find("terra").unwrap();
        (ctx, terra)
    }

    #[test]
    fn enter_orbit_sets_elevation_and_spin_matched_velocity() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.enter_orbit(terra, &mut ctx);

        let body = ctx.arena.get(terra).unwrap();
        let sim_radius = body.sim_radius();
        assert_eq!(nav.orbit(), Some(terra));
        assert_eq!(nav.destination(), None);
        let expected_elevation = sim_radius / 2.0 + (sim_radius * 0.1).max(1.3);
        assert!((nav.orbit_elevation() - expected_elevation).abs() < 1e-4);
        assert!((nav.velocity() - sim_radius * body.spin()).abs() < 1e-4);
        assert!((ctx.craft.position - body.position()).length() - nav.orbit_elevation() < 1e-2);
        assert_eq!(ctx.utterances(), ["now orbiting Terra"]);
    }

    #[test]
    fn exit_orbit_applies_departure_velocity_formula() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.enter_orbit(terra, &mut ctx);
        nav.exit_orbit(&mut ctx);

        assert_eq!(nav.orbit(), None);
        let body = ctx.arena.get(terra).unwrap();
        let expected = ctx.arena.cumulative_ancestor_speed(terra)
            * (body.radius() / 160.0)
            * (body.sim_radius() / 64.0);
        assert!((nav.velocity() - expected).abs() < expected.abs() * 1e-4 + 1e-6);
        assert_eq!(ctx.utterances().last().map(String::as_str), Some("leaving orbit of Terra"));
    }

    #[test]
    fn exit_orbit_without_orbit_is_a_noop() {
        let (mut ctx, _) = test_context();
        let mut nav = Navigator::new();
        let velocity = nav.velocity();
        nav.exit_orbit(&mut ctx);
        assert_eq!(nav.velocity(), velocity);
        assert!(ctx.utterances().is_empty());
    }

    #[test]
    fn fly_to_clears_an_active_orbit() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.enter_orbit(terra, &mut ctx);
        nav.fly_to(terra, &mut ctx);
        assert_eq!(nav.orbit(), None);
        assert_eq!(nav.destination(), Some(terra));
    }

    #[test]
    fn track_orients_without_moving() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.set_velocity(0.0);
        nav.set_track(terra);
        ctx.craft.position = Vec3::new(0.0, 0.0, -500.0);
        let before = ctx.craft.position;
        nav.tick(&mut ctx);
        assert_eq!(ctx.craft.position, before);
        let expected = (ctx.arena.get(terra).unwrap().position() - before).normalize();
        assert!((ctx.craft.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn follow_holds_the_captured_separation() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        ctx.craft.position = ctx.arena.get(terra).unwrap().position() + Vec3::new(0.0, 0.0, -321.0);
        nav.set_follow(terra, &ctx);
        ctx.craft.position += Vec3::new(40.0, -25.0, 10.0);
        nav.tick(&mut ctx);
        let separation = (ctx.craft.position - ctx.arena.get(terra).unwrap().position()).length();
        assert!((separation - 321.0).abs() < 1e-2);
    }

    #[test]
    fn fly_to_completes_into_orbit_on_arrival() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        let body_pos = ctx.arena.get(terra).unwrap().position();
        let sim_radius = ctx.arena.get(terra).unwrap().sim_radius();
        nav.fly_to(terra, &mut ctx);
        ctx.craft.position = body_pos + Vec3::Z * (sim_radius * 0.4);
        nav.tick(&mut ctx);
        assert_eq!(nav.orbit(), Some(terra));
        assert_eq!(nav.destination(), None);
    }

    #[test]
    fn fly_to_accelerates_toward_a_distant_target() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.fly_to(terra, &mut ctx);
        ctx.craft.position = Vec3::new(0.0, 20_000.0, 0.0);
        let v0 = nav.velocity();
        nav.tick(&mut ctx);
        assert!((nav.velocity() - v0 * 1.06).abs() < 1e-4);
    }

    #[test]
    fn fly_to_brakes_on_close_approach() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.fly_to(terra, &mut ctx);
        nav.set_velocity(50.0);
        // close enough that v * 80 >= dist, but outside the arrival radius
        let body = ctx.arena.get(terra).unwrap();
        ctx.craft.position = body.position() + Vec3::Z * (body.sim_radius() + 200.0);
        nav.tick(&mut ctx);
        assert!((nav.velocity() - 50.0 * 0.78).abs() < 1e-3);
    }

    #[test]
    fn deflection_is_continuous_in_hit_distance() {
        assert!(deflection_angle(PROBE_LENGTH).abs() < 1e-6);
        let max = 140.0_f32.to_radians();
        assert!((deflection_angle(0.0) - max).abs() < 1e-5);
        let mid = deflection_angle(PROBE_LENGTH / 2.0);
        assert!((mid - max / 2.0).abs() < 1e-5);
        // monotone: nearer hits deflect harder
        assert!(deflection_angle(10.0) > deflection_angle(40.0));
    }

    #[test]
    fn pause_then_resume_restores_every_slot() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.set_track(terra);
        nav.fly_to(terra, &mut ctx);
        nav.set_velocity(7.25);

        nav.pause();
        assert_eq!(nav.destination(), None);
        assert_eq!(nav.track(), None);
        assert_eq!(nav.velocity(), 0.0);

        assert!(nav.resume());
        assert_eq!(nav.destination(), Some(terra));
        assert_eq!(nav.track(), Some(terra));
        assert_eq!(nav.velocity(), 7.25);
    }

    #[test]
    fn resume_on_empty_stack_is_rejected_without_mutation() {
        let (_, terra) = test_context();
        let mut nav = Navigator::new();
        nav.set_track(terra);
        nav.set_velocity(3.0);
        assert!(!nav.resume());
        assert_eq!(nav.track(), Some(terra));
        assert_eq!(nav.velocity(), 3.0);
    }

    #[test]
    fn stop_clears_modes_and_velocity() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.fly_to(terra, &mut ctx);
        nav.set_track(terra);
        nav.stop();
        assert_eq!(nav.status_line(), "");
        assert_eq!(nav.velocity(), 0.0);
    }

    #[test]
    fn idle_drift_follows_the_locked_reference_forward() {
        let (mut ctx, _) = test_context();
        let mut nav = Navigator::new();
        nav.set_velocity(2.0);
        ctx.craft.position = Vec3::new(30_000.0, 0.0, 0.0);
        ctx.pose.transform.set_forward(Vec3::X);
        ctx.craft.set_forward(Vec3::Y);

        nav.tick(&mut ctx);
        assert!((ctx.craft.position - Vec3::new(30_002.0, 0.0, 0.0)).length() < 1e-3);

        nav.set_attitude_locked(false);
        nav.tick(&mut ctx);
        assert!((ctx.craft.position - Vec3::new(30_002.0, 2.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn status_line_lists_active_modes_in_priority_order() {
        let (mut ctx, terra) = test_context();
        let mut nav = Navigator::new();
        nav.set_track(terra);
        nav.fly_to(terra, &mut ctx);
        assert_eq!(nav.status_line(), "Track:Fly:");
    }
}
