use log::{debug, info};

use crate::api::types::{CommandOutcome, HostEvent};
use crate::catalog::manifest::{BodyManifest, CatalogError};
use crate::core::arena::BodyArena;
use crate::core::transform::Transform;
use crate::input::queue::CommandQueue;
use crate::nav::autopilot::Navigator;
use crate::nav::command;
use crate::nav::pose::ReferencePose;
use crate::systems::present::FrameSnapshot;

/// Configuration for a simulation run, provided by the host.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Fixed timestep in seconds for host loops (default: 1/60).
    pub fixed_dt: f32,
    /// Initial global time base (default: 1.0).
    pub time_base: f32,
    /// Initial craft velocity (default: 0.5).
    pub initial_velocity: f32,
    /// Initial orbital elevation (default: 0.05).
    pub initial_orbit_elevation: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            time_base: 1.0,
            initial_velocity: 0.5,
            initial_orbit_elevation: 0.05,
        }
    }
}

/// The shared simulation state, owned by the host and passed by reference to
/// every collaborator. There are no process-wide statics: everything a tick
/// touches lives here.
pub struct SimContext {
    pub arena: BodyArena,
    /// The viewpoint the navigator drives.
    pub craft: Transform,
    /// Mirror of the external pose-tracking collaborator.
    pub pose: ReferencePose,
    /// Global time scale applied to every motion this tick.
    pub time_base: f32,
    /// Global multiplier on atmosphere-shell spin rates.
    pub atmosphere_spin: f32,
    /// Host hint: whether atmosphere shells should be drawn.
    pub atmosphere_visible: bool,
    utterances: Vec<String>,
    events: Vec<HostEvent>,
}

impl SimContext {
    pub fn new(arena: BodyArena) -> Self {
        Self {
            arena,
            craft: Transform::new(),
            pose: ReferencePose::new(),
            time_base: 1.0,
            atmosphere_spin: 1.0,
            atmosphere_visible: true,
            utterances: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue an utterance for the voice-output sink. Fire-and-forget.
    pub fn speak(&mut self, line: impl Into<String>) {
        self.utterances.push(line.into());
    }

    /// Queue an event for the host. Fire-and-forget.
    pub fn emit(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    /// Pending utterances, oldest first.
    pub fn utterances(&self) -> &[String] {
        &self.utterances
    }

    /// Pending host events, oldest first.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Take all pending utterances for the voice-output sink.
    pub fn drain_utterances(&mut self) -> Vec<String> {
        std::mem::take(&mut self.utterances)
    }

    /// Take all pending host events.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the body tree and the atmosphere shells one tick from the
    /// craft's observer position.
    pub fn advance(&mut self) {
        let observer = self.craft.position;
        let time_scale = self.time_base;
        self.arena.advance(observer, time_scale);
        self.arena
            .advance_shells(observer, self.atmosphere_spin * time_scale, &mut self.events);
    }
}

/// The assembled simulation: context, navigator, and the command queue the
/// host feeds utterances into. One instance per run.
pub struct Simulation {
    pub ctx: SimContext,
    pub navigator: Navigator,
    pub commands: CommandQueue,
    config: SimConfig,
}

impl Simulation {
    /// Build and validate the body tree, then assemble the simulation.
    /// Catalog violations are startup errors; nothing ticks until they pass.
    pub fn new(manifest: &BodyManifest, config: SimConfig) -> Result<Self, CatalogError> {
        let arena = manifest.build()?;
        info!("simulation built with {} bodies", arena.len());
        let mut ctx = SimContext::new(arena);
        ctx.time_base = config.time_base;
        let mut navigator = Navigator::new();
        navigator.set_velocity(config.initial_velocity);
        navigator.set_orbit_elevation(config.initial_orbit_elevation);
        Ok(Self {
            ctx,
            navigator,
            commands: CommandQueue::new(),
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// One full tick: interpret queued commands, advance the body tree and
    /// shells, then run the navigator. Completes entirely within the call.
    pub fn tick(&mut self) {
        for line in self.commands.drain() {
            let outcome = command::parse(&line, &mut self.navigator, &mut self.ctx);
            debug!("queued command {line:?} -> {outcome:?}");
        }
        self.ctx.advance();
        self.navigator.tick(&mut self.ctx);
    }

    /// Interpret one utterance immediately, outside the queue.
    pub fn execute(&mut self, line: &str) -> CommandOutcome {
        command::parse(line, &mut self.navigator, &mut self.ctx)
    }

    /// Mode summary for status displays.
    pub fn status_line(&self) -> String {
        self.navigator.status_line()
    }

    /// Presentation snapshot of every body plus the craft.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::collect(&self.ctx.arena, self.ctx.craft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::catalog::solar::solar_system;

    fn simulation() -> Simulation {
        Simulation::new(&solar_system(), SimConfig::default()).unwrap()
    }

    #[test]
    fn new_applies_config() {
        let sim = Simulation::new(
            &solar_system(),
            SimConfig {
                time_base: 4.0,
                initial_velocity: 2.0,
                ..SimConfig::default()
            },
        )
        .unwrap();
        assert_eq!(sim.ctx.time_base, 4.0);
        assert_eq!(sim.navigator.velocity(), 2.0);
    }

    #[test]
    fn queued_commands_apply_on_tick() {
        let mut sim = simulation();
        sim.commands.push("track earth");
        assert_eq!(sim.navigator.track(), None);
        sim.tick();
        assert_eq!(sim.navigator.track(), sim.ctx.arena.find("earth"));
    }

    #[test]
    fn tick_advances_bodies_and_navigator() {
        let mut sim = simulation();
        sim.tick();
        let earth = sim.ctx.arena.get(sim.ctx.arena.find("earth").unwrap()).unwrap();
        assert!(earth.position().length() > 0.0);
    }

    #[test]
    fn atmosphere_entry_fires_once_per_crossing() {
        let mut sim = simulation();
        let earth_id = sim.ctx.arena.find("earth").unwrap();
        sim.ctx.arena.get_mut(earth_id).unwrap().add_atmosphere(2.05, 0.0, 0.0, true);
        sim.tick();
        sim.ctx.drain_events();

        // park the craft inside the shell for several ticks with time frozen
        sim.ctx.time_base = 0.0;
        let earth_pos = sim.ctx.arena.get(earth_id).unwrap().position();
        sim.navigator.set_velocity(0.0);
        sim.ctx.craft.position = earth_pos;
        sim.tick();
        sim.tick();
        sim.tick();
        let entries: Vec<_> = sim
            .ctx
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::AtmosphereEntered { .. }))
            .collect();
        assert_eq!(
            entries,
            [HostEvent::AtmosphereEntered { body: earth_id, shell: 0 }]
        );
    }

    #[test]
    fn status_line_reflects_executed_commands() {
        let mut sim = simulation();
        assert_eq!(sim.status_line(), "");
        sim.execute("orbit earth");
        assert_eq!(sim.status_line(), "Orbit:");
    }

    #[test]
    fn snapshot_matches_arena_size() {
        let sim = simulation();
        let snap = sim.snapshot();
        assert_eq!(snap.bodies.len(), sim.ctx.arena.len());
    }

    #[test]
    fn unknown_body_ids_are_rejected_gracefully() {
        let mut sim = simulation();
        // a stale id from another arena must not panic anything
        sim.navigator.set_track(BodyId(9_999));
        sim.tick();
    }
}
