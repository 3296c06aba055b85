use std::collections::HashMap;

use glam::Vec3;

use crate::api::types::{BodyId, HostEvent};
use crate::catalog::manifest::{BodyParams, CatalogError};
use crate::core::body::CelestialBody;
use crate::core::orbit::TAU;

/// Contiguous storage for the celestial hierarchy, addressed by stable
/// [`BodyId`] indices, plus the case-insensitive name registry the command
/// interpreter reads.
///
/// Insertion requires the parent to already exist, so index order is a
/// topological order: walking ids ascending always updates ancestors before
/// descendants. Bodies are never removed.
pub struct BodyArena {
    bodies: Vec<CelestialBody>,
    by_name: HashMap<String, BodyId>,
    root: Option<BodyId>,
}

impl BodyArena {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(32),
            by_name: HashMap::new(),
            root: None,
        }
    }

    /// Insert a body built from catalog parameters.
    ///
    /// Rejects a second root, an unknown parent name, and a duplicate body
    /// name — all startup configuration errors, checked before simulation
    /// begins.
    pub fn insert(&mut self, params: &BodyParams) -> Result<BodyId, CatalogError> {
        let key = params.name.to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(CatalogError::DuplicateName { name: params.name.clone() });
        }

        let id = BodyId(self.bodies.len() as u32);
        let body = match &params.parent {
            None => {
                if let Some(root) = self.root {
                    return Err(CatalogError::DuplicateRoot {
                        first: self.bodies[root.0 as usize].name().to_string(),
                        second: params.name.clone(),
                    });
                }
                self.root = Some(id);
                CelestialBody::new(id, params, None)
            }
            Some(parent_name) => {
                let parent_id = self.find(parent_name).ok_or_else(|| CatalogError::UnknownParent {
                    body: params.name.clone(),
                    parent: parent_name.clone(),
                })?;
                let body = CelestialBody::new(id, params, Some((&self.bodies[parent_id.0 as usize], parent_id)));
                self.bodies[parent_id.0 as usize].children.push(id);
                body
            }
        };

        self.bodies.push(body);
        self.by_name.insert(key, id);
        Ok(id)
    }

    // -- Lookup --

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut CelestialBody> {
        self.bodies.get_mut(id.0 as usize)
    }

    /// Case-insensitive name lookup.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    pub fn root(&self) -> Option<BodyId> {
        self.root
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    // -- Tree classification --

    /// A planet orbits the root directly: it has a parent but no grandparent.
    pub fn is_planet(&self, id: BodyId) -> bool {
        match self.get(id).and_then(|b| b.parent()) {
            Some(parent) => self.get(parent).is_some_and(|p| p.parent().is_none()),
            None => false,
        }
    }

    /// A moon sits at depth two or more: parent and grandparent both exist.
    pub fn is_moon(&self, id: BodyId) -> bool {
        self.get(id)
            .and_then(|b| b.parent())
            .and_then(|p| self.get(p))
            .is_some_and(|p| p.parent().is_some())
    }

    /// This body's tangential speed plus every ancestor's, up to the root.
    /// Feeds the orbit-departure velocity formula.
    pub fn cumulative_ancestor_speed(&self, id: BodyId) -> f32 {
        let mut sum = 0.0;
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(body) = self.get(cid) else { break };
            sum += body.speed();
            current = body.parent();
        }
        sum
    }

    // -- Per-tick advance --

    /// Advance every body one tick, ancestors strictly before descendants.
    ///
    /// `observer` is the craft position used for terminator activation
    /// distances; `time_scale` is the global time base.
    pub fn advance(&mut self, observer: Vec3, time_scale: f32) {
        for i in 0..self.bodies.len() {
            let parent_pos = match self.bodies[i].parent() {
                Some(pid) => self.bodies[pid.0 as usize].position(),
                None => Vec3::ZERO,
            };
            self.bodies[i].advance_from(parent_pos, observer, time_scale);
        }
    }

    /// Accumulate shell spin and report craft crossings into enterable
    /// shells. `spin_scale` is the global atmosphere-spin factor already
    /// multiplied by the time scale. One event per boundary crossing.
    pub(crate) fn advance_shells(
        &mut self,
        craft_pos: Vec3,
        spin_scale: f32,
        events: &mut Vec<HostEvent>,
    ) {
        for body in &mut self.bodies {
            let center = body.position();
            let sim_radius = body.sim_radius();
            for shell in &mut body.shells {
                shell.spin_sum = (shell.spin_sum + shell.spin * spin_scale) % TAU;
                if !shell.enterable {
                    continue;
                }
                let inside = (craft_pos - center).length() <= shell.trigger_radius(sim_radius);
                if inside && !shell.occupied {
                    events.push(HostEvent::AtmosphereEntered {
                        body: shell.body,
                        shell: shell.index,
                    });
                }
                shell.occupied = inside;
            }
        }
    }
}

impl Default for BodyArena {
    fn default() -> Self {
        Self::new()
    }
}
