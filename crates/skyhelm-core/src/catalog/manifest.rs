use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::arena::BodyArena;

/// Construction parameters for one body, as carried by a catalog manifest.
///
/// Parents are named, not indexed, so manifests stay order-independent to a
/// reader — but bodies must still be listed ancestors-first, since building
/// resolves parents as it goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyParams {
    pub name: String,
    /// Parent body name; `None` marks the root.
    #[serde(default)]
    pub parent: Option<String>,
    /// Depth in the tree as declared (0 = root).
    pub depth: u32,
    /// Mass in kg. Carried for hosts; the simplified motion model does not
    /// consume it.
    pub mass: f32,
    /// Orbital distance from the parent, km.
    pub distance: f32,
    /// Physical radius, km.
    pub radius: f32,
    /// Orbital-plane inclination, degrees.
    pub inclination_deg: f32,
    /// Orbital period in Earth days; 0 = does not orbit.
    pub orbital_period_days: f32,
    /// Rotation period in sidereal hours; 0 = does not spin.
    pub rotation_period_hours: f32,
    /// Surface gravity in m/s². Carried for hosts, not consumed by motion.
    pub surface_gravity: f32,
    /// Orbit width-over-breadth eccentricity ratio.
    pub eccentricity: f32,
}

/// Startup configuration errors, rejected before simulation begins.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("manifest declares no bodies")]
    Empty,
    #[error("two roots declared: {first} and {second}")]
    DuplicateRoot { first: String, second: String },
    #[error("body {body} names unknown parent {parent}")]
    UnknownParent { body: String, parent: String },
    #[error("body name {name} is already registered")]
    DuplicateName { name: String },
    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A full system description: the ordered list of bodies to build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyManifest {
    pub bodies: Vec<BodyParams>,
}

impl BodyManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build and validate the body arena. The first listed body must be the
    /// root; descendants must follow their ancestors.
    pub fn build(&self) -> Result<BodyArena, CatalogError> {
        if self.bodies.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut arena = BodyArena::new();
        for params in &self.bodies {
            arena.insert(params)?;
        }
        Ok(arena)
    }
}
