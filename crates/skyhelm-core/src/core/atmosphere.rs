use crate::api::types::BodyId;

/// A shell surrounding a body at an offset distance from its surface,
/// spinning at its own rate (cloud layers, entry boundaries).
///
/// Descriptor fields are fixed at registration; only the accumulated spin
/// and the craft-containment state change during a run. Entry into an
/// enterable shell is reported as a `HostEvent::AtmosphereEntered` on the
/// context event queue.
#[derive(Debug, Clone)]
pub struct AtmosphereShell {
    /// Body this shell surrounds.
    pub body: BodyId,
    /// `<BodyName>Atmosphere<index>`.
    pub name: String,
    /// Position in the owning body's shell list.
    pub index: usize,
    /// Offset from the body surface (simulation units).
    pub distance: f32,
    /// Spin rate relative to the body, scaled by the context's global
    /// atmosphere-spin factor.
    pub spin: f32,
    /// Fixed phase offset added to the accumulated spin.
    pub spin_offset: f32,
    /// Whether crossing this shell notifies the host.
    pub enterable: bool,
    pub(crate) spin_sum: f32,
    pub(crate) occupied: bool,
}

impl AtmosphereShell {
    pub(crate) fn new(
        body: BodyId,
        body_name: &str,
        index: usize,
        distance: f32,
        spin: f32,
        spin_offset: f32,
        enterable: bool,
    ) -> Self {
        Self {
            body,
            name: format!("{body_name}Atmosphere{index}"),
            index,
            distance,
            spin,
            spin_offset,
            enterable,
            spin_sum: 0.0,
            occupied: false,
        }
    }

    /// Distance from the body center at which the shell sits.
    pub fn trigger_radius(&self, sim_radius: f32) -> f32 {
        sim_radius + self.distance
    }

    /// Accumulated spin angle plus the fixed phase offset.
    pub fn spin_angle(&self) -> f32 {
        self.spin_sum + self.spin_offset
    }
}
