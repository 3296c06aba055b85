/// Read-only per-tick frame snapshot for presentation layers.
///
/// The renderer consumes one snapshot per tick and never reaches back into
/// simulation state; the core never depends on render timing.
use crate::core::arena::BodyArena;
use crate::core::transform::Transform;
use crate::systems::lighting::Binding;

/// One body's presentable state.
#[derive(Debug, Clone)]
pub struct BodyFrame {
    pub name: String,
    pub transform: Transform,
    /// Which texture to bind, when the body carries a terminator.
    pub binding: Option<Binding>,
    /// Accumulated spin angles of the body's atmosphere shells, in shell
    /// registration order.
    pub shell_angles: Vec<f32>,
}

/// All bodies plus the craft, captured at the end of a tick.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub bodies: Vec<BodyFrame>,
    pub craft: Transform,
}

impl FrameSnapshot {
    pub fn collect(arena: &BodyArena, craft: Transform) -> Self {
        let bodies = arena
            .iter()
            .map(|body| BodyFrame {
                name: body.name().to_string(),
                transform: body.transform(),
                binding: body.terminator().map(|t| t.binding()),
                shell_angles: body.shells().iter().map(|s| s.spin_angle()).collect(),
            })
            .collect();
        Self { bodies, craft }
    }
}
