use glam::{Mat3, Quat, Vec3};

/// World-space transform: position, orientation, uniform scale.
///
/// Convention throughout the crate: +Z is forward, +Y is up, orbits lie in
/// the XZ plane. `scale` is the rendered size in world units (for bodies,
/// the simulation radius).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Local +Z axis in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local +X axis in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Orient so that `forward()` points at `target`, with `up` as the
    /// reference up vector. No-op when the target coincides with `position`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() > f32::EPSILON {
            self.rotation = look_rotation(dir, up);
        }
    }

    /// Point `forward()` along `dir`, keeping world +Y as the up reference.
    pub fn set_forward(&mut self, dir: Vec3) {
        if dir.length_squared() > f32::EPSILON {
            self.rotation = look_rotation(dir, Vec3::Y);
        }
    }
}

/// Rotation whose +Z axis is `forward` and whose +Y axis is as close to `up`
/// as orthonormality allows. Falls back to +X as the right axis when
/// `forward` and `up` are parallel.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut r = up.cross(f).normalize_or_zero();
    if r == Vec3::ZERO {
        r = Vec3::X;
    }
    let u = f.cross(r);
    Quat::from_mat3(&Mat3::from_cols(r, u, f))
}
