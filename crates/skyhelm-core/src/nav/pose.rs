use crate::core::transform::Transform;

/// Mirror of the external pose-tracking collaborator.
///
/// The tracker supplies the reference transform each tick (hosts write
/// `transform` directly); the navigator reads its forward vector while the
/// attitude lock is engaged, keeps its position pinned to the craft, and can
/// capture ("mark") the current transform as a restore point.
#[derive(Debug, Clone, Copy)]
pub struct ReferencePose {
    pub transform: Transform,
    mark: Transform,
}

impl ReferencePose {
    pub fn new() -> Self {
        Self {
            transform: Transform::new(),
            mark: Transform::new(),
        }
    }

    /// Capture the current transform as the restore point.
    pub fn mark(&mut self) {
        self.mark = self.transform;
    }

    /// The captured restore point — the identity transform until the first
    /// `mark`.
    pub fn marked(&self) -> Transform {
        self.mark
    }

    /// Re-baseline the reference onto the craft ("zero" / "front").
    pub fn recenter_on(&mut self, craft: &Transform) {
        self.transform.position = craft.position;
        self.transform.rotation = craft.rotation;
    }
}

impl Default for ReferencePose {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn mark_and_restore_point() {
        let mut pose = ReferencePose::new();
        pose.transform.position = Vec3::new(4.0, 5.0, 6.0);
        pose.mark();
        pose.transform.position = Vec3::ZERO;
        assert_eq!(pose.marked().position, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn unmarked_restore_point_is_identity() {
        let pose = ReferencePose::new();
        assert_eq!(pose.marked(), Transform::new());
    }

    #[test]
    fn recenter_copies_craft_pose() {
        let mut pose = ReferencePose::new();
        let craft = Transform::new().with_position(Vec3::X * 9.0);
        pose.recenter_on(&craft);
        assert_eq!(pose.transform.position, Vec3::X * 9.0);
    }
}
