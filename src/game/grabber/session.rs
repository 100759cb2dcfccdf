use rapier3d::prelude::*;

use crate::game::physics::Damping;

/// State of one grab, from acquisition to release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabSession {
    /// Held body. Looked up every step; never owned.
    pub target: RigidBodyHandle,
    /// Distance ahead of the camera the body is driven to
    pub hold_distance: f32,
    /// Filtered point the spring pulls toward
    pub smoothed_target_position: Vector<Real>,
    /// Internal state of the smoothing filter (not the body's velocity)
    pub target_position_velocity: Vector<Real>,
    /// Damping the body had before it was grabbed
    pub saved_damping: Damping,
}

impl GrabSession {
    /// Starts a session seeded at the body's current position so the first
    /// step does not snap it toward the camera.
    pub fn new(
        target: RigidBodyHandle,
        body_position: Vector<Real>,
        hold_distance: f32,
        saved_damping: Damping,
    ) -> Self {
        Self {
            target,
            hold_distance,
            smoothed_target_position: body_position,
            target_position_velocity: Vector::zeros(),
            saved_damping,
        }
    }
}
