pub mod camera;
pub mod constants;
pub mod grabber;
pub mod instance;
pub mod physics;

use rapier3d::prelude::*;

pub use camera::{CameraPose, CameraVelocity};
pub use grabber::{DebugLine, GrabSession, Grabber};
pub use instance::SandboxInstance;
pub use physics::{Damping, GrabPhysics, PhysicsWorld, RayHit};

/// Input sampled once per rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Primary action went down this frame (edge, not level)
    pub primary_pressed: bool,
    /// Signed scroll-axis value for this frame
    pub scroll_delta: f32,
}

/// What the grab controller did, for audio/UI hooks and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrabEvent {
    Grabbed {
        body: RigidBodyHandle,
        hold_distance: f32,
    },
    /// Toggle release. `throw_velocity` is set when a throw was synthesized.
    Released {
        body: RigidBodyHandle,
        throw_velocity: Option<Vector<Real>>,
    },
    ForceReleased {
        body: RigidBodyHandle,
    },
    /// The held body stopped existing; the session ended without touching it.
    Lost {
        body: RigidBodyHandle,
    },
}
