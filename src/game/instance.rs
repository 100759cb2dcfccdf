use rapier3d::prelude::*;

mod tick_pipeline;

use super::camera::CameraPose;
use super::constants::physics as consts;
use super::grabber::Grabber;
use super::physics::PhysicsWorld;
use super::{FrameInput, GrabEvent};
use crate::config::GrabConfig;

/// A first-person sandbox: a rapier world plus the grab controller, driven
/// by a two-rate loop.
///
/// Each call to [`SandboxInstance::frame`] runs the variable-rate frame
/// phase once, then as many fixed physics steps as the accumulated time
/// allows (capped at `MAX_STEPS_PER_FRAME`).
pub struct SandboxInstance {
    pub physics: PhysicsWorld,
    pub grabber: Grabber,
    pub camera: CameraPose,
    pub tick: u64,
    accumulator: f32,
}

impl SandboxInstance {
    pub fn new(config: GrabConfig) -> Self {
        Self {
            physics: PhysicsWorld::new(),
            grabber: Grabber::new(config),
            camera: CameraPose::looking(vector![0.0, 1.6, 0.0], vector![0.0, 0.0, 1.0]),
            tick: 0,
            accumulator: 0.0,
        }
    }

    /// Runs one rendered frame. Returns the controller events in the order
    /// they happened.
    pub fn frame(&mut self, dt: f32, input: FrameInput, camera: CameraPose) -> Vec<GrabEvent> {
        let mut events = Vec::new();
        self.camera = camera;

        // Rays must see bodies added since the last step
        self.physics.update_query_pipeline();

        events.extend(
            self.grabber
                .frame_update(&mut self.physics, &self.camera, input, dt),
        );

        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= consts::TIMESTEP && steps < consts::MAX_STEPS_PER_FRAME {
            events.extend(tick_pipeline::run_fixed_phases(self, consts::TIMESTEP));
            self.accumulator -= consts::TIMESTEP;
            steps += 1;
        }
        if steps == consts::MAX_STEPS_PER_FRAME && self.accumulator >= consts::TIMESTEP {
            tracing::debug!(dropped = self.accumulator, "frame too long, dropping simulation time");
            self.accumulator = 0.0;
        }

        events
    }

    /// Forced release hook for non-gameplay interruptions
    pub fn force_release(&mut self) -> Option<GrabEvent> {
        self.grabber.force_release(&mut self.physics)
    }
}
