use rapier3d::prelude::*;

mod acquisition;
mod adjust;
mod debug;
mod regulator;
mod release;
pub mod session;
pub mod smoothing;

pub use debug::DebugLine;
pub use session::GrabSession;

use super::camera::{CameraPose, CameraVelocity};
use super::physics::GrabPhysics;
use super::{FrameInput, GrabEvent};
use crate::config::GrabConfig;

/// First-person grab/hold/throw controller.
///
/// Holds at most one [`GrabSession`]. The host drives it in two phases:
/// - once per rendered frame: [`Grabber::frame_update`]
/// - once per fixed physics step: [`Grabber::fixed_update`], then the engine
///   step, then [`Grabber::after_physics_step`]
pub struct Grabber {
    config: GrabConfig,
    session: Option<GrabSession>,
    camera_velocity: CameraVelocity,
}

impl Grabber {
    pub fn new(config: GrabConfig) -> Self {
        Self {
            config: config.sanitized(),
            session: None,
            camera_velocity: CameraVelocity::new(),
        }
    }

    pub fn config(&self) -> &GrabConfig {
        &self.config
    }

    /// Replaces the tuning. An active session keeps going with its hold
    /// distance pulled into the new bounds.
    pub fn set_config(&mut self, config: GrabConfig) {
        self.config = config.sanitized();
        if let Some(session) = self.session.as_mut() {
            session.hold_distance = self.config.clamp_hold_distance(session.hold_distance);
        }
    }

    pub fn is_holding(&self) -> bool {
        self.session.is_some()
    }

    pub fn held_body(&self) -> Option<RigidBodyHandle> {
        self.session.map(|s| s.target)
    }

    pub fn session(&self) -> Option<&GrabSession> {
        self.session.as_ref()
    }

    pub fn hold_distance(&self) -> Option<f32> {
        self.session.map(|s| s.hold_distance)
    }

    /// Sets the active hold distance, clamped into the configured bounds.
    /// Does nothing when no body is held.
    pub fn set_hold_distance(&mut self, distance: f32) {
        let clamped = self.config.clamp_hold_distance(distance);
        if let Some(session) = self.session.as_mut() {
            session.hold_distance = clamped;
        }
    }

    pub fn smoothed_target(&self) -> Option<Vector<Real>> {
        self.session.map(|s| s.smoothed_target_position)
    }

    /// Camera velocity from the latest frame sample
    pub fn camera_velocity(&self) -> Vector<Real> {
        self.camera_velocity.velocity()
    }

    /// Variable-rate frame phase.
    ///
    /// Order: camera velocity sample, grab/release toggle on press, then
    /// scroll adjustment of whatever is held after the toggle.
    pub fn frame_update<P: GrabPhysics>(
        &mut self,
        physics: &mut P,
        camera: &CameraPose,
        input: FrameInput,
        dt: f32,
    ) -> Option<GrabEvent> {
        self.camera_velocity.sample(camera.position, dt);

        let event = if input.primary_pressed {
            if self.session.is_some() {
                release::release(self, physics, camera)
            } else {
                acquisition::try_grab(self, physics, camera)
            }
        } else {
            None
        };

        if input.scroll_delta != 0.0 {
            adjust::apply_scroll(self, physics, camera, input.scroll_delta);
        }

        event
    }

    /// Fixed-rate phase, before the engine step: drive the held body toward
    /// the smoothed hold point.
    pub fn fixed_update<P: GrabPhysics>(
        &mut self,
        physics: &mut P,
        camera: &CameraPose,
        dt: f32,
    ) -> Option<GrabEvent> {
        regulator::apply_hold_force(self, physics, camera, dt)
    }

    /// Fixed-rate phase, after the engine step: enforce the speed cap.
    pub fn after_physics_step<P: GrabPhysics>(&mut self, physics: &mut P) -> Option<GrabEvent> {
        regulator::clamp_held_velocity(self, physics)
    }

    /// Drops the held body without throwing it (menus, death, cutscenes).
    /// Does nothing when no body is held.
    pub fn force_release<P: GrabPhysics>(&mut self, physics: &mut P) -> Option<GrabEvent> {
        release::force_release(self, physics)
    }

    /// The body a press would grab right now, if any
    pub fn candidate<P: GrabPhysics>(
        &self,
        physics: &P,
        camera: &CameraPose,
    ) -> Option<RigidBodyHandle> {
        acquisition::find_candidate(&self.config, physics, camera)
    }

    /// Debug line segments for the grab ray and hold targets.
    /// Empty when `show_debug_ray` is off.
    pub fn debug_lines<P: GrabPhysics>(&self, physics: &P, camera: &CameraPose) -> Vec<DebugLine> {
        debug::collect_lines(self, physics, camera)
    }

    /// Ends the session without touching the body (it is gone).
    fn drop_stale_session(&mut self) -> Option<GrabEvent> {
        let session = self.session.take()?;
        tracing::warn!(body = ?session.target, "held body disappeared, ending grab");
        Some(GrabEvent::Lost {
            body: session.target,
        })
    }
}

impl Default for Grabber {
    fn default() -> Self {
        Self::new(GrabConfig::default())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`GrabPhysics`] with exact, inspectable state.

    use std::collections::HashMap;

    use rapier3d::prelude::*;

    use crate::game::physics::{Damping, GrabPhysics, RayHit};

    #[derive(Debug, Clone)]
    pub struct FakeBody {
        pub position: Vector<Real>,
        pub velocity: Vector<Real>,
        pub mass: f32,
        pub angular_velocity: Vector<Real>,
        pub damping: Damping,
        pub dynamic: bool,
        pub forces: Vec<Vector<Real>>,
        pub interpolated: bool,
    }

    /// Bodies are spheres of radius 0.5 for ray purposes.
    #[derive(Default)]
    pub struct FakePhysics {
        pub bodies: HashMap<RigidBodyHandle, FakeBody>,
        next: u32,
    }

    impl FakePhysics {
        pub fn add(&mut self, position: Vector<Real>, dynamic: bool) -> RigidBodyHandle {
            let handle = RigidBodyHandle::from_raw_parts(self.next, 0);
            self.next += 1;
            self.bodies.insert(
                handle,
                FakeBody {
                    position,
                    velocity: Vector::zeros(),
                    mass: 1.0,
                    angular_velocity: Vector::zeros(),
                    damping: Damping { linear: 0.1, angular: 0.05 },
                    dynamic,
                    forces: Vec::new(),
                    interpolated: false,
                },
            );
            handle
        }

        pub fn body(&self, handle: RigidBodyHandle) -> &FakeBody {
            &self.bodies[&handle]
        }

        pub fn body_mut(&mut self, handle: RigidBodyHandle) -> &mut FakeBody {
            self.bodies.get_mut(&handle).unwrap()
        }
    }

    impl GrabPhysics for FakePhysics {
        fn cast_grab_ray(
            &self,
            origin: Vector<Real>,
            direction: Vector<Real>,
            max_distance: f32,
            _mask: Group,
        ) -> Option<RayHit> {
            let dir = direction.normalize();
            self.bodies
                .iter()
                .filter_map(|(&handle, body)| {
                    let to = body.position - origin;
                    let along = to.dot(&dir);
                    let off_axis = (to - dir * along).norm();
                    let distance = along - 0.5;
                    (along > 0.0 && off_axis <= 0.5 && distance <= max_distance)
                        .then_some(RayHit { body: Some(handle), distance })
                })
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
        }

        fn contains_body(&self, body: RigidBodyHandle) -> bool {
            self.bodies.contains_key(&body)
        }

        fn is_dynamic(&self, body: RigidBodyHandle) -> bool {
            self.bodies.get(&body).map(|b| b.dynamic).unwrap_or(false)
        }

        fn body_position(&self, body: RigidBodyHandle) -> Option<Vector<Real>> {
            self.bodies.get(&body).map(|b| b.position)
        }

        fn linear_velocity(&self, body: RigidBodyHandle) -> Option<Vector<Real>> {
            self.bodies.get(&body).map(|b| b.velocity)
        }

        fn mass(&self, body: RigidBodyHandle) -> Option<f32> {
            self.bodies.get(&body).map(|b| b.mass)
        }

        fn set_linear_velocity(&mut self, body: RigidBodyHandle, velocity: Vector<Real>) {
            if let Some(b) = self.bodies.get_mut(&body) {
                b.velocity = velocity;
            }
        }

        fn damping(&self, body: RigidBodyHandle) -> Option<Damping> {
            self.bodies.get(&body).map(|b| b.damping)
        }

        fn set_damping(&mut self, body: RigidBodyHandle, damping: Damping) {
            if let Some(b) = self.bodies.get_mut(&body) {
                b.damping = damping;
            }
        }

        fn add_force(&mut self, body: RigidBodyHandle, force: Vector<Real>) {
            if let Some(b) = self.bodies.get_mut(&body) {
                b.forces.push(force);
            }
        }

        fn apply_torque_velocity_change(&mut self, body: RigidBodyHandle, torque: Vector<Real>) {
            if let Some(b) = self.bodies.get_mut(&body) {
                b.angular_velocity += torque;
            }
        }

        fn enable_interpolation(&mut self, body: RigidBodyHandle) {
            if let Some(b) = self.bodies.get_mut(&body) {
                b.interpolated = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakePhysics;
    use super::*;
    use crate::config::ScrollMode;

    const DT: f32 = 1.0 / 60.0;

    fn camera_at_origin() -> CameraPose {
        CameraPose::looking(Vector::zeros(), vector![0.0, 0.0, 1.0])
    }

    fn press() -> FrameInput {
        FrameInput { primary_pressed: true, scroll_delta: 0.0 }
    }

    fn scroll(delta: f32) -> FrameInput {
        FrameInput { primary_pressed: false, scroll_delta: delta }
    }

    #[test]
    fn test_press_toggles_grab_and_release() {
        let mut physics = FakePhysics::default();
        let body = physics.add(vector![0.0, 0.0, 2.0], true);
        let camera = camera_at_origin();
        let mut grabber = Grabber::default();

        let event = grabber.frame_update(&mut physics, &camera, press(), DT);
        assert!(matches!(event, Some(GrabEvent::Grabbed { body: b, .. }) if b == body));
        assert!(grabber.is_holding());
        assert_eq!(grabber.held_body(), Some(body));

        let event = grabber.frame_update(&mut physics, &camera, press(), DT);
        assert!(matches!(event, Some(GrabEvent::Released { body: b, .. }) if b == body));
        assert!(!grabber.is_holding());
        assert_eq!(grabber.held_body(), None);
    }

    #[test]
    fn test_no_input_no_event() {
        let mut physics = FakePhysics::default();
        physics.add(vector![0.0, 0.0, 2.0], true);
        let mut grabber = Grabber::default();
        let event = grabber.frame_update(&mut physics, &camera_at_origin(), FrameInput::default(), DT);
        assert!(event.is_none());
        assert!(!grabber.is_holding());
    }

    #[test]
    fn test_hold_distance_stays_in_bounds_under_scrolling() {
        let mut physics = FakePhysics::default();
        physics.add(vector![0.0, 0.0, 2.0], true);
        let camera = camera_at_origin();
        let mut config = GrabConfig::default();
        config.scroll_mode = ScrollMode::Distance;
        let mut grabber = Grabber::new(config);
        grabber.frame_update(&mut physics, &camera, press(), DT);

        let deltas = [0.5, 3.0, -0.2, -10.0, 0.1, 0.1, 7.5, -0.05, f32::MAX, -f32::MAX];
        for delta in deltas {
            grabber.frame_update(&mut physics, &camera, scroll(delta), DT);
            let d = grabber.hold_distance().unwrap();
            assert!((1.0..=5.0).contains(&d), "hold distance {} out of bounds", d);
        }
    }

    #[test]
    fn test_set_hold_distance_clamps() {
        let mut physics = FakePhysics::default();
        physics.add(vector![0.0, 0.0, 2.0], true);
        let mut grabber = Grabber::default();
        grabber.frame_update(&mut physics, &camera_at_origin(), press(), DT);

        grabber.set_hold_distance(100.0);
        assert_eq!(grabber.hold_distance(), Some(5.0));
        grabber.set_hold_distance(-3.0);
        assert_eq!(grabber.hold_distance(), Some(1.0));
    }

    #[test]
    fn test_set_config_reclamps_active_session() {
        let mut physics = FakePhysics::default();
        physics.add(vector![0.0, 0.0, 4.0], true);
        let mut grabber = Grabber::default();
        grabber.frame_update(&mut physics, &camera_at_origin(), press(), DT);
        assert!((grabber.hold_distance().unwrap() - 4.0).abs() < 1e-5);

        let mut config = GrabConfig::default();
        config.set_hold_distance_bounds(1.0, 2.0);
        grabber.set_config(config);
        assert_eq!(grabber.hold_distance(), Some(2.0));
    }

    #[test]
    fn test_camera_velocity_sampled_every_frame() {
        let mut physics = FakePhysics::default();
        let mut grabber = Grabber::default();
        let idle = FrameInput::default();
        grabber.frame_update(&mut physics, &camera_at_origin(), idle, 0.5);
        let moved = CameraPose::looking(vector![1.0, 0.0, 0.0], vector![0.0, 0.0, 1.0]);
        grabber.frame_update(&mut physics, &moved, idle, 0.5);
        assert!((grabber.camera_velocity() - vector![2.0, 0.0, 0.0]).norm() < 1e-5);
    }
}
