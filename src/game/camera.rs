use nalgebra::UnitQuaternion;
use rapier3d::prelude::*;

use super::constants::physics as consts;

/// World-space camera pose, sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vector<Real>,
    /// Unit view direction through the center of the screen
    pub forward: Vector<Real>,
    /// Unit camera up direction
    pub up: Vector<Real>,
}

impl CameraPose {
    /// Builds a pose from any non-zero forward vector, deriving an up vector
    /// orthogonal to it (world +Y unless looking straight up or down).
    pub fn looking(position: Vector<Real>, forward: Vector<Real>) -> Self {
        let forward = forward.try_normalize(consts::EPSILON).unwrap_or_else(Vector::z);
        let world_up = Vector::y();
        let right = forward.cross(&world_up);
        let up = match right.try_normalize(consts::EPSILON) {
            Some(right) => right.cross(&forward),
            None => forward.cross(&Vector::x()).normalize(),
        };
        Self { position, forward, up }
    }

    /// Builds a pose from yaw and pitch in radians. Yaw 0 faces +Z, positive pitch looks up.
    pub fn from_yaw_pitch(position: Vector<Real>, yaw: f32, pitch: f32) -> Self {
        let rotation = UnitQuaternion::from_euler_angles(-pitch, yaw, 0.0);
        Self::looking(position, rotation * Vector::z())
    }

    /// Point `distance` units along the view direction
    pub fn point_ahead(&self, distance: f32) -> Vector<Real> {
        self.position + self.forward * distance
    }
}

/// Finite-difference camera velocity, updated every frame whether or not
/// anything is held.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraVelocity {
    previous_position: Option<Vector<Real>>,
    velocity: Vector<Real>,
}

impl CameraVelocity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records this frame's camera position. The first sample and any sample
    /// with a zero, negative or non-finite frame time leave the velocity unchanged.
    pub fn sample(&mut self, position: Vector<Real>, dt: f32) -> Vector<Real> {
        if let Some(previous) = self.previous_position {
            if dt > 0.0 && dt.is_finite() {
                self.velocity = (position - previous) / dt;
            }
        }
        self.previous_position = Some(position);
        self.velocity
    }

    pub fn velocity(&self) -> Vector<Real> {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looking_builds_orthonormal_basis() {
        let pose = CameraPose::looking(Vector::zeros(), vector![3.0, 0.0, 4.0]);
        assert!((pose.forward.norm() - 1.0).abs() < 1e-5);
        assert!((pose.up.norm() - 1.0).abs() < 1e-5);
        assert!(pose.forward.dot(&pose.up).abs() < 1e-5);
        assert!(pose.up.y > 0.99);
    }

    #[test]
    fn test_looking_straight_up_still_has_an_up_vector() {
        let pose = CameraPose::looking(Vector::zeros(), Vector::y());
        assert!((pose.up.norm() - 1.0).abs() < 1e-5);
        assert!(pose.forward.dot(&pose.up).abs() < 1e-5);
    }

    #[test]
    fn test_yaw_zero_faces_positive_z() {
        let pose = CameraPose::from_yaw_pitch(Vector::zeros(), 0.0, 0.0);
        assert!((pose.forward - Vector::z()).norm() < 1e-5);
        let ahead = pose.point_ahead(2.0);
        assert!((ahead - vector![0.0, 0.0, 2.0]).norm() < 1e-5);
    }

    #[test]
    fn test_pitch_up_and_yaw_right() {
        let up = CameraPose::from_yaw_pitch(Vector::zeros(), 0.0, 0.5);
        assert!(up.forward.y > 0.47 && up.forward.z > 0.87);
        let right = CameraPose::from_yaw_pitch(Vector::zeros(), std::f32::consts::FRAC_PI_2, 0.0);
        assert!((right.forward - Vector::x()).norm() < 1e-5);
    }

    #[test]
    fn test_camera_velocity_finite_difference() {
        let mut cam = CameraVelocity::new();
        assert_eq!(cam.sample(vector![0.0, 0.0, 0.0], 0.1), Vector::zeros());
        let v = cam.sample(vector![1.0, 0.0, 0.0], 0.1);
        assert!((v - vector![10.0, 0.0, 0.0]).norm() < 1e-4);

        // Zero frame time keeps the last sample
        let v = cam.sample(vector![5.0, 0.0, 0.0], 0.0);
        assert!((v - vector![10.0, 0.0, 0.0]).norm() < 1e-4);
        let v = cam.sample(vector![5.0, 1.0, 0.0], 0.5);
        assert!((v - vector![0.0, 2.0, 0.0]).norm() < 1e-4);

        let v = cam.sample(vector![6.0, 1.0, 0.0], f32::NAN);
        assert!((v - vector![0.0, 2.0, 0.0]).norm() < 1e-4);
    }

    #[test]
    fn test_camera_velocity_at_high_frame_rate() {
        let dt = 1.0 / 1200.0;
        let mut cam = CameraVelocity::new();
        let mut x = 0.0;
        for _ in 0..120 {
            cam.sample(vector![x, 1.6, 0.0], dt);
            x += 6.0 * dt;
        }
        assert!((cam.velocity() - vector![6.0, 0.0, 0.0]).norm() < 1e-2, "{:?}", cam.velocity());
    }
}
