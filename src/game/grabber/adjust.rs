use super::super::camera::CameraPose;
use super::super::physics::GrabPhysics;
use super::Grabber;
use crate::config::ScrollMode;

/// Route the scroll axis to either hold distance or spin, per config.
pub(super) fn apply_scroll<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
    camera: &CameraPose,
    scroll_delta: f32,
) {
    let config = &grabber.config;
    let Some(session) = grabber.session.as_mut() else {
        return;
    };

    match config.scroll_mode {
        ScrollMode::Distance => {
            let distance = session.hold_distance + scroll_delta * config.distance_step;
            session.hold_distance = config.clamp_hold_distance(distance);
            tracing::debug!(hold_distance = session.hold_distance, "hold distance adjusted");
        }
        ScrollMode::Rotate => {
            // Velocity change, so spin feel does not depend on mass or hold tuning
            let torque = camera.up * (scroll_delta * config.rotation_speed);
            physics.apply_torque_velocity_change(session.target, torque);
        }
    }
}
