use rapier3d::prelude::*;

use super::super::camera::CameraPose;
use super::super::physics::{Damping, GrabPhysics};
use super::super::GrabEvent;
use super::session::GrabSession;
use super::Grabber;
use crate::config::GrabConfig;

/// Cast the view-center ray and return the body it would grab.
/// Misses, bodiless colliders and fixed or kinematic bodies all yield `None`.
pub(super) fn find_candidate<P: GrabPhysics>(
    config: &GrabConfig,
    physics: &P,
    camera: &CameraPose,
) -> Option<RigidBodyHandle> {
    let hit = physics.cast_grab_ray(
        camera.position,
        camera.forward,
        config.grab_distance,
        Group::from_bits_truncate(config.grab_mask),
    )?;
    let body = hit.body?;
    physics.is_dynamic(body).then_some(body)
}

/// Start a session on the body under the crosshair, if there is one.
pub(super) fn try_grab<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
    camera: &CameraPose,
) -> Option<GrabEvent> {
    let Some(body) = find_candidate(&grabber.config, physics, camera) else {
        tracing::debug!("grab missed: nothing grabbable under the crosshair");
        return None;
    };
    let (Some(position), Some(saved_damping)) = (physics.body_position(body), physics.damping(body))
    else {
        return None;
    };

    physics.set_damping(
        body,
        Damping {
            linear: grabber.config.holding_linear_damping(),
            angular: grabber.config.holding_angular_damping(),
        },
    );
    physics.enable_interpolation(body);

    // Objects grabbed close stay close
    let hold_distance = grabber
        .config
        .clamp_hold_distance((position - camera.position).norm());

    grabber.session = Some(GrabSession::new(body, position, hold_distance, saved_damping));
    tracing::info!(?body, hold_distance, "grabbed body");

    Some(GrabEvent::Grabbed {
        body,
        hold_distance,
    })
}
