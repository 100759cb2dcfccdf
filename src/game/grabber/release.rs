use rapier3d::prelude::*;

use super::super::camera::CameraPose;
use super::super::physics::GrabPhysics;
use super::super::GrabEvent;
use super::smoothing::{clamp_magnitude, horizontal_direction};
use super::Grabber;
use crate::config::GrabConfig;

/// Release velocity: forward (horizontal) plus up, optionally plus scaled
/// camera motion, capped at `max_throw_velocity`.
pub fn throw_velocity(
    config: &GrabConfig,
    camera_forward: Vector<Real>,
    camera_velocity: Vector<Real>,
) -> Vector<Real> {
    let horizontal = horizontal_direction(camera_forward) * config.horizontal_throw_force;
    let vertical = Vector::y() * config.vertical_throw_force;
    let mut velocity = horizontal + vertical;

    if config.inherit_camera_velocity {
        velocity += camera_velocity * config.camera_velocity_multiplier;
    }

    clamp_magnitude(velocity, config.max_throw_velocity)
}

/// Toggle release: restore damping, throw if enabled, end the session.
pub(super) fn release<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
    camera: &CameraPose,
) -> Option<GrabEvent> {
    let session = grabber.session?;
    let body = session.target;
    if !physics.contains_body(body) {
        return grabber.drop_stale_session();
    }

    physics.set_damping(body, session.saved_damping);

    let thrown = if grabber.config.allow_throwing {
        let velocity = throw_velocity(
            &grabber.config,
            camera.forward,
            grabber.camera_velocity.velocity(),
        );
        physics.set_linear_velocity(body, velocity);
        Some(velocity)
    } else {
        None
    };

    grabber.session = None;
    tracing::info!(?body, ?thrown, "released body");

    Some(GrabEvent::Released {
        body,
        throw_velocity: thrown,
    })
}

/// Non-gameplay release: restore damping and end the session, leaving the
/// body's velocity alone. Idempotent.
pub(super) fn force_release<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
) -> Option<GrabEvent> {
    let session = grabber.session?;
    let body = session.target;
    if !physics.contains_body(body) {
        return grabber.drop_stale_session();
    }

    physics.set_damping(body, session.saved_damping);
    grabber.session = None;
    tracing::info!(?body, "force released body");

    Some(GrabEvent::ForceReleased { body })
}
