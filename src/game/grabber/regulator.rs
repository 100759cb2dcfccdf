use rapier3d::prelude::*;

use super::super::camera::CameraPose;
use super::super::physics::GrabPhysics;
use super::super::GrabEvent;
use super::smoothing::{clamp_magnitude, smooth_damp};
use super::Grabber;

/// Spring-damper step for the held body. Runs once per fixed step, before
/// the engine integrates.
///
/// The target point is low-pass filtered first so that fast camera motion does
/// not turn into high-frequency spring force. The force itself is
/// `k * (smoothed - position) - c * velocity`, applied as a continuous force
/// and bounded by [`limit_hold_force`] before the engine integrates it.
pub(super) fn apply_hold_force<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
    camera: &CameraPose,
    dt: f32,
) -> Option<GrabEvent> {
    let session = grabber.session.as_mut()?;
    let body = session.target;

    let (Some(position), Some(velocity), Some(mass)) = (
        physics.body_position(body),
        physics.linear_velocity(body),
        physics.mass(body),
    ) else {
        return grabber.drop_stale_session();
    };

    let config = &grabber.config;
    let raw_target = camera.point_ahead(session.hold_distance);
    session.smoothed_target_position = smooth_damp(
        session.smoothed_target_position,
        raw_target,
        &mut session.target_position_velocity,
        config.smooth_time,
        dt,
    );

    let position_error = session.smoothed_target_position - position;
    let total_force = limit_hold_force(
        position_error,
        velocity,
        mass,
        config.spring_strength,
        config.damping_factor,
        config.max_velocity,
        dt,
    );

    tracing::trace!(
        ?body,
        error = position_error.norm(),
        force = total_force.norm(),
        "hold force"
    );
    physics.add_force(body, total_force);
    None
}

/// Spring-damper force that one explicit step of length `dt` can integrate
/// without diverging.
///
/// Stiffness is capped at `mass / dt²` and damping at `mass / dt`, which keeps
/// the semi-implicit update inside its stability region for any mass. Bodies
/// heavy enough for the configured gains are unaffected. The force is then
/// reduced so the velocity it produces stays within `max_velocity`.
pub(super) fn limit_hold_force(
    position_error: Vector<Real>,
    velocity: Vector<Real>,
    mass: f32,
    spring_strength: f32,
    damping_factor: f32,
    max_velocity: f32,
    dt: f32,
) -> Vector<Real> {
    if !(mass > 0.0 && mass.is_finite() && dt > 0.0) {
        return position_error * spring_strength - velocity * damping_factor;
    }

    let stiffness = spring_strength.min(mass / (dt * dt));
    let damping = damping_factor.min(mass / dt);
    let force = position_error * stiffness - velocity * damping;

    let predicted = velocity + force * (dt / mass);
    if predicted.norm() <= max_velocity {
        return force;
    }
    (clamp_magnitude(predicted, max_velocity) - velocity) * (mass / dt)
}

/// Hard speed cap on the held body. Runs after the engine step so the bound
/// holds at the end of every fixed step regardless of spring tuning.
pub(super) fn clamp_held_velocity<P: GrabPhysics>(
    grabber: &mut Grabber,
    physics: &mut P,
) -> Option<GrabEvent> {
    let body = grabber.session.as_ref()?.target;
    let Some(velocity) = physics.linear_velocity(body) else {
        return grabber.drop_stale_session();
    };

    let max_velocity = grabber.config.max_velocity;
    if velocity.norm() > max_velocity {
        physics.set_linear_velocity(body, clamp_magnitude(velocity, max_velocity));
    }
    None
}
