use rapier3d::prelude::*;

use super::super::camera::CameraPose;
use super::super::constants::debug as colors;
use super::super::physics::GrabPhysics;
use super::Grabber;

/// A colored world-space line segment for a debug renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vector<Real>,
    pub end: Vector<Real>,
    pub color: [f32; 4],
}

pub(super) fn collect_lines<P: GrabPhysics>(
    grabber: &Grabber,
    physics: &P,
    camera: &CameraPose,
) -> Vec<DebugLine> {
    if !grabber.config.show_debug_ray {
        return Vec::new();
    }

    let ray_color = if grabber.is_holding() {
        colors::HOLDING_COLOR
    } else {
        colors::GRABBABLE_COLOR
    };
    let mut lines = vec![DebugLine {
        start: camera.position,
        end: camera.point_ahead(grabber.config.grab_distance),
        color: ray_color,
    }];

    if let Some(session) = grabber.session.as_ref() {
        if let Some(position) = physics.body_position(session.target) {
            lines.push(DebugLine {
                start: position,
                end: session.smoothed_target_position,
                color: colors::SMOOTHED_TARGET_COLOR,
            });
        }
        lines.push(DebugLine {
            start: session.smoothed_target_position,
            end: camera.point_ahead(session.hold_distance),
            color: colors::RAW_TARGET_COLOR,
        });
    }

    lines
}
