use super::super::GrabEvent;
use super::SandboxInstance;

/// Executes the fixed-rate phases for one physics step.
/// Ordered: hold force -> physics integration -> velocity cap.
pub(super) fn run_fixed_phases(instance: &mut SandboxInstance, dt: f32) -> Vec<GrabEvent> {
    let mut events = Vec::new();

    // Smooth the hold target and push the held body toward it.
    events.extend(
        instance
            .grabber
            .fixed_update(&mut instance.physics, &instance.camera, dt),
    );

    // Step physics simulation (forces are consumed here).
    instance.physics.step(dt);

    // Cap the held body's speed after integration.
    events.extend(instance.grabber.after_physics_step(&mut instance.physics));

    instance.tick += 1;
    events
}
