use rapier3d::prelude::*;

/// Smallest time constant the filter accepts; keeps `2 / smooth_time` finite.
const MIN_SMOOTH_TIME: f32 = 1.0e-4;

/// Second-order critically damped approach of `current` toward `target`.
///
/// `velocity` is the filter's own state and is updated in place. The decay uses
/// a rational approximation of `exp(-omega * dt)` that stays stable for any
/// step size. From rest the output approaches a fixed target monotonically;
/// the final check snaps to the target if carried-over filter velocity would
/// push the output past it.
pub fn smooth_damp(
    current: Vector<Real>,
    target: Vector<Real>,
    velocity: &mut Vector<Real>,
    smooth_time: f32,
    dt: f32,
) -> Vector<Real> {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    // Overshoot guard
    if (target - current).dot(&(output - target)) > 0.0 {
        output = target;
        *velocity = Vector::zeros();
    }

    output
}

/// Rescale `v` so its length is at most `max`, keeping its direction.
/// Zero-length input (or a non-positive cap) yields the zero vector.
pub fn clamp_magnitude(v: Vector<Real>, max: f32) -> Vector<Real> {
    if max <= 0.0 {
        return Vector::zeros();
    }
    let len = v.norm();
    if len > max {
        v * (max / len)
    } else {
        v
    }
}

/// Unit direction of `v` projected onto the horizontal (XZ) plane, or zero
/// when `v` is vertical.
pub fn horizontal_direction(v: Vector<Real>) -> Vector<Real> {
    vector![v.x, 0.0, v.z]
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector::zeros)
}
