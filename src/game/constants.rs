//! Grab tuning and simulation constants.
//! Centralizing these keeps config defaults, clamps and tests in agreement.

/// Physics constants
pub mod physics {
    /// Default gravity in m/s²
    pub const DEFAULT_GRAVITY: f32 = 9.81;

    /// Fixed timestep for the physics phase (60 Hz)
    pub const TIMESTEP: f32 = 1.0 / 60.0;

    /// Upper bound on fixed steps run for a single rendered frame.
    /// Frame time beyond this is dropped instead of being simulated.
    pub const MAX_STEPS_PER_FRAME: u32 = 5;

    /// Small epsilon for float comparisons
    pub const EPSILON: f32 = 0.001;
}

/// Grab controller defaults and valid ranges
pub mod grab {
    /// Maximum ray length used to acquire a body
    pub const DEFAULT_GRAB_DISTANCE: f32 = 3.5;
    pub const MIN_GRAB_DISTANCE: f32 = 0.01;

    /// Hold distance bounds (closest keeps bodies out of the camera)
    pub const DEFAULT_MIN_HOLD_DISTANCE: f32 = 1.0;
    pub const DEFAULT_MAX_HOLD_DISTANCE: f32 = 5.0;

    /// Spring constant of the hold regulator
    pub const DEFAULT_SPRING_STRENGTH: f32 = 400.0;
    pub const SPRING_STRENGTH_RANGE: (f32, f32) = (100.0, 2000.0);

    /// Velocity-proportional damping of the hold regulator
    pub const DEFAULT_DAMPING_FACTOR: f32 = 15.0;
    pub const DAMPING_FACTOR_RANGE: (f32, f32) = (0.0, 50.0);

    /// Angular holding damping as a fraction of the damping factor
    pub const ANGULAR_HOLD_DAMPING_RATIO: f32 = 0.5;

    /// Time constant of the target smoothing filter (seconds)
    pub const DEFAULT_SMOOTH_TIME: f32 = 0.1;
    pub const SMOOTH_TIME_RANGE: (f32, f32) = (0.01, 0.5);

    /// Hard cap on held body speed
    pub const DEFAULT_MAX_VELOCITY: f32 = 10.0;

    /// Throw synthesis
    pub const DEFAULT_HORIZONTAL_THROW_FORCE: f32 = 2.0;
    pub const DEFAULT_VERTICAL_THROW_FORCE: f32 = 1.0;
    pub const THROW_FORCE_RANGE: (f32, f32) = (0.0, 20.0);
    pub const DEFAULT_CAMERA_VELOCITY_MULTIPLIER: f32 = 0.3;
    pub const CAMERA_VELOCITY_MULTIPLIER_RANGE: (f32, f32) = (0.0, 2.0);
    pub const DEFAULT_MAX_THROW_VELOCITY: f32 = 15.0;

    /// Scroll adjustment
    pub const DEFAULT_ROTATION_SPEED: f32 = 100.0;
    pub const DEFAULT_DISTANCE_STEP: f32 = 2.0;
}

/// Debug line colors (linear RGBA)
pub mod debug {
    pub const GRABBABLE_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const HOLDING_COLOR: [f32; 4] = [1.0, 0.92, 0.016, 1.0];
    pub const SMOOTHED_TARGET_COLOR: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const RAW_TARGET_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
}
