//! Grabkit: physics-based grab, hold and throw for first-person games
//!
//! This module exposes the grab controller, its configuration and a
//! rapier3d-backed sandbox for testing and library use.

pub mod config;
pub mod game;

pub use config::{ConfigError, GrabConfig, ScrollMode};
pub use game::{
    CameraPose, FrameInput, GrabEvent, GrabPhysics, Grabber, PhysicsWorld, SandboxInstance,
};
