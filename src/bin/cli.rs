//! Grabkit CLI - run a headless grab sandbox and inspect configs

use clap::{Parser, Subcommand};
use rapier3d::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use grabkit::game::GrabPhysics;
use grabkit::{CameraPose, FrameInput, GrabConfig, SandboxInstance};

#[derive(Parser)]
#[command(name = "grabkit")]
#[command(about = "First-person grab sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted grab, pan and throw in a headless world
    Run {
        /// Path to a grab.toml (defaults are used when omitted)
        #[arg(short, long, env = "GRABKIT_CONFIG")]
        config: Option<PathBuf>,
        /// Number of rendered frames to simulate
        #[arg(long, default_value = "240")]
        frames: u32,
        /// Rendered frames per second
        #[arg(long, default_value = "90")]
        fps: f32,
        /// Drop the crate instead of throwing it
        #[arg(long)]
        no_throw: bool,
        /// Downward gravity in m/s²
        #[arg(long, default_value = "9.81")]
        gravity: f32,
    },
    /// Print the effective (sanitized) configuration
    Config {
        /// Path to a grab.toml (defaults are used when omitted)
        #[arg(short, long, env = "GRABKIT_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            frames,
            fps,
            no_throw,
            gravity,
        } => load_config(config.as_deref()).map(|mut config| {
            if no_throw {
                config.allow_throwing = false;
            }
            run_sandbox(config, frames, fps, gravity)
        }),
        Commands::Config { config } => load_config(config.as_deref()).map(print_config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GrabConfig, grabkit::ConfigError> {
    match path {
        Some(path) => GrabConfig::from_file(path),
        None => Ok(GrabConfig::default()),
    }
}

fn print_config(config: GrabConfig) {
    match toml::to_string_pretty(&config) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("failed to serialize config: {}", e),
    }
}

// =============================================================================
// Sandbox Run
// =============================================================================

const SETTLE_FRAMES: u32 = 20;

fn run_sandbox(config: GrabConfig, frames: u32, fps: f32, gravity: f32) {
    let dt = 1.0 / fps.max(1.0);
    let mut instance = SandboxInstance::new(config);
    instance.physics.set_gravity(gravity);

    instance.physics.add_part([0.0, -0.5, 0.0], [20.0, 0.5, 20.0], true);
    let crate_box = instance.physics.add_prop([0.0, 0.25, 2.0], [0.25, 0.25, 0.25], 1.0);
    instance.physics.add_part([2.0, 1.0, 2.0], [0.3, 1.0, 0.3], true);

    let eye = vector![0.0, 1.6, 0.0];
    let look_at_crate = vector![0.0, 0.25, 2.0] - eye;
    let start = CameraPose::looking(eye, look_at_crate);
    let start_yaw = start.forward.x.atan2(start.forward.z);
    let start_pitch = start.forward.y.asin();

    let grab_frame = SETTLE_FRAMES;
    let release_frame = SETTLE_FRAMES + frames.saturating_sub(SETTLE_FRAMES) / 2;

    tracing::info!(frames, fps, gravity, "starting sandbox run");

    for frame in 0..frames {
        // Pan right and level out while holding
        let t = if frame > grab_frame && frame < release_frame {
            (frame - grab_frame) as f32 / (release_frame - grab_frame) as f32
        } else if frame >= release_frame {
            1.0
        } else {
            0.0
        };
        let camera = CameraPose::from_yaw_pitch(
            eye,
            start_yaw + t * std::f32::consts::FRAC_PI_2,
            start_pitch * (1.0 - t),
        );

        let input = FrameInput {
            primary_pressed: frame == grab_frame || frame == release_frame,
            scroll_delta: if frame == grab_frame + 10 { 0.5 } else { 0.0 },
        };

        for event in instance.frame(dt, input, camera) {
            tracing::info!(frame, ?event, "grab event");
        }

        if instance.grabber.is_holding() {
            for line in instance.grabber.debug_lines(&instance.physics, &instance.camera) {
                tracing::trace!(?line, "debug");
            }
        }
    }

    let position = instance.physics.body_position(crate_box);
    let velocity = instance.physics.linear_velocity(crate_box);
    tracing::info!(
        ticks = instance.tick,
        ?position,
        ?velocity,
        holding = instance.grabber.is_holding(),
        "sandbox run finished"
    );
}
